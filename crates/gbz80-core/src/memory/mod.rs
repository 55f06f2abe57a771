//! Flat 64 KiB address space and its accessors.
//!
//! Every read and write an instruction performs goes through [`Memory`], so
//! banking or memory-mapped devices can later be layered in here without
//! touching instruction effects.

/// DMG memory-region map and address decoder.
pub mod map;

pub use map::{decode_memory_region, MemoryRegion, RegionDescriptor, DMG_MEMORY_REGIONS};

use crate::MemoryFault;

/// Size in bytes of the flat address space (64 KiB).
pub const ADDRESS_SPACE_BYTES: usize = u16::MAX as usize + 1;

/// Size in bytes of the DMG bootstrap ROM image mapped at `0x0000`.
pub const BOOTSTRAP_IMAGE_BYTES: usize = 0x100;

/// Address of the cartridge entry point the bootstrap hands over to.
pub const CARTRIDGE_ENTRY: u16 = 0x0100;

/// Byte-addressable, zero-initialized 64 KiB store.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|byte| **byte != 0).count();
        f.debug_struct("Memory")
            .field("len", &self.bytes.len())
            .field("non_zero_bytes", &used)
            .finish()
    }
}

const fn check_span(addr: usize, len: usize) -> Result<(), MemoryFault> {
    if addr.saturating_add(len) > ADDRESS_SPACE_BYTES {
        Err(MemoryFault::OutOfBounds { addr, len })
    } else {
        Ok(())
    }
}

impl Memory {
    /// Allocates a zeroed address space.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![0; ADDRESS_SPACE_BYTES].into_boxed_slice(),
        }
    }

    /// Copies `data` into memory starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryFault::OutOfBounds`] when `offset + data.len()` exceeds
    /// the address space; memory is left untouched in that case.
    pub fn load(&mut self, data: &[u8], offset: u16) -> Result<(), MemoryFault> {
        let start = usize::from(offset);
        check_span(start, data.len())?;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        log::debug!(
            "loaded {} byte(s) at {offset:#06X} ({})",
            data.len(),
            decode_memory_region(offset).name()
        );
        Ok(())
    }

    /// Reads one byte.
    #[must_use]
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[usize::from(addr)]
    }

    /// Writes one byte.
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[usize::from(addr)] = value;
    }

    /// Reads a little-endian 16-bit value (low byte at `addr`).
    ///
    /// # Errors
    ///
    /// Returns [`MemoryFault::OutOfBounds`] when `addr + 1` is past the end of
    /// the address space.
    pub fn read_word(&self, addr: u16) -> Result<u16, MemoryFault> {
        let start = usize::from(addr);
        check_span(start, 2)?;
        let bytes = [self.bytes[start], self.bytes[start + 1]];
        Ok(u16::from_le_bytes(bytes))
    }

    /// Writes a little-endian 16-bit value (low byte at `addr`).
    ///
    /// # Errors
    ///
    /// Returns [`MemoryFault::OutOfBounds`] when `addr + 1` is past the end of
    /// the address space; nothing is written in that case.
    pub fn write_word(&mut self, addr: u16, value: u16) -> Result<(), MemoryFault> {
        let start = usize::from(addr);
        check_span(start, 2)?;
        let [low, high] = value.to_le_bytes();
        self.bytes[start] = low;
        self.bytes[start + 1] = high;
        Ok(())
    }

    /// Borrows the raw backing store.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, ADDRESS_SPACE_BYTES};
    use crate::MemoryFault;

    #[test]
    fn backing_store_is_64kib_and_zeroed() {
        let memory = Memory::new();
        assert_eq!(memory.as_slice().len(), ADDRESS_SPACE_BYTES);
        assert!(memory.as_slice().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn load_then_read_word_is_little_endian() {
        let mut memory = Memory::new();
        memory.load(&[0x01, 0x02, 0x03], 10).expect("fits");
        assert_eq!(memory.read_word(10), Ok(0x0201));
        assert_eq!(memory.read_byte(12), 0x03);
    }

    #[test]
    fn load_may_end_exactly_at_the_top_of_memory() {
        let mut memory = Memory::new();
        memory.load(&[0xAA, 0xBB], 0xFFFE).expect("fits");
        assert_eq!(memory.read_byte(0xFFFF), 0xBB);
    }

    #[test]
    fn load_past_the_end_faults_without_writing() {
        let mut memory = Memory::new();
        assert_eq!(
            memory.load(&[0xAA, 0xBB], 0xFFFF),
            Err(MemoryFault::OutOfBounds {
                addr: 0xFFFF,
                len: 2
            })
        );
        assert_eq!(memory.read_byte(0xFFFF), 0x00);
    }

    #[test]
    fn word_access_at_last_address_faults() {
        let mut memory = Memory::new();
        let fault = MemoryFault::OutOfBounds {
            addr: 0xFFFF,
            len: 2,
        };
        assert_eq!(memory.read_word(0xFFFF), Err(fault));
        assert_eq!(memory.write_word(0xFFFF, 0x1234), Err(fault));
        assert_eq!(memory.read_byte(0xFFFF), 0x00);
        assert_eq!(memory.write_word(0xFFFE, 0x1234), Ok(()));
        assert_eq!(memory.read_byte(0xFFFE), 0x34);
        assert_eq!(memory.read_byte(0xFFFF), 0x12);
    }

    #[test]
    fn byte_access_covers_every_address() {
        let mut memory = Memory::new();
        memory.write_byte(0x0000, 0x11);
        memory.write_byte(0xFFFF, 0x22);
        assert_eq!(memory.read_byte(0x0000), 0x11);
        assert_eq!(memory.read_byte(0xFFFF), 0x22);
    }
}
