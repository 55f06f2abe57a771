//! DMG memory-region map and decoding helpers.
//!
//! The core backs every address with plain RAM; the map only names what a
//! fuller machine would place there (ROM banks, VRAM, I/O registers and so on)
//! so loaders, logs and the disassembler can describe addresses.

/// Inclusive start address of the fixed ROM bank.
pub const ROM0_START: u16 = 0x0000;
/// Inclusive end address of the fixed ROM bank.
pub const ROM0_END: u16 = 0x3FFF;
/// Inclusive start address of the switchable ROM bank window.
pub const ROMX_START: u16 = 0x4000;
/// Inclusive end address of the switchable ROM bank window.
pub const ROMX_END: u16 = 0x7FFF;
/// Inclusive start address of video RAM.
pub const VRAM_START: u16 = 0x8000;
/// Inclusive end address of video RAM.
pub const VRAM_END: u16 = 0x9FFF;
/// Inclusive start address of the external (cartridge) RAM window.
pub const SRAM_START: u16 = 0xA000;
/// Inclusive end address of the external (cartridge) RAM window.
pub const SRAM_END: u16 = 0xBFFF;
/// Inclusive start address of work RAM bank 0.
pub const WRAM0_START: u16 = 0xC000;
/// Inclusive end address of work RAM bank 0.
pub const WRAM0_END: u16 = 0xCFFF;
/// Inclusive start address of work RAM bank 1.
pub const WRAMX_START: u16 = 0xD000;
/// Inclusive end address of work RAM bank 1.
pub const WRAMX_END: u16 = 0xDFFF;
/// Inclusive start address of the work RAM mirror.
pub const ECHO_START: u16 = 0xE000;
/// Inclusive end address of the work RAM mirror.
pub const ECHO_END: u16 = 0xFDFF;
/// Inclusive start address of the sprite attribute table.
pub const OAM_START: u16 = 0xFE00;
/// Inclusive end address of the sprite attribute table.
pub const OAM_END: u16 = 0xFE9F;
/// Inclusive start address of the unusable gap above OAM.
pub const UNUSABLE_START: u16 = 0xFEA0;
/// Inclusive end address of the unusable gap above OAM.
pub const UNUSABLE_END: u16 = 0xFEFF;
/// Inclusive start address of the device (I/O register) mappings.
pub const IO_START: u16 = 0xFF00;
/// Inclusive end address of the device (I/O register) mappings.
pub const IO_END: u16 = 0xFF7F;
/// Inclusive start address of high RAM.
pub const HRAM_START: u16 = 0xFF80;
/// Inclusive end address of high RAM.
pub const HRAM_END: u16 = 0xFFFE;
/// Address of the interrupt enable register.
pub const IE_ADDR: u16 = 0xFFFF;

/// Descriptor for one named region of the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionDescriptor {
    /// Region classification.
    pub region: MemoryRegion,
    /// Inclusive start address.
    pub start: u16,
    /// Inclusive end address.
    pub end: u16,
}

/// Region classification for DMG addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryRegion {
    /// Fixed ROM bank (`0x0000..=0x3FFF`).
    Rom0,
    /// Switchable ROM bank (`0x4000..=0x7FFF`).
    RomX,
    /// Video RAM (`0x8000..=0x9FFF`).
    Vram,
    /// External RAM (`0xA000..=0xBFFF`).
    Sram,
    /// Work RAM bank 0 (`0xC000..=0xCFFF`).
    Wram0,
    /// Work RAM bank 1 (`0xD000..=0xDFFF`).
    WramX,
    /// Work RAM mirror (`0xE000..=0xFDFF`).
    Echo,
    /// Sprite attribute table (`0xFE00..=0xFE9F`).
    Oam,
    /// Unusable gap (`0xFEA0..=0xFEFF`).
    Unusable,
    /// I/O registers (`0xFF00..=0xFF7F`).
    Io,
    /// High RAM (`0xFF80..=0xFFFE`).
    Hram,
    /// Interrupt enable register (`0xFFFF`).
    InterruptEnable,
}

impl MemoryRegion {
    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Rom0 => (ROM0_START, ROM0_END),
            Self::RomX => (ROMX_START, ROMX_END),
            Self::Vram => (VRAM_START, VRAM_END),
            Self::Sram => (SRAM_START, SRAM_END),
            Self::Wram0 => (WRAM0_START, WRAM0_END),
            Self::WramX => (WRAMX_START, WRAMX_END),
            Self::Echo => (ECHO_START, ECHO_END),
            Self::Oam => (OAM_START, OAM_END),
            Self::Unusable => (UNUSABLE_START, UNUSABLE_END),
            Self::Io => (IO_START, IO_END),
            Self::Hram => (HRAM_START, HRAM_END),
            Self::InterruptEnable => (IE_ADDR, IE_ADDR),
        }
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        let (start, end) = self.bounds();
        addr >= start && addr <= end
    }

    /// Returns the descriptor for this region.
    #[must_use]
    pub const fn descriptor(self) -> RegionDescriptor {
        let (start, end) = self.bounds();
        RegionDescriptor {
            region: self,
            start,
            end,
        }
    }

    /// Short name used in logs and disassembly annotations.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rom0 => "ROM0",
            Self::RomX => "ROMX",
            Self::Vram => "VRAM",
            Self::Sram => "SRAM",
            Self::Wram0 => "WRAM0",
            Self::WramX => "WRAMX",
            Self::Echo => "ECHO",
            Self::Oam => "OAM",
            Self::Unusable => "UNUSABLE",
            Self::Io => "IO",
            Self::Hram => "HRAM",
            Self::InterruptEnable => "IE",
        }
    }
}

/// DMG region layout in ascending address order.
pub const DMG_MEMORY_REGIONS: [RegionDescriptor; 12] = [
    MemoryRegion::Rom0.descriptor(),
    MemoryRegion::RomX.descriptor(),
    MemoryRegion::Vram.descriptor(),
    MemoryRegion::Sram.descriptor(),
    MemoryRegion::Wram0.descriptor(),
    MemoryRegion::WramX.descriptor(),
    MemoryRegion::Echo.descriptor(),
    MemoryRegion::Oam.descriptor(),
    MemoryRegion::Unusable.descriptor(),
    MemoryRegion::Io.descriptor(),
    MemoryRegion::Hram.descriptor(),
    MemoryRegion::InterruptEnable.descriptor(),
];

const _: () = assert_region_layout();

const fn assert_region_layout() {
    let mut index = 0;
    while index < DMG_MEMORY_REGIONS.len() {
        let descriptor = DMG_MEMORY_REGIONS[index];
        assert!(
            descriptor.start <= descriptor.end,
            "region start cannot be greater than end"
        );

        if index > 0 {
            let previous = DMG_MEMORY_REGIONS[index - 1];
            assert!(
                previous.end.wrapping_add(1) == descriptor.start,
                "regions must be contiguous"
            );
        }

        index += 1;
    }

    assert!(
        DMG_MEMORY_REGIONS[0].start == 0x0000
            && DMG_MEMORY_REGIONS[DMG_MEMORY_REGIONS.len() - 1].end == u16::MAX,
        "regions must cover the full address space"
    );
}

/// Decodes a 16-bit address into its DMG memory region.
#[must_use]
pub const fn decode_memory_region(addr: u16) -> MemoryRegion {
    match addr {
        ROM0_START..=ROM0_END => MemoryRegion::Rom0,
        ROMX_START..=ROMX_END => MemoryRegion::RomX,
        VRAM_START..=VRAM_END => MemoryRegion::Vram,
        SRAM_START..=SRAM_END => MemoryRegion::Sram,
        WRAM0_START..=WRAM0_END => MemoryRegion::Wram0,
        WRAMX_START..=WRAMX_END => MemoryRegion::WramX,
        ECHO_START..=ECHO_END => MemoryRegion::Echo,
        OAM_START..=OAM_END => MemoryRegion::Oam,
        UNUSABLE_START..=UNUSABLE_END => MemoryRegion::Unusable,
        IO_START..=IO_END => MemoryRegion::Io,
        HRAM_START..=HRAM_END => MemoryRegion::Hram,
        IE_ADDR => MemoryRegion::InterruptEnable,
    }
}
