//! Disassembly of memory through an opcode table.

use crate::decoder::{DecodedOpcode, Decoder};
use crate::instruction::Instruction;
use crate::memory::{decode_memory_region, MemoryRegion};
use crate::table::OpcodeTable;
use crate::Memory;

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassemblyRow {
    /// Address of the first byte (the prefix, if any).
    pub addr_start: u16,
    /// Raw bytes: prefix, opcode and immediates.
    pub bytes: Vec<u8>,
    /// Assembly text with immediates filled in, e.g. `LD SP, $FFFE`.
    pub text: String,
    /// Region the instruction starts in.
    pub region: MemoryRegion,
    /// `true` when the table has no entry for the opcode.
    pub is_unimplemented: bool,
}

impl DisassemblyRow {
    /// Length of the instruction in bytes.
    #[must_use]
    pub fn len_bytes(&self) -> u16 {
        u16::try_from(self.bytes.len()).unwrap_or(u16::MAX)
    }
}

fn read_bytes(memory: &Memory, addr: u16, len: u16) -> Vec<u8> {
    (0..len)
        .map(|offset| memory.read_byte(addr.wrapping_add(offset)))
        .collect()
}

fn render(mnemonic: &str, immediates: &[u8], next_pc: u16) -> String {
    let word = match immediates {
        [low, high] => Some(u16::from_le_bytes([*low, *high])),
        _ => None,
    };
    let byte = match immediates {
        [value] => Some(*value),
        _ => None,
    };

    mnemonic
        .split(' ')
        .map(|token| {
            let (core, comma) = token
                .strip_suffix(',')
                .map_or((token, ""), |core| (core, ","));
            let replaced = match (core, word, byte) {
                ("nn" | "a16", Some(word), _) => format!("${word:04X}"),
                ("r8", _, Some(displacement)) => {
                    let offset = i16::from(i8::from_ne_bytes([displacement]));
                    format!("${:04X}", next_pc.wrapping_add_signed(offset))
                }
                ("n", _, Some(value)) => format!("${value:02X}"),
                ("(n)", _, Some(value)) => format!("($FF{value:02X})"),
                _ => core.to_owned(),
            };
            format!("{replaced}{comma}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn instruction_row(
    memory: &Memory,
    decoded: DecodedOpcode,
    instruction: &Instruction,
    region: MemoryRegion,
) -> DisassemblyRow {
    let addr = decoded.pc;
    let immediate_addr = addr.wrapping_add(decoded.byte_len());
    let immediate_len = instruction.operation().immediate_len();
    let immediates = read_bytes(memory, immediate_addr, immediate_len);
    let next_pc = immediate_addr.wrapping_add(immediate_len);
    DisassemblyRow {
        addr_start: addr,
        bytes: read_bytes(memory, addr, decoded.byte_len() + immediate_len),
        text: render(instruction.mnemonic(), &immediates, next_pc),
        region,
        is_unimplemented: false,
    }
}

fn data_row(memory: &Memory, decoded: DecodedOpcode, region: MemoryRegion) -> DisassemblyRow {
    let bytes = read_bytes(memory, decoded.pc, decoded.byte_len());
    let listed = bytes
        .iter()
        .map(|byte| format!("${byte:02X}"))
        .collect::<Vec<_>>()
        .join(", ");
    DisassemblyRow {
        addr_start: decoded.pc,
        bytes,
        text: format!(".db {listed} ; unimplemented"),
        region,
        is_unimplemented: true,
    }
}

/// Disassembles the instruction starting at `addr`.
#[must_use]
pub fn disassemble_one(table: &OpcodeTable, memory: &Memory, addr: u16) -> DisassemblyRow {
    let decoded = Decoder::peek(memory, addr);
    let region = decode_memory_region(addr);

    Decoder::resolve(table, decoded).map_or_else(
        |_| data_row(memory, decoded, region),
        |instruction| instruction_row(memory, decoded, instruction, region),
    )
}

/// Disassembles `count` consecutive instructions starting at `start`.
///
/// Stops early when decoding would wrap past `0xFFFF`.
#[must_use]
pub fn disassemble_from(
    table: &OpcodeTable,
    memory: &Memory,
    start: u16,
    count: usize,
) -> Vec<DisassemblyRow> {
    let mut rows = Vec::with_capacity(count);
    let mut addr = start;

    for _ in 0..count {
        let row = disassemble_one(table, memory, addr);
        let next = addr.checked_add(row.len_bytes());
        rows.push(row);
        match next {
            Some(next) => addr = next,
            None => break,
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::{disassemble_from, disassemble_one};
    use crate::memory::MemoryRegion;
    use crate::table::OpcodeTable;
    use crate::Memory;

    const BOOT_PROLOGUE: [u8; 12] = [
        0x31, 0xFE, 0xFF, 0xAF, 0x21, 0xFF, 0x9F, 0x32, 0xCB, 0x7C, 0x20, 0xFB,
    ];

    fn boot_memory() -> Memory {
        let mut memory = Memory::new();
        memory.load(&BOOT_PROLOGUE, 0x0000).expect("fits");
        memory
    }

    #[test]
    fn boot_prologue_listing() {
        let rows = disassemble_from(&OpcodeTable::standard(), &boot_memory(), 0x0000, 6);
        let listing: Vec<_> = rows
            .iter()
            .map(|row| (row.addr_start, row.text.as_str()))
            .collect();
        assert_eq!(
            listing,
            [
                (0x0000, "LD SP, $FFFE"),
                (0x0003, "XOR A"),
                (0x0004, "LD HL, $9FFF"),
                (0x0007, "LD (HL-), A"),
                (0x0008, "BIT 7, H"),
                (0x000A, "JR NZ, $0007"),
            ]
        );
        assert_eq!(rows[4].bytes, [0xCB, 0x7C]);
        assert!(rows.iter().all(|row| row.region == MemoryRegion::Rom0));
    }

    #[test]
    fn high_page_and_immediate_operands() {
        let mut memory = Memory::new();
        memory
            .load(
                &[0xE0, 0x40, 0x3E, 0x91, 0xFE, 0x90, 0xC3, 0x50, 0x01],
                0xC000,
            )
            .expect("fits");
        let rows = disassemble_from(&OpcodeTable::standard(), &memory, 0xC000, 4);
        let texts: Vec<_> = rows.iter().map(|row| row.text.as_str()).collect();
        assert_eq!(texts, ["LDH ($FF40), A", "LD A, $91", "CP $90", "JP $0150"]);
        assert_eq!(rows[0].region, MemoryRegion::Wram0);
    }

    #[test]
    fn unimplemented_opcode_is_listed_as_data() {
        let mut memory = Memory::new();
        memory.load(&[0xED, 0x44], 0x0100).expect("fits");
        let row = disassemble_one(&OpcodeTable::standard(), &memory, 0x0100);
        assert!(row.is_unimplemented);
        assert_eq!(row.text, ".db $ED, $44 ; unimplemented");
        assert_eq!(row.len_bytes(), 2);
    }

    #[test]
    fn listing_stops_at_the_top_of_memory() {
        let memory = Memory::new();
        let rows = disassemble_from(&OpcodeTable::standard(), &memory, 0xFFFE, 8);
        assert_eq!(rows.len(), 2);
    }
}
