//! Runs the bootstrap prologue and prints a fingerprint of its register trace.
//!
//! Two hosts that print the same fingerprint produced byte-identical traces.

use gbz80_core::{disassemble_from, HeadlessHost, Machine, MachineConfig, RunBoundary};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use serde_json as _;
use thiserror as _;

/// VRAM clear loop followed by the start of the audio setup.
const BOOT_SEQUENCE: [u8; 29] = [
    0x31, 0xFE, 0xFF, // LD SP, $FFFE
    0xAF, // XOR A
    0x21, 0xFF, 0x9F, // LD HL, $9FFF
    0x32, // LD (HL-), A
    0xCB, 0x7C, // BIT 7, H
    0x20, 0xFB, // JR NZ, $0007
    0x21, 0x26, 0xFF, // LD HL, $FF26
    0x0E, 0x11, // LD C, $11
    0x3E, 0x80, // LD A, $80
    0x32, // LD (HL-), A
    0xE2, // LD (C), A
    0x0C, // INC C
    0x3E, 0xF3, // LD A, $F3
    0xE2, // LD (C), A
    0x32, // LD (HL-), A
    0x3E, 0x77, // LD A, $77
    0x77, // LD (HL), A
];

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn main() -> Result<(), gbz80_core::MachineError> {
    let mut machine = Machine::new(MachineConfig::default());
    machine.load(&BOOT_SEQUENCE, 0x0000)?;

    for row in disassemble_from(machine.table(), machine.memory(), 0x0000, 17) {
        println!("{:04X}  {}", row.addr_start, row.text);
    }

    let mut host = HeadlessHost::default();
    machine.start(&mut host)?;
    let end = u16::try_from(BOOT_SEQUENCE.len()).unwrap_or(u16::MAX);
    let outcome = machine.run(RunBoundary::ProgramCounter(end))?;

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    hash_bytes(&mut hash, machine.log().as_text().as_bytes());
    hash_bytes(&mut hash, machine.memory().as_slice());

    println!();
    println!("steps   {}", outcome.steps);
    println!("cycles  {}", outcome.cycles);
    println!("final   {}", machine.registers().trace_snapshot());
    println!("trace   {hash:016x}");
    Ok(())
}
