//! Loads, jumps and caller-registered instructions driven through `Machine`.

use gbz80_core::{
    Instruction, Machine, MachineConfig, OpcodeBank, OpcodeTable, Operand8, Operation,
    Register8, RunBoundary,
};
use log as _;
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use serde_json as _;
use thiserror as _;

fn machine_with(program: &[u8]) -> Machine {
    let mut machine = Machine::new(MachineConfig::default());
    machine.load(program, 0x0000).expect("fits");
    machine
}

#[test]
fn jp_moves_pc_to_its_operand() {
    let mut machine = machine_with(&[0xC3, 0x50, 0x01]);

    let outcome = machine.step().expect("JP a16");

    assert_eq!(machine.registers().pc(), 0x0150);
    assert_eq!(outcome.cycles, 16);
    assert_eq!(
        machine.log().entries()[1],
        "AF=0000 BC=0000 DE=0000 HL=0000 SP=0000 PC=0150"
    );
}

#[rstest]
#[case::through_bc(0x02)]
#[case::through_de(0x12)]
fn store_through_pair_writes_one_byte_and_keeps_hl(#[case] opcode: u8) {
    let mut machine = machine_with(&[opcode]);
    let regs = machine.registers_mut();
    regs.set_a(0xA5);
    regs.set_bc(0xC200);
    regs.set_de(0xC200);
    regs.set_hl(0x8123);

    machine.step().expect("LD (rr), A");

    assert_eq!(machine.memory().read_byte(0xC200), 0xA5);
    assert_eq!(machine.memory().read_byte(0xC1FF), 0x00);
    assert_eq!(machine.memory().read_byte(0xC201), 0x00);
    assert_eq!(machine.registers().hl(), 0x8123);
}

#[test]
fn hl_increment_and_decrement_loads_round_trip() {
    // LD A, (HL+); LD (HL-), A; LD A, (BC); LD A, (DE)
    let mut machine = machine_with(&[0x2A, 0x32, 0x0A, 0x1A]);
    machine.load(&[0x77], 0xC000).expect("fits");
    let regs = machine.registers_mut();
    regs.set_hl(0xC000);
    regs.set_bc(0xC001);
    regs.set_de(0xC000);

    machine.run(RunBoundary::Steps(2)).expect("loads");
    assert_eq!(machine.registers().a(), 0x77);
    assert_eq!(machine.memory().read_byte(0xC001), 0x77);
    assert_eq!(machine.registers().hl(), 0xC000);

    machine.registers_mut().set_a(0x00);
    machine.step().expect("LD A, (BC)");
    assert_eq!(machine.registers().a(), 0x77);

    machine.registers_mut().set_a(0x00);
    machine.step().expect("LD A, (DE)");
    assert_eq!(machine.registers().a(), 0x77);
    assert_eq!(machine.registers().pc(), 0x0004);
}

#[test]
fn jr_with_negative_displacement_loops_back() {
    // NOP; JR -3
    let mut machine = machine_with(&[0x00, 0x18, 0xFD]);

    let outcome = machine.run(RunBoundary::Steps(3)).expect("NOP and JR");

    assert_eq!(outcome.cycles, 4 + 12 + 4);
    assert_eq!(machine.registers().pc(), 0x0001);
}

#[test]
fn registered_bit_test_with_wide_index_does_not_panic() {
    let mut table = OpcodeTable::standard();
    table.register(
        OpcodeBank::Ed,
        0x00,
        Instruction::new(
            "BIT 9, A",
            8,
            Operation::Bit {
                bit: 9,
                operand: Operand8::Register(Register8::A),
            },
        ),
    );
    let mut machine = Machine::with_table(MachineConfig::default(), table);
    machine.load(&[0xED, 0x00], 0x0000).expect("fits");
    machine.registers_mut().set_a(0x02);

    let outcome = machine.run(RunBoundary::Steps(1)).expect("registered");

    assert_eq!(outcome.steps, 1);
    assert!(!machine.registers().zero());
    assert!(machine.registers().half_carry());
    assert_eq!(machine.registers().pc(), 0x0002);
}
