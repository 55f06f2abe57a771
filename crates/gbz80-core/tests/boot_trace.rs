//! Boot-sequence trace verification against debugger-style reference lines.

use gbz80_core::{
    ExpectedTrace, FaultClass, HeadlessHost, Machine, MachineConfig, MachineError, OpcodeBank,
    OpcodeTable, RunBoundary, RunState,
};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use serde_json as _;
use thiserror as _;

/// VRAM clear loop followed by the start of the audio setup.
const BOOT_SEQUENCE: [u8; 29] = [
    0x31, 0xFE, 0xFF, 0xAF, 0x21, 0xFF, 0x9F, 0x32, 0xCB, 0x7C, 0x20, 0xFB, 0x21, 0x26, 0xFF,
    0x0E, 0x11, 0x3E, 0x80, 0x32, 0xE2, 0x0C, 0x3E, 0xF3, 0xE2, 0x32, 0x3E, 0x77, 0x77,
];

const BOOT_REFERENCE: &str = "\
AF=0000 BC=0000 DE=0000 HL=0000 SP=0000 PC=0000
AF=0000 BC=0000 DE=0000 HL=0000 SP=FFFE PC=0003
AF=0080 BC=0000 DE=0000 HL=0000 SP=FFFE PC=0004
AF=0080 BC=0000 DE=0000 HL=9FFF SP=FFFE PC=0007
AF=0080 BC=0000 DE=0000 HL=9FFE SP=FFFE PC=0008
AF=0020 BC=0000 DE=0000 HL=9FFE SP=FFFE PC=000A
AF=0020 BC=0000 DE=0000 HL=9FFE SP=FFFE PC=0007
AF=0020 BC=0000 DE=0000 HL=9FFD SP=FFFE PC=0008
";

fn boot_machine(config: MachineConfig) -> Machine {
    let mut machine = Machine::new(config);
    machine.load(&BOOT_SEQUENCE, 0x0000).expect("fits");
    machine
}

#[test]
fn boot_prologue_matches_reference_trace() {
    let reference = ExpectedTrace::parse(BOOT_REFERENCE);
    let config = MachineConfig::default().with_expected_trace(reference);
    let mut machine = boot_machine(config);
    machine
        .start(&mut HeadlessHost::default())
        .expect("entry matches");

    let outcome = machine.run(RunBoundary::Steps(7)).expect("prefix matches");

    assert_eq!(outcome.steps, 7);
    assert_eq!(outcome.cycles, 12 + 4 + 12 + 8 + 8 + 12 + 8);
    assert_eq!(machine.log().verified(), 8);
    assert_eq!(machine.log().as_text(), BOOT_REFERENCE);
}

#[test]
fn boot_sequence_clears_vram_and_reaches_the_end() {
    let mut machine = boot_machine(MachineConfig::default());
    machine.load(&[0xFF; 0x2000], 0x8000).expect("fits");

    let outcome = machine
        .run(RunBoundary::ProgramCounter(0x001D))
        .expect("every opcode is registered");

    assert_eq!(outcome.steps, 3 + 0x2000 * 3 + 11);
    assert_eq!(outcome.cycles, 229_488);
    let vram = &machine.memory().as_slice()[0x8000..0xA000];
    assert!(vram.iter().all(|byte| *byte == 0));
    assert_eq!(machine.memory().read_byte(0xFF26), 0x80);
    assert_eq!(machine.memory().read_byte(0xFF11), 0x80);
    assert_eq!(machine.memory().read_byte(0xFF12), 0xF3);
    assert_eq!(machine.memory().read_byte(0xFF25), 0xF3);
    assert_eq!(machine.memory().read_byte(0xFF24), 0x77);
    assert_eq!(
        machine.registers().trace_snapshot().to_string(),
        "AF=7700 BC=0012 DE=0000 HL=FF24 SP=FFFE PC=001D"
    );
    assert_eq!(machine.log().count() as u64, outcome.steps + 1);
}

#[test]
fn post_boot_nop_records_the_cartridge_entry() {
    let mut machine = Machine::new(MachineConfig::default());
    machine.skip_bootstrap();
    machine
        .start(&mut HeadlessHost::default())
        .expect("no reference");

    machine.step().expect("NOP");

    assert_eq!(
        machine.log().entries(),
        [
            "AF=01B0 BC=0013 DE=00D8 HL=014D SP=FFFE PC=0100",
            "AF=01B0 BC=0013 DE=00D8 HL=014D SP=FFFE PC=0101",
        ]
    );
}

#[test]
fn unassigned_opcode_stops_the_run_without_side_effects() {
    let mut machine = Machine::with_table(MachineConfig::default(), OpcodeTable::empty());
    let before = machine.snapshot();

    let err = machine
        .run(RunBoundary::Unbounded)
        .expect_err("empty table");

    assert_eq!(
        err,
        MachineError::UnimplementedOpcode {
            bank: OpcodeBank::Default,
            opcode: 0x00,
            pc: 0x0000,
        }
    );
    assert_eq!(err.class(), FaultClass::Decode);
    assert_eq!(err.to_string(), "opcode 00:00 at 0x0000 is not implemented");
    assert_eq!(machine.snapshot(), before);
}

#[test]
fn d3_is_reported_with_its_bank() {
    let mut machine = Machine::new(MachineConfig::default());
    machine.load(&[0xD3], 0x0000).expect("fits");

    let err = machine.step().expect_err("D3 does not exist on the GBZ80");

    assert_eq!(err.to_string(), "opcode 00:D3 at 0x0000 is not implemented");
    assert_eq!(machine.registers().pc(), 0x0000);
}

#[test]
fn fresh_machine_diverges_from_a_foreign_reference() {
    let reference = ExpectedTrace::parse("AF=FFFF BC=0000 DE=0000 HL=0000 SP=0000 PC=0000");
    let config = MachineConfig::default().with_expected_trace(reference);
    let mut machine = Machine::new(config);

    let err = machine.step().expect_err("entry line differs");

    assert_eq!(
        err,
        MachineError::TraceMismatch {
            index: 0,
            expected: "AF=FFFF BC=0000 DE=0000 HL=0000 SP=0000 PC=0000".to_owned(),
            actual: "AF=0000 BC=0000 DE=0000 HL=0000 SP=0000 PC=0000".to_owned(),
        }
    );
    assert_eq!(machine.registers().pc(), 0x0000);
}

#[test]
fn divergence_mid_trace_keeps_the_completed_instruction() {
    let mut lines: Vec<&str> = BOOT_REFERENCE.lines().collect();
    lines[2] = "AF=0000 BC=0000 DE=0000 HL=0000 SP=FFFE PC=0004";
    let reference = ExpectedTrace::from_entries(lines);
    let config = MachineConfig::default().with_expected_trace(reference);
    let mut machine = boot_machine(config);

    let err = machine
        .run(RunBoundary::Steps(7))
        .expect_err("XOR A sets Z");

    assert!(matches!(err, MachineError::TraceMismatch { index: 2, .. }));
    assert_eq!(err.class(), FaultClass::Trace);
    assert_eq!(machine.registers().af(), 0x0080);
    assert_eq!(machine.registers().pc(), 0x0004);
    assert_eq!(machine.run_state(), &RunState::FaultLatched(err.clone()));
    assert_eq!(machine.step(), Err(err));
}

#[test]
fn prefixed_banks_without_entries_are_fatal() {
    for prefix in [0xDD, 0xED, 0xFD] {
        let mut machine = Machine::new(MachineConfig::default());
        machine.load(&[prefix, 0x00], 0x0000).expect("fits");
        let err = machine.step().expect_err("bank is empty");
        assert_eq!(
            err,
            MachineError::UnimplementedOpcode {
                bank: OpcodeBank::from_prefix(prefix).expect("prefix byte"),
                opcode: 0x00,
                pc: 0x0000,
            }
        );
    }
}
