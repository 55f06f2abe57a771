#![no_main]

use gbz80_core::{
    disassemble_from, EntryState, Machine, MachineConfig, MachineError, RunBoundary, RunState,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 12 {
        return;
    }

    let word = |index: usize| u16::from_le_bytes([data[index], data[index + 1]]);
    let entry = EntryState {
        af: word(0),
        bc: word(2),
        de: word(4),
        hl: word(6),
        sp: word(8),
        pc: word(10),
    };
    let program = &data[12..];

    let mut machine = Machine::new(MachineConfig {
        record_trace: false,
        ..MachineConfig::default()
    });
    let _ = machine.load(program, entry.pc);
    machine.preset_registers(&entry);

    let _ = disassemble_from(machine.table(), machine.memory(), entry.pc, 16);

    let before = *machine.registers();
    match machine.step() {
        Ok(_) => {
            assert_eq!(machine.registers().f() & 0x0F, 0);
        }
        Err(MachineError::UnimplementedOpcode { .. } | MachineError::Memory(_)) => {
            assert_eq!(*machine.registers(), before);
            assert!(matches!(machine.run_state(), RunState::FaultLatched(_)));
        }
        Err(MachineError::TraceMismatch { .. }) => unreachable!("no reference trace"),
    }

    let _ = machine.run(RunBoundary::Steps(256));
});
