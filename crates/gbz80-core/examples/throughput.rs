//! Measures interpreter throughput on a tight relative-jump loop.

use std::time::Instant;

use gbz80_core::{Machine, MachineConfig, RunBoundary};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use serde_json as _;
use thiserror as _;

const STEPS: u64 = 5_000_000;

/// `INC A; XOR (HL); CB 11 (RL C); JR $0000`.
const LOOP: [u8; 6] = [0x3C, 0xAE, 0xCB, 0x11, 0x18, 0xFA];

fn main() -> Result<(), gbz80_core::MachineError> {
    let mut machine = Machine::new(MachineConfig {
        record_trace: false,
        ..MachineConfig::default()
    });
    machine.load(&LOOP, 0x0000)?;

    let started = Instant::now();
    let outcome = machine.run(RunBoundary::Steps(STEPS))?;
    let elapsed = started.elapsed();

    #[allow(clippy::cast_precision_loss)]
    let per_second = outcome.steps as f64 / elapsed.as_secs_f64();
    println!(
        "{} instructions, {} cycles in {:.3}s ({:.1} M instr/s)",
        outcome.steps,
        outcome.cycles,
        elapsed.as_secs_f64(),
        per_second / 1_000_000.0
    );
    Ok(())
}
