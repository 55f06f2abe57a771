//! Architectural CPU state model primitives.

/// Register file, flag bits and entry-state presets.
pub mod registers;
/// Machine-level execution state.
pub mod run_state;

pub use registers::{
    EntryState, Flag, Register8, RegisterPair, Registers, FLAGS_ACTIVE_MASK, FLAG_C, FLAG_H,
    FLAG_N, FLAG_Z, POST_BOOT_REGISTERS,
};
pub use run_state::RunState;
