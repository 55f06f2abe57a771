//! Register and RAM snapshot.

use crate::{Memory, RegisterSnapshot, Registers};

/// Full register file plus address space, as captured by
/// [`crate::Machine::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineSnapshot {
    /// Register file.
    pub registers: Registers,
    /// Address space contents.
    pub memory: Memory,
}

impl MachineSnapshot {
    /// Trace line view of the captured registers.
    #[must_use]
    pub const fn trace_line(&self) -> RegisterSnapshot {
        self.registers.trace_snapshot()
    }
}
