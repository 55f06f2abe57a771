use thiserror::Error;

use crate::OpcodeBank;

/// Fault classes used for log aggregation and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// The opcode table has no entry for a fetched opcode.
    Decode,
    /// A recorded snapshot diverged from the reference trace.
    Trace,
    /// A memory access fell outside the 64 KiB address space.
    Memory,
}

/// Address-space violation raised by the memory accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MemoryFault {
    /// `len` bytes starting at `addr` do not fit below `0x10000`.
    #[error("memory access of {len} byte(s) at {addr:#06X} exceeds the 64 KiB address space")]
    OutOfBounds {
        /// First address of the access.
        addr: usize,
        /// Width of the access in bytes.
        len: usize,
    },
}

/// Fatal conditions that stop a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MachineError {
    /// No instruction is registered for the fetched `(bank, opcode)` pair.
    #[error("opcode {bank}:{opcode:02X} at {pc:#06X} is not implemented")]
    UnimplementedOpcode {
        /// Bank the opcode was looked up in.
        bank: OpcodeBank,
        /// Opcode byte within that bank.
        opcode: u8,
        /// Address of the first byte of the instruction.
        pc: u16,
    },
    /// A recorded snapshot differs from the reference trace.
    #[error("trace diverged at instruction {index}: expected `{expected}`, got `{actual}`")]
    TraceMismatch {
        /// Zero-based index into the trace.
        index: usize,
        /// Reference snapshot.
        expected: String,
        /// Snapshot produced by the emulator.
        actual: String,
    },
    /// An instruction effect or loader touched memory out of range.
    #[error(transparent)]
    Memory(#[from] MemoryFault),
}

impl MachineError {
    /// Returns the fault class for this error.
    #[must_use]
    pub const fn class(&self) -> FaultClass {
        match self {
            Self::UnimplementedOpcode { .. } => FaultClass::Decode,
            Self::TraceMismatch { .. } => FaultClass::Trace,
            Self::Memory(_) => FaultClass::Memory,
        }
    }
}
