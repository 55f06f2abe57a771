//! Opcode fetch and prefix-bank resolution.
//!
//! One dispatch cycle walks [`DispatchPhase`] from `Fetch` to `Execute`:
//! the lead byte is read at `PC`, a `CB`/`DD`/`ED`/`FD` lead byte selects a
//! prefixed bank and pulls one more byte as the opcode, and the resulting
//! `(bank, opcode)` pair is looked up in the [`OpcodeTable`].

use crate::encoding::OpcodeBank;
use crate::instruction::Instruction;
use crate::table::OpcodeTable;
use crate::{MachineError, Memory, Registers};

/// Phase of one dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispatchPhase {
    /// Read the lead byte at `PC`.
    #[default]
    Fetch,
    /// Turn a prefix byte into a bank selection.
    ResolveBank,
    /// Find the instruction for `(bank, opcode)`.
    Lookup,
    /// Run the instruction's effect.
    Execute,
}

impl DispatchPhase {
    /// Phase that follows this one. `Execute` loops back to `Fetch`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Fetch => Self::ResolveBank,
            Self::ResolveBank => Self::Lookup,
            Self::Lookup => Self::Execute,
            Self::Execute => Self::Fetch,
        }
    }
}

/// Opcode located in memory, before table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedOpcode {
    /// Bank selected by the lead byte.
    pub bank: OpcodeBank,
    /// Opcode byte within `bank`.
    pub opcode: u8,
    /// Address of the lead byte.
    pub pc: u16,
}

impl DecodedOpcode {
    /// Bytes occupied by the prefix and opcode.
    #[must_use]
    pub const fn byte_len(self) -> u16 {
        1 + self.bank.prefix_len()
    }

    /// Builds the error reported when no instruction is registered.
    #[must_use]
    pub const fn unimplemented(self) -> MachineError {
        MachineError::UnimplementedOpcode {
            bank: self.bank,
            opcode: self.opcode,
            pc: self.pc,
        }
    }
}

/// Stateless opcode decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    /// Decodes the opcode at `addr` without touching any register.
    #[must_use]
    pub fn peek(memory: &Memory, addr: u16) -> DecodedOpcode {
        let lead = memory.read_byte(addr);
        OpcodeBank::from_prefix(lead).map_or(
            DecodedOpcode {
                bank: OpcodeBank::Default,
                opcode: lead,
                pc: addr,
            },
            |bank| DecodedOpcode {
                bank,
                opcode: memory.read_byte(addr.wrapping_add(1)),
                pc: addr,
            },
        )
    }

    /// Runs the `Fetch` and `ResolveBank` phases: decodes the opcode at `PC`
    /// and advances `PC` past the prefix and opcode bytes.
    pub fn fetch(regs: &mut Registers, memory: &Memory) -> DecodedOpcode {
        let decoded = Self::peek(memory, regs.pc());
        regs.advance_pc(decoded.byte_len());
        decoded
    }

    /// Runs the `Lookup` phase.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::UnimplementedOpcode`] when the table has no
    /// entry for the decoded opcode.
    pub fn resolve(
        table: &OpcodeTable,
        decoded: DecodedOpcode,
    ) -> Result<&Instruction, MachineError> {
        table
            .lookup(decoded.bank, decoded.opcode)
            .ok_or_else(|| decoded.unimplemented())
    }
}
