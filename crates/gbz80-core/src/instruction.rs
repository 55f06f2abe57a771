//! Instruction descriptors and the tagged operations they carry.
//!
//! An [`Operation`] is plain data: the kind of effect plus its decoded
//! operands. [`crate::execute`] interprets it against the register file and
//! memory, so effects never capture machine state.

use std::borrow::Cow;
use std::fmt;

use crate::{Register8, RegisterPair};

/// 8-bit operand: a register, or the byte addressed by `HL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand8 {
    /// A directly addressed register.
    Register(Register8),
    /// Memory at the address held in `HL`.
    IndirectHl,
}

impl Operand8 {
    /// Decodes the 3-bit `r` table field (`B C D E H L (HL) A`).
    #[must_use]
    pub const fn from_r(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Register(Register8::B)),
            1 => Some(Self::Register(Register8::C)),
            2 => Some(Self::Register(Register8::D)),
            3 => Some(Self::Register(Register8::E)),
            4 => Some(Self::Register(Register8::H)),
            5 => Some(Self::Register(Register8::L)),
            6 => Some(Self::IndirectHl),
            7 => Some(Self::Register(Register8::A)),
            _ => None,
        }
    }

    /// Returns `true` for the `(HL)` operand.
    #[must_use]
    pub const fn is_indirect(self) -> bool {
        matches!(self, Self::IndirectHl)
    }
}

impl fmt::Display for Operand8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(reg) => f.write_str(reg.name()),
            Self::IndirectHl => f.write_str("(HL)"),
        }
    }
}

/// Memory address formed from a register pair for accumulator loads and stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairAddress {
    /// `(BC)`.
    Bc,
    /// `(DE)`.
    De,
    /// `(HL+)`: `HL` is incremented after the access.
    HlIncrement,
    /// `(HL-)`: `HL` is decremented after the access.
    HlDecrement,
}

impl PairAddress {
    /// Decodes the 2-bit `p` field of the `x = 0, z = 2` opcode group.
    #[must_use]
    pub const fn from_p(p: u8) -> Option<Self> {
        match p {
            0 => Some(Self::Bc),
            1 => Some(Self::De),
            2 => Some(Self::HlIncrement),
            3 => Some(Self::HlDecrement),
            _ => None,
        }
    }
}

impl fmt::Display for PairAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bc => "(BC)",
            Self::De => "(DE)",
            Self::HlIncrement => "(HL+)",
            Self::HlDecrement => "(HL-)",
        })
    }
}

/// Branch condition tested against `F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Zero flag clear.
    NotZero,
    /// Zero flag set.
    Zero,
    /// Carry flag clear.
    NotCarry,
    /// Carry flag set.
    Carry,
}

impl Condition {
    /// Decodes the 2-bit condition field (`NZ Z NC C`).
    #[must_use]
    pub const fn from_cc(cc: u8) -> Option<Self> {
        match cc {
            0 => Some(Self::NotZero),
            1 => Some(Self::Zero),
            2 => Some(Self::NotCarry),
            3 => Some(Self::Carry),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotZero => "NZ",
            Self::Zero => "Z",
            Self::NotCarry => "NC",
            Self::Carry => "C",
        })
    }
}

/// Effect of an instruction, with its operands already decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `NOP`.
    Nop,
    /// `LD rr, nn`.
    LoadPairImmediate(RegisterPair),
    /// `LD (rr), A`.
    StoreAccumulator(PairAddress),
    /// `LD A, (rr)`.
    LoadAccumulator(PairAddress),
    /// `LD r, n`.
    LoadImmediate(Operand8),
    /// `LD r, r'`.
    Load {
        /// Destination operand.
        dst: Operand8,
        /// Source operand.
        src: Operand8,
    },
    /// `LD (C), A`: store `A` at `0xFF00 + C`.
    StoreAccumulatorHighC,
    /// `LDH (n), A`: store `A` at `0xFF00 + n`.
    StoreAccumulatorHigh,
    /// `LDH A, (n)`: load `A` from `0xFF00 + n`.
    LoadAccumulatorHigh,
    /// `XOR r`.
    Xor(Operand8),
    /// `CP n`.
    CompareImmediate,
    /// `INC r`.
    Increment(Operand8),
    /// `DEC r`.
    Decrement(Operand8),
    /// `RLA`.
    RotateLeftAccumulator,
    /// `RL r` (prefixed).
    RotateLeft(Operand8),
    /// `BIT b, r` (prefixed).
    Bit {
        /// Bit index `0..=7`.
        bit: u8,
        /// Tested operand.
        operand: Operand8,
    },
    /// `RES b, r` (prefixed).
    Reset {
        /// Bit index `0..=7`.
        bit: u8,
        /// Modified operand.
        operand: Operand8,
    },
    /// `SET b, r` (prefixed).
    Set {
        /// Bit index `0..=7`.
        bit: u8,
        /// Modified operand.
        operand: Operand8,
    },
    /// `JR r8` / `JR cc, r8`.
    JumpRelative(Option<Condition>),
    /// `JP a16`.
    Jump,
    /// `CALL a16`.
    Call,
    /// `RET`.
    Ret,
    /// `PUSH rr`.
    Push(RegisterPair),
    /// `POP rr`.
    Pop(RegisterPair),
}

impl Operation {
    /// Number of immediate bytes the operation consumes after its opcode.
    #[must_use]
    pub const fn immediate_len(self) -> u16 {
        match self {
            Self::LoadPairImmediate(_) | Self::Jump | Self::Call => 2,
            Self::LoadImmediate(_)
            | Self::StoreAccumulatorHigh
            | Self::LoadAccumulatorHigh
            | Self::CompareImmediate
            | Self::JumpRelative(_) => 1,
            Self::Nop
            | Self::StoreAccumulator(_)
            | Self::LoadAccumulator(_)
            | Self::Load { .. }
            | Self::StoreAccumulatorHighC
            | Self::Xor(_)
            | Self::Increment(_)
            | Self::Decrement(_)
            | Self::RotateLeftAccumulator
            | Self::RotateLeft(_)
            | Self::Bit { .. }
            | Self::Reset { .. }
            | Self::Set { .. }
            | Self::Ret
            | Self::Push(_)
            | Self::Pop(_) => 0,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nop => f.write_str("NOP"),
            Self::LoadPairImmediate(pair) => write!(f, "LD {}, nn", pair.name()),
            Self::StoreAccumulator(addr) => write!(f, "LD {addr}, A"),
            Self::LoadAccumulator(addr) => write!(f, "LD A, {addr}"),
            Self::LoadImmediate(dst) => write!(f, "LD {dst}, n"),
            Self::Load { dst, src } => write!(f, "LD {dst}, {src}"),
            Self::StoreAccumulatorHighC => f.write_str("LD (C), A"),
            Self::StoreAccumulatorHigh => f.write_str("LDH (n), A"),
            Self::LoadAccumulatorHigh => f.write_str("LDH A, (n)"),
            Self::Xor(src) => write!(f, "XOR {src}"),
            Self::CompareImmediate => f.write_str("CP n"),
            Self::Increment(operand) => write!(f, "INC {operand}"),
            Self::Decrement(operand) => write!(f, "DEC {operand}"),
            Self::RotateLeftAccumulator => f.write_str("RLA"),
            Self::RotateLeft(operand) => write!(f, "RL {operand}"),
            Self::Bit { bit, operand } => write!(f, "BIT {bit}, {operand}"),
            Self::Reset { bit, operand } => write!(f, "RES {bit}, {operand}"),
            Self::Set { bit, operand } => write!(f, "SET {bit}, {operand}"),
            Self::JumpRelative(None) => f.write_str("JR r8"),
            Self::JumpRelative(Some(cond)) => write!(f, "JR {cond}, r8"),
            Self::Jump => f.write_str("JP a16"),
            Self::Call => f.write_str("CALL a16"),
            Self::Ret => f.write_str("RET"),
            Self::Push(pair) => write!(f, "PUSH {}", pair.name()),
            Self::Pop(pair) => write!(f, "POP {}", pair.name()),
        }
    }
}

/// Immutable instruction descriptor stored in the opcode table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    mnemonic: Cow<'static, str>,
    cycles: u8,
    operation: Operation,
}

impl Instruction {
    /// Builds a descriptor.
    #[must_use]
    pub fn new(mnemonic: impl Into<Cow<'static, str>>, cycles: u8, operation: Operation) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            cycles,
            operation,
        }
    }

    /// Builds a descriptor whose mnemonic is the operation's canonical spelling.
    #[must_use]
    pub fn from_operation(cycles: u8, operation: Operation) -> Self {
        Self::new(operation.to_string(), cycles, operation)
    }

    /// Human-readable mnemonic for traces and disassembly.
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Base cycle cost.
    #[must_use]
    pub const fn cycles(&self) -> u8 {
        self.cycles
    }

    /// Effect executed when the instruction is dispatched.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }
}
