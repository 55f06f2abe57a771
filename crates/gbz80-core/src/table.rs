//! Opcode table: `(bank, opcode)` to [`Instruction`].
//!
//! [`standard_entries`] is the single source of truth for emulated behavior.
//! Irregular opcodes are listed in [`FIXED_ENTRIES`]; the regular grids
//! (register loads, `INC`/`DEC`, `XOR r` and the prefixed rotate and bit
//! families) are generated from the `x`/`y`/`z` opcode fields.

use std::fmt;

use crate::encoding::{OpcodeBank, OpcodeFields, OPCODE_BANK_COUNT};
use crate::instruction::{Condition, Instruction, Operand8, Operation, PairAddress};
use crate::timing::{cycle_cost, CycleCostKind};
use crate::RegisterPair;

const OPCODES_PER_BANK: usize = 256;

/// One irregular table entry: bank, opcode, mnemonic, cost class, effect.
pub type FixedEntry = (OpcodeBank, u8, &'static str, CycleCostKind, Operation);

/// Irregular opcodes, listed by hand.
pub const FIXED_ENTRIES: &[FixedEntry] = &[
    (
        OpcodeBank::Default,
        0x00,
        "NOP",
        CycleCostKind::Nop,
        Operation::Nop,
    ),
    (
        OpcodeBank::Default,
        0x01,
        "LD BC, nn",
        CycleCostKind::LoadPairImmediate,
        Operation::LoadPairImmediate(RegisterPair::BC),
    ),
    (
        OpcodeBank::Default,
        0x11,
        "LD DE, nn",
        CycleCostKind::LoadPairImmediate,
        Operation::LoadPairImmediate(RegisterPair::DE),
    ),
    (
        OpcodeBank::Default,
        0x21,
        "LD HL, nn",
        CycleCostKind::LoadPairImmediate,
        Operation::LoadPairImmediate(RegisterPair::HL),
    ),
    (
        OpcodeBank::Default,
        0x31,
        "LD SP, nn",
        CycleCostKind::LoadPairImmediate,
        Operation::LoadPairImmediate(RegisterPair::SP),
    ),
    (
        OpcodeBank::Default,
        0x02,
        "LD (BC), A",
        CycleCostKind::LoadIndirect,
        Operation::StoreAccumulator(PairAddress::Bc),
    ),
    (
        OpcodeBank::Default,
        0x12,
        "LD (DE), A",
        CycleCostKind::LoadIndirect,
        Operation::StoreAccumulator(PairAddress::De),
    ),
    (
        OpcodeBank::Default,
        0x22,
        "LD (HL+), A",
        CycleCostKind::LoadIndirect,
        Operation::StoreAccumulator(PairAddress::HlIncrement),
    ),
    (
        OpcodeBank::Default,
        0x32,
        "LD (HL-), A",
        CycleCostKind::LoadIndirect,
        Operation::StoreAccumulator(PairAddress::HlDecrement),
    ),
    (
        OpcodeBank::Default,
        0x0A,
        "LD A, (BC)",
        CycleCostKind::LoadIndirect,
        Operation::LoadAccumulator(PairAddress::Bc),
    ),
    (
        OpcodeBank::Default,
        0x1A,
        "LD A, (DE)",
        CycleCostKind::LoadIndirect,
        Operation::LoadAccumulator(PairAddress::De),
    ),
    (
        OpcodeBank::Default,
        0x2A,
        "LD A, (HL+)",
        CycleCostKind::LoadIndirect,
        Operation::LoadAccumulator(PairAddress::HlIncrement),
    ),
    (
        OpcodeBank::Default,
        0x3A,
        "LD A, (HL-)",
        CycleCostKind::LoadIndirect,
        Operation::LoadAccumulator(PairAddress::HlDecrement),
    ),
    (
        OpcodeBank::Default,
        0x17,
        "RLA",
        CycleCostKind::RotateAccumulator,
        Operation::RotateLeftAccumulator,
    ),
    (
        OpcodeBank::Default,
        0x18,
        "JR r8",
        CycleCostKind::JumpRelativeAlways,
        Operation::JumpRelative(None),
    ),
    (
        OpcodeBank::Default,
        0x20,
        "JR NZ, r8",
        CycleCostKind::JumpRelative,
        Operation::JumpRelative(Some(Condition::NotZero)),
    ),
    (
        OpcodeBank::Default,
        0x28,
        "JR Z, r8",
        CycleCostKind::JumpRelative,
        Operation::JumpRelative(Some(Condition::Zero)),
    ),
    (
        OpcodeBank::Default,
        0x30,
        "JR NC, r8",
        CycleCostKind::JumpRelative,
        Operation::JumpRelative(Some(Condition::NotCarry)),
    ),
    (
        OpcodeBank::Default,
        0x38,
        "JR C, r8",
        CycleCostKind::JumpRelative,
        Operation::JumpRelative(Some(Condition::Carry)),
    ),
    (
        OpcodeBank::Default,
        0xC3,
        "JP a16",
        CycleCostKind::Jump,
        Operation::Jump,
    ),
    (
        OpcodeBank::Default,
        0xCD,
        "CALL a16",
        CycleCostKind::Call,
        Operation::Call,
    ),
    (
        OpcodeBank::Default,
        0xC9,
        "RET",
        CycleCostKind::Ret,
        Operation::Ret,
    ),
    (
        OpcodeBank::Default,
        0xC5,
        "PUSH BC",
        CycleCostKind::Push,
        Operation::Push(RegisterPair::BC),
    ),
    (
        OpcodeBank::Default,
        0xD5,
        "PUSH DE",
        CycleCostKind::Push,
        Operation::Push(RegisterPair::DE),
    ),
    (
        OpcodeBank::Default,
        0xE5,
        "PUSH HL",
        CycleCostKind::Push,
        Operation::Push(RegisterPair::HL),
    ),
    (
        OpcodeBank::Default,
        0xF5,
        "PUSH AF",
        CycleCostKind::Push,
        Operation::Push(RegisterPair::AF),
    ),
    (
        OpcodeBank::Default,
        0xC1,
        "POP BC",
        CycleCostKind::Pop,
        Operation::Pop(RegisterPair::BC),
    ),
    (
        OpcodeBank::Default,
        0xD1,
        "POP DE",
        CycleCostKind::Pop,
        Operation::Pop(RegisterPair::DE),
    ),
    (
        OpcodeBank::Default,
        0xE1,
        "POP HL",
        CycleCostKind::Pop,
        Operation::Pop(RegisterPair::HL),
    ),
    (
        OpcodeBank::Default,
        0xF1,
        "POP AF",
        CycleCostKind::Pop,
        Operation::Pop(RegisterPair::AF),
    ),
    (
        OpcodeBank::Default,
        0xE0,
        "LDH (n), A",
        CycleCostKind::LoadHighImmediate,
        Operation::StoreAccumulatorHigh,
    ),
    (
        OpcodeBank::Default,
        0xE2,
        "LD (C), A",
        CycleCostKind::LoadHighC,
        Operation::StoreAccumulatorHighC,
    ),
    (
        OpcodeBank::Default,
        0xF0,
        "LDH A, (n)",
        CycleCostKind::LoadHighImmediate,
        Operation::LoadAccumulatorHigh,
    ),
    (
        OpcodeBank::Default,
        0xFE,
        "CP n",
        CycleCostKind::AluMemory,
        Operation::CompareImmediate,
    ),
];

/// Opcode of `HALT`, the hole in the `LD r, r'` grid.
pub const HALT_OPCODE: u8 = 0x76;

fn cost(kind: CycleCostKind) -> u8 {
    cycle_cost(kind).unwrap_or_default()
}

const fn by_operand(
    operand: Operand8,
    direct: CycleCostKind,
    indirect: CycleCostKind,
) -> CycleCostKind {
    if operand.is_indirect() {
        indirect
    } else {
        direct
    }
}

fn operands() -> impl Iterator<Item = (u8, Operand8)> {
    (0..8).filter_map(|index| Some((index, Operand8::from_r(index)?)))
}

fn generated(
    bank: OpcodeBank,
    opcode: u8,
    kind: CycleCostKind,
    operation: Operation,
) -> (OpcodeBank, u8, Instruction) {
    let instruction = Instruction::from_operation(cost(kind), operation);
    (bank, opcode, instruction)
}

fn default_bank_grids() -> Vec<(OpcodeBank, u8, Instruction)> {
    let mut entries = Vec::new();

    for (y, operand) in operands() {
        entries.push(generated(
            OpcodeBank::Default,
            OpcodeFields::opcode(0, y, 4),
            by_operand(
                operand,
                CycleCostKind::IncDec,
                CycleCostKind::IncDecIndirect,
            ),
            Operation::Increment(operand),
        ));
        entries.push(generated(
            OpcodeBank::Default,
            OpcodeFields::opcode(0, y, 5),
            by_operand(
                operand,
                CycleCostKind::IncDec,
                CycleCostKind::IncDecIndirect,
            ),
            Operation::Decrement(operand),
        ));
        entries.push(generated(
            OpcodeBank::Default,
            OpcodeFields::opcode(0, y, 6),
            by_operand(
                operand,
                CycleCostKind::LoadImmediate,
                CycleCostKind::StoreImmediateIndirect,
            ),
            Operation::LoadImmediate(operand),
        ));
        entries.push(generated(
            OpcodeBank::Default,
            OpcodeFields::opcode(2, 5, y),
            by_operand(operand, CycleCostKind::Alu, CycleCostKind::AluMemory),
            Operation::Xor(operand),
        ));
    }

    for (y, dst) in operands() {
        for (z, src) in operands() {
            let opcode = OpcodeFields::opcode(1, y, z);
            if opcode == HALT_OPCODE {
                continue;
            }
            let kind = if dst.is_indirect() || src.is_indirect() {
                CycleCostKind::LoadIndirect
            } else {
                CycleCostKind::LoadRegister
            };
            entries.push(generated(
                OpcodeBank::Default,
                opcode,
                kind,
                Operation::Load { dst, src },
            ));
        }
    }

    entries
}

fn cb_bank_grids() -> Vec<(OpcodeBank, u8, Instruction)> {
    let mut entries = Vec::new();

    for (z, operand) in operands() {
        let modify = by_operand(
            operand,
            CycleCostKind::BitModify,
            CycleCostKind::BitModifyIndirect,
        );
        let test = by_operand(
            operand,
            CycleCostKind::BitTest,
            CycleCostKind::BitTestIndirect,
        );

        entries.push(generated(
            OpcodeBank::Cb,
            OpcodeFields::opcode(0, 2, z),
            modify,
            Operation::RotateLeft(operand),
        ));

        for bit in 0..8 {
            entries.push(generated(
                OpcodeBank::Cb,
                OpcodeFields::opcode(1, bit, z),
                test,
                Operation::Bit { bit, operand },
            ));
            entries.push(generated(
                OpcodeBank::Cb,
                OpcodeFields::opcode(2, bit, z),
                modify,
                Operation::Reset { bit, operand },
            ));
            entries.push(generated(
                OpcodeBank::Cb,
                OpcodeFields::opcode(3, bit, z),
                modify,
                Operation::Set { bit, operand },
            ));
        }
    }

    entries
}

/// Every supported `(bank, opcode, instruction)` triple.
#[must_use]
pub fn standard_entries() -> Vec<(OpcodeBank, u8, Instruction)> {
    let mut entries: Vec<_> = FIXED_ENTRIES
        .iter()
        .map(|&(bank, opcode, mnemonic, kind, operation)| {
            let instruction = Instruction::new(mnemonic, cost(kind), operation);
            (bank, opcode, instruction)
        })
        .collect();
    entries.extend(default_bank_grids());
    entries.extend(cb_bank_grids());
    entries
}

/// Mapping from `(bank, opcode)` to instruction descriptors.
///
/// Unassigned slots are absent; a lookup never yields a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct OpcodeTable {
    slots: Vec<Option<Instruction>>,
}

fn slot_index(bank: OpcodeBank, opcode: u8) -> usize {
    bank.index() * OPCODES_PER_BANK + usize::from(opcode)
}

impl OpcodeTable {
    /// Table with no instructions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            slots: vec![None; OPCODE_BANK_COUNT * OPCODES_PER_BANK],
        }
    }

    /// Table populated from [`standard_entries`].
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for (bank, opcode, instruction) in standard_entries() {
            table.register(bank, opcode, instruction);
        }
        table
    }

    /// Inserts `instruction`, returning whatever it replaced.
    pub fn register(
        &mut self,
        bank: OpcodeBank,
        opcode: u8,
        instruction: Instruction,
    ) -> Option<Instruction> {
        self.slots[slot_index(bank, opcode)].replace(instruction)
    }

    /// Looks up the instruction for `(bank, opcode)`.
    #[must_use]
    pub fn lookup(&self, bank: OpcodeBank, opcode: u8) -> Option<&Instruction> {
        self.slots[slot_index(bank, opcode)].as_ref()
    }

    /// Number of registered instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns `true` when no instruction is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Registered entries in bank then opcode order.
    pub fn iter(&self) -> impl Iterator<Item = (OpcodeBank, u8, &Instruction)> + '_ {
        OpcodeBank::ALL.into_iter().flat_map(move |bank| {
            (0..=u8::MAX).filter_map(move |opcode| {
                self.lookup(bank, opcode)
                    .map(|instruction| (bank, opcode, instruction))
            })
        })
    }
}

impl fmt::Debug for OpcodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpcodeTable")
            .field("registered", &self.len())
            .finish()
    }
}
