/// Instruction forms that have fixed cycle costs on the DMG.
///
/// Costs are in T-cycles (4 per machine cycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleCostKind {
    /// No-operation instruction.
    Nop,
    /// 16-bit immediate load into a register pair.
    LoadPairImmediate,
    /// 8-bit immediate load into a register.
    LoadImmediate,
    /// 8-bit immediate store through `HL`.
    StoreImmediateIndirect,
    /// Register to register move.
    LoadRegister,
    /// Load from or store to memory addressed by a register pair.
    LoadIndirect,
    /// Access to the `0xFF00` page addressed by `C`.
    LoadHighC,
    /// Access to the `0xFF00` page addressed by an immediate byte.
    LoadHighImmediate,
    /// 8-bit ALU operation on a register.
    Alu,
    /// 8-bit ALU operation on `(HL)` or an immediate byte.
    AluMemory,
    /// Increment or decrement of a register.
    IncDec,
    /// Increment or decrement of `(HL)`.
    IncDecIndirect,
    /// Rotate of the accumulator.
    RotateAccumulator,
    /// Prefixed bit test on a register.
    BitTest,
    /// Prefixed bit test on `(HL)`.
    BitTestIndirect,
    /// Prefixed rotate, set or reset on a register.
    BitModify,
    /// Prefixed rotate, set or reset on `(HL)`.
    BitModifyIndirect,
    /// Relative jump, conditional form when not taken.
    JumpRelative,
    /// Unconditional relative jump.
    JumpRelativeAlways,
    /// Absolute jump.
    Jump,
    /// Subroutine call.
    Call,
    /// Subroutine return.
    Ret,
    /// Stack push.
    Push,
    /// Stack pop.
    Pop,
}

/// Extra cycles a conditional relative jump costs when its branch is taken.
pub const BRANCH_TAKEN_EXTRA_CYCLES: u8 = 4;

/// Single source-of-truth cycle-cost table.
pub const CYCLE_COST_TABLE: &[(CycleCostKind, u8)] = &[
    (CycleCostKind::Nop, 4),
    (CycleCostKind::LoadPairImmediate, 12),
    (CycleCostKind::LoadImmediate, 8),
    (CycleCostKind::StoreImmediateIndirect, 12),
    (CycleCostKind::LoadRegister, 4),
    (CycleCostKind::LoadIndirect, 8),
    (CycleCostKind::LoadHighC, 8),
    (CycleCostKind::LoadHighImmediate, 12),
    (CycleCostKind::Alu, 4),
    (CycleCostKind::AluMemory, 8),
    (CycleCostKind::IncDec, 4),
    (CycleCostKind::IncDecIndirect, 12),
    (CycleCostKind::RotateAccumulator, 4),
    (CycleCostKind::BitTest, 8),
    (CycleCostKind::BitTestIndirect, 12),
    (CycleCostKind::BitModify, 8),
    (CycleCostKind::BitModifyIndirect, 16),
    (CycleCostKind::JumpRelative, 8),
    (CycleCostKind::JumpRelativeAlways, 12),
    (CycleCostKind::Jump, 16),
    (CycleCostKind::Call, 24),
    (CycleCostKind::Ret, 16),
    (CycleCostKind::Push, 16),
    (CycleCostKind::Pop, 12),
];

/// Looks up the cycle cost for a cycle-cost kind.
#[must_use]
pub fn cycle_cost(kind: CycleCostKind) -> Option<u8> {
    CYCLE_COST_TABLE
        .iter()
        .find_map(|(entry_kind, cycles)| (*entry_kind == kind).then_some(*cycles))
}
