//! `F` update behaviors for different instruction classes.

use crate::{Flag, Registers};

/// Describes how each flag is updated after an instruction executes.
///
/// `None` leaves the flag unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagsUpdate {
    /// Zero flag.
    pub zero: Option<bool>,
    /// Subtract flag.
    pub subtract: Option<bool>,
    /// Half-carry flag.
    pub half_carry: Option<bool>,
    /// Carry flag.
    pub carry: Option<bool>,
}

impl FlagsUpdate {
    /// No change to `F`.
    pub const UNCHANGED: Self = Self {
        zero: None,
        subtract: None,
        half_carry: None,
        carry: None,
    };

    /// Bitwise logic result: `Z` from the result, everything else cleared.
    #[must_use]
    pub const fn logic(result: u8) -> Self {
        Self {
            zero: Some(result == 0),
            subtract: Some(false),
            half_carry: Some(false),
            carry: Some(false),
        }
    }

    /// Subtraction of `rhs` from `lhs`, as performed by compare.
    #[must_use]
    pub const fn subtraction(lhs: u8, rhs: u8) -> Self {
        Self {
            zero: Some(lhs == rhs),
            subtract: Some(true),
            half_carry: Some((lhs & 0x0F) < (rhs & 0x0F)),
            carry: Some(lhs < rhs),
        }
    }

    /// 8-bit increment of `value`; carry is preserved.
    #[must_use]
    pub const fn increment(value: u8) -> Self {
        Self {
            zero: Some(value.wrapping_add(1) == 0),
            subtract: Some(false),
            half_carry: Some((value & 0x0F) == 0x0F),
            carry: None,
        }
    }

    /// 8-bit decrement of `value`; carry is preserved.
    #[must_use]
    pub const fn decrement(value: u8) -> Self {
        Self {
            zero: Some(value.wrapping_sub(1) == 0),
            subtract: Some(true),
            half_carry: Some(value.trailing_zeros() >= 4),
            carry: None,
        }
    }

    /// Rotate through carry. The accumulator form always clears `Z`; the
    /// prefixed form sets it from the result.
    #[must_use]
    pub const fn rotate(result: u8, carry_out: bool, accumulator: bool) -> Self {
        Self {
            zero: Some(!accumulator && result == 0),
            subtract: Some(false),
            half_carry: Some(false),
            carry: Some(carry_out),
        }
    }

    /// Bit test: `Z` is the complement of the tested bit; carry is preserved.
    #[must_use]
    pub const fn bit_test(bit_set: bool) -> Self {
        Self {
            zero: Some(!bit_set),
            subtract: Some(false),
            half_carry: Some(true),
            carry: None,
        }
    }

    /// Writes the described flags into `regs`.
    pub const fn apply(self, regs: &mut Registers) {
        if let Some(value) = self.zero {
            regs.set_flag(Flag::Zero, value);
        }
        if let Some(value) = self.subtract {
            regs.set_flag(Flag::Subtract, value);
        }
        if let Some(value) = self.half_carry {
            regs.set_flag(Flag::HalfCarry, value);
        }
        if let Some(value) = self.carry {
            regs.set_flag(Flag::Carry, value);
        }
    }
}
