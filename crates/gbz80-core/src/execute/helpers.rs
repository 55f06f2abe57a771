//! Operand access and stack helpers shared by instruction effects.

use crate::instruction::{Condition, Operand8, PairAddress};
use crate::{Memory, MemoryFault, Registers};

/// Base of the `0xFF00` page used by the `LDH` and `LD (C)` forms.
pub const HIGH_PAGE: u16 = 0xFF00;

/// Reads the byte at `PC` and advances `PC` past it.
pub fn fetch_u8(regs: &mut Registers, memory: &Memory) -> u8 {
    memory.read_byte(regs.advance_pc(1))
}

/// Reads the little-endian word at `PC` and advances `PC` past it.
pub fn fetch_u16(regs: &mut Registers, memory: &Memory) -> Result<u16, MemoryFault> {
    let value = memory.read_word(regs.pc())?;
    regs.advance_pc(2);
    Ok(value)
}

/// Reads an 8-bit operand.
pub fn read_operand(operand: Operand8, regs: &Registers, memory: &Memory) -> u8 {
    match operand {
        Operand8::Register(reg) => regs.get(reg),
        Operand8::IndirectHl => memory.read_byte(regs.hl()),
    }
}

/// Writes an 8-bit operand.
pub fn write_operand(operand: Operand8, value: u8, regs: &mut Registers, memory: &mut Memory) {
    match operand {
        Operand8::Register(reg) => regs.set(reg, value),
        Operand8::IndirectHl => memory.write_byte(regs.hl(), value),
    }
}

/// Resolves a pair address and applies any `HL` post-adjustment.
pub const fn resolve_pair_address(addr: PairAddress, regs: &mut Registers) -> u16 {
    match addr {
        PairAddress::Bc => regs.bc(),
        PairAddress::De => regs.de(),
        PairAddress::HlIncrement => {
            let hl = regs.hl();
            regs.set_hl(hl.wrapping_add(1));
            hl
        }
        PairAddress::HlDecrement => {
            let hl = regs.hl();
            regs.set_hl(hl.wrapping_sub(1));
            hl
        }
    }
}

/// Evaluates a branch condition against `F`.
pub const fn condition_holds(condition: Condition, regs: &Registers) -> bool {
    match condition {
        Condition::NotZero => !regs.zero(),
        Condition::Zero => regs.zero(),
        Condition::NotCarry => !regs.carry(),
        Condition::Carry => regs.carry(),
    }
}

/// Pushes a word: `SP` is decremented by two and the word stored at the new `SP`.
///
/// `SP` is only updated once the store succeeded.
pub fn push_word(value: u16, regs: &mut Registers, memory: &mut Memory) -> Result<(), MemoryFault> {
    let sp = regs.sp().wrapping_sub(2);
    memory.write_word(sp, value)?;
    regs.set_sp(sp);
    Ok(())
}

/// Pops a word from `SP` and increments `SP` by two.
pub fn pop_word(regs: &mut Registers, memory: &Memory) -> Result<u16, MemoryFault> {
    let sp = regs.sp();
    let value = memory.read_word(sp)?;
    regs.set_sp(sp.wrapping_add(2));
    Ok(value)
}

/// Single-bit mask for `BIT`, `RES` and `SET`. Only the low three bits of
/// `bit` select the position.
pub const fn bit_mask(bit: u8) -> u8 {
    1 << (bit & 7)
}

/// Applies a signed 8-bit displacement to `PC`.
pub fn jump_relative(displacement: u8, regs: &mut Registers) {
    let offset = i16::from(i8::from_ne_bytes([displacement]));
    regs.set_pc(regs.pc().wrapping_add_signed(offset));
}

#[cfg(test)]
mod tests {
    use super::{bit_mask, fetch_u16, jump_relative, pop_word, push_word, resolve_pair_address};
    use crate::instruction::PairAddress;
    use crate::{Memory, MemoryFault, Registers};

    #[test]
    fn push_then_pop_restores_value_and_stack_pointer() {
        let mut regs = Registers::default();
        let mut memory = Memory::new();
        regs.set_sp(0xFFFE);

        push_word(0xBEEF, &mut regs, &mut memory).expect("in range");
        assert_eq!(regs.sp(), 0xFFFC);
        assert_eq!(memory.read_byte(0xFFFC), 0xEF);
        assert_eq!(memory.read_byte(0xFFFD), 0xBE);

        assert_eq!(pop_word(&mut regs, &memory), Ok(0xBEEF));
        assert_eq!(regs.sp(), 0xFFFE);
    }

    #[test]
    fn push_straddling_the_top_faults_without_moving_sp() {
        let mut regs = Registers::default();
        let mut memory = Memory::new();
        regs.set_sp(0x0001);
        assert_eq!(
            push_word(0x1234, &mut regs, &mut memory),
            Err(MemoryFault::OutOfBounds {
                addr: 0xFFFF,
                len: 2
            })
        );
        assert_eq!(regs.sp(), 0x0001);
    }

    #[test]
    fn hl_post_adjustment_wraps() {
        let mut regs = Registers::default();
        assert_eq!(
            resolve_pair_address(PairAddress::HlDecrement, &mut regs),
            0x0000
        );
        assert_eq!(regs.hl(), 0xFFFF);
        assert_eq!(
            resolve_pair_address(PairAddress::HlIncrement, &mut regs),
            0xFFFF
        );
        assert_eq!(regs.hl(), 0x0000);
    }

    #[test]
    fn relative_jump_is_signed() {
        let mut regs = Registers::default();
        regs.set_pc(0x000C);
        jump_relative(0xFB, &mut regs);
        assert_eq!(regs.pc(), 0x0007);
        jump_relative(0x10, &mut regs);
        assert_eq!(regs.pc(), 0x0017);
    }

    #[test]
    fn fetch_word_at_top_of_memory_faults() {
        let mut regs = Registers::default();
        let memory = Memory::new();
        regs.set_pc(0xFFFF);
        assert!(fetch_u16(&mut regs, &memory).is_err());
        assert_eq!(regs.pc(), 0xFFFF);
    }

    #[test]
    fn bit_mask_uses_the_low_three_bits() {
        assert_eq!(bit_mask(0), 0x01);
        assert_eq!(bit_mask(7), 0x80);
        assert_eq!(bit_mask(9), 0x02);
        assert_eq!(bit_mask(u8::MAX), 0x80);
    }

    #[test]
    fn pop_moves_sp_past_the_word() {
        let mut regs = Registers::default();
        let mut memory = Memory::new();
        memory.load(&[0x34, 0x12], 0xDFF0).expect("fits");
        regs.set_sp(0xDFF0);
        assert_eq!(pop_word(&mut regs, &memory), Ok(0x1234));
        assert_eq!(regs.sp(), 0xDFF2);
    }
}
