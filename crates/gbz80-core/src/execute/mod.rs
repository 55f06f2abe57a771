//! Instruction execution.
//!
//! [`execute`] runs one already-decoded instruction: `PC` points past the
//! opcode (and prefix) on entry, immediates are fetched from there, then the
//! effect is applied to the register file and memory.
//!
//! Memory writes are the last fallible step of every effect, so a faulting
//! instruction leaves memory untouched; the caller restores the register file.

mod flags;
mod helpers;

pub use flags::FlagsUpdate;
pub use helpers::HIGH_PAGE;

use helpers::{
    bit_mask, condition_holds, fetch_u16, fetch_u8, jump_relative, pop_word, push_word,
    read_operand, resolve_pair_address, write_operand,
};

use crate::instruction::{Instruction, Operation};
use crate::timing::BRANCH_TAKEN_EXTRA_CYCLES;
use crate::{Memory, MemoryFault, Register8, Registers};

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOutcome {
    /// Cycles consumed, including any taken-branch penalty.
    pub cycles: u8,
    /// `true` when a conditional branch was taken.
    pub branch_taken: bool,
}

impl ExecuteOutcome {
    const fn retired(cycles: u8) -> Self {
        Self {
            cycles,
            branch_taken: false,
        }
    }
}

/// Executes `instruction` against `regs` and `memory`.
///
/// # Errors
///
/// Returns a [`MemoryFault`] when a word access straddles the top of the
/// address space. Memory is unchanged in that case; `regs` may be partially
/// updated and must be discarded by the caller.
#[allow(clippy::too_many_lines)]
pub fn execute(
    instruction: &Instruction,
    regs: &mut Registers,
    memory: &mut Memory,
) -> Result<ExecuteOutcome, MemoryFault> {
    let cycles = instruction.cycles();

    match instruction.operation() {
        Operation::Nop => {}
        Operation::LoadPairImmediate(pair) => {
            let value = fetch_u16(regs, memory)?;
            regs.set_pair(pair, value);
        }
        Operation::StoreAccumulator(addr) => {
            let target = resolve_pair_address(addr, regs);
            memory.write_byte(target, regs.a());
        }
        Operation::LoadAccumulator(addr) => {
            let source = resolve_pair_address(addr, regs);
            regs.set_a(memory.read_byte(source));
        }
        Operation::LoadImmediate(dst) => {
            let value = fetch_u8(regs, memory);
            write_operand(dst, value, regs, memory);
        }
        Operation::Load { dst, src } => {
            let value = read_operand(src, regs, memory);
            write_operand(dst, value, regs, memory);
        }
        Operation::StoreAccumulatorHighC => {
            memory.write_byte(HIGH_PAGE | u16::from(regs.c()), regs.a());
        }
        Operation::StoreAccumulatorHigh => {
            let offset = fetch_u8(regs, memory);
            memory.write_byte(HIGH_PAGE | u16::from(offset), regs.a());
        }
        Operation::LoadAccumulatorHigh => {
            let offset = fetch_u8(regs, memory);
            regs.set_a(memory.read_byte(HIGH_PAGE | u16::from(offset)));
        }
        Operation::Xor(src) => {
            let result = regs.a() ^ read_operand(src, regs, memory);
            regs.set_a(result);
            FlagsUpdate::logic(result).apply(regs);
        }
        Operation::CompareImmediate => {
            let rhs = fetch_u8(regs, memory);
            FlagsUpdate::subtraction(regs.a(), rhs).apply(regs);
        }
        Operation::Increment(operand) => {
            let value = read_operand(operand, regs, memory);
            write_operand(operand, value.wrapping_add(1), regs, memory);
            FlagsUpdate::increment(value).apply(regs);
        }
        Operation::Decrement(operand) => {
            let value = read_operand(operand, regs, memory);
            write_operand(operand, value.wrapping_sub(1), regs, memory);
            FlagsUpdate::decrement(value).apply(regs);
        }
        Operation::RotateLeftAccumulator => {
            let (result, carry_out) = rotate_left_through_carry(regs.a(), regs.carry());
            regs.set(Register8::A, result);
            FlagsUpdate::rotate(result, carry_out, true).apply(regs);
        }
        Operation::RotateLeft(operand) => {
            let value = read_operand(operand, regs, memory);
            let (result, carry_out) = rotate_left_through_carry(value, regs.carry());
            write_operand(operand, result, regs, memory);
            FlagsUpdate::rotate(result, carry_out, false).apply(regs);
        }
        Operation::Bit { bit, operand } => {
            let value = read_operand(operand, regs, memory);
            FlagsUpdate::bit_test(value & bit_mask(bit) != 0).apply(regs);
        }
        Operation::Reset { bit, operand } => {
            let value = read_operand(operand, regs, memory);
            write_operand(operand, value & !bit_mask(bit), regs, memory);
        }
        Operation::Set { bit, operand } => {
            let value = read_operand(operand, regs, memory);
            write_operand(operand, value | bit_mask(bit), regs, memory);
        }
        Operation::JumpRelative(condition) => {
            let displacement = fetch_u8(regs, memory);
            match condition {
                None => jump_relative(displacement, regs),
                Some(condition) if condition_holds(condition, regs) => {
                    jump_relative(displacement, regs);
                    return Ok(ExecuteOutcome {
                        cycles: cycles.saturating_add(BRANCH_TAKEN_EXTRA_CYCLES),
                        branch_taken: true,
                    });
                }
                Some(_) => {}
            }
        }
        Operation::Jump => {
            let target = fetch_u16(regs, memory)?;
            regs.set_pc(target);
        }
        Operation::Call => {
            let target = fetch_u16(regs, memory)?;
            push_word(regs.pc(), regs, memory)?;
            regs.set_pc(target);
        }
        Operation::Ret => {
            let target = pop_word(regs, memory)?;
            regs.set_pc(target);
        }
        Operation::Push(pair) => push_word(regs.pair(pair), regs, memory)?,
        Operation::Pop(pair) => {
            let value = pop_word(regs, memory)?;
            regs.set_pair(pair, value);
        }
    }

    Ok(ExecuteOutcome::retired(cycles))
}

fn rotate_left_through_carry(value: u8, carry_in: bool) -> (u8, bool) {
    ((value << 1) | u8::from(carry_in), value & 0x80 != 0)
}
