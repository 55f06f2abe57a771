/// `F` bit for zero result.
pub const FLAG_Z: u8 = 1 << 7;
/// `F` bit for subtraction performed.
pub const FLAG_N: u8 = 1 << 6;
/// `F` bit for carry out of the low nibble.
pub const FLAG_H: u8 = 1 << 5;
/// `F` bit for carry out of bit 7.
pub const FLAG_C: u8 = 1 << 4;
/// Mask of architecturally backed `F` bits. The low nibble always reads zero.
pub const FLAGS_ACTIVE_MASK: u8 = FLAG_Z | FLAG_N | FLAG_H | FLAG_C;

/// Named condition bit inside `F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Flag {
    /// Zero (`Z`, bit 7).
    Zero,
    /// Subtract (`N`, bit 6).
    Subtract,
    /// Half-carry (`H`, bit 5).
    HalfCarry,
    /// Carry (`C`, bit 4).
    Carry,
}

impl Flag {
    /// All flags, most significant bit first.
    pub const ALL: [Self; 4] = [Self::Zero, Self::Subtract, Self::HalfCarry, Self::Carry];

    /// Returns the bit mask this flag occupies in `F`.
    #[must_use]
    pub const fn mask(self) -> u8 {
        match self {
            Self::Zero => FLAG_Z,
            Self::Subtract => FLAG_N,
            Self::HalfCarry => FLAG_H,
            Self::Carry => FLAG_C,
        }
    }
}

/// Directly addressable 8-bit register.
///
/// `F` is intentionally absent: it is only reachable through [`Registers::f`],
/// the flag accessors, and the `AF` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Register8 {
    B,
    C,
    D,
    E,
    H,
    L,
    A,
}

impl Register8 {
    /// Returns the assembler name of the register.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::H => "H",
            Self::L => "L",
            Self::A => "A",
        }
    }
}

/// 16-bit register view.
///
/// `AF`, `BC`, `DE` and `HL` are composed from two 8-bit halves; `SP` is a
/// dedicated register that only exists as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum RegisterPair {
    AF,
    BC,
    DE,
    HL,
    SP,
}

impl RegisterPair {
    /// Returns the assembler name of the pair.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AF => "AF",
            Self::BC => "BC",
            Self::DE => "DE",
            Self::HL => "HL",
            Self::SP => "SP",
        }
    }

    /// Decodes the 2-bit `p` field used by `LD rr, nn` style encodings.
    #[must_use]
    pub const fn from_p_with_sp(p: u8) -> Option<Self> {
        match p {
            0 => Some(Self::BC),
            1 => Some(Self::DE),
            2 => Some(Self::HL),
            3 => Some(Self::SP),
            _ => None,
        }
    }

    /// Decodes the 2-bit `p` field used by `PUSH`/`POP` encodings.
    #[must_use]
    pub const fn from_p_with_af(p: u8) -> Option<Self> {
        match p {
            0 => Some(Self::BC),
            1 => Some(Self::DE),
            2 => Some(Self::HL),
            3 => Some(Self::AF),
            _ => None,
        }
    }
}

/// Full register file of the GBZ80 core.
///
/// Only the 8-bit halves are stored; pairs are composed on read and split on
/// write, so the model does not depend on host endianness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Registers {
    a: u8,
    f: u8,
    b: u8,
    c: u8,
    d: u8,
    e: u8,
    h: u8,
    l: u8,
    sp: u16,
    pc: u16,
}

const fn compose(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}

const fn split(value: u16) -> (u8, u8) {
    let [high, low] = value.to_be_bytes();
    (high, low)
}

impl Registers {
    /// Reads an 8-bit register.
    #[must_use]
    pub const fn get(&self, reg: Register8) -> u8 {
        match reg {
            Register8::A => self.a,
            Register8::B => self.b,
            Register8::C => self.c,
            Register8::D => self.d,
            Register8::E => self.e,
            Register8::H => self.h,
            Register8::L => self.l,
        }
    }

    /// Writes an 8-bit register.
    pub const fn set(&mut self, reg: Register8, value: u8) {
        match reg {
            Register8::A => self.a = value,
            Register8::B => self.b = value,
            Register8::C => self.c = value,
            Register8::D => self.d = value,
            Register8::E => self.e = value,
            Register8::H => self.h = value,
            Register8::L => self.l = value,
        }
    }

    /// Reads a 16-bit register or register pair.
    #[must_use]
    pub const fn pair(&self, pair: RegisterPair) -> u16 {
        match pair {
            RegisterPair::AF => self.af(),
            RegisterPair::BC => self.bc(),
            RegisterPair::DE => self.de(),
            RegisterPair::HL => self.hl(),
            RegisterPair::SP => self.sp,
        }
    }

    /// Writes a 16-bit register or register pair.
    pub const fn set_pair(&mut self, pair: RegisterPair, value: u16) {
        match pair {
            RegisterPair::AF => self.set_af(value),
            RegisterPair::BC => self.set_bc(value),
            RegisterPair::DE => self.set_de(value),
            RegisterPair::HL => self.set_hl(value),
            RegisterPair::SP => self.sp = value,
        }
    }

    /// Reads `A`.
    #[must_use]
    pub const fn a(&self) -> u8 {
        self.a
    }

    /// Writes `A`.
    pub const fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    /// Reads `F`. The low nibble is always zero.
    #[must_use]
    pub const fn f(&self) -> u8 {
        self.f
    }

    /// Writes `F`, discarding the low nibble.
    pub const fn set_f(&mut self, value: u8) {
        self.f = value & FLAGS_ACTIVE_MASK;
    }

    /// Reads `B`.
    #[must_use]
    pub const fn b(&self) -> u8 {
        self.b
    }

    /// Writes `B`.
    pub const fn set_b(&mut self, value: u8) {
        self.b = value;
    }

    /// Reads `C`.
    #[must_use]
    pub const fn c(&self) -> u8 {
        self.c
    }

    /// Writes `C`.
    pub const fn set_c(&mut self, value: u8) {
        self.c = value;
    }

    /// Reads `D`.
    #[must_use]
    pub const fn d(&self) -> u8 {
        self.d
    }

    /// Writes `D`.
    pub const fn set_d(&mut self, value: u8) {
        self.d = value;
    }

    /// Reads `E`.
    #[must_use]
    pub const fn e(&self) -> u8 {
        self.e
    }

    /// Writes `E`.
    pub const fn set_e(&mut self, value: u8) {
        self.e = value;
    }

    /// Reads `H`.
    #[must_use]
    pub const fn h(&self) -> u8 {
        self.h
    }

    /// Writes `H`.
    pub const fn set_h(&mut self, value: u8) {
        self.h = value;
    }

    /// Reads `L`.
    #[must_use]
    pub const fn l(&self) -> u8 {
        self.l
    }

    /// Writes `L`.
    pub const fn set_l(&mut self, value: u8) {
        self.l = value;
    }

    /// Reads `AF`.
    #[must_use]
    pub const fn af(&self) -> u16 {
        compose(self.a, self.f)
    }

    /// Writes `AF`. The low nibble of `F` is discarded.
    pub const fn set_af(&mut self, value: u16) {
        let (high, low) = split(value);
        self.a = high;
        self.set_f(low);
    }

    /// Reads `BC`.
    #[must_use]
    pub const fn bc(&self) -> u16 {
        compose(self.b, self.c)
    }

    /// Writes `BC`.
    pub const fn set_bc(&mut self, value: u16) {
        let (high, low) = split(value);
        self.b = high;
        self.c = low;
    }

    /// Reads `DE`.
    #[must_use]
    pub const fn de(&self) -> u16 {
        compose(self.d, self.e)
    }

    /// Writes `DE`.
    pub const fn set_de(&mut self, value: u16) {
        let (high, low) = split(value);
        self.d = high;
        self.e = low;
    }

    /// Reads `HL`.
    #[must_use]
    pub const fn hl(&self) -> u16 {
        compose(self.h, self.l)
    }

    /// Writes `HL`.
    pub const fn set_hl(&mut self, value: u16) {
        let (high, low) = split(value);
        self.h = high;
        self.l = low;
    }

    /// Reads the `PC` register.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the `PC` register.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the `SP` register.
    #[must_use]
    pub const fn sp(&self) -> u16 {
        self.sp
    }

    /// Writes the `SP` register.
    pub const fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    /// Returns `true` when `flag` is set in `F`.
    #[must_use]
    pub const fn flag(&self, flag: Flag) -> bool {
        (self.f & flag.mask()) != 0
    }

    /// Sets or clears a single flag, leaving the other bits of `F` untouched.
    pub const fn set_flag(&mut self, flag: Flag, enabled: bool) {
        if enabled {
            self.f |= flag.mask();
        } else {
            self.f &= !flag.mask();
        }
    }

    /// Reads the zero flag.
    #[must_use]
    pub const fn zero(&self) -> bool {
        self.flag(Flag::Zero)
    }

    /// Writes the zero flag.
    pub const fn set_zero(&mut self, enabled: bool) {
        self.set_flag(Flag::Zero, enabled);
    }

    /// Reads the subtract flag.
    #[must_use]
    pub const fn subtract(&self) -> bool {
        self.flag(Flag::Subtract)
    }

    /// Writes the subtract flag.
    pub const fn set_subtract(&mut self, enabled: bool) {
        self.set_flag(Flag::Subtract, enabled);
    }

    /// Reads the half-carry flag.
    #[must_use]
    pub const fn half_carry(&self) -> bool {
        self.flag(Flag::HalfCarry)
    }

    /// Writes the half-carry flag.
    pub const fn set_half_carry(&mut self, enabled: bool) {
        self.set_flag(Flag::HalfCarry, enabled);
    }

    /// Reads the carry flag.
    #[must_use]
    pub const fn carry(&self) -> bool {
        self.flag(Flag::Carry)
    }

    /// Writes the carry flag.
    pub const fn set_carry(&mut self, enabled: bool) {
        self.set_flag(Flag::Carry, enabled);
    }

    /// Returns the current `PC` and advances it by `by` bytes, wrapping at 64 KiB.
    pub const fn advance_pc(&mut self, by: u16) -> u16 {
        let pc = self.pc;
        self.pc = pc.wrapping_add(by);
        pc
    }

    /// Captures the pair view used by trace comparison.
    #[must_use]
    pub const fn trace_snapshot(&self) -> crate::RegisterSnapshot {
        crate::RegisterSnapshot {
            af: self.af(),
            bc: self.bc(),
            de: self.de(),
            hl: self.hl(),
            sp: self.sp,
            pc: self.pc,
        }
    }
}

/// Register values presetting a machine to a known entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EntryState {
    /// Value for `AF`.
    pub af: u16,
    /// Value for `BC`.
    pub bc: u16,
    /// Value for `DE`.
    pub de: u16,
    /// Value for `HL`.
    pub hl: u16,
    /// Value for `SP`.
    pub sp: u16,
    /// Value for `PC`.
    pub pc: u16,
}

/// DMG register state right after the bootstrap ROM hands over to the cartridge.
pub const POST_BOOT_REGISTERS: EntryState = EntryState {
    af: 0x01B0,
    bc: 0x0013,
    de: 0x00D8,
    hl: 0x014D,
    sp: 0xFFFE,
    pc: 0x0100,
};

impl EntryState {
    /// Writes every field into `regs`.
    pub const fn apply(&self, regs: &mut Registers) {
        regs.set_af(self.af);
        regs.set_bc(self.bc);
        regs.set_de(self.de);
        regs.set_hl(self.hl);
        regs.set_sp(self.sp);
        regs.set_pc(self.pc);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Flag, Register8, RegisterPair, Registers, FLAGS_ACTIVE_MASK, FLAG_C, FLAG_H, FLAG_N,
        FLAG_Z, POST_BOOT_REGISTERS,
    };

    #[test]
    fn flag_masks_occupy_the_high_nibble() {
        assert_eq!(FLAG_Z, 0x80);
        assert_eq!(FLAG_N, 0x40);
        assert_eq!(FLAG_H, 0x20);
        assert_eq!(FLAG_C, 0x10);
        assert_eq!(FLAGS_ACTIVE_MASK, 0xF0);
    }

    #[test]
    fn default_register_file_is_zeroed() {
        let regs = Registers::default();
        for pair in [
            RegisterPair::AF,
            RegisterPair::BC,
            RegisterPair::DE,
            RegisterPair::HL,
            RegisterPair::SP,
        ] {
            assert_eq!(regs.pair(pair), 0);
        }
        assert_eq!(regs.pc(), 0);
    }

    #[test]
    fn pair_writes_split_high_then_low() {
        let mut regs = Registers::default();
        regs.set_bc(0x1234);
        regs.set_de(0x5678);
        regs.set_hl(0x9ABC);

        assert_eq!((regs.b(), regs.c()), (0x12, 0x34));
        assert_eq!((regs.d(), regs.e()), (0x56, 0x78));
        assert_eq!((regs.h(), regs.l()), (0x9A, 0xBC));
    }

    #[test]
    fn half_writes_are_visible_through_the_pair() {
        let mut regs = Registers::default();
        regs.set_hl(0x9FFF);
        regs.set(Register8::H, 0x80);
        assert_eq!(regs.hl(), 0x80FF);
        regs.set(Register8::L, 0x01);
        assert_eq!(regs.hl(), 0x8001);
    }

    #[test]
    fn af_discards_the_low_nibble_of_f() {
        let mut regs = Registers::default();
        regs.set_af(0x01BF);
        assert_eq!(regs.a(), 0x01);
        assert_eq!(regs.f(), 0xB0);
        assert_eq!(regs.af(), 0x01B0);
    }

    #[test]
    fn flags_individual_bits_can_be_set_and_cleared() {
        let mut regs = Registers::default();

        for flag in Flag::ALL {
            regs.set_flag(flag, true);
            assert!(regs.flag(flag));
        }
        assert_eq!(regs.f(), FLAGS_ACTIVE_MASK);

        for flag in Flag::ALL {
            regs.set_flag(flag, false);
            assert!(!regs.flag(flag));
        }
        assert_eq!(regs.f(), 0);
    }

    #[test]
    fn setting_one_flag_leaves_the_others_alone() {
        let mut regs = Registers::default();
        regs.set_f(FLAG_Z | FLAG_C);
        regs.set_half_carry(true);
        assert_eq!(regs.f(), FLAG_Z | FLAG_H | FLAG_C);
        regs.set_zero(false);
        assert_eq!(regs.f(), FLAG_H | FLAG_C);
        assert!(!regs.subtract());
        assert!(regs.carry());
    }

    #[test]
    fn advance_pc_returns_previous_value_and_wraps() {
        let mut regs = Registers::default();
        regs.set_pc(0xFFFF);
        assert_eq!(regs.advance_pc(1), 0xFFFF);
        assert_eq!(regs.pc(), 0x0000);
    }

    #[test]
    fn post_boot_entry_state_matches_dmg_handover() {
        let mut regs = Registers::default();
        POST_BOOT_REGISTERS.apply(&mut regs);
        assert_eq!(regs.af(), 0x01B0);
        assert_eq!(regs.bc(), 0x0013);
        assert_eq!(regs.de(), 0x00D8);
        assert_eq!(regs.hl(), 0x014D);
        assert_eq!(regs.sp(), 0xFFFE);
        assert_eq!(regs.pc(), 0x0100);
        assert!(regs.zero());
        assert!(regs.half_carry());
        assert!(regs.carry());
        assert!(!regs.subtract());
    }

    #[test]
    fn register_pair_field_decoding() {
        assert_eq!(RegisterPair::from_p_with_sp(3), Some(RegisterPair::SP));
        assert_eq!(RegisterPair::from_p_with_af(3), Some(RegisterPair::AF));
        assert_eq!(RegisterPair::from_p_with_sp(4), None);
    }
}
