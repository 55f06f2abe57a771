//! Opcode banks and opcode bit-field decomposition.

use std::fmt;

/// Number of opcode banks: the default bank plus four prefixed banks.
pub const OPCODE_BANK_COUNT: usize = 5;

/// Opcode space an opcode byte is interpreted in.
///
/// A prefixed bank is selected by a lead byte equal to its name; the byte
/// after the prefix is the opcode within that bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum OpcodeBank {
    /// Unprefixed opcodes.
    #[default]
    Default,
    /// Opcodes following a `0xCB` prefix.
    Cb,
    /// Opcodes following a `0xDD` prefix.
    Dd,
    /// Opcodes following a `0xED` prefix.
    Ed,
    /// Opcodes following a `0xFD` prefix.
    Fd,
}

impl OpcodeBank {
    /// All banks in table order.
    pub const ALL: [Self; OPCODE_BANK_COUNT] =
        [Self::Default, Self::Cb, Self::Dd, Self::Ed, Self::Fd];

    /// Returns the prefixed bank selected by a lead byte, if it is a prefix.
    ///
    /// A lead byte with one of these values is always a prefix, never an
    /// opcode of the default bank.
    #[must_use]
    pub const fn from_prefix(byte: u8) -> Option<Self> {
        match byte {
            0xCB => Some(Self::Cb),
            0xDD => Some(Self::Dd),
            0xED => Some(Self::Ed),
            0xFD => Some(Self::Fd),
            _ => None,
        }
    }

    /// Returns the lead byte selecting this bank, `None` for the default bank.
    #[must_use]
    pub const fn prefix(self) -> Option<u8> {
        match self {
            Self::Default => None,
            Self::Cb => Some(0xCB),
            Self::Dd => Some(0xDD),
            Self::Ed => Some(0xED),
            Self::Fd => Some(0xFD),
        }
    }

    /// Returns the table index for this bank (`0..OPCODE_BANK_COUNT`).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Default => 0,
            Self::Cb => 1,
            Self::Dd => 2,
            Self::Ed => 3,
            Self::Fd => 4,
        }
    }

    /// Number of bytes the bank's prefix adds in front of the opcode.
    #[must_use]
    pub const fn prefix_len(self) -> u16 {
        match self {
            Self::Default => 0,
            Self::Cb | Self::Dd | Self::Ed | Self::Fd => 1,
        }
    }
}

impl fmt::Display for OpcodeBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.prefix().unwrap_or(0x00))
    }
}

/// Bit fields of an opcode byte.
///
/// ```text
/// | 7 6 | 5 4 3 | 2 1 0 |
/// |  x  |   y   |   z   |
/// |     | p | q |       |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeFields {
    /// Bits 7..6.
    pub x: u8,
    /// Bits 5..3.
    pub y: u8,
    /// Bits 2..0.
    pub z: u8,
    /// Bits 5..4.
    pub p: u8,
    /// Bit 3.
    pub q: u8,
}

impl OpcodeFields {
    /// Splits an opcode byte into its fields.
    #[must_use]
    pub const fn from_byte(opcode: u8) -> Self {
        Self {
            x: (opcode >> 6) & 0x3,
            y: (opcode >> 3) & 0x7,
            z: opcode & 0x7,
            p: (opcode >> 4) & 0x3,
            q: (opcode >> 3) & 0x1,
        }
    }

    /// Reassembles the opcode byte from `x`, `y` and `z`.
    #[must_use]
    pub const fn opcode(x: u8, y: u8, z: u8) -> u8 {
        ((x & 0x3) << 6) | ((y & 0x7) << 3) | (z & 0x7)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{OpcodeBank, OpcodeFields};

    #[test]
    fn prefix_bytes_select_their_banks() {
        assert_eq!(OpcodeBank::from_prefix(0xCB), Some(OpcodeBank::Cb));
        assert_eq!(OpcodeBank::from_prefix(0xDD), Some(OpcodeBank::Dd));
        assert_eq!(OpcodeBank::from_prefix(0xED), Some(OpcodeBank::Ed));
        assert_eq!(OpcodeBank::from_prefix(0xFD), Some(OpcodeBank::Fd));
        assert_eq!(OpcodeBank::from_prefix(0x00), None);
        assert_eq!(OpcodeBank::from_prefix(0xC3), None);
    }

    #[test]
    fn prefix_and_from_prefix_agree_for_every_byte() {
        for byte in 0_u8..=u8::MAX {
            if let Some(bank) = OpcodeBank::from_prefix(byte) {
                assert_eq!(bank.prefix(), Some(byte));
                assert_eq!(bank.prefix_len(), 1);
            }
        }
        assert_eq!(OpcodeBank::Default.prefix(), None);
        assert_eq!(OpcodeBank::Default.prefix_len(), 0);
    }

    #[test]
    fn bank_indices_are_unique_and_dense() {
        let indices: HashSet<_> = OpcodeBank::ALL.iter().map(|bank| bank.index()).collect();
        assert_eq!(indices.len(), OpcodeBank::ALL.len());
        assert!(indices.iter().all(|index| *index < OpcodeBank::ALL.len()));
    }

    #[test]
    fn bank_display_is_the_prefix_in_hex() {
        assert_eq!(OpcodeBank::Default.to_string(), "00");
        assert_eq!(OpcodeBank::Cb.to_string(), "CB");
        assert_eq!(OpcodeBank::Fd.to_string(), "FD");
    }

    #[test]
    fn fields_decompose_bit_7_h() {
        // CB 7C = BIT 7, H
        let fields = OpcodeFields::from_byte(0x7C);
        assert_eq!((fields.x, fields.y, fields.z), (1, 7, 4));
        assert_eq!((fields.p, fields.q), (3, 1));
    }

    #[test]
    fn fields_roundtrip_for_every_opcode() {
        for opcode in 0_u8..=u8::MAX {
            let fields = OpcodeFields::from_byte(opcode);
            assert_eq!(OpcodeFields::opcode(fields.x, fields.y, fields.z), opcode);
            assert_eq!(fields.y, (fields.p << 1) | fields.q);
        }
    }
}
