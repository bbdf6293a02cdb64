//! Transfer Width Classes.
//!
//! Every indexed load/store names one of four width classes. The class decides:
//! 1. **Address Scaling:** The offset register counts units of the class's byte size.
//! 2. **Alignment:** Effective addresses must be a multiple of the byte size.
//! 3. **Register Footprint:** 8/16/32-bit transfers use one register, 128-bit transfers use four.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::constants::GROUP_REGS;

/// Width of an indexed scratchpad transfer.
///
/// Serialized as the bit count (`8`, `16`, `32` or `128`) so program files read
/// the same way the instruction operands are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum WidthClass {
    /// 8-bit transfer, zero-extended into the low byte of one register.
    Bits8,
    /// 16-bit transfer, zero-extended into the low half of one register.
    Bits16,
    /// 32-bit transfer of one full register.
    Bits32,
    /// 128-bit transfer of a group of four consecutive registers.
    Bits128,
}

impl WidthClass {
    /// All width classes, narrowest first.
    pub const ALL: [Self; 4] = [Self::Bits8, Self::Bits16, Self::Bits32, Self::Bits128];

    /// Size of one transfer unit in bytes.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits8 => 1,
            Self::Bits16 => 2,
            Self::Bits32 => 4,
            Self::Bits128 => 16,
        }
    }

    /// Size of one transfer unit in bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    /// Number of registers a transfer of this width reads or writes.
    #[inline]
    pub const fn registers(self) -> usize {
        match self {
            Self::Bits128 => GROUP_REGS,
            _ => 1,
        }
    }

    /// Mask selecting the low `bits()` bits of a 128-bit value.
    #[inline]
    pub const fn value_mask(self) -> u128 {
        match self {
            Self::Bits128 => u128::MAX,
            _ => (1u128 << self.bits()) - 1,
        }
    }
}

impl TryFrom<u32> for WidthClass {
    type Error = String;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bits8),
            16 => Ok(Self::Bits16),
            32 => Ok(Self::Bits32),
            128 => Ok(Self::Bits128),
            other => Err(format!("unsupported transfer width {other} (expected 8, 16, 32 or 128)")),
        }
    }
}

impl From<WidthClass> for u32 {
    fn from(width: WidthClass) -> Self {
        width.bits()
    }
}

impl fmt::Display for WidthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}
