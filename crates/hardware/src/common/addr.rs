//! Scratchpad Address type.
//!
//! This module defines a strong type for byte addresses into the L1 scratchpad. It provides:
//! 1. **Type Safety:** Keeps scratchpad byte addresses apart from register values and unit offsets.
//! 2. **Alignment Helpers:** Checks an address against the size of the transfer using it.
//! 3. **Formatting:** Renders addresses in the `0x0010` style used by traces and errors.

use std::fmt;

/// A byte address in the L1 scratchpad.
///
/// Addresses are produced by scaling a base register by 16 bytes and adding an
/// offset measured in units of the operation's width. They are kept 64 bits wide so
/// that `u32::MAX * 16` cannot wrap before the bounds check sees it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct L1Addr(pub u64);

impl L1Addr {
    /// Creates a new scratchpad address from a raw byte address.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw byte address.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns `true` if the address is a multiple of `bytes`.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Transfer size in bytes; must be a power of two.
    #[inline]
    pub const fn is_aligned(self, bytes: usize) -> bool {
        self.0 & (bytes as u64 - 1) == 0
    }

    /// Returns the address `bytes` further into the scratchpad.
    #[inline]
    #[must_use]
    pub const fn offset(self, bytes: u64) -> Self {
        Self(self.0.wrapping_add(bytes))
    }
}

impl fmt::Display for L1Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<u64> for L1Addr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}
