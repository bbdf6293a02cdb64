//! L1 Scratchpad Memory.
//!
//! This module provides the flat, byte-addressable local memory the scalar core
//! loads from, stores to and performs atomics against. It provides:
//! 1. **Checked Access:** Every transfer is checked for alignment to its width, then for
//!    bounds, before any byte moves.
//! 2. **Width Classes:** Reads and writes in units of 8, 16, 32 and 128 bits, little-endian.
//! 3. **Harness Access:** Unaligned byte-slice peek/poke for test harnesses and program preloads.

use crate::common::addr::L1Addr;
use crate::common::data::WidthClass;
use crate::common::error::CoreError;

/// Flat L1 scratchpad.
///
/// Multi-byte values are stored little-endian: the byte at the lowest address is
/// the least significant. A 128-bit transfer therefore maps register `d` of a
/// group to bytes `addr..addr+4`, register `d+1` to `addr+4..addr+8`, and so on.
#[derive(Clone, PartialEq, Eq)]
pub struct Scratchpad {
    bytes: Vec<u8>,
}

impl Scratchpad {
    /// Creates a zero-filled scratchpad of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Size of the scratchpad in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the scratchpad has no storage.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Validates an access of `width` bytes at `addr` and returns its byte range start.
    ///
    /// Alignment is checked before bounds, so a misaligned address past the end
    /// reports `AlignmentFault`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    pub fn check(&self, addr: L1Addr, width: usize) -> Result<usize, CoreError> {
        if !addr.is_aligned(width) {
            return Err(CoreError::AlignmentFault { addr, width });
        }
        self.check_range(addr, width)
    }

    /// Bounds check without alignment.
    fn check_range(&self, addr: L1Addr, len: usize) -> Result<usize, CoreError> {
        let size = self.bytes.len();
        let fits = addr
            .val()
            .checked_add(len as u64)
            .is_some_and(|end| end <= size as u64);
        if !fits {
            return Err(CoreError::OutOfBounds {
                addr,
                width: len,
                size,
            });
        }
        Ok(addr.val() as usize)
    }

    /// Reads one transfer unit of `width` at `addr`, zero-extended to 128 bits.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    pub fn read(&self, addr: L1Addr, width: WidthClass) -> Result<u128, CoreError> {
        let start = self.check(addr, width.bytes())?;
        let mut buf = [0u8; 16];
        buf[..width.bytes()].copy_from_slice(&self.bytes[start..start + width.bytes()]);
        Ok(u128::from_le_bytes(buf))
    }

    /// Writes the low `width` bits of `value` at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    pub fn write(&mut self, addr: L1Addr, width: WidthClass, value: u128) -> Result<(), CoreError> {
        let start = self.check(addr, width.bytes())?;
        let buf = value.to_le_bytes();
        self.bytes[start..start + width.bytes()].copy_from_slice(&buf[..width.bytes()]);
        Ok(())
    }

    /// Reads an aligned byte.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfBounds`] past the end of the scratchpad.
    #[inline]
    pub fn read_u8(&self, addr: L1Addr) -> Result<u8, CoreError> {
        self.read(addr, WidthClass::Bits8).map(|v| v as u8)
    }

    /// Reads an aligned 16-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    #[inline]
    pub fn read_u16(&self, addr: L1Addr) -> Result<u16, CoreError> {
        self.read(addr, WidthClass::Bits16).map(|v| v as u16)
    }

    /// Reads an aligned 32-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    #[inline]
    pub fn read_u32(&self, addr: L1Addr) -> Result<u32, CoreError> {
        self.read(addr, WidthClass::Bits32).map(|v| v as u32)
    }

    /// Reads an aligned 128-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    #[inline]
    pub fn read_u128(&self, addr: L1Addr) -> Result<u128, CoreError> {
        self.read(addr, WidthClass::Bits128)
    }

    /// Writes an aligned byte.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfBounds`] past the end of the scratchpad.
    #[inline]
    pub fn write_u8(&mut self, addr: L1Addr, val: u8) -> Result<(), CoreError> {
        self.write(addr, WidthClass::Bits8, u128::from(val))
    }

    /// Writes an aligned 16-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    #[inline]
    pub fn write_u16(&mut self, addr: L1Addr, val: u16) -> Result<(), CoreError> {
        self.write(addr, WidthClass::Bits16, u128::from(val))
    }

    /// Writes an aligned 32-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    #[inline]
    pub fn write_u32(&mut self, addr: L1Addr, val: u32) -> Result<(), CoreError> {
        self.write(addr, WidthClass::Bits32, u128::from(val))
    }

    /// Writes an aligned 128-bit word.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlignmentFault`] or [`CoreError::OutOfBounds`].
    #[inline]
    pub fn write_u128(&mut self, addr: L1Addr, val: u128) -> Result<(), CoreError> {
        self.write(addr, WidthClass::Bits128, val)
    }

    /// Returns `len` bytes starting at `addr` without an alignment requirement.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfBounds`] if the range leaves the scratchpad.
    pub fn peek_bytes(&self, addr: L1Addr, len: usize) -> Result<&[u8], CoreError> {
        let start = self.check_range(addr, len)?;
        Ok(&self.bytes[start..start + len])
    }

    /// Copies `data` into the scratchpad at `addr` without an alignment requirement.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfBounds`] if the range leaves the scratchpad.
    pub fn load_bytes(&mut self, addr: L1Addr, data: &[u8]) -> Result<(), CoreError> {
        let start = self.check_range(addr, data.len())?;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl std::fmt::Debug for Scratchpad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scratchpad")
            .field("size", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
