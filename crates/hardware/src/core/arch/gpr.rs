//! General-Purpose Register File.
//!
//! This module implements the bank of 32-bit general-purpose registers (GPRs) the
//! scalar core stages addresses and values in. It performs the following:
//! 1. **Storage:** Maintains a configurable number of untyped 32-bit registers.
//! 2. **Bounds Enforcement:** Rejects indices outside the bank with `InvalidRegister`.
//! 3. **Group Access:** Reads and writes runs of consecutive registers, including the
//!    four-register group that backs a 128-bit transfer.
//! 4. **Half Access:** Writes one 16-bit half of a register (SETDMAREG addressing).

use std::fmt;

use crate::common::constants::GROUP_REGS;
use crate::common::error::CoreError;

/// General-purpose register file.
///
/// Registers carry no type; signedness and sub-word interpretation belong to the
/// instruction consuming them. No register is hardwired to zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    regs: Vec<u32>,
}

impl RegisterFile {
    /// Creates a register file of `count` registers, all zero.
    pub fn new(count: usize) -> Self {
        Self {
            regs: vec![0; count],
        }
    }

    /// Number of registers in the file.
    #[inline]
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Returns `true` if the file holds no registers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Checks that `count` registers starting at `start` all exist.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRegister`] naming the first missing index.
    pub fn check_range(&self, start: usize, count: usize) -> Result<(), CoreError> {
        let last = start.saturating_add(count.max(1) - 1);
        if last >= self.regs.len() {
            let index = if start >= self.regs.len() { start } else { self.regs.len() };
            return Err(CoreError::InvalidRegister {
                index,
                count: self.regs.len(),
            });
        }
        Ok(())
    }

    /// Reads a register.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRegister`] if `idx` is out of range.
    #[inline]
    pub fn read(&self, idx: usize) -> Result<u32, CoreError> {
        self.regs
            .get(idx)
            .copied()
            .ok_or(CoreError::InvalidRegister {
                index: idx,
                count: self.regs.len(),
            })
    }

    /// Writes a register.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRegister`] if `idx` is out of range.
    #[inline]
    pub fn write(&mut self, idx: usize, val: u32) -> Result<(), CoreError> {
        let count = self.regs.len();
        let slot = self
            .regs
            .get_mut(idx)
            .ok_or(CoreError::InvalidRegister { index: idx, count })?;
        *slot = val;
        Ok(())
    }

    /// Reads `N` consecutive registers starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRegister`] if any register of the run is missing.
    pub fn read_group<const N: usize>(&self, start: usize) -> Result<[u32; N], CoreError> {
        self.check_range(start, N)?;
        let mut out = [0u32; N];
        out.copy_from_slice(&self.regs[start..start + N]);
        Ok(out)
    }

    /// Writes `values` into consecutive registers starting at `start`.
    ///
    /// Nothing is written unless the whole run fits.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRegister`] if any register of the run is missing.
    pub fn write_group(&mut self, start: usize, values: &[u32]) -> Result<(), CoreError> {
        self.check_range(start, values.len())?;
        self.regs[start..start + values.len()].copy_from_slice(values);
        Ok(())
    }

    /// Reads the four-register group at `start` as one 128-bit value.
    ///
    /// Register `start` supplies the least significant 32 bits.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRegister`] if the group does not fit.
    pub fn read_wide(&self, start: usize) -> Result<u128, CoreError> {
        let words = self.read_group::<GROUP_REGS>(start)?;
        Ok(words
            .iter()
            .rev()
            .fold(0u128, |acc, &w| (acc << 32) | u128::from(w)))
    }

    /// Writes a 128-bit value across the four-register group at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRegister`] if the group does not fit.
    pub fn write_wide(&mut self, start: usize, value: u128) -> Result<(), CoreError> {
        let mut words = [0u32; GROUP_REGS];
        for (i, word) in words.iter_mut().enumerate() {
            *word = (value >> (32 * i)) as u32;
        }
        self.write_group(start, &words)
    }

    /// Writes one 16-bit half of a register.
    ///
    /// `half_index` addresses the file in 16-bit units: register `half_index / 2`,
    /// low half when even, high half when odd. The other half is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRegister`] if the containing register is missing.
    pub fn write_half(&mut self, half_index: usize, value: u16) -> Result<(), CoreError> {
        let idx = half_index / 2;
        let current = self.read(idx)?;
        let shift = if half_index % 2 == 0 { 0 } else { 16 };
        let merged = (current & !(0xFFFF << shift)) | (u32::from(value) << shift);
        self.write(idx, merged)
    }

    /// Returns all register values in index order.
    pub fn as_slice(&self) -> &[u32] {
        &self.regs
    }
}

impl fmt::Display for RegisterFile {
    /// Dumps the register file four registers per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.regs.chunks(4).enumerate() {
            for (col, val) in chunk.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "r{:<2}={:#010x}", row * 4 + col, val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
