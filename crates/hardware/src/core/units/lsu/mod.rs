//! Load/Store Unit (LSU).
//!
//! This module provides the indexed load/store engine of the scalar core and the
//! atomic unit beside it:
//! - [`Lsu`]: effective-address computation and staging of `STOREIND`/`LOADIND`
//!   into settle-queue completions.
//! - [`atomic`]: the ATCAS/ATINCGET/ATINCGETPTR/ATSWAP primitives.
//!
//! Staging validates every register and address the transfer will touch, so a
//! staged completion never faults when it is applied.

/// Atomic read-modify-write primitives and the in-flight request state machine.
pub mod atomic;

use crate::common::addr::L1Addr;
use crate::common::constants::{ATOMIC_WORD_BYTES, BASE_SCALE};
use crate::common::data::WidthClass;
use crate::common::error::CoreError;
use crate::core::arch::gpr::RegisterFile;
use crate::core::pipeline::settle::{Completion, OffsetAdvance};
use crate::isa::instruction::IndexedTransfer;
use crate::soc::memory::Scratchpad;

/// Indexed load/store unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lsu;

impl Lsu {
    /// Address of an indexed transfer: `base * 16 + offset * width_bytes`.
    ///
    /// Computed in 64 bits, so no register value can wrap the address.
    ///
    /// # Examples
    ///
    /// ```
    /// use l1sim_core::common::WidthClass;
    /// use l1sim_core::core::units::lsu::Lsu;
    ///
    /// assert_eq!(Lsu::effective_address(2, 3, WidthClass::Bits32).val(), 2 * 16 + 3 * 4);
    /// assert_eq!(Lsu::effective_address(1, 1, WidthClass::Bits128).val(), 32);
    /// ```
    pub const fn effective_address(base: u32, offset: u32, width: WidthClass) -> L1Addr {
        L1Addr::new(base as u64 * BASE_SCALE + offset as u64 * width.bytes() as u64)
    }

    /// Address of an atomic word: `base * 16 + offset * 4`.
    pub const fn atomic_address(base: u32, offset: u32) -> L1Addr {
        L1Addr::new(base as u64 * BASE_SCALE + offset as u64 * ATOMIC_WORD_BYTES)
    }

    /// Data registers a transfer of `width` touches, starting at `op.data_reg`.
    fn check_data_regs(op: &IndexedTransfer, regs: &RegisterFile) -> Result<(), CoreError> {
        regs.check_range(op.data_reg, op.width.registers())
    }

    fn advance(op: &IndexedTransfer) -> Option<OffsetAdvance> {
        (op.offset_increment != 0).then_some(OffsetAdvance {
            reg: op.offset_reg,
            by: op.offset_increment,
        })
    }

    fn address(op: &IndexedTransfer, regs: &RegisterFile) -> Result<L1Addr, CoreError> {
        let base = regs.read(op.base_reg)?;
        let offset = regs.read(op.offset_reg)?;
        Ok(Self::effective_address(base, offset, op.width))
    }

    /// Validates a `STOREIND` and samples its source data.
    ///
    /// The low `width` bits of `data_reg` (or the whole four-register group for
    /// 128-bit) are captured now; later writes to those registers do not affect
    /// the store.
    ///
    /// # Errors
    ///
    /// `InvalidRegister` for any missing register, `AlignmentFault` or
    /// `OutOfBounds` for the effective address.
    pub fn stage_store(
        op: &IndexedTransfer,
        regs: &RegisterFile,
        l1: &Scratchpad,
    ) -> Result<Completion, CoreError> {
        Self::check_data_regs(op, regs)?;
        let addr = Self::address(op, regs)?;
        let _ = l1.check(addr, op.width.bytes())?;

        let data = if op.width == WidthClass::Bits128 {
            regs.read_wide(op.data_reg)?
        } else {
            u128::from(regs.read(op.data_reg)?) & op.width.value_mask()
        };

        Ok(Completion::Store {
            addr,
            width: op.width,
            data,
            advance: Self::advance(op),
        })
    }

    /// Validates a `LOADIND` and reads the scratchpad.
    ///
    /// Memory is sampled now; the destination register changes only when the
    /// completion applies. A store still settling at the same address is therefore
    /// not observed. Sub-32-bit loads zero-extend into the destination.
    ///
    /// # Errors
    ///
    /// `InvalidRegister` for any missing register, `AlignmentFault` or
    /// `OutOfBounds` for the effective address.
    pub fn stage_load(
        op: &IndexedTransfer,
        regs: &RegisterFile,
        l1: &Scratchpad,
    ) -> Result<Completion, CoreError> {
        Self::check_data_regs(op, regs)?;
        let addr = Self::address(op, regs)?;
        let data = l1.read(addr, op.width)?;

        Ok(Completion::Load {
            addr,
            width: op.width,
            data,
            dest: op.data_reg,
            advance: Self::advance(op),
        })
    }
}
