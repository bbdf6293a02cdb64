//! Instruction representation.
//!
//! Each instruction the scalar core accepts is one variant of [`Instruction`] carrying
//! a typed operand struct, so the dispatcher matches once and every unit receives
//! exactly the fields it needs. Operand order in the constructors follows the
//! instruction-issue macros (`TT_STOREIND`, `TT_ATCAS`, ...), minus the fields the
//! model does not interpret.
//!
//! Instructions are serializable so harness programs can be written as JSON:
//!
//! ```json
//! { "op": "store_ind", "width": 32, "offset_reg": 16, "offset_increment": 0,
//!   "data_reg": 0, "base_reg": 8 }
//! ```

use serde::{Deserialize, Serialize};

use crate::common::data::WidthClass;
use crate::core::units::alu::AluOp;

/// Writes one 16-bit half of a register (`SETDMAREG`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDmaReg {
    /// Half-register index: register `half_index / 2`, high half when odd.
    pub half_index: usize,
    /// Value written into the half.
    pub value: u16,
}

/// Synchronous register-to-register ALU operation (`ADDDMAREG` and friends).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmaRegAlu {
    /// Operation to perform.
    pub kind: AluOp,
    /// Destination register.
    pub result_reg: usize,
    /// Right-hand operand register.
    pub op_b: usize,
    /// Left-hand operand register.
    pub op_a: usize,
}

/// Operands of an indexed transfer (`STOREIND` / `LOADIND`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedTransfer {
    /// Transfer width class.
    pub width: WidthClass,
    /// Register holding the offset, in units of the width's byte size.
    pub offset_reg: usize,
    /// Amount added to the offset register once the transfer completes.
    #[serde(default)]
    pub offset_increment: u32,
    /// Source (store) or destination (load) register; first of four for 128-bit.
    pub data_reg: usize,
    /// Register whose value, times 16, forms the address base.
    pub base_reg: usize,
}

/// Operands of a compare-and-swap (`ATCAS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtCas {
    /// Value stored when the comparison holds.
    pub set_value: u32,
    /// Value the target word must hold.
    pub compare_value: u32,
    /// Word offset from the base (`address = base * 16 + offset * 4`).
    pub offset: u32,
    /// Base address register.
    pub base_reg: usize,
}

/// Operands of a masked increment-and-get (`ATINCGET`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtIncGet {
    /// Counter width selector; the counter is `int_width + 1` bits wide.
    pub int_width: u8,
    /// Word offset from the base.
    pub offset: u32,
    /// Supplies the increment at issue; receives the original value on completion.
    pub inout_reg: usize,
    /// Base address register.
    pub base_reg: usize,
}

/// Operands of a FIFO pointer increment-and-get (`ATINCGETPTR`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtIncGetPtr {
    /// Return the pointer without advancing it.
    #[serde(default)]
    pub no_increment: bool,
    /// Pointer advances by `2^increment_log2`.
    pub increment_log2: u8,
    /// FIFO capacity is `2^int_width`.
    pub int_width: u8,
    /// `0` targets the read pointer (pop), `1` the write pointer (push).
    pub offset: u8,
    /// Receives the pointer value before the increment.
    pub result_reg: usize,
    /// Base address register of the `Rd`/`Wr` control pair.
    pub base_reg: usize,
}

/// Operands of a masked 128-bit swap (`ATSWAP`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtSwap {
    /// Bit `i` selects 16-bit sub-word `i` for writing.
    pub mask: u8,
    /// First of the four registers supplying the 128-bit source.
    pub data_reg: usize,
    /// Base address register.
    pub base_reg: usize,
}

/// An instruction of the scalar core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// `SETDMAREG`: write a 16-bit register half.
    SetDmaReg(SetDmaReg),
    /// DMA-register ALU operation.
    DmaRegAlu(DmaRegAlu),
    /// `DMANOP`: one idle cycle.
    DmaNop,
    /// `STOREIND`: register(s) to scratchpad, asynchronous.
    StoreInd(IndexedTransfer),
    /// `LOADIND`: scratchpad to register(s), asynchronous.
    LoadInd(IndexedTransfer),
    /// `ATCAS`: compare-and-swap, blocking.
    AtCas(AtCas),
    /// `ATINCGET`: masked increment-and-get, asynchronous.
    AtIncGet(AtIncGet),
    /// `ATINCGETPTR`: FIFO pointer increment-and-get, blocking.
    AtIncGetPtr(AtIncGetPtr),
    /// `ATSWAP`: masked 128-bit swap, asynchronous.
    AtSwap(AtSwap),
}

impl Instruction {
    /// `SETDMAREG` writing `value` into half-register `half_index`.
    pub const fn set_dma_reg(value: u16, half_index: usize) -> Self {
        Self::SetDmaReg(SetDmaReg { half_index, value })
    }

    /// DMA-register ALU operation `result_reg = op_a <kind> op_b`.
    pub const fn dma_reg_alu(kind: AluOp, result_reg: usize, op_b: usize, op_a: usize) -> Self {
        Self::DmaRegAlu(DmaRegAlu {
            kind,
            result_reg,
            op_b,
            op_a,
        })
    }

    /// `STOREIND` of `data_reg` to `base_reg * 16 + offset_reg * width`.
    pub const fn store_ind(
        width: WidthClass,
        offset_reg: usize,
        offset_increment: u32,
        data_reg: usize,
        base_reg: usize,
    ) -> Self {
        Self::StoreInd(IndexedTransfer {
            width,
            offset_reg,
            offset_increment,
            data_reg,
            base_reg,
        })
    }

    /// `LOADIND` into `data_reg` from `base_reg * 16 + offset_reg * width`.
    pub const fn load_ind(
        width: WidthClass,
        offset_reg: usize,
        offset_increment: u32,
        data_reg: usize,
        base_reg: usize,
    ) -> Self {
        Self::LoadInd(IndexedTransfer {
            width,
            offset_reg,
            offset_increment,
            data_reg,
            base_reg,
        })
    }

    /// `ATCAS` at `base_reg * 16 + offset * 4`.
    pub const fn at_cas(set_value: u32, compare_value: u32, offset: u32, base_reg: usize) -> Self {
        Self::AtCas(AtCas {
            set_value,
            compare_value,
            offset,
            base_reg,
        })
    }

    /// `ATINCGET` at `base_reg * 16 + offset * 4`.
    pub const fn at_inc_get(int_width: u8, offset: u32, inout_reg: usize, base_reg: usize) -> Self {
        Self::AtIncGet(AtIncGet {
            int_width,
            offset,
            inout_reg,
            base_reg,
        })
    }

    /// `ATINCGETPTR` on the control pair at `base_reg * 16`.
    pub const fn at_inc_get_ptr(
        no_increment: bool,
        increment_log2: u8,
        int_width: u8,
        offset: u8,
        result_reg: usize,
        base_reg: usize,
    ) -> Self {
        Self::AtIncGetPtr(AtIncGetPtr {
            no_increment,
            increment_log2,
            int_width,
            offset,
            result_reg,
            base_reg,
        })
    }

    /// `ATSWAP` of the group at `data_reg` into `base_reg * 16`.
    pub const fn at_swap(mask: u8, data_reg: usize, base_reg: usize) -> Self {
        Self::AtSwap(AtSwap {
            mask,
            data_reg,
            base_reg,
        })
    }

    /// Returns `true` for instructions whose effect lands after a settle interval.
    pub const fn is_async(&self) -> bool {
        matches!(
            self,
            Self::StoreInd(_) | Self::LoadInd(_) | Self::AtIncGet(_) | Self::AtSwap(_)
        )
    }

    /// Returns `true` for instructions that can suspend the stream.
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::AtCas(_) | Self::AtIncGetPtr(_))
    }
}
