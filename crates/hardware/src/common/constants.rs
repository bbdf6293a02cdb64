//! Global Core Constants.
//!
//! This module defines the architectural constants shared across the model. It includes:
//! 1. **Addressing Constants:** Base-register scaling and atomic word sizes.
//! 2. **Register Constants:** Minimum register file size and group widths.
//! 3. **Atomic Constants:** Sub-word layout of the masked swap.
//! 4. **Wait Constants:** NOP counts used by the reference kernels to wait out a settle interval.

/// Bytes per unit of a base register value (`address = base * 16 + ...`).
pub const BASE_SCALE: u64 = 16;

/// Size in bytes of the word targeted by CAS, INCGET and INCGETPTR.
pub const ATOMIC_WORD_BYTES: u64 = 4;

/// Byte distance between the read pointer and the write pointer of a FIFO control pair.
pub const FIFO_WR_OFFSET: u64 = 4;

/// Smallest register file the core accepts.
pub const MIN_GPR_COUNT: usize = 64;

/// Registers in the group backing a 128-bit transfer.
pub const GROUP_REGS: usize = 4;

/// Number of 16-bit sub-words written by ATSWAP.
pub const SWAP_SUBWORDS: usize = 8;

/// Size in bytes of one ATSWAP sub-word.
pub const SWAP_SUBWORD_BYTES: u64 = 2;

/// Largest legal `int_width` selector (counter width `int_width + 1` = 32 bits).
pub const MAX_INT_WIDTH: u8 = 31;

/// NOPs issued by `WAIT_FOR_DMA` in the reference kernels.
pub const DMA_WAIT_NOPS: usize = 7;

/// NOPs issued by `WAIT_FOR_ATINCGET` in the reference kernels.
pub const ATINCGET_WAIT_NOPS: usize = 24;
