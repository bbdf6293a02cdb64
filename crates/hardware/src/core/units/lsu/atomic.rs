//! Atomic read-modify-write unit.
//!
//! Implements the four scratchpad atomics of the scalar core:
//! 1. **ATCAS:** Compare-and-swap. Blocks (retrying) until the target word equals the
//!    compare value, then stores the set value.
//! 2. **ATINCGET:** Increment-and-get confined to the low `int_width + 1` bits of a word.
//! 3. **ATINCGETPTR:** FIFO pointer increment-and-get. The legality check reads both
//!    pointers of an `Rd`/`Wr` pair; the mutation touches only the targeted one.
//! 4. **ATSWAP:** Masked write of up to eight 16-bit sub-words as one batch.
//!
//! Each in-flight operation is an [`AtomicRequest`]. One call to
//! [`AtomicRequest::attempt`] is one indivisible check-and-commit against the
//! scratchpad; nothing else touches memory between the check and the store. A failed
//! check leaves the request `Blocked`; there is no failed terminal state.

use std::fmt;

use crate::common::addr::L1Addr;
use crate::common::constants::{FIFO_WR_OFFSET, MAX_INT_WIDTH, SWAP_SUBWORD_BYTES, SWAP_SUBWORDS};
use crate::common::error::CoreError;
use crate::core::arch::gpr::RegisterFile;
use crate::soc::memory::Scratchpad;

/// The atomic primitive an instruction invokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtomicKind {
    /// Compare-and-swap.
    Cas,
    /// Masked increment-and-get.
    IncGet,
    /// FIFO pointer increment-and-get.
    IncGetPtr,
    /// Masked 128-bit swap.
    Swap,
}

impl fmt::Display for AtomicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cas => "ATCAS",
            Self::IncGet => "ATINCGET",
            Self::IncGetPtr => "ATINCGETPTR",
            Self::Swap => "ATSWAP",
        })
    }
}

/// Lifecycle of an atomic request.
///
/// `Issued → Checking → (Blocked ⇄ Checking) → Committed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AtomicState {
    /// Accepted from the instruction stream, not yet evaluated.
    #[default]
    Issued,
    /// Condition being evaluated against the scratchpad.
    Checking,
    /// Condition false at the last attempt; waiting for the next retry slot.
    Blocked,
    /// Memory (and result register, if any) updated.
    Committed,
}

/// Pointer of a FIFO control pair targeted by ATINCGETPTR.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FifoPointer {
    /// `Rd`, at the base of the pair. Advancing it pops; requires a non-empty FIFO.
    Read,
    /// `Wr`, four bytes above the base. Advancing it pushes; requires a non-full FIFO.
    Write,
}

impl FifoPointer {
    /// Byte offset of the pointer word from the pair's base.
    pub const fn byte_offset(self) -> u64 {
        match self {
            Self::Read => 0,
            Self::Write => FIFO_WR_OFFSET,
        }
    }
}

impl TryFrom<u8> for FifoPointer {
    type Error = CoreError;

    fn try_from(offset: u8) -> Result<Self, Self::Error> {
        match offset {
            0 => Ok(Self::Read),
            1 => Ok(Self::Write),
            other => Err(CoreError::InvalidOperand {
                name: "offset",
                value: u64::from(other),
                reason: "ATINCGETPTR offset must be 0 (read pointer) or 1 (write pointer)",
            }),
        }
    }
}

/// Operation-specific payload of an atomic request.
///
/// Register sources are sampled when the request is built; only destination
/// register indices are carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtomicOp {
    /// Compare-and-swap.
    Cas {
        /// Value stored on success.
        set_value: u32,
        /// Value the target word must hold.
        compare_value: u32,
    },
    /// Masked increment-and-get.
    IncGet {
        /// Increment sampled from the in/out register at issue.
        increment: u32,
        /// Counter width selector (`int_width + 1` bits).
        int_width: u8,
        /// Receives the original word.
        inout_reg: usize,
    },
    /// FIFO pointer increment-and-get.
    IncGetPtr {
        /// Pointer to advance.
        pointer: FifoPointer,
        /// Amount added to the pointer (`2^increment_log2`).
        increment: u32,
        /// Read the pointer without writing it back.
        no_increment: bool,
        /// FIFO capacity selector (`2^int_width` entries).
        int_width: u8,
        /// Receives the pointer value before the increment.
        result_reg: usize,
    },
    /// Masked 128-bit swap.
    Swap {
        /// Sub-word select mask.
        mask: u8,
        /// 128-bit source sampled from the register group at issue.
        data: u128,
    },
}

/// An atomic operation in flight between issue and commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtomicRequest {
    /// What to do.
    pub op: AtomicOp,
    /// Target word for CAS/INCGET, pair base for INCGETPTR, region base for ATSWAP.
    pub addr: L1Addr,
    /// Current lifecycle state.
    pub state: AtomicState,
    /// Number of check-and-commit attempts made so far.
    pub attempts: u64,
    /// Cycle at which the request was issued.
    pub issued_at: u64,
}

impl AtomicRequest {
    /// Creates a request in the `Issued` state.
    pub const fn new(op: AtomicOp, addr: L1Addr, issued_at: u64) -> Self {
        Self {
            op,
            addr,
            state: AtomicState::Issued,
            attempts: 0,
            issued_at,
        }
    }

    /// The primitive this request invokes.
    pub const fn kind(&self) -> AtomicKind {
        match self.op {
            AtomicOp::Cas { .. } => AtomicKind::Cas,
            AtomicOp::IncGet { .. } => AtomicKind::IncGet,
            AtomicOp::IncGetPtr { .. } => AtomicKind::IncGetPtr,
            AtomicOp::Swap { .. } => AtomicKind::Swap,
        }
    }

    /// Returns `true` once the request has committed.
    pub fn is_committed(&self) -> bool {
        self.state == AtomicState::Committed
    }

    /// Performs one indivisible check-and-commit.
    ///
    /// Returns the resulting state: `Committed` if memory was updated, `Blocked` if
    /// the condition did not hold (memory and registers untouched). INCGET and
    /// ATSWAP have no condition and always commit.
    ///
    /// # Errors
    ///
    /// Propagates scratchpad or register errors; addresses are validated at issue,
    /// so these only arise if the request was built by hand.
    pub fn attempt(
        &mut self,
        l1: &mut Scratchpad,
        regs: &mut RegisterFile,
    ) -> Result<AtomicState, CoreError> {
        self.state = AtomicState::Checking;
        self.attempts += 1;

        let committed = match self.op {
            AtomicOp::Cas {
                set_value,
                compare_value,
            } => {
                if l1.read_u32(self.addr)? == compare_value {
                    l1.write_u32(self.addr, set_value)?;
                    true
                } else {
                    false
                }
            }
            AtomicOp::IncGet {
                increment,
                int_width,
                inout_reg,
            } => {
                let original = l1.read_u32(self.addr)?;
                l1.write_u32(self.addr, masked_increment(original, increment, int_width))?;
                regs.write(inout_reg, original)?;
                true
            }
            AtomicOp::IncGetPtr {
                pointer,
                increment,
                no_increment,
                int_width,
                result_reg,
            } => {
                let rd = l1.read_u32(self.addr)?;
                let wr = l1.read_u32(self.addr.offset(FIFO_WR_OFFSET))?;
                let size = fifo_size(rd, wr, int_width);
                if fifo_can_advance(pointer, size, int_width) {
                    let target = self.addr.offset(pointer.byte_offset());
                    let original = l1.read_u32(target)?;
                    if !no_increment {
                        l1.write_u32(target, original.wrapping_add(increment))?;
                    }
                    regs.write(result_reg, original)?;
                    true
                } else {
                    false
                }
            }
            AtomicOp::Swap { mask, data } => {
                for i in (0..SWAP_SUBWORDS).filter(|i| mask & (1 << i) != 0) {
                    let addr = self.addr.offset(i as u64 * SWAP_SUBWORD_BYTES);
                    l1.write_u16(addr, swap_subword(data, i))?;
                }
                true
            }
        };

        self.state = if committed {
            AtomicState::Committed
        } else {
            AtomicState::Blocked
        };
        Ok(self.state)
    }
}

/// Mask selecting the low `int_width + 1` bits of a word.
///
/// Selectors of 31 and above select the whole word.
///
/// # Examples
///
/// ```
/// use l1sim_core::core::units::lsu::atomic::int_mask;
///
/// assert_eq!(int_mask(7), 0xFF);
/// assert_eq!(int_mask(15), 0xFFFF);
/// assert_eq!(int_mask(31), 0xFFFF_FFFF);
/// assert_eq!(int_mask(255), 0xFFFF_FFFF);
/// ```
pub const fn int_mask(int_width: u8) -> u32 {
    if int_width >= MAX_INT_WIDTH {
        u32::MAX
    } else {
        (2u32 << int_width) - 1
    }
}

/// New value of an ATINCGET target word.
///
/// The sum wraps within the low `int_width + 1` bits; the bits above them keep the
/// original word's value, so neighbouring packed counters are untouched.
pub const fn masked_increment(original: u32, increment: u32, int_width: u8) -> u32 {
    let mask = int_mask(int_width);
    (original.wrapping_add(increment) & mask) | (original & !mask)
}

/// Occupancy of a FIFO whose pointers are `int_width + 1`-bit counters.
pub const fn fifo_size(rd: u32, wr: u32, int_width: u8) -> u32 {
    wr.wrapping_sub(rd) & int_mask(int_width)
}

/// Capacity of a FIFO with selector `int_width`.
///
/// Selectors above 32 are treated as 32, one past the largest counter width.
pub const fn fifo_capacity(int_width: u8) -> u64 {
    let width = if int_width > 32 { 32 } else { int_width };
    1u64 << width
}

/// Whether `pointer` may advance given the FIFO's current `size`.
///
/// The write pointer needs room (`size < capacity`); the read pointer needs an
/// entry (`size != 0`).
pub const fn fifo_can_advance(pointer: FifoPointer, size: u32, int_width: u8) -> bool {
    match pointer {
        FifoPointer::Write => (size as u64) < fifo_capacity(int_width),
        FifoPointer::Read => size != 0,
    }
}

/// Sub-word `i` (bits `16i..16i+16`) of a 128-bit swap source.
///
/// # Panics
///
/// Panics if `i` is 8 or more.
pub const fn swap_subword(data: u128, i: usize) -> u16 {
    (data >> (16 * i)) as u16
}
