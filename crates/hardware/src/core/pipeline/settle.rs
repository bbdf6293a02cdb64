//! Settle queue for asynchronous completions.
//!
//! Indexed loads and stores, ATINCGET and ATSWAP return to the instruction stream
//! at once, but their effects land only after a settle interval. The queue holds
//! those effects until then and provides:
//! 1. **Scheduling:** Each completion is stamped with the cycle it becomes visible.
//! 2. **Ordering:** Completions drain in ascending ready cycle; equal cycles drain in
//!    issue order.
//! 3. **Application:** A drained completion applies all of its effects (memory,
//!    register writeback, offset advance) as one step.

use std::collections::VecDeque;

use crate::common::addr::L1Addr;
use crate::common::data::WidthClass;
use crate::common::error::CoreError;
use crate::core::arch::gpr::RegisterFile;
use crate::core::units::lsu::atomic::{AtomicKind, AtomicRequest};
use crate::soc::memory::Scratchpad;

/// Offset-register advance applied when an indexed transfer completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetAdvance {
    /// Offset register to advance.
    pub reg: usize,
    /// Amount added, in offset units.
    pub by: u32,
}

/// Deferred effect of an asynchronous instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Indexed store: data was sampled at issue.
    Store {
        /// Effective address.
        addr: L1Addr,
        /// Transfer width.
        width: WidthClass,
        /// Value to write (low `width` bits).
        data: u128,
        /// Offset advance, if any.
        advance: Option<OffsetAdvance>,
    },
    /// Indexed load: memory was read at issue; the register writeback is deferred.
    Load {
        /// Effective address.
        addr: L1Addr,
        /// Transfer width.
        width: WidthClass,
        /// Value read, zero-extended.
        data: u128,
        /// Destination register (first of four for 128-bit).
        dest: usize,
        /// Offset advance, if any.
        advance: Option<OffsetAdvance>,
    },
    /// ATINCGET or ATSWAP.
    Atomic(AtomicRequest),
}

impl Completion {
    /// Short name for tracing.
    pub fn label(&self) -> String {
        match self {
            Self::Store { width, .. } => format!("STOREIND.{width}"),
            Self::Load { width, .. } => format!("LOADIND.{width}"),
            Self::Atomic(req) => req.kind().to_string(),
        }
    }

    /// Atomic kind carried by this completion, if any.
    pub const fn atomic_kind(&self) -> Option<AtomicKind> {
        match self {
            Self::Atomic(req) => Some(req.kind()),
            _ => None,
        }
    }

    /// Applies the completion's effects.
    ///
    /// Loads write the destination before the offset register advances, so a load
    /// whose destination is also its offset register ends up advanced. Offset
    /// advances wrap at 32 bits.
    ///
    /// # Errors
    ///
    /// Propagates scratchpad or register errors. Operands are validated at issue,
    /// so this only fails for hand-built completions.
    pub fn apply(self, l1: &mut Scratchpad, regs: &mut RegisterFile) -> Result<(), CoreError> {
        let advance = match self {
            Self::Store {
                addr,
                width,
                data,
                advance,
            } => {
                l1.write(addr, width, data)?;
                advance
            }
            Self::Load {
                width,
                data,
                dest,
                advance,
                ..
            } => {
                if width == WidthClass::Bits128 {
                    regs.write_wide(dest, data)?;
                } else {
                    regs.write(dest, data as u32)?;
                }
                advance
            }
            Self::Atomic(mut req) => {
                let _ = req.attempt(l1, regs)?;
                None
            }
        };

        if let Some(OffsetAdvance { reg, by }) = advance {
            let current = regs.read(reg)?;
            regs.write(reg, current.wrapping_add(by))?;
        }
        Ok(())
    }
}

/// A completion waiting for its ready cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingCompletion {
    /// Issue sequence number; breaks ties between equal ready cycles.
    pub seq: u64,
    /// Cycle at which the effect becomes visible.
    pub ready_at: u64,
    /// The deferred effect.
    pub completion: Completion,
}

/// Queue of pending completions ordered by `(ready_at, seq)`.
#[derive(Clone, Debug, Default)]
pub struct SettleQueue {
    entries: VecDeque<PendingCompletion>,
    next_seq: u64,
}

impl SettleQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pending completions.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedules `completion` to become visible at `ready_at`.
    pub fn push(&mut self, ready_at: u64, completion: Completion) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let pos = self
            .entries
            .partition_point(|e| (e.ready_at, e.seq) <= (ready_at, seq));
        self.entries.insert(
            pos,
            PendingCompletion {
                seq,
                ready_at,
                completion,
            },
        );
    }

    /// Removes and returns the oldest completion whose ready cycle is `<= now`.
    pub fn pop_ready(&mut self, now: u64) -> Option<PendingCompletion> {
        if self.entries.front()?.ready_at <= now {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Ready cycle of the next completion to drain.
    pub fn next_ready_at(&self) -> Option<u64> {
        self.entries.front().map(|e| e.ready_at)
    }

    /// Cycle by which every pending completion will have drained.
    pub fn last_ready_at(&self) -> Option<u64> {
        self.entries.back().map(|e| e.ready_at)
    }

    /// Iterates pending completions in drain order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingCompletion> {
        self.entries.iter()
    }
}
