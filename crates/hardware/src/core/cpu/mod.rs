//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, the execution context of one
//! scalar core. It coordinates the following:
//! 1. **State Management:** Owns the register file, the L1 scratchpad and the logical clock.
//! 2. **Asynchronous Completion:** Holds the settle queue of in-flight loads, stores and atomics.
//! 3. **Blocking Atomics:** Holds the single CAS/INCGETPTR the stream may be suspended on.
//! 4. **Statistics:** Counts issued instructions, completions and atomic retries.

/// Instruction dispatch and the per-cycle clock.
pub mod execution;

pub use execution::IssueOutcome;

use crate::config::{Config, TimingConfig};
use crate::core::arch::gpr::RegisterFile;
use crate::core::pipeline::settle::SettleQueue;
use crate::core::units::lsu::atomic::AtomicRequest;
use crate::soc::memory::Scratchpad;
use crate::stats::SimStats;

/// Main CPU structure containing all core state.
///
/// The instruction stream is fed through [`Cpu::issue`]; every issue costs one
/// cycle. Harness code may read or write `regs` and `l1` directly between issues,
/// which is how tests stand in for another core touching shared memory.
#[derive(Debug)]
pub struct Cpu {
    /// General-purpose registers.
    pub regs: RegisterFile,
    /// L1 scratchpad.
    pub l1: Scratchpad,
    /// Logical clock; starts at zero.
    pub cycle: u64,
    /// Performance statistics.
    pub stats: SimStats,
    /// Log every issued instruction at `info` level.
    pub trace: bool,

    timing: TimingConfig,
    settle: SettleQueue,
    blocked: Option<AtomicRequest>,
    next_attempt_at: u64,
}

impl Cpu {
    /// Creates a CPU from a configuration.
    ///
    /// The configuration is assumed valid; [`Config::from_json`] and
    /// [`Config::validate`] enforce that.
    pub fn new(config: &Config) -> Self {
        Self {
            regs: RegisterFile::new(config.core.gpr_count),
            l1: Scratchpad::new(config.core.l1_size),
            cycle: 0,
            stats: SimStats::default(),
            trace: config.general.trace_instructions || cfg!(feature = "always-trace"),
            timing: config.timing.clone(),
            settle: SettleQueue::new(),
            blocked: None,
            next_attempt_at: 0,
        }
    }

    /// Timing parameters this CPU was built with.
    pub const fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// The atomic the stream is suspended on, if any.
    pub const fn blocked_request(&self) -> Option<&AtomicRequest> {
        self.blocked.as_ref()
    }

    /// Returns `true` while a CAS or INCGETPTR waits for its condition.
    pub const fn is_blocked(&self) -> bool {
        self.blocked.is_some()
    }

    /// Completions issued but not yet visible.
    pub const fn pending(&self) -> &SettleQueue {
        &self.settle
    }

    /// Returns `true` when nothing is pending and nothing is blocked.
    pub fn is_quiescent(&self) -> bool {
        self.settle.is_empty() && self.blocked.is_none()
    }
}
