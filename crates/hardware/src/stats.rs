//! Simulation statistics collection and reporting.
//!
//! This module tracks activity counters for the scalar core. It provides:
//! 1. **Cycles and issue:** Total cycles, issued instructions, NOPs and asynchronous issues.
//! 2. **Completions:** Settle-queue entries applied.
//! 3. **Atomics:** Attempts, retries, cycles spent blocked, and commits per primitive.

use std::time::Instant;

use crate::core::units::lsu::atomic::AtomicKind;

/// Simulation statistics structure tracking all activity counters.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Logical cycles elapsed.
    pub cycles: u64,
    /// Instructions accepted from the stream.
    pub instructions_issued: u64,
    /// Of those, instructions with a settle interval.
    pub async_issued: u64,
    /// DMANOPs issued.
    pub nops: u64,
    /// Asynchronous completions applied.
    pub completions_applied: u64,

    /// Atomic check-and-commit attempts, including the first.
    pub atomic_attempts: u64,
    /// Attempts made after a blocking atomic's first failure.
    pub atomic_retries: u64,
    /// Idle ticks spent with the stream blocked.
    pub blocked_cycles: u64,

    /// ATCAS commits.
    pub cas_commits: u64,
    /// ATINCGET commits.
    pub incget_commits: u64,
    /// ATINCGETPTR commits.
    pub incgetptr_commits: u64,
    /// ATSWAP commits.
    pub swap_commits: u64,
}

impl Default for SimStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_issued: 0,
            async_issued: 0,
            nops: 0,
            completions_applied: 0,
            atomic_attempts: 0,
            atomic_retries: 0,
            blocked_cycles: 0,
            cas_commits: 0,
            incget_commits: 0,
            incgetptr_commits: 0,
            swap_commits: 0,
        }
    }
}

impl SimStats {
    /// Counts one commit of `kind`.
    pub fn record_commit(&mut self, kind: AtomicKind) {
        match kind {
            AtomicKind::Cas => self.cas_commits += 1,
            AtomicKind::IncGet => self.incget_commits += 1,
            AtomicKind::IncGetPtr => self.incgetptr_commits += 1,
            AtomicKind::Swap => self.swap_commits += 1,
        }
    }

    /// Commits of `kind` so far.
    pub const fn commits(&self, kind: AtomicKind) -> u64 {
        match kind {
            AtomicKind::Cas => self.cas_commits,
            AtomicKind::IncGet => self.incget_commits,
            AtomicKind::IncGetPtr => self.incgetptr_commits,
            AtomicKind::Swap => self.swap_commits,
        }
    }

    /// Prints all statistics to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1);

        println!("\n==========================================================");
        println!("SCRATCHPAD CORE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions_issued);
        println!(
            "sim_ipc                  {:.4}",
            self.instructions_issued as f64 / cyc as f64
        );
        println!("----------------------------------------------------------");
        println!("ISSUE");
        println!("  op.async               {}", self.async_issued);
        println!("  op.nop                 {}", self.nops);
        println!("  completions            {}", self.completions_applied);
        println!("----------------------------------------------------------");
        println!("ATOMICS");
        println!("  attempts               {}", self.atomic_attempts);
        println!("  retries                {}", self.atomic_retries);
        println!(
            "  cycles.blocked         {} ({:.2}%)",
            self.blocked_cycles,
            (self.blocked_cycles as f64 / cyc as f64) * 100.0
        );
        for kind in [
            AtomicKind::Cas,
            AtomicKind::IncGet,
            AtomicKind::IncGetPtr,
            AtomicKind::Swap,
        ] {
            println!("  {:<22} {}", format!("{kind}.commits"), self.commits(kind));
        }
        println!("==========================================================");
    }
}
