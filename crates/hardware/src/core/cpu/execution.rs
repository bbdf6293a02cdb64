//! Instruction Dispatch and Clock.
//!
//! This module implements the issue path of the scalar core. It performs the following:
//! 1. **Validation:** Every register index, operand range and scratchpad address an
//!    instruction will touch is checked before anything changes.
//! 2. **Routing:** Synchronous instructions retire at once; asynchronous ones are staged
//!    into the settle queue; blocking atomics attempt their condition at issue.
//! 3. **Timing:** Each issue (or idle tick) advances the clock by one cycle, drains the
//!    completions that became visible and retries a blocked atomic when its slot comes up.
//! 4. **Observability:** Emits `tracing` events for issue, completion and retries.

use super::Cpu;
use crate::common::constants::{FIFO_WR_OFFSET, MAX_INT_WIDTH};
use crate::common::error::CoreError;
use crate::core::pipeline::settle::Completion;
use crate::core::units::alu::Alu;
use crate::core::units::lsu::Lsu;
use crate::core::units::lsu::atomic::{AtomicOp, AtomicRequest, AtomicState, FifoPointer};
use crate::isa::instruction::Instruction;

/// What became of an issued instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueOutcome {
    /// Effects are already visible.
    Retired,
    /// Effects become visible at `ready_at`.
    Pending {
        /// Cycle at which the completion applies.
        ready_at: u64,
    },
    /// A blocking atomic failed its condition; the stream is suspended.
    Blocked,
}

/// Rejects an `int_width`/`increment_log2` selector wider than a word.
fn check_width_selector(name: &'static str, value: u8) -> Result<(), CoreError> {
    if value > MAX_INT_WIDTH {
        return Err(CoreError::InvalidOperand {
            name,
            value: u64::from(value),
            reason: "selector must be at most 31",
        });
    }
    Ok(())
}

impl Cpu {
    /// Issues one instruction and advances the clock by one cycle.
    ///
    /// On error nothing has changed, including the clock.
    ///
    /// # Errors
    ///
    /// [`CoreError::StreamBlocked`] while an earlier atomic is blocked; otherwise any
    /// validation error of the instruction.
    pub fn issue(&mut self, inst: &Instruction) -> Result<IssueOutcome, CoreError> {
        if let Some(req) = &self.blocked {
            return Err(CoreError::StreamBlocked(req.kind()));
        }

        let outcome = self.dispatch(inst)?;

        self.stats.instructions_issued += 1;
        if inst.is_async() {
            self.stats.async_issued += 1;
        }
        if self.trace {
            tracing::info!(cycle = self.cycle, ?outcome, "{inst}");
        } else {
            tracing::trace!(cycle = self.cycle, ?outcome, "{inst}");
        }

        self.advance()?;
        Ok(outcome)
    }

    /// Advances one cycle without issuing.
    ///
    /// # Errors
    ///
    /// Propagates a failing completion; staged completions are pre-validated, so
    /// this does not happen in practice.
    pub fn tick(&mut self) -> Result<(), CoreError> {
        if self.blocked.is_some() {
            self.stats.blocked_cycles += 1;
        }
        self.advance()
    }

    /// Advances `cycles` idle cycles.
    ///
    /// # Errors
    ///
    /// See [`Cpu::tick`].
    pub fn wait(&mut self, cycles: u64) -> Result<(), CoreError> {
        for _ in 0..cycles {
            self.tick()?;
        }
        Ok(())
    }

    /// Ticks until every pending completion has been applied.
    ///
    /// A blocked atomic keeps retrying meanwhile but is not waited for. Returns
    /// the number of cycles spent.
    ///
    /// # Errors
    ///
    /// See [`Cpu::tick`].
    pub fn drain(&mut self) -> Result<u64, CoreError> {
        let start = self.cycle;
        while !self.settle.is_empty() {
            self.tick()?;
        }
        Ok(self.cycle - start)
    }

    /// Validates `inst` and performs or stages its effects.
    fn dispatch(&mut self, inst: &Instruction) -> Result<IssueOutcome, CoreError> {
        match inst {
            Instruction::SetDmaReg(op) => {
                self.regs.write_half(op.half_index, op.value)?;
                Ok(IssueOutcome::Retired)
            }
            Instruction::DmaRegAlu(op) => {
                let a = self.regs.read(op.op_a)?;
                let b = self.regs.read(op.op_b)?;
                self.regs.write(op.result_reg, Alu::execute(op.kind, a, b))?;
                Ok(IssueOutcome::Retired)
            }
            Instruction::DmaNop => {
                self.stats.nops += 1;
                Ok(IssueOutcome::Retired)
            }
            Instruction::StoreInd(op) => {
                let completion = Lsu::stage_store(op, &self.regs, &self.l1)?;
                Ok(self.schedule(self.timing.load_store_settle, completion))
            }
            Instruction::LoadInd(op) => {
                let completion = Lsu::stage_load(op, &self.regs, &self.l1)?;
                Ok(self.schedule(self.timing.load_store_settle, completion))
            }
            Instruction::AtCas(op) => {
                let addr = Lsu::atomic_address(self.regs.read(op.base_reg)?, op.offset);
                let _ = self.l1.check(addr, 4)?;
                let req = AtomicRequest::new(
                    AtomicOp::Cas {
                        set_value: op.set_value,
                        compare_value: op.compare_value,
                    },
                    addr,
                    self.cycle,
                );
                self.start_blocking(req)
            }
            Instruction::AtIncGet(op) => {
                check_width_selector("int_width", op.int_width)?;
                let increment = self.regs.read(op.inout_reg)?;
                let addr = Lsu::atomic_address(self.regs.read(op.base_reg)?, op.offset);
                let _ = self.l1.check(addr, 4)?;
                let req = AtomicRequest::new(
                    AtomicOp::IncGet {
                        increment,
                        int_width: op.int_width,
                        inout_reg: op.inout_reg,
                    },
                    addr,
                    self.cycle,
                );
                Ok(self.schedule(self.timing.atincget_settle, Completion::Atomic(req)))
            }
            Instruction::AtIncGetPtr(op) => {
                let pointer = FifoPointer::try_from(op.offset)?;
                check_width_selector("int_width", op.int_width)?;
                check_width_selector("increment_log2", op.increment_log2)?;
                self.regs.check_range(op.result_reg, 1)?;
                let addr = Lsu::atomic_address(self.regs.read(op.base_reg)?, 0);
                let _ = self.l1.check(addr, 4)?;
                let _ = self.l1.check(addr.offset(FIFO_WR_OFFSET), 4)?;
                let req = AtomicRequest::new(
                    AtomicOp::IncGetPtr {
                        pointer,
                        increment: 1u32 << op.increment_log2,
                        no_increment: op.no_increment,
                        int_width: op.int_width,
                        result_reg: op.result_reg,
                    },
                    addr,
                    self.cycle,
                );
                self.start_blocking(req)
            }
            Instruction::AtSwap(op) => {
                let data = self.regs.read_wide(op.data_reg)?;
                let addr = Lsu::atomic_address(self.regs.read(op.base_reg)?, 0);
                let _ = self.l1.check(addr, 16)?;
                let req = AtomicRequest::new(AtomicOp::Swap { mask: op.mask, data }, addr, self.cycle);
                Ok(self.schedule(self.timing.atswap_settle, Completion::Atomic(req)))
            }
        }
    }

    /// Queues `completion` for `settle` cycles from now; the ready cycle saturates.
    fn schedule(&mut self, settle: u64, completion: Completion) -> IssueOutcome {
        let ready_at = self.cycle.saturating_add(settle);
        self.settle.push(ready_at, completion);
        IssueOutcome::Pending { ready_at }
    }

    /// First attempt of a blocking atomic, made at issue.
    fn start_blocking(&mut self, mut req: AtomicRequest) -> Result<IssueOutcome, CoreError> {
        let state = req.attempt(&mut self.l1, &mut self.regs)?;
        self.stats.atomic_attempts += 1;
        if state == AtomicState::Committed {
            self.stats.record_commit(req.kind());
            return Ok(IssueOutcome::Retired);
        }
        tracing::debug!(
            cycle = self.cycle,
            addr = %req.addr,
            "{} condition false, stream blocked",
            req.kind()
        );
        self.next_attempt_at = self.cycle.saturating_add(self.timing.atomic_retry_interval);
        self.blocked = Some(req);
        Ok(IssueOutcome::Blocked)
    }

    /// One clock edge: drain visible completions, then retry a blocked atomic if due.
    fn advance(&mut self) -> Result<(), CoreError> {
        self.cycle += 1;
        self.stats.cycles = self.cycle;

        while let Some(pending) = self.settle.pop_ready(self.cycle) {
            let kind = pending.completion.atomic_kind();
            tracing::trace!(
                cycle = self.cycle,
                issued_ready_at = pending.ready_at,
                "complete {}",
                pending.completion.label()
            );
            pending.completion.apply(&mut self.l1, &mut self.regs)?;
            self.stats.completions_applied += 1;
            if let Some(kind) = kind {
                self.stats.atomic_attempts += 1;
                self.stats.record_commit(kind);
            }
        }

        self.retry_blocked()
    }

    fn retry_blocked(&mut self) -> Result<(), CoreError> {
        if self.cycle < self.next_attempt_at {
            return Ok(());
        }
        let Some(req) = self.blocked.as_mut() else {
            return Ok(());
        };

        let state = req.attempt(&mut self.l1, &mut self.regs)?;
        self.stats.atomic_attempts += 1;
        self.stats.atomic_retries += 1;
        if state == AtomicState::Committed {
            let kind = req.kind();
            tracing::debug!(
                cycle = self.cycle,
                attempts = req.attempts,
                "{kind} committed after retry"
            );
            self.stats.record_commit(kind);
            self.blocked = None;
        } else {
            tracing::debug!(cycle = self.cycle, attempts = req.attempts, "{} retry failed", req.kind());
            self.next_attempt_at = self.cycle.saturating_add(self.timing.atomic_retry_interval);
        }
        Ok(())
    }
}
