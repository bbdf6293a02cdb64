//! Simulator: owns a CPU and the program it runs.
//!
//! The simulator feeds the instruction stream to the CPU one issue per cycle,
//! idles while a blocking atomic waits, and stops on completion, on a fault, or
//! when the cycle budget is exhausted.

use crate::common::addr::L1Addr;
use crate::common::error::CoreError;
use crate::config::Config;
use crate::core::Cpu;
use crate::sim::loader::Program;

/// How a bounded run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every instruction issued and every completion applied.
    Completed {
        /// Cycle count at completion.
        cycles: u64,
    },
    /// Budget exhausted while a CAS or INCGETPTR waited for its condition.
    Blocked {
        /// Index of the blocked instruction.
        pc: usize,
        /// Attempts made so far.
        attempts: u64,
    },
    /// Budget exhausted with the stream still making progress.
    Incomplete {
        /// Index of the next instruction to issue.
        pc: usize,
    },
}

/// Top-level simulator: CPU state plus instruction stream.
#[derive(Debug)]
pub struct Simulator {
    /// CPU state (registers, scratchpad, clock, stats).
    pub cpu: Cpu,
    program: Program,
    pc: usize,
    fault: Option<CoreError>,
}

impl Simulator {
    /// Creates a simulator and applies the program's preloads.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfBounds`] if a preload does not fit the scratchpad.
    pub fn new(config: &Config, program: Program) -> Result<Self, CoreError> {
        let mut cpu = Cpu::new(config);
        for preload in &program.preload {
            cpu.l1.load_bytes(L1Addr::new(preload.addr), &preload.bytes())?;
        }
        Ok(Self {
            cpu,
            program,
            pc: 0,
            fault: None,
        })
    }

    /// Index of the next instruction to issue (or the blocked one).
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// The program being run.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Returns `true` once every instruction has issued and nothing is in flight.
    pub fn is_finished(&self) -> bool {
        self.pc >= self.program.len() && self.cpu.is_quiescent()
    }

    /// Advances one cycle: issues the next instruction, or idles while blocked
    /// or while completions are still settling after the last issue.
    ///
    /// # Errors
    ///
    /// The fault of the offending instruction or of a completion applied this
    /// cycle. The fault is sticky: later calls return it again without touching
    /// state.
    pub fn step(&mut self) -> Result<(), CoreError> {
        if let Some(err) = &self.fault {
            return Err(err.clone());
        }

        let result = self.advance();
        if let Err(err) = &result {
            let inst = self.program.instructions.get(self.pc);
            tracing::error!(pc = self.pc, %err, ?inst, "faulted");
            self.fault = Some(err.clone());
        }
        result
    }

    /// One cycle of [`Simulator::step`] without fault bookkeeping.
    fn advance(&mut self) -> Result<(), CoreError> {
        if self.cpu.is_blocked() {
            self.cpu.tick()?;
            if !self.cpu.is_blocked() {
                self.pc += 1;
            }
            return Ok(());
        }

        let Some(inst) = self.program.instructions.get(self.pc).copied() else {
            return self.cpu.tick();
        };

        let outcome = self.cpu.issue(&inst)?;
        if !self.cpu.is_blocked() {
            self.pc += 1;
        }
        tracing::trace!(pc = self.pc, ?outcome, "step");
        Ok(())
    }

    /// Runs until the program finishes or `max_cycles` have elapsed in total.
    ///
    /// # Errors
    ///
    /// The first fault raised by an instruction.
    pub fn run(&mut self, max_cycles: u64) -> Result<RunOutcome, CoreError> {
        while !self.is_finished() {
            if self.cpu.cycle >= max_cycles {
                return Ok(self.cpu.blocked_request().map_or(
                    RunOutcome::Incomplete { pc: self.pc },
                    |req| RunOutcome::Blocked {
                        pc: self.pc,
                        attempts: req.attempts,
                    },
                ));
            }
            self.step()?;
        }
        Ok(RunOutcome::Completed {
            cycles: self.cpu.cycle,
        })
    }
}
