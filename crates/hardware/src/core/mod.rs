//! Core processor implementation.
//!
//! This module contains the scalar core: its architectural state, execution
//! units, the settle queue for asynchronous completions, and the `Cpu` that
//! dispatches instructions across them.

/// Architectural state (register file).
pub mod arch;

/// CPU execution context, dispatch and clock.
pub mod cpu;

/// Settle queue of asynchronous completions.
pub mod pipeline;

/// Execution units (DMA-register ALU, load/store unit, atomic unit).
pub mod units;

pub use self::cpu::Cpu;
