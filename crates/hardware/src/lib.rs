//! Scratchpad core behavioral model.
//!
//! This crate models a small scalar core and its local L1 scratchpad, reproducing
//! the semantics of indexed memory access and scratchpad atomics:
//! 1. **Core:** Register file, DMA-register ALU, indexed load/store unit and the
//!    ATCAS/ATINCGET/ATINCGETPTR/ATSWAP atomic unit.
//! 2. **Timing:** A logical clock and a settle queue that delays asynchronous effects,
//!    so reads issued too early observe stale data, and blocking atomics that retry
//!    on a fixed interval.
//! 3. **Memory:** A flat little-endian scratchpad with alignment and bounds checks.
//! 4. **ISA:** Decoded instruction variants, serializable as JSON, and a disassembler.
//! 5. **Simulation:** Program loading, bounded runs, configuration and statistics.
//!
//! # Example
//!
//! ```
//! use l1sim_core::common::{L1Addr, WidthClass};
//! use l1sim_core::{Config, Cpu, Instruction};
//!
//! let mut cpu = Cpu::new(&Config::default());
//! cpu.regs.write(0, 0xDEAD_BEEF).unwrap();
//! cpu.regs.write(8, 4).unwrap(); // base: 4 * 16 = 0x40
//!
//! let _ = cpu.issue(&Instruction::store_ind(WidthClass::Bits32, 16, 0, 0, 8)).unwrap();
//! assert_eq!(cpu.l1.read_u32(L1Addr::new(0x40)).unwrap(), 0, "not settled yet");
//!
//! let _ = cpu.drain().unwrap();
//! assert_eq!(cpu.l1.read_u32(L1Addr::new(0x40)).unwrap(), 0xDEAD_BEEF);
//! ```

/// Common types and constants (addresses, width classes, errors).
pub mod common;
/// Core configuration (defaults, sizing, timing).
pub mod config;
/// CPU core (register file, units, settle queue, dispatch).
pub mod core;
/// Instruction set (instruction variants, disassembler).
pub mod isa;
/// Program loader and run loop.
pub mod sim;
/// Local memories (L1 scratchpad).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Main CPU type; holds registers, scratchpad, settle queue and stats.
pub use crate::core::Cpu;
/// Instruction accepted by [`Cpu::issue`].
pub use crate::isa::Instruction;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// L1 scratchpad memory.
pub use crate::soc::Scratchpad;
