//! Simulation front end.
//!
//! Provides program loading and the bounded run loop that drives a
//! [`Cpu`](crate::core::Cpu) through an instruction stream.

/// Program documents and scratchpad preloads.
pub mod loader;

/// Run loop and outcomes.
pub mod simulator;

pub use loader::{Preload, Program};
pub use simulator::{RunOutcome, Simulator};
