//! Architectural state of the scalar core.
//!
//! The only architectural state the core exposes to instructions is its register
//! file; the scratchpad lives under [`soc`](crate::soc).

/// General-Purpose Register file implementation.
pub mod gpr;

pub use gpr::RegisterFile;
