//! System-on-Chip (SoC) Components.
//!
//! This module holds the memories the scalar core is attached to. The behavioral
//! model has exactly one: the L1 scratchpad.

/// Local scratchpad memory.
pub mod memory;

pub use memory::Scratchpad;
