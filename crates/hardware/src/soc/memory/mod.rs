//! Local memory of the scalar core.
//!
//! The core owns a single flat scratchpad ("L1"). There is no cache hierarchy or
//! translation in front of it; every address the load/store and atomic units
//! compute is a direct byte offset into [`Scratchpad`].

/// Flat L1 scratchpad.
pub mod scratchpad;

pub use scratchpad::Scratchpad;
