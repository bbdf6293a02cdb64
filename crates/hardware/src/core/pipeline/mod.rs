//! Completion timing.
//!
//! The scalar core has no multi-stage pipeline; the only state between issue and
//! effect is the settle queue of asynchronous completions.

/// Pending asynchronous completions keyed by ready cycle.
pub mod settle;

pub use settle::{Completion, SettleQueue};
