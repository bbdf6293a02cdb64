//! Common utilities and types used throughout the scratchpad core model.
//!
//! This module provides the building blocks shared by every unit of the core.
//! It includes:
//! 1. **Address Types:** A strong type for L1 scratchpad byte addresses.
//! 2. **Constants:** Addressing, register-group and atomic layout constants.
//! 3. **Transfer Widths:** The 8/16/32/128-bit width classes of indexed transfers.
//! 4. **Error Handling:** Core, configuration and program-loading error types.

/// Scratchpad address type.
pub mod addr;

/// Common constants used throughout the core.
pub mod constants;

/// Transfer width classes.
pub mod data;

/// Error types.
pub mod error;

pub use addr::L1Addr;
pub use data::WidthClass;
pub use error::{ConfigError, CoreError, LoadError};
