//! Error definitions.
//!
//! This module defines the failure modes of the core. It provides:
//! 1. **Programming Errors:** Bad register indices, misaligned or out-of-range scratchpad
//!    addresses and illegal operand values. These stop the instruction stream.
//! 2. **Configuration Errors:** Malformed or inconsistent configuration documents.
//! 3. **Load Errors:** Failures reading or parsing a program file.
//!
//! A blocked CAS or INCGETPTR is *not* an error. It is reported through
//! [`RunOutcome::Blocked`](crate::sim::RunOutcome::Blocked); only an attempt to issue
//! past it surfaces as [`CoreError::StreamBlocked`].

use thiserror::Error;

use super::addr::L1Addr;
use crate::core::units::lsu::atomic::AtomicKind;

/// Errors raised while issuing or completing an instruction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Register index outside the configured register file.
    #[error("invalid register index {index} (register file holds {count})")]
    InvalidRegister {
        /// The offending index.
        index: usize,
        /// Number of registers in the file.
        count: usize,
    },

    /// Scratchpad access not aligned to its transfer width.
    #[error("misaligned {width}-byte access at {addr}")]
    AlignmentFault {
        /// Effective address of the access.
        addr: L1Addr,
        /// Transfer width in bytes.
        width: usize,
    },

    /// Scratchpad access reaching past the end of the scratchpad.
    #[error("{width}-byte access at {addr} exceeds scratchpad size {size:#x}")]
    OutOfBounds {
        /// Effective address of the access.
        addr: L1Addr,
        /// Transfer width in bytes.
        width: usize,
        /// Scratchpad size in bytes.
        size: usize,
    },

    /// Operand value outside the range the operation accepts.
    #[error("invalid operand `{name}` = {value}: {reason}")]
    InvalidOperand {
        /// Operand name as written in the instruction.
        name: &'static str,
        /// Supplied value.
        value: u64,
        /// Accepted range.
        reason: &'static str,
    },

    /// Issue attempted while an atomic is still waiting for its condition.
    #[error("instruction stream is blocked on {0}")]
    StreamBlocked(AtomicKind),
}

/// Errors raised while building a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but its values are inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while loading a [`Program`](crate::sim::Program).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("failed to read program: {0}")]
    Io(#[from] std::io::Error),

    /// The program document is not valid JSON for the instruction schema.
    #[error("failed to parse program: {0}")]
    Parse(#[from] serde_json::Error),
}
