//! Configuration system for the scratchpad core model.
//!
//! This module defines the configuration structures used to parameterize the core.
//! It provides:
//! 1. **Defaults:** Baseline sizes and settle intervals.
//! 2. **Structures:** Hierarchical config for general, core and timing settings.
//! 3. **Validation:** Consistency checks applied before a [`Cpu`](crate::core::Cpu) is built.
//!
//! Configuration is supplied as JSON (every field optional) or use `Config::default()`.

use serde::Deserialize;

use crate::common::constants::{BASE_SCALE, MIN_GPR_COUNT};
use crate::common::error::ConfigError;

/// Default configuration constants for the core.
///
/// The settle intervals come from the NOP counts the reference kernels issue
/// between an asynchronous operation and its first observer; they are not
/// architectural guarantees.
mod defaults {
    /// Number of general-purpose registers.
    pub const GPR_COUNT: usize = 64;

    /// L1 scratchpad size in bytes (64 KiB).
    pub const L1_SIZE: usize = 64 * 1024;

    /// Cycles until an indexed load/store is visible.
    ///
    /// `WAIT_FOR_DMA` issues seven NOPs after STOREIND/LOADIND.
    pub const LOAD_STORE_SETTLE: u64 = 6;

    /// Cycles until an ATSWAP batch is visible.
    ///
    /// Documented as "at least a dozen cycles" but waited out with the same
    /// seven NOPs as indexed stores.
    pub const ATSWAP_SETTLE: u64 = 6;

    /// Cycles until an ATINCGET memory update and register writeback are visible.
    ///
    /// `WAIT_FOR_ATINCGET` issues twenty-four NOPs.
    pub const ATINCGET_SETTLE: u64 = 20;

    /// Cycles between two attempts of a blocked CAS or INCGETPTR (">= 15 cycles").
    pub const ATOMIC_RETRY_INTERVAL: u64 = 15;
}

/// Root configuration structure containing all core settings.
///
/// # Examples
///
/// ```
/// use l1sim_core::Config;
///
/// let config = Config::from_json(r#"{ "timing": { "atincget_settle": 32 } }"#).unwrap();
/// assert_eq!(config.timing.atincget_settle, 32);
/// assert_eq!(config.core.gpr_count, 64);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General settings (tracing).
    #[serde(default)]
    pub general: GeneralConfig,
    /// Register file and scratchpad sizing.
    #[serde(default)]
    pub core: CoreConfig,
    /// Settle intervals and atomic retry period.
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Config {
    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when [`Config::validate`] rejects the values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the core cannot model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.core.gpr_count < MIN_GPR_COUNT {
            return Err(ConfigError::Invalid(format!(
                "core.gpr_count must be at least {MIN_GPR_COUNT}, got {}",
                self.core.gpr_count
            )));
        }
        if self.core.l1_size == 0 || self.core.l1_size as u64 % BASE_SCALE != 0 {
            return Err(ConfigError::Invalid(format!(
                "core.l1_size must be a non-zero multiple of {BASE_SCALE}, got {}",
                self.core.l1_size
            )));
        }
        let timing = &self.timing;
        if timing.load_store_settle == 0 || timing.atswap_settle == 0 {
            return Err(ConfigError::Invalid(
                "asynchronous settle intervals must be at least one cycle".to_string(),
            ));
        }
        if timing.atincget_settle <= timing.load_store_settle {
            return Err(ConfigError::Invalid(format!(
                "timing.atincget_settle ({}) must exceed timing.load_store_settle ({})",
                timing.atincget_settle, timing.load_store_settle
            )));
        }
        if timing.atomic_retry_interval == 0 {
            return Err(ConfigError::Invalid(
                "timing.atomic_retry_interval must be at least one cycle".to_string(),
            ));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit an `info` event with the disassembly of every issued instruction.
    #[serde(default)]
    pub trace_instructions: bool,
}

/// Register file and scratchpad sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Number of 32-bit general-purpose registers (at least 64).
    #[serde(default = "CoreConfig::default_gpr_count")]
    pub gpr_count: usize,

    /// L1 scratchpad size in bytes (multiple of 16).
    #[serde(default = "CoreConfig::default_l1_size")]
    pub l1_size: usize,
}

impl CoreConfig {
    /// Returns the default register count.
    fn default_gpr_count() -> usize {
        defaults::GPR_COUNT
    }

    /// Returns the default scratchpad size.
    fn default_l1_size() -> usize {
        defaults::L1_SIZE
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            gpr_count: defaults::GPR_COUNT,
            l1_size: defaults::L1_SIZE,
        }
    }
}

/// Completion timing of asynchronous operations and the atomic retry period.
///
/// All values are in logical cycles. An asynchronous operation issued at cycle
/// `t` is visible from cycle `t + settle` onward.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Settle interval of STOREIND/LOADIND.
    #[serde(default = "TimingConfig::default_load_store_settle")]
    pub load_store_settle: u64,

    /// Settle interval of ATSWAP.
    #[serde(default = "TimingConfig::default_atswap_settle")]
    pub atswap_settle: u64,

    /// Settle interval of ATINCGET; must exceed `load_store_settle`.
    #[serde(default = "TimingConfig::default_atincget_settle")]
    pub atincget_settle: u64,

    /// Cycles between attempts of a blocked ATCAS or ATINCGETPTR.
    ///
    /// The hardware waits at least 15 cycles; any value of one or more is
    /// accepted so tests can shorten the spacing.
    #[serde(default = "TimingConfig::default_atomic_retry_interval")]
    pub atomic_retry_interval: u64,
}

impl TimingConfig {
    /// Returns the default load/store settle interval.
    fn default_load_store_settle() -> u64 {
        defaults::LOAD_STORE_SETTLE
    }

    /// Returns the default ATSWAP settle interval.
    fn default_atswap_settle() -> u64 {
        defaults::ATSWAP_SETTLE
    }

    /// Returns the default ATINCGET settle interval.
    fn default_atincget_settle() -> u64 {
        defaults::ATINCGET_SETTLE
    }

    /// Returns the default atomic retry interval.
    fn default_atomic_retry_interval() -> u64 {
        defaults::ATOMIC_RETRY_INTERVAL
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            load_store_settle: defaults::LOAD_STORE_SETTLE,
            atswap_settle: defaults::ATSWAP_SETTLE,
            atincget_settle: defaults::ATINCGET_SETTLE,
            atomic_retry_interval: defaults::ATOMIC_RETRY_INTERVAL,
        }
    }
}
