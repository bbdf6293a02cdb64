//! Execution units.
//!
//! The scalar core has two: the DMA-register ALU and the load/store unit with its
//! atomic primitives.

/// DMA-register arithmetic, comparison and bitwise operations.
pub mod alu;

/// Indexed load/store unit and atomic unit.
pub mod lsu;
