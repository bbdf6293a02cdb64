//! Instruction Set Definitions.
//!
//! Contains the instruction representation accepted by the scalar core and the
//! disassembler used for tracing. Instructions are already decoded: the model
//! starts at the operand level, not at an encoding.

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Instruction variants and their operand structs.
pub mod instruction;

pub use instruction::Instruction;
