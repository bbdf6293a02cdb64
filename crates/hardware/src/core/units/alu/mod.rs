//! DMA-register Arithmetic Logic Unit.
//!
//! The scalar core carries a small synchronous ALU that operates directly on
//! GPRs (`ADDDMAREG`, `SUBDMAREG`, `MULDMAREG`, `CMPDMAREG`, `BITWOPDMAREG`).
//! Kernels use it to derive base and offset registers before indexed accesses.
//! All arithmetic is 32-bit wrapping; comparisons are unsigned and yield 0 or 1.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation performed by a DMA-register ALU instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AluOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b` (low 32 bits)
    Mul,
    /// `a > b`
    CmpGt,
    /// `a < b`
    CmpLt,
    /// `a == b`
    CmpEq,
    /// `a & b`
    And,
    /// `a | b`
    Or,
    /// `a ^ b`
    Xor,
}

impl AluOp {
    /// Instruction mnemonic of the operation.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADDDMAREG",
            Self::Sub => "SUBDMAREG",
            Self::Mul => "MULDMAREG",
            Self::CmpGt => "CMPDMAREG.GT",
            Self::CmpLt => "CMPDMAREG.LT",
            Self::CmpEq => "CMPDMAREG.EQ",
            Self::And => "BITWOPDMAREG.AND",
            Self::Or => "BITWOPDMAREG.OR",
            Self::Xor => "BITWOPDMAREG.XOR",
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// DMA-register ALU.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an ALU operation on two register values.
    ///
    /// # Examples
    ///
    /// ```
    /// use l1sim_core::core::units::alu::{Alu, AluOp};
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 0xff, 0xf), 0x10e);
    /// assert_eq!(Alu::execute(AluOp::CmpGt, 0xfff, 0xff), 1);
    /// assert_eq!(Alu::execute(AluOp::Sub, 0, 1), u32::MAX);
    /// ```
    pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
        match op {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::CmpGt => (a > b) as u32,
            AluOp::CmpLt => (a < b) as u32,
            AluOp::CmpEq => (a == b) as u32,
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Xor => a ^ b,
        }
    }
}
