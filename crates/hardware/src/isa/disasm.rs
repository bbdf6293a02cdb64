//! Instruction Disassembler.
//!
//! Renders an [`Instruction`] as a mnemonic string for debug tracing, logging and
//! test diagnostics. Registers print as `rN`; immediates print in hex.
//!
//! # Usage
//!
//! ```
//! use l1sim_core::common::WidthClass;
//! use l1sim_core::isa::{Instruction, disasm::disassemble};
//!
//! let text = disassemble(&Instruction::store_ind(WidthClass::Bits32, 16, 0, 0, 8));
//! assert_eq!(text, "STOREIND.32 r0, [r8*16 + r16*4]");
//! ```

use std::fmt;

use crate::isa::instruction::Instruction;

/// Disassembles an instruction into a human-readable string.
pub fn disassemble(inst: &Instruction) -> String {
    match inst {
        Instruction::SetDmaReg(op) => format!(
            "SETDMAREG r{}.{}, {:#06x}",
            op.half_index / 2,
            if op.half_index % 2 == 0 { "lo" } else { "hi" },
            op.value
        ),
        Instruction::DmaRegAlu(op) => format!(
            "{} r{}, r{}, r{}",
            op.kind, op.result_reg, op.op_a, op.op_b
        ),
        Instruction::DmaNop => "DMANOP".to_string(),
        Instruction::StoreInd(op) | Instruction::LoadInd(op) => {
            let name = if matches!(inst, Instruction::StoreInd(_)) {
                "STOREIND"
            } else {
                "LOADIND"
            };
            let inc = if op.offset_increment == 0 {
                String::new()
            } else {
                format!(", r{} += {}", op.offset_reg, op.offset_increment)
            };
            format!(
                "{name}.{} r{}, [r{}*16 + r{}*{}]{inc}",
                op.width,
                op.data_reg,
                op.base_reg,
                op.offset_reg,
                op.width.bytes()
            )
        }
        Instruction::AtCas(op) => format!(
            "ATCAS [r{}*16 + {}*4], cmp={:#x}, set={:#x}",
            op.base_reg, op.offset, op.compare_value, op.set_value
        ),
        Instruction::AtIncGet(op) => format!(
            "ATINCGET.{} r{}, [r{}*16 + {}*4]",
            u32::from(op.int_width) + 1,
            op.inout_reg,
            op.base_reg,
            op.offset
        ),
        Instruction::AtIncGetPtr(op) => format!(
            "ATINCGETPTR.{} r{}, [r{}*16], {}, cap={}",
            if op.offset == 0 { "RD" } else { "WR" },
            op.result_reg,
            op.base_reg,
            if op.no_increment {
                "noinc".to_string()
            } else {
                format!("+{}", 1u64 << op.increment_log2.min(63))
            },
            1u64 << op.int_width.min(63)
        ),
        Instruction::AtSwap(op) => format!(
            "ATSWAP r{}, [r{}*16], mask={:#04x}",
            op.data_reg, op.base_reg, op.mask
        ),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&disassemble(self))
    }
}
