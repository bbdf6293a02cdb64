//! # Ordering Hazard Tests
//!
//! The scalar core does not interlock: an observer issued before a settle
//! interval has elapsed sees the old state. These tests pin down which
//! observations are stale and which are guaranteed.

use l1sim_core::common::WidthClass;
use l1sim_core::core::cpu::IssueOutcome;
use l1sim_core::isa::Instruction;

use crate::common::TestContext;

const BASE: usize = 8;
const OFFSET: usize = 16;
const ADDR: u64 = 0x104;

fn ctx() -> TestContext {
    let mut ctx = TestContext::new();
    ctx.set_reg(BASE, 0x10);
    ctx.set_reg(OFFSET, 1);
    ctx.set_l1_word(ADDR, 0x1111);
    ctx
}

fn store32(data_reg: usize) -> Instruction {
    Instruction::store_ind(WidthClass::Bits32, OFFSET, 0, data_reg, BASE)
}

fn load32(data_reg: usize) -> Instruction {
    Instruction::load_ind(WidthClass::Bits32, OFFSET, 0, data_reg, BASE)
}

#[test]
fn test_load_right_after_store_is_stale() {
    let mut ctx = ctx();
    ctx.set_reg(0, 0xDEAD);
    let _ = ctx.exec(store32(0));
    let _ = ctx.exec(load32(1));
    ctx.wait_for_dma();

    assert_eq!(ctx.l1_word(ADDR), 0xDEAD);
    assert_eq!(ctx.reg(1), 0x1111);
}

#[test]
fn test_load_after_dma_wait_is_fresh() {
    let mut ctx = ctx();
    ctx.set_reg(0, 0xDEAD);
    let _ = ctx.exec(store32(0));
    ctx.wait_for_dma();
    let _ = ctx.exec(load32(1));
    ctx.wait_for_dma();
    assert_eq!(ctx.reg(1), 0xDEAD);
}

#[test]
fn test_dma_wait_is_not_enough_after_incget() {
    let mut ctx = ctx();
    ctx.set_reg(2, 1);
    let _ = ctx.exec(Instruction::at_inc_get(31, 1, 2, BASE));
    ctx.wait_for_dma();
    let _ = ctx.exec(load32(1));
    ctx.wait_for_dma();
    assert_eq!(ctx.reg(1), 0x1111, "increment not yet visible");

    ctx.wait_for_atincget();
    let _ = ctx.exec(load32(1));
    ctx.wait_for_dma();
    assert_eq!(ctx.reg(1), 0x1112);
    assert_eq!(ctx.reg(2), 0x1111);
}

#[test]
fn test_same_address_stores_land_in_issue_order() {
    let mut ctx = ctx();
    ctx.set_reg(0, 1);
    ctx.set_reg(1, 2);
    ctx.set_reg(3, 0xAB);
    let _ = ctx.exec(store32(0));
    let _ = ctx.exec(store32(1));
    let _ = ctx.exec(Instruction::store_ind(WidthClass::Bits8, 17, 0, 3, BASE));
    // r17 = 0: the byte store lands on 0x100, not the word at 0x104.
    ctx.wait_for_dma();
    assert_eq!(ctx.l1_word(ADDR), 2);
    assert_eq!(ctx.l1_word(0x100), 0xAB);
}

#[test]
fn test_offset_advance_is_deferred() {
    let mut ctx = ctx();
    let _ = ctx.exec(Instruction::store_ind(WidthClass::Bits32, OFFSET, 1, 0, BASE));
    assert_eq!(ctx.reg(OFFSET), 1, "offset not yet advanced");
    let _ = ctx.exec(Instruction::store_ind(WidthClass::Bits32, OFFSET, 1, 0, BASE));
    ctx.wait_for_dma();
    assert_eq!(ctx.reg(OFFSET), 3);
}

#[test]
fn test_completions_drain_while_blocked() {
    let mut ctx = ctx();
    ctx.set_reg(0, 0xDEAD);
    let _ = ctx.exec(Instruction::store_ind(WidthClass::Bits32, 17, 0, 0, BASE));
    ctx.set_l1_word(0x200, 1);
    ctx.set_reg(9, 0x20);
    assert_eq!(ctx.exec(Instruction::at_cas(5, 0, 0, 9)), IssueOutcome::Blocked);

    ctx.idle(10);
    assert!(ctx.cpu.is_blocked());
    assert_eq!(ctx.l1_word(0x100), 0xDEAD);
}

#[test]
fn test_pending_store_unblocks_cas() {
    let mut ctx = ctx();
    ctx.set_reg(0, 0);
    let _ = ctx.exec(store32(0));
    assert_eq!(
        ctx.exec(Instruction::at_cas(9, 0, 1, BASE)),
        IssueOutcome::Blocked
    );

    ctx.idle(14);
    assert_eq!(ctx.cpu.cycle, 16);
    assert!(!ctx.cpu.is_blocked(), "retry at cycle 16 sees the stored zero");
    assert_eq!(ctx.l1_word(ADDR), 9);
    assert_eq!(ctx.cpu.blocked_request(), None);
}
