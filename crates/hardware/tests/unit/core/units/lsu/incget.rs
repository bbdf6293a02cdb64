//! # ATINCGET Tests
//!
//! Masked increment-and-get: masking, the long settle interval, and the
//! accumulation property over a sequence of increments.

use l1sim_core::common::CoreError;
use l1sim_core::core::cpu::IssueOutcome;
use l1sim_core::core::units::lsu::atomic::int_mask;
use l1sim_core::isa::Instruction;
use proptest::prelude::*;

use crate::common::TestContext;

const BASE: usize = 8;
const INOUT: usize = 2;
const WORD: u64 = 0x100;

fn ctx() -> TestContext {
    let mut ctx = TestContext::new();
    ctx.set_reg(BASE, 0x10);
    ctx
}

#[test]
fn test_incget_returns_original_and_masks() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 0xAAAA_BB10);
    ctx.set_reg(INOUT, 0x20);

    let outcome = ctx.exec(Instruction::at_inc_get(7, 0, INOUT, BASE));
    assert_eq!(outcome, IssueOutcome::Pending { ready_at: 20 });
    ctx.wait_for_atincget();

    assert_eq!(ctx.l1_word(WORD), 0xAAAA_BB30);
    assert_eq!(ctx.reg(INOUT), 0xAAAA_BB10, "register receives the whole original word");
    assert_eq!(ctx.cpu.stats.incget_commits, 1);
}

#[test]
fn test_incget_wraps_inside_counter() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD + 4, 0x1234_00FF);
    ctx.set_reg(INOUT, 1);
    let _ = ctx.exec(Instruction::at_inc_get(7, 1, INOUT, BASE));
    ctx.wait_for_atincget();
    assert_eq!(ctx.l1_word(WORD + 4), 0x1234_0000);
}

#[test]
fn test_incget_does_not_carry_into_packed_neighbour() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 0x0005_FFFF);
    ctx.set_reg(INOUT, 1);
    let _ = ctx.exec(Instruction::at_inc_get(15, 0, INOUT, BASE));
    ctx.wait_for_atincget();
    assert_eq!(ctx.l1_word(WORD), 0x0005_0000);
}

#[test]
fn test_incget_invisible_after_dma_wait() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 10);
    ctx.set_reg(INOUT, 5);
    let _ = ctx.exec(Instruction::at_inc_get(31, 0, INOUT, BASE));
    ctx.wait_for_dma();
    assert_eq!(ctx.l1_word(WORD), 10, "WAIT_FOR_DMA is too short for ATINCGET");
    assert_eq!(ctx.reg(INOUT), 5, "register still holds the increment");
}

#[test]
fn test_incget_visible_exactly_at_settle() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 10);
    ctx.set_reg(INOUT, 5);
    let _ = ctx.exec(Instruction::at_inc_get(31, 0, INOUT, BASE));
    ctx.idle(18);
    assert_eq!(ctx.l1_word(WORD), 10);
    ctx.idle(1);
    assert_eq!(ctx.l1_word(WORD), 15);
    assert_eq!(ctx.reg(INOUT), 10);
}

#[test]
fn test_back_to_back_incgets_apply_in_issue_order() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 100);
    ctx.set_reg(2, 1);
    ctx.set_reg(3, 10);
    let _ = ctx.exec(Instruction::at_inc_get(31, 0, 2, BASE));
    let _ = ctx.exec(Instruction::at_inc_get(31, 0, 3, BASE));
    ctx.wait_for_atincget();
    assert_eq!(ctx.l1_word(WORD), 111);
    assert_eq!(ctx.reg(2), 100);
    assert_eq!(ctx.reg(3), 101);
}

#[test]
fn test_incget_rejects_wide_selector() {
    let mut ctx = ctx();
    let err = ctx.try_exec(Instruction::at_inc_get(32, 0, INOUT, BASE)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidOperand { name: "int_width", value: 32, .. }));
    assert!(ctx.cpu.pending().is_empty());
}

proptest! {
    #[test]
    fn prop_incget_accumulates(
        initial in any::<u32>(),
        int_width in 0u8..=31,
        increments in prop::collection::vec(any::<u32>(), 1..8),
    ) {
        let mut ctx = ctx();
        let mask = int_mask(int_width);
        ctx.set_l1_word(WORD, initial);

        let mut expected_prior = initial;
        for &inc in &increments {
            ctx.set_reg(INOUT, inc);
            let _ = ctx.exec(Instruction::at_inc_get(int_width, 0, INOUT, BASE));
            ctx.wait_for_atincget();
            prop_assert_eq!(ctx.reg(INOUT), expected_prior);
            expected_prior = (expected_prior.wrapping_add(inc) & mask) | (expected_prior & !mask);
        }

        let sum = increments.iter().fold(0u32, |acc, &i| acc.wrapping_add(i));
        let word = ctx.l1_word(WORD);
        prop_assert_eq!(word & mask, initial.wrapping_add(sum) & mask);
        prop_assert_eq!(word & !mask, initial & !mask);
    }
}
