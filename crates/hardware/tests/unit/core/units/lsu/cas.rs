//! # ATCAS Tests
//!
//! Compare-and-swap through the CPU: immediate success, blocking on mismatch,
//! retry spacing, and unblocking by an external write.

use l1sim_core::common::{CoreError, WidthClass};
use l1sim_core::config::Config;
use l1sim_core::core::cpu::IssueOutcome;
use l1sim_core::core::units::lsu::atomic::{AtomicKind, AtomicState};
use l1sim_core::isa::Instruction;

use crate::common::TestContext;

const BASE: usize = 8;
const WORD: u64 = 0x104; // base 0x100, offset 1

fn ctx() -> TestContext {
    let mut ctx = TestContext::new();
    ctx.set_reg(BASE, 0x10);
    ctx
}

#[test]
fn test_cas_match_commits_at_issue() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 5);
    let outcome = ctx.exec(Instruction::at_cas(7, 5, 1, BASE));
    assert_eq!(outcome, IssueOutcome::Retired);
    assert_eq!(ctx.l1_word(WORD), 7);
    assert!(!ctx.cpu.is_blocked());
    assert!(ctx.cpu.pending().is_empty());
    assert_eq!(ctx.cpu.stats.cas_commits, 1);
}

#[test]
fn test_cas_mismatch_blocks_stream() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 1);
    let outcome = ctx.exec(Instruction::at_cas(7, 0, 1, BASE));
    assert_eq!(outcome, IssueOutcome::Blocked);
    assert!(ctx.cpu.is_blocked());
    assert_eq!(ctx.cpu.blocked_request().unwrap().state, AtomicState::Blocked);

    let err = ctx.try_exec(Instruction::DmaNop).unwrap_err();
    assert_eq!(err, CoreError::StreamBlocked(AtomicKind::Cas));
    assert_eq!(ctx.l1_word(WORD), 1);
}

#[test]
fn test_cas_livelocks_forever_without_outside_help() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 1);
    let _ = ctx.exec(Instruction::at_cas(7, 0, 1, BASE));
    ctx.idle(1000);

    let req = ctx.cpu.blocked_request().unwrap();
    assert_eq!(req.attempts, 1 + ctx.cpu.cycle / 15);
    assert_eq!(ctx.l1_word(WORD), 1, "never writes while the check fails");
    assert_eq!(ctx.cpu.stats.cas_commits, 0);
    assert_eq!(ctx.cpu.stats.blocked_cycles, 1000);
}

#[test]
fn test_cas_retries_on_interval() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 1);
    let _ = ctx.exec(Instruction::at_cas(7, 0, 1, BASE));
    ctx.idle(13);
    assert_eq!(ctx.cpu.blocked_request().unwrap().attempts, 1);
    ctx.idle(1);
    assert_eq!(ctx.cpu.blocked_request().unwrap().attempts, 2);
    ctx.idle(14);
    assert_eq!(ctx.cpu.blocked_request().unwrap().attempts, 2);
    ctx.idle(1);
    assert_eq!(ctx.cpu.blocked_request().unwrap().attempts, 3);
}

#[test]
fn test_external_write_unblocks_at_next_retry() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 1);
    let _ = ctx.exec(Instruction::at_cas(9, 0, 1, BASE));

    // Another agent releases the word.
    ctx.set_l1_word(WORD, 0);
    ctx.idle(13);
    assert!(ctx.cpu.is_blocked(), "released, but no retry slot yet");
    assert_eq!(ctx.l1_word(WORD), 0);

    ctx.idle(1);
    assert!(!ctx.cpu.is_blocked());
    assert_eq!(ctx.l1_word(WORD), 9);
    assert_eq!(ctx.cpu.stats.atomic_retries, 1);
    assert_eq!(ctx.cpu.stats.cas_commits, 1);

    let _ = ctx.exec(Instruction::DmaNop);
}

#[test]
fn test_cas_sees_store_only_after_it_settles() {
    let mut ctx = ctx();
    ctx.set_l1_word(WORD, 1);
    ctx.set_reg(16, 1); // offset for a 32-bit store to 0x104
    ctx.set_reg(0, 0);

    let _ = ctx.exec(Instruction::store_ind(WidthClass::Bits32, 16, 0, 0, BASE));
    let outcome = ctx.exec(Instruction::at_cas(3, 0, 1, BASE));
    assert_eq!(outcome, IssueOutcome::Blocked, "store still settling");

    // Store lands at cycle 6; the retry at cycle 16 (issue at 1 + 15) succeeds.
    ctx.idle(13);
    assert!(ctx.cpu.is_blocked());
    assert_eq!(ctx.l1_word(WORD), 0);
    ctx.idle(1);
    assert!(!ctx.cpu.is_blocked());
    assert_eq!(ctx.l1_word(WORD), 3);
}

#[test]
fn test_retry_interval_is_configurable() {
    let mut config = Config::default();
    config.timing.atomic_retry_interval = 3;
    let mut ctx = TestContext::with_config(&config);
    ctx.set_reg(BASE, 0x10);
    ctx.set_l1_word(WORD, 1);
    let _ = ctx.exec(Instruction::at_cas(7, 0, 1, BASE));
    ctx.idle(2);
    assert_eq!(ctx.cpu.blocked_request().unwrap().attempts, 2);
}

#[test]
fn test_cas_out_of_bounds() {
    let mut ctx = ctx();
    ctx.set_reg(BASE, 0x1000); // 0x10000, one past the end
    let err = ctx.try_exec(Instruction::at_cas(1, 0, 0, BASE)).unwrap_err();
    assert!(matches!(err, CoreError::OutOfBounds { .. }));
    assert!(!ctx.cpu.is_blocked());
}
