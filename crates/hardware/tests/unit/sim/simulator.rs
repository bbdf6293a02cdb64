//! # Simulator Tests
//!
//! Whole-program runs: completion, livelock detection, exhausted budgets and
//! sticky faults.

use l1sim_core::common::{CoreError, L1Addr, WidthClass};
use l1sim_core::config::Config;
use l1sim_core::isa::Instruction;
use l1sim_core::sim::{Program, RunOutcome, Simulator};
use l1sim_core::soc::Scratchpad;

use crate::common::harness::init_tracing;

fn sim(program: Program) -> Simulator {
    init_tracing();
    Simulator::new(&Config::default(), program).unwrap()
}

/// Copies the word at 0x100 to 0x200 with a 128-bit load/store pair.
fn copy_program() -> Program {
    Program::new(vec![
        Instruction::set_dma_reg(0x10, 16), // r8 = 0x10
        Instruction::set_dma_reg(0x20, 18), // r9 = 0x20
        Instruction::load_ind(WidthClass::Bits128, 16, 0, 0, 8),
        Instruction::store_ind(WidthClass::Bits128, 16, 0, 0, 9),
    ])
    .with_preload(0x100, vec![1, 2, 3, 4])
}

#[test]
fn test_empty_program_completes_at_once() {
    let mut sim = sim(Program::default());
    assert_eq!(sim.run(10).unwrap(), RunOutcome::Completed { cycles: 0 });
}

#[test]
fn test_run_drains_before_completing() {
    let mut sim = sim(copy_program());
    let outcome = sim.run(1000).unwrap();
    // Load issued at 2 lands at 8; the store sampled stale registers at 3.
    assert_eq!(outcome, RunOutcome::Completed { cycles: 9 });
    assert!(sim.is_finished());
    assert_eq!(sim.cpu.regs.read_wide(0).unwrap(), 0x4_0000_0003_0000_0002_0000_0001);
    assert_eq!(sim.cpu.l1.read_u128(L1Addr::new(0x200)).unwrap(), 0);
}

#[test]
fn test_copy_with_dma_wait() {
    let mut program = copy_program();
    let store = program.instructions.pop().unwrap();
    for _ in 0..7 {
        program.push(Instruction::DmaNop);
    }
    program.push(store);

    let mut sim = sim(program);
    assert!(matches!(sim.run(1000).unwrap(), RunOutcome::Completed { .. }));
    assert_eq!(
        sim.cpu.l1.read_u128(L1Addr::new(0x200)).unwrap(),
        sim.cpu.l1.read_u128(L1Addr::new(0x100)).unwrap()
    );
}

#[test]
fn test_preload_out_of_bounds() {
    let program = Program::default().with_preload(0xFFFC, vec![1, 2]);
    let err = Simulator::new(&Config::default(), program).unwrap_err();
    assert!(matches!(err, CoreError::OutOfBounds { .. }));
}

#[test]
fn test_livelocked_cas_reports_blocked() {
    let program = Program::new(vec![
        Instruction::at_cas(1, 0, 0, 0),
        Instruction::DmaNop,
    ])
    .with_preload(0, vec![5]);
    let mut sim = sim(program);

    let outcome = sim.run(100).unwrap();
    assert_eq!(outcome, RunOutcome::Blocked { pc: 0, attempts: 7 });
    assert_eq!(sim.pc(), 0);
    assert_eq!(sim.cpu.cycle, 100);
    assert!(!sim.is_finished());
}

#[test]
fn test_blocked_then_released_continues() {
    let program = Program::new(vec![
        Instruction::at_inc_get_ptr(false, 0, 3, 0, 2, 0),
        Instruction::DmaNop,
    ]);
    let mut sim = sim(program);

    assert!(matches!(sim.run(20).unwrap(), RunOutcome::Blocked { pc: 0, .. }));
    // Another core pushes one entry.
    sim.cpu.l1.write_u32(L1Addr::new(4), 1).unwrap();
    assert_eq!(sim.run(100).unwrap(), RunOutcome::Completed { cycles: 31 });
    assert_eq!(sim.cpu.regs.read(2).unwrap(), 0);
    assert_eq!(sim.cpu.l1.read_u32(L1Addr::new(0)).unwrap(), 1);
}

#[test]
fn test_budget_exhausted_mid_stream() {
    let program = Program::new(vec![Instruction::DmaNop; 50]);
    let mut sim = sim(program);
    assert_eq!(sim.run(10).unwrap(), RunOutcome::Incomplete { pc: 10 });
    assert_eq!(sim.run(100).unwrap(), RunOutcome::Completed { cycles: 50 });
}

#[test]
fn test_fault_is_sticky() {
    let program = Program::new(vec![
        Instruction::DmaNop,
        Instruction::store_ind(WidthClass::Bits32, 0, 0, 70, 0),
        Instruction::DmaNop,
    ]);
    let mut sim = sim(program);

    let err = sim.run(100).unwrap_err();
    assert_eq!(err, CoreError::InvalidRegister { index: 70, count: 64 });
    assert_eq!(sim.pc(), 1);
    assert_eq!(sim.cpu.cycle, 1);

    assert_eq!(sim.step().unwrap_err(), err);
    assert_eq!(sim.cpu.cycle, 1, "a faulted simulator does not advance");
}

#[test]
fn test_step_by_step() {
    let mut sim = sim(Program::new(vec![Instruction::set_dma_reg(3, 0)]));
    sim.step().unwrap();
    assert_eq!(sim.pc(), 1);
    assert!(sim.is_finished());
    sim.step().unwrap();
    assert_eq!(sim.cpu.cycle, 2, "idles past the end");
    assert_eq!(sim.program().len(), 1);
}

#[test]
fn test_completion_fault_is_sticky() {
    let program = Program::new(vec![
        Instruction::set_dma_reg(0x10, 16),
        Instruction::store_ind(WidthClass::Bits32, 0, 0, 0, 8),
    ]);
    let mut sim = sim(program);
    sim.step().unwrap();
    sim.step().unwrap();
    // The scratchpad shrinks under the pending store.
    sim.cpu.l1 = Scratchpad::new(64);

    let err = sim.run(100).unwrap_err();
    assert!(matches!(err, CoreError::OutOfBounds { .. }));
    let cycle = sim.cpu.cycle;
    assert_eq!(cycle, 7);

    assert_eq!(sim.step().unwrap_err(), err);
    assert_eq!(sim.run(100).unwrap_err(), err);
    assert_eq!(sim.cpu.cycle, cycle);
}

#[test]
fn test_retry_fault_while_blocked_is_sticky() {
    let program = Program::new(vec![
        Instruction::set_dma_reg(0x10, 16),
        Instruction::at_cas(1, 0, 0, 8),
    ])
    .with_preload(0x100, vec![5]);
    let mut sim = sim(program);
    sim.step().unwrap();
    sim.step().unwrap();
    assert!(sim.cpu.is_blocked());
    sim.cpu.l1 = Scratchpad::new(64);

    let err = sim.run(100).unwrap_err();
    assert!(matches!(err, CoreError::OutOfBounds { .. }));
    assert_eq!(sim.cpu.cycle, 16);
    assert_eq!(sim.pc(), 1);
    assert_eq!(sim.step().unwrap_err(), err);
    assert_eq!(sim.cpu.cycle, 16);
}
