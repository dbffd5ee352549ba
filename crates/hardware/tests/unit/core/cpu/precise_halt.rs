//! Precise Halt Tests.
//!
//! ECALL, EBREAK and traps take effect when the instruction reaches
//! Writeback. Older instructions have completed by then; younger ones must
//! not have written a register or touched memory.

use pretty_assertions::assert_eq;
use rv32pipe_core::common::constants::DEFAULT_BASE;
use rv32pipe_core::common::error::{SimError, Trap};
use rv32pipe_core::config::Config;
use rv32pipe_core::isa::abi::REG_SP;
use rv32pipe_core::sim::Halt;

use crate::common::builder::instruction::asm::*;
use crate::common::harness::{TestContext, recording_sim};

const BASE: u32 = DEFAULT_BASE;
const DATA: u32 = DEFAULT_BASE + 0x1000;
const SP: u32 = REG_SP as u32;

fn expect_trap(result: Result<impl std::fmt::Debug, SimError>, pc: u32, trap: Trap) {
    match result {
        Err(SimError::Trap { pc: at, trap: got }) => {
            assert_eq!((at, got), (pc, trap));
        }
        other => panic!("expected {trap} at {pc:#x}, got {other:?}"),
    }
}

// ══════════════════════════════════════════════════════════
// ECALL / EBREAK
// ══════════════════════════════════════════════════════════

#[test]
fn ecall_exit_code_is_a0() {
    let mut ctx = TestContext::new().load_program(&[addi(10, 0, 42), ecall()]);
    assert_eq!(ctx.run_to_halt().unwrap().halt, Halt::Ecall { exit_code: 42 });
}

#[test]
fn ebreak_reports_its_pc() {
    let mut ctx = TestContext::new().load_program(&[nop(), nop(), ebreak()]);
    assert_eq!(
        ctx.run_to_halt().unwrap().halt,
        Halt::Ebreak { pc: BASE + 8 }
    );
}

#[test]
fn instructions_after_ecall_have_no_effect() {
    let program = [
        addi(10, 0, 7),
        ecall(),
        sw(SP, 10, -4),
        addi(10, 0, 99),
        addi(11, 0, 1),
    ];
    let mut sim = recording_sim(&program, true);
    let summary = sim.run().unwrap();

    assert_eq!(summary.halt, Halt::Ecall { exit_code: 7 });
    assert!(sim.cpu.dmem.stores().is_empty(), "store behind ECALL was in MEM");
    assert_eq!(sim.reg(11), 0);
    assert_eq!(summary.retired, 2);
    assert_eq!(summary.cycles, 6);
}

#[test]
fn ticks_after_halt_repeat_the_halt() {
    let mut ctx = TestContext::new().load_program(&[ecall()]);
    let summary = ctx.run_to_halt().unwrap();
    let pc = ctx.sim.pc();

    assert_eq!(ctx.tick().unwrap(), Some(summary.halt));
    assert_eq!(ctx.tick().unwrap(), Some(summary.halt));
    assert_eq!(ctx.sim.stats.cycles, summary.cycles, "halted core does not cycle");
    assert_eq!(ctx.sim.pc(), pc);
    assert!(ctx.sim.is_finished());
}

#[test]
fn tick_reports_halt_in_the_commit_cycle() {
    let mut ctx = TestContext::new().load_program(&[ecall()]);
    for _ in 0..4 {
        assert_eq!(ctx.tick().unwrap(), None);
    }
    assert_eq!(ctx.tick().unwrap(), Some(Halt::Ecall { exit_code: 0 }));
}

// ══════════════════════════════════════════════════════════
// Traps
// ══════════════════════════════════════════════════════════

#[test]
fn illegal_instruction_halts_at_writeback() {
    let program = [addi(1, 0, 1), 0xFFFF_FFFF, sw(SP, 1, -4), addi(6, 0, 2)];
    let mut sim = recording_sim(&program, true);

    expect_trap(
        sim.run(),
        BASE + 4,
        Trap::IllegalInstruction(0xFFFF_FFFF),
    );
    assert_eq!(sim.reg(1), 1, "older instruction completed");
    assert_eq!(sim.reg(6), 0);
    assert_eq!(sim.reg(REG_SP), Config::default().initial_sp(), "sp untouched");
    assert!(sim.cpu.dmem.log.is_empty());
    assert_eq!(sim.stats.instructions_retired, 1);
    assert_eq!(sim.stats.cycles, 6);
}

#[test]
fn trap_is_sticky() {
    let mut ctx = TestContext::new().load_program(&[0xFFFF_FFFF]);
    expect_trap(ctx.run_to_halt(), BASE, Trap::IllegalInstruction(0xFFFF_FFFF));
    expect_trap(ctx.tick(), BASE, Trap::IllegalInstruction(0xFFFF_FFFF));
}

#[test]
fn running_off_the_program_hits_a_zero_word() {
    let mut ctx = TestContext::new().load_program(&[addi(1, 0, 1), addi(2, 0, 2)]);
    expect_trap(ctx.run_to_halt(), BASE + 8, Trap::IllegalInstruction(0));
    assert_eq!((ctx.get_reg(1), ctx.get_reg(2)), (1, 2));
}

#[test]
fn load_access_fault() {
    let mut ctx = TestContext::new().load_program(&[lw(1, 0, 0), ecall()]);
    expect_trap(ctx.run_to_halt(), BASE, Trap::LoadAccessFault(0));
}

#[test]
fn store_access_fault_leaves_registers() {
    let mut ctx = TestContext::new().load_program(&[addi(3, 0, 3), sw(0, 3, 16), ecall()]);
    expect_trap(ctx.run_to_halt(), BASE + 4, Trap::StoreAccessFault(16));
    assert_eq!(ctx.get_reg(3), 3);
}

#[test]
fn misaligned_load_traps_in_strict_mode() {
    let mut ctx = TestContext::new().load_program(&[lw(1, 5, 2), ecall()]);
    ctx.set_reg(5, DATA);
    expect_trap(ctx.run_to_halt(), BASE, Trap::LoadAddressMisaligned(DATA + 2));
}

#[test]
fn misaligned_load_allowed_when_not_strict() {
    let mut config = Config::default();
    config.memory.strict_alignment = false;
    let mut ctx = TestContext::with_config(&config)
        .load_program(&[lw(1, 5, 1), ecall()])
        .with_word(DATA, 0x4433_2211)
        .with_word(DATA + 4, 0x0000_0055);
    ctx.set_reg(5, DATA);
    let _ = ctx.run_to_halt().unwrap();
    assert_eq!(ctx.get_reg(1), 0x5544_3322);
}

#[test]
fn wrong_path_trap_is_discarded() {
    let mut ctx = TestContext::new().load_program(&[beq(0, 0, 8), 0xFFFF_FFFF, ecall()]);
    assert_eq!(
        ctx.run_to_halt().unwrap().halt,
        Halt::Ecall { exit_code: 0 },
        "illegal word on the squashed path never reaches Writeback"
    );
}

#[test]
fn jump_to_misaligned_target_faults_at_fetch() {
    // jalr to base + 2: bit 0 is cleared, bit 1 is not.
    let mut ctx = TestContext::new().load_program(&[auipc(5, 0), jalr(0, 5, 2)]);
    expect_trap(
        ctx.run_to_halt(),
        BASE + 2,
        Trap::InstructionAddressMisaligned(BASE + 2),
    );
}

#[test]
fn cycle_budget_exhausted() {
    let mut config = Config::default();
    config.general.max_cycles = 50;
    let mut ctx = TestContext::with_config(&config).load_program(&[jal(0, 0)]);
    assert!(matches!(ctx.run_to_halt(), Err(SimError::CycleLimit(50))));
    assert_eq!(ctx.sim.stats.cycles, 50);
}
