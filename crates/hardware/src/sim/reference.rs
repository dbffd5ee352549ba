//! Single-cycle reference executor.
//!
//! Executes one instruction completely before starting the next, using the
//! same decoder, ALU, branch unit and memory model as the pipeline. With no
//! overlap there are no hazards, so its architectural state is the ground
//! truth the pipeline is checked against.

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::error::SimError;
use crate::common::reg::RegisterFile;
use crate::config::Config;
use crate::core::pipeline::signals::{OpASrc, OpBSrc, SystemOp};
use crate::core::pipeline::stages::decode::control_signals;
use crate::core::units::alu::Alu;
use crate::core::units::bru::BranchUnit;
use crate::isa::abi;
use crate::isa::decode::decode;
use crate::sim::simulator::Halt;
use crate::soc::memory::{MemRequest, Memory};
use crate::soc::traits::{DataMemory, InstructionMemory};

/// Operand values read by one reference step, for comparison with Execute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepTrace {
    /// PC of the executed instruction.
    pub pc: u32,
    /// Value of `rs1` (0 when unused).
    pub rs1_val: u32,
    /// Value of `rs2` (0 when unused).
    pub rs2_val: u32,
    /// ALU result.
    pub alu: u32,
}

/// Non-pipelined RV32I executor.
#[derive(Clone, Debug)]
pub struct ReferenceCpu {
    /// Architectural registers.
    pub regs: RegisterFile,
    /// PC of the next instruction.
    pub pc: u32,
    /// Unified instruction/data memory.
    pub mem: Memory,
    /// Instructions executed.
    pub retired: u64,
}

impl ReferenceCpu {
    /// Creates an executor with the same reset state as the simulator.
    pub fn new(config: &Config) -> Self {
        let m = &config.memory;
        let mut regs = RegisterFile::new();
        regs.write(abi::REG_SP, config.initial_sp(), true);
        Self {
            regs,
            pc: config.general.start_pc,
            mem: Memory::new(m.base, m.size, m.strict_alignment),
            retired: 0,
        }
    }

    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trap`] for illegal instructions and memory faults;
    /// the faulting instruction has no effect.
    pub fn step(&mut self) -> Result<(Option<Halt>, StepTrace), SimError> {
        let pc = self.pc;
        let fault = |trap| SimError::Trap { pc, trap };

        let inst = self.mem.read(pc).map_err(fault)?;
        let d = decode(inst).map_err(fault)?;
        let ctrl = control_signals(&d).map_err(fault)?;

        let rs1_val = self.regs.read(d.src1());
        let rs2_val = self.regs.read(d.src2());
        let a = match ctrl.a_src {
            OpASrc::Reg1 => rs1_val,
            OpASrc::Pc => pc,
            OpASrc::Zero => 0,
        };
        let b = match ctrl.b_src {
            OpBSrc::Imm => d.imm as u32,
            OpBSrc::Reg2 => rs2_val,
        };
        let alu = Alu::execute(ctrl.alu, a, b);
        let resolution = BranchUnit::resolve(&ctrl, pc, d.imm, rs1_val, rs2_val, alu);

        let mut result = alu;
        if ctrl.mem_read {
            let raw = self
                .mem
                .access(&MemRequest::load(alu, ctrl.width))
                .map_err(fault)?;
            result = if ctrl.signed_load {
                ctrl.width.sign_extend(raw)
            } else {
                raw
            };
        } else if ctrl.mem_write {
            let _ = self
                .mem
                .access(&MemRequest::store(alu, ctrl.width, rs2_val & ctrl.width.mask()))
                .map_err(fault)?;
        } else if ctrl.jump {
            result = pc.wrapping_add(INSTRUCTION_SIZE);
        }

        self.regs.write(d.rd, result, ctrl.reg_write);
        self.pc = resolution
            .redirect()
            .unwrap_or_else(|| pc.wrapping_add(INSTRUCTION_SIZE));
        self.retired += 1;

        let halt = match ctrl.system {
            SystemOp::None => None,
            SystemOp::Ecall => Some(Halt::Ecall {
                exit_code: self.regs.read(abi::REG_A0),
            }),
            SystemOp::Ebreak => Some(Halt::Ebreak { pc }),
        };
        let trace = StepTrace {
            pc,
            rs1_val,
            rs2_val,
            alu,
        };
        Ok((halt, trace))
    }

    /// Steps until a halt, at most `max_steps` instructions.
    ///
    /// # Errors
    ///
    /// Returns the first fault, or [`SimError::CycleLimit`] if no halt occurs.
    pub fn run(&mut self, max_steps: u64) -> Result<Halt, SimError> {
        for _ in 0..max_steps {
            if let (Some(halt), _) = self.step()? {
                return Ok(halt);
            }
        }
        Err(SimError::CycleLimit(max_steps))
    }
}
