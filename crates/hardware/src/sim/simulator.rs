//! Simulator: owns the CPU, its statistics and the signal probe.
//!
//! This module provides the driver a harness talks to:
//! 1. **Construction:** Builds the core and both memories from a [`Config`].
//! 2. **Stepping:** `tick` advances one clock cycle; `run` ticks until a halt.
//! 3. **Observation:** PC, registers, data memory, statistics and the last probe.

use serde::Serialize;
use tracing::{info, warn};

use crate::common::error::{SimError, Trap};
use crate::common::reg::RegisterFile;
use crate::config::Config;
use crate::core::Cpu;
use crate::core::pipeline::signals::SystemOp;
use crate::core::pipeline::stages::Commit;
use crate::isa::abi;
use crate::soc::memory::Memory;
use crate::soc::traits::{DataMemory, InstructionMemory};
use crate::stats::SimStats;
use crate::trace::CycleProbe;

/// Why a simulation stopped normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Halt {
    /// ECALL reached Writeback; `a0` is the exit code.
    Ecall {
        /// Value of `a0` when ECALL committed.
        exit_code: u32,
    },
    /// EBREAK reached Writeback.
    Ebreak {
        /// PC of the EBREAK.
        pc: u32,
    },
}

/// Result of a completed [`Simulator::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// How the program stopped.
    pub halt: Halt,
    /// Cycles simulated, including the halting one.
    pub cycles: u64,
    /// Instructions retired, including the halting one.
    pub retired: u64,
}

/// Terminal state, remembered so later ticks repeat it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Finished {
    Halted(Halt),
    Faulted { pc: u32, trap: Trap },
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator<I = Memory, D = Memory> {
    /// The pipelined core.
    pub cpu: Cpu<I, D>,
    /// Performance counters.
    pub stats: SimStats,
    max_cycles: u64,
    probe: bool,
    last_probe: Option<CycleProbe>,
    finished: Option<Finished>,
}

impl Simulator {
    /// Creates a simulator with two zeroed memories described by `config`.
    ///
    /// The stack pointer is initialised to [`Config::initial_sp`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration fails validation.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let mem = &config.memory;
        let imem = Memory::new(mem.base, mem.size, mem.strict_alignment);
        let dmem = Memory::new(mem.base, mem.size, mem.strict_alignment);
        Self::with_memories(config, imem, dmem)
    }

    /// Copies a program image into both memories at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ImageTooLarge`] if the image leaves the mapping.
    pub fn load_image(&mut self, addr: u32, bytes: &[u8]) -> Result<(), SimError> {
        self.cpu.imem.load(addr, bytes)?;
        self.cpu.dmem.load(addr, bytes)
    }

    /// The data memory.
    pub const fn dmem(&self) -> &Memory {
        &self.cpu.dmem
    }

    /// The instruction memory.
    pub const fn imem(&self) -> &Memory {
        &self.cpu.imem
    }
}

impl<I: InstructionMemory, D: DataMemory> Simulator<I, D> {
    /// Creates a simulator around caller-supplied memories.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration fails validation.
    pub fn with_memories(config: &Config, imem: I, dmem: D) -> Result<Self, SimError> {
        config.validate()?;
        let mut cpu = Cpu::new(
            config.general.start_pc,
            imem,
            dmem,
            config.pipeline.forwarding,
        );
        cpu.regs.write(abi::REG_SP, config.initial_sp(), true);
        info!(
            pc = format_args!("{:#010x}", cpu.pc),
            forwarding = cpu.forwarding,
            "simulator ready"
        );
        Ok(Self {
            cpu,
            stats: SimStats::default(),
            max_cycles: config.general.max_cycles,
            probe: config.general.probe || cfg!(feature = "always-probe"),
            last_probe: None,
            finished: None,
        })
    }

    /// Advances the simulation by one clock cycle.
    ///
    /// # Returns
    ///
    /// `Ok(Some(halt))` in the cycle ECALL or EBREAK commits, `Ok(None)`
    /// otherwise. Once halted, every later call returns the same halt
    /// without advancing.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trap`] when a faulting instruction reaches
    /// Writeback; later calls return the same error.
    pub fn tick(&mut self) -> Result<Option<Halt>, SimError> {
        if let Some(done) = self.finished {
            return finished_result(done);
        }

        let report = self.cpu.cycle();
        self.stats.record(&report);
        if self.probe {
            self.last_probe = Some(CycleProbe::capture(self.stats.cycles, &report));
        }

        let finished = match report.committed {
            Some((entry, Commit::Trap(trap))) => {
                warn!(pc = format_args!("{:#010x}", entry.pc), %trap, "trap reached writeback");
                Some(Finished::Faulted { pc: entry.pc, trap })
            }
            Some((entry, Commit::System(sys))) => {
                let halt = match sys {
                    SystemOp::Ebreak => Halt::Ebreak { pc: entry.pc },
                    SystemOp::Ecall | SystemOp::None => Halt::Ecall {
                        exit_code: self.cpu.regs.read(abi::REG_A0),
                    },
                };
                info!(?halt, cycles = self.stats.cycles, "halted");
                Some(Finished::Halted(halt))
            }
            Some((_, Commit::Retire)) | None => None,
        };

        self.finished = finished;
        finished.map_or(Ok(None), finished_result)
    }

    /// Ticks until the program halts or the cycle budget runs out.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trap`] on a fault and [`SimError::CycleLimit`] when
    /// `general.max_cycles` cycles pass without a halt. Once halted, every
    /// later call returns the recorded outcome without advancing.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        self.run_with(|_| {})
    }

    /// Like [`run`](Self::run), calling `on_cycle` with each cycle's probe.
    ///
    /// `on_cycle` is only called when probing is enabled.
    ///
    /// # Errors
    ///
    /// As for [`run`](Self::run).
    pub fn run_with<F: FnMut(&CycleProbe)>(
        &mut self,
        mut on_cycle: F,
    ) -> Result<RunSummary, SimError> {
        // Already halted: report the recorded outcome, even at the cycle limit.
        match self.finished {
            Some(Finished::Halted(halt)) => return Ok(self.summary(halt)),
            Some(Finished::Faulted { pc, trap }) => return Err(SimError::Trap { pc, trap }),
            None => {}
        }
        while self.stats.cycles < self.max_cycles {
            let halt = self.tick();
            if let Some(probe) = &self.last_probe {
                on_cycle(probe);
            }
            if let Some(halt) = halt? {
                return Ok(self.summary(halt));
            }
        }
        Err(SimError::CycleLimit(self.max_cycles))
    }

    const fn summary(&self, halt: Halt) -> RunSummary {
        RunSummary {
            halt,
            cycles: self.stats.cycles,
            retired: self.stats.instructions_retired,
        }
    }

    /// PC of the next fetch.
    pub const fn pc(&self) -> u32 {
        self.cpu.pc
    }

    /// Reads one architectural register.
    pub fn reg(&self, idx: usize) -> u32 {
        self.cpu.regs.read(idx)
    }

    /// Writes one architectural register (for harness setup).
    pub fn set_reg(&mut self, idx: usize, val: u32) {
        self.cpu.regs.write(idx, val, true);
    }

    /// The register file.
    pub const fn regs(&self) -> &RegisterFile {
        &self.cpu.regs
    }

    /// Probe of the most recent cycle, when probing is enabled.
    pub const fn last_probe(&self) -> Option<&CycleProbe> {
        self.last_probe.as_ref()
    }

    /// Whether a halt or fault has ended the simulation.
    pub const fn is_finished(&self) -> bool {
        self.finished.is_some()
    }
}

fn finished_result(done: Finished) -> Result<Option<Halt>, SimError> {
    match done {
        Finished::Halted(halt) => Ok(Some(halt)),
        Finished::Faulted { pc, trap } => Err(SimError::Trap { pc, trap }),
    }
}
