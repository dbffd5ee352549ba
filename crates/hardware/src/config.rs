//! Configuration system for the pipeline simulator.
//!
//! This module defines the configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Reset PC, memory geometry, cycle budget.
//! 2. **Structures:** `general`, `memory` and `pipeline` sections.
//! 3. **Validation:** Consistency checks run before a simulator is built.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with
//! `Config::default()`. Every field is optional in JSON.

use serde::{Deserialize, Serialize};

use crate::common::constants::{DEFAULT_BASE, DEFAULT_MAX_CYCLES, DEFAULT_MEM_SIZE};
use crate::common::error::SimError;

/// Root configuration object.
///
/// # Examples
///
/// ```
/// use rv32pipe_core::config::Config;
///
/// let json = r#"{
///     "general": { "max_cycles": 5000, "probe": true },
///     "memory": { "size": 65536 },
///     "pipeline": { "forwarding": false }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.max_cycles, 5000);
/// assert_eq!(config.memory.base, 0x0100_0000);
/// assert!(!config.pipeline.forwarding);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings.
    pub general: GeneralConfig,
    /// Instruction/data memory geometry.
    pub memory: MemoryConfig,
    /// Hazard resolution settings.
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] on malformed JSON or failed validation.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a usable machine.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), SimError> {
        let mem = &self.memory;
        if mem.size == 0 || mem.size % 4 != 0 {
            return Err(SimError::Config(format!(
                "memory.size must be a non-zero multiple of 4, got {}",
                mem.size
            )));
        }
        if mem.base % 4 != 0 {
            return Err(SimError::Config(format!(
                "memory.base {:#x} is not word aligned",
                mem.base
            )));
        }
        let Some(end) = mem.base.checked_add(mem.size - 1) else {
            return Err(SimError::Config(
                "memory.base + memory.size overflows the 32-bit address space".into(),
            ));
        };
        let pc = self.general.start_pc;
        if pc % 4 != 0 || pc < mem.base || pc > end {
            return Err(SimError::Config(format!(
                "general.start_pc {pc:#x} is not a word address inside memory"
            )));
        }
        if self.general.max_cycles == 0 {
            return Err(SimError::Config("general.max_cycles must be positive".into()));
        }
        Ok(())
    }

    /// Initial stack pointer: the configured value, or the top of memory.
    pub const fn initial_sp(&self) -> u32 {
        match self.general.initial_sp {
            Some(sp) => sp,
            None => self.memory.base.wrapping_add(self.memory.size),
        }
    }
}

/// General simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Reset value of the PC.
    pub start_pc: u32,

    /// Cycle budget for `Simulator::run`.
    pub max_cycles: u64,

    /// Initial stack pointer. `None` places it at the top of memory.
    pub initial_sp: Option<u32>,

    /// Record a signal probe every cycle.
    pub probe: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_pc: DEFAULT_BASE,
            max_cycles: DEFAULT_MAX_CYCLES,
            initial_sp: None,
            probe: false,
        }
    }
}

/// Geometry shared by the instruction and data memories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Base address of both memories.
    pub base: u32,

    /// Size of each memory in bytes.
    pub size: u32,

    /// Reject data accesses not aligned to their size.
    pub strict_alignment: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            size: DEFAULT_MEM_SIZE,
            strict_alignment: true,
        }
    }
}

/// Hazard resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bypass EX/MEM and MEM/WB results into Execute.
    ///
    /// When disabled, a dependent instruction waits in Decode until its
    /// producer reaches Writeback and the register file bypass supplies it.
    pub forwarding: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { forwarding: true }
    }
}
