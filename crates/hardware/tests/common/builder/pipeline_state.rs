use rv32pipe_core::common::reg::{RegWrite, RegisterFile};
use rv32pipe_core::core::pipeline::latches::{ExMemEntry, IdExEntry, IfIdEntry, MemWbEntry};
use rv32pipe_core::core::pipeline::signals::ControlSignals;
use rv32pipe_core::core::pipeline::stages::decode_stage;

pub struct IfIdBuilder(IfIdEntry);

impl IfIdBuilder {
    pub fn new() -> Self {
        Self(IfIdEntry::default())
    }

    pub fn pc(mut self, pc: u32) -> Self {
        self.0.pc = pc;
        self
    }

    pub fn inst(mut self, inst: u32) -> Self {
        self.0.inst = inst;
        self
    }

    pub fn build(self) -> IfIdEntry {
        self.0
    }
}

/// Builds ID/EX entries by running the real Decode stage, then overriding
/// the register values it read.
pub struct IdExBuilder(IdExEntry);

impl IdExBuilder {
    pub fn decode(pc: u32, inst: u32) -> Self {
        let if_id = IfIdBuilder::new().pc(pc).inst(inst).build();
        Self(decode_stage(
            &if_id,
            &RegisterFile::new(),
            RegWrite::default(),
        ))
    }

    pub fn rv1(mut self, val: u32) -> Self {
        self.0.rv1 = val;
        self
    }

    pub fn rv2(mut self, val: u32) -> Self {
        self.0.rv2 = val;
        self
    }

    pub fn build(self) -> IdExEntry {
        self.0
    }
}

/// EX/MEM entry for an ALU instruction writing `alu` to `rd`.
pub fn ex_alu(rd: usize, alu: u32) -> ExMemEntry {
    ExMemEntry {
        rd,
        alu,
        ctrl: ControlSignals {
            reg_write: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// EX/MEM entry for a load into `rd` whose address is `addr`.
pub fn ex_load(rd: usize, addr: u32) -> ExMemEntry {
    ExMemEntry {
        rd,
        alu: addr,
        ctrl: ControlSignals {
            reg_write: true,
            mem_read: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// MEM/WB entry for an ALU instruction writing `alu` to `rd`.
pub fn wb_alu(rd: usize, alu: u32) -> MemWbEntry {
    MemWbEntry {
        rd,
        alu,
        ctrl: ControlSignals {
            reg_write: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// MEM/WB entry for a load that returned `data` for `rd`.
pub fn wb_load(rd: usize, data: u32) -> MemWbEntry {
    MemWbEntry {
        rd,
        alu: 0xBAD0_ADD2,
        load_data: data,
        ctrl: ControlSignals {
            reg_write: true,
            mem_read: true,
            ..Default::default()
        },
        ..Default::default()
    }
}
