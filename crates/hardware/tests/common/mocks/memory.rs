use std::fmt;

use mockall::mock;
use rv32pipe_core::common::error::Trap;
use rv32pipe_core::soc::memory::{MemRequest, Memory};
use rv32pipe_core::soc::traits::{DataMemory, InstructionMemory};

mock! {
    pub DataMem {}
    impl DataMemory for DataMem {
        fn access(&mut self, req: &MemRequest) -> Result<u32, Trap>;
    }
}

mock! {
    pub InstMem {}
    impl InstructionMemory for InstMem {
        fn read(&mut self, addr: u32) -> Result<u32, Trap>;
    }
}

// The memory traits require `Debug`; mockall does not derive it.
impl fmt::Debug for MockDataMem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MockDataMem")
    }
}

impl fmt::Debug for MockInstMem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MockInstMem")
    }
}

/// Data memory that forwards to a [`Memory`] and logs every request.
pub struct RecordingMemory {
    pub inner: Memory,
    pub log: Vec<MemRequest>,
}

impl RecordingMemory {
    pub fn new(inner: Memory) -> Self {
        Self {
            inner,
            log: Vec::new(),
        }
    }

    pub fn stores(&self) -> Vec<MemRequest> {
        self.log.iter().filter(|r| r.write).copied().collect()
    }
}

impl fmt::Debug for RecordingMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingMemory")
            .field("requests", &self.log.len())
            .finish()
    }
}

impl DataMemory for RecordingMemory {
    fn access(&mut self, req: &MemRequest) -> Result<u32, Trap> {
        self.log.push(*req);
        self.inner.access(req)
    }
}
