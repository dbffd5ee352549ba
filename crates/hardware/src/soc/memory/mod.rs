//! Flat byte-addressed memory.
//!
//! This module implements the array store that backs both memory interfaces:
//! 1. **Storage:** A little-endian byte vector mapped at a base address.
//! 2. **Requests:** The [`MemRequest`] issued by the Memory stage.
//! 3. **Checks:** Range checks always; natural-alignment checks when strict.

use crate::common::data::{AccessType, MemSize};
use crate::common::error::{SimError, Trap};
use crate::soc::traits::{DataMemory, InstructionMemory};

/// A data-memory request issued by the Memory stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemRequest {
    /// Byte address (the Execute stage's ALU result).
    pub addr: u32,
    /// `true` for stores.
    pub write: bool,
    /// Access width.
    pub size: MemSize,
    /// Store data (forwarded `rs2`); ignored for loads.
    pub wdata: u32,
}

impl MemRequest {
    /// A load of `size` bytes from `addr`.
    pub const fn load(addr: u32, size: MemSize) -> Self {
        Self {
            addr,
            write: false,
            size,
            wdata: 0,
        }
    }

    /// A store of the low `size` bytes of `wdata` to `addr`.
    pub const fn store(addr: u32, size: MemSize, wdata: u32) -> Self {
        Self {
            addr,
            write: true,
            size,
            wdata,
        }
    }
}

/// Byte-addressed RAM mapped at `base`.
#[derive(Clone, Debug)]
pub struct Memory {
    data: Vec<u8>,
    base: u32,
    strict_alignment: bool,
}

impl Memory {
    /// Creates a zero-filled memory of `size` bytes mapped at `base`.
    pub fn new(base: u32, size: u32, strict_alignment: bool) -> Self {
        Self {
            data: vec![0; size as usize],
            base,
            strict_alignment,
        }
    }

    /// Base address of the mapping.
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Size in bytes.
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the memory has zero size.
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copies `bytes` into memory starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ImageTooLarge`] if any byte would fall outside the mapping.
    pub fn load(&mut self, addr: u32, bytes: &[u8]) -> Result<(), SimError> {
        let span = addr
            .checked_sub(self.base)
            .map(|start| start as usize)
            .and_then(|start| Some((start, start.checked_add(bytes.len())?)))
            .filter(|&(_, end)| end <= self.data.len());
        let Some((start, end)) = span else {
            return Err(SimError::ImageTooLarge {
                addr,
                len: bytes.len(),
            });
        };
        self.data[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Reads `size` bytes at `addr`, zero-extended.
    ///
    /// # Errors
    ///
    /// Returns the access-type specific fault on misalignment (strict mode) or
    /// when the access leaves the mapping.
    pub fn read_sized(&self, addr: u32, size: MemSize, access: AccessType) -> Result<u32, Trap> {
        let offset = self.check(addr, size, access)?;
        let val = (0..size.bytes() as usize).fold(0u32, |acc, i| {
            acc | (u32::from(self.data[offset + i]) << (8 * i))
        });
        Ok(val)
    }

    /// Writes the low `size` bytes of `val` at `addr`.
    ///
    /// # Errors
    ///
    /// Returns a store fault on misalignment (strict mode) or out-of-range access.
    pub fn write(&mut self, addr: u32, size: MemSize, val: u32) -> Result<(), Trap> {
        let offset = self.check(addr, size, AccessType::Write)?;
        for i in 0..size.bytes() as usize {
            self.data[offset + i] = (val >> (8 * i)) as u8;
        }
        Ok(())
    }

    /// Reads a word without alignment checks, for harness inspection.
    ///
    /// Returns `None` when the word is not entirely inside the mapping.
    pub fn peek_u32(&self, addr: u32) -> Option<u32> {
        let offset = addr.checked_sub(self.base)? as usize;
        let bytes = self.data.get(offset..offset.checked_add(4)?)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Raw contents, starting at `base`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn check(&self, addr: u32, size: MemSize, access: AccessType) -> Result<usize, Trap> {
        let align = match access {
            AccessType::Fetch => 4,
            AccessType::Read | AccessType::Write if self.strict_alignment => size.bytes(),
            AccessType::Read | AccessType::Write => 1,
        };
        if addr % align != 0 {
            return Err(access.misaligned(addr));
        }
        let offset = addr
            .checked_sub(self.base)
            .ok_or_else(|| access.access_fault(addr))? as usize;
        if offset + size.bytes() as usize > self.data.len() {
            return Err(access.access_fault(addr));
        }
        Ok(offset)
    }
}

impl InstructionMemory for Memory {
    fn read(&mut self, addr: u32) -> Result<u32, Trap> {
        self.read_sized(addr, MemSize::Word, AccessType::Fetch)
    }
}

impl DataMemory for Memory {
    fn access(&mut self, req: &MemRequest) -> Result<u32, Trap> {
        if req.write {
            self.write(req.addr, req.size, req.wdata)?;
            Ok(0)
        } else {
            self.read_sized(req.addr, req.size, AccessType::Read)
        }
    }
}
