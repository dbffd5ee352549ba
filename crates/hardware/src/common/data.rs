//! Memory Access Types.
//!
//! This module classifies memory accesses for the two memory interfaces:
//! 1. **Direction:** Instruction fetch, data read, or data write.
//! 2. **Size:** Byte, half-word, or word, with the encoding the probe reports.
//! 3. **Fault Generation:** Mapping a direction to the right alignment/access trap.

use serde::Serialize;

use super::error::Trap;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccessType {
    /// Instruction fetch from the instruction memory.
    Fetch,

    /// Data read (load instruction).
    Read,

    /// Data write (store instruction).
    Write,
}

impl AccessType {
    /// Trap raised when an access of this type is misaligned.
    pub const fn misaligned(self, addr: u32) -> Trap {
        match self {
            Self::Fetch => Trap::InstructionAddressMisaligned(addr),
            Self::Read => Trap::LoadAddressMisaligned(addr),
            Self::Write => Trap::StoreAddressMisaligned(addr),
        }
    }

    /// Trap raised when an access of this type falls outside the memory.
    pub const fn access_fault(self, addr: u32) -> Trap {
        match self {
            Self::Fetch => Trap::InstructionAccessFault(addr),
            Self::Read => Trap::LoadAccessFault(addr),
            Self::Write => Trap::StoreAccessFault(addr),
        }
    }
}

/// Width of a data memory access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum MemSize {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Half,
    /// 32-bit access.
    #[default]
    Word,
}

impl MemSize {
    /// Number of bytes touched by an access of this size.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Two-bit size encoding (`0` byte, `1` half, `2` word), as driven on the
    /// data memory's size port.
    pub const fn encoded(self) -> u8 {
        match self {
            Self::Byte => 0,
            Self::Half => 1,
            Self::Word => 2,
        }
    }

    /// Mask selecting the low `bytes()` bytes of a word.
    pub const fn mask(self) -> u32 {
        match self {
            Self::Byte => 0xFF,
            Self::Half => 0xFFFF,
            Self::Word => 0xFFFF_FFFF,
        }
    }

    /// Sign-extends a zero-extended value of this size to 32 bits.
    pub const fn sign_extend(self, val: u32) -> u32 {
        match self {
            Self::Byte => val as u8 as i8 as i32 as u32,
            Self::Half => val as u16 as i16 as i32 as u32,
            Self::Word => val,
        }
    }
}
