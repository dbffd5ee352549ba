//! Program Loader.
//!
//! This module populates the memories before the pipeline starts cycling. It performs:
//! 1. **Binary loading:** Reads a program file from disk into a byte buffer.
//! 2. **Flat images:** Copies raw bytes into both memories at an address.
//! 3. **Hex images:** Parses `$readmemh`-style text (one or more 32-bit hex words
//!    per line, `//` comments, `@offset` directives in words from the memory base).
//! 4. **ELF images:** Extracts `PT_LOAD` segments and the entry point with `object`.
//!
//! The same image is written to the instruction and the data memory.

use std::fs;
use std::path::Path;

use object::Endianness;
use object::elf::{EM_RISCV, PT_LOAD};
use object::read::elf::{ElfFile32, FileHeader, ProgramHeader};
use tracing::debug;

use crate::common::error::SimError;
use crate::sim::simulator::Simulator;

/// A contiguous run of words from a hex image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HexSegment {
    /// Offset of the first word from the memory base, in words.
    pub word_offset: u32,
    /// The words, in address order.
    pub words: Vec<u32>,
}

impl HexSegment {
    /// Byte address of the first word when the image is placed at `base`.
    ///
    /// `None` when the offset does not fit the 32-bit address space.
    pub fn address(&self, base: u32) -> Option<u32> {
        self.word_offset
            .checked_mul(4)
            .and_then(|off| base.checked_add(off))
    }
}

/// Loadable contents of an ELF executable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElfImage {
    /// Entry point address.
    pub entry: u32,
    /// `(address, bytes)` for each `PT_LOAD` segment, zero-filled to `p_memsz`.
    pub segments: Vec<(u32, Vec<u8>)>,
}

/// Loads a binary file from disk into a byte vector.
///
/// # Errors
///
/// Returns [`SimError::Load`] if the file cannot be read.
pub fn load_binary(path: &Path) -> Result<Vec<u8>, SimError> {
    fs::read(path).map_err(|source| SimError::Load {
        path: path.display().to_string(),
        source,
    })
}

/// Copies a flat binary into both memories at `addr`.
///
/// # Errors
///
/// Returns [`SimError::ImageTooLarge`] if the image does not fit.
pub fn load_flat(sim: &mut Simulator, bytes: &[u8], addr: u32) -> Result<(), SimError> {
    debug!(addr = format_args!("{addr:#010x}"), len = bytes.len(), "loading flat image");
    sim.load_image(addr, bytes)
}

/// Parses a `$readmemh`-style hex image.
///
/// # Errors
///
/// Returns [`SimError::HexImage`] for a token that is not a 32-bit hex word
/// or an `@` directive without a valid offset.
///
/// # Examples
///
/// ```
/// use rv32pipe_core::sim::loader::parse_hex_image;
///
/// let image = parse_hex_image("00a00513 // li a0, 10\n@4\n00000073\n").unwrap();
/// assert_eq!(image.len(), 2);
/// assert_eq!(image[0].words, vec![0x00a0_0513]);
/// assert_eq!(image[1].word_offset, 4);
/// ```
pub fn parse_hex_image(text: &str) -> Result<Vec<HexSegment>, SimError> {
    let mut segments = vec![HexSegment::default()];

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.split("//").next().unwrap_or_default();

        for token in line.split_whitespace() {
            let bad = |reason: String| SimError::HexImage {
                line: line_no,
                reason,
            };
            if let Some(offset) = token.strip_prefix('@') {
                let word_offset = parse_hex_word(offset)
                    .ok_or_else(|| bad(format!("bad address directive '{token}'")))?;
                segments.push(HexSegment {
                    word_offset,
                    words: Vec::new(),
                });
                continue;
            }
            let word =
                parse_hex_word(token).ok_or_else(|| bad(format!("bad hex word '{token}'")))?;
            if let Some(current) = segments.last_mut() {
                current.words.push(word);
            }
        }
    }

    segments.retain(|s| !s.words.is_empty());
    Ok(segments)
}

fn parse_hex_word(token: &str) -> Option<u32> {
    let digits: String = token.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() || digits.len() > 8 {
        return None;
    }
    u32::from_str_radix(&digits, 16).ok()
}

/// Loads a parsed hex image into both memories, relative to the memory base.
///
/// # Errors
///
/// Returns [`SimError::ImageTooLarge`] if a segment does not fit, including
/// an `@offset` beyond the 32-bit address space.
pub fn load_hex(sim: &mut Simulator, segments: &[HexSegment]) -> Result<(), SimError> {
    let base = sim.dmem().base();
    for seg in segments {
        let bytes: Vec<u8> = seg.words.iter().flat_map(|w| w.to_le_bytes()).collect();
        let addr = seg.address(base).ok_or(SimError::ImageTooLarge {
            addr: base,
            len: bytes.len(),
        })?;
        load_flat(sim, &bytes, addr)?;
    }
    Ok(())
}

/// Parses a 32-bit little-endian RISC-V ELF executable.
///
/// # Errors
///
/// Returns [`SimError::Elf`] if the file is not a 32-bit RISC-V ELF or a
/// segment's data lies outside the file.
pub fn load_elf(bytes: &[u8]) -> Result<ElfImage, SimError> {
    let file = ElfFile32::<Endianness>::parse(bytes).map_err(|e| SimError::Elf(e.to_string()))?;
    let endian = file.endian();
    let header = file.elf_header();
    if header.e_machine(endian) != EM_RISCV {
        return Err(SimError::Elf(format!(
            "not a RISC-V executable (e_machine {})",
            header.e_machine(endian)
        )));
    }

    let mut segments = Vec::new();
    for ph in file.elf_program_headers() {
        if ph.p_type(endian) != PT_LOAD {
            continue;
        }
        let addr = ph.p_paddr(endian);
        let data = ph
            .data(endian, bytes)
            .map_err(|()| SimError::Elf(format!("segment at {addr:#010x} is truncated")))?;
        let mut seg = data.to_vec();
        seg.resize(seg.len().max(ph.p_memsz(endian) as usize), 0);
        debug!(addr = format_args!("{addr:#010x}"), len = seg.len(), "ELF segment");
        segments.push((addr, seg));
    }

    Ok(ElfImage {
        entry: header.e_entry(endian),
        segments,
    })
}

/// Loads every segment of an ELF image into both memories.
///
/// The PC is not changed; configure `general.start_pc` with the entry point.
///
/// # Errors
///
/// Returns [`SimError::ImageTooLarge`] if a segment does not fit.
pub fn load_elf_segments(sim: &mut Simulator, image: &ElfImage) -> Result<(), SimError> {
    for (addr, bytes) in &image.segments {
        load_flat(sim, bytes, *addr)?;
    }
    Ok(())
}
