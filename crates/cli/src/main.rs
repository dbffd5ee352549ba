//! RV32I pipeline simulator CLI.
//!
//! This binary wraps the simulator library for command-line use. It performs:
//! 1. **Run:** Loads a flat binary, `$readmemh` hex image or ELF file, runs it to a
//!    halt, and reports the exit status and statistics.
//! 2. **Trace:** Optionally prints the per-cycle signal probe as text or JSON lines.
//! 3. **Disassemble:** Lists a program image as RV32I assembly.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, io};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rv32pipe_core::common::SimError;
use rv32pipe_core::config::Config;
use rv32pipe_core::isa::disasm::disassemble;
use rv32pipe_core::sim::loader;
use rv32pipe_core::sim::{Halt, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "rv32pipe",
    author,
    version,
    about = "Cycle-accurate five-stage RV32I pipeline simulator",
    long_about = "Run a program on a five-stage in-order RV32I pipeline.\n\nExamples:\n  rv32pipe run prog.bin\n  rv32pipe run prog.hex --trace text\n  rv32pipe run prog.elf --config sim.json --stats json\n  rv32pipe disasm prog.bin"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program until ECALL, EBREAK, a trap, or the cycle budget.
    Run {
        /// Program image.
        file: PathBuf,

        /// Image format; `auto` decides from the extension and ELF magic.
        #[arg(long, value_enum, default_value_t = Format::Auto)]
        format: Format,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Load address for flat binaries (defaults to the memory base).
        #[arg(long, value_parser = parse_u32)]
        load_addr: Option<u32>,

        /// Override `general.max_cycles`.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Resolve every data hazard by stalling instead of forwarding.
        #[arg(long)]
        no_forwarding: bool,

        /// Per-cycle signal trace.
        #[arg(long, value_enum, default_value_t = TraceFormat::None)]
        trace: TraceFormat,

        /// Statistics output.
        #[arg(long, value_enum, default_value_t = StatsFormat::Text)]
        stats: StatsFormat,
    },

    /// Disassemble a flat binary, hex image or ELF file.
    Disasm {
        /// Program image.
        file: PathBuf,

        /// Image format.
        #[arg(long, value_enum, default_value_t = Format::Auto)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Auto,
    Bin,
    Hex,
    Elf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TraceFormat {
    None,
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StatsFormat {
    None,
    Text,
    Json,
}

fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .map_or_else(|| s.parse(), |hex| u32::from_str_radix(hex, 16));
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            file,
            format,
            config,
            load_addr,
            max_cycles,
            no_forwarding,
            trace,
            stats,
        } => cmd_run(&RunArgs {
            file,
            format,
            config,
            load_addr,
            max_cycles,
            no_forwarding,
            trace,
            stats,
        }),
        Commands::Disasm { file, format } => cmd_disasm(&file, format),
    };

    result.unwrap_or_else(|e| {
        error!("{e}");
        eprintln!("\n[!] {e}");
        ExitCode::FAILURE
    })
}

struct RunArgs {
    file: PathBuf,
    format: Format,
    config: Option<PathBuf>,
    load_addr: Option<u32>,
    max_cycles: Option<u64>,
    no_forwarding: bool,
    trace: TraceFormat,
    stats: StatsFormat,
}

fn resolve_format(path: &Path, bytes: &[u8], format: Format) -> Format {
    if format != Format::Auto {
        return format;
    }
    if bytes.starts_with(b"\x7fELF") {
        return Format::Elf;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("hex" | "mem" | "x") => Format::Hex,
        _ => Format::Bin,
    }
}

fn read_config(path: Option<&Path>) -> Result<Config, SimError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).map_err(|source| SimError::Load {
        path: path.display().to_string(),
        source,
    })?;
    Config::from_json(&text)
}

/// Loads the program, runs it, and prints the outcome.
fn cmd_run(args: &RunArgs) -> Result<ExitCode, SimError> {
    let mut config = read_config(args.config.as_deref())?;
    if let Some(max) = args.max_cycles {
        config.general.max_cycles = max;
    }
    if args.no_forwarding {
        config.pipeline.forwarding = false;
    }
    config.general.probe |= args.trace != TraceFormat::None;

    let bytes = loader::load_binary(&args.file)?;
    let format = resolve_format(&args.file, &bytes, args.format);
    let elf = if format == Format::Elf {
        let image = loader::load_elf(&bytes)?;
        config.general.start_pc = image.entry;
        Some(image)
    } else {
        None
    };

    let mut sim = Simulator::new(&config)?;
    match (format, &elf) {
        (_, Some(image)) => loader::load_elf_segments(&mut sim, image)?,
        (Format::Hex, None) => {
            let text = String::from_utf8_lossy(&bytes);
            loader::load_hex(&mut sim, &loader::parse_hex_image(&text)?)?;
        }
        _ => {
            let addr = args.load_addr.unwrap_or(config.memory.base);
            loader::load_flat(&mut sim, &bytes, addr)?;
        }
    }
    info!(file = %args.file.display(), ?format, "program loaded");

    let trace = args.trace;
    let outcome = sim.run_with(|probe| match trace {
        TraceFormat::Text => print!("--- cycle {} ---\n{probe}", probe.cycle),
        TraceFormat::Json => match probe.to_json_line() {
            Ok(line) => println!("{line}"),
            Err(e) => error!("probe serialisation failed: {e}"),
        },
        TraceFormat::None => {}
    });

    match args.stats {
        StatsFormat::Text => sim.stats.print(),
        StatsFormat::Json => println!(
            "{}",
            sim.stats
                .to_json()
                .map_err(|e| SimError::Config(e.to_string()))?
        ),
        StatsFormat::None => {}
    }

    let summary = outcome?;
    match summary.halt {
        Halt::Ecall { exit_code } => {
            println!(
                "[*] ECALL after {} cycles, {} instructions: exit code {exit_code}",
                summary.cycles, summary.retired
            );
            Ok(ExitCode::from(exit_code as u8))
        }
        Halt::Ebreak { pc } => {
            println!(
                "[*] EBREAK at {pc:#010x} after {} cycles, {} instructions",
                summary.cycles, summary.retired
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prints one line per instruction word of a program image.
fn cmd_disasm(path: &Path, format: Format) -> Result<ExitCode, SimError> {
    let bytes = loader::load_binary(path)?;
    let base = Config::default().memory.base;

    let words: Vec<(u32, u32)> = match resolve_format(path, &bytes, format) {
        Format::Hex => {
            let text = String::from_utf8_lossy(&bytes);
            let mut words = Vec::new();
            for seg in loader::parse_hex_image(&text)? {
                let start = seg.address(base).ok_or(SimError::ImageTooLarge {
                    addr: base,
                    len: seg.words.len() * 4,
                })?;
                let bytes: Vec<u8> = seg.words.iter().flat_map(|w| w.to_le_bytes()).collect();
                words.extend(flat_words(start, &bytes));
            }
            words
        }
        Format::Elf => loader::load_elf(&bytes)?
            .segments
            .into_iter()
            .flat_map(|(addr, data)| flat_words(addr, &data))
            .collect(),
        Format::Auto | Format::Bin => flat_words(base, &bytes),
    };

    for (addr, word) in words {
        println!("{addr:08x}:  {word:08x}  {}", disassemble(word));
    }
    Ok(ExitCode::SUCCESS)
}

fn flat_words(base: u32, bytes: &[u8]) -> Vec<(u32, u32)> {
    bytes
        .chunks(4)
        .enumerate()
        .map(|(i, chunk)| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            (base.wrapping_add(4 * i as u32), u32::from_le_bytes(word))
        })
        .collect()
}
