//! Scratchpad core simulator CLI.
//!
//! This binary runs a JSON program through the core model. It performs:
//! 1. **Load:** Reads the program (and optionally a configuration document).
//! 2. **Run:** Executes with a cycle budget, reporting completion, a blocked atomic, or a fault.
//! 3. **Report:** Prints statistics and the requested register/scratchpad dumps.
//!
//! Exit status is 0 on completion, 2 when the stream is left blocked (or the budget
//! runs out), and 1 on a fault or unreadable input.

use std::fs;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use l1sim_core::common::L1Addr;
use l1sim_core::config::Config;
use l1sim_core::sim::{Program, RunOutcome, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "l1sim",
    author,
    version,
    about = "Scratchpad core behavioral model",
    long_about = "Run a JSON instruction stream against the L1 scratchpad model.\n\nSet RUST_LOG=trace to log every issue and completion.\n\nExamples:\n  l1sim run --program fifo.json\n  l1sim run --program cas.json --max-cycles 500 --dump-l1 0x100 16"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program until it completes, blocks, or exhausts the cycle budget.
    Run {
        /// Program document (JSON).
        #[arg(short, long)]
        program: String,

        /// Configuration document (JSON); defaults apply to missing fields.
        #[arg(short, long)]
        config: Option<String>,

        /// Cycle budget.
        #[arg(long, default_value_t = 100_000)]
        max_cycles: u64,

        /// Print the register file after the run.
        #[arg(long)]
        dump_regs: bool,

        /// Print `LEN` scratchpad bytes starting at `ADDR` after the run.
        #[arg(long, num_args = 2, value_names = ["ADDR", "LEN"], value_parser = parse_number)]
        dump_l1: Option<Vec<u64>>,
    },
}

/// Parses a decimal or `0x`-prefixed hexadecimal number.
fn parse_number(text: &str) -> Result<u64, String> {
    let parsed = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .map_or_else(|| text.parse::<u64>(), |hex| u64::from_str_radix(hex, 16));
    parsed.map_err(|e| format!("invalid number '{text}': {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            program,
            config,
            max_cycles,
            dump_regs,
            dump_l1,
        } => cmd_run(&program, config.as_deref(), max_cycles, dump_regs, dump_l1.as_deref()),
    }
}

/// Loads the configuration, or the defaults when no path is given.
fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {path}: {e}");
        process::exit(1);
    });
    Config::from_json(&text).unwrap_or_else(|e| {
        eprintln!("Error in config {path}: {e}");
        process::exit(1);
    })
}

/// Runs a program file and exits with the status matching its outcome.
fn cmd_run(
    program_path: &str,
    config_path: Option<&str>,
    max_cycles: u64,
    dump_regs: bool,
    dump_l1: Option<&[u64]>,
) {
    let config = load_config(config_path);
    tracing::debug!(?config, "configuration");
    let program = Program::from_file(program_path).unwrap_or_else(|e| {
        eprintln!("Error loading {program_path}: {e}");
        process::exit(1);
    });

    println!(
        "[*] {program_path}: {} instructions, {} preloads",
        program.len(),
        program.preload.len()
    );
    println!(
        "    GPRs: {}  L1: {} KiB  settle: ld/st={} swap={} incget={}  retry={}",
        config.core.gpr_count,
        config.core.l1_size / 1024,
        config.timing.load_store_settle,
        config.timing.atswap_settle,
        config.timing.atincget_settle,
        config.timing.atomic_retry_interval
    );

    let mut sim = Simulator::new(&config, program).unwrap_or_else(|e| {
        eprintln!("Error applying preloads: {e}");
        process::exit(1);
    });

    let code = match sim.run(max_cycles) {
        Ok(RunOutcome::Completed { cycles }) => {
            println!("\n[*] Completed in {cycles} cycles");
            0
        }
        Ok(RunOutcome::Blocked { pc, attempts }) => {
            let inst = sim.program().instructions.get(pc).map(ToString::to_string);
            println!(
                "\n[!] Blocked at #{pc} ({}) after {attempts} attempts",
                inst.unwrap_or_default()
            );
            2
        }
        Ok(RunOutcome::Incomplete { pc }) => {
            println!("\n[!] Cycle budget of {max_cycles} exhausted at #{pc}");
            2
        }
        Err(e) => {
            eprintln!("\n[!] FAULT at #{}: {e}", sim.pc());
            1
        }
    };

    sim.cpu.stats.print();

    if dump_regs {
        println!("\nREGISTERS");
        print!("{}", sim.cpu.regs);
    }
    if let Some(&[addr, len]) = dump_l1 {
        match sim.cpu.l1.peek_bytes(L1Addr::new(addr), len as usize) {
            Ok(bytes) => {
                println!("\nL1 {:#06x}..{:#06x}", addr, addr + len);
                for (i, row) in bytes.chunks(16).enumerate() {
                    let hex: Vec<String> = row.iter().map(|b| format!("{b:02x}")).collect();
                    println!("  {:#06x}: {}", addr + 16 * i as u64, hex.join(" "));
                }
            }
            Err(e) => eprintln!("Error dumping L1: {e}"),
        }
    }

    process::exit(code);
}
