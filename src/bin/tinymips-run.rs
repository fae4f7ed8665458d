use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tinymips::decoder::IsaDecoder;
use tinymips::exec::IntExecutor;
use tinymips::{Cpu, CpuConfig, LinearMemory, RunOutcome, StdHost};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a tinymips object file")]
struct Opts {
    /// JSON file with a CpuConfig (memory_size, load_base, max_steps)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the load address
    #[arg(long)]
    base: Option<u32>,
    /// Override the step limit
    #[arg(long)]
    max_steps: Option<u64>,
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let mut cfg = match &opts.config {
        Some(path) => {
            let txt = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<CpuConfig>(&txt)?
        }
        None => CpuConfig::default(),
    };
    if let Some(base) = opts.base {
        cfg.load_base = base;
    }
    if let Some(n) = opts.max_steps {
        cfg.max_steps = n;
    }

    let bytes = std::fs::read(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    anyhow::ensure!(
        bytes.len() % 4 == 0,
        "object file size {} is not a multiple of 4",
        bytes.len()
    );

    let mut mem = LinearMemory::new(cfg.memory_size);
    mem.load_bytes(cfg.load_base, &bytes)?;

    let mut cpu = Cpu::new(cfg);
    let dec = IsaDecoder::new();
    let exec = IntExecutor;
    let mut host = StdHost;

    match cpu.run(&mut mem, &dec, &exec, &mut host) {
        Ok(RunOutcome::Halted { steps }) => println!("Program halted normally after {steps} steps"),
        Ok(RunOutcome::StepLimit { steps }) => println!("Step limit reached ({steps}), stopping"),
        Err(trap) => eprintln!("TRAP: {trap}"),
    }

    println!("Registers:");
    for (i, v) in cpu.gpr.iter().enumerate().filter(|(_, v)| **v != 0) {
        println!("  r{i}: {v:#010x} ({v})");
    }
    println!("  pc: {:#010x}", cpu.pc);
    Ok(())
}
