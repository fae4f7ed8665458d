use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tinymips::programs;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Program {
    Arith,
    Fibonacci,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble a built-in tinymips demo program")]
struct Opts {
    /// Output object file (little-endian words, no header)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
    /// Which demo program to assemble
    #[arg(short, long, value_enum, default_value_t = Program::Fibonacci)]
    program: Program,
    /// Print the listing as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let (name, built) = match opts.program {
        Program::Arith => ("arith", programs::arith()),
        Program::Fibonacci => ("fibonacci", programs::fibonacci()),
    };
    let mut prog = built?;

    let n = prog.finalize_to_path(&opts.output)?;
    println!("{}: {n} instructions -> {}", name, opts.output.display());

    let listing = prog.listing();
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for entry in &listing {
            println!("{entry}");
        }
    }
    Ok(())
}
