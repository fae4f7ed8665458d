use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;

use tinymips_disasm::{load_object, render, Line};

#[derive(Parser, Debug)]
#[command(author, version, about = "tinymips object listing", long_about = None)]
struct Cli {
    /// Input object file
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
    /// Skip N words at the start of the file
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Limit words listed (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Add disassembly text to each record
    #[arg(long)]
    decode: bool,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn text(lines: &[Line]) -> String {
    let mut buf = String::new();
    for l in lines {
        match &l.text {
            Some(t) => { let _ = writeln!(buf, "{}  {t}", l.entry); }
            None => { let _ = writeln!(buf, "{}", l.entry); }
        }
    }
    buf
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let img = load_object(&cli.input, cli.skip, cli.len)?;
    let lines = render(&img, cli.decode);

    let out = match cli.format {
        OutputFormat::Text => text(&lines),
        OutputFormat::Json => serde_json::to_string_pretty(&lines)? + "\n",
    };
    if let Some(path) = cli.out { std::fs::write(path, out)?; } else { print!("{}", out); }
    Ok(())
}
