//! `enigma`: encrypt or decrypt messages with a configured rotor machine.
//!
//! **Usage:**
//! ```text
//! enigma <CONFIG> [INPUT] [OUTPUT] [-v...]
//! ```
//!
//! INPUT defaults to standard input and OUTPUT to standard output. Any
//! error aborts the run with a message on standard error and exit status 1.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use enigma::{session, MachineConfig};

/// Simulate a rotor cipher machine over a stream of settings and messages.
#[derive(Parser)]
#[command(name = "enigma", version, about)]
struct Args {
    /// Machine configuration file.
    config: PathBuf,

    /// Input file of setting lines and messages (default: stdin).
    input: Option<PathBuf>,

    /// Output file for converted messages (default: stdout).
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config_text = fs::read_to_string(&args.config)
        .with_context(|| format!("could not open {}", args.config.display()))?;
    let mut machine = MachineConfig::parse(&config_text)?.build()?;

    let input = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("could not open {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("could not read standard input")?;
            buf
        }
    };

    let output = session::process(&mut machine, &input)?;

    match &args.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("could not write {}", path.display()))?,
        None => io::stdout()
            .write_all(output.as_bytes())
            .context("could not write standard output")?,
    }
    info!("done");
    Ok(())
}
