//! abstract-synth: inspect contract analysis and type synthesis over a manifest
//!
//! ## Example Usage
//!
//! ```bash
//! # What would a concrete Zoo.Animal still have to implement?
//! abstract-synth analyze zoo.json Zoo.Animal
//!
//! # Synthesize (or reuse) a concrete type and construct it
//! abstract-synth instantiate zoo.json Zoo.Animal
//!
//! # Call a method on the result; stubs exit non-zero
//! abstract-synth invoke zoo.json Zoo.Animal Feed --param int
//! ```
//!
//! Emission can be switched off with `ABSTRACT_SYNTH_EMIT=0`.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod synth_cli;

use synth_cli::{analyze::AnalyzeCmd, instantiate::InstantiateCmd, invoke::InvokeCmd};

#[derive(Parser)]
#[command(
    name = "abstract-synth",
    author,
    version,
    about = "Concrete-type synthesis for abstract contracts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the members a concrete type would still owe
    Analyze(AnalyzeCmd),

    /// Resolve a concrete type for a contract and construct it
    Instantiate(InstantiateCmd),

    /// Instantiate a contract and invoke one method
    Invoke(InvokeCmd),
}

fn main() -> Result<()> {
    let Cli { command, json } = Cli::parse();

    match command {
        Commands::Analyze(cmd) => cmd.execute(json),
        Commands::Instantiate(cmd) => cmd.execute(json),
        Commands::Invoke(cmd) => cmd.execute(json),
    }
}
