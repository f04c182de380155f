//! # CLI Interface
//!
//! `nemgen` subcommands: `generate`, `update`, `inspect` and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NOVA nemesis block generator.
///
/// Builds the founding block of a network from a TOML description, then
/// patches in the execution results once the block has been run off-line.
#[derive(Parser, Debug)]
#[command(
    name = "nemgen",
    about = "NOVA nemesis block generator",
    version,
    propagate_version = true
)]
pub struct NemgenCli {
    /// Log output format: "pretty" or "json".
    #[arg(long, global = true, env = "NEMGEN_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and provisionally sign a nemesis block.
    Generate(GenerateArgs),
    /// Write receipts and state hashes into a signed block and re-sign it.
    Update(UpdateArgs),
    /// Print a JSON summary of a signed block.
    Inspect(InspectArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Nemesis configuration file (TOML).
    #[arg(long, short = 'c', env = "NEMGEN_CONFIG")]
    pub config: PathBuf,

    /// Where to write the binary block.
    #[arg(long, short = 'o', env = "NEMGEN_OUTPUT", default_value = "nemesis.bin")]
    pub output: PathBuf,

    /// Also write a JSON summary of the block to this path.
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Nemesis configuration file the block was generated from.
    #[arg(long, short = 'c', env = "NEMGEN_CONFIG")]
    pub config: PathBuf,

    /// Provisionally signed block produced by `generate`.
    #[arg(long, short = 'b')]
    pub block: PathBuf,

    /// Hex receipts hash from executing the block.
    #[arg(long)]
    pub receipts_hash: String,

    /// Hex state hash from executing the block.
    #[arg(long)]
    pub state_hash: String,

    /// Output path. Defaults to overwriting `--block`.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Nemesis configuration file, for the generation seed.
    #[arg(long, short = 'c', env = "NEMGEN_CONFIG")]
    pub config: PathBuf,

    /// Signed block to describe.
    #[arg(long, short = 'b')]
    pub block: PathBuf,
}
