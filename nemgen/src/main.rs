// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # nemgen
//!
//! Command-line front end for `nova-nemesis`.
//!
//! ```text
//! nemgen generate -c nemesis.toml -o nemesis.bin      # prints provisional hash
//! <execute nemesis.bin off-line, collect receipts/state hashes>
//! nemgen update -c nemesis.toml -b nemesis.bin --receipts-hash .. --state-hash ..
//! nemgen inspect -c nemesis.toml -b nemesis.bin       # JSON summary
//! ```
//!
//! Logs go to stderr, results to stdout.

mod cli;
mod logging;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::Path;

use cli::{Commands, GenerateArgs, InspectArgs, NemgenCli, UpdateArgs};
use logging::LogFormat;
use nova_nemesis::configuration::NemesisConfiguration;
use nova_nemesis::crypto::hash::{hash256_from_hex, Hash256};
use nova_nemesis::model::block::Block;
use nova_nemesis::nemesis::{
    create_nemesis_block, create_nemesis_block_element, update_nemesis_block, ExecutionHashes,
    NemesisBlock,
};

fn main() -> Result<()> {
    let cli = NemgenCli::parse();
    logging::init_logging(
        "nemgen=info,nova_nemesis=info",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Update(args) => update(args),
        Commands::Inspect(args) => inspect(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<NemesisConfiguration> {
    NemesisConfiguration::load(path)
        .with_context(|| format!("failed to load nemesis configuration {}", path.display()))
}

fn read_block(path: &Path) -> Result<Block> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Block::from_bytes(bytes).with_context(|| format!("{} is not a block", path.display()))
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

fn parse_hash(name: &str, value: &str) -> Result<Hash256> {
    hash256_from_hex(value).ok_or_else(|| anyhow!("{name} must be 64 hex characters, got {value:?}"))
}

/// Builds the block, writes it, prints its provisional hash.
fn generate(args: GenerateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let nemesis = create_nemesis_block(&config).context("failed to create nemesis block")?;

    write_bytes(&args.output, nemesis.block().as_bytes())?;
    tracing::info!(
        output = %args.output.display(),
        size = nemesis.block().size(),
        "provisional nemesis block written"
    );

    if let Some(summary_path) = &args.summary {
        let element = nemesis.to_element(&config.generation_seed)?;
        let json = serde_json::to_string_pretty(&element.summary())?;
        write_bytes(summary_path, json.as_bytes())?;
    }

    println!("{}", hex::encode_upper(nemesis.hash()));
    Ok(())
}

/// Patches execution results into a provisional block and re-signs it.
fn update(args: UpdateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let hashes = ExecutionHashes {
        receipts_hash: parse_hash("receipts hash", &args.receipts_hash)?,
        state_hash: parse_hash("state hash", &args.state_hash)?,
    };

    let block = read_block(&args.block)?;
    let mut nemesis = NemesisBlock::from_signed(block, &config.signer_public_key(), &config.generation_seed)
        .with_context(|| format!("{} was not signed by the configured signer", args.block.display()))?;
    let hash = update_nemesis_block(&config, &mut nemesis, &hashes)?;

    let output = args.output.as_deref().unwrap_or(&args.block);
    write_bytes(output, nemesis.block().as_bytes())?;
    tracing::info!(output = %output.display(), "finalized nemesis block written");

    println!("{}", hex::encode_upper(hash));
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let block = read_block(&args.block)?;
    let element = create_nemesis_block_element(&config, &block)?;
    println!("{}", serde_json::to_string_pretty(&element.summary())?);
    Ok(())
}

fn print_version() {
    println!("nemgen       {}", env!("CARGO_PKG_VERSION"));
    println!("nova-nemesis {}", nova_nemesis::VERSION);
}
