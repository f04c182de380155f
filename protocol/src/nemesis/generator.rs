//! Configuration-driven entry points: create, update and describe a
//! nemesis block.

use super::assembler::assemble;
use super::error::NemesisError;
use super::finalizer::{BlockElement, ExecutionHashes, NemesisBlock};
use super::transactions::create_nemesis_transactions;
use crate::configuration::NemesisConfiguration;
use crate::crypto::hash::Hash256;
use crate::model::block::{Block, PreviousBlockContext};

/// Builds, extends and provisionally signs the nemesis block described by
/// `config`.
pub fn create_nemesis_block(config: &NemesisConfiguration) -> Result<NemesisBlock, NemesisError> {
    let transactions = create_nemesis_transactions(config)?;
    let signer = config.signer_public_key();

    let block = assemble(&PreviousBlockContext::default(), config.network, &signer, &transactions)?;
    let mut nemesis = NemesisBlock::assembled(block);
    if !config.signed_entries.is_empty() {
        nemesis = nemesis.extend(&transactions, &config.signed_entries)?;
        tracing::debug!(size = nemesis.block().size(), "signing extended nemesis block");
    }

    nemesis.sign(&config.signer, &config.generation_seed)?;
    tracing::info!(
        network = %config.network,
        transactions = transactions.len(),
        signed_payloads = config.signed_entries.payload_count(),
        size = nemesis.block().size(),
        "nemesis block created"
    );
    Ok(nemesis)
}

/// Applies execution results to a provisionally signed block and returns
/// the canonical block hash. Fails with [`NemesisError::UnexpectedSigner`]
/// when the block was signed by a key other than `config`'s signer.
pub fn update_nemesis_block(
    config: &NemesisConfiguration,
    block: &mut NemesisBlock,
    hashes: &ExecutionHashes,
) -> Result<Hash256, NemesisError> {
    block.apply_execution_results(hashes, &config.signer, &config.generation_seed)
}

/// Element form of a signed block under `config`'s generation seed.
pub fn create_nemesis_block_element<'a>(
    config: &NemesisConfiguration,
    block: &'a Block,
) -> Result<BlockElement<'a>, NemesisError> {
    super::finalizer::to_element(block, &config.generation_seed)
}
