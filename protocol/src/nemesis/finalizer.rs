//! # Block Finalizer
//!
//! Signing, execution-result patching and element conversion for nemesis
//! blocks.
//!
//! ## Two-phase finalization
//!
//! ```text
//!   assemble / extend
//!          │
//!          ▼
//!     Assembled ──sign──▶ ProvisionallySigned ──apply_execution_results──▶ Finalized
//!                               (hash H1)                                  (hash H2)
//! ```
//!
//! The provisional block is executed off-line to learn its receipts and
//! state hashes. Writing them changes the signed header, so the block is
//! re-signed in the same call and only H2 is canonical. There is no way
//! to observe a patched block that has not been re-signed.

use serde::Serialize;

use super::assembler;
use super::entry::SignedTransactionEntries;
use super::error::{BlockStage, NemesisError};
use crate::config::entity_type_name;
use crate::crypto::hash::{merkle_root, sha256_multi, Hash256};
use crate::crypto::keys::{NovaKeypair, NovaPublicKey};
use crate::crypto::signatures;
use crate::model::block::Block;
use crate::model::entity::EntityView;
use crate::transaction::signing::{transaction_hash, verify_transaction};
use crate::transaction::types::Transaction;

/// Receipts and state commitments produced by executing the nemesis block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutionHashes {
    pub receipts_hash: Hash256,
    pub state_hash: Hash256,
}

/// Merkle root over the entity hashes of every record in the block.
pub fn calculate_transactions_hash(block: &Block, generation_seed: &Hash256) -> Result<Hash256, NemesisError> {
    let mut leaves = Vec::new();
    for record in block.records() {
        let record = record?;
        let entity = EntityView::parse(record.bytes)?;
        leaves.push(transaction_hash(&entity, generation_seed));
    }
    Ok(merkle_root(&leaves))
}

/// Block hash: SHA-256 over signature, signer and the signed header bytes.
pub fn block_hash(block: &Block) -> Hash256 {
    let signature = block.signature();
    let signer = block.signer();
    sha256_multi(&[signature.as_bytes(), signer.as_bytes(), block.header_signed_data()])
}

/// Signs the full block in place.
///
/// Recomputes the transactions hash from the current records, writes the
/// signer and beneficiary, then signs `seed || header[108..304]`.
///
/// Every record must be a complete entity of at least 112 bytes whose
/// `size` field matches its extent. A record that is too short fails with
/// [`NemesisError::Entity`]; a size field that disagrees with the layout
/// fails with [`NemesisError::MalformedBlock`]. The block is untouched on
/// error.
pub fn sign_full_block(
    block: &mut Block,
    keypair: &NovaKeypair,
    generation_seed: &Hash256,
) -> Result<(), NemesisError> {
    let transactions_hash = calculate_transactions_hash(block, generation_seed)?;
    let signer = keypair.public_key();
    block.set_transactions_hash(&transactions_hash);
    block.set_signer(&signer);
    block.set_beneficiary(&signer);

    let signature = signatures::sign(keypair, generation_seed, block.header_signed_data());
    block.set_signature(&signature);
    tracing::debug!(size = block.size(), signer = %signer.to_hex(), "signed full block");
    Ok(())
}

/// Writes the execution commitments, re-signs and returns the new hash.
pub fn update_with_execution_results(
    block: &mut Block,
    hashes: &ExecutionHashes,
    keypair: &NovaKeypair,
    generation_seed: &Hash256,
) -> Result<Hash256, NemesisError> {
    block.set_receipts_hash(&hashes.receipts_hash);
    block.set_state_hash(&hashes.state_hash);
    sign_full_block(block, keypair, generation_seed)?;
    Ok(block_hash(block))
}

/// `true` when the signature verifies against the block's signer and the
/// transactions hash matches the records actually in the block.
pub fn verify_block_signature(block: &Block, generation_seed: &Hash256) -> bool {
    match calculate_transactions_hash(block, generation_seed) {
        Ok(hash) if hash == block.transactions_hash() => {}
        _ => return false,
    }
    signatures::verify(
        &block.signer(),
        generation_seed,
        block.header_signed_data(),
        &block.signature(),
    )
}

// ---------------------------------------------------------------------------
// Block element
// ---------------------------------------------------------------------------

/// One record of a block element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInfo {
    pub offset: usize,
    pub size: usize,
    pub entity_type: u16,
    pub signer: NovaPublicKey,
    pub entity_hash: Hash256,
    pub signature_valid: bool,
}

/// A block together with everything derived from it for downstream use.
#[derive(Clone, Debug)]
pub struct BlockElement<'a> {
    pub block: &'a Block,
    pub entity_hash: Hash256,
    pub generation_seed: Hash256,
    pub transactions: Vec<TransactionInfo>,
}

/// Decodes `block` into its element form. Pure.
pub fn to_element<'a>(block: &'a Block, generation_seed: &Hash256) -> Result<BlockElement<'a>, NemesisError> {
    let mut transactions = Vec::new();
    for record in block.records() {
        let record = record?;
        let entity = EntityView::parse(record.bytes)?;
        transactions.push(TransactionInfo {
            offset: record.offset,
            size: record.bytes.len(),
            entity_type: entity.entity_type(),
            signer: entity.signer(),
            entity_hash: transaction_hash(&entity, generation_seed),
            signature_valid: verify_transaction(&entity, generation_seed),
        });
    }

    Ok(BlockElement {
        block,
        entity_hash: block_hash(block),
        generation_seed: *generation_seed,
        transactions,
    })
}

/// Hex/JSON-friendly rendering of a [`BlockElement`].
#[derive(Clone, Debug, Serialize)]
pub struct BlockElementSummary {
    pub hash: String,
    pub generation_seed: String,
    pub size: usize,
    pub entity_type: String,
    pub height: u64,
    pub signer: String,
    pub transactions_hash: String,
    pub receipts_hash: String,
    pub state_hash: String,
    pub transactions: Vec<TransactionSummary>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TransactionSummary {
    pub offset: usize,
    pub size: usize,
    pub entity_type: String,
    pub signer: String,
    pub entity_hash: String,
    pub signature_valid: bool,
}

impl BlockElement<'_> {
    pub fn summary(&self) -> BlockElementSummary {
        BlockElementSummary {
            hash: hex::encode_upper(self.entity_hash),
            generation_seed: hex::encode_upper(self.generation_seed),
            size: self.block.size(),
            entity_type: entity_type_name(self.block.entity_type()),
            height: self.block.height(),
            signer: self.block.signer().to_hex(),
            transactions_hash: hex::encode_upper(self.block.transactions_hash()),
            receipts_hash: hex::encode_upper(self.block.receipts_hash()),
            state_hash: hex::encode_upper(self.block.state_hash()),
            transactions: self
                .transactions
                .iter()
                .map(|tx| TransactionSummary {
                    offset: tx.offset,
                    size: tx.size,
                    entity_type: entity_type_name(tx.entity_type),
                    signer: tx.signer.to_hex(),
                    entity_hash: hex::encode_upper(tx.entity_hash),
                    signature_valid: tx.signature_valid,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// A nemesis block and the finalization stage it has reached.
///
/// Every mutation goes through a stage transition; anything else is an
/// [`NemesisError::InvalidStage`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NemesisBlock {
    block: Block,
    stage: BlockStage,
}

impl NemesisBlock {
    /// Wraps a freshly assembled, unsigned block.
    pub fn assembled(block: Block) -> Self {
        Self {
            block,
            stage: BlockStage::Assembled,
        }
    }

    /// Wraps a block read back from disk after checking its signature and
    /// that it was signed by `expected_signer`.
    ///
    /// Zero receipts and state hashes mean execution results were never
    /// applied, so the block is provisionally signed; otherwise finalized.
    pub fn from_signed(
        block: Block,
        expected_signer: &NovaPublicKey,
        generation_seed: &Hash256,
    ) -> Result<Self, NemesisError> {
        if !verify_block_signature(&block, generation_seed) {
            return Err(NemesisError::InvalidSignature);
        }
        check_signer(&block, expected_signer)?;
        let stage = if block.receipts_hash() == [0u8; 32] && block.state_hash() == [0u8; 32] {
            BlockStage::ProvisionallySigned
        } else {
            BlockStage::Finalized
        };
        Ok(Self { block, stage })
    }

    pub fn stage(&self) -> BlockStage {
        self.stage
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn into_block(self) -> Block {
        self.block
    }

    pub fn hash(&self) -> Hash256 {
        block_hash(&self.block)
    }

    fn require(&self, stage: BlockStage, action: &'static str) -> Result<(), NemesisError> {
        if self.stage != stage {
            return Err(NemesisError::InvalidStage {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    /// Appends signed payloads; only an unsigned block can grow.
    pub fn extend(
        self,
        transactions: &[Transaction],
        entries: &SignedTransactionEntries,
    ) -> Result<Self, NemesisError> {
        self.require(BlockStage::Assembled, "extend")?;
        Ok(Self {
            block: assembler::extend(self.block, transactions, entries)?,
            stage: BlockStage::Assembled,
        })
    }

    /// Assembled → ProvisionallySigned. Returns the provisional hash.
    pub fn sign(&mut self, keypair: &NovaKeypair, generation_seed: &Hash256) -> Result<Hash256, NemesisError> {
        self.require(BlockStage::Assembled, "sign")?;
        sign_full_block(&mut self.block, keypair, generation_seed)?;
        self.stage = BlockStage::ProvisionallySigned;
        let hash = self.hash();
        tracing::info!(hash = %hex::encode_upper(hash), size = self.block.size(), "nemesis block provisionally signed");
        Ok(hash)
    }

    /// ProvisionallySigned → Finalized. Patches and re-signs in one step
    /// and returns the canonical hash. `keypair` must be the one that
    /// produced the provisional signature.
    pub fn apply_execution_results(
        &mut self,
        hashes: &ExecutionHashes,
        keypair: &NovaKeypair,
        generation_seed: &Hash256,
    ) -> Result<Hash256, NemesisError> {
        self.require(BlockStage::ProvisionallySigned, "apply execution results to")?;
        check_signer(&self.block, &keypair.public_key())?;
        let mut patched = self.block.clone();
        let hash = update_with_execution_results(&mut patched, hashes, keypair, generation_seed)?;
        self.block = patched;
        self.stage = BlockStage::Finalized;
        tracing::info!(hash = %hex::encode_upper(hash), "nemesis block finalized");
        Ok(hash)
    }

    /// Element view of a signed block.
    pub fn to_element(&self, generation_seed: &Hash256) -> Result<BlockElement<'_>, NemesisError> {
        if self.stage == BlockStage::Assembled {
            return Err(NemesisError::InvalidStage {
                action: "convert to an element",
                stage: self.stage,
            });
        }
        to_element(&self.block, generation_seed)
    }
}

fn check_signer(block: &Block, expected: &NovaPublicKey) -> Result<(), NemesisError> {
    let actual = block.signer();
    if actual != *expected {
        return Err(NemesisError::UnexpectedSigner {
            expected: *expected,
            actual,
        });
    }
    Ok(())
}
