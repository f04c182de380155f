//! # Block Record
//!
//! A block is one contiguous byte buffer: a fixed 304-byte header followed
//! by the transactions region.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  entity header (112)   type = nemesis block │
//! │  height: u64                           @112 │
//! │  timestamp: u64                        @120 │
//! │  difficulty: u64                       @128 │
//! │  previous_block_hash: [u8; 32]         @136 │
//! │  transactions_hash: [u8; 32]           @168 │
//! │  receipts_hash: [u8; 32]               @200 │
//! │  state_hash: [u8; 32]                  @232 │
//! │  beneficiary: [u8; 32]                 @264 │
//! │  fee_multiplier: u32                   @296 │
//! │  reserved: u32                         @300 │
//! ├─────────────────────────────────────────────┤
//! │  record 0 │ pad │ record 1 │ pad │ … │ last │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Alignment
//!
//! Every record except the last is followed by 0-7 zero bytes so that the
//! next record starts on an 8-byte boundary. The last record is never
//! padded: the `size` field is exact and the block has no trailing bytes.

use byteorder::{ByteOrder, LittleEndian};
use std::fmt;
use thiserror::Error;

use super::entity::{self, EntityError, EntityView, SIZE_OFFSET};
use crate::config::{padding_size, BLOCK_HEADER_SIZE, ENTITY_SIGNED_DATA_OFFSET};
use crate::crypto::hash::Hash256;
use crate::crypto::keys::{NovaPublicKey, NovaSignature};

pub const HEIGHT_OFFSET: usize = 112;
pub const TIMESTAMP_OFFSET: usize = 120;
pub const DIFFICULTY_OFFSET: usize = 128;
pub const PREVIOUS_BLOCK_HASH_OFFSET: usize = 136;
pub const TRANSACTIONS_HASH_OFFSET: usize = 168;
pub const RECEIPTS_HASH_OFFSET: usize = 200;
pub const STATE_HASH_OFFSET: usize = 232;
pub const BENEFICIARY_OFFSET: usize = 264;
pub const FEE_MULTIPLIER_OFFSET: usize = 296;

/// Errors found while reading a block buffer or walking its records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("malformed block: {0}")]
    Entity(#[from] EntityError),

    #[error("malformed block: header declares {0} bytes, below the {BLOCK_HEADER_SIZE}-byte header")]
    HeaderTooShort(usize),

    #[error("malformed transaction record at block offset {offset}: {reason}")]
    MalformedRecord {
        /// Absolute offset of the offending record.
        offset: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Chain position the nemesis block builds on. All zeros for a new network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviousBlockContext {
    pub height: u64,
    pub block_hash: Hash256,
    pub timestamp: u64,
}

/// An owned block buffer whose `size` field always equals its length.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    bytes: Vec<u8>,
}

fn read_hash(bytes: &[u8], offset: usize) -> Hash256 {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes[offset..offset + 32]);
    hash
}

impl Block {
    /// Takes ownership of a serialized block after checking its header and
    /// its `size` field.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, BlockError> {
        EntityView::parse(&bytes)?;
        if bytes.len() < BLOCK_HEADER_SIZE {
            return Err(BlockError::HeaderTooShort(bytes.len()));
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Value of the `size` field; equal to the buffer length by construction.
    pub fn size(&self) -> usize {
        LittleEndian::read_u32(&self.bytes[SIZE_OFFSET..SIZE_OFFSET + 4]) as usize
    }

    pub fn entity_type(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[entity::TYPE_OFFSET..entity::TYPE_OFFSET + 2])
    }

    pub fn network_byte(&self) -> u8 {
        self.bytes[entity::NETWORK_OFFSET]
    }

    pub fn signer(&self) -> NovaPublicKey {
        let mut raw = [0u8; 32];
        raw.copy_from_slice(&self.bytes[entity::SIGNER_OFFSET..entity::SIGNER_OFFSET + 32]);
        NovaPublicKey::from_bytes(raw)
    }

    pub fn signature(&self) -> NovaSignature {
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&self.bytes[entity::SIGNATURE_OFFSET..entity::SIGNATURE_OFFSET + 64]);
        NovaSignature::from_bytes(raw)
    }

    pub fn height(&self) -> u64 {
        LittleEndian::read_u64(&self.bytes[HEIGHT_OFFSET..HEIGHT_OFFSET + 8])
    }

    pub fn timestamp(&self) -> u64 {
        LittleEndian::read_u64(&self.bytes[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 8])
    }

    pub fn difficulty(&self) -> u64 {
        LittleEndian::read_u64(&self.bytes[DIFFICULTY_OFFSET..DIFFICULTY_OFFSET + 8])
    }

    pub fn previous_block_hash(&self) -> Hash256 {
        read_hash(&self.bytes, PREVIOUS_BLOCK_HASH_OFFSET)
    }

    pub fn transactions_hash(&self) -> Hash256 {
        read_hash(&self.bytes, TRANSACTIONS_HASH_OFFSET)
    }

    pub fn receipts_hash(&self) -> Hash256 {
        read_hash(&self.bytes, RECEIPTS_HASH_OFFSET)
    }

    pub fn state_hash(&self) -> Hash256 {
        read_hash(&self.bytes, STATE_HASH_OFFSET)
    }

    pub fn beneficiary(&self) -> NovaPublicKey {
        let mut raw = [0u8; 32];
        raw.copy_from_slice(&self.bytes[BENEFICIARY_OFFSET..BENEFICIARY_OFFSET + 32]);
        NovaPublicKey::from_bytes(raw)
    }

    pub fn fee_multiplier(&self) -> u32 {
        LittleEndian::read_u32(&self.bytes[FEE_MULTIPLIER_OFFSET..FEE_MULTIPLIER_OFFSET + 4])
    }

    /// Header bytes covered by the block signature and hash.
    pub fn header_signed_data(&self) -> &[u8] {
        &self.bytes[ENTITY_SIGNED_DATA_OFFSET..BLOCK_HEADER_SIZE]
    }

    /// Everything after the header.
    pub fn transactions_region(&self) -> &[u8] {
        &self.bytes[BLOCK_HEADER_SIZE..]
    }

    /// Walks the transactions region record by record.
    pub fn records(&self) -> TransactionRecords<'_> {
        TransactionRecords {
            bytes: &self.bytes,
            offset: BLOCK_HEADER_SIZE,
            failed: false,
        }
    }

    // -- mutation ---------------------------------------------------------
    //
    // Only header fields can be written. The transactions region is fixed
    // once the assembler hands the block out.

    pub(crate) fn set_signature(&mut self, signature: &NovaSignature) {
        entity::write_signature(&mut self.bytes, signature);
    }

    pub(crate) fn set_signer(&mut self, signer: &NovaPublicKey) {
        entity::write_signer(&mut self.bytes, signer);
    }

    pub(crate) fn set_beneficiary(&mut self, beneficiary: &NovaPublicKey) {
        self.bytes[BENEFICIARY_OFFSET..BENEFICIARY_OFFSET + 32]
            .copy_from_slice(beneficiary.as_bytes());
    }

    pub(crate) fn set_transactions_hash(&mut self, hash: &Hash256) {
        self.bytes[TRANSACTIONS_HASH_OFFSET..TRANSACTIONS_HASH_OFFSET + 32].copy_from_slice(hash);
    }

    pub(crate) fn set_receipts_hash(&mut self, hash: &Hash256) {
        self.bytes[RECEIPTS_HASH_OFFSET..RECEIPTS_HASH_OFFSET + 32].copy_from_slice(hash);
    }

    pub(crate) fn set_state_hash(&mut self, hash: &Hash256) {
        self.bytes[STATE_HASH_OFFSET..STATE_HASH_OFFSET + 32].copy_from_slice(hash);
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("size", &self.size())
            .field("type", &format_args!("0x{:04X}", self.entity_type()))
            .field("height", &self.height())
            .field("signer", &self.signer())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Record walker
// ---------------------------------------------------------------------------

/// One record of the transactions region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionRecord<'a> {
    /// Absolute offset of the record inside the block.
    pub offset: usize,
    /// The record bytes, exactly `size` long.
    pub bytes: &'a [u8],
    /// Zero bytes following the record (always 0 for the last one).
    pub padding: usize,
}

/// Iterator over the records of a block, produced by [`Block::records`].
///
/// Yields an error and stops at the first record that does not fit, has a
/// zero size, is followed by non-zero padding, or is the last record yet is
/// followed by padding.
pub struct TransactionRecords<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> TransactionRecords<'a> {
    fn fail(&mut self, offset: usize, reason: impl Into<String>) -> Option<Result<TransactionRecord<'a>, BlockError>> {
        self.failed = true;
        Some(Err(BlockError::MalformedRecord {
            offset,
            reason: reason.into(),
        }))
    }
}

impl<'a> Iterator for TransactionRecords<'a> {
    type Item = Result<TransactionRecord<'a>, BlockError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }

        let offset = self.offset;
        let remaining = &self.bytes[offset..];
        let size = match entity::read_size(remaining) {
            Some(0) => return self.fail(offset, "zero-sized record"),
            Some(size) if size <= remaining.len() => size,
            Some(size) => {
                return self.fail(
                    offset,
                    format!("record of {} bytes overruns the block by {}", size, size - remaining.len()),
                )
            }
            None => return self.fail(offset, "truncated size field"),
        };

        let end = offset + size;
        let padding = if end == self.bytes.len() {
            0
        } else {
            let padding = padding_size(size);
            let padded_end = end + padding;
            if padded_end > self.bytes.len() {
                return self.fail(offset, "padding overruns the block");
            }
            if padded_end == self.bytes.len() {
                return self.fail(offset, "last record is followed by padding");
            }
            if self.bytes[end..padded_end].iter().any(|b| *b != 0) {
                return self.fail(offset, "non-zero padding");
            }
            padding
        };

        self.offset = end + padding;
        Some(Ok(TransactionRecord {
            offset,
            bytes: &self.bytes[offset..end],
            padding,
        }))
    }
}
