//! # Block Assembler
//!
//! Packs signed transactions into one contiguous block buffer, and extends
//! an assembled block with externally signed payloads.
//!
//! ## Layout rule
//!
//! ```text
//! | header (304) | tx 0 | pad | tx 1 | pad | ... | tx n-1 |
//!                         ^^^                       ^ no padding
//! pad(size) = (8 - size % 8) % 8
//! ```
//!
//! Every record but the last is followed by zero bytes up to the next
//! 8-byte boundary; the last record ends the block, so `size` is exact.
//!
//! ## Extending
//!
//! Appending payloads turns the old last transaction into an inner record,
//! so it gains padding. The extended block is built into a fresh, zeroed
//! buffer of the final length: copy the old block, skip the old last
//! transaction's padding, then write each payload followed by its padding,
//! except after the final payload. The old buffer is consumed.
//!
//! Neither operation signs. The block that comes out carries a zero (after
//! `assemble`) or stale (after `extend`) signature until it is finalized.

use super::entry::SignedTransactionEntries;
use super::error::NemesisError;
use crate::config::{
    padding_size, NetworkIdentifier, BLOCK_HEADER_SIZE, ENTITY_TYPE_NEMESIS_BLOCK, ENTITY_VERSION,
    INITIAL_DIFFICULTY,
};
use crate::crypto::keys::NovaPublicKey;
use crate::model::block::{
    Block, BlockError, PreviousBlockContext, BENEFICIARY_OFFSET, DIFFICULTY_OFFSET, HEIGHT_OFFSET,
    PREVIOUS_BLOCK_HASH_OFFSET, TIMESTAMP_OFFSET,
};
use crate::model::entity::{self, SIZE_OFFSET};
use crate::transaction::types::Transaction;
use byteorder::{ByteOrder, LittleEndian};

/// Rejects sizes that do not fit the header's `u32` size field.
fn check_block_size(size: usize) -> Result<usize, NemesisError> {
    if size > u32::MAX as usize {
        return Err(NemesisError::SizeOverflow("sizing the block"));
    }
    Ok(size)
}

/// Header size plus every record, padded between records but not after the
/// last one.
fn assembled_size<'a>(records: impl IntoIterator<Item = &'a [u8]>) -> Result<usize, NemesisError> {
    let mut size = BLOCK_HEADER_SIZE;
    let mut last_padding = 0;
    for record in records {
        last_padding = padding_size(record.len());
        size = size
            .checked_add(record.len())
            .and_then(|s| s.checked_add(last_padding))
            .ok_or(NemesisError::SizeOverflow("adding transactions"))?;
    }
    check_block_size(size - last_padding)
}

/// Lays `transactions` out behind a fresh nemesis block header.
///
/// The header gets `height = context.height + 1`, the previous block's
/// timestamp and hash, the initial difficulty, and `signer` as both signer
/// and beneficiary. The signature stays zero.
pub fn assemble(
    context: &PreviousBlockContext,
    network: NetworkIdentifier,
    signer: &NovaPublicKey,
    transactions: &[Transaction],
) -> Result<Block, NemesisError> {
    if transactions.is_empty() {
        return Err(NemesisError::EmptyTransactions);
    }

    let size = assembled_size(transactions.iter().map(Transaction::as_bytes))?;
    let height = context
        .height
        .checked_add(1)
        .ok_or(NemesisError::SizeOverflow("computing the block height"))?;

    let mut bytes = vec![0u8; size];
    entity::write_header(&mut bytes, signer, ENTITY_VERSION, network, ENTITY_TYPE_NEMESIS_BLOCK);
    LittleEndian::write_u64(&mut bytes[HEIGHT_OFFSET..HEIGHT_OFFSET + 8], height);
    LittleEndian::write_u64(&mut bytes[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 8], context.timestamp);
    LittleEndian::write_u64(&mut bytes[DIFFICULTY_OFFSET..DIFFICULTY_OFFSET + 8], INITIAL_DIFFICULTY);
    bytes[PREVIOUS_BLOCK_HASH_OFFSET..PREVIOUS_BLOCK_HASH_OFFSET + 32]
        .copy_from_slice(&context.block_hash);
    bytes[BENEFICIARY_OFFSET..BENEFICIARY_OFFSET + 32].copy_from_slice(signer.as_bytes());

    let mut cursor = BLOCK_HEADER_SIZE;
    let last = transactions.len() - 1;
    for (i, tx) in transactions.iter().enumerate() {
        bytes[cursor..cursor + tx.size()].copy_from_slice(tx.as_bytes());
        cursor += tx.size();
        if i != last {
            cursor += padding_size(tx.size());
        }
    }
    debug_assert_eq!(cursor, size);

    tracing::debug!(size, transactions = transactions.len(), height, "assembled nemesis block");
    Ok(Block::from_bytes(bytes)?)
}

/// Size of `block` once its last transaction (of `last_transaction_size`
/// bytes) is padded.
pub fn padded_nemesis_size(block_size: usize, last_transaction_size: usize) -> Result<usize, NemesisError> {
    block_size
        .checked_add(padding_size(last_transaction_size))
        .ok_or(NemesisError::SizeOverflow("padding the last nemesis transaction"))
}

/// Final size after appending every payload of `entries` to a block of
/// `padded_size` bytes: each payload is padded except the very last one.
pub fn extended_size(padded_size: usize, entries: &SignedTransactionEntries) -> Result<usize, NemesisError> {
    let mut size = padded_size;
    let mut last_padding = 0;
    for payload in entries.payloads() {
        last_padding = padding_size(payload.size());
        size = size
            .checked_add(payload.size())
            .and_then(|s| s.checked_add(last_padding))
            .ok_or(NemesisError::SizeOverflow("adding signed payloads"))?;
    }
    check_block_size(size - last_padding)
}

/// Allocates a zeroed buffer of `new_size` bytes, copies the first
/// `old_size` bytes of `block` into it and rewrites the size field.
fn copy_reallocate(block: &Block, old_size: usize, new_size: usize) -> Result<Vec<u8>, NemesisError> {
    let source = block
        .as_bytes()
        .get(..old_size)
        .ok_or(NemesisError::SizeOverflow("copying the old block"))?;
    if new_size < old_size {
        return Err(NemesisError::SizeOverflow("shrinking the block"));
    }

    let mut bytes = vec![0u8; new_size];
    bytes[..old_size].copy_from_slice(source);
    LittleEndian::write_u32(&mut bytes[SIZE_OFFSET..SIZE_OFFSET + 4], check_block_size(new_size)? as u32);
    Ok(bytes)
}

/// Zero-fills the padding after the old last transaction, which ends at
/// `cursor`. Returns the cursor past the padding.
fn add_last_transaction_padding(bytes: &mut [u8], cursor: usize, last_transaction_size: usize) -> usize {
    let padding = padding_size(last_transaction_size);
    tracing::debug!(
        last_transaction_size,
        padding,
        "padding last nemesis transaction"
    );
    bytes[cursor..cursor + padding].fill(0);
    cursor + padding
}

/// Writes every payload from `cursor` on, padding after all but the last.
/// Returns the cursor past the last payload.
fn append_signed_payloads(
    bytes: &mut [u8],
    mut cursor: usize,
    entries: &SignedTransactionEntries,
) -> Result<usize, NemesisError> {
    let total = entries.payload_count();
    tracing::debug!(signers = entries.len(), payloads = total, "appending signed payloads");

    for (index, payload) in entries.payloads().enumerate() {
        let end = cursor + payload.size();
        let destination = bytes
            .get_mut(cursor..end)
            .ok_or(NemesisError::SizeOverflow("appending signed payloads"))?;
        destination.copy_from_slice(payload.to_binary());
        tracing::debug!(index, offset = cursor, size = payload.size(), "appended signed payload");
        cursor = end;

        if index + 1 < total {
            let padding = padding_size(payload.size());
            bytes
                .get_mut(cursor..cursor + padding)
                .ok_or(NemesisError::SizeOverflow("padding signed payloads"))?
                .fill(0);
            cursor += padding;
        }
    }
    Ok(cursor)
}

/// Appends the payloads of `entries`, in their iteration order, to an
/// assembled block whose last record is the last of `transactions`.
///
/// With no payloads the block is returned untouched.
pub fn extend(
    block: Block,
    transactions: &[Transaction],
    entries: &SignedTransactionEntries,
) -> Result<Block, NemesisError> {
    if entries.payload_count() == 0 {
        return Ok(block);
    }
    let last = transactions.last().ok_or(NemesisError::EmptyTransactions)?;
    if !block.transactions_region().ends_with(last.as_bytes()) {
        return Err(NemesisError::MalformedBlock(BlockError::MalformedRecord {
            offset: block.size().saturating_sub(last.size()),
            reason: "block does not end with the last nemesis transaction".into(),
        }));
    }

    let old_size = block.size();
    let padded_size = padded_nemesis_size(old_size, last.size())?;
    let new_size = extended_size(padded_size, entries)?;
    tracing::debug!(old_size, new_size, "resizing nemesis block");

    let mut bytes = copy_reallocate(&block, old_size, new_size)?;
    drop(block);

    let cursor = add_last_transaction_padding(&mut bytes, old_size, last.size());
    let end = append_signed_payloads(&mut bytes, cursor, entries)?;
    debug_assert_eq!(end, new_size);

    tracing::debug!(size = new_size, payloads = entries.payload_count(), "signed payloads added");
    Ok(Block::from_bytes(bytes)?)
}
