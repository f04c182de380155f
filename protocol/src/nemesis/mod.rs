//! # Nemesis Block Generation
//!
//! Turns a [`NemesisConfiguration`](crate::configuration::NemesisConfiguration)
//! into the first block of a network.
//!
//! ```text
//! payload.rs       — hex payload value object
//! entry.rs         — payloads grouped by signer, explicit order
//! transactions.rs  — namespace / mosaic / transfer transactions, signed
//! assembler.rs     — header + aligned records, extension with payloads
//! finalizer.rs     — signing, execution results, element view, stages
//! generator.rs     — configuration-level create / update / element
//! ```
//!
//! Everything here is single-threaded and one-shot. Errors abort the whole
//! build; no partial block is ever returned.

pub mod assembler;
pub mod entry;
pub mod error;
pub mod finalizer;
pub mod generator;
pub mod payload;
pub mod transactions;

pub use assembler::{assemble, extend, extended_size, padded_nemesis_size};
pub use entry::{SignedTransactionEntries, SignedTransactionEntry};
pub use error::{BlockStage, NemesisError};
pub use finalizer::{
    block_hash, calculate_transactions_hash, sign_full_block, to_element,
    update_with_execution_results, verify_block_signature, BlockElement, BlockElementSummary,
    ExecutionHashes, NemesisBlock, TransactionInfo, TransactionSummary,
};
pub use generator::{create_nemesis_block, create_nemesis_block_element, update_nemesis_block};
pub use payload::SignedTransactionPayload;
pub use transactions::{create_nemesis_transactions, NemesisTransactions};
