//! # Transaction Module
//!
//! Binary construction and signing of the transactions a nemesis block
//! carries.
//!
//! ```text
//! types.rs    — Transaction, an owned entity buffer with header accessors
//! builder.rs  — one builder per transaction body layout
//! signing.rs  — seed-prefixed Ed25519 signing, verification, entity hash
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: a builder lays out header and body, deadline zero.
//! 2. **Stamp**: the nemesis builder sets the deadline.
//! 3. **Sign**: [`sign_transaction`] signs `seed || bytes[108..]`.
//! 4. **Hash**: [`transaction_hash`] feeds the block's Merkle root.

pub mod builder;
pub mod signing;
pub mod types;

pub use builder::{
    AliasAction, BuilderError, MosaicAliasBuilder, MosaicDefinitionBuilder,
    MosaicSupplyChangeBuilder, NamespaceRegistrationBuilder, SupplyChangeAction, TransferBuilder,
};
pub use signing::{sign_transaction, transaction_hash, verify_transaction};
pub use types::Transaction;
