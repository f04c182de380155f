//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around audited implementations:
//!
//! - **Ed25519** for entity signatures.
//! - **SHA-256** for entity hashes.
//! - **BLAKE3** for identifier derivation and the transactions Merkle tree.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{blake3_hash, domain_separated_hash, merkle_root, sha256, sha256_multi, Hash256};
pub use keys::{KeyError, NovaKeypair, NovaPublicKey, NovaSignature};
pub use signatures::{sign, verify};
