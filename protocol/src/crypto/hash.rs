//! # Hashing Utilities
//!
//! Two hash functions, two jobs:
//!
//! - **SHA-256** — entity hashes. Transaction and block hashes are what
//!   explorers, wallets and the migration tooling compare against, so they
//!   use the function everybody already has.
//!
//! - **BLAKE3** — everything internal: namespace and mosaic identifier
//!   derivation (via `derive_key` domain separation), address key hashes and
//!   the transactions Merkle tree.

use sha2::{Digest, Sha256};

use crate::config::HASH_OUTPUT_LENGTH;

/// A 256-bit digest. Generation seeds, entity hashes, receipts and state
/// commitments all share this shape.
pub type Hash256 = [u8; HASH_OUTPUT_LENGTH];

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use nova_nemesis::crypto::sha256;
///
/// let hash = sha256(b"NOVA nemesis");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Hash256 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 over several byte slices fed sequentially, without building a
/// concatenated buffer first.
pub fn sha256_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Compute the BLAKE3 hash of the input data.
pub fn blake3_hash(data: &[u8]) -> Hash256 {
    *blake3::hash(data).as_bytes()
}

/// Hash multiple byte slices together without concatenation overhead.
pub fn blake3_hash_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// Compute a domain-separated hash using BLAKE3's `derive_key` mode.
///
/// `domain_separated_hash("nova-mosaic-id", data)` and
/// `domain_separated_hash("nova-namespace-id", data)` never collide even for
/// identical `data`, because the context string selects a different IV.
pub fn domain_separated_hash(context: &str, parts: &[&[u8]]) -> Hash256 {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// Compute a Merkle root from a list of leaf hashes using BLAKE3.
///
/// A simple binary tree. If a level has an odd number of nodes, the last one
/// is paired with itself. A single leaf is also paired with itself so the
/// root is always the output of a hash operation, never a raw leaf.
///
/// Returns all zeros for an empty input.
pub fn merkle_root(leaves: &[Hash256]) -> Hash256 {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut current_level: Vec<Hash256> = leaves.to_vec();

    if current_level.len() == 1 {
        return blake3_hash_multi(&[current_level[0].as_slice(), current_level[0].as_slice()]);
    }

    while current_level.len() > 1 {
        let mut next_level = Vec::with_capacity((current_level.len() + 1) / 2);

        for chunk in current_level.chunks(2) {
            let left = &chunk[0];
            let right = if chunk.len() == 2 { &chunk[1] } else { &chunk[0] };
            next_level.push(blake3_hash_multi(&[left.as_slice(), right.as_slice()]));
        }

        current_level = next_level;
    }

    current_level[0]
}

/// Parse a hex string into a 256-bit digest.
pub fn hash256_from_hex(s: &str) -> Option<Hash256> {
    let bytes = hex::decode(s.trim()).ok()?;
    bytes.as_slice().try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_sha256_multi_matches_concatenation() {
        assert_eq!(sha256_multi(&[b"hello", b" world"]), sha256(b"hello world"));
    }

    #[test]
    fn test_blake3_hash_multi() {
        let multi = blake3_hash_multi(&[b"hello", b" world"]);
        assert_eq!(multi, blake3_hash(b"hello world"));
    }

    #[test]
    fn test_domain_separation() {
        let hash_a = domain_separated_hash("context-a", &[b"same data"]);
        let hash_b = domain_separated_hash("context-b", &[b"same data"]);
        assert_ne!(hash_a, hash_b);
        assert_ne!(hash_a, blake3_hash(b"same data"));
    }

    #[test]
    fn test_merkle_root_empty() {
        assert_eq!(merkle_root(&[]), [0u8; 32]);
    }

    #[test]
    fn test_merkle_root_single_leaf() {
        let leaf = blake3_hash(b"only child");
        let expected = blake3_hash_multi(&[leaf.as_slice(), leaf.as_slice()]);
        assert_eq!(merkle_root(&[leaf]), expected);
    }

    #[test]
    fn test_merkle_root_odd_leaf_is_duplicated() {
        let leaves: Vec<Hash256> = (0..3u8).map(|i| blake3_hash(&[i])).collect();
        let left = blake3_hash_multi(&[leaves[0].as_slice(), leaves[1].as_slice()]);
        let right = blake3_hash_multi(&[leaves[2].as_slice(), leaves[2].as_slice()]);
        let expected = blake3_hash_multi(&[left.as_slice(), right.as_slice()]);
        assert_eq!(merkle_root(&leaves), expected);
    }

    #[test]
    fn test_merkle_root_order_matters() {
        let leaf1 = blake3_hash(b"first");
        let leaf2 = blake3_hash(b"second");
        assert_ne!(merkle_root(&[leaf1, leaf2]), merkle_root(&[leaf2, leaf1]));
    }

    #[test]
    fn test_hash256_from_hex() {
        let hash = sha256(b"x");
        assert_eq!(hash256_from_hex(&hex::encode(hash)), Some(hash));
        assert_eq!(hash256_from_hex("abcd"), None);
        assert_eq!(hash256_from_hex("zz"), None);
    }
}
