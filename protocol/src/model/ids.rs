//! Namespace and mosaic identifiers.
//!
//! Both identifier spaces are 64-bit and derived, never assigned:
//!
//! ```text
//! namespace id = BLAKE3-derive("nova-namespace-id", parent_id LE || name)[..8]  | 1 << 63
//! mosaic id    = BLAKE3-derive("nova-mosaic-id",    nonce LE || owner key)[..8] & !(1 << 63)
//! ```
//!
//! The high bit tells the two apart, which is what lets a transfer address a
//! mosaic through its namespace alias: an [`UnresolvedMosaicId`] with the
//! high bit set is a namespace to resolve, one without is a mosaic id.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{MAX_NAMESPACE_DEPTH, MAX_NAMESPACE_NAME_LENGTH};
use crate::crypto::hash::domain_separated_hash;
use crate::crypto::keys::NovaPublicKey;

const NAMESPACE_ID_CONTEXT: &str = "nova-namespace-id";
const MOSAIC_ID_CONTEXT: &str = "nova-mosaic-id";
const NAMESPACE_FLAG: u64 = 1 << 63;

/// Errors raised while deriving identifiers from names.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("invalid namespace name '{0}': segments must be 1-64 chars of [a-z0-9_-]")]
    InvalidNamespaceName(String),

    #[error("namespace path '{0}' is deeper than 3 levels")]
    NamespacePathTooDeep(String),
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $inner:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub $inner);

        impl $name {
            /// The raw value as stored on the wire.
            pub fn value(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:0width$X}", self.0, width = std::mem::size_of::<$inner>() * 2)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

id_type!(
    /// Identifier of a registered namespace (root or child).
    NamespaceId,
    u64
);
id_type!(
    /// Identifier of a defined mosaic.
    MosaicId,
    u64
);
id_type!(
    /// A mosaic reference that may still need alias resolution.
    UnresolvedMosaicId,
    u64
);
id_type!(
    /// Per-signer sequence value feeding mosaic id derivation.
    MosaicNonce,
    u32
);

impl NamespaceId {
    /// Parent id used when deriving a root namespace.
    pub const ROOT_PARENT: NamespaceId = NamespaceId(0);
}

impl MosaicNonce {
    /// The nonce following this one.
    pub fn next(self) -> MosaicNonce {
        MosaicNonce(self.0.wrapping_add(1))
    }
}

impl From<NamespaceId> for UnresolvedMosaicId {
    fn from(id: NamespaceId) -> Self {
        UnresolvedMosaicId(id.0)
    }
}

impl From<MosaicId> for UnresolvedMosaicId {
    fn from(id: MosaicId) -> Self {
        UnresolvedMosaicId(id.0)
    }
}

impl UnresolvedMosaicId {
    /// `true` when this reference points at a namespace alias.
    pub fn is_alias(self) -> bool {
        self.0 & NAMESPACE_FLAG != 0
    }
}

fn first_u64(digest: &[u8; 32]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn is_valid_segment(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAMESPACE_NAME_LENGTH
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

/// Derives the id of the namespace segment `name` registered under `parent`.
pub fn generate_namespace_id(parent: NamespaceId, name: &str) -> NamespaceId {
    let digest = domain_separated_hash(
        NAMESPACE_ID_CONTEXT,
        &[&parent.0.to_le_bytes(), name.as_bytes()],
    );
    NamespaceId(first_u64(&digest) | NAMESPACE_FLAG)
}

/// Computes the ids of every level of a dotted namespace name.
///
/// `"nova.token.gold"` yields the ids of `nova`, `nova.token` and
/// `nova.token.gold`, in that order. The last element is the leaf.
pub fn generate_namespace_path(name: &str) -> Result<Vec<NamespaceId>, IdError> {
    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() > MAX_NAMESPACE_DEPTH {
        return Err(IdError::NamespacePathTooDeep(name.to_string()));
    }

    let mut path = Vec::with_capacity(segments.len());
    let mut parent = NamespaceId::ROOT_PARENT;
    for segment in segments {
        if !is_valid_segment(segment) {
            return Err(IdError::InvalidNamespaceName(name.to_string()));
        }
        parent = generate_namespace_id(parent, segment);
        path.push(parent);
    }
    Ok(path)
}

/// Derives the id of the mosaic `owner` defines with `nonce`.
pub fn generate_mosaic_id(owner: &NovaPublicKey, nonce: MosaicNonce) -> MosaicId {
    let digest = domain_separated_hash(
        MOSAIC_ID_CONTEXT,
        &[&nonce.0.to_le_bytes(), owner.as_bytes()],
    );
    MosaicId(first_u64(&digest) & !NAMESPACE_FLAG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::NovaKeypair;

    #[test]
    fn namespace_path_has_one_id_per_level() {
        let path = generate_namespace_path("nova.token.gold").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], generate_namespace_id(NamespaceId::ROOT_PARENT, "nova"));
        assert_eq!(path[1], generate_namespace_id(path[0], "token"));
        assert_eq!(path[2], generate_namespace_id(path[1], "gold"));
    }

    #[test]
    fn namespace_ids_depend_on_parent() {
        let a = generate_namespace_path("alpha.xem").unwrap();
        let b = generate_namespace_path("beta.xem").unwrap();
        assert_ne!(a[1], b[1]);
    }

    #[test]
    fn namespace_ids_have_high_bit_set() {
        for id in generate_namespace_path("nova.xem").unwrap() {
            assert!(UnresolvedMosaicId::from(id).is_alias());
        }
    }

    #[test]
    fn invalid_namespace_names_rejected() {
        assert!(matches!(
            generate_namespace_path("Nova"),
            Err(IdError::InvalidNamespaceName(_))
        ));
        assert!(generate_namespace_path("nova..xem").is_err());
        assert!(generate_namespace_path("").is_err());
        assert!(generate_namespace_path("nova xem").is_err());
        assert_eq!(
            generate_namespace_path("a.b.c.d"),
            Err(IdError::NamespacePathTooDeep("a.b.c.d".to_string()))
        );
    }

    #[test]
    fn mosaic_id_is_deterministic_per_signer_and_nonce() {
        let owner = NovaKeypair::from_seed(&[5u8; 32]).public_key();
        let a = generate_mosaic_id(&owner, MosaicNonce(0));
        let b = generate_mosaic_id(&owner, MosaicNonce(0));
        assert_eq!(a, b);
        assert!(!UnresolvedMosaicId::from(a).is_alias());
    }

    #[test]
    fn sequential_nonces_produce_distinct_ids() {
        let owner = NovaKeypair::from_seed(&[5u8; 32]).public_key();
        let mut nonce = MosaicNonce(0);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..16 {
            assert!(seen.insert(generate_mosaic_id(&owner, nonce)));
            nonce = nonce.next();
        }
    }

    #[test]
    fn mosaic_id_depends_on_owner() {
        let a = NovaKeypair::from_seed(&[1u8; 32]).public_key();
        let b = NovaKeypair::from_seed(&[2u8; 32]).public_key();
        assert_ne!(
            generate_mosaic_id(&a, MosaicNonce(0)),
            generate_mosaic_id(&b, MosaicNonce(0))
        );
    }

    #[test]
    fn display_is_fixed_width_hex() {
        assert_eq!(MosaicId(0xAB).to_string(), "00000000000000AB");
        assert_eq!(MosaicNonce(1).to_string(), "00000001");
    }
}
