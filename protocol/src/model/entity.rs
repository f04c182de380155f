//! # Verifiable Entity Header
//!
//! Blocks and transactions share the same 112-byte prefix:
//!
//! ```text
//! ┌────────┬──────┬────────────────────────────┐
//! │ offset │ size │ field                      │
//! ├────────┼──────┼────────────────────────────┤
//! │   0    │   4  │ size (u32, whole record)   │
//! │   4    │   4  │ reserved                   │
//! │   8    │  64  │ signature                  │
//! │  72    │  32  │ signer public key          │
//! │ 104    │   4  │ reserved                   │
//! │ 108    │   1  │ version                    │
//! │ 109    │   1  │ network                    │
//! │ 110    │   2  │ type (u16)                 │
//! └────────┴──────┴────────────────────────────┘
//! ```
//!
//! Everything from `version` onward is covered by the entity's signature.
//! All integers are little-endian.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::config::{NetworkIdentifier, ENTITY_HEADER_SIZE, ENTITY_SIGNED_DATA_OFFSET};
use crate::crypto::keys::{NovaPublicKey, NovaSignature};

pub const SIZE_OFFSET: usize = 0;
pub const SIGNATURE_OFFSET: usize = 8;
pub const SIGNER_OFFSET: usize = 72;
pub const VERSION_OFFSET: usize = 108;
pub const NETWORK_OFFSET: usize = 109;
pub const TYPE_OFFSET: usize = 110;

/// Structural errors found while reading entity bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityError {
    #[error("entity too short: {actual} bytes, need at least {minimum}")]
    TooShort {
        /// Minimum number of bytes for this kind of entity.
        minimum: usize,
        /// Bytes actually available.
        actual: usize,
    },

    #[error("entity size field says {declared} bytes but {actual} bytes are present")]
    SizeMismatch {
        /// Value of the `size` field.
        declared: usize,
        /// Length of the buffer.
        actual: usize,
    },
}

/// Reads the `size` field of an entity starting at `bytes[0]`.
pub fn read_size(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < 4 {
        return None;
    }
    Some(LittleEndian::read_u32(&bytes[SIZE_OFFSET..SIZE_OFFSET + 4]) as usize)
}

/// Fills in the entity header of a freshly allocated, zeroed buffer.
///
/// The signature is left zeroed; signing writes it later.
pub fn write_header(
    bytes: &mut [u8],
    signer: &NovaPublicKey,
    version: u8,
    network: NetworkIdentifier,
    entity_type: u16,
) {
    let size = bytes.len() as u32;
    LittleEndian::write_u32(&mut bytes[SIZE_OFFSET..SIZE_OFFSET + 4], size);
    bytes[SIGNER_OFFSET..SIGNER_OFFSET + 32].copy_from_slice(signer.as_bytes());
    bytes[VERSION_OFFSET] = version;
    bytes[NETWORK_OFFSET] = network.as_byte();
    LittleEndian::write_u16(&mut bytes[TYPE_OFFSET..TYPE_OFFSET + 2], entity_type);
}

/// Overwrites the `signature` slot.
pub fn write_signature(bytes: &mut [u8], signature: &NovaSignature) {
    bytes[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 64].copy_from_slice(signature.as_bytes());
}

/// Overwrites the `signer` slot.
pub fn write_signer(bytes: &mut [u8], signer: &NovaPublicKey) {
    bytes[SIGNER_OFFSET..SIGNER_OFFSET + 32].copy_from_slice(signer.as_bytes());
}

/// Read-only view over one entity's bytes.
///
/// Construction checks that the buffer holds a full header and that the
/// `size` field matches the buffer length, so accessors can index freely.
#[derive(Clone, Copy, Debug)]
pub struct EntityView<'a> {
    bytes: &'a [u8],
}

impl<'a> EntityView<'a> {
    /// Wraps `bytes`, which must be exactly one entity.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, EntityError> {
        if bytes.len() < ENTITY_HEADER_SIZE {
            return Err(EntityError::TooShort {
                minimum: ENTITY_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let declared = LittleEndian::read_u32(&bytes[SIZE_OFFSET..SIZE_OFFSET + 4]) as usize;
        if declared != bytes.len() {
            return Err(EntityError::SizeMismatch {
                declared,
                actual: bytes.len(),
            });
        }

        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn signature(&self) -> NovaSignature {
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&self.bytes[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 64]);
        NovaSignature::from_bytes(raw)
    }

    pub fn signer(&self) -> NovaPublicKey {
        let mut raw = [0u8; 32];
        raw.copy_from_slice(&self.bytes[SIGNER_OFFSET..SIGNER_OFFSET + 32]);
        NovaPublicKey::from_bytes(raw)
    }

    pub fn version(&self) -> u8 {
        self.bytes[VERSION_OFFSET]
    }

    /// Raw network byte; `None` from [`NetworkIdentifier::from_byte`] means
    /// the entity was built for a network this tool does not know.
    pub fn network_byte(&self) -> u8 {
        self.bytes[NETWORK_OFFSET]
    }

    pub fn entity_type(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[TYPE_OFFSET..TYPE_OFFSET + 2])
    }

    /// The bytes covered by the entity signature.
    pub fn signed_data(&self) -> &'a [u8] {
        &self.bytes[ENTITY_SIGNED_DATA_OFFSET..]
    }
}
