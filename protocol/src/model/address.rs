//! # Addresses
//!
//! A NOVA address is the BLAKE3 hash of an Ed25519 public key. On the wire
//! (the `recipient` of a transfer) it is the raw 32-byte hash; for humans it
//! is Bech32-encoded under the network's HRP:
//!
//! ```text
//! public_key (32 bytes)
//!     -> BLAKE3(public_key) -> 32 bytes
//!     -> Bech32("dnova", hash) -> dnova1qw508d6qe...
//! ```
//!
//! The HRP makes a devnet address unusable in a mainnet configuration,
//! which is exactly the mistake a nemesis file must not contain.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::NetworkIdentifier;
use crate::crypto::hash::blake3_hash;
use crate::crypto::keys::NovaPublicKey;

/// Errors that can occur while parsing or encoding addresses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The Bech32 string could not be decoded (or encoded).
    #[error("bech32 error: {0}")]
    Bech32(String),

    /// The address belongs to a different network.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp {
        /// The expected HRP.
        expected: String,
        /// The HRP that was actually found.
        got: String,
    },

    /// The decoded data has an unexpected length.
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },
}

/// The 32-byte key hash identifying an account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    key_hash: [u8; 32],
}

impl Address {
    /// Derive the address of a public key.
    pub fn from_public_key(public_key: &NovaPublicKey) -> Self {
        Self {
            key_hash: blake3_hash(public_key.as_bytes()),
        }
    }

    /// Wrap a raw key hash, e.g. one read out of a transfer.
    pub fn from_bytes(key_hash: [u8; 32]) -> Self {
        Self { key_hash }
    }

    /// The raw bytes written into a transfer's `recipient` field.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key_hash
    }

    /// Parse a display-form address and check it belongs to `network`.
    pub fn parse(address: &str, network: NetworkIdentifier) -> Result<Self, AddressError> {
        let (hrp, data) =
            bech32::decode(address.trim()).map_err(|e| AddressError::Bech32(e.to_string()))?;

        let expected_hrp =
            Hrp::parse(network.hrp()).map_err(|e| AddressError::Bech32(e.to_string()))?;
        if hrp != expected_hrp {
            return Err(AddressError::InvalidHrp {
                expected: network.hrp().to_string(),
                got: hrp.to_string(),
            });
        }

        let key_hash: [u8; 32] =
            data.as_slice()
                .try_into()
                .map_err(|_| AddressError::InvalidDataLength {
                    expected: 32,
                    got: data.len(),
                })?;
        Ok(Self { key_hash })
    }

    /// Encode this address for `network`.
    pub fn to_display(&self, network: NetworkIdentifier) -> Result<String, AddressError> {
        let hrp = Hrp::parse(network.hrp()).map_err(|e| AddressError::Bech32(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &self.key_hash).map_err(|e| AddressError::Bech32(e.to_string()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.key_hash[..8]))
    }
}
