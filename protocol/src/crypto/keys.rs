//! # Keys
//!
//! The nemesis signer keypair plus the two fixed-width values every entity
//! header carries: a 32-byte signer public key and a 64-byte signature.
//!
//! Public keys are not validated as curve points when they are read back
//! from a header. Verification simply fails for a bad point.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{SIGNATURE_LENGTH, SIGNING_KEY_LENGTH, VERIFYING_KEY_LENGTH};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Secret keys are 32 bytes of hex. The message never echoes the input.
    #[error("private key must be 32 bytes of hex")]
    InvalidSecretKey,

    #[error("public key must be 32 bytes of hex")]
    InvalidPublicKey,

    #[error("signature must be 64 bytes")]
    InvalidSignature,
}

// ---------------------------------------------------------------------------
// NovaKeypair
// ---------------------------------------------------------------------------

/// Ed25519 signing key of the nemesis account (or, in tests, of any account
/// producing pre-signed payloads).
///
/// Not serialisable. Load it with [`NovaKeypair::from_hex`].
///
/// ```
/// use nova_nemesis::crypto::keys::NovaKeypair;
///
/// let signer = NovaKeypair::from_seed(&[1u8; 32]);
/// let signature = signer.sign(b"nemesis");
/// assert!(signer.public_key().verify(b"nemesis", &signature));
/// ```
#[derive(Clone)]
pub struct NovaKeypair {
    secret: SigningKey,
}

impl NovaKeypair {
    /// Fresh random keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            secret: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_seed(seed: &[u8; SIGNING_KEY_LENGTH]) -> Self {
        Self {
            secret: SigningKey::from_bytes(seed),
        }
    }

    /// Parses the hex private key stored in a nemesis configuration.
    pub fn from_hex(private_key: &str) -> Result<Self, KeyError> {
        let seed: [u8; SIGNING_KEY_LENGTH] = decode_fixed(private_key).ok_or(KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    pub fn public_key(&self) -> NovaPublicKey {
        NovaPublicKey(self.secret.verifying_key().to_bytes())
    }

    /// Deterministic: the same key and message always give the same bytes.
    pub fn sign(&self, message: &[u8]) -> NovaSignature {
        NovaSignature(self.secret.sign(message).to_bytes())
    }
}

impl fmt::Debug for NovaKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NovaKeypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// NovaPublicKey
// ---------------------------------------------------------------------------

/// The `signer` slot of an entity header.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NovaPublicKey([u8; VERIFYING_KEY_LENGTH]);

impl NovaPublicKey {
    pub fn from_bytes(bytes: [u8; VERIFYING_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        s.parse()
    }

    pub fn as_bytes(&self) -> &[u8; VERIFYING_KEY_LENGTH] {
        &self.0
    }

    /// `false` for a bad signature and for bytes that are not a curve point.
    pub fn verify(&self, message: &[u8], signature: &NovaSignature) -> bool {
        VerifyingKey::from_bytes(&self.0)
            .map(|key| key.verify(message, &Signature::from_bytes(&signature.0)).is_ok())
            .unwrap_or(false)
    }

    /// Upper-case hex, the form used in configuration files and summaries.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl FromStr for NovaPublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed(s).map(Self).ok_or(KeyError::InvalidPublicKey)
    }
}

impl TryFrom<&[u8]> for NovaPublicKey {
    type Error = KeyError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        slice.try_into().map(Self).map_err(|_| KeyError::InvalidPublicKey)
    }
}

impl fmt::Display for NovaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NovaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NovaPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// NovaSignature
// ---------------------------------------------------------------------------

/// The `signature` slot of an entity header. All zero until signed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NovaSignature([u8; SIGNATURE_LENGTH]);

impl NovaSignature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl TryFrom<&[u8]> for NovaSignature {
    type Error = KeyError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        slice.try_into().map(Self).map_err(|_| KeyError::InvalidSignature)
    }
}

impl fmt::Display for NovaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NovaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "NovaSignature({}..{})", &hex[..8], &hex[hex.len() - 8..])
    }
}

fn decode_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    hex::decode(s.trim()).ok()?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = "A41BE076B942D915EA3330B135D35C5A959A2DCC50BBB393C6407984D4A3B564";

    #[test]
    fn signs_and_verifies() {
        let signer = NovaKeypair::generate();
        let signature = signer.sign(b"mosaic definition");
        assert!(signer.public_key().verify(b"mosaic definition", &signature));
        assert!(!signer.public_key().verify(b"mosaic alias", &signature));
        assert!(!NovaKeypair::generate().public_key().verify(b"mosaic definition", &signature));
    }

    #[test]
    fn private_key_hex_is_the_seed() {
        let from_hex = NovaKeypair::from_hex(&PRIVATE_KEY.to_lowercase()).unwrap();
        let seed: [u8; 32] = hex::decode(PRIVATE_KEY).unwrap().try_into().unwrap();
        assert_eq!(from_hex.public_key(), NovaKeypair::from_seed(&seed).public_key());
    }

    #[test]
    fn malformed_private_keys_are_rejected() {
        assert_eq!(NovaKeypair::from_hex("deadbeef").unwrap_err(), KeyError::InvalidSecretKey);
        assert_eq!(NovaKeypair::from_hex("zz").unwrap_err(), KeyError::InvalidSecretKey);
    }

    #[test]
    fn public_key_text_forms() {
        let key = NovaKeypair::from_seed(&[3u8; 32]).public_key();
        let text = key.to_hex();
        assert_eq!(text, text.to_uppercase());
        assert_eq!(NovaPublicKey::from_hex(&text.to_lowercase()).unwrap(), key);
        assert_eq!(key.to_string(), text);
        assert!("abcd".parse::<NovaPublicKey>().is_err());
    }

    #[test]
    fn slices_must_match_slot_width() {
        let signature = NovaKeypair::from_seed(&[4u8; 32]).sign(b"slot");
        assert_eq!(NovaSignature::try_from(&signature.as_bytes()[..]).unwrap(), signature);
        assert_eq!(
            NovaSignature::try_from(&[0u8; 63][..]).unwrap_err(),
            KeyError::InvalidSignature
        );
        assert!(NovaPublicKey::try_from(&[0u8; 31][..]).is_err());
    }

    #[test]
    fn signing_is_deterministic() {
        let signer = NovaKeypair::from_hex(PRIVATE_KEY).unwrap();
        assert_eq!(signer.sign(b"same"), signer.sign(b"same"));
    }

    #[test]
    fn debug_shows_only_the_public_half() {
        let signer = NovaKeypair::from_hex(PRIVATE_KEY).unwrap();
        let debug = format!("{signer:?}");
        assert!(!debug.to_uppercase().contains(PRIVATE_KEY));
        assert!(debug.contains("NovaPublicKey("));
    }

    #[test]
    fn non_point_public_key_never_verifies() {
        let signature = NovaKeypair::from_seed(&[5u8; 32]).sign(b"x");
        assert!(!NovaPublicKey::from_bytes([0xFF; 32]).verify(b"x", &signature));
    }
}
