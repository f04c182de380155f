//! # Protocol Configuration & Constants
//!
//! Every magic number the nemesis generator depends on lives here. The
//! nemesis block is hashed and signed once and then replayed by every node
//! forever, so none of these values can change after a network launches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Network byte written into every entity header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum NetworkIdentifier {
    /// Mainnet — the real deal. Mistakes here cost real money.
    Mainnet = 0x4E, // 'N'
    /// Testnet — where we break things on purpose and call it "testing."
    Testnet = 0x54, // 'T'
    /// Devnet — reset weekly, no promises.
    Devnet = 0x44, // 'D'
}

/// Bech32 HRP values for display-form addresses.
pub const MAINNET_HRP: &str = "nova";
pub const TESTNET_HRP: &str = "tnova";
pub const DEVNET_HRP: &str = "dnova";

impl NetworkIdentifier {
    /// The byte stored at the `network` offset of an entity header.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Parses a network byte read back from an entity header.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x4E => Some(Self::Mainnet),
            0x54 => Some(Self::Testnet),
            0x44 => Some(Self::Devnet),
            _ => None,
        }
    }

    /// Human-readable prefix used when encoding addresses for this network.
    pub fn hrp(self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_HRP,
            Self::Testnet => TESTNET_HRP,
            Self::Devnet => DEVNET_HRP,
        }
    }
}

impl fmt::Display for NetworkIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
        };
        f.write_str(name)
    }
}

impl FromStr for NetworkIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity Types & Versions
// ---------------------------------------------------------------------------

/// Entity type of the nemesis block.
pub const ENTITY_TYPE_NEMESIS_BLOCK: u16 = 0x8043;

/// Entity type of a regular block. The generator never produces one, but
/// the element decoder recognises it.
pub const ENTITY_TYPE_NORMAL_BLOCK: u16 = 0x8143;

pub const ENTITY_TYPE_NAMESPACE_REGISTRATION: u16 = 0x414E;
pub const ENTITY_TYPE_MOSAIC_DEFINITION: u16 = 0x414D;
pub const ENTITY_TYPE_MOSAIC_ALIAS: u16 = 0x434E;
pub const ENTITY_TYPE_MOSAIC_SUPPLY_CHANGE: u16 = 0x424D;
pub const ENTITY_TYPE_TRANSFER: u16 = 0x4154;

/// Version written into every entity the generator creates.
pub const ENTITY_VERSION: u8 = 1;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Every record in a block's transaction region, except the last, is padded
/// so that the next record starts on this boundary.
pub const ENTITY_ALIGNMENT: usize = 8;

/// Verifiable entity header: size, reserved, signature, signer, reserved,
/// version, network, type.
pub const ENTITY_HEADER_SIZE: usize = 112;

/// Entity header plus `max_fee` and `deadline`.
pub const TRANSACTION_HEADER_SIZE: usize = 128;

/// Full block header. Must stay a multiple of [`ENTITY_ALIGNMENT`] so the
/// first transaction is aligned.
pub const BLOCK_HEADER_SIZE: usize = 304;

/// Offset of the first signed byte of any entity (the `version` field).
pub const ENTITY_SIGNED_DATA_OFFSET: usize = 108;

// ---------------------------------------------------------------------------
// Nemesis Parameters
// ---------------------------------------------------------------------------

/// Deadline stamped on every nemesis transaction. Marks it as part of the
/// founding set; no live transaction can carry a deadline this small.
pub const NEMESIS_DEADLINE: u64 = 1;

/// Duration meaning "never expires" for namespaces and mosaics.
pub const ETERNAL_ARTIFACT_DURATION: u64 = 0;

/// Difficulty written into the nemesis block header.
pub const INITIAL_DIFFICULTY: u64 = 100_000_000_000_000;

/// Maximum namespace path depth (`root.child.grandchild`).
pub const MAX_NAMESPACE_DEPTH: usize = 3;

/// Maximum length of a single namespace segment.
pub const MAX_NAMESPACE_NAME_LENGTH: usize = 64;

/// Maximum number of mosaics a single transfer can carry.
pub const MAX_TRANSFER_MOSAICS: usize = u8::MAX as usize;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Signing key length in bytes. Ed25519 secret keys are 32 bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// Hash output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Returns the padding needed to bring `size` up to the next
/// [`ENTITY_ALIGNMENT`] boundary.
pub fn padding_size(size: usize) -> usize {
    (ENTITY_ALIGNMENT - size % ENTITY_ALIGNMENT) % ENTITY_ALIGNMENT
}

/// Friendly name for an entity type, mainly for logging and summaries.
pub fn entity_type_name(entity_type: u16) -> String {
    match entity_type {
        ENTITY_TYPE_NEMESIS_BLOCK => "nemesis_block".to_string(),
        ENTITY_TYPE_NORMAL_BLOCK => "block".to_string(),
        ENTITY_TYPE_NAMESPACE_REGISTRATION => "namespace_registration".to_string(),
        ENTITY_TYPE_MOSAIC_DEFINITION => "mosaic_definition".to_string(),
        ENTITY_TYPE_MOSAIC_ALIAS => "mosaic_alias".to_string(),
        ENTITY_TYPE_MOSAIC_SUPPLY_CHANGE => "mosaic_supply_change".to_string(),
        ENTITY_TYPE_TRANSFER => "transfer".to_string(),
        other => format!("unknown(0x{:04X})", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_bytes_roundtrip() {
        for network in [
            NetworkIdentifier::Mainnet,
            NetworkIdentifier::Testnet,
            NetworkIdentifier::Devnet,
        ] {
            assert_eq!(NetworkIdentifier::from_byte(network.as_byte()), Some(network));
        }
        assert_eq!(NetworkIdentifier::from_byte(0xFF), None);
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("DevNet".parse::<NetworkIdentifier>(), Ok(NetworkIdentifier::Devnet));
        assert!("moonnet".parse::<NetworkIdentifier>().is_err());
    }

    #[test]
    fn test_hrp_for_known_networks() {
        assert_eq!(NetworkIdentifier::Mainnet.hrp(), "nova");
        assert_eq!(NetworkIdentifier::Testnet.hrp(), "tnova");
        assert_eq!(NetworkIdentifier::Devnet.hrp(), "dnova");
    }

    #[test]
    fn padding_rounds_up_to_alignment() {
        assert_eq!(padding_size(0), 0);
        assert_eq!(padding_size(1), 7);
        assert_eq!(padding_size(7), 1);
        assert_eq!(padding_size(8), 0);
        assert_eq!(padding_size(150), 2);
        assert_eq!(padding_size(103), 1);
    }

    #[test]
    fn test_layout_constants_sanity() {
        // The first transaction follows the header directly, so the header
        // itself has to end on an aligned offset.
        assert_eq!(BLOCK_HEADER_SIZE % ENTITY_ALIGNMENT, 0);
        assert_eq!(TRANSACTION_HEADER_SIZE, ENTITY_HEADER_SIZE + 16);
        assert!(ENTITY_SIGNED_DATA_OFFSET < ENTITY_HEADER_SIZE);
    }

    #[test]
    fn test_entity_type_name_formatting() {
        assert_eq!(entity_type_name(ENTITY_TYPE_TRANSFER), "transfer");
        assert_eq!(entity_type_name(0xCAFE), "unknown(0xCAFE)");
    }

    #[test]
    fn test_crypto_parameter_sizes() {
        assert_eq!(SIGNING_KEY_LENGTH, 32);
        assert_eq!(VERIFYING_KEY_LENGTH, 32);
        assert_eq!(SIGNATURE_LENGTH, 64);
        assert_eq!(HASH_OUTPUT_LENGTH, 32);
    }
}
