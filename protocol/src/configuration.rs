//! # Nemesis Configuration
//!
//! The TOML file describing a network's founding state, and its validated,
//! typed form.
//!
//! ```toml
//! network = "devnet"
//! generation_seed = "57F7DA205008026C776CB6AED843393F04CD458E0AA2D9F1D5F31A402072B2D6"
//! signer_private_key = "B59D53B0D0A9C1A7D2E6E2D4F0B09D0C1C2E6A1F0E4D0B6C3A9A3C0B5D6E7F80"
//!
//! [[root_namespaces]]
//! name = "nova"
//! duration = 0                      # 0 = eternal
//! children = ["nova.xem"]
//!
//! [[mosaics]]
//! name = "nova:xem"
//! divisibility = 6
//! duration = 0
//! supply = 8_999_999_998_000_000
//! flags = { transferable = true }
//!
//! [[distribution]]
//! address = "dnova1..."
//! mosaics = [{ name = "nova:xem", amount = 1_000_000 }]
//!
//! [[signed_entries]]
//! signer = "<public key hex>"
//! payloads = ["<transaction hex>", "..."]
//! ```
//!
//! Arrays of tables keep file order, and file order is build order. Two
//! runs over the same file always produce the same block.
//!
//! Loading checks types and encodings only: hex, keys, addresses, names.
//! Cross references (a child whose parent is missing, a seed naming an
//! undefined mosaic) are caught when the block is built.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::config::{NetworkIdentifier, ETERNAL_ARTIFACT_DURATION};
use crate::crypto::hash::{hash256_from_hex, Hash256};
use crate::crypto::keys::{KeyError, NovaKeypair, NovaPublicKey};
use crate::model::address::{Address, AddressError};
use crate::model::ids::{generate_namespace_path, IdError};
use crate::model::mosaic::{MosaicFlags, MosaicProperties};
use crate::nemesis::entry::SignedTransactionEntries;
use crate::nemesis::error::NemesisError;

/// Errors raised while loading or validating a nemesis configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("generation seed must be 32 hex-encoded bytes")]
    InvalidGenerationSeed,

    #[error("nemesis signer: {0}")]
    SignerKey(#[source] KeyError),

    #[error("namespace '{name}': {source}")]
    Namespace {
        name: String,
        #[source]
        source: IdError,
    },

    #[error("root namespace '{0}' must be a single segment")]
    DottedRoot(String),

    #[error("child namespace '{child}' is not under root '{root}'")]
    ChildOutsideRoot { root: String, child: String },

    #[error("mosaic '{0}' is defined twice")]
    DuplicateMosaic(String),

    #[error("divisibility of mosaic '{name}' is {divisibility}, at most 6 is allowed")]
    InvalidDivisibility { name: String, divisibility: u8 },

    #[error("distribution address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("signed entry signer '{signer}': {source}")]
    EntrySigner {
        signer: String,
        #[source]
        source: KeyError,
    },

    #[error("signed entry payload: {0}")]
    EntryPayload(#[source] NemesisError),

    #[error("signed entry for '{0}' lists no payloads")]
    EmptySignedEntry(String),
}

const MAX_DIVISIBILITY: u8 = 6;

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

/// The configuration exactly as written in TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NemesisConfigurationFile {
    pub network: NetworkIdentifier,
    pub generation_seed: String,
    pub signer_private_key: String,
    #[serde(default)]
    pub root_namespaces: Vec<RootNamespaceSection>,
    #[serde(default)]
    pub mosaics: Vec<MosaicSection>,
    #[serde(default)]
    pub distribution: Vec<DistributionSection>,
    #[serde(default)]
    pub signed_entries: Vec<SignedEntrySection>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootNamespaceSection {
    pub name: String,
    #[serde(default)]
    pub duration: u64,
    /// Full dotted names, e.g. `nova.xem`.
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MosaicSection {
    /// Mosaic name; `:` and `.` both separate namespace levels.
    pub name: String,
    #[serde(default)]
    pub divisibility: u8,
    #[serde(default)]
    pub duration: u64,
    pub supply: u64,
    #[serde(default)]
    pub flags: MosaicFlags,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionSection {
    pub address: String,
    pub mosaics: Vec<MosaicSeed>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedEntrySection {
    /// Public key of the account that signed the payloads.
    pub signer: String,
    pub payloads: Vec<String>,
}

/// An initial balance of one mosaic, referenced by its configured name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MosaicSeed {
    pub name: String,
    pub amount: u64,
}

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootNamespace {
    pub name: String,
    /// [`ETERNAL_ARTIFACT_DURATION`] for a namespace that never expires.
    pub duration: u64,
    pub children: Vec<String>,
}

impl RootNamespace {
    pub fn is_eternal(&self) -> bool {
        self.duration == ETERNAL_ARTIFACT_DURATION
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicEntry {
    pub name: String,
    pub properties: MosaicProperties,
    pub supply: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distribution {
    pub address: Address,
    pub seeds: Vec<MosaicSeed>,
}

/// Everything needed to generate (and later update) a nemesis block.
#[derive(Clone, Debug)]
pub struct NemesisConfiguration {
    pub network: NetworkIdentifier,
    pub generation_seed: Hash256,
    pub signer: NovaKeypair,
    pub root_namespaces: Vec<RootNamespace>,
    pub mosaics: Vec<MosaicEntry>,
    pub distribution: Vec<Distribution>,
    pub signed_entries: SignedTransactionEntries,
}

/// Rewrites a mosaic name into its namespace form: `nova:xem` → `nova.xem`.
pub fn fix_name(mosaic_name: &str) -> String {
    mosaic_name.replace(':', ".")
}

impl NemesisConfiguration {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            network = %config.network,
            namespaces = config.root_namespaces.len(),
            mosaics = config.mosaics.len(),
            recipients = config.distribution.len(),
            signed_payloads = config.signed_entries.payload_count(),
            "nemesis configuration loaded"
        );
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigurationError> {
        let file: NemesisConfigurationFile = toml::from_str(contents)?;
        Self::try_from(file)
    }

    /// The nemesis signer's public key.
    pub fn signer_public_key(&self) -> NovaPublicKey {
        self.signer.public_key()
    }
}

fn check_namespace(name: &str) -> Result<(), ConfigurationError> {
    generate_namespace_path(name)
        .map(|_| ())
        .map_err(|source| ConfigurationError::Namespace {
            name: name.to_string(),
            source,
        })
}

impl TryFrom<NemesisConfigurationFile> for NemesisConfiguration {
    type Error = ConfigurationError;

    fn try_from(file: NemesisConfigurationFile) -> Result<Self, Self::Error> {
        let generation_seed = hash256_from_hex(&file.generation_seed)
            .ok_or(ConfigurationError::InvalidGenerationSeed)?;
        let signer = NovaKeypair::from_hex(&file.signer_private_key)
            .map_err(ConfigurationError::SignerKey)?;

        let mut root_namespaces = Vec::with_capacity(file.root_namespaces.len());
        for section in file.root_namespaces {
            check_namespace(&section.name)?;
            if section.name.contains('.') {
                return Err(ConfigurationError::DottedRoot(section.name));
            }
            let prefix = format!("{}.", section.name);
            for child in &section.children {
                check_namespace(child)?;
                if !child.starts_with(&prefix) {
                    return Err(ConfigurationError::ChildOutsideRoot {
                        root: section.name.clone(),
                        child: child.clone(),
                    });
                }
            }
            root_namespaces.push(RootNamespace {
                name: section.name,
                duration: section.duration,
                children: section.children,
            });
        }

        let mut mosaics: Vec<MosaicEntry> = Vec::with_capacity(file.mosaics.len());
        for section in file.mosaics {
            check_namespace(&fix_name(&section.name))?;
            if section.divisibility > MAX_DIVISIBILITY {
                return Err(ConfigurationError::InvalidDivisibility {
                    name: section.name,
                    divisibility: section.divisibility,
                });
            }
            if mosaics.iter().any(|m| m.name == section.name) {
                return Err(ConfigurationError::DuplicateMosaic(section.name));
            }
            mosaics.push(MosaicEntry {
                name: section.name,
                properties: MosaicProperties {
                    flags: section.flags,
                    divisibility: section.divisibility,
                    duration: section.duration,
                },
                supply: section.supply,
            });
        }

        let mut distribution = Vec::with_capacity(file.distribution.len());
        for section in file.distribution {
            let address = Address::parse(&section.address, file.network).map_err(|source| {
                ConfigurationError::Address {
                    address: section.address.clone(),
                    source,
                }
            })?;
            distribution.push(Distribution {
                address,
                seeds: section.mosaics,
            });
        }

        let mut signed_entries = SignedTransactionEntries::new();
        for section in file.signed_entries {
            let signer = NovaPublicKey::from_hex(&section.signer).map_err(|source| {
                ConfigurationError::EntrySigner {
                    signer: section.signer.clone(),
                    source,
                }
            })?;
            if section.payloads.is_empty() {
                return Err(ConfigurationError::EmptySignedEntry(section.signer));
            }
            signed_entries
                .add_payloads(signer, &section.payloads)
                .map_err(ConfigurationError::EntryPayload)?;
        }

        Ok(Self {
            network: file.network,
            generation_seed,
            signer,
            root_namespaces,
            mosaics,
            distribution,
            signed_entries,
        })
    }
}
