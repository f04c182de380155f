//! Transaction construction via the builder pattern.
//!
//! Each builder knows one transaction body layout. `build()` returns an
//! unsigned [`Transaction`] whose entity header is filled in (size, signer,
//! version, network, type) and whose `max_fee`, `deadline` and signature are
//! zero. Signing happens in [`super::signing`]; keeping it separate lets the
//! layouts be tested without key material.
//!
//! Body offsets below are relative to the end of the 128-byte transaction
//! header.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use super::types::Transaction;
use crate::config::{
    NetworkIdentifier, ENTITY_TYPE_MOSAIC_ALIAS, ENTITY_TYPE_MOSAIC_DEFINITION,
    ENTITY_TYPE_MOSAIC_SUPPLY_CHANGE, ENTITY_TYPE_NAMESPACE_REGISTRATION, ENTITY_TYPE_TRANSFER,
    ENTITY_VERSION, ETERNAL_ARTIFACT_DURATION, MAX_NAMESPACE_NAME_LENGTH, MAX_TRANSFER_MOSAICS,
    TRANSACTION_HEADER_SIZE,
};
use crate::crypto::keys::NovaPublicKey;
use crate::model::address::Address;
use crate::model::entity;
use crate::model::ids::{
    generate_mosaic_id, generate_namespace_id, MosaicId, MosaicNonce, NamespaceId,
    UnresolvedMosaicId,
};
use crate::model::mosaic::MosaicProperties;

/// Errors raised by builders whose inputs do not fit the wire layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("namespace name '{0}' must be 1-64 bytes")]
    InvalidNamespaceName(String),

    #[error("transfer carries {0} mosaics, at most 255 fit")]
    TooManyMosaics(usize),

    #[error("transfer lists mosaic {0} more than once")]
    DuplicateMosaic(UnresolvedMosaicId),
}

/// Allocates a zeroed transaction of `TRANSACTION_HEADER_SIZE + body_size`
/// bytes with its entity header written.
fn new_transaction_buffer(
    network: NetworkIdentifier,
    signer: &NovaPublicKey,
    entity_type: u16,
    body_size: usize,
) -> Vec<u8> {
    let mut bytes = vec![0u8; TRANSACTION_HEADER_SIZE + body_size];
    entity::write_header(&mut bytes, signer, ENTITY_VERSION, network, entity_type);
    bytes
}

const BODY: usize = TRANSACTION_HEADER_SIZE;

// ---------------------------------------------------------------------------
// Namespace registration
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Registration {
    Root { duration: u64 },
    Child { parent: NamespaceId },
}

/// Builds a namespace registration.
///
/// ```text
/// +0  duration (root) | parent id (child)   u64
/// +8  namespace id                          u64
/// +16 registration type (0 root, 1 child)   u8
/// +17 name size                             u8
/// +18 name
/// ```
#[derive(Clone, Debug)]
pub struct NamespaceRegistrationBuilder {
    network: NetworkIdentifier,
    signer: NovaPublicKey,
    name: String,
    registration: Registration,
}

impl NamespaceRegistrationBuilder {
    pub fn new(network: NetworkIdentifier, signer: NovaPublicKey) -> Self {
        Self {
            network,
            signer,
            name: String::new(),
            registration: Registration::Root {
                duration: ETERNAL_ARTIFACT_DURATION,
            },
        }
    }

    /// Registers `name` as a root namespace living `duration` blocks.
    pub fn root(mut self, name: &str, duration: u64) -> Self {
        self.name = name.to_string();
        self.registration = Registration::Root { duration };
        self
    }

    /// Registers `name` (a single segment) under `parent`.
    pub fn child(mut self, name: &str, parent: NamespaceId) -> Self {
        self.name = name.to_string();
        self.registration = Registration::Child { parent };
        self
    }

    /// Id the registered namespace will get.
    pub fn namespace_id(&self) -> NamespaceId {
        let parent = match self.registration {
            Registration::Root { .. } => NamespaceId::ROOT_PARENT,
            Registration::Child { parent } => parent,
        };
        generate_namespace_id(parent, &self.name)
    }

    pub fn build(self) -> Result<Transaction, BuilderError> {
        let name = self.name.as_bytes();
        if name.is_empty() || name.len() > MAX_NAMESPACE_NAME_LENGTH {
            return Err(BuilderError::InvalidNamespaceName(self.name));
        }

        let id = self.namespace_id();
        let mut bytes = new_transaction_buffer(
            self.network,
            &self.signer,
            ENTITY_TYPE_NAMESPACE_REGISTRATION,
            18 + name.len(),
        );

        let (first, registration_type) = match self.registration {
            Registration::Root { duration } => (duration, 0u8),
            Registration::Child { parent } => (parent.value(), 1u8),
        };
        LittleEndian::write_u64(&mut bytes[BODY..BODY + 8], first);
        LittleEndian::write_u64(&mut bytes[BODY + 8..BODY + 16], id.value());
        bytes[BODY + 16] = registration_type;
        bytes[BODY + 17] = name.len() as u8;
        bytes[BODY + 18..].copy_from_slice(name);
        Ok(Transaction::from_layout(bytes))
    }
}

// ---------------------------------------------------------------------------
// Mosaic definition
// ---------------------------------------------------------------------------

/// Builds a mosaic definition (150 bytes).
///
/// ```text
/// +0  mosaic id     u64
/// +8  duration      u64
/// +16 nonce         u32
/// +20 flags         u8
/// +21 divisibility  u8
/// ```
#[derive(Clone, Debug)]
pub struct MosaicDefinitionBuilder {
    network: NetworkIdentifier,
    signer: NovaPublicKey,
    nonce: MosaicNonce,
    properties: MosaicProperties,
}

impl MosaicDefinitionBuilder {
    pub fn new(network: NetworkIdentifier, signer: NovaPublicKey) -> Self {
        Self {
            network,
            signer,
            nonce: MosaicNonce(0),
            properties: MosaicProperties::default(),
        }
    }

    pub fn nonce(mut self, nonce: MosaicNonce) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn properties(mut self, properties: MosaicProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Id derived from the signer and nonce.
    pub fn mosaic_id(&self) -> MosaicId {
        generate_mosaic_id(&self.signer, self.nonce)
    }

    pub fn build(self) -> Transaction {
        let id = self.mosaic_id();
        let mut bytes =
            new_transaction_buffer(self.network, &self.signer, ENTITY_TYPE_MOSAIC_DEFINITION, 22);
        LittleEndian::write_u64(&mut bytes[BODY..BODY + 8], id.value());
        LittleEndian::write_u64(&mut bytes[BODY + 8..BODY + 16], self.properties.duration);
        LittleEndian::write_u32(&mut bytes[BODY + 16..BODY + 20], self.nonce.value());
        bytes[BODY + 20] = self.properties.flags.to_byte();
        bytes[BODY + 21] = self.properties.divisibility;
        Transaction::from_layout(bytes)
    }
}

// ---------------------------------------------------------------------------
// Mosaic alias
// ---------------------------------------------------------------------------

/// Whether an alias transaction creates or removes a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AliasAction {
    Unlink = 0,
    Link = 1,
}

/// Builds a mosaic alias (145 bytes).
///
/// ```text
/// +0  namespace id  u64
/// +8  mosaic id     u64
/// +16 action        u8
/// ```
#[derive(Clone, Debug)]
pub struct MosaicAliasBuilder {
    network: NetworkIdentifier,
    signer: NovaPublicKey,
    namespace_id: NamespaceId,
    mosaic_id: MosaicId,
    action: AliasAction,
}

impl MosaicAliasBuilder {
    pub fn new(network: NetworkIdentifier, signer: NovaPublicKey) -> Self {
        Self {
            network,
            signer,
            namespace_id: NamespaceId(0),
            mosaic_id: MosaicId(0),
            action: AliasAction::Link,
        }
    }

    pub fn namespace_id(mut self, namespace_id: NamespaceId) -> Self {
        self.namespace_id = namespace_id;
        self
    }

    pub fn mosaic_id(mut self, mosaic_id: MosaicId) -> Self {
        self.mosaic_id = mosaic_id;
        self
    }

    pub fn action(mut self, action: AliasAction) -> Self {
        self.action = action;
        self
    }

    pub fn build(self) -> Transaction {
        let mut bytes =
            new_transaction_buffer(self.network, &self.signer, ENTITY_TYPE_MOSAIC_ALIAS, 17);
        LittleEndian::write_u64(&mut bytes[BODY..BODY + 8], self.namespace_id.value());
        LittleEndian::write_u64(&mut bytes[BODY + 8..BODY + 16], self.mosaic_id.value());
        bytes[BODY + 16] = self.action as u8;
        Transaction::from_layout(bytes)
    }
}

// ---------------------------------------------------------------------------
// Mosaic supply change
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SupplyChangeAction {
    Decrease = 0,
    Increase = 1,
}

/// Builds a mosaic supply change (145 bytes).
///
/// ```text
/// +0  mosaic id (unresolved)  u64
/// +8  delta                   u64
/// +16 action                  u8
/// ```
#[derive(Clone, Debug)]
pub struct MosaicSupplyChangeBuilder {
    network: NetworkIdentifier,
    signer: NovaPublicKey,
    mosaic_id: UnresolvedMosaicId,
    delta: u64,
    action: SupplyChangeAction,
}

impl MosaicSupplyChangeBuilder {
    pub fn new(network: NetworkIdentifier, signer: NovaPublicKey) -> Self {
        Self {
            network,
            signer,
            mosaic_id: UnresolvedMosaicId(0),
            delta: 0,
            action: SupplyChangeAction::Increase,
        }
    }

    pub fn mosaic_id(mut self, mosaic_id: UnresolvedMosaicId) -> Self {
        self.mosaic_id = mosaic_id;
        self
    }

    pub fn delta(mut self, delta: u64) -> Self {
        self.delta = delta;
        self
    }

    pub fn action(mut self, action: SupplyChangeAction) -> Self {
        self.action = action;
        self
    }

    pub fn build(self) -> Transaction {
        let mut bytes = new_transaction_buffer(
            self.network,
            &self.signer,
            ENTITY_TYPE_MOSAIC_SUPPLY_CHANGE,
            17,
        );
        LittleEndian::write_u64(&mut bytes[BODY..BODY + 8], self.mosaic_id.value());
        LittleEndian::write_u64(&mut bytes[BODY + 8..BODY + 16], self.delta);
        bytes[BODY + 16] = self.action as u8;
        Transaction::from_layout(bytes)
    }
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

/// Builds a transfer of one or more mosaics to a single recipient.
///
/// ```text
/// +0  recipient        [u8; 32]
/// +32 message size     u16   (always 0)
/// +34 mosaics count    u8
/// +35 reserved         u8
/// +36 reserved         u32
/// +40 mosaics          count x (id u64, amount u64), ascending by id
/// ```
#[derive(Clone, Debug)]
pub struct TransferBuilder {
    network: NetworkIdentifier,
    signer: NovaPublicKey,
    recipient: Address,
    mosaics: Vec<(UnresolvedMosaicId, u64)>,
}

impl TransferBuilder {
    pub fn new(network: NetworkIdentifier, signer: NovaPublicKey) -> Self {
        Self {
            network,
            signer,
            recipient: Address::from_bytes([0u8; 32]),
            mosaics: Vec::new(),
        }
    }

    pub fn recipient(mut self, recipient: Address) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn add_mosaic(mut self, id: UnresolvedMosaicId, amount: u64) -> Self {
        self.mosaics.push((id, amount));
        self
    }

    pub fn build(mut self) -> Result<Transaction, BuilderError> {
        if self.mosaics.len() > MAX_TRANSFER_MOSAICS {
            return Err(BuilderError::TooManyMosaics(self.mosaics.len()));
        }
        self.mosaics.sort_by_key(|(id, _)| *id);
        if let Some(pair) = self.mosaics.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(BuilderError::DuplicateMosaic(pair[0].0));
        }

        let mut bytes = new_transaction_buffer(
            self.network,
            &self.signer,
            ENTITY_TYPE_TRANSFER,
            40 + 16 * self.mosaics.len(),
        );
        bytes[BODY..BODY + 32].copy_from_slice(self.recipient.as_bytes());
        bytes[BODY + 34] = self.mosaics.len() as u8;

        let mut offset = BODY + 40;
        for (id, amount) in &self.mosaics {
            LittleEndian::write_u64(&mut bytes[offset..offset + 8], id.value());
            LittleEndian::write_u64(&mut bytes[offset + 8..offset + 16], *amount);
            offset += 16;
        }
        Ok(Transaction::from_layout(bytes))
    }
}
