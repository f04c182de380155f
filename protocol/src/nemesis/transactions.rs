//! # Nemesis Transactions
//!
//! Builds, stamps and signs the transactions that establish a network's
//! initial namespaces, mosaics and balances.
//!
//! ## Build order
//!
//! ```text
//! for each root namespace (config order):
//!     root registration
//!     children, shallowest first (config order within a depth)
//! for each mosaic (config order), nonce = 0, 1, 2, ...:
//!     definition → alias → supply increase
//! for each distribution address (config order):
//!     one transfer carrying all of its seeds
//! ```
//!
//! The order is part of the output: the same configuration must yield the
//! same bytes on every run.

use std::collections::BTreeMap;

use super::error::NemesisError;
use crate::config::{NetworkIdentifier, NEMESIS_DEADLINE};
use crate::configuration::{fix_name, MosaicSeed, NemesisConfiguration};
use crate::crypto::hash::Hash256;
use crate::crypto::keys::NovaKeypair;
use crate::model::address::Address;
use crate::model::ids::{
    generate_namespace_path, MosaicId, MosaicNonce, NamespaceId, UnresolvedMosaicId,
};
use crate::model::mosaic::MosaicProperties;
use crate::transaction::builder::{
    AliasAction, MosaicAliasBuilder, MosaicDefinitionBuilder, MosaicSupplyChangeBuilder,
    NamespaceRegistrationBuilder, SupplyChangeAction, TransferBuilder,
};
use crate::transaction::signing::sign_transaction;
use crate::transaction::types::Transaction;

/// Accumulates signed nemesis transactions in build order.
///
/// Also owns the name table of every namespace registered so far. The
/// table lives exactly as long as one build.
pub struct NemesisTransactions<'a> {
    network: NetworkIdentifier,
    generation_seed: Hash256,
    signer: &'a NovaKeypair,
    namespaces: BTreeMap<NamespaceId, String>,
    transactions: Vec<Transaction>,
}

impl<'a> NemesisTransactions<'a> {
    pub fn new(network: NetworkIdentifier, generation_seed: Hash256, signer: &'a NovaKeypair) -> Self {
        Self {
            network,
            generation_seed,
            signer,
            namespaces: BTreeMap::new(),
            transactions: Vec::new(),
        }
    }

    /// Registers a root namespace; `duration` 0 means eternal.
    pub fn register_root_namespace(
        &mut self,
        name: &str,
        duration: u64,
    ) -> Result<NamespaceId, NemesisError> {
        let builder = NamespaceRegistrationBuilder::new(self.network, self.signer.public_key())
            .root(name, duration);
        let id = builder.namespace_id();
        self.sign_and_add(builder.build()?);
        self.namespaces.insert(id, name.to_string());
        Ok(id)
    }

    /// Registers the single segment `name` under an already registered
    /// namespace.
    pub fn register_child_namespace(
        &mut self,
        name: &str,
        parent_id: NamespaceId,
    ) -> Result<NamespaceId, NemesisError> {
        let parent_name = self
            .namespaces
            .get(&parent_id)
            .cloned()
            .ok_or_else(|| NemesisError::UnknownNamespace(parent_id.to_string()))?;

        let builder = NamespaceRegistrationBuilder::new(self.network, self.signer.public_key())
            .child(name, parent_id);
        let id = builder.namespace_id();
        self.sign_and_add(builder.build()?);
        self.namespaces.insert(id, format!("{}.{}", parent_name, name));
        Ok(id)
    }

    /// Defines a mosaic and returns the id derived from signer and nonce.
    pub fn define_mosaic(&mut self, nonce: MosaicNonce, properties: MosaicProperties) -> MosaicId {
        let builder = MosaicDefinitionBuilder::new(self.network, self.signer.public_key())
            .nonce(nonce)
            .properties(properties);
        let id = builder.mosaic_id();
        self.sign_and_add(builder.build());
        id
    }

    /// Links the namespace named like the mosaic to `mosaic_id`.
    ///
    /// Returns the namespace id as an unresolved mosaic id, which is how
    /// later transactions refer to the mosaic.
    pub fn alias_mosaic(
        &mut self,
        mosaic_name: &str,
        mosaic_id: MosaicId,
    ) -> Result<UnresolvedMosaicId, NemesisError> {
        let namespace_name = fix_name(mosaic_name);
        let path = generate_namespace_path(&namespace_name)?;
        let namespace_id = match path.last() {
            Some(id) if self.namespaces.contains_key(id) => *id,
            _ => return Err(NemesisError::UnknownNamespace(namespace_name)),
        };

        let tx = MosaicAliasBuilder::new(self.network, self.signer.public_key())
            .namespace_id(namespace_id)
            .mosaic_id(mosaic_id)
            .action(AliasAction::Link)
            .build();
        self.sign_and_add(tx);

        tracing::debug!(
            namespace = %namespace_id,
            name = %namespace_name,
            mosaic = %mosaic_id,
            "added mosaic alias"
        );
        Ok(UnresolvedMosaicId::from(namespace_id))
    }

    /// Increases the supply of `mosaic_id` by `delta`.
    pub fn change_supply(&mut self, mosaic_id: UnresolvedMosaicId, delta: u64) {
        let tx = MosaicSupplyChangeBuilder::new(self.network, self.signer.public_key())
            .mosaic_id(mosaic_id)
            .action(SupplyChangeAction::Increase)
            .delta(delta)
            .build();
        self.sign_and_add(tx);
    }

    /// One transfer to `recipient` carrying every seed, each resolved
    /// through `name_to_id`.
    pub fn transfer(
        &mut self,
        name_to_id: &BTreeMap<String, UnresolvedMosaicId>,
        recipient: &Address,
        seeds: &[MosaicSeed],
    ) -> Result<(), NemesisError> {
        let mut builder =
            TransferBuilder::new(self.network, self.signer.public_key()).recipient(*recipient);
        for seed in seeds {
            let id = name_to_id
                .get(&seed.name)
                .ok_or_else(|| NemesisError::UnknownMosaic(seed.name.clone()))?;
            builder = builder.add_mosaic(*id, seed.amount);
        }
        self.sign_and_add(builder.build()?);
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    fn sign_and_add(&mut self, mut tx: Transaction) {
        tx.set_deadline(NEMESIS_DEADLINE);
        sign_transaction(&mut tx, self.signer, &self.generation_seed);
        self.transactions.push(tx);
    }
}

/// Builds every nemesis transaction described by `config`, in build order.
pub fn create_nemesis_transactions(
    config: &NemesisConfiguration,
) -> Result<Vec<Transaction>, NemesisError> {
    let mut transactions =
        NemesisTransactions::new(config.network, config.generation_seed, &config.signer);

    // - namespaces
    for root in &config.root_namespaces {
        transactions.register_root_namespace(&root.name, root.duration)?;

        let mut children: Vec<(usize, &str)> = root
            .children
            .iter()
            .map(|child| (child.split('.').count(), child.as_str()))
            .collect();
        // stable: equal depths keep configuration order
        children.sort_by_key(|(depth, _)| *depth);

        for (_, child) in children {
            let path = generate_namespace_path(child)?;
            let (leaf, parent) = match (child.rsplit('.').next(), path.len().checked_sub(2)) {
                (Some(leaf), Some(parent_index)) => (leaf, path[parent_index]),
                _ => return Err(NemesisError::UnknownNamespace(child.to_string())),
            };
            transactions.register_child_namespace(leaf, parent)?;
        }
    }

    // - mosaics
    let mut nonce = MosaicNonce(0);
    let mut name_to_id = BTreeMap::new();
    for mosaic in &config.mosaics {
        let mosaic_id = transactions.define_mosaic(nonce, mosaic.properties);
        tracing::debug!(name = %mosaic.name, mosaic = %mosaic_id, nonce = nonce.value(), "mapped mosaic");
        nonce = nonce.next();

        let unresolved = transactions.alias_mosaic(&mosaic.name, mosaic_id)?;
        name_to_id.insert(mosaic.name.clone(), unresolved);

        transactions.change_supply(unresolved, mosaic.supply);
    }

    // - distribution
    for distribution in &config.distribution {
        transactions.transfer(&name_to_id, &distribution.address, &distribution.seeds)?;
    }

    let transactions = transactions.into_transactions();
    tracing::info!(count = transactions.len(), "nemesis transactions created");
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ENTITY_TYPE_MOSAIC_ALIAS, ENTITY_TYPE_MOSAIC_DEFINITION, ENTITY_TYPE_MOSAIC_SUPPLY_CHANGE,
        ENTITY_TYPE_NAMESPACE_REGISTRATION, ENTITY_TYPE_TRANSFER,
    };
    use crate::configuration::{Distribution, MosaicEntry, RootNamespace};
    use crate::nemesis::entry::SignedTransactionEntries;
    use crate::transaction::signing::verify_transaction;
    use byteorder::{ByteOrder, LittleEndian};

    const SEED: Hash256 = [0x47; 32];

    fn config(children: &[&str], mosaic: &str, seed_name: &str) -> NemesisConfiguration {
        let recipient = Address::from_public_key(&NovaKeypair::from_seed(&[8u8; 32]).public_key());
        NemesisConfiguration {
            network: NetworkIdentifier::Devnet,
            generation_seed: SEED,
            signer: NovaKeypair::from_seed(&[1u8; 32]),
            root_namespaces: vec![RootNamespace {
                name: "nem".into(),
                duration: 0,
                children: children.iter().map(|c| c.to_string()).collect(),
            }],
            mosaics: vec![MosaicEntry {
                name: mosaic.into(),
                properties: MosaicProperties {
                    divisibility: 6,
                    ..MosaicProperties::default()
                },
                supply: 8_999_999_998_000_000,
            }],
            distribution: vec![Distribution {
                address: recipient,
                seeds: vec![MosaicSeed {
                    name: seed_name.into(),
                    amount: 1_000_000,
                }],
            }],
            signed_entries: SignedTransactionEntries::new(),
        }
    }

    #[test]
    fn builds_six_transactions_in_order() {
        let config = config(&["nem.xem"], "nem:xem", "nem:xem");
        let txs = create_nemesis_transactions(&config).unwrap();
        let types: Vec<u16> = txs.iter().map(Transaction::entity_type).collect();
        assert_eq!(
            types,
            vec![
                ENTITY_TYPE_NAMESPACE_REGISTRATION,
                ENTITY_TYPE_NAMESPACE_REGISTRATION,
                ENTITY_TYPE_MOSAIC_DEFINITION,
                ENTITY_TYPE_MOSAIC_ALIAS,
                ENTITY_TYPE_MOSAIC_SUPPLY_CHANGE,
                ENTITY_TYPE_TRANSFER,
            ]
        );
        for tx in &txs {
            assert_eq!(tx.deadline(), NEMESIS_DEADLINE);
            assert!(verify_transaction(&tx.view().unwrap(), &SEED));
        }
    }

    #[test]
    fn transfer_uses_the_alias_id() {
        let config = config(&["nem.xem"], "nem:xem", "nem:xem");
        let txs = create_nemesis_transactions(&config).unwrap();
        let alias_target = generate_namespace_path("nem.xem").unwrap()[1];
        let transfer = txs[5].body();
        assert_eq!(transfer[34], 1);
        assert_eq!(LittleEndian::read_u64(&transfer[40..48]), alias_target.value());
        assert_eq!(LittleEndian::read_u64(&transfer[48..56]), 1_000_000);
        // the supply change refers to the alias as well
        assert_eq!(LittleEndian::read_u64(&txs[4].body()[0..8]), alias_target.value());
    }

    #[test]
    fn dotted_mosaic_name_builds_the_same_set() {
        let dotted = create_nemesis_transactions(&config(&["nem.xem"], "nem.xem", "nem.xem")).unwrap();
        let coloned = create_nemesis_transactions(&config(&["nem.xem"], "nem:xem", "nem:xem")).unwrap();
        assert_eq!(dotted.len(), 6);
        for (a, b) in dotted.iter().zip(&coloned) {
            assert_eq!(a.as_bytes(), b.as_bytes());
        }
    }

    #[test]
    fn children_registered_shallowest_first_with_leaf_names() {
        let config = config(&["nem.a.deep", "nem.a", "nem.b"], "nem:a", "nem:a");
        let txs = create_nemesis_transactions(&config).unwrap();
        let names: Vec<&[u8]> = txs[..4].iter().map(|tx| &tx.body()[18..]).collect();
        assert_eq!(names, vec![&b"nem"[..], &b"a"[..], &b"b"[..], &b"deep"[..]]);

        let path = generate_namespace_path("nem.a.deep").unwrap();
        assert_eq!(LittleEndian::read_u64(&txs[3].body()[0..8]), path[1].value());
        assert_eq!(txs[3].body()[16], 1);
    }

    #[test]
    fn child_without_registered_parent_fails() {
        let config = config(&["nem.missing.leaf"], "nem:xem", "nem:xem");
        assert!(matches!(
            create_nemesis_transactions(&config),
            Err(NemesisError::UnknownNamespace(_))
        ));
    }

    #[test]
    fn alias_of_unregistered_namespace_fails() {
        let config = config(&[], "nem:xem", "nem:xem");
        match create_nemesis_transactions(&config) {
            Err(NemesisError::UnknownNamespace(name)) => assert_eq!(name, "nem.xem"),
            other => panic!("expected UnknownNamespace, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn seed_for_undefined_mosaic_fails() {
        let config = config(&["nem.xem"], "nem:xem", "nem:other");
        assert!(matches!(
            create_nemesis_transactions(&config),
            Err(NemesisError::UnknownMosaic(name)) if name == "nem:other"
        ));
    }

    #[test]
    fn mosaic_nonces_are_sequential() {
        let signer = NovaKeypair::from_seed(&[1u8; 32]);
        let mut txs = NemesisTransactions::new(NetworkIdentifier::Devnet, SEED, &signer);
        let a = txs.define_mosaic(MosaicNonce(0), MosaicProperties::default());
        let b = txs.define_mosaic(MosaicNonce(1), MosaicProperties::default());
        let again = txs.define_mosaic(MosaicNonce(0), MosaicProperties::default());
        assert_ne!(a, b);
        assert_eq!(a, again);
        assert_eq!(txs.transactions().len(), 3);
    }
}
