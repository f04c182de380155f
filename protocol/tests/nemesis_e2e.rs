//! End-to-end tests for nemesis block generation.
//!
//! Each test starts from a TOML configuration, exactly as the `nemgen`
//! binary does, and checks the bytes that come out the other end.

use std::io::Write;

use nova_nemesis::config::{
    NetworkIdentifier, BLOCK_HEADER_SIZE, ENTITY_TYPE_MOSAIC_ALIAS, ENTITY_TYPE_MOSAIC_DEFINITION,
    ENTITY_TYPE_MOSAIC_SUPPLY_CHANGE, ENTITY_TYPE_NAMESPACE_REGISTRATION,
    ENTITY_TYPE_NEMESIS_BLOCK, ENTITY_TYPE_TRANSFER,
};
use nova_nemesis::configuration::NemesisConfiguration;
use nova_nemesis::crypto::hash::Hash256;
use nova_nemesis::crypto::keys::{NovaKeypair, NovaPublicKey};
use nova_nemesis::model::address::Address;
use nova_nemesis::model::block::{Block, PreviousBlockContext};
use nova_nemesis::model::ids::{generate_namespace_path, UnresolvedMosaicId};
use nova_nemesis::nemesis::{
    assemble, calculate_transactions_hash, create_nemesis_block, create_nemesis_block_element,
    create_nemesis_transactions, extend, update_nemesis_block, verify_block_signature,
    BlockStage, ExecutionHashes, NemesisBlock, NemesisError, SignedTransactionEntries,
};
use nova_nemesis::transaction::builder::TransferBuilder;
use nova_nemesis::transaction::signing::sign_transaction;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const NETWORK: NetworkIdentifier = NetworkIdentifier::Testnet;
const SEED_HEX: &str = "57F7DA205008026C776CB6AED843393F04CD458E0AA2D9F1D5F31A402072B2D6";
const SIGNER_KEY: &str = "A41BE076B942D915EA3330B135D35C5A959A2DCC50BBB393C6407984D4A3B564";

fn generation_seed() -> Hash256 {
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hex::decode(SEED_HEX).unwrap());
    seed
}

fn recipient() -> Address {
    Address::from_public_key(&NovaKeypair::from_seed(&[42u8; 32]).public_key())
}

/// A transfer signed by someone other than the nemesis signer.
fn foreign_payload(seed_byte: u8, amount: u64) -> (NovaPublicKey, String) {
    let account = NovaKeypair::from_seed(&[seed_byte; 32]);
    let xem = generate_namespace_path("nem.xem").unwrap()[1];
    let mut tx = TransferBuilder::new(NETWORK, account.public_key())
        .recipient(recipient())
        .add_mosaic(UnresolvedMosaicId::from(xem), amount)
        .build()
        .unwrap();
    tx.set_deadline(1);
    sign_transaction(&mut tx, &account, &generation_seed());
    (account.public_key(), hex::encode_upper(tx.as_bytes()))
}

fn config_toml(signed_entries: &[(NovaPublicKey, Vec<String>)]) -> String {
    let mut toml = format!(
        r#"
network = "testnet"
generation_seed = "{SEED_HEX}"
signer_private_key = "{SIGNER_KEY}"

[[root_namespaces]]
name = "nem"
children = ["nem.xem"]

[[mosaics]]
name = "nem:xem"
divisibility = 6
supply = 8999999998000000
flags = {{ transferable = true, supply_mutable = false }}

[[distribution]]
address = "{}"
mosaics = [{{ name = "nem:xem", amount = 3000000 }}]
"#,
        recipient().to_display(NETWORK).unwrap()
    );
    for (signer, payloads) in signed_entries {
        let list: Vec<String> = payloads.iter().map(|p| format!("\"{p}\"")).collect();
        toml.push_str(&format!(
            "\n[[signed_entries]]\nsigner = \"{}\"\npayloads = [{}]\n",
            signer.to_hex(),
            list.join(", ")
        ));
    }
    toml
}

fn config(signed_entries: &[(NovaPublicKey, Vec<String>)]) -> NemesisConfiguration {
    NemesisConfiguration::from_toml_str(&config_toml(signed_entries)).unwrap()
}

fn payload_hex(len: u32, fill: u8) -> String {
    let mut raw = vec![fill; len as usize];
    raw[..4].copy_from_slice(&len.to_le_bytes());
    hex::encode(raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn configuration_file_to_provisional_block() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(config_toml(&[]).as_bytes()).unwrap();
    let config = NemesisConfiguration::load(file.path()).unwrap();

    let nemesis = create_nemesis_block(&config).unwrap();
    assert_eq!(nemesis.stage(), BlockStage::ProvisionallySigned);

    let block = nemesis.block();
    assert_eq!(block.entity_type(), ENTITY_TYPE_NEMESIS_BLOCK);
    assert_eq!(block.height(), 1);
    assert_eq!(block.signer(), config.signer_public_key());
    assert_eq!(block.receipts_hash(), [0u8; 32]);
    assert_eq!(block.state_hash(), [0u8; 32]);
    assert!(verify_block_signature(block, &config.generation_seed));

    let element = nemesis.to_element(&config.generation_seed).unwrap();
    let types: Vec<u16> = element.transactions.iter().map(|tx| tx.entity_type).collect();
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
    assert!(element.transactions.iter().all(|tx| tx.signature_valid));
    assert_eq!(element.transactions[0].offset, BLOCK_HEADER_SIZE);
    assert_eq!(element.entity_hash, nemesis.hash());
}

#[test]
fn generation_is_deterministic() {
    let config = config(&[]);
    let first = create_nemesis_block(&config).unwrap();
    let second = create_nemesis_block(&config).unwrap();
    assert_eq!(first.block().as_bytes(), second.block().as_bytes());
    assert_eq!(first.hash(), second.hash());
}

#[test]
fn execution_results_produce_the_canonical_hash() {
    let config = config(&[]);
    let mut nemesis = create_nemesis_block(&config).unwrap();
    let provisional = nemesis.hash();
    let transactions_hash = nemesis.block().transactions_hash();

    let hashes = ExecutionHashes {
        receipts_hash: [0x11; 32],
        state_hash: [0x22; 32],
    };
    let canonical = update_nemesis_block(&config, &mut nemesis, &hashes).unwrap();

    assert_ne!(canonical, provisional);
    assert_eq!(nemesis.stage(), BlockStage::Finalized);
    assert_eq!(nemesis.block().receipts_hash(), [0x11; 32]);
    assert_eq!(nemesis.block().state_hash(), [0x22; 32]);
    assert_eq!(nemesis.block().transactions_hash(), transactions_hash);
    assert!(verify_block_signature(nemesis.block(), &config.generation_seed));

    // A second update is a stage error, and leaves the block untouched.
    let before = nemesis.clone();
    assert!(matches!(
        update_nemesis_block(&config, &mut nemesis, &hashes),
        Err(NemesisError::InvalidStage { .. })
    ));
    assert_eq!(nemesis, before);
}

#[test]
fn reloaded_block_can_be_finalized() {
    let config = config(&[]);
    let written = create_nemesis_block(&config).unwrap().into_block().into_bytes();

    let block = Block::from_bytes(written).unwrap();
    let stranger = NovaKeypair::from_seed(&[42u8; 32]).public_key();
    assert!(matches!(
        NemesisBlock::from_signed(block.clone(), &stranger, &config.generation_seed),
        Err(NemesisError::UnexpectedSigner { .. })
    ));

    let mut nemesis =
        NemesisBlock::from_signed(block, &config.signer_public_key(), &config.generation_seed).unwrap();
    assert_eq!(nemesis.stage(), BlockStage::ProvisionallySigned);

    let hashes = ExecutionHashes {
        receipts_hash: [1; 32],
        state_hash: [2; 32],
    };
    let hash = update_nemesis_block(&config, &mut nemesis, &hashes).unwrap();

    let reloaded = Block::from_bytes(nemesis.into_block().into_bytes()).unwrap();
    let finalized =
        NemesisBlock::from_signed(reloaded, &config.signer_public_key(), &config.generation_seed).unwrap();
    assert_eq!(finalized.stage(), BlockStage::Finalized);
    assert_eq!(finalized.hash(), hash);
}

#[test]
fn signed_entries_follow_the_nemesis_transactions() {
    let (alice, alice_tx) = foreign_payload(50, 10);
    let (_, alice_tx2) = foreign_payload(50, 20);
    let (bob, bob_tx) = foreign_payload(51, 30);
    let plain = create_nemesis_block(&config(&[])).unwrap();
    let config = config(&[
        (alice, vec![alice_tx]),
        (bob, vec![bob_tx.clone()]),
        (alice, vec![alice_tx2.clone()]),
    ]);

    let nemesis = create_nemesis_block(&config).unwrap();
    assert!(nemesis.block().size() > plain.block().size());
    assert!(verify_block_signature(nemesis.block(), &config.generation_seed));

    let element = create_nemesis_block_element(&config, nemesis.block()).unwrap();
    assert_eq!(element.transactions.len(), 9);
    assert!(element.transactions.iter().all(|tx| tx.signature_valid));

    // Alice's two payloads stay together ahead of Bob's.
    let signers: Vec<NovaPublicKey> = element.transactions[6..].iter().map(|tx| tx.signer).collect();
    assert_eq!(signers, vec![alice, alice, bob]);
    let records: Vec<_> = nemesis.block().records().collect::<Result<_, _>>().unwrap();
    assert_eq!(hex::encode_upper(records[7].bytes), alice_tx2);
    assert_eq!(hex::encode_upper(records[8].bytes), bob_tx);
    assert!(records.iter().all(|r| r.offset % 8 == 0));

    assert_eq!(
        calculate_transactions_hash(nemesis.block(), &config.generation_seed).unwrap(),
        nemesis.block().transactions_hash()
    );
}

#[test]
fn extension_layout_matches_payload_sizes() {
    let config = config(&[]);
    let transactions = create_nemesis_transactions(&config).unwrap();
    let last = transactions.last().unwrap().size();
    let block = assemble(
        &PreviousBlockContext::default(),
        NETWORK,
        &config.signer_public_key(),
        &transactions,
    )
    .unwrap();
    let base = block.size();

    let mut entries = SignedTransactionEntries::new();
    entries
        .add_payloads(NovaPublicKey::from_bytes([1; 32]), &[payload_hex(100, 1), payload_hex(103, 2)])
        .unwrap();
    entries
        .add_payloads(NovaPublicKey::from_bytes([2; 32]), &[payload_hex(97, 3)])
        .unwrap();

    let extended = extend(block, &transactions, &entries).unwrap();
    let pad = |n: usize| (8 - n % 8) % 8;
    let padded = base + pad(last);
    assert_eq!(extended.size(), padded + 100 + 4 + 103 + 1 + 97);

    let tail: Vec<(usize, usize)> = extended
        .records()
        .skip(transactions.len())
        .map(|r| r.map(|r| (r.bytes.len(), r.padding)).unwrap())
        .collect();
    assert_eq!(tail, vec![(100, 4), (103, 1), (97, 0)]);
}

#[test]
fn extending_with_no_entries_changes_nothing() {
    let config = config(&[]);
    let transactions = create_nemesis_transactions(&config).unwrap();
    let block = assemble(
        &PreviousBlockContext::default(),
        NETWORK,
        &config.signer_public_key(),
        &transactions,
    )
    .unwrap();
    let extended = extend(block.clone(), &transactions, &SignedTransactionEntries::new()).unwrap();
    assert_eq!(extended, block);
}

#[test]
fn summary_serializes_to_json() {
    let config = config(&[]);
    let nemesis = create_nemesis_block(&config).unwrap();
    let summary = nemesis.to_element(&config.generation_seed).unwrap().summary();

    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["entity_type"], "nemesis_block");
    assert_eq!(json["height"], 1);
    assert_eq!(json["generation_seed"], SEED_HEX);
    assert_eq!(json["hash"], hex::encode_upper(nemesis.hash()));
    assert_eq!(json["transactions"].as_array().unwrap().len(), 6);
    assert_eq!(json["transactions"][5]["entity_type"], "transfer");
}
