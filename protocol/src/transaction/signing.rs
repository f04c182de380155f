//! Transaction signing and entity hashing.
//!
//! Both operate on the signed region of an entity, `bytes[108..]`, prefixed
//! with the network generation seed:
//!
//! ```text
//! signature   = Ed25519(signer, seed || bytes[108..])
//! entity hash = SHA-256(signature || signer || seed || bytes[108..])
//! ```
//!
//! Any record that carries a full entity header can be hashed this way,
//! including pre-signed payloads the generator never built itself.

use super::types::Transaction;
use crate::crypto::hash::{sha256_multi, Hash256};
use crate::crypto::keys::NovaKeypair;
use crate::crypto::signatures;
use crate::model::entity::EntityView;

/// Signs a transaction in place and returns it for chaining.
///
/// Overwrites any existing signature. The signer slot is not touched: the
/// builder already wrote the public key the signature must verify against.
///
/// # Example
///
/// ```
/// use nova_nemesis::config::NetworkIdentifier;
/// use nova_nemesis::crypto::NovaKeypair;
/// use nova_nemesis::transaction::{sign_transaction, verify_transaction, MosaicDefinitionBuilder};
///
/// let keypair = NovaKeypair::from_seed(&[1u8; 32]);
/// let seed = [9u8; 32];
/// let mut tx = MosaicDefinitionBuilder::new(NetworkIdentifier::Devnet, keypair.public_key()).build();
///
/// sign_transaction(&mut tx, &keypair, &seed);
/// assert!(verify_transaction(&tx.view().unwrap(), &seed));
/// ```
pub fn sign_transaction<'a>(
    tx: &'a mut Transaction,
    keypair: &NovaKeypair,
    generation_seed: &Hash256,
) -> &'a Transaction {
    let signature = signatures::sign(keypair, generation_seed, tx.signed_data());
    tx.set_signature(&signature);
    tx
}

/// Checks an entity's signature against its own signer field.
pub fn verify_transaction(entity: &EntityView<'_>, generation_seed: &Hash256) -> bool {
    signatures::verify(
        &entity.signer(),
        generation_seed,
        entity.signed_data(),
        &entity.signature(),
    )
}

/// Entity hash of a signed transaction; the Merkle leaf for its block.
pub fn transaction_hash(entity: &EntityView<'_>, generation_seed: &Hash256) -> Hash256 {
    let signature = entity.signature();
    let signer = entity.signer();
    sha256_multi(&[
        signature.as_bytes(),
        signer.as_bytes(),
        generation_seed,
        entity.signed_data(),
    ])
}
