//! # Digital Signatures
//!
//! Every nemesis entity is signed with Ed25519 over the network generation
//! seed followed by the entity's signed bytes. Prefixing the seed binds a
//! signature to one network: a transaction signed for devnet does not
//! verify on mainnet even when its bytes are otherwise identical.

use super::hash::Hash256;
use super::keys::{NovaKeypair, NovaPublicKey, NovaSignature};

/// Builds the message actually fed to Ed25519: `generation_seed || data`.
fn seeded_message(generation_seed: &Hash256, data: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(generation_seed.len() + data.len());
    message.extend_from_slice(generation_seed);
    message.extend_from_slice(data);
    message
}

/// Sign `data` for the network identified by `generation_seed`.
///
/// # Example
///
/// ```
/// use nova_nemesis::crypto::{sign, verify, NovaKeypair};
///
/// let keypair = NovaKeypair::generate();
/// let seed = [7u8; 32];
/// let signature = sign(&keypair, &seed, b"entity bytes");
///
/// assert!(verify(&keypair.public_key(), &seed, b"entity bytes", &signature));
/// ```
pub fn sign(keypair: &NovaKeypair, generation_seed: &Hash256, data: &[u8]) -> NovaSignature {
    keypair.sign(&seeded_message(generation_seed, data))
}

/// Verify a signature produced by [`sign`].
pub fn verify(
    public_key: &NovaPublicKey,
    generation_seed: &Hash256,
    data: &[u8],
    signature: &NovaSignature,
) -> bool {
    public_key.verify(&seeded_message(generation_seed, data), signature)
}
