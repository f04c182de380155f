//! The [`Transaction`] value: one serialized, possibly signed, entity.

use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

use crate::config::{entity_type_name, ENTITY_SIGNED_DATA_OFFSET, TRANSACTION_HEADER_SIZE};
use crate::crypto::keys::{NovaPublicKey, NovaSignature};
use crate::model::entity::{self, EntityError, EntityView};

/// Offset of `max_fee` inside the transaction header.
pub const MAX_FEE_OFFSET: usize = 112;

/// Offset of `deadline` inside the transaction header.
pub const DEADLINE_OFFSET: usize = 120;

/// A transaction as it is written into a block.
///
/// The buffer is always exactly `size` bytes and at least a full
/// transaction header long. Builders produce it unsigned, with a zero
/// deadline; the nemesis builder stamps the deadline and signs it.
#[derive(Clone, PartialEq, Eq)]
pub struct Transaction {
    bytes: Vec<u8>,
}

impl Transaction {
    /// Wraps serialized transaction bytes after checking the header.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EntityError> {
        EntityView::parse(&bytes)?;
        if bytes.len() < TRANSACTION_HEADER_SIZE {
            return Err(EntityError::TooShort {
                minimum: TRANSACTION_HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    /// Wraps a buffer a builder has just laid out; the header is known good.
    pub(crate) fn from_layout(bytes: Vec<u8>) -> Self {
        debug_assert!(EntityView::parse(&bytes).is_ok());
        debug_assert!(bytes.len() >= TRANSACTION_HEADER_SIZE);
        Self { bytes }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn entity_type(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[entity::TYPE_OFFSET..entity::TYPE_OFFSET + 2])
    }

    pub fn signer(&self) -> NovaPublicKey {
        let mut raw = [0u8; 32];
        raw.copy_from_slice(&self.bytes[entity::SIGNER_OFFSET..entity::SIGNER_OFFSET + 32]);
        NovaPublicKey::from_bytes(raw)
    }

    pub fn signature(&self) -> NovaSignature {
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&self.bytes[entity::SIGNATURE_OFFSET..entity::SIGNATURE_OFFSET + 64]);
        NovaSignature::from_bytes(raw)
    }

    pub fn max_fee(&self) -> u64 {
        LittleEndian::read_u64(&self.bytes[MAX_FEE_OFFSET..MAX_FEE_OFFSET + 8])
    }

    pub fn deadline(&self) -> u64 {
        LittleEndian::read_u64(&self.bytes[DEADLINE_OFFSET..DEADLINE_OFFSET + 8])
    }

    /// Sets the deadline. Changes the signed bytes, so call before signing.
    pub fn set_deadline(&mut self, deadline: u64) {
        LittleEndian::write_u64(&mut self.bytes[DEADLINE_OFFSET..DEADLINE_OFFSET + 8], deadline);
    }

    pub(crate) fn set_signature(&mut self, signature: &NovaSignature) {
        entity::write_signature(&mut self.bytes, signature);
    }

    /// Read-only entity view over the buffer.
    pub fn view(&self) -> Result<EntityView<'_>, EntityError> {
        EntityView::parse(&self.bytes)
    }

    /// The bytes covered by the signature (`version` onward).
    pub fn signed_data(&self) -> &[u8] {
        &self.bytes[ENTITY_SIGNED_DATA_OFFSET..]
    }

    /// Body bytes following the 128-byte header.
    pub fn body(&self) -> &[u8] {
        &self.bytes[TRANSACTION_HEADER_SIZE..]
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("type", &entity_type_name(self.entity_type()))
            .field("size", &self.size())
            .field("deadline", &self.deadline())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NetworkIdentifier, ENTITY_TYPE_TRANSFER};

    fn blank(len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        let signer = NovaPublicKey::from_bytes([9u8; 32]);
        entity::write_header(&mut bytes, &signer, 1, NetworkIdentifier::Devnet, ENTITY_TYPE_TRANSFER);
        bytes
    }

    #[test]
    fn deadline_is_written_little_endian() {
        let mut tx = Transaction::from_bytes(blank(168)).unwrap();
        assert_eq!(tx.deadline(), 0);
        tx.set_deadline(1);
        assert_eq!(tx.deadline(), 1);
        assert_eq!(&tx.as_bytes()[DEADLINE_OFFSET..DEADLINE_OFFSET + 8], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(tx.max_fee(), 0);
    }

    #[test]
    fn entity_header_only_is_too_short() {
        assert!(matches!(
            Transaction::from_bytes(blank(120)),
            Err(EntityError::TooShort { minimum: 128, actual: 120 })
        ));
    }

    #[test]
    fn accessors_read_header() {
        let tx = Transaction::from_bytes(blank(168)).unwrap();
        assert_eq!(tx.entity_type(), ENTITY_TYPE_TRANSFER);
        assert_eq!(tx.signer(), NovaPublicKey::from_bytes([9u8; 32]));
        assert_eq!(tx.body().len(), 40);
        assert_eq!(tx.signed_data().len(), 60);
    }
}
