//! Pre-signed transaction payloads supplied as hex.

use super::error::NemesisError;

/// One externally signed transaction, kept both as the hex it was supplied
/// in and as the decoded bytes that go into the block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransactionPayload {
    hex: String,
    raw: Vec<u8>,
}

impl SignedTransactionPayload {
    /// Decodes `hex`. Fails only on odd length or non-hex digits.
    ///
    /// The bytes are not interpreted here. Whether the leading `size` field
    /// matches is checked when the finished block's records are walked.
    pub fn new(hex: &str) -> Result<Self, NemesisError> {
        let raw = hex::decode(hex).map_err(|e| NemesisError::InvalidPayloadHex(e.to_string()))?;
        Ok(Self {
            hex: hex.to_string(),
            raw,
        })
    }

    /// The hex string as supplied.
    pub fn to_hex(&self) -> &str {
        &self.hex
    }

    pub fn to_binary(&self) -> &[u8] {
        &self.raw
    }

    pub fn size(&self) -> usize {
        self.raw.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized_hex(len: u32) -> String {
        let mut raw = vec![0xABu8; len as usize];
        raw[..4].copy_from_slice(&len.to_le_bytes());
        hex::encode(raw)
    }

    #[test]
    fn decodes_and_keeps_original_hex() {
        let hex = sized_hex(12).to_uppercase();
        let payload = SignedTransactionPayload::new(&hex).unwrap();
        assert_eq!(payload.size(), 12);
        assert_eq!(payload.to_hex(), hex);
        assert!(hex::encode(payload.to_binary()).eq_ignore_ascii_case(&hex));
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(
            SignedTransactionPayload::new("0c000000a"),
            Err(NemesisError::InvalidPayloadHex(_))
        ));
        assert!(matches!(
            SignedTransactionPayload::new("0c000000zz"),
            Err(NemesisError::InvalidPayloadHex(_))
        ));
    }

    #[test]
    fn any_even_length_hex_round_trips() {
        for hex in ["", "abcd", "0c000000", "DEADbeef00"] {
            let payload = SignedTransactionPayload::new(hex).unwrap();
            assert_eq!(payload.size(), hex.len() / 2);
            assert!(hex::encode(payload.to_binary()).eq_ignore_ascii_case(hex));
        }
    }

    #[test]
    fn size_field_is_not_interpreted() {
        let hex = "11".repeat(100);
        let payload = SignedTransactionPayload::new(&hex).unwrap();
        assert_eq!(payload.size(), 100);
        assert_eq!(payload.to_binary(), vec![0x11u8; 100].as_slice());
    }
}
