//! Signed entries: externally produced payloads grouped by signer.
//!
//! The order entries are iterated in decides where their payloads land in
//! the block, and therefore the block hash. [`SignedTransactionEntries`]
//! makes that order explicit: it is insertion order, full stop. A second
//! entry for a signer that is already present is merged into the first one
//! and keeps the first one's position.

use super::error::NemesisError;
use super::payload::SignedTransactionPayload;
use crate::crypto::keys::NovaPublicKey;

/// All payloads one external signer contributes, in append order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransactionEntry {
    signer: NovaPublicKey,
    payloads: Vec<SignedTransactionPayload>,
}

impl SignedTransactionEntry {
    /// Creates an entry holding its first payload.
    pub fn new(payload_hex: &str, signer: NovaPublicKey) -> Result<Self, NemesisError> {
        Ok(Self {
            signer,
            payloads: vec![SignedTransactionPayload::new(payload_hex)?],
        })
    }

    /// Appends another payload, returning the new payload count.
    pub fn add_transaction(&mut self, payload_hex: &str) -> Result<usize, NemesisError> {
        self.payloads.push(SignedTransactionPayload::new(payload_hex)?);
        Ok(self.payloads.len())
    }

    pub fn signer(&self) -> &NovaPublicKey {
        &self.signer
    }

    pub fn payloads(&self) -> &[SignedTransactionPayload] {
        &self.payloads
    }

    /// Decoded payload bytes in append order.
    pub fn raw_payloads(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.payloads.iter().map(SignedTransactionPayload::to_binary)
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Always `false`; an entry is created with a payload and never shrinks.
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

/// Ordered signer → entry collection consumed by the block assembler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignedTransactionEntries {
    entries: Vec<SignedTransactionEntry>,
}

impl SignedTransactionEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry` at the end, or merges its payloads into the existing
    /// entry with the same signer.
    pub fn insert(&mut self, entry: SignedTransactionEntry) {
        match self.entries.iter_mut().find(|e| e.signer == entry.signer) {
            Some(existing) => existing.payloads.extend(entry.payloads),
            None => self.entries.push(entry),
        }
    }

    /// Parses `payload_hexes` and adds them under `signer`. An empty list
    /// adds nothing.
    pub fn add_payloads<S: AsRef<str>>(
        &mut self,
        signer: NovaPublicKey,
        payload_hexes: &[S],
    ) -> Result<(), NemesisError> {
        let mut hexes = payload_hexes.iter();
        let Some(first) = hexes.next() else {
            return Ok(());
        };
        let mut entry = SignedTransactionEntry::new(first.as_ref(), signer)?;
        for hex in hexes {
            entry.add_transaction(hex.as_ref())?;
        }
        self.insert(entry);
        Ok(())
    }

    pub fn get(&self, signer: &NovaPublicKey) -> Option<&SignedTransactionEntry> {
        self.entries.iter().find(|e| &e.signer == signer)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignedTransactionEntry> {
        self.entries.iter()
    }

    /// Number of distinct signers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total payloads across all signers.
    pub fn payload_count(&self) -> usize {
        self.entries.iter().map(SignedTransactionEntry::len).sum()
    }

    /// Every payload in block order.
    pub fn payloads(&self) -> impl Iterator<Item = &SignedTransactionPayload> + '_ {
        self.entries.iter().flat_map(|e| e.payloads.iter())
    }
}

impl<'a> IntoIterator for &'a SignedTransactionEntries {
    type Item = &'a SignedTransactionEntry;
    type IntoIter = std::slice::Iter<'a, SignedTransactionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<SignedTransactionEntry> for SignedTransactionEntries {
    fn from_iter<I: IntoIterator<Item = SignedTransactionEntry>>(iter: I) -> Self {
        let mut entries = Self::new();
        for entry in iter {
            entries.insert(entry);
        }
        entries
    }
}
