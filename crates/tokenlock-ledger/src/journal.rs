//! Append-only event journal with a SHA-256 hash chain.
//!
//! Each record commits to its predecessor:
//! ```text
//! digest_n = SHA256("tokenlock:journal:v1:" || digest_{n-1} || n || canonical(event_n))
//! ```
//! with `digest_{-1}` all zeroes. Altering, dropping, or reordering any
//! record breaks every digest after it.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokenlock_types::{LedgerEvent, Result, TokenLockError, constants};

/// One committed event and its chain digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalRecord {
    pub sequence: u64,
    pub event: LedgerEvent,
    #[serde(serialize_with = "serialize_digest")]
    pub digest: [u8; 32],
}

fn serialize_digest<S: serde::Serializer>(
    digest: &[u8; 32],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(digest))
}

/// The ledger's audit trail.
#[derive(Debug, Default)]
pub struct EventJournal {
    records: Vec<JournalRecord>,
    head: [u8; 32],
}

impl EventJournal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn chain(prev: &[u8; 32], sequence: u64, event: &LedgerEvent) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::JOURNAL_DOMAIN);
        hasher.update(prev);
        hasher.update(sequence.to_le_bytes());
        hasher.update(event.canonical_bytes());
        hasher.finalize().into()
    }

    /// Append a committed event.
    pub fn append(&mut self, event: LedgerEvent) -> &JournalRecord {
        let sequence = self.records.len() as u64;
        let digest = Self::chain(&self.head, sequence, &event);
        self.head = digest;
        self.records.push(JournalRecord {
            sequence,
            event,
            digest,
        });
        &self.records[self.records.len() - 1]
    }

    #[must_use]
    pub fn records(&self) -> &[JournalRecord] {
        &self.records
    }

    /// Records from `sequence` onward (empty if past the end).
    #[must_use]
    pub fn since(&self, sequence: u64) -> &[JournalRecord] {
        let start = usize::try_from(sequence)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    pub fn events(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.records.iter().map(|r| &r.event)
    }

    /// Digest of the latest record; all zeroes when empty.
    #[must_use]
    pub fn head_digest(&self) -> [u8; 32] {
        self.head
    }

    #[must_use]
    pub fn head_hex(&self) -> String {
        hex::encode(self.head)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute the whole chain.
    ///
    /// # Errors
    /// Returns `JournalChainBroken` at the first record whose sequence or
    /// digest does not match.
    pub fn verify_chain(&self) -> Result<()> {
        verify_records(&self.records)
    }

    /// Serialize all records as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }
}

/// Verify an exported slice of records starting from sequence zero.
pub fn verify_records(records: &[JournalRecord]) -> Result<()> {
    let mut prev = [0u8; 32];
    for (position, record) in records.iter().enumerate() {
        let expected_sequence = position as u64;
        if record.sequence != expected_sequence
            || EventJournal::chain(&prev, expected_sequence, &record.event) != record.digest
        {
            return Err(TokenLockError::JournalChainBroken {
                sequence: expected_sequence,
            });
        }
        prev = record.digest;
    }
    Ok(())
}
