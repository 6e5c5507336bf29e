//! Append-only, hash-chained event journal.
//!
//! Every successful mutation appends exactly one entry. The journal is part of
//! the persisted snapshot, so a client that reconnects can replay everything
//! after the last sequence it saw instead of relying on live delivery.

use chrono::{DateTime, Utc};
use names_types::{EventEnvelope, RegistryEvent};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Journal entry: an event envelope plus its chain hashes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sequence: u64,
    pub emitted_at: DateTime<Utc>,
    pub event: RegistryEvent,
    pub previous_hash: Option<String>,
    pub entry_hash: String,
}

impl JournalEntry {
    pub fn envelope(&self) -> EventEnvelope {
        EventEnvelope {
            sequence: self.sequence,
            emitted_at: self.emitted_at,
            event: self.event.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventJournal {
    entries: Vec<JournalEntry>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a journal from persisted entries, verifying sequence and chain.
    pub fn from_entries(entries: Vec<JournalEntry>) -> Result<Self> {
        for (position, entry) in entries.iter().enumerate() {
            let expected = position as u64 + 1;
            if entry.sequence != expected {
                return Err(RegistryError::Corrupt(format!(
                    "journal sequence gap at position {} (found {})",
                    position, entry.sequence
                )));
            }
        }

        let journal = Self { entries };
        if !journal.verify_chain() {
            return Err(RegistryError::Corrupt(
                "journal hash-chain verification failed".to_string(),
            ));
        }
        Ok(journal)
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_sequence(&self) -> u64 {
        self.entries.last().map(|e| e.sequence).unwrap_or(0)
    }

    pub fn append(&mut self, event: RegistryEvent) -> EventEnvelope {
        let sequence = self.last_sequence() + 1;
        let emitted_at = Utc::now();
        let previous_hash = self.entries.last().map(|e| e.entry_hash.clone());
        let entry_hash = compute_entry_hash(sequence, emitted_at, &event, previous_hash.as_deref());

        let entry = JournalEntry {
            sequence,
            emitted_at,
            event,
            previous_hash,
            entry_hash,
        };
        let envelope = entry.envelope();
        self.entries.push(entry);
        envelope
    }

    /// Envelopes with a sequence strictly greater than `sequence`.
    pub fn since(&self, sequence: u64) -> Vec<EventEnvelope> {
        // sequence n lives at index n - 1
        let start = usize::try_from(sequence)
            .unwrap_or(usize::MAX)
            .min(self.entries.len());
        self.entries[start..]
            .iter()
            .map(JournalEntry::envelope)
            .collect()
    }

    pub fn verify_chain(&self) -> bool {
        let mut previous_hash: Option<String> = None;
        for entry in &self.entries {
            if entry.previous_hash != previous_hash {
                return false;
            }
            let expected = compute_entry_hash(
                entry.sequence,
                entry.emitted_at,
                &entry.event,
                previous_hash.as_deref(),
            );
            if entry.entry_hash != expected {
                return false;
            }
            previous_hash = Some(entry.entry_hash.clone());
        }
        true
    }
}

fn compute_entry_hash(
    sequence: u64,
    emitted_at: DateTime<Utc>,
    event: &RegistryEvent,
    previous_hash: Option<&str>,
) -> String {
    let material = serde_json::json!({
        "sequence": sequence,
        "emitted_at": emitted_at,
        "event": event,
        "previous_hash": previous_hash,
    });

    let bytes = serde_json::to_vec(&material).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}
