//! Registry state and its invariants.
//!
//! `RegistryState` is a plain value. The engine clones it, applies one
//! operation to the clone, persists the result and only then swaps it in, so
//! every method here may leave `self` half-updated on error without anyone
//! observing it.

use std::collections::HashMap;

use chrono::Utc;
use names_types::{
    name_length, Amount, EventEnvelope, Identity, NameRecord, Namespace, RegistryEvent,
    MIN_NAME_LENGTH,
};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::journal::{EventJournal, JournalEntry};

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Custodied value accounting.
///
/// `balance == total_received - total_withdrawn` at all times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodySummary {
    pub balance: Amount,
    pub total_received: Amount,
    pub total_withdrawn: Amount,
}

/// The entire durable state of a registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub administrator: Identity,
    pub namespace: Namespace,
    /// Records in registration order
    pub records: Vec<NameRecord>,
    pub custody: CustodySummary,
    pub journal: Vec<JournalEntry>,
}

#[derive(Clone, Debug)]
pub struct RegistryState {
    administrator: Identity,
    namespace: Namespace,
    records: Vec<NameRecord>,
    index: HashMap<String, usize>,
    custody: CustodySummary,
    journal: EventJournal,
}

impl RegistryState {
    pub fn new(administrator: Identity, namespace: Namespace) -> Self {
        Self {
            administrator,
            namespace,
            records: Vec::new(),
            index: HashMap::new(),
            custody: CustodySummary::default(),
            journal: EventJournal::new(),
        }
    }

    /// Rebuild state from a snapshot, rejecting anything inconsistent.
    pub fn from_snapshot(snapshot: RegistrySnapshot, min_length: usize) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RegistryError::Corrupt(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut index = HashMap::with_capacity(snapshot.records.len());
        for (position, record) in snapshot.records.iter().enumerate() {
            if index.insert(record.name.clone(), position).is_some() {
                return Err(RegistryError::Corrupt(format!(
                    "name '{}' is registered more than once",
                    record.name
                )));
            }
        }

        let state = Self {
            administrator: snapshot.administrator,
            namespace: snapshot.namespace,
            records: snapshot.records,
            index,
            custody: snapshot.custody,
            journal: EventJournal::from_entries(snapshot.journal)?,
        };
        state.verify(min_length)?;
        Ok(state)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            version: SNAPSHOT_VERSION,
            administrator: self.administrator.clone(),
            namespace: self.namespace.clone(),
            records: self.records.clone(),
            custody: self.custody,
            journal: self.journal.entries().to_vec(),
        }
    }

    /// Check every registry invariant over this state.
    ///
    /// Names are checked against `min_length`, never less than
    /// `MIN_NAME_LENGTH`.
    pub fn verify(&self, min_length: usize) -> Result<()> {
        let min_length = min_length.max(MIN_NAME_LENGTH);
        if self.index.len() != self.records.len() {
            return Err(RegistryError::Corrupt(
                "name index does not match records".to_string(),
            ));
        }

        for (position, record) in self.records.iter().enumerate() {
            if record.id != position as u64 {
                return Err(RegistryError::Corrupt(format!(
                    "record '{}' has id {} at position {}",
                    record.name, record.id, position
                )));
            }
            if self.index.get(&record.name) != Some(&position) {
                return Err(RegistryError::Corrupt(format!(
                    "name index disagrees for '{}'",
                    record.name
                )));
            }
            if name_length(&record.name) < min_length {
                return Err(RegistryError::Corrupt(format!(
                    "registered name '{}' is shorter than {}",
                    record.name, min_length
                )));
            }
        }

        let expected_balance = self
            .custody
            .total_received
            .checked_sub(self.custody.total_withdrawn)
            .map_err(|_| RegistryError::Corrupt("more withdrawn than received".to_string()))?;
        if expected_balance != self.custody.balance {
            return Err(RegistryError::Corrupt(format!(
                "custodied balance {} does not equal received {} minus withdrawn {}",
                self.custody.balance, self.custody.total_received, self.custody.total_withdrawn
            )));
        }

        if !self.journal.verify_chain() {
            return Err(RegistryError::Corrupt(
                "journal hash-chain verification failed".to_string(),
            ));
        }

        Ok(())
    }

    pub fn administrator(&self) -> &Identity {
        &self.administrator
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn custody(&self) -> CustodySummary {
        self.custody
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&NameRecord> {
        self.index.get(name).map(|&position| &self.records[position])
    }

    /// Create a record and take custody of `payment`.
    ///
    /// Preconditions (length, price) are checked by the engine; this only
    /// guards uniqueness and arithmetic.
    pub fn insert_record(
        &mut self,
        name: &str,
        owner: Identity,
        record: String,
        avatar: String,
        payment: Amount,
    ) -> Result<(NameRecord, EventEnvelope)> {
        if self.contains(name) {
            return Err(RegistryError::NameAlreadyTaken(name.to_string()));
        }

        self.custody.balance = self.custody.balance.checked_add(payment)?;
        self.custody.total_received = self.custody.total_received.checked_add(payment)?;

        let now = Utc::now();
        let entry = NameRecord {
            id: self.records.len() as u64,
            name: name.to_string(),
            owner,
            record,
            avatar,
            registered_at: now,
            updated_at: now,
        };

        self.index.insert(entry.name.clone(), self.records.len());
        self.records.push(entry.clone());

        let envelope = self.journal.append(RegistryEvent::Registered {
            name: entry.name.clone(),
            owner: entry.owner.clone(),
            record: entry.record.clone(),
            avatar: entry.avatar.clone(),
        });
        Ok((entry, envelope))
    }

    /// Replace record and avatar of an existing name. Ownership is checked by
    /// the engine.
    pub fn update_record(
        &mut self,
        name: &str,
        record: String,
        avatar: String,
    ) -> Result<(NameRecord, EventEnvelope)> {
        let position = *self
            .index
            .get(name)
            .ok_or_else(|| RegistryError::NameNotFound(name.to_string()))?;

        let entry = &mut self.records[position];
        entry.record = record;
        entry.avatar = avatar;
        entry.updated_at = Utc::now();
        let entry = entry.clone();

        let envelope = self.journal.append(RegistryEvent::Updated {
            name: entry.name.clone(),
            record: entry.record.clone(),
            avatar: entry.avatar.clone(),
        });
        Ok((entry, envelope))
    }

    /// Move the whole custodied balance out to `to`.
    pub fn drain_balance(&mut self, to: Identity) -> Result<(Amount, EventEnvelope)> {
        let amount = self.custody.balance;
        if amount.is_zero() {
            return Err(RegistryError::NothingToWithdraw);
        }

        self.custody.total_withdrawn = self.custody.total_withdrawn.checked_add(amount)?;
        self.custody.balance = Amount::ZERO;

        let envelope = self.journal.append(RegistryEvent::Withdrawn { amount, to });
        Ok((amount, envelope))
    }
}
