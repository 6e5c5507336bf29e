//! Names Registry - authoritative name registry engine
//!
//! This crate owns the mapping from claimed names to owners and metadata:
//!
//! - **NameRegistry**: the engine. Enforces minimum length, uniqueness and
//!   length-based pricing on registration, owner-gated updates, and
//!   administrator-only withdrawal of custodied payments.
//! - **RegistryRequest**: closed set of typed operations for relays
//! - **EventJournal**: hash-chained record of every state change, replayable
//!   after reconnecting
//! - **RegistryStore**: snapshot persistence (in-memory or JSON file)
//! - **ValueCarrier**: outbound transfer used by withdrawals
//!
//! ## Invariants
//!
//! After every operation, successful or not:
//!
//! - a name is registered at most once and never removed
//! - every registered name meets the schedule's minimum length
//! - custodied balance equals payments received minus amounts withdrawn
//! - only the administrator fixed at construction can withdraw

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod carrier;
pub mod config;
pub mod engine;
pub mod error;
pub mod journal;
pub mod request;
pub mod state;
pub mod store;

// Re-exports
pub use carrier::{LedgerCarrier, ValueCarrier};
pub use config::RegistryConfig;
pub use engine::{NameRegistry, NameRegistryBuilder};
pub use error::{RegistryError, RegistryErrorKind, Result};
pub use journal::{EventJournal, JournalEntry};
pub use request::{
    NameQuery, RegisterRequest, RegistryRequest, RegistryResponse, UpdateRecordRequest,
    WithdrawRequest,
};
pub use state::{CustodySummary, RegistrySnapshot, RegistryState};
pub use store::{InMemoryRegistryStore, JsonFileRegistryStore, RegistryStore};

pub use names_types::{
    Amount, EventEnvelope, Identity, NameRecord, Namespace, PriceSchedule, PriceTier,
    RegistryEvent, MIN_NAME_LENGTH,
};
