//! Names Types - value types shared by the registry engine and its clients
//!
//! - **Identity**: opaque, comparable caller identity
//! - **Amount**: native value in base units (18 decimals)
//! - **PriceSchedule**: length-keyed registration prices
//! - **Namespace**: the shared suffix names are claimed under
//! - **NameRecord**: one claimed name with its owner and metadata
//! - **RegistryEvent**: state-change notifications

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod amount;
pub mod error;
pub mod event;
pub mod identity;
pub mod pricing;
pub mod record;

pub use amount::{Amount, NATIVE_DECIMALS};
pub use error::TypeError;
pub use event::{EventEnvelope, RegistryEvent};
pub use identity::Identity;
pub use pricing::{name_length, PriceSchedule, PriceTier, MIN_NAME_LENGTH};
pub use record::{NameRecord, Namespace};
