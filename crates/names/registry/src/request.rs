//! Typed request surface.
//!
//! A relay or client hands the registry one `RegistryRequest` at a time and
//! gets back the matching `RegistryResponse` variant or an error.

use names_types::{Amount, Identity, NameRecord};
use serde::{Deserialize, Serialize};

use crate::state::CustodySummary;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub record: String,
    #[serde(default)]
    pub avatar: String,
    pub attached_value: Amount,
    pub caller: Identity,
}

impl RegisterRequest {
    pub fn new(name: impl Into<String>, attached_value: Amount, caller: Identity) -> Self {
        Self {
            name: name.into(),
            record: String::new(),
            avatar: String::new(),
            attached_value,
            caller,
        }
    }

    pub fn with_record(mut self, record: impl Into<String>) -> Self {
        self.record = record.into();
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    pub name: String,
    pub record: String,
    pub avatar: String,
    pub caller: Identity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub caller: Identity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryRequest {
    Register(RegisterRequest),
    UpdateRecord(UpdateRecordRequest),
    GetRecord(NameQuery),
    ListAll,
    Withdraw(WithdrawRequest),
    Price(NameQuery),
    OwnerOf(NameQuery),
    Balance,
}

impl RegistryRequest {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            RegistryRequest::Register(_)
                | RegistryRequest::UpdateRecord(_)
                | RegistryRequest::Withdraw(_)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RegistryResponse {
    Registered { record: NameRecord },
    Updated { record: NameRecord },
    Record { record: NameRecord },
    Records { records: Vec<NameRecord> },
    Withdrawn { amount: Amount },
    Price { price: Amount },
    Owner { owner: Identity },
    Balance { custody: CustodySummary },
}
