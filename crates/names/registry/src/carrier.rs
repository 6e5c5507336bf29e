//! Outbound value transfer.
//!
//! Registration payments arrive attached to the call, so the registry never
//! pulls funds. The only outbound movement is a withdrawal, which goes
//! through a `ValueCarrier`.

use std::collections::HashMap;

use async_trait::async_trait;
use names_types::{Amount, Identity};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Carries value out of the registry.
#[async_trait]
pub trait ValueCarrier: Send + Sync {
    /// Transfer `amount` to `to`. Either the whole amount arrives or the call
    /// fails; a failed transfer must not have moved anything.
    async fn transfer(&self, to: &Identity, amount: Amount) -> Result<()>;
}

/// In-process carrier that credits payouts to an account table.
#[derive(Default)]
pub struct LedgerCarrier {
    accounts: Mutex<HashMap<Identity, Amount>>,
}

impl LedgerCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total paid out to `identity` so far.
    pub async fn paid_to(&self, identity: &Identity) -> Amount {
        self.accounts
            .lock()
            .await
            .get(identity)
            .copied()
            .unwrap_or(Amount::ZERO)
    }
}

#[async_trait]
impl ValueCarrier for LedgerCarrier {
    async fn transfer(&self, to: &Identity, amount: Amount) -> Result<()> {
        let mut accounts = self.accounts.lock().await;
        let current = accounts.get(to).copied().unwrap_or(Amount::ZERO);
        let updated = current
            .checked_add(amount)
            .map_err(|e| RegistryError::TransferFailed(e.to_string()))?;
        accounts.insert(to.clone(), updated);
        debug!(to = %to, amount = %amount, "Credited payout");
        Ok(())
    }
}
