//! The name registry engine.
//!
//! All state lives behind one `RwLock`. Mutations take the write lock for the
//! whole transaction: validate, build the next state on a clone, persist it,
//! then swap it in and publish the event. Readers take the read lock and see
//! either the state before a mutation or after it, never in between.

use std::sync::Arc;

use names_types::{Amount, EventEnvelope, Identity, NameRecord, Namespace, PriceSchedule};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

use crate::carrier::{LedgerCarrier, ValueCarrier};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::request::{RegisterRequest, RegistryRequest, RegistryResponse, UpdateRecordRequest};
use crate::state::{CustodySummary, RegistrySnapshot, RegistryState};
use crate::store::{InMemoryRegistryStore, JsonFileRegistryStore, RegistryStore};

const DEFAULT_EVENT_BUFFER: usize = 256;

/// Builder for [`NameRegistry`].
pub struct NameRegistryBuilder {
    administrator: Identity,
    namespace: Namespace,
    pricing: PriceSchedule,
    store: Option<Arc<dyn RegistryStore>>,
    carrier: Option<Arc<dyn ValueCarrier>>,
    event_buffer: usize,
}

impl NameRegistryBuilder {
    pub fn new(administrator: Identity) -> Self {
        Self {
            administrator,
            namespace: Namespace::default(),
            pricing: PriceSchedule::default(),
            store: None,
            carrier: None,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }

    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn pricing(mut self, pricing: PriceSchedule) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn store(mut self, store: Arc<dyn RegistryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn carrier(mut self, carrier: Arc<dyn ValueCarrier>) -> Self {
        self.carrier = Some(carrier);
        self
    }

    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    /// Open the registry, loading existing state from the store.
    ///
    /// An empty store is initialized with a fresh state. A stored snapshot
    /// that fails verification, or that belongs to a different administrator
    /// or namespace, is `RegistryError::Corrupt`.
    pub async fn open(self) -> Result<NameRegistry> {
        let store: Arc<dyn RegistryStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryRegistryStore::new()),
        };
        let carrier: Arc<dyn ValueCarrier> = match self.carrier {
            Some(carrier) => carrier,
            None => Arc::new(LedgerCarrier::new()),
        };

        let state = match store.load().await? {
            Some(snapshot) => {
                let state = RegistryState::from_snapshot(snapshot, self.pricing.min_length())?;
                if state.administrator() != &self.administrator {
                    return Err(RegistryError::Corrupt(format!(
                        "stored administrator {} does not match configured {}",
                        state.administrator(),
                        self.administrator
                    )));
                }
                if state.namespace() != &self.namespace {
                    return Err(RegistryError::Corrupt(format!(
                        "stored namespace {} does not match configured {}",
                        state.namespace(),
                        self.namespace
                    )));
                }
                state
            }
            None => {
                let state = RegistryState::new(self.administrator.clone(), self.namespace.clone());
                store.save(&state.snapshot()).await?;
                state
            }
        };

        info!(
            backend = store.label(),
            namespace = %self.namespace,
            records = state.len(),
            balance = %state.custody().balance,
            "Opened name registry"
        );

        let (events, _) = broadcast::channel(self.event_buffer);
        Ok(NameRegistry {
            administrator: self.administrator,
            namespace: self.namespace,
            pricing: self.pricing,
            state: RwLock::new(state),
            store,
            carrier,
            events,
        })
    }
}

/// Authoritative name registry.
pub struct NameRegistry {
    administrator: Identity,
    namespace: Namespace,
    pricing: PriceSchedule,
    state: RwLock<RegistryState>,
    store: Arc<dyn RegistryStore>,
    carrier: Arc<dyn ValueCarrier>,
    events: broadcast::Sender<EventEnvelope>,
}

impl NameRegistry {
    /// In-memory registry with the default namespace and price schedule.
    pub fn new(administrator: Identity) -> Self {
        let namespace = Namespace::default();
        let (events, _) = broadcast::channel(DEFAULT_EVENT_BUFFER);
        Self {
            state: RwLock::new(RegistryState::new(administrator.clone(), namespace.clone())),
            administrator,
            namespace,
            pricing: PriceSchedule::default(),
            store: Arc::new(InMemoryRegistryStore::new()),
            carrier: Arc::new(LedgerCarrier::new()),
            events,
        }
    }

    pub fn builder(administrator: Identity) -> NameRegistryBuilder {
        NameRegistryBuilder::new(administrator)
    }

    /// Open a registry as described by `config`, file-backed when
    /// `state_path` is set.
    ///
    /// A file-backed registry keeps its state file locked until dropped, so a
    /// second registry on the same file fails to open with
    /// `RegistryError::Storage`.
    pub async fn from_config(
        config: &RegistryConfig,
        carrier: Arc<dyn ValueCarrier>,
    ) -> Result<Self> {
        config.validate()?;
        let store: Arc<dyn RegistryStore> = match &config.state_path {
            Some(path) => Arc::new(JsonFileRegistryStore::open(path)?),
            None => Arc::new(InMemoryRegistryStore::new()),
        };

        Self::builder(config.administrator.clone())
            .namespace(config.namespace.clone())
            .pricing(config.price_schedule())
            .event_buffer(config.event_buffer)
            .store(store)
            .carrier(carrier)
            .open()
            .await
    }

    pub fn administrator(&self) -> &Identity {
        &self.administrator
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn pricing(&self) -> &PriceSchedule {
        &self.pricing
    }

    /// Required payment for registering `name`.
    pub fn price(&self, name: &str) -> Result<Amount> {
        self.pricing
            .price(name)
            .ok_or_else(|| RegistryError::NameTooShort {
                name: name.to_string(),
                min_length: self.pricing.min_length(),
            })
    }

    /// Claim a name for the caller.
    pub async fn register(&self, request: RegisterRequest) -> Result<NameRecord> {
        let RegisterRequest {
            name,
            record,
            avatar,
            attached_value,
            caller,
        } = request;

        let required = match self.price(&name) {
            Ok(required) => required,
            Err(err) => {
                debug!(name = %name, "Rejected registration: name too short");
                return Err(err);
            }
        };

        let mut state = self.state.write().await;

        if state.contains(&name) {
            debug!(name = %name, caller = %caller, "Rejected registration: name taken");
            return Err(RegistryError::NameAlreadyTaken(name));
        }

        if attached_value < required {
            debug!(
                name = %name,
                required = %required,
                attached = %attached_value,
                "Rejected registration: insufficient payment"
            );
            return Err(RegistryError::InsufficientPayment {
                required,
                attached: attached_value,
            });
        }

        let mut next = state.clone();
        let (entry, envelope) = next.insert_record(&name, caller, record, avatar, attached_value)?;
        self.store.save(&next.snapshot()).await?;
        *state = next;
        self.publish(envelope);

        info!(
            name = %entry.name,
            qualified = %self.namespace.qualified(&entry.name),
            owner = %entry.owner,
            amount = %attached_value,
            id = entry.id,
            "Registered name"
        );
        Ok(entry)
    }

    /// Replace record and avatar of a name owned by the caller.
    ///
    /// Repeating an update with the same values leaves state untouched and
    /// emits nothing.
    pub async fn update_record(&self, request: UpdateRecordRequest) -> Result<NameRecord> {
        let UpdateRecordRequest {
            name,
            record,
            avatar,
            caller,
        } = request;

        let mut state = self.state.write().await;

        let current = state
            .get(&name)
            .ok_or_else(|| RegistryError::NameNotFound(name.clone()))?;

        if current.owner != caller {
            warn!(name = %name, caller = %caller, "Rejected update from non-owner");
            return Err(RegistryError::NotOwner { name, caller });
        }

        if current.record == record && current.avatar == avatar {
            debug!(name = %name, "Update leaves record unchanged");
            return Ok(current.clone());
        }

        let mut next = state.clone();
        let (entry, envelope) = next.update_record(&name, record, avatar)?;
        self.store.save(&next.snapshot()).await?;
        *state = next;
        self.publish(envelope);

        info!(name = %entry.name, owner = %entry.owner, "Updated record");
        Ok(entry)
    }

    pub async fn get_record(&self, name: &str) -> Result<NameRecord> {
        self.state
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NameNotFound(name.to_string()))
    }

    /// Owner of `name`.
    pub async fn owner_of(&self, name: &str) -> Result<Identity> {
        self.get_record(name).await.map(|record| record.owner)
    }

    /// Every record in registration order, as of the time of the call.
    pub async fn list_all(&self) -> Vec<NameRecord> {
        self.state.read().await.records().to_vec()
    }

    /// Every registered name in registration order.
    pub async fn names(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .records()
            .iter()
            .map(|record| record.name.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }

    pub async fn balance(&self) -> Amount {
        self.state.read().await.custody().balance
    }

    pub async fn custody(&self) -> CustodySummary {
        self.state.read().await.custody()
    }

    /// Transfer the whole custodied balance to the administrator.
    ///
    /// The drained state is persisted before the transfer. If the transfer
    /// then fails, the previous snapshot is written back and the balance is
    /// left exactly as it was.
    pub async fn withdraw(&self, caller: Identity) -> Result<Amount> {
        let mut state = self.state.write().await;

        if caller != self.administrator {
            warn!(caller = %caller, "Rejected withdrawal from non-administrator");
            return Err(RegistryError::NotAuthorized(caller));
        }

        let mut next = state.clone();
        let (amount, envelope) = next.drain_balance(caller.clone())?;
        self.store.save(&next.snapshot()).await?;

        if let Err(err) = self.carrier.transfer(&caller, amount).await {
            warn!(to = %caller, amount = %amount, error = %err, "Withdrawal transfer failed");
            if let Err(restore) = self.store.save(&state.snapshot()).await {
                error!(error = %restore, "Failed to restore registry snapshot after failed transfer");
                return Err(RegistryError::Storage(format!(
                    "transfer failed ({}) and snapshot restore failed ({})",
                    err, restore
                )));
            }
            return Err(match err {
                RegistryError::TransferFailed(_) => err,
                other => RegistryError::TransferFailed(other.to_string()),
            });
        }

        *state = next;
        self.publish(envelope);

        info!(to = %caller, amount = %amount, "Withdrew custodied balance");
        Ok(amount)
    }

    /// Subscribe to live notifications.
    ///
    /// A receiver that lags behind gets `RecvError::Lagged` and should catch
    /// up through [`NameRegistry::events_since`].
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// Journaled events after `sequence`, for replay after reconnecting.
    pub async fn events_since(&self, sequence: u64) -> Vec<EventEnvelope> {
        self.state.read().await.journal().since(sequence)
    }

    pub async fn last_sequence(&self) -> u64 {
        self.state.read().await.journal().last_sequence()
    }

    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.state.read().await.snapshot()
    }

    /// Check every invariant over the current state.
    pub async fn verify(&self) -> Result<()> {
        self.state.read().await.verify(self.pricing.min_length())
    }

    /// Dispatch a typed request.
    pub async fn handle(&self, request: RegistryRequest) -> Result<RegistryResponse> {
        debug!(mutation = request.is_mutation(), "Handling registry request");
        match request {
            RegistryRequest::Register(request) => self
                .register(request)
                .await
                .map(|record| RegistryResponse::Registered { record }),
            RegistryRequest::UpdateRecord(request) => self
                .update_record(request)
                .await
                .map(|record| RegistryResponse::Updated { record }),
            RegistryRequest::GetRecord(query) => self
                .get_record(&query.name)
                .await
                .map(|record| RegistryResponse::Record { record }),
            RegistryRequest::ListAll => Ok(RegistryResponse::Records {
                records: self.list_all().await,
            }),
            RegistryRequest::Withdraw(request) => self
                .withdraw(request.caller)
                .await
                .map(|amount| RegistryResponse::Withdrawn { amount }),
            RegistryRequest::Price(query) => self
                .price(&query.name)
                .map(|price| RegistryResponse::Price { price }),
            RegistryRequest::OwnerOf(query) => self
                .owner_of(&query.name)
                .await
                .map(|owner| RegistryResponse::Owner { owner }),
            RegistryRequest::Balance => Ok(RegistryResponse::Balance {
                custody: self.custody().await,
            }),
        }
    }

    fn publish(&self, envelope: EventEnvelope) {
        // no subscribers is fine; the journal keeps the event
        let _ = self.events.send(envelope);
    }
}
