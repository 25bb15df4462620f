//! Wires configuration, view-model, and a transport together.
//!
//! `TodoApp` runs each operation end to end: `begin_*` on the store, the
//! request through the `Transport`, then `settle`. Hosts that want several
//! requests in flight at once drive `TodoStore` directly instead.

use tracing::info;

use crate::client::{build_probe, parse_probe, TodoClient};
use crate::config::{ApiConfig, ConfigStore, KeyValueStore, MemoryStore};
use crate::error::{ConfigError, StorageError};
use crate::http::Transport;
use crate::state::TodoState;
use crate::store::{PendingOp, TodoStore};
use crate::types::{EnvelopePolicy, TodoId};

/// Shown once a new endpoint passes the connectivity probe.
pub const CONNECTED_MESSAGE: &str = "API connected successfully! You can now start managing your tasks.";

#[derive(Debug)]
pub struct TodoApp<S, T> {
    config_store: ConfigStore<S>,
    config: ApiConfig,
    store: TodoStore,
    transport: T,
}

impl<T: Transport> TodoApp<MemoryStore, T> {
    /// An app bound to a hardcoded endpoint. It starts configured and its
    /// configuration never reaches durable storage.
    pub fn with_fixed_endpoint(base_url: &str, transport: T, policy: EnvelopePolicy) -> Self {
        let mut app = Self::assemble(ConfigStore::new(MemoryStore::new()), ApiConfig::configured(base_url), transport, policy);
        app.refresh();
        app
    }
}

impl<S: KeyValueStore, T: Transport> TodoApp<S, T> {
    /// Load the stored configuration and, if it is configured, fetch the list.
    pub fn open(storage: S, transport: T, policy: EnvelopePolicy) -> Result<Self, StorageError> {
        let config_store = ConfigStore::new(storage);
        let config = config_store.load()?;
        let mut app = Self::assemble(config_store, config, transport, policy);
        app.refresh();
        Ok(app)
    }

    fn assemble(config_store: ConfigStore<S>, config: ApiConfig, transport: T, policy: EnvelopePolicy) -> Self {
        let mut store = TodoStore::new(policy);
        if config.is_configured {
            store.connect(TodoClient::new(&config.base_url));
        }
        Self {
            config_store,
            config,
            store,
            transport,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn config_store(&self) -> &ConfigStore<S> {
        &self.config_store
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    /// For the UI helpers (`set_draft`, `start_edit`, `subscribe`, ...).
    pub fn store_mut(&mut self) -> &mut TodoStore {
        &mut self.store
    }

    pub fn snapshot(&self) -> std::sync::Arc<TodoState> {
        self.store.snapshot()
    }

    /// Probe `candidate`, and only if it answers like the todo API, persist
    /// it and load the list. On failure nothing changes.
    pub fn configure(&mut self, candidate: &str) -> Result<(), ConfigError> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }

        let response = self
            .transport
            .execute(build_probe(candidate))
            .map_err(ConfigError::Unreachable)?;
        parse_probe(response)?;

        let config = ApiConfig::configured(candidate);
        self.config_store.save(&config)?;
        info!(base_url = candidate, "API endpoint configured");

        self.store.connect(TodoClient::new(candidate));
        self.config = config;
        // Failures from the previous endpoint no longer apply.
        self.store.dismiss_error();
        self.store.show_success(CONNECTED_MESSAGE);
        self.refresh();
        Ok(())
    }

    /// Each of these returns whether a request was actually issued.
    pub fn refresh(&mut self) -> bool {
        let pending = self.store.begin_list();
        self.run(pending)
    }

    pub fn add(&mut self, title: &str) -> bool {
        let pending = self.store.begin_create(title);
        self.run(pending)
    }

    pub fn toggle(&mut self, id: TodoId) -> bool {
        let pending = self.store.begin_toggle(id);
        self.run(pending)
    }

    pub fn rename(&mut self, id: TodoId, title: &str) -> bool {
        let pending = self.store.begin_rename(id, title);
        self.run(pending)
    }

    pub fn save_edit(&mut self) -> bool {
        let pending = self.store.begin_save_edit();
        self.run(pending)
    }

    pub fn delete(&mut self, id: TodoId) -> bool {
        let pending = self.store.begin_delete(id);
        self.run(pending)
    }

    fn run(&mut self, pending: Option<PendingOp>) -> bool {
        let Some(pending) = pending else {
            return false;
        };
        let result = self.transport.execute(pending.request.clone());
        self.store.settle(pending, result);
        true
    }
}
