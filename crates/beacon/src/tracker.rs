//! The Tracker: account state, visitor identity and event dispatch.
//!
//! The tracker owns the property store of the current account and the
//! transport selected for the host. Every operation completes synchronously;
//! only a POST round-trip outlives the call that started it.

use std::sync::Arc;

use beacon_core::{
    compose_event, generate_uid, json, library_info, page_info, Account, Command, Envelope,
    PageContext, PropertyMap, StaticPage, TrackCallback, Value, UID_KEY,
};
use beacon_store::{MemoryStorage, PropertyStore, Storage, StoreKey};
use beacon_transport::{
    select, Dispatch, EventRequest, HttpClient, HttpScriptLoader, ReqwestClient, ScriptHost,
    ScriptTransport, Transport, TransportKind,
};
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};

/// Executes commands against one host page.
pub struct Tracker {
    config: TrackerConfig,
    storage: Arc<dyn Storage>,
    page: Arc<dyn PageContext>,
    transport: Arc<dyn Transport>,
    account: Option<Account>,
    store: Option<PropertyStore>,
}

impl Tracker {
    /// Start building a tracker with the given configuration.
    pub fn builder(config: TrackerConfig) -> TrackerBuilder {
        TrackerBuilder::new(config)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The current account, if `setAccount` has run.
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    /// The property store of the current account.
    pub fn store(&self) -> Option<&PropertyStore> {
        self.store.as_ref()
    }

    /// The visitor identifier, when it is a string.
    pub fn uid(&self) -> Option<&str> {
        self.store.as_ref()?.get(UID_KEY)?.as_str()
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Run one command. Returns whether it took effect.
    ///
    /// Never fails: bad arguments, missing accounts and storage problems are
    /// logged and reported as `false`.
    pub fn execute(&mut self, command: Command) -> bool {
        trace!(command = command.name(), "executing");
        match command {
            Command::SetAccount(account) => self.set_account(account),
            Command::Identify(uid) => self.identify(&uid),
            Command::Set(props) => self.set(&props),
            Command::SetOnce(props) => self.set_once(&props),
            Command::Unset(key) => self.unset(&key),
            Command::TrackEvent { props, callback } => {
                !self.track_event(props, callback).is_dropped()
            }
            Command::Invalid { method, reason } => {
                debug!(%method, reason, "ignoring call with invalid arguments");
                false
            }
            Command::Unknown(method) => {
                debug!(%method, "ignoring unknown method");
                false
            }
        }
    }

    /// Bind the tracker to an account and load its visitor.
    ///
    /// A later call replaces the account in place. The visitor gets a fresh
    /// identifier only if the loaded properties have none.
    pub fn set_account(&mut self, account: Account) -> bool {
        let key = StoreKey::derive(&self.config.key_prefix, &account);
        debug!(input_id = %account.input_id, %key, "setting account");
        self.account = Some(account);

        let mut store = match PropertyStore::open(
            Arc::clone(&self.storage),
            key,
            self.config.save_options(),
        ) {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "could not load visitor properties");
                self.store = None;
                return false;
            }
        };

        if let Err(e) = store.set_once(&json!({ UID_KEY: generate_uid() })) {
            warn!(error = %e, "could not persist visitor identifier");
        }
        self.store = Some(store);
        true
    }

    /// Replace the visitor identifier.
    pub fn identify(&mut self, uid: &str) -> bool {
        self.with_store("identify", |store| store.set(&json!({ UID_KEY: uid })))
    }

    /// Overwrite persisted properties.
    pub fn set(&mut self, props: &Value) -> bool {
        self.with_store("set", |store| store.set(props))
    }

    /// Persist properties that are not yet present.
    pub fn set_once(&mut self, props: &Value) -> bool {
        self.with_store("setOnce", |store| store.set_once(props))
    }

    /// Remove a persisted property.
    pub fn unset(&mut self, key: &str) -> bool {
        self.with_store("unset", |store| store.unset(key))
    }

    /// Send one event.
    ///
    /// The envelope is built now from page metadata, persisted properties and
    /// `props`, in increasing precedence. Without an account the event is
    /// dropped.
    pub fn track_event(&self, props: PropertyMap, callback: Option<TrackCallback>) -> Dispatch {
        let Some(account) = &self.account else {
            debug!("dropping event tracked before setAccount");
            return Dispatch::Dropped;
        };

        let envelope = self.build_envelope(account, &props);
        match EventRequest::new(&self.config.endpoint, &account.input_id, envelope) {
            Ok(request) => self.transport.dispatch(request, callback),
            Err(e) => {
                warn!(error = %e, "dropping event with unusable endpoint");
                Dispatch::Dropped
            }
        }
    }

    /// The envelope an event with `props` would carry right now.
    pub fn envelope_for(&self, props: &PropertyMap) -> Option<Envelope> {
        self.account
            .as_ref()
            .map(|account| self.build_envelope(account, props))
    }

    fn build_envelope(&self, account: &Account, props: &PropertyMap) -> Envelope {
        let persisted = self
            .store
            .as_ref()
            .map(PropertyStore::properties)
            .unwrap_or_default();
        let event = compose_event([
            &library_info(),
            &page_info(self.page.as_ref()),
            &persisted,
            props,
        ]);
        Envelope::new(account.token.clone(), self.uid().map(str::to_owned), event)
    }

    fn with_store<F>(&mut self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut PropertyStore) -> beacon_store::Result<bool>,
    {
        let Some(store) = self.store.as_mut() else {
            debug!(op, "ignoring property change before setAccount");
            return false;
        };
        match f(store) {
            Ok(applied) => applied,
            Err(e) => {
                warn!(op, error = %e, "could not persist visitor properties");
                false
            }
        }
    }
}

/// Assembles a [`Tracker`] from its collaborators.
///
/// Every collaborator has a default: in-memory storage, an empty page, a
/// reqwest client with the configured timeout, an HTTP script loader and the
/// ambient tokio runtime.
pub struct TrackerBuilder {
    config: TrackerConfig,
    storage: Option<Arc<dyn Storage>>,
    page: Option<Arc<dyn PageContext>>,
    http: Option<Arc<dyn HttpClient>>,
    script_host: Option<Arc<dyn ScriptHost>>,
    runtime: Option<Handle>,
}

impl TrackerBuilder {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            storage: None,
            page: None,
            http: None,
            script_host: None,
            runtime: None,
        }
    }

    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn page(mut self, page: Arc<dyn PageContext>) -> Self {
        self.page = Some(page);
        self
    }

    pub fn http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn script_host(mut self, host: Arc<dyn ScriptHost>) -> Self {
        self.script_host = Some(host);
        self
    }

    /// Runtime that POST requests and script loads are spawned on.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Result<Tracker> {
        self.config.validate()?;

        let capabilities = self.config.capabilities;
        let runtime = self.runtime.or_else(|| Handle::try_current().ok());
        let transport: Arc<dyn Transport> = match runtime {
            Some(runtime) => {
                let http = match self.http {
                    Some(http) => http,
                    None => Arc::new(ReqwestClient::new(self.config.http_timeout())?),
                };
                let script_host = self.script_host.unwrap_or_else(|| {
                    Arc::new(HttpScriptLoader::new(Arc::clone(&http), runtime.clone()))
                });
                select(capabilities, http, script_host, runtime)
            }
            // A caller-provided script host needs no runtime.
            None if !capabilities.cors_credentials => match self.script_host {
                Some(host) => Arc::new(ScriptTransport::new(host)),
                None => return Err(TrackerError::NoRuntime),
            },
            None => return Err(TrackerError::NoRuntime),
        };

        debug!(transport = ?transport.kind(), endpoint = %self.config.endpoint, "tracker ready");
        Ok(Tracker {
            config: self.config,
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(MemoryStorage::new())),
            page: self.page.unwrap_or_else(|| Arc::new(StaticPage::default())),
            transport,
            account: None,
            store: None,
        })
    }
}
