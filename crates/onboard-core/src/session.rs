use crate::api::WorkflowApi;
use crate::model::User;
use crate::nav::Route;
use crate::report::ErrorReporter;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Single-slot holder of the bearer credential. Synchronous and infallible
/// from the caller's view; backend faults degrade to `None` / no-op.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// In-memory store, used by tests and anywhere durability is not needed.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or_default()
    }

    fn set(&self, token: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Loading,
    Resolved(Option<User>),
}

impl SessionState {
    pub fn identity(&self) -> Option<&User> {
        match self {
            SessionState::Resolved(user) => user.as_ref(),
            SessionState::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

/// Owns the session: derives identity from the credential store plus one
/// remote identity lookup, and tears everything down on logout.
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    state: SessionState,
    initialized: bool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            state: SessionState::Loading,
            initialized: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> Arc<dyn CredentialStore> {
        self.store.clone()
    }

    /// Resolves the session. Issues at most one identity lookup per
    /// initialization; repeat calls are no-ops. Any lookup failure clears
    /// the stored credential and resolves to no identity.
    pub async fn initialize(&mut self, api: &dyn WorkflowApi) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        if self.store.get().is_none() {
            self.state = SessionState::Resolved(None);
            return;
        }
        match api.current_user().await {
            Ok(user) => {
                info!(user = %user.username, "session resolved");
                self.state = SessionState::Resolved(Some(user));
            }
            Err(err) => {
                warn!(error = %err, "identity lookup failed; clearing credential");
                self.store.clear();
                self.state = SessionState::Resolved(None);
            }
        }
    }

    /// Attempts one remote logout, then tears the local session down
    /// regardless of the outcome. Never fails user-visibly.
    pub async fn logout(&mut self, api: &dyn WorkflowApi, reporter: &dyn ErrorReporter) -> Route {
        if let Err(err) = api.logout().await {
            reporter.report("auth.logout", &err.to_string());
        }
        self.store.clear();
        self.state = SessionState::Resolved(None);
        Route::login()
    }

    /// Global teardown for an `Unauthorized` response from any call.
    pub fn invalidate(&mut self) -> Route {
        self.store.clear();
        self.state = SessionState::Resolved(None);
        Route::login()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::block_on;
    use crate::error::ApiError;
    use crate::report::RecordingReporter;
    use crate::testing::{FakeApi, sample_user};

    #[test]
    fn memory_store_single_slot() {
        let store = MemoryStore::new();
        assert_eq!(store.get(), None);
        store.set("tok-1");
        store.set("tok-2");
        assert_eq!(store.get(), Some("tok-2".to_string()));
        store.clear();
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn initialize_without_credential_skips_lookup() {
        let api = FakeApi::default();
        let mut manager = SessionManager::new(Arc::new(MemoryStore::new()));
        assert!(manager.state().is_loading());
        block_on(manager.initialize(&api));
        assert_eq!(*manager.state(), SessionState::Resolved(None));
        assert_eq!(api.call_count("current_user"), 0);
    }

    #[test]
    fn initialize_resolves_identity_once() {
        let api = FakeApi::default();
        api.user.push(Ok(sample_user()));
        let mut manager = SessionManager::new(Arc::new(MemoryStore::with_token("tok")));
        block_on(manager.initialize(&api));
        assert_eq!(manager.state().identity().map(|u| u.username.as_str()), Some("jdoe"));
        // A second initialize must not re-issue the lookup.
        block_on(manager.initialize(&api));
        assert_eq!(api.call_count("current_user"), 1);
    }

    #[test]
    fn failed_lookup_clears_credential() {
        let api = FakeApi::default();
        api.user.push(Err(ApiError::Unauthorized));
        let store = Arc::new(MemoryStore::with_token("stale"));
        let mut manager = SessionManager::new(store.clone());
        block_on(manager.initialize(&api));
        assert_eq!(*manager.state(), SessionState::Resolved(None));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn logout_tears_down_even_on_remote_failure() {
        let api = FakeApi::default();
        api.logout.push(Err(ApiError::transport("connection refused")));
        let store = Arc::new(MemoryStore::with_token("tok"));
        let mut manager = SessionManager::new(store.clone());
        let reporter = RecordingReporter::default();
        let route = block_on(manager.logout(&api, &reporter));
        assert_eq!(route, Route::login());
        assert_eq!(store.get(), None);
        assert_eq!(*manager.state(), SessionState::Resolved(None));
        let events = reporter.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "auth.logout");
    }

    #[test]
    fn logout_success_reports_nothing() {
        let api = FakeApi::default();
        api.logout.push(Ok(()));
        let store = Arc::new(MemoryStore::with_token("tok"));
        let mut manager = SessionManager::new(store);
        let reporter = RecordingReporter::default();
        block_on(manager.logout(&api, &reporter));
        assert!(reporter.events().is_empty());
    }
}
