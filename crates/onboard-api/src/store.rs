use keyring::Entry;
use onboard_core::session::CredentialStore;
use tracing::warn;

const SERVICE: &str = "ci-workflow-onboard";
const ACCOUNT: &str = "session";

/// Keyring-backed single-slot credential store. Durable across restarts and
/// scoped to the OS user. Backend faults degrade to `None` / no-op so the
/// session layer never sees a storage error.
pub struct KeyringStore {
    service: String,
    account: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE.to_string(),
            account: ACCOUNT.to_string(),
        }
    }

    fn entry(&self) -> Option<Entry> {
        match Entry::new(&self.service, &self.account) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "open keyring entry failed");
                None
            }
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self) -> Option<String> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(err) => {
                warn!(error = %err, "read credential failed");
                None
            }
        }
    }

    fn set(&self, token: &str) {
        let Some(entry) = self.entry() else {
            return;
        };
        if let Err(err) = entry.set_password(token) {
            warn!(error = %err, "write credential failed");
        }
    }

    fn clear(&self) {
        let Some(entry) = self.entry() else {
            return;
        };
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(err) => warn!(error = %err, "clear credential failed"),
        }
    }
}
