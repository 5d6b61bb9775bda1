use crate::api::WorkflowApi;
use crate::error::ApiError;
use crate::nav::{CallbackQuery, Route};
use crate::report::ErrorReporter;
use crate::session::CredentialStore;
use anyhow::Context;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Requests an authorization URL for the full-page redirect. No local state
/// survives the redirect boundary except what the provider echoes back.
pub async fn begin_login(api: &dyn WorkflowApi) -> Result<String, ApiError> {
    let start = api.begin_login().await?;
    Ok(start.auth_url)
}

/// Completes the return trip of the OAuth handoff. Each authorization code
/// is exchanged at most once: a refreshed callback URL carrying an
/// already-consumed code aborts instead of re-submitting a stale code.
#[derive(Default)]
pub struct OauthHandoff {
    consumed: HashSet<String>,
}

impl OauthHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the consumed-code ledger, or an empty handoff when none exists
    /// yet. Persisting the ledger is what keeps a code single-use across
    /// separate invocations.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read code ledger")?;
        let consumed = serde_json::from_str(&data).context("parse code ledger")?;
        Ok(Self { consumed })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create code ledger directory")?;
        }
        let data =
            serde_json::to_string_pretty(&self.consumed).context("serialize code ledger")?;
        fs::write(path, data).context("write code ledger")?;
        Ok(())
    }

    pub async fn complete(
        &mut self,
        api: &dyn WorkflowApi,
        store: &dyn CredentialStore,
        query: &CallbackQuery,
        reporter: &dyn ErrorReporter,
    ) -> Route {
        if let Some(error) = &query.error {
            reporter.report("auth.callback", error);
            return Route::login_with_error(error.clone());
        }
        let Some(code) = &query.code else {
            return Route::login_with_error("No authorization code received");
        };
        if !self.consumed.insert(code.clone()) {
            return Route::login_with_error(
                "Authorization code already used; start a new login",
            );
        }
        match api.complete_login(code).await {
            Ok(session) => {
                store.set(&session.token);
                info!(user = %session.user.username, "login completed");
                Route::Groups
            }
            Err(err) => {
                reporter.report("auth.callback", &err.to_string());
                Route::login_with_error("Authentication failed")
            }
        }
    }
}
