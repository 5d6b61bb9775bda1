use std::collections::BTreeMap;
use std::fmt;

/// Navigable destinations. Everything except `Login` sits behind the
/// navigation guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login { error: Option<String> },
    Groups,
    Repositories(NavState),
    Workflow(NavState),
    Status { submission_id: String },
}

impl Route {
    pub fn login() -> Self {
        Route::Login { error: None }
    }

    pub fn login_with_error(message: impl Into<String>) -> Self {
        Route::Login {
            error: Some(message.into()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login { .. } => f.write_str("login"),
            Route::Groups => f.write_str("groups"),
            Route::Repositories(_) => f.write_str("repositories"),
            Route::Workflow(_) => f.write_str("workflow"),
            Route::Status { .. } => f.write_str("status"),
        }
    }
}

/// Serialized key-value state carried between steps, so that returning to a
/// prior step reconstructs it exactly. Keys are ordered; `decode(encode(s))`
/// is lossless for the key-value contract used here (ids and comma-joined
/// id lists, no escaping).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    entries: BTreeMap<String, String>,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn encode(&self) -> String {
        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        pairs.join("&")
    }

    pub fn decode(raw: &str) -> Self {
        let mut state = Self::new();
        for pair in raw.split('&') {
            if pair.is_empty() {
                continue;
            }
            match pair.split_once('=') {
                Some((key, value)) => state.insert(key, value),
                None => state.insert(pair, ""),
            }
        }
        state
    }
}

/// The two query signals the OAuth provider may echo back to the callback
/// route. Values are taken verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl CallbackQuery {
    pub fn parse(raw_query: &str) -> Self {
        let state = NavState::decode(raw_query);
        Self {
            code: state.get("code").map(str::to_string),
            error: state.get("error").map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_state_round_trips() {
        let mut state = NavState::new();
        state.insert("group_id", "1");
        state.insert("repo_ids", "10,11");
        let encoded = state.encode();
        assert_eq!(encoded, "group_id=1&repo_ids=10,11");
        assert_eq!(NavState::decode(&encoded), state);
    }

    #[test]
    fn decode_tolerates_empty_and_bare_keys() {
        let state = NavState::decode("");
        assert!(state.is_empty());
        let state = NavState::decode("flag&group_id=1");
        assert_eq!(state.get("flag"), Some(""));
        assert_eq!(state.get("group_id"), Some("1"));
    }

    #[test]
    fn callback_query_picks_code_and_error() {
        let query = CallbackQuery::parse("code=abc&state=xyz");
        assert_eq!(query.code.as_deref(), Some("abc"));
        assert_eq!(query.error, None);

        let query = CallbackQuery::parse("error=access_denied");
        assert_eq!(query.code, None);
        assert_eq!(query.error.as_deref(), Some("access_denied"));
    }

    #[test]
    fn login_route_helpers() {
        assert_eq!(Route::login(), Route::Login { error: None });
        assert_eq!(
            Route::login_with_error("Authentication failed"),
            Route::Login {
                error: Some("Authentication failed".to_string())
            }
        );
    }
}
