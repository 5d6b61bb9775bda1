use thiserror::Error;

/// Error classes the orchestration layer distinguishes. Only `Unauthorized`
/// has a global side effect (the stored credential is cleared and navigation
/// falls back to the login route); everything else is local display state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Submission not found")]
    NotFound,
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport(message.into())
    }

    pub fn is_global(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
