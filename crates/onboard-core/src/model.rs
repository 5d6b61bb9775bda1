use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub default_branch: String,
    #[serde(default)]
    pub has_gitlab_ci: bool,
}

/// `Processing` is the only non-terminal status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Processing,
    Completed,
    Failed,
    PartialSuccess,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SubmissionStatus::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Processing => "processing",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::Failed => "failed",
            SubmissionStatus::PartialSuccess => "partial_success",
        }
    }

    /// Human-readable headline for the status view.
    pub fn title(self) -> &'static str {
        match self {
            SubmissionStatus::Processing => "Processing Workflow...",
            SubmissionStatus::Completed => "Workflow Submitted Successfully!",
            SubmissionStatus::Failed => "Workflow Submission Failed",
            SubmissionStatus::PartialSuccess => "Partial Success",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bulk submission as reported by the remote service. The client never
/// mutates this locally; every poll replaces its copy wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: String,
    pub status: SubmissionStatus,
    pub repository_count: u32,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub submission_id: String,
    pub status: String,
    pub repository_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginStart {
    pub auth_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginSession {
    pub token: String,
    pub user: User,
}
