//! Scripted fakes shared by the unit and scenario tests.

use crate::api::{ApiFuture, WorkflowApi};
use crate::error::ApiError;
use crate::model::{
    Group, LoginSession, LoginStart, Repository, SubmissionRecord, SubmissionStatus,
    SubmitReceipt, User, ValidationResult,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// FIFO of scripted responses for one endpoint. An unscripted call yields a
/// transport error so tests fail loudly instead of hanging.
pub(crate) struct Script<T> {
    queue: Mutex<VecDeque<Result<T, ApiError>>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T> Script<T> {
    pub(crate) fn push(&self, response: Result<T, ApiError>) {
        self.queue.lock().unwrap().push_back(response);
    }

    fn next(&self) -> Result<T, ApiError> {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("unscripted call")))
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    pub(crate) login: Script<LoginStart>,
    pub(crate) callback: Script<LoginSession>,
    pub(crate) logout: Script<()>,
    pub(crate) user: Script<User>,
    pub(crate) groups: Script<Vec<Group>>,
    pub(crate) repositories: Script<Vec<Repository>>,
    pub(crate) validation: Script<ValidationResult>,
    pub(crate) submissions: Script<SubmitReceipt>,
    pub(crate) statuses: Script<SubmissionRecord>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    pub(crate) fn call_count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == name)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl WorkflowApi for FakeApi {
    fn begin_login(&self) -> ApiFuture<'_, LoginStart> {
        Box::pin(async move {
            self.record("begin_login");
            self.login.next()
        })
    }

    fn complete_login<'a>(&'a self, _code: &'a str) -> ApiFuture<'a, LoginSession> {
        Box::pin(async move {
            self.record("complete_login");
            self.callback.next()
        })
    }

    fn logout(&self) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.record("logout");
            self.logout.next()
        })
    }

    fn current_user(&self) -> ApiFuture<'_, User> {
        Box::pin(async move {
            self.record("current_user");
            self.user.next()
        })
    }

    fn list_groups(&self) -> ApiFuture<'_, Vec<Group>> {
        Box::pin(async move {
            self.record("list_groups");
            self.groups.next()
        })
    }

    fn list_repositories(&self, _group_id: u64) -> ApiFuture<'_, Vec<Repository>> {
        Box::pin(async move {
            self.record("list_repositories");
            self.repositories.next()
        })
    }

    fn validate_workflow<'a>(&'a self, _content: &'a str) -> ApiFuture<'a, ValidationResult> {
        Box::pin(async move {
            self.record("validate_workflow");
            self.validation.next()
        })
    }

    fn submit_workflow<'a>(
        &'a self,
        _group_id: u64,
        _repository_ids: &'a [u64],
        _content: &'a str,
    ) -> ApiFuture<'a, SubmitReceipt> {
        Box::pin(async move {
            self.record("submit_workflow");
            self.submissions.next()
        })
    }

    fn submission_status<'a>(&'a self, _submission_id: &'a str) -> ApiFuture<'a, SubmissionRecord> {
        Box::pin(async move {
            self.record("submission_status");
            self.statuses.next()
        })
    }
}

pub(crate) fn sample_user() -> User {
    User {
        id: "u-1".to_string(),
        name: "Jane Doe".to_string(),
        username: "jdoe".to_string(),
        email: "jdoe@example.com".to_string(),
        avatar_url: None,
    }
}

pub(crate) fn sample_session(token: &str) -> LoginSession {
    LoginSession {
        token: token.to_string(),
        user: sample_user(),
    }
}

pub(crate) fn sample_group(id: u64, name: &str) -> Group {
    Group {
        id,
        name: name.to_string(),
        path: name.to_lowercase(),
        description: String::new(),
        avatar_url: None,
    }
}

pub(crate) fn sample_repository(id: u64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        description: String::new(),
        default_branch: "main".to_string(),
        has_gitlab_ci: false,
    }
}

pub(crate) fn sample_record(id: &str, status: SubmissionStatus) -> SubmissionRecord {
    SubmissionRecord {
        submission_id: id.to_string(),
        status,
        repository_count: 1,
        created_at: "2026-08-29T10:00:00Z".to_string(),
        completed_at: status
            .is_terminal()
            .then(|| "2026-08-29T10:00:04Z".to_string()),
        error_message: None,
    }
}
