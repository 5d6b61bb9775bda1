use crate::api::WorkflowApi;
use crate::error::ApiError;
use crate::model::SubmissionRecord;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

pub type DelayFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Scheduled-delay abstraction between polls. The production implementation
/// sleeps on the tokio timer; tests substitute an immediate delay.
pub trait Delay {
    fn wait(&self, duration: Duration) -> DelayFuture<'_>;
}

/// Delay that completes immediately.
pub struct NoDelay;

impl Delay for NoDelay {
    fn wait(&self, _duration: Duration) -> DelayFuture<'_> {
        Box::pin(async {})
    }
}

/// Cancellation handle returned alongside a running poller. Cancelling makes
/// any pending or in-flight fetch's result a no-op; the network operation
/// itself is not interrupted.
#[derive(Clone, Debug, Default)]
pub struct PollHandle {
    cancelled: Arc<AtomicBool>,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Upper bound on fetches; `None` polls until a terminal status.
    pub max_polls: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: None,
        }
    }
}

/// Final display state of the status view.
#[derive(Clone, Debug, PartialEq)]
pub enum PollView {
    /// Terminal status reached; the record as last fetched.
    Finished(SubmissionRecord),
    /// The service does not know the submission id. Distinct from a
    /// transport error; no further polling.
    NotFound,
    /// Session invalidated mid-poll.
    Unauthorized,
    /// Transport failure, displayed inline.
    Failed(String),
    /// Still processing when the configured poll bound was reached.
    TimedOut(SubmissionRecord),
    Cancelled,
}

/// Drives `Processing -> {Completed, Failed, PartialSuccess}` by re-fetching
/// the submission record. Fetches are strictly sequential: the follow-up is
/// scheduled only after the prior fetch resolves.
pub struct StatusPoller {
    settings: PollSettings,
    handle: PollHandle,
}

impl StatusPoller {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            handle: PollHandle::default(),
        }
    }

    pub fn handle(&self) -> PollHandle {
        self.handle.clone()
    }

    /// Polls until a terminal state, invoking `on_update` with each fetched
    /// record. Every poll replaces the caller's copy wholesale.
    pub async fn run<F>(
        &self,
        api: &dyn WorkflowApi,
        delay: &dyn Delay,
        submission_id: &str,
        mut on_update: F,
    ) -> PollView
    where
        F: FnMut(&SubmissionRecord),
    {
        let mut fetches = 0u32;
        loop {
            if self.handle.is_cancelled() {
                return PollView::Cancelled;
            }
            let record = match api.submission_status(submission_id).await {
                Ok(record) => record,
                Err(ApiError::NotFound) => {
                    warn!(submission = submission_id, "submission not found");
                    return PollView::NotFound;
                }
                Err(ApiError::Unauthorized) => return PollView::Unauthorized,
                Err(err) => return PollView::Failed(err.to_string()),
            };
            if self.handle.is_cancelled() {
                // Result arrived after the view was left; discard it.
                return PollView::Cancelled;
            }
            fetches += 1;
            on_update(&record);
            if record.status.is_terminal() {
                info!(
                    submission = submission_id,
                    status = %record.status,
                    fetches,
                    "polling finished"
                );
                return PollView::Finished(record);
            }
            if let Some(max) = self.settings.max_polls {
                if fetches >= max {
                    warn!(submission = submission_id, fetches, "poll bound reached");
                    return PollView::TimedOut(record);
                }
            }
            debug!(submission = submission_id, fetches, "still processing");
            delay.wait(self.settings.interval).await;
        }
    }
}
