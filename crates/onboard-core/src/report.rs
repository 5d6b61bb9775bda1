use std::sync::Mutex;
use tracing::error;

/// Sink for failures that must not interrupt the user-visible flow
/// (logout/login remote errors). Injected so tests can assert on what was
/// reported.
pub trait ErrorReporter {
    fn report(&self, context: &str, message: &str);
}

/// Default sink: structured tracing events.
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, message: &str) {
        error!(context, error = message, "background operation failed");
    }
}

/// Test double that records reported errors in order.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, context: &str, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push((context.to_string(), message.to_string()));
        }
    }
}
