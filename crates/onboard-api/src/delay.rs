use onboard_core::poll::{Delay, DelayFuture};
use std::time::Duration;

/// Poll delay backed by the tokio timer.
pub struct TokioDelay;

impl Delay for TokioDelay {
    fn wait(&self, duration: Duration) -> DelayFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}
