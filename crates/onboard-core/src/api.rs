use crate::error::ApiError;
use crate::model::{
    Group, LoginSession, LoginStart, Repository, SubmissionRecord, SubmitReceipt, User,
    ValidationResult,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + 'a>>;

/// Remote onboarding-service surface. Implemented over HTTP in
/// `onboard-api`; faked with scripted responses in tests.
pub trait WorkflowApi {
    fn begin_login(&self) -> ApiFuture<'_, LoginStart>;
    fn complete_login<'a>(&'a self, code: &'a str) -> ApiFuture<'a, LoginSession>;
    fn logout(&self) -> ApiFuture<'_, ()>;
    fn current_user(&self) -> ApiFuture<'_, User>;
    fn list_groups(&self) -> ApiFuture<'_, Vec<Group>>;
    fn list_repositories(&self, group_id: u64) -> ApiFuture<'_, Vec<Repository>>;
    fn validate_workflow<'a>(&'a self, content: &'a str) -> ApiFuture<'a, ValidationResult>;
    fn submit_workflow<'a>(
        &'a self,
        group_id: u64,
        repository_ids: &'a [u64],
        content: &'a str,
    ) -> ApiFuture<'a, SubmitReceipt>;
    fn submission_status<'a>(&'a self, submission_id: &'a str) -> ApiFuture<'a, SubmissionRecord>;
}

fn noop_raw_waker() -> RawWaker {
    unsafe fn clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }
    unsafe fn wake(_: *const ()) {}
    unsafe fn wake_by_ref(_: *const ()) {}
    unsafe fn drop(_: *const ()) {}
    RawWaker::new(
        std::ptr::null(),
        &RawWakerVTable::new(clone, wake, wake_by_ref, drop),
    )
}

/// Minimal executor for driving boxed API futures to completion without a
/// runtime. The futures produced by scripted fakes resolve without I/O, so a
/// noop waker is enough; production code drives futures on a tokio runtime.
pub fn block_on<F: Future>(future: F) -> F::Output {
    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut future = std::pin::pin!(future);
    let mut cx = Context::from_waker(&waker);
    loop {
        match Future::poll(future.as_mut(), &mut cx) {
            Poll::Ready(value) => return value,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}
