use anyhow::Context;
use clap::Parser;
use onboard_api::{HttpWorkflowApi, KeyringStore, TokioDelay};
use onboard_core::api::WorkflowApi;
use onboard_core::config::{AppConfig, default_config_path};
use onboard_core::error::ApiError;
use onboard_core::guard::{self, GuardDecision};
use onboard_core::model::{SubmissionRecord, User};
use onboard_core::nav::{CallbackQuery, NavState, Route};
use onboard_core::oauth::{self, OauthHandoff};
use onboard_core::poll::{PollView, StatusPoller};
use onboard_core::report::TracingReporter;
use onboard_core::selection::{self, SelectionContext, StepEntry};
use onboard_core::session::{CredentialStore, SessionManager};
use onboard_core::workflow::{self, ValidationOutcome, WorkflowDraft};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod app;
mod args;

use args::*;

pub async fn run() -> anyhow::Result<()> {
    app::run().await
}
