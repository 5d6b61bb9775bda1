use crate::api::WorkflowApi;
use crate::error::ApiError;
use crate::model::ValidationResult;
use crate::selection::SelectionContext;
use tracing::info;

/// Canonical example pipeline offered as the starting point for editing.
pub const EXAMPLE_WORKFLOW: &str = r#"# GitLab CI/CD Pipeline
stages:
  - test
  - build
  - deploy

variables:
  NODE_VERSION: "18"

# Test Stage
test_job:
  stage: test
  image: node:${NODE_VERSION}
  script:
    - npm install
    - npm run test
    - npm run lint
  artifacts:
    reports:
      junit: test-results.xml
  only:
    - merge_requests
    - main

# Build Stage
build_job:
  stage: build
  image: node:${NODE_VERSION}
  script:
    - npm install
    - npm run build
  artifacts:
    paths:
      - dist/
    expire_in: 1 hour
  only:
    - main

# Deploy Stage
deploy_job:
  stage: deploy
  image: alpine:latest
  script:
    - echo "Deploying application..."
    - echo "Deployment completed successfully!"
  dependencies:
    - build_job
  only:
    - main
  when: manual
"#;

/// User-authored pipeline text. Never persisted beyond the editing session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowDraft {
    content: String,
}

impl Default for WorkflowDraft {
    fn default() -> Self {
        Self {
            content: EXAMPLE_WORKFLOW.to_string(),
        }
    }
}

impl WorkflowDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn reset_to_example(&mut self) {
        self.content = EXAMPLE_WORKFLOW.to_string();
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Result of a validate request. `Skipped` means blank content
/// short-circuited without any network call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Skipped,
    Checked(ValidationResult),
}

/// Validates pipeline text against the remote validator. Transport failures
/// fold into the result data; validation failure is never a thrown fault.
/// Only `Unauthorized` propagates, because it invalidates the whole session.
pub async fn validate(
    api: &dyn WorkflowApi,
    content: &str,
) -> Result<ValidationOutcome, ApiError> {
    if content.trim().is_empty() {
        return Ok(ValidationOutcome::Skipped);
    }
    match api.validate_workflow(content).await {
        Ok(result) => Ok(ValidationOutcome::Checked(result)),
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
        Err(err) => Ok(ValidationOutcome::Checked(ValidationResult {
            valid: false,
            errors: vec![err.to_string()],
        })),
    }
}

/// Dispatches one bulk submission for the full selected repository set and
/// yields the submission identifier. Failures surface to the caller; no
/// local record of the attempt is kept, so a retry is a brand-new call.
pub async fn submit(
    api: &dyn WorkflowApi,
    selection: &SelectionContext,
    content: &str,
) -> Result<String, ApiError> {
    if !selection.is_submittable() {
        return Err(ApiError::transport("no repositories selected"));
    }
    let ids = selection.ids();
    let receipt = api
        .submit_workflow(selection.group_id(), &ids, content)
        .await?;
    info!(
        submission = %receipt.submission_id,
        repositories = receipt.repository_count,
        "workflow submitted"
    );
    Ok(receipt.submission_id)
}

/// Editing state for the submission step. The generation counter makes
/// results that arrive after the user left the step a no-op: leaving bumps
/// the generation, and stale results are refused on application.
pub struct WorkflowStep {
    selection: SelectionContext,
    draft: WorkflowDraft,
    validation: Option<ValidationResult>,
    generation: u64,
}

impl WorkflowStep {
    pub fn new(selection: SelectionContext) -> Self {
        Self {
            selection,
            draft: WorkflowDraft::default(),
            validation: None,
            generation: 0,
        }
    }

    pub fn selection(&self) -> &SelectionContext {
        &self.selection
    }

    pub fn draft(&self) -> &WorkflowDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut WorkflowDraft {
        &mut self.draft
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidates any in-flight request issued for the current generation.
    pub fn leave(&mut self) {
        self.generation += 1;
    }

    /// Applies a validation outcome if it belongs to the current generation.
    /// Returns whether it was applied. Each applied result replaces the
    /// prior one wholesale.
    pub fn apply_validation(&mut self, generation: u64, outcome: ValidationOutcome) -> bool {
        if generation != self.generation {
            return false;
        }
        if let ValidationOutcome::Checked(result) = outcome {
            self.validation = Some(result);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::block_on;
    use crate::testing::FakeApi;

    #[test]
    fn blank_content_skips_network() {
        let api = FakeApi::default();
        let outcome = block_on(validate(&api, "")).unwrap();
        assert_eq!(outcome, ValidationOutcome::Skipped);
        let outcome = block_on(validate(&api, "  \n\t")).unwrap();
        assert_eq!(outcome, ValidationOutcome::Skipped);
        assert_eq!(api.call_count("validate_workflow"), 0);
    }

    #[test]
    fn validator_errors_pass_through_verbatim() {
        let api = FakeApi::default();
        api.validation.push(Ok(ValidationResult {
            valid: false,
            errors: vec!["stage 'deploy' missing script".to_string()],
        }));
        let outcome = block_on(validate(&api, "stages: [deploy]")).unwrap();
        match outcome {
            ValidationOutcome::Checked(result) => {
                assert!(!result.valid);
                assert_eq!(result.errors, vec!["stage 'deploy' missing script"]);
            }
            other => panic!("expected checked outcome, got {other:?}"),
        }
    }

    #[test]
    fn transport_failure_becomes_data() {
        let api = FakeApi::default();
        api.validation.push(Err(ApiError::transport("HTTP 503 Service Unavailable")));
        let outcome = block_on(validate(&api, "stages: []")).unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::Checked(ValidationResult {
                valid: false,
                errors: vec!["HTTP 503 Service Unavailable".to_string()],
            })
        );
    }

    #[test]
    fn unauthorized_propagates_from_validate() {
        let api = FakeApi::default();
        api.validation.push(Err(ApiError::Unauthorized));
        let result = block_on(validate(&api, "stages: []"));
        assert_eq!(result, Err(ApiError::Unauthorized));
    }

    #[test]
    fn submit_requires_non_empty_selection() {
        let api = FakeApi::default();
        let selection = SelectionContext::new(1);
        let result = block_on(submit(&api, &selection, "stages: []"));
        assert!(result.is_err());
        assert_eq!(api.call_count("submit_workflow"), 0);
    }

    #[test]
    fn submit_yields_submission_id() {
        let api = FakeApi::default();
        api.submissions.push(Ok(crate::model::SubmitReceipt {
            submission_id: "sub-1".to_string(),
            status: "processing".to_string(),
            repository_count: 2,
        }));
        let mut selection = SelectionContext::new(1);
        selection.select_all([10, 11]);
        let id = block_on(submit(&api, &selection, "stages: []")).unwrap();
        assert_eq!(id, "sub-1");
    }

    #[test]
    fn draft_defaults_to_example() {
        let draft = WorkflowDraft::default();
        assert!(!draft.is_blank());
        assert!(draft.content().contains("deploy_job"));
        let mut draft = WorkflowDraft::new("custom");
        draft.reset_to_example();
        assert_eq!(draft.content(), EXAMPLE_WORKFLOW);
    }

    #[test]
    fn stale_results_are_discarded_after_leave() {
        let mut selection = SelectionContext::new(1);
        selection.select_all([10]);
        let mut step = WorkflowStep::new(selection);
        let issued_at = step.generation();
        step.leave();
        let applied = step.apply_validation(
            issued_at,
            ValidationOutcome::Checked(ValidationResult {
                valid: true,
                errors: vec![],
            }),
        );
        assert!(!applied);
        assert_eq!(step.validation(), None);
    }

    #[test]
    fn current_generation_results_apply_and_replace() {
        let mut selection = SelectionContext::new(1);
        selection.select_all([10]);
        let mut step = WorkflowStep::new(selection);
        let generation = step.generation();
        assert!(step.apply_validation(
            generation,
            ValidationOutcome::Checked(ValidationResult {
                valid: false,
                errors: vec!["first".to_string()],
            }),
        ));
        assert!(step.apply_validation(
            generation,
            ValidationOutcome::Checked(ValidationResult {
                valid: true,
                errors: vec![],
            }),
        ));
        assert_eq!(step.validation().map(|r| r.valid), Some(true));
    }
}
