use crate::nav::{NavState, Route};
use std::collections::BTreeSet;

const GROUP_ID_KEY: &str = "group_id";
const REPO_IDS_KEY: &str = "repo_ids";

/// The (group, repository-set) context produced by the two-step selection
/// hierarchy. Ids are a set; insertion order is not meaningful. The context
/// is read-only once a submission is initiated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionContext {
    group_id: u64,
    repository_ids: BTreeSet<u64>,
}

impl SelectionContext {
    pub fn new(group_id: u64) -> Self {
        Self {
            group_id,
            repository_ids: BTreeSet::new(),
        }
    }

    pub fn group_id(&self) -> u64 {
        self.group_id
    }

    pub fn contains(&self, id: u64) -> bool {
        self.repository_ids.contains(&id)
    }

    pub fn ids(&self) -> Vec<u64> {
        self.repository_ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.repository_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repository_ids.is_empty()
    }

    /// Non-empty selection is the precondition for "Continue" and submit.
    pub fn is_submittable(&self) -> bool {
        !self.repository_ids.is_empty()
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, id: u64) {
        if !self.repository_ids.insert(id) {
            self.repository_ids.remove(&id);
        }
    }

    /// Replace the selection with the full fetched set.
    pub fn select_all<I: IntoIterator<Item = u64>>(&mut self, ids: I) {
        self.repository_ids = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.repository_ids.clear();
    }

    /// Encodes the context into navigable state. `from_nav(to_nav(ctx))`
    /// reconstructs the context exactly.
    pub fn to_nav(&self) -> NavState {
        let mut state = NavState::new();
        state.insert(GROUP_ID_KEY, self.group_id.to_string());
        let ids: Vec<String> = self
            .repository_ids
            .iter()
            .map(|id| id.to_string())
            .collect();
        state.insert(REPO_IDS_KEY, ids.join(","));
        state
    }

    pub fn from_nav(state: &NavState) -> Option<Self> {
        let group_id = state.get(GROUP_ID_KEY)?.parse().ok()?;
        let mut context = Self::new(group_id);
        if let Some(raw) = state.get(REPO_IDS_KEY) {
            for part in raw.split(',') {
                if part.is_empty() {
                    continue;
                }
                context.repository_ids.insert(part.parse().ok()?);
            }
        }
        Some(context)
    }
}

/// Result of entering a step: proceed with the reconstructed context, or
/// redirect back without issuing any fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum StepEntry<T> {
    Proceed(T),
    Redirect(Route),
}

/// Step 2 entry: requires a `group_id` in navigable state.
pub fn enter_repository_step(state: &NavState) -> StepEntry<u64> {
    match state.get(GROUP_ID_KEY).and_then(|raw| raw.parse().ok()) {
        Some(group_id) => StepEntry::Proceed(group_id),
        None => StepEntry::Redirect(Route::Groups),
    }
}

/// Submission step entry: requires both a group and a non-empty selection.
pub fn enter_workflow_step(state: &NavState) -> StepEntry<SelectionContext> {
    match SelectionContext::from_nav(state) {
        Some(context) if context.is_submittable() => StepEntry::Proceed(context),
        _ => StepEntry::Redirect(Route::Groups),
    }
}

/// Status view entry: requires a submission identifier.
pub fn enter_status_step(submission_id: Option<&str>) -> StepEntry<String> {
    match submission_id {
        Some(id) if !id.is_empty() => StepEntry::Proceed(id.to_string()),
        _ => StepEntry::Redirect(Route::Groups),
    }
}
