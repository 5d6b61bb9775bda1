use crate::nav::Route;
use crate::session::SessionState;

/// Outcome of evaluating the guard for a protected area.
#[derive(Clone, Debug, PartialEq)]
pub enum GuardDecision {
    /// Identity lookup still outstanding; suspend rendering.
    Wait,
    Redirect(Route),
    Admit,
}

/// Pure function of session state, re-evaluated on every state change.
/// Decisions are never cached.
pub fn evaluate(state: &SessionState) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Wait,
        SessionState::Resolved(None) => GuardDecision::Redirect(Route::login()),
        SessionState::Resolved(Some(_)) => GuardDecision::Admit,
    }
}
