use onboard_core::api::{ApiFuture, WorkflowApi};
use onboard_core::error::ApiError;
use onboard_core::model::{
    Group, LoginSession, LoginStart, Repository, SubmissionRecord, SubmitReceipt, User,
    ValidationResult,
};
use onboard_core::session::CredentialStore;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Every successful response body arrives wrapped as `{"data": <payload>}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Whether a 404 from the endpoint means "the resource does not exist" (the
/// submission-status lookup) rather than a plain transport failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NotFoundMeaning {
    Transport,
    MissingResource,
}

fn classify_status(status: StatusCode, not_found: NotFoundMeaning) -> Option<ApiError> {
    if status == StatusCode::UNAUTHORIZED {
        return Some(ApiError::Unauthorized);
    }
    if status == StatusCode::NOT_FOUND && not_found == NotFoundMeaning::MissingResource {
        return Some(ApiError::NotFound);
    }
    if !status.is_success() {
        return Some(ApiError::transport(format!("HTTP {status}")));
    }
    None
}

/// HTTP implementation of the onboarding-service surface. Attaches the
/// stored credential as a bearer token; any 401 clears the store before the
/// error propagates, so the session is invalidated no matter which
/// operation was in flight.
pub struct HttpWorkflowApi {
    client: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
}

impl HttpWorkflowApi {
    pub fn new(base_url: &str, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        path: &str,
        not_found: NotFoundMeaning,
    ) -> Result<Response, ApiError> {
        debug!(path, "api request");
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::transport(err.to_string()))?;
        let status = response.status();
        if let Some(err) = classify_status(status, not_found) {
            if err == ApiError::Unauthorized {
                warn!(path, "unauthorized response; clearing stored credential");
                self.store.clear();
            }
            let _ = response.bytes().await;
            return Err(err);
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|err| ApiError::transport(format!("decode response: {err}")))?;
        Ok(envelope.data)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        not_found: NotFoundMeaning,
    ) -> Result<T, ApiError> {
        let request = self.authed(self.client.get(self.url(path)));
        let response = self.execute(request, path, not_found).await?;
        self.decode(response).await
    }

    async fn post_data<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        let request = self.authed(self.client.post(self.url(path)).json(&body));
        let response = self
            .execute(request, path, NotFoundMeaning::Transport)
            .await?;
        self.decode(response).await
    }
}

impl WorkflowApi for HttpWorkflowApi {
    fn begin_login(&self) -> ApiFuture<'_, LoginStart> {
        Box::pin(async move {
            self.get_data("/auth/login", NotFoundMeaning::Transport)
                .await
        })
    }

    fn complete_login<'a>(&'a self, code: &'a str) -> ApiFuture<'a, LoginSession> {
        Box::pin(async move {
            let path = format!("/auth/callback?code={code}");
            self.get_data(&path, NotFoundMeaning::Transport).await
        })
    }

    fn logout(&self) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.authed(self.client.post(self.url("/auth/logout")));
            let response = self
                .execute(request, "/auth/logout", NotFoundMeaning::Transport)
                .await?;
            let _ = response.bytes().await;
            Ok(())
        })
    }

    fn current_user(&self) -> ApiFuture<'_, User> {
        Box::pin(async move { self.get_data("/user", NotFoundMeaning::Transport).await })
    }

    fn list_groups(&self) -> ApiFuture<'_, Vec<Group>> {
        Box::pin(async move { self.get_data("/groups", NotFoundMeaning::Transport).await })
    }

    fn list_repositories(&self, group_id: u64) -> ApiFuture<'_, Vec<Repository>> {
        Box::pin(async move {
            let path = format!("/repositories?group_id={group_id}");
            self.get_data(&path, NotFoundMeaning::Transport).await
        })
    }

    fn validate_workflow<'a>(&'a self, content: &'a str) -> ApiFuture<'a, ValidationResult> {
        Box::pin(async move {
            self.post_data(
                "/workflow/validate",
                json!({ "workflow_content": content }),
            )
            .await
        })
    }

    fn submit_workflow<'a>(
        &'a self,
        group_id: u64,
        repository_ids: &'a [u64],
        content: &'a str,
    ) -> ApiFuture<'a, SubmitReceipt> {
        Box::pin(async move {
            self.post_data(
                "/workflow/submit",
                json!({
                    "group_id": group_id,
                    "repository_ids": repository_ids,
                    "workflow_content": content,
                }),
            )
            .await
        })
    }

    fn submission_status<'a>(&'a self, submission_id: &'a str) -> ApiFuture<'a, SubmissionRecord> {
        Box::pin(async move {
            let path = format!("/workflow/status/{submission_id}");
            self.get_data(&path, NotFoundMeaning::MissingResource).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::session::MemoryStore;

    #[test]
    fn envelope_unwraps_payload() {
        let raw = r#"{"data":{"auth_url":"https://git.example.com/oauth"}}"#;
        let envelope: Envelope<LoginStart> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data.auth_url, "https://git.example.com/oauth");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpWorkflowApi::new(
            "http://localhost:3000/api/",
            Arc::new(MemoryStore::new()),
        );
        assert_eq!(
            api.url("/workflow/status/sub-1"),
            "http://localhost:3000/api/workflow/status/sub-1"
        );
    }

    #[test]
    fn unauthorized_wins_over_everything() {
        let err = classify_status(StatusCode::UNAUTHORIZED, NotFoundMeaning::MissingResource);
        assert_eq!(err, Some(ApiError::Unauthorized));
    }

    #[test]
    fn not_found_mapping_depends_on_endpoint() {
        let err = classify_status(StatusCode::NOT_FOUND, NotFoundMeaning::MissingResource);
        assert_eq!(err, Some(ApiError::NotFound));
        let err = classify_status(StatusCode::NOT_FOUND, NotFoundMeaning::Transport);
        assert_eq!(err, Some(ApiError::transport("HTTP 404 Not Found")));
    }

    #[test]
    fn success_statuses_pass_through() {
        assert_eq!(classify_status(StatusCode::OK, NotFoundMeaning::Transport), None);
        assert_eq!(
            classify_status(StatusCode::CREATED, NotFoundMeaning::Transport),
            None
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, NotFoundMeaning::Transport),
            Some(ApiError::transport("HTTP 500 Internal Server Error"))
        );
    }
}
