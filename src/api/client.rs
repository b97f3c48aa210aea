//! REST client for the survey service.
//!
//! One method per consumed endpoint. Responses are deserialized into the
//! shared models; failures are classified into the error taxonomy the
//! access gate and dashboards depend on.

use crate::models::{
    AdminStatistics, FacultyList, GroupList, GroupStatistics, QuestionList, SubmitRequest,
    UserResponse,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failure classification for API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unauthenticated or expired session (HTTP 401). The only error
    /// that may trigger a login redirect.
    #[error("not authenticated (session missing or expired)")]
    AuthenticationMissing,

    /// Non-success status other than 401.
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Network-level failure (connect, timeout, transport).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected contract.
    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP client bound to one service base URL.
///
/// Carries a cookie store so the session cookie set by the login flow
/// accompanies every request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str, timeout_seconds: u64) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The browser-facing login URL for a given post-login path.
    pub fn login_url(&self, redirect_path: &str) -> String {
        format!("{}/auth/login?redirect={}", self.base_url, redirect_path)
    }

    // --- Auth ---

    /// Fetch the authenticated user. 401 maps to `AuthenticationMissing`.
    pub async fn current_user(&self) -> ApiResult<UserResponse> {
        self.get_json("/auth/user").await
    }

    // --- Survey (anonymous) ---

    pub async fn survey_questions(&self) -> ApiResult<QuestionList> {
        self.get_json("/surveys/questions").await
    }

    pub async fn survey_groups(&self) -> ApiResult<GroupList> {
        self.get_json("/surveys/groups").await
    }

    pub async fn submit_group(&self, request: &SubmitRequest) -> ApiResult<()> {
        self.post_json_unit("/surveys/submit-group", request).await
    }

    // --- Curator ---

    pub async fn curator_groups(&self) -> ApiResult<GroupList> {
        self.get_json("/curator/groups").await
    }

    pub async fn group_statistics(&self, group_id: i64) -> ApiResult<GroupStatistics> {
        self.get_json(&format!("/curator/groups/{}/statistics", group_id))
            .await
    }

    /// Rendered report for a group: a raw HTML blob, saved as-is, never parsed.
    pub async fn group_report_html(&self, group_id: i64) -> ApiResult<String> {
        let url = format!("{}/reports/group/{}/report", self.base_url, group_id);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    // --- Admin ---

    pub async fn admin_statistics(&self) -> ApiResult<AdminStatistics> {
        self.get_json("/admin/statistics/all").await
    }

    pub async fn admin_faculties(&self) -> ApiResult<FacultyList> {
        self.get_json("/admin/faculties").await
    }

    pub async fn admin_groups(&self) -> ApiResult<GroupList> {
        self.get_json("/admin/groups").await
    }

    pub async fn create_faculty(&self, body: &impl Serialize) -> ApiResult<()> {
        self.post_json_unit("/admin/faculties", body).await
    }

    pub async fn update_faculty(&self, id: i64, body: &impl Serialize) -> ApiResult<()> {
        self.put_json_unit(&format!("/admin/faculties/{}", id), body)
            .await
    }

    pub async fn delete_faculty(&self, id: i64) -> ApiResult<()> {
        self.delete_unit(&format!("/admin/faculties/{}", id)).await
    }

    pub async fn create_group(&self, body: &impl Serialize) -> ApiResult<()> {
        self.post_json_unit("/admin/groups", body).await
    }

    pub async fn update_group(&self, id: i64, body: &impl Serialize) -> ApiResult<()> {
        self.put_json_unit(&format!("/admin/groups/{}", id), body)
            .await
    }

    pub async fn delete_group(&self, id: i64) -> ApiResult<()> {
        self.delete_unit(&format!("/admin/groups/{}", id)).await
    }

    // --- Plumbing ---

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let response = Self::check_status(response).await?;

        response.json::<T>().await.map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn post_json_unit(&self, endpoint: &str, body: &impl Serialize) -> ApiResult<()> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self.http.post(&url).json(body).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn put_json_unit(&self, endpoint: &str, body: &impl Serialize) -> ApiResult<()> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("PUT {}", url);

        let response = self.http.put(&url).json(body).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete_unit(&self, endpoint: &str) -> ApiResult<()> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("DELETE {}", url);

        let response = self.http.delete(&url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthenticationMissing);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/", 30).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_login_url() {
        let client = ApiClient::new("http://localhost:8000/api", 30).unwrap();
        assert_eq!(
            client.login_url("/curator"),
            "http://localhost:8000/api/auth/login?redirect=/curator"
        );
    }

    #[test]
    fn test_authentication_missing_display() {
        let err = ApiError::AuthenticationMissing;
        assert!(err.to_string().contains("not authenticated"));
    }
}
