//! REST backend implementation (JSON over HTTP).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::{AnalyticsStats, Backend, BackendError, BackendTask, CreateCategoryArgs, CreateTaskArgs, UpdateTaskArgs};
use crate::entities::{normalize_tag_name, Category, Notification, Preferences, Tag, TaskTag, User};

/// Backend talking to the task service's HTTP API.
pub struct RestBackend {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct PreferencesEnvelope {
    #[serde(default)]
    preferences: Option<Preferences>,
}

impl RestBackend {
    /// Create a REST backend rooted at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Other(format!("failed building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = Self::execute(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::InvalidData(e.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), BackendError> {
        Self::execute(request).await.map(|_| ())
    }

    async fn execute(request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::debug!("Backend responded {} with body: {}", status, body);
        Err(status_error(status, &body))
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Build a query string from already-safe scalar values.
fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, v)))
        .collect();

    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, pairs.join("&"))
    }
}

/// Map a non-success HTTP status to a backend error, keeping the service's
/// `detail` message when it sent one.
fn status_error(status: StatusCode, body: &str) -> BackendError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Auth(detail),
        StatusCode::NOT_FOUND => BackendError::NotFound(detail),
        StatusCode::CONFLICT => BackendError::Conflict(detail),
        StatusCode::BAD_REQUEST if reports_duplicate(&detail) => BackendError::Conflict(detail),
        _ => BackendError::Other(detail),
    }
}

/// The service answers duplicates with 400 and an "already ..." detail.
fn reports_duplicate(detail: &str) -> bool {
    detail.to_lowercase().contains("already")
}

#[async_trait]
impl Backend for RestBackend {
    fn backend_type(&self) -> &str {
        "rest"
    }

    async fn fetch_tasks(&self, user_id: i64) -> Result<Vec<BackendTask>, BackendError> {
        let path = with_query("/tasks/", &[("user_id", Some(user_id.to_string()))]);
        self.send(self.client.get(self.url(&path))).await
    }

    async fn create_task(&self, user_id: i64, args: CreateTaskArgs) -> Result<BackendTask, BackendError> {
        let path = with_query("/tasks/", &[("user_id", Some(user_id.to_string()))]);
        self.send(self.client.post(self.url(&path)).json(&args)).await
    }

    async fn update_task(&self, user_id: i64, task_id: i64, args: UpdateTaskArgs) -> Result<BackendTask, BackendError> {
        let path = with_query(&format!("/tasks/{}", task_id), &[("user_id", Some(user_id.to_string()))]);
        self.send(self.client.put(self.url(&path)).json(&args)).await
    }

    async fn delete_task(&self, user_id: i64, task_id: i64) -> Result<(), BackendError> {
        let path = with_query(&format!("/tasks/{}", task_id), &[("user_id", Some(user_id.to_string()))]);
        self.send_empty(self.client.delete(self.url(&path))).await
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, BackendError> {
        self.send(self.client.get(self.url("/tags/"))).await
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, BackendError> {
        let body = json!({ "name": normalize_tag_name(name) });
        self.send(self.client.post(self.url("/tags/")).json(&body)).await
    }

    async fn fetch_task_tags(&self, task_id: i64) -> Result<Vec<TaskTag>, BackendError> {
        let path = with_query("/task-tags/", &[("task_id", Some(task_id.to_string()))]);
        let links: Vec<TaskTag> = self.send(self.client.get(self.url(&path))).await?;
        // Some deployments ignore the filter and return every link.
        Ok(links.into_iter().filter(|link| link.task_id == task_id).collect())
    }

    async fn link_tag(&self, task_id: i64, tag_id: i64) -> Result<(), BackendError> {
        let body = TaskTag { task_id, tag_id };
        self.send_empty(self.client.post(self.url("/task-tags/")).json(&body)).await
    }

    async fn unlink_tag(&self, task_id: i64, tag_id: i64) -> Result<(), BackendError> {
        let path = format!("/task-tags/{}/{}", task_id, tag_id);
        self.send_empty(self.client.delete(self.url(&path))).await
    }

    async fn fetch_categories(&self, user_id: i64) -> Result<Vec<Category>, BackendError> {
        let path = with_query("/categories/", &[("user_id", Some(user_id.to_string()))]);
        let categories: Vec<Category> = self.send(self.client.get(self.url(&path))).await?;
        Ok(categories.into_iter().filter(|c| c.user_id == user_id).collect())
    }

    async fn create_category(&self, args: CreateCategoryArgs) -> Result<Category, BackendError> {
        self.send(self.client.post(self.url("/categories/")).json(&args)).await
    }

    async fn register(&self, email: &str, password_hash: &str) -> Result<User, BackendError> {
        let body = json!({ "email": email, "password_hash": password_hash });
        self.send(self.client.post(self.url("/users/")).json(&body)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let body = json!({ "email": email, "password": password });
        self.send(self.client.post(self.url("/users/login")).json(&body)).await
    }

    async fn fetch_preferences(&self, user_id: i64) -> Result<Preferences, BackendError> {
        let path = format!("/users/{}/preferences", user_id);
        let envelope: PreferencesEnvelope = self.send(self.client.get(self.url(&path))).await?;
        Ok(envelope.preferences.unwrap_or_default())
    }

    async fn update_preferences(&self, user_id: i64, preferences: Preferences) -> Result<User, BackendError> {
        let path = format!("/users/{}/preferences", user_id);
        let body = json!({ "preferences": preferences });
        self.send(self.client.put(self.url(&path)).json(&body)).await
    }

    async fn fetch_notifications(&self, user_id: i64, is_read: Option<bool>) -> Result<Vec<Notification>, BackendError> {
        let path = with_query(
            "/notifications/",
            &[
                ("user_id", Some(user_id.to_string())),
                ("is_read", is_read.map(|r| r.to_string())),
            ],
        );
        self.send(self.client.get(self.url(&path))).await
    }

    async fn mark_notification(&self, notification_id: i64, is_read: bool) -> Result<Notification, BackendError> {
        let path = format!("/notifications/{}", notification_id);
        let body = json!({ "is_read": is_read });
        self.send(self.client.put(self.url(&path)).json(&body)).await
    }

    async fn delete_notification(&self, notification_id: i64) -> Result<(), BackendError> {
        let path = format!("/notifications/{}", notification_id);
        self.send_empty(self.client.delete(self.url(&path))).await
    }

    async fn fetch_analytics_stats(&self, user_id: i64) -> Result<AnalyticsStats, BackendError> {
        let path = format!("/analytics-logs/stats/{}", user_id);
        self.send(self.client.get(self.url(&path))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_with_single_slash() {
        assert_eq!(join_url("http://localhost:8000/", "/tasks/"), "http://localhost:8000/tasks/");
        assert_eq!(join_url("http://localhost:8000", "tags/"), "http://localhost:8000/tags/");
    }

    #[test]
    fn query_skips_absent_values() {
        let path = with_query("/notifications/", &[("user_id", Some("7".to_string())), ("is_read", None)]);
        assert_eq!(path, "/notifications/?user_id=7");

        let path = with_query(
            "/notifications/",
            &[("user_id", Some("7".to_string())), ("is_read", Some("false".to_string()))],
        );
        assert_eq!(path, "/notifications/?user_id=7&is_read=false");

        assert_eq!(with_query("/tags/", &[]), "/tags/");
    }

    #[test]
    fn status_errors_keep_detail() {
        let err = status_error(StatusCode::BAD_REQUEST, r#"{"detail":"Email already registered"}"#);
        assert!(matches!(err, BackendError::Conflict(ref msg) if msg == "Email already registered"));

        assert!(matches!(status_error(StatusCode::CONFLICT, ""), BackendError::Conflict(_)));
        let err = status_error(StatusCode::BAD_REQUEST, r#"{"detail":"Invalid tag id"}"#);
        assert!(matches!(err, BackendError::Other(ref msg) if msg == "Invalid tag id"));
        assert!(matches!(status_error(StatusCode::BAD_REQUEST, ""), BackendError::Other(_)));

        let err = status_error(StatusCode::NOT_FOUND, "");
        assert!(matches!(err, BackendError::NotFound(ref msg) if msg == "HTTP 404"));

        assert!(matches!(status_error(StatusCode::UNAUTHORIZED, ""), BackendError::Auth(_)));
        assert!(matches!(status_error(StatusCode::INTERNAL_SERVER_ERROR, ""), BackendError::Other(_)));
    }

    #[test]
    fn base_url_is_normalised() {
        let backend = RestBackend::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.url("/tasks/1"), "http://localhost:8000/tasks/1");
    }
}
