//! Backend abstraction layer.
//!
//! This module defines the interface to the task service that persists tasks,
//! tags, users and notifications, along with the wire types and error handling
//! shared by every implementation.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entities::{Category, NewTask, Notification, Preferences, Priority, Tag, TaskStatus, TaskTag, TaskUpdate, User};
use crate::utils::datetime::{self, deserialize_timestamp};

pub mod factory;
pub mod rest;

/// Common error types for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Duplicate resource or already-existing link.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Backend error: {0}")]
    Other(String),
}

/// Task record as the backend returns it.
///
/// `deadline` stays a raw string here; the store parses it and degrades
/// unreadable values to "no deadline".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendTask {
    pub task_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub is_repeating: bool,
    #[serde(default)]
    pub repeat_interval: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub completed_at: Option<NaiveDateTime>,
}

/// Arguments for creating a new task.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateTaskArgs {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub priority: Option<Priority>,
    pub deadline: Option<String>,
    pub is_repeating: bool,
    pub repeat_interval: Option<String>,
    pub is_favorite: bool,
}

impl From<&NewTask> for CreateTaskArgs {
    fn from(task: &NewTask) -> Self {
        Self {
            title: task.title().to_string(),
            description: task.description.clone(),
            category_id: task.category_id,
            priority: task.priority,
            deadline: task.deadline.map(datetime::format_deadline),
            is_repeating: task.recurrence.is_some(),
            repeat_interval: task.recurrence.as_ref().and_then(|r| r.interval.clone()),
            is_favorite: task.is_favorite,
        }
    }
}

/// Arguments for updating a task. Absent fields are left untouched by the
/// backend; `Some(None)` is sent as an explicit `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UpdateTaskArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<Priority>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_repeating: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<TaskStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<String>>,
}

impl UpdateTaskArgs {
    /// Translate a domain update. A status change carries the matching
    /// `completed_at` so the backend record stays consistent.
    pub fn from_update(update: &TaskUpdate, now_utc: NaiveDateTime) -> Self {
        let completed_at = update.status.map(|status| match status {
            Some(TaskStatus::Completed) => Some(datetime::format_deadline(now_utc)),
            _ => None,
        });

        Self {
            title: update.title.as_ref().map(|t| t.trim().to_string()),
            description: update.description.clone(),
            category_id: update.category_id,
            priority: update.priority,
            deadline: update.deadline.map(|d| d.map(datetime::format_deadline)),
            is_repeating: update.recurrence.as_ref().map(|r| r.is_some()),
            repeat_interval: update
                .recurrence
                .as_ref()
                .map(|r| r.as_ref().and_then(|rec| rec.interval.clone())),
            status: update.status,
            is_favorite: update.is_favorite,
            completed_at,
        }
    }
}

/// Arguments for creating a category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateCategoryArgs {
    pub user_id: i64,
    pub name: String,
    pub color: Option<String>,
}

/// Per-action counters from the analytics log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub updated: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsStats {
    pub user_id: i64,
    #[serde(default)]
    pub total_actions: u64,
    #[serde(default)]
    pub by_action: ActionCounts,
}

/// Backend trait that every task service implementation must provide.
///
/// Calls are plain request/response; nothing here retries, and callers
/// decide how failures are surfaced.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the backend type identifier (e.g., "rest").
    fn backend_type(&self) -> &str;

    // Tasks
    async fn fetch_tasks(&self, user_id: i64) -> Result<Vec<BackendTask>, BackendError>;
    async fn create_task(&self, user_id: i64, args: CreateTaskArgs) -> Result<BackendTask, BackendError>;
    async fn update_task(&self, user_id: i64, task_id: i64, args: UpdateTaskArgs) -> Result<BackendTask, BackendError>;
    async fn delete_task(&self, user_id: i64, task_id: i64) -> Result<(), BackendError>;

    // Tags; creation is idempotent on the normalized name
    async fn fetch_tags(&self) -> Result<Vec<Tag>, BackendError>;
    async fn create_tag(&self, name: &str) -> Result<Tag, BackendError>;
    async fn fetch_task_tags(&self, task_id: i64) -> Result<Vec<TaskTag>, BackendError>;
    async fn link_tag(&self, task_id: i64, tag_id: i64) -> Result<(), BackendError>;
    async fn unlink_tag(&self, task_id: i64, tag_id: i64) -> Result<(), BackendError>;

    // Categories
    async fn fetch_categories(&self, user_id: i64) -> Result<Vec<Category>, BackendError>;
    async fn create_category(&self, args: CreateCategoryArgs) -> Result<Category, BackendError>;

    // Users
    async fn register(&self, email: &str, password_hash: &str) -> Result<User, BackendError>;
    async fn login(&self, email: &str, password: &str) -> Result<User, BackendError>;
    async fn fetch_preferences(&self, user_id: i64) -> Result<Preferences, BackendError>;
    async fn update_preferences(&self, user_id: i64, preferences: Preferences) -> Result<User, BackendError>;

    // Notifications
    async fn fetch_notifications(&self, user_id: i64, is_read: Option<bool>) -> Result<Vec<Notification>, BackendError>;
    async fn mark_notification(&self, notification_id: i64, is_read: bool) -> Result<Notification, BackendError>;
    async fn delete_notification(&self, notification_id: i64) -> Result<(), BackendError>;

    // Analytics
    async fn fetch_analytics_stats(&self, user_id: i64) -> Result<AnalyticsStats, BackendError>;
}
