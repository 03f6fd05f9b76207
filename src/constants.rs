//! Constants used throughout the application
//!
//! This module centralizes user-facing messages, fixed keys and default values.

// View titles
pub const TITLE_INBOX: &str = "📥 Inbox";
pub const TITLE_TODAY: &str = "📅 Today";
pub const TITLE_UPCOMING: &str = "🗓 This week";
pub const TITLE_ALL: &str = "📋 All tasks";
pub const TITLE_NOTIFICATIONS: &str = "🔔 Notifications";

/// Bucket label for tasks without a deadline in grouped views
pub const NO_DATE_LABEL: &str = "No date";

// Error Messages (shown as alerts)
pub const ERROR_TASK_CREATE_FAILED: &str = "❌ Failed to create task";
pub const ERROR_TASK_UPDATE_FAILED: &str = "❌ Failed to update task";
pub const ERROR_TASK_DELETE_FAILED: &str = "❌ Failed to delete task";
pub const ERROR_TASK_COMPLETION_FAILED: &str = "❌ Failed to change task status";
pub const ERROR_TASK_FAVORITE_FAILED: &str = "❌ Failed to update favorite";
pub const ERROR_TASK_TAGS_FAILED: &str = "❌ Failed to update task tags";
pub const ERROR_TASKS_LOAD_FAILED: &str = "❌ Failed to load tasks";
pub const ERROR_LOGIN_FAILED: &str = "❌ Login failed";
pub const ERROR_REGISTER_FAILED: &str = "❌ Registration failed";
pub const ERROR_SESSION_FAILED: &str = "❌ Failed to save session";
pub const ERROR_NOTIFICATIONS_FAILED: &str = "❌ Failed to update notifications";
pub const ERROR_PREFERENCES_FAILED: &str = "❌ Failed to update preferences";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

/// Fixed key under which the signed-in user is persisted
pub const SESSION_KEY: &str = "mastertask_user";

/// Default task service location
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Counter refresh period
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
/// Upper bound accepted for the refresh period
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3600;

/// Maximum number of alerts kept in memory
pub const MAX_ALERTS: usize = 50;
