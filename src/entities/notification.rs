use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::datetime::deserialize_timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Overdue,
    Reminder,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: i64,
    #[serde(default)]
    pub task_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<NotificationType>,
    pub message: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub sent_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_read: bool,
}
