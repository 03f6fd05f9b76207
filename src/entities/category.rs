use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::datetime::deserialize_timestamp;

/// A user's category. Any task with a category is outside the inbox.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}
