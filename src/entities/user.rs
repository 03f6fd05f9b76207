use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::datetime::{deserialize_timestamp, DateFormat};

/// Free-form preferences object as stored by the backend.
pub type Preferences = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_login: Option<NaiveDateTime>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl User {
    pub fn date_format(&self) -> DateFormat {
        DateFormat::from_preferences(self.preferences.as_ref())
    }
}
