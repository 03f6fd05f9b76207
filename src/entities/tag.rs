use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::datetime::deserialize_timestamp;

/// A user-defined label. Names are stored trimmed and lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// Canonical form of a tag name: trimmed, lowercase.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Find a tag by name, ignoring case and surrounding whitespace.
pub fn find_by_name<'a>(tags: &'a [Tag], name: &str) -> Option<&'a Tag> {
    let wanted = normalize_tag_name(name);
    tags.iter().find(|tag| normalize_tag_name(&tag.name) == wanted)
}
