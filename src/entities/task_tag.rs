use serde::{Deserialize, Serialize};

/// Link between a persisted task and a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskTag {
    pub task_id: i64,
    pub tag_id: i64,
}
