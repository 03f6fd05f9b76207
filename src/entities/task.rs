use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tag::normalize_tag_name;
use crate::backend::BackendTask;
use crate::utils::datetime;

/// Identity of a task.
///
/// Backend tasks carry the integer key the server assigned. Tasks created
/// while signed out live only in memory and get a time-ordered UUID, so the
/// two spaces can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    Remote(i64),
    Local(Uuid),
}

impl TaskId {
    pub fn new_local() -> Self {
        TaskId::Local(Uuid::now_v7())
    }

    /// Backend key, if this task is persisted.
    pub fn remote(&self) -> Option<i64> {
        match self {
            TaskId::Remote(id) => Some(*id),
            TaskId::Local(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, TaskId::Local(_))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Remote(id) => write!(f, "{}", id),
            TaskId::Local(uuid) => write!(f, "local-{}", uuid),
        }
    }
}

impl FromStr for TaskId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix("local-") {
            let uuid = Uuid::parse_str(rest).map_err(|e| anyhow!("Invalid local task id '{}': {}", s, e))?;
            return Ok(TaskId::Local(uuid));
        }
        s.parse::<i64>()
            .map(TaskId::Remote)
            .map_err(|e| anyhow!("Invalid task id '{}': {}", s, e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => bail!("Unknown priority '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    InProgress,
    Completed,
    Overdue,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(TaskStatus::Active),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "overdue" => Ok(TaskStatus::Overdue),
            other => bail!("Unknown status '{}'", other),
        }
    }
}

/// Recurrence metadata. Stored and round-tripped, never expanded into instances.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recurrence {
    pub interval: Option<String>,
}

/// Where a task sits with respect to the inbox rule, derived from
/// `category_id` and `deadline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// No category and no deadline.
    Inbox,
    /// No category but a deadline.
    Scheduled(NaiveDateTime),
    Categorized {
        category_id: i64,
        deadline: Option<NaiveDateTime>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub priority: Option<Priority>,
    /// Local wall-clock deadline; malformed input is stored as `None`.
    pub deadline: Option<NaiveDateTime>,
    pub status: Option<TaskStatus>,
    pub is_favorite: bool,
    pub recurrence: Option<Recurrence>,
    /// Lowercase tag names.
    pub tags: BTreeSet<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl Task {
    /// Build a transient task for signed-out use.
    pub fn local(new_task: NewTask, now_utc: NaiveDateTime) -> Self {
        Self {
            id: TaskId::new_local(),
            title: new_task.title,
            description: new_task.description,
            category_id: new_task.category_id,
            priority: new_task.priority,
            deadline: new_task.deadline,
            status: Some(TaskStatus::Active),
            is_favorite: new_task.is_favorite,
            recurrence: new_task.recurrence,
            tags: new_task.tags,
            created_at: Some(now_utc),
            updated_at: Some(now_utc),
            completed_at: None,
        }
    }

    /// Convert a backend record, attaching tag names resolved separately.
    pub fn from_remote(remote: BackendTask, tags: BTreeSet<String>) -> Self {
        let deadline = remote.deadline.as_deref().and_then(datetime::parse_deadline);
        if remote.deadline.is_some() && deadline.is_none() {
            log::warn!("Task {} has an unreadable deadline {:?}; treating it as undated", remote.task_id, remote.deadline);
        }

        Self {
            id: TaskId::Remote(remote.task_id),
            title: remote.title,
            description: remote.description,
            category_id: remote.category_id,
            priority: remote.priority,
            deadline,
            status: remote.status,
            is_favorite: remote.is_favorite,
            recurrence: remote.is_repeating.then(|| Recurrence {
                interval: remote.repeat_interval,
            }),
            tags,
            created_at: remote.created_at,
            updated_at: remote.updated_at,
            completed_at: remote.completed_at,
        }
    }

    pub fn placement(&self) -> Placement {
        match (self.category_id, self.deadline) {
            (Some(category_id), deadline) => Placement::Categorized { category_id, deadline },
            (None, Some(deadline)) => Placement::Scheduled(deadline),
            (None, None) => Placement::Inbox,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(TaskStatus::Completed)
    }

    /// Not completed, and either flagged overdue or past its deadline.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        if self.is_completed() {
            return false;
        }
        self.status == Some(TaskStatus::Overdue) || self.deadline.is_some_and(|deadline| deadline < now)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains(&normalize_tag_name(name))
    }

    /// Move to `status`, keeping `completed_at` consistent with it.
    pub fn set_status(&mut self, status: Option<TaskStatus>, now_utc: NaiveDateTime) {
        let was_completed = self.is_completed();
        self.completed_at = match status {
            Some(TaskStatus::Completed) if was_completed => self.completed_at.or(Some(now_utc)),
            Some(TaskStatus::Completed) => Some(now_utc),
            _ => None,
        };
        self.status = status;
        self.updated_at = Some(now_utc);
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: &TaskUpdate, now_utc: NaiveDateTime) {
        if let Some(title) = &update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
        if let Some(recurrence) = &update.recurrence {
            self.recurrence = recurrence.clone();
        }
        if let Some(is_favorite) = update.is_favorite {
            self.is_favorite = is_favorite;
        }
        match update.status {
            Some(status) => self.set_status(status, now_utc),
            None => self.updated_at = Some(now_utc),
        }
    }
}

/// Validated payload for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDateTime>,
    pub is_favorite: bool,
    pub recurrence: Option<Recurrence>,
    pub tags: BTreeSet<String>,
}

impl NewTask {
    /// Fails when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            bail!("Task title cannot be empty");
        }

        Ok(Self {
            title: title.to_string(),
            description: None,
            category_id: None,
            priority: None,
            deadline: None,
            is_favorite: false,
            recurrence: None,
            tags: BTreeSet::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDateTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    pub fn repeating(mut self, interval: impl Into<String>) -> Self {
        self.recurrence = Some(Recurrence {
            interval: Some(interval.into()),
        });
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| normalize_tag_name(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        self
    }
}

/// Partial update. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<i64>>,
    pub priority: Option<Option<Priority>>,
    pub deadline: Option<Option<NaiveDateTime>>,
    pub recurrence: Option<Option<Recurrence>>,
    pub status: Option<Option<TaskStatus>>,
    pub is_favorite: Option<bool>,
}

impl TaskUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            bail!("Task title cannot be empty");
        }
        Ok(())
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(Some(status)),
            ..Default::default()
        }
    }

    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Default::default()
        }
    }
}
