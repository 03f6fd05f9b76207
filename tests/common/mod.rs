//! In-memory task service shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use mastertask::auth::hash_password;
use mastertask::backend::{
    ActionCounts, AnalyticsStats, Backend, BackendError, BackendTask, CreateCategoryArgs, CreateTaskArgs,
    UpdateTaskArgs,
};
use mastertask::entities::{
    normalize_tag_name, Category, NewTask, Notification, NotificationType, Preferences, Tag, Task, TaskTag, User,
};
use mastertask::utils::datetime;

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// A signed-out task with the given title; tweak fields directly.
pub fn task(title: &str) -> Task {
    Task::local(NewTask::new(title).unwrap(), at(2024, 6, 1, 9, 0))
}

pub fn backend_task(task_id: i64, title: &str) -> BackendTask {
    BackendTask {
        task_id,
        user_id: Some(1),
        title: title.to_string(),
        description: None,
        category_id: None,
        priority: None,
        deadline: None,
        is_repeating: false,
        repeat_interval: None,
        status: None,
        is_favorite: false,
        created_at: None,
        updated_at: None,
        completed_at: None,
    }
}

#[derive(Default)]
struct State {
    tasks: BTreeMap<i64, BackendTask>,
    tags: Vec<Tag>,
    links: Vec<TaskTag>,
    categories: Vec<Category>,
    users: Vec<(User, String)>,
    notifications: Vec<Notification>,
    next_id: i64,
    failing: HashSet<&'static str>,
    calls: Vec<String>,
    stale_links: Option<Vec<TaskTag>>,
}

impl State {
    fn enter(&mut self, op: &'static str) -> Result<(), BackendError> {
        self.calls.push(op.to_string());
        if self.failing.contains(op) {
            return Err(BackendError::Network(format!("{} unavailable", op)));
        }
        Ok(())
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct FakeBackend {
    state: Mutex<State>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    /// Make every call to `op` fail with a network error.
    pub fn fail(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.state.lock().unwrap().failing.remove(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| c.as_str() == op).count()
    }

    pub fn seed_task(&self, task: BackendTask) {
        self.state.lock().unwrap().tasks.insert(task.task_id, task);
    }

    pub fn seed_tag(&self, name: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        let tag_id = state.next_id();
        state.tags.push(Tag {
            tag_id,
            name: normalize_tag_name(name),
            created_at: None,
        });
        tag_id
    }

    pub fn seed_link(&self, task_id: i64, tag_id: i64) {
        self.state.lock().unwrap().links.push(TaskTag { task_id, tag_id });
    }

    /// Answer the next `fetch_task_tags` with `links` instead of the real ones,
    /// as if another client changed them in between.
    pub fn stale_task_tags_once(&self, links: Vec<TaskTag>) {
        self.state.lock().unwrap().stale_links = Some(links);
    }

    pub fn seed_user(&self, email: &str, password: &str) -> User {
        let mut state = self.state.lock().unwrap();
        let user = User {
            user_id: state.next_id(),
            email: email.to_string(),
            created_at: None,
            last_login: None,
            preferences: None,
        };
        state.users.push((user.clone(), hash_password(password)));
        user
    }

    pub fn seed_notification(&self, user_id: i64, message: &str, is_read: bool) -> i64 {
        let mut state = self.state.lock().unwrap();
        let notification_id = state.next_id();
        state.notifications.push(Notification {
            notification_id,
            task_id: None,
            user_id: Some(user_id),
            kind: Some(NotificationType::Reminder),
            message: message.to_string(),
            sent_at: None,
            is_read,
        });
        notification_id
    }

    pub fn task(&self, task_id: i64) -> Option<BackendTask> {
        self.state.lock().unwrap().tasks.get(&task_id).cloned()
    }

    pub fn task_count(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    pub fn tag_count(&self) -> usize {
        self.state.lock().unwrap().tags.len()
    }

    /// Tag ids linked to `task_id`, sorted.
    pub fn links_for(&self, task_id: i64) -> Vec<i64> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<i64> = state
            .links
            .iter()
            .filter(|link| link.task_id == task_id)
            .map(|link| link.tag_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn tag_id(&self, name: &str) -> Option<i64> {
        let state = self.state.lock().unwrap();
        state.tags.iter().find(|tag| tag.name == name).map(|tag| tag.tag_id)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn backend_type(&self) -> &str {
        "fake"
    }

    async fn fetch_tasks(&self, user_id: i64) -> Result<Vec<BackendTask>, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("fetch_tasks")?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn create_task(&self, user_id: i64, args: CreateTaskArgs) -> Result<BackendTask, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("create_task")?;
        let now = datetime::utc_now();
        let task = BackendTask {
            task_id: state.next_id(),
            user_id: Some(user_id),
            title: args.title,
            description: args.description,
            category_id: args.category_id,
            priority: args.priority,
            deadline: args.deadline,
            is_repeating: args.is_repeating,
            repeat_interval: args.repeat_interval,
            status: None,
            is_favorite: args.is_favorite,
            created_at: Some(now),
            updated_at: Some(now),
            completed_at: None,
        };
        state.tasks.insert(task.task_id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, user_id: i64, task_id: i64, args: UpdateTaskArgs) -> Result<BackendTask, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("update_task")?;
        let task = state
            .tasks
            .get_mut(&task_id)
            .filter(|task| task.user_id == Some(user_id))
            .ok_or_else(|| BackendError::NotFound("Task not found".to_string()))?;

        if let Some(title) = args.title {
            task.title = title;
        }
        if let Some(description) = args.description {
            task.description = description;
        }
        if let Some(category_id) = args.category_id {
            task.category_id = category_id;
        }
        if let Some(priority) = args.priority {
            task.priority = priority;
        }
        if let Some(deadline) = args.deadline {
            task.deadline = deadline;
        }
        if let Some(is_repeating) = args.is_repeating {
            task.is_repeating = is_repeating;
        }
        if let Some(repeat_interval) = args.repeat_interval {
            task.repeat_interval = repeat_interval;
        }
        if let Some(status) = args.status {
            task.status = status;
        }
        if let Some(is_favorite) = args.is_favorite {
            task.is_favorite = is_favorite;
        }
        if let Some(completed_at) = args.completed_at {
            task.completed_at = completed_at.as_deref().and_then(datetime::parse_timestamp);
        }
        task.updated_at = Some(datetime::utc_now());
        Ok(task.clone())
    }

    async fn delete_task(&self, user_id: i64, task_id: i64) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("delete_task")?;
        let owned = state
            .tasks
            .get(&task_id)
            .is_some_and(|task| task.user_id == Some(user_id));
        if !owned {
            return Err(BackendError::NotFound("Task not found".to_string()));
        }
        state.tasks.remove(&task_id);
        state.links.retain(|link| link.task_id != task_id);
        Ok(())
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("fetch_tags")?;
        Ok(state.tags.clone())
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("create_tag")?;
        let name = normalize_tag_name(name);
        if state.tags.iter().any(|tag| tag.name == name) {
            return Err(BackendError::Conflict("Tag already exists".to_string()));
        }
        let tag = Tag {
            tag_id: state.next_id(),
            name,
            created_at: Some(datetime::utc_now()),
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn fetch_task_tags(&self, task_id: i64) -> Result<Vec<TaskTag>, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("fetch_task_tags")?;
        if let Some(stale) = state.stale_links.take() {
            return Ok(stale.into_iter().filter(|link| link.task_id == task_id).collect());
        }
        Ok(state.links.iter().filter(|link| link.task_id == task_id).copied().collect())
    }

    async fn link_tag(&self, task_id: i64, tag_id: i64) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("link_tag")?;
        let link = TaskTag { task_id, tag_id };
        if state.links.contains(&link) {
            return Err(BackendError::Conflict("Tag already linked".to_string()));
        }
        state.links.push(link);
        Ok(())
    }

    async fn unlink_tag(&self, task_id: i64, tag_id: i64) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("unlink_tag")?;
        let link = TaskTag { task_id, tag_id };
        let before = state.links.len();
        state.links.retain(|existing| *existing != link);
        if state.links.len() == before {
            return Err(BackendError::NotFound("Link not found".to_string()));
        }
        Ok(())
    }

    async fn fetch_categories(&self, user_id: i64) -> Result<Vec<Category>, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("fetch_categories")?;
        Ok(state
            .categories
            .iter()
            .filter(|category| category.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_category(&self, args: CreateCategoryArgs) -> Result<Category, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("create_category")?;
        let category = Category {
            category_id: state.next_id(),
            user_id: args.user_id,
            name: args.name,
            color: args.color,
            created_at: Some(datetime::utc_now()),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn register(&self, email: &str, password_hash: &str) -> Result<User, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("register")?;
        if state.users.iter().any(|(user, _)| user.email == email) {
            return Err(BackendError::Conflict("Email already registered".to_string()));
        }
        let user = User {
            user_id: state.next_id(),
            email: email.to_string(),
            created_at: Some(datetime::utc_now()),
            last_login: None,
            preferences: None,
        };
        state.users.push((user.clone(), password_hash.to_string()));
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("login")?;
        let hashed = hash_password(password);
        state
            .users
            .iter()
            .find(|(user, hash)| user.email == email && *hash == hashed)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| BackendError::Auth("Invalid email or password".to_string()))
    }

    async fn fetch_preferences(&self, user_id: i64) -> Result<Preferences, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("fetch_preferences")?;
        state
            .users
            .iter()
            .find(|(user, _)| user.user_id == user_id)
            .map(|(user, _)| user.preferences.clone().unwrap_or_default())
            .ok_or_else(|| BackendError::NotFound("User not found".to_string()))
    }

    async fn update_preferences(&self, user_id: i64, preferences: Preferences) -> Result<User, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("update_preferences")?;
        let (user, _) = state
            .users
            .iter_mut()
            .find(|(user, _)| user.user_id == user_id)
            .ok_or_else(|| BackendError::NotFound("User not found".to_string()))?;
        user.preferences = Some(preferences);
        Ok(user.clone())
    }

    async fn fetch_notifications(&self, user_id: i64, is_read: Option<bool>) -> Result<Vec<Notification>, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("fetch_notifications")?;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.user_id == Some(user_id))
            .filter(|n| is_read.map_or(true, |wanted| n.is_read == wanted))
            .cloned()
            .collect())
    }

    async fn mark_notification(&self, notification_id: i64, is_read: bool) -> Result<Notification, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("mark_notification")?;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.notification_id == notification_id)
            .ok_or_else(|| BackendError::NotFound("Notification not found".to_string()))?;
        notification.is_read = is_read;
        Ok(notification.clone())
    }

    async fn delete_notification(&self, notification_id: i64) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("delete_notification")?;
        let before = state.notifications.len();
        state.notifications.retain(|n| n.notification_id != notification_id);
        if state.notifications.len() == before {
            return Err(BackendError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    async fn fetch_analytics_stats(&self, user_id: i64) -> Result<AnalyticsStats, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.enter("fetch_analytics_stats")?;
        let count = |op: &str| state.calls.iter().filter(|c| c.as_str() == op).count() as u64;
        let by_action = ActionCounts {
            created: count("create_task"),
            completed: 0,
            updated: count("update_task"),
        };
        Ok(AnalyticsStats {
            user_id,
            total_actions: by_action.created + by_action.updated,
            by_action,
        })
    }
}
