//! Task store for the MasterTask client.
//!
//! The [`TaskStore`] owns the in-memory task collection the views are derived
//! from. It runs in one of two modes:
//!
//! - **Remote**: a signed-in user. Every mutation is a backend call followed by
//!   a full reload; the reload is the source of truth and nothing is patched
//!   optimistically. A failed call leaves the collection untouched.
//! - **Local**: signed out. Mutations edit the in-memory collection directly and
//!   nothing is persisted; the tasks disappear with the store.
//!
//! Mutation handlers live in [`tasks`], tag resolution and synchronization in
//! [`tags`].

pub mod tags;
pub mod tasks;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::backend::{Backend, CreateCategoryArgs};
use crate::entities::{normalize_tag_name, Category, Tag, Task, TaskId};

/// Where mutations go.
#[derive(Clone)]
pub enum StoreMode {
    Remote { backend: Arc<dyn Backend>, user_id: i64 },
    Local,
}

pub struct TaskStore {
    mode: StoreMode,
    tasks: Vec<Task>,
    tags: Vec<Tag>,
    categories: Vec<Category>,
    next_local_tag_id: i64,
}

impl TaskStore {
    /// Store for a signed-out session. Starts empty.
    pub fn local() -> Self {
        Self {
            mode: StoreMode::Local,
            tasks: Vec::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            next_local_tag_id: 1,
        }
    }

    /// Store backed by the task service for `user_id`. Call [`reload`](Self::reload) to populate it.
    pub fn remote(backend: Arc<dyn Backend>, user_id: i64) -> Self {
        Self {
            mode: StoreMode::Remote { backend, user_id },
            ..Self::local()
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.mode, StoreMode::Local)
    }

    pub fn user_id(&self) -> Option<i64> {
        match &self.mode {
            StoreMode::Remote { user_id, .. } => Some(*user_id),
            StoreMode::Local => None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Backend handle and user for remote mode, cloned so callers can hold it
    /// across `&mut self` calls.
    pub(crate) fn remote_handle(&self) -> Option<(Arc<dyn Backend>, i64)> {
        match &self.mode {
            StoreMode::Remote { backend, user_id } => Some((Arc::clone(backend), *user_id)),
            StoreMode::Local => None,
        }
    }

    /// Replace the collection with the backend's current state.
    ///
    /// Fetches tasks, tags, categories, then each task's tag links. State is
    /// only replaced once every call has succeeded. No-op in local mode.
    pub async fn reload(&mut self) -> Result<()> {
        let Some((backend, user_id)) = self.remote_handle() else {
            debug!("Local store: nothing to reload");
            return Ok(());
        };

        info!("🔄 Reloading tasks for user {}", user_id);

        let remote_tasks = backend.fetch_tasks(user_id).await.context("Failed to fetch tasks")?;
        let tags = backend.fetch_tags().await.context("Failed to fetch tags")?;
        let categories = backend
            .fetch_categories(user_id)
            .await
            .context("Failed to fetch categories")?;

        let tag_names: HashMap<i64, String> = tags
            .iter()
            .map(|tag| (tag.tag_id, normalize_tag_name(&tag.name)))
            .collect();

        let mut tasks = Vec::with_capacity(remote_tasks.len());
        for remote in remote_tasks {
            let links = backend
                .fetch_task_tags(remote.task_id)
                .await
                .with_context(|| format!("Failed to fetch tags for task {}", remote.task_id))?;

            let names: BTreeSet<String> = links
                .iter()
                .filter_map(|link| tag_names.get(&link.tag_id).cloned())
                .collect();
            tasks.push(Task::from_remote(remote, names));
        }

        info!(
            "✅ Loaded {} tasks, {} tags, {} categories",
            tasks.len(),
            tags.len(),
            categories.len()
        );

        self.tasks = tasks;
        self.tags = tags;
        self.categories = categories;
        Ok(())
    }

    /// Create a category for the signed-in user and reload.
    pub async fn create_category(&mut self, name: &str, color: Option<String>) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Category name cannot be empty");
        }

        let Some((backend, user_id)) = self.remote_handle() else {
            anyhow::bail!("Categories are only available when signed in");
        };

        let category = backend
            .create_category(CreateCategoryArgs {
                user_id,
                name: name.to_string(),
                color,
            })
            .await
            .context("Failed to create category")?;

        self.reload().await?;
        Ok(category)
    }
}
