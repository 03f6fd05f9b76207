use anyhow::{Context, Result};
use log::{debug, info};

use crate::backend::{CreateTaskArgs, UpdateTaskArgs};
use crate::entities::{NewTask, Task, TaskId, TaskStatus, TaskUpdate};
use crate::store::TaskStore;
use crate::utils::datetime;

impl TaskStore {
    /// Creates a task.
    ///
    /// Remote mode creates it on the backend, links its tags, then reloads.
    /// Local mode appends it to the collection with a fresh local id.
    ///
    /// # Returns
    /// The id of the new task
    ///
    /// # Errors
    /// Returns an error if the backend rejects the task; the collection is
    /// left as it was. If the task was created but linking a tag failed, the
    /// collection is still reloaded before the error is returned, so the new
    /// task shows up.
    pub async fn create_task(&mut self, new_task: NewTask) -> Result<TaskId> {
        let Some((backend, user_id)) = self.remote_handle() else {
            for name in &new_task.tags {
                self.create_tag(name).await?;
            }
            let task = Task::local(new_task, datetime::utc_now());
            let id = task.id;
            info!("Created local task {}", id);
            self.tasks.push(task);
            return Ok(id);
        };

        let created = backend
            .create_task(user_id, CreateTaskArgs::from(&new_task))
            .await
            .context("Failed to create task")?;
        info!("Created task {} on backend", created.task_id);

        let linked = if new_task.tags.is_empty() {
            Ok(())
        } else {
            self.link_tags(created.task_id, &new_task.tags).await
        };

        self.reload().await?;
        linked.with_context(|| format!("Task {} was created but its tags were not saved", created.task_id))?;
        Ok(TaskId::Remote(created.task_id))
    }

    /// Applies a partial update. Unknown ids are a no-op.
    ///
    /// # Errors
    /// Returns an error for a blank title or a failed backend call.
    pub async fn update_task(&mut self, id: TaskId, update: TaskUpdate) -> Result<()> {
        update.validate()?;

        if self.find(id).is_none() {
            debug!("update_task: task {} not found, ignoring", id);
            return Ok(());
        }

        let Some((backend, user_id)) = self.remote_handle() else {
            if let Some(task) = self.find_mut(id) {
                task.apply(&update, datetime::utc_now());
            }
            return Ok(());
        };

        let Some(remote_id) = id.remote() else {
            debug!("update_task: task {} is not persisted, ignoring", id);
            return Ok(());
        };

        let args = UpdateTaskArgs::from_update(&update, datetime::utc_now());
        backend
            .update_task(user_id, remote_id, args)
            .await
            .with_context(|| format!("Failed to update task {}", remote_id))?;

        self.reload().await
    }

    /// Deletes a task. Unknown ids are a no-op.
    pub async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        if self.find(id).is_none() {
            debug!("delete_task: task {} not found, ignoring", id);
            return Ok(());
        }

        let Some((backend, user_id)) = self.remote_handle() else {
            self.tasks.retain(|task| task.id != id);
            info!("Deleted local task {}", id);
            return Ok(());
        };

        let Some(remote_id) = id.remote() else {
            return Ok(());
        };

        backend
            .delete_task(user_id, remote_id)
            .await
            .with_context(|| format!("Failed to delete task {}", remote_id))?;
        info!("Deleted task {} on backend", remote_id);

        self.reload().await
    }

    /// Flips between completed and active.
    ///
    /// Any non-completed status (in progress, overdue, none) becomes completed;
    /// completed becomes active. `completed_at` follows the status.
    pub async fn toggle_complete(&mut self, id: TaskId) -> Result<()> {
        let Some(task) = self.find(id) else {
            debug!("toggle_complete: task {} not found, ignoring", id);
            return Ok(());
        };

        let next = if task.is_completed() {
            TaskStatus::Active
        } else {
            TaskStatus::Completed
        };

        self.update_task(id, TaskUpdate::status(next)).await
    }

    /// Flips the favorite flag.
    pub async fn toggle_favorite(&mut self, id: TaskId) -> Result<()> {
        let Some(task) = self.find(id) else {
            debug!("toggle_favorite: task {} not found, ignoring", id);
            return Ok(());
        };

        let next = !task.is_favorite;
        self.update_task(id, TaskUpdate::favorite(next)).await
    }
}
