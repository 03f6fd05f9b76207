use std::collections::{BTreeSet, HashSet};

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use crate::backend::BackendError;
use crate::entities::tag::find_by_name;
use crate::entities::{normalize_tag_name, Tag, TaskId};
use crate::store::TaskStore;
use crate::utils::datetime;

impl TaskStore {
    /// Returns the tag with this normalized name, creating it if needed.
    ///
    /// Idempotent: the same normalized name always yields the same tag id.
    /// A backend that rejects the duplicate is answered from a fresh tag list.
    pub async fn create_tag(&mut self, name: &str) -> Result<Tag> {
        let normalized = normalize_tag_name(name);
        if normalized.is_empty() {
            bail!("Tag name cannot be empty");
        }

        if let Some(tag) = find_by_name(&self.tags, &normalized) {
            return Ok(tag.clone());
        }

        let tag = match self.remote_handle() {
            None => {
                let tag = Tag {
                    tag_id: self.next_local_tag_id,
                    name: normalized,
                    created_at: Some(datetime::utc_now()),
                };
                self.next_local_tag_id += 1;
                tag
            }
            Some((backend, _)) => match backend.create_tag(&normalized).await {
                Ok(tag) => tag,
                Err(BackendError::Conflict(detail)) => {
                    debug!("Tag '{}' already exists ({}), refetching", normalized, detail);
                    let tags = backend.fetch_tags().await.context("Failed to fetch tags")?;
                    let existing = find_by_name(&tags, &normalized)
                        .cloned()
                        .with_context(|| format!("Tag '{}' reported as duplicate but not found", normalized))?;
                    self.tags = tags;
                    existing
                }
                Err(e) => return Err(e).with_context(|| format!("Failed to create tag '{}'", normalized)),
            },
        };

        if !self.tags.iter().any(|t| t.tag_id == tag.tag_id) {
            self.tags.push(tag.clone());
        }
        Ok(tag)
    }

    /// Known tags whose name starts with `prefix`, for autocompletion.
    pub fn suggest_tags(&self, prefix: &str, limit: usize) -> Vec<&Tag> {
        let prefix = normalize_tag_name(prefix.trim_start_matches('#'));
        let mut matches: Vec<&Tag> = self
            .tags
            .iter()
            .filter(|tag| normalize_tag_name(&tag.name).starts_with(&prefix))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(limit);
        matches
    }

    /// Makes the task's tags exactly `desired`.
    ///
    /// Remote mode resolves (or creates) every desired tag, diffs against the
    /// task's current links, unlinks the surplus and links the missing. It
    /// reloads afterwards even when a link call failed. A link the backend
    /// already has and an unlink of a missing link both count as success.
    /// Unknown ids are a no-op.
    pub async fn set_task_tags<I, S>(&mut self, id: TaskId, desired: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let desired: BTreeSet<String> = desired
            .into_iter()
            .map(|name| normalize_tag_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();

        if self.find(id).is_none() {
            debug!("set_task_tags: task {} not found, ignoring", id);
            return Ok(());
        }

        for name in &desired {
            self.create_tag(name).await?;
        }

        let Some((backend, _)) = self.remote_handle() else {
            if let Some(task) = self.find_mut(id) {
                task.tags = desired;
                task.updated_at = Some(datetime::utc_now());
            }
            return Ok(());
        };

        let Some(remote_id) = id.remote() else {
            return Ok(());
        };

        let current: HashSet<i64> = backend
            .fetch_task_tags(remote_id)
            .await
            .with_context(|| format!("Failed to fetch tags for task {}", remote_id))?
            .into_iter()
            .map(|link| link.tag_id)
            .collect();

        let wanted: HashSet<i64> = desired
            .iter()
            .filter_map(|name| find_by_name(&self.tags, name).map(|tag| tag.tag_id))
            .collect();

        let synced = self.apply_links(remote_id, &current, &wanted).await;
        if synced.is_ok() {
            info!(
                "Synchronized tags for task {}: {}",
                remote_id,
                desired.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        // Links already applied stay applied, so reload even after a failure.
        self.reload().await?;
        synced
    }

    async fn apply_links(&self, task_id: i64, current: &HashSet<i64>, wanted: &HashSet<i64>) -> Result<()> {
        let Some((backend, _)) = self.remote_handle() else {
            return Ok(());
        };

        for tag_id in current.difference(wanted) {
            match backend.unlink_tag(task_id, *tag_id).await {
                Ok(()) => {}
                Err(BackendError::NotFound(detail)) => {
                    debug!("Tag {} was not linked to task {}: {}", tag_id, task_id, detail);
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to remove tag {} from task {}", tag_id, task_id))
                }
            }
        }

        for tag_id in wanted.difference(current) {
            self.link_tag(task_id, *tag_id).await?;
        }
        Ok(())
    }

    /// Resolve names to tags and link each one to a freshly created task.
    pub(crate) async fn link_tags(&mut self, task_id: i64, names: &BTreeSet<String>) -> Result<()> {
        for name in names {
            let tag = self.create_tag(name).await?;
            self.link_tag(task_id, tag.tag_id).await?;
        }
        Ok(())
    }

    async fn link_tag(&self, task_id: i64, tag_id: i64) -> Result<()> {
        let Some((backend, _)) = self.remote_handle() else {
            return Ok(());
        };

        match backend.link_tag(task_id, tag_id).await {
            Ok(()) => Ok(()),
            Err(BackendError::Conflict(detail)) => {
                warn!("Tag {} already linked to task {}: {}", tag_id, task_id, detail);
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to add tag {} to task {}", tag_id, task_id)),
        }
    }
}
