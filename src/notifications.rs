//! Notification feed for the signed-in user.
//!
//! Unlike the task store, the feed patches its local copy after each
//! successful call instead of reloading.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::backend::Backend;
use crate::entities::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl NotificationFilter {
    fn is_read(self) -> Option<bool> {
        match self {
            NotificationFilter::All => None,
            NotificationFilter::Unread => Some(false),
            NotificationFilter::Read => Some(true),
        }
    }
}

pub struct NotificationFeed {
    backend: Arc<dyn Backend>,
    user_id: i64,
    filter: NotificationFilter,
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new(backend: Arc<dyn Backend>, user_id: i64) -> Self {
        Self {
            backend,
            user_id,
            filter: NotificationFilter::All,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn filter(&self) -> NotificationFilter {
        self.filter
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    /// Fetch notifications matching the current filter.
    pub async fn load(&mut self) -> Result<()> {
        self.set_filter(self.filter).await
    }

    /// Switch filter and reload. The filter only changes if the fetch succeeds.
    pub async fn set_filter(&mut self, filter: NotificationFilter) -> Result<()> {
        let items = self
            .backend
            .fetch_notifications(self.user_id, filter.is_read())
            .await
            .context("Failed to fetch notifications")?;
        debug!("Loaded {} notifications ({:?})", items.len(), filter);
        self.filter = filter;
        self.items = items;
        Ok(())
    }

    pub async fn mark(&mut self, notification_id: i64, is_read: bool) -> Result<()> {
        self.backend
            .mark_notification(notification_id, is_read)
            .await
            .with_context(|| format!("Failed to update notification {}", notification_id))?;

        if let Some(item) = self.items.iter_mut().find(|n| n.notification_id == notification_id) {
            item.is_read = is_read;
        }
        Ok(())
    }

    pub async fn delete(&mut self, notification_id: i64) -> Result<()> {
        self.backend
            .delete_notification(notification_id)
            .await
            .with_context(|| format!("Failed to delete notification {}", notification_id))?;

        self.items.retain(|n| n.notification_id != notification_id);
        info!("Deleted notification {}", notification_id);
        Ok(())
    }
}
