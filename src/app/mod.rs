//! Application state.
//!
//! [`App`] is the single owner of everything the presentation reads: the
//! signed-in user, the task store, the notification feed, the active view and
//! filters, and pending alerts. The presentation feeds it [`Action`]s and
//! reads back a [`ViewSnapshot`].

pub mod actions;
pub mod ticker;

pub use actions::Action;
pub use ticker::{spawn_refresh_ticker, RefreshTicker};

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use log::{debug, error, info, warn};

use crate::alerts::Alerts;
use crate::auth;
use crate::backend::{AnalyticsStats, Backend};
use crate::config::Config;
use crate::constants::{
    ERROR_LOGIN_FAILED, ERROR_NOTIFICATIONS_FAILED, ERROR_PREFERENCES_FAILED, ERROR_REGISTER_FAILED,
    ERROR_SESSION_FAILED, ERROR_TASKS_LOAD_FAILED, ERROR_TASK_COMPLETION_FAILED, ERROR_TASK_CREATE_FAILED,
    ERROR_TASK_DELETE_FAILED, ERROR_TASK_FAVORITE_FAILED, ERROR_TASK_TAGS_FAILED, ERROR_TASK_UPDATE_FAILED,
};
use crate::entities::{Preferences, Task, User};
use crate::notifications::{NotificationFeed, NotificationFilter};
use crate::session::SessionStore;
use crate::stats::{CompletionStats, StatsRange, ViewCounts};
use crate::store::TaskStore;
use crate::utils::datetime::DateFormat;
use crate::view::{classify, group_by_date, DateGroup, SecondaryFilters, ViewSelector};

/// What the presentation needs to draw the active view.
#[derive(Debug, Clone)]
pub struct ViewSnapshot<'a> {
    pub view: ViewSelector,
    pub tasks: Vec<&'a Task>,
    /// Date groups for grouped views, empty otherwise.
    pub groups: Vec<DateGroup<'a>>,
    pub counts: ViewCounts,
    pub unread_notifications: usize,
}

pub struct App {
    config: Config,
    backend: Arc<dyn Backend>,
    session: SessionStore,
    user: Option<User>,
    store: TaskStore,
    notifications: Option<NotificationFeed>,
    view: ViewSelector,
    filters: SecondaryFilters,
    alerts: Alerts,
    fallback_date_format: DateFormat,
    needs_render: bool,
}

impl App {
    /// Build the application state, restoring a saved session if there is one.
    ///
    /// Nothing is fetched yet; call [`start`](Self::start).
    pub fn new(config: Config, backend: Arc<dyn Backend>, session: SessionStore) -> Result<Self> {
        let view = config.default_view()?;
        let fallback_date_format = config.date_format()?;

        let user = session.load();
        let (store, notifications) = match &user {
            Some(user) => {
                info!("Restored session for {}", user.email);
                (
                    TaskStore::remote(Arc::clone(&backend), user.user_id),
                    Some(NotificationFeed::new(Arc::clone(&backend), user.user_id)),
                )
            }
            None => (TaskStore::local(), None),
        };

        Ok(Self {
            config,
            backend,
            session,
            user,
            store,
            notifications,
            view,
            filters: SecondaryFilters::default(),
            alerts: Alerts::new(),
            fallback_date_format,
            needs_render: true,
        })
    }

    /// Initial load for a restored session. Failures become alerts.
    pub async fn start(&mut self) {
        if self.user.is_none() {
            debug!("No saved session, starting in local mode");
            return;
        }
        self.handle(Action::Reload).await;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn notifications(&self) -> Option<&NotificationFeed> {
        self.notifications.as_ref()
    }

    pub fn view(&self) -> ViewSelector {
        self.view
    }

    pub fn filters(&self) -> &SecondaryFilters {
        &self.filters
    }

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut Alerts {
        &mut self.alerts
    }

    /// Date format from the user's preferences, else the configured fallback.
    pub fn date_format(&self) -> DateFormat {
        self.user
            .as_ref()
            .and_then(|user| DateFormat::preferred(user.preferences.as_ref()))
            .unwrap_or(self.fallback_date_format)
    }

    /// Returns whether state changed since the last call.
    pub fn take_needs_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    pub fn snapshot(&self, now: NaiveDateTime) -> ViewSnapshot<'_> {
        let tasks = classify(self.store.tasks(), self.view, &self.filters, now);
        let groups = if self.view.is_grouped() {
            group_by_date(&tasks)
        } else {
            Vec::new()
        };

        ViewSnapshot {
            view: self.view,
            tasks,
            groups,
            counts: ViewCounts::compute(self.store.tasks(), now),
            unread_notifications: self.notifications.as_ref().map_or(0, NotificationFeed::unread_count),
        }
    }

    pub fn completion_stats(&self, range: StatsRange, now_utc: NaiveDateTime) -> CompletionStats {
        CompletionStats::compute(self.store.tasks(), range, now_utc)
    }

    /// Server-side action counts for the signed-in user.
    pub async fn analytics(&self) -> Result<AnalyticsStats> {
        let Some(user) = &self.user else {
            bail!("Sign in to see statistics");
        };
        self.backend
            .fetch_analytics_stats(user.user_id)
            .await
            .context("Failed to fetch statistics")
    }

    /// Apply an action. Failures are logged and queued as alerts; the state
    /// they would have changed is left as it was.
    pub async fn handle(&mut self, action: Action) {
        debug!("Handling {:?}", action);

        match action {
            Action::Navigate(view) => {
                self.view = view;
                if view == ViewSelector::Notifications {
                    if let Some(feed) = self.notifications.as_mut() {
                        let result = feed.load().await;
                        self.report(ERROR_NOTIFICATIONS_FAILED, result);
                    }
                }
                self.needs_render = true;
            }
            Action::SetStatusFilter(status) => {
                self.filters.status = status;
                self.needs_render = true;
            }
            Action::SetPriorityFilter(priority) => {
                self.filters.priority = priority;
                self.needs_render = true;
            }
            Action::SetFavoriteFilter(favorite) => {
                self.filters.favorite = favorite;
                self.needs_render = true;
            }
            Action::Search(query) => {
                let query = query.trim();
                self.filters.search = (!query.is_empty()).then(|| query.to_string());
                self.needs_render = true;
            }
            Action::ToggleTagFilter(name) => {
                self.filters.toggle_tag(&name);
                self.needs_render = true;
            }
            Action::ClearFilters => {
                self.filters = SecondaryFilters::default();
                self.needs_render = true;
            }

            Action::CreateTask(mut new_task) => {
                // Tags go in a second step so a tag failure never reads as a failed create.
                let tags = std::mem::take(&mut new_task.tags);
                match self.store.create_task(new_task).await {
                    Ok(id) => {
                        self.needs_render = true;
                        if !tags.is_empty() {
                            let result = self.store.set_task_tags(id, tags).await;
                            self.report(ERROR_TASK_TAGS_FAILED, result);
                        }
                    }
                    Err(e) => {
                        self.report(ERROR_TASK_CREATE_FAILED, Err(e));
                    }
                }
            }
            Action::UpdateTask { id, update, tags } => {
                let result = self.store.update_task(id, update).await;
                if self.report(ERROR_TASK_UPDATE_FAILED, result) {
                    if let Some(tags) = tags {
                        let result = self.store.set_task_tags(id, tags).await;
                        self.report(ERROR_TASK_TAGS_FAILED, result);
                    }
                }
            }
            Action::DeleteTask(id) => {
                let result = self.store.delete_task(id).await;
                self.report(ERROR_TASK_DELETE_FAILED, result);
            }
            Action::ToggleComplete(id) => {
                let result = self.store.toggle_complete(id).await;
                self.report(ERROR_TASK_COMPLETION_FAILED, result);
            }
            Action::ToggleFavorite(id) => {
                let result = self.store.toggle_favorite(id).await;
                self.report(ERROR_TASK_FAVORITE_FAILED, result);
            }
            Action::CreateTag(name) => {
                let result = self.store.create_tag(&name).await.map(|_| ());
                self.report(ERROR_TASK_TAGS_FAILED, result);
            }

            Action::Reload => {
                let result = self.store.reload().await;
                self.report(ERROR_TASKS_LOAD_FAILED, result);
                if let Some(feed) = self.notifications.as_mut() {
                    if let Err(e) = feed.load().await {
                        warn!("Notification refresh failed: {:#}", e);
                    }
                }
            }
            Action::Tick => {
                // Counters depend on the clock, so a tick only forces a redraw.
                self.needs_render = true;
            }

            Action::Login { email, password } => {
                let result = self.login(&email, &password).await;
                self.report(ERROR_LOGIN_FAILED, result);
            }
            Action::Register { email, password } => {
                let result = self.register(&email, &password).await;
                self.report(ERROR_REGISTER_FAILED, result);
            }
            Action::Logout => self.logout(),
            Action::UpdatePreferences(preferences) => {
                let result = self.update_preferences(preferences).await;
                self.report(ERROR_PREFERENCES_FAILED, result);
            }

            Action::LoadNotifications(filter) => {
                let result = self.load_notifications(filter).await;
                self.report(ERROR_NOTIFICATIONS_FAILED, result);
            }
            Action::MarkNotification { id, is_read } => {
                let result = match self.notifications.as_mut() {
                    Some(feed) => feed.mark(id, is_read).await,
                    None => Err(anyhow::anyhow!("Not signed in")),
                };
                self.report(ERROR_NOTIFICATIONS_FAILED, result);
            }
            Action::DeleteNotification(id) => {
                let result = match self.notifications.as_mut() {
                    Some(feed) => feed.delete(id).await,
                    None => Err(anyhow::anyhow!("Not signed in")),
                };
                self.report(ERROR_NOTIFICATIONS_FAILED, result);
            }
        }
    }

    /// Log and queue an alert for a failed result. Returns whether it succeeded.
    fn report(&mut self, message: &str, result: Result<()>) -> bool {
        match result {
            Ok(()) => {
                self.needs_render = true;
                true
            }
            Err(e) => {
                error!("{}: {:#}", message, e);
                self.alerts.push(format!("{}: {:#}", message, e));
                self.needs_render = true;
                false
            }
        }
    }

    async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        auth::validate_credentials(email, password)?;
        let user = self
            .backend
            .login(email.trim(), password)
            .await
            .context("Invalid email or password")?;
        self.sign_in(user).await
    }

    async fn register(&mut self, email: &str, password: &str) -> Result<()> {
        auth::validate_credentials(email, password)?;
        let user = self
            .backend
            .register(email.trim(), &auth::hash_password(password))
            .await
            .context("Could not create account")?;
        self.sign_in(user).await
    }

    /// Switch to remote mode for `user`. Nothing changes unless the first
    /// reload succeeds.
    async fn sign_in(&mut self, user: User) -> Result<()> {
        let mut store = TaskStore::remote(Arc::clone(&self.backend), user.user_id);
        store.reload().await?;

        let mut feed = NotificationFeed::new(Arc::clone(&self.backend), user.user_id);
        if let Err(e) = feed.load().await {
            warn!("Could not load notifications for {}: {:#}", user.email, e);
        }

        if let Err(e) = self.session.save(&user) {
            error!("{}: {:#}", ERROR_SESSION_FAILED, e);
            self.alerts.push(format!("{}: {:#}", ERROR_SESSION_FAILED, e));
        }

        info!("Signed in as {}", user.email);
        self.store = store;
        self.notifications = Some(feed);
        self.user = Some(user);
        Ok(())
    }

    fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            error!("{}: {:#}", ERROR_SESSION_FAILED, e);
            self.alerts.push(format!("{}: {:#}", ERROR_SESSION_FAILED, e));
        }

        if let Some(user) = self.user.take() {
            info!("Signed out {}", user.email);
        }
        self.store = TaskStore::local();
        self.notifications = None;
        self.filters = SecondaryFilters::default();
        if self.view == ViewSelector::Notifications {
            self.view = ViewSelector::Inbox;
        }
        self.needs_render = true;
    }

    async fn update_preferences(&mut self, preferences: Preferences) -> Result<()> {
        let Some(user) = &self.user else {
            bail!("Sign in to change preferences");
        };

        let updated = self
            .backend
            .update_preferences(user.user_id, preferences.clone())
            .await
            .context("Failed to save preferences")?;

        let mut user = user.clone();
        user.preferences = updated.preferences.or(Some(preferences));
        if let Err(e) = self.session.save(&user) {
            warn!("Preferences saved but session not updated: {:#}", e);
        }
        self.user = Some(user);
        Ok(())
    }

    async fn load_notifications(&mut self, filter: NotificationFilter) -> Result<()> {
        let Some(feed) = self.notifications.as_mut() else {
            bail!("Sign in to see notifications");
        };
        feed.set_filter(filter).await
    }
}
