use crate::entities::{NewTask, Preferences, Priority, TaskId, TaskStatus, TaskUpdate};
use crate::notifications::NotificationFilter;
use crate::view::ViewSelector;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation and filters
    Navigate(ViewSelector),
    SetStatusFilter(Option<TaskStatus>),
    SetPriorityFilter(Option<Priority>),
    SetFavoriteFilter(bool),
    Search(String),
    ToggleTagFilter(String),
    ClearFilters,

    // Task operations
    CreateTask(NewTask),
    UpdateTask {
        id: TaskId,
        update: TaskUpdate,
        /// Desired tag names; `None` leaves the tags alone
        tags: Option<Vec<String>>,
    },
    DeleteTask(TaskId),
    ToggleComplete(TaskId),
    ToggleFavorite(TaskId),
    CreateTag(String),

    // Refresh
    Reload,
    Tick,

    // Session
    Login { email: String, password: String },
    Register { email: String, password: String },
    Logout,
    UpdatePreferences(Preferences),

    // Notifications
    LoadNotifications(NotificationFilter),
    MarkNotification { id: i64, is_read: bool },
    DeleteNotification(i64),
}
