//! Domain records exchanged with the backend and held by the task store.

pub mod category;
pub mod notification;
pub mod tag;
pub mod task;
pub mod task_tag;
pub mod user;

pub use category::Category;
pub use notification::{Notification, NotificationType};
pub use tag::{normalize_tag_name, Tag};
pub use task::{NewTask, Placement, Priority, Recurrence, Task, TaskId, TaskStatus, TaskUpdate};
pub use task_tag::TaskTag;
pub use user::{Preferences, User};
