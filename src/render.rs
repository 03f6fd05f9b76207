//! Plain-text rendering of a view snapshot.

use std::fmt::Write;

use crate::app::ViewSnapshot;
use crate::entities::{Notification, Task};
use crate::utils::datetime::DateFormat;
use crate::view::ViewSelector;

pub fn render_snapshot(snapshot: &ViewSnapshot<'_>, date_format: DateFormat, notifications: &[Notification]) -> String {
    let mut out = String::new();
    let counts = &snapshot.counts;

    let _ = writeln!(out, "{}", snapshot.view.title());
    let _ = writeln!(
        out,
        "inbox {} | today {} | upcoming {} | all {} | favorites {} | overdue {} | unread {}",
        counts.inbox,
        counts.today,
        counts.upcoming,
        counts.all,
        counts.favorites,
        counts.overdue,
        snapshot.unread_notifications
    );
    out.push('\n');

    if snapshot.view == ViewSelector::Notifications {
        render_notifications(&mut out, notifications);
        return out;
    }

    if snapshot.tasks.is_empty() {
        out.push_str("  (no tasks)\n");
        return out;
    }

    if snapshot.groups.is_empty() {
        for task in &snapshot.tasks {
            let _ = writeln!(out, "  {}", render_task(task, date_format));
        }
        return out;
    }

    for group in &snapshot.groups {
        let heading = match &group.key {
            Some(key) => date_format.format_str(key),
            None => group.label().to_string(),
        };
        let _ = writeln!(out, "{} ({})", heading, group.tasks.len());
        for task in &group.tasks {
            let _ = writeln!(out, "  {}", render_task(task, date_format));
        }
    }

    out
}

/// One line per task: checkbox, favorite star, priority, title, tags, deadline.
pub fn render_task(task: &Task, date_format: DateFormat) -> String {
    let mut line = String::new();
    line.push_str(if task.is_completed() { "[x] " } else { "[ ] " });
    if task.is_favorite {
        line.push_str("★ ");
    }
    if let Some(priority) = task.priority {
        let _ = write!(line, "({}) ", priority);
    }
    line.push_str(&task.title);

    for tag in &task.tags {
        let _ = write!(line, " #{}", tag);
    }

    if let Some(deadline) = task.deadline {
        let _ = write!(
            line,
            " @ {} {}",
            date_format.format(deadline.date()),
            deadline.format("%H:%M")
        );
    }
    line
}

fn render_notifications(out: &mut String, notifications: &[Notification]) {
    if notifications.is_empty() {
        out.push_str("  (no notifications)\n");
        return;
    }

    for notification in notifications {
        let marker = if notification.is_read { " " } else { "•" };
        let _ = writeln!(out, "{} {}", marker, notification.message);
    }
}
