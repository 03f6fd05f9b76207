//! Derived counters and completion statistics.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entities::Task;
use crate::view::{classify, SecondaryFilters, ViewSelector};

/// Per-view badge counts.
///
/// Each count is the size of the matching view under default filters, so a
/// badge never disagrees with the list it labels. `favorites` uses the
/// favorite lens and therefore leaves out completed favorites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewCounts {
    pub inbox: usize,
    pub today: usize,
    pub upcoming: usize,
    pub all: usize,
    pub favorites: usize,
    pub overdue: usize,
}

impl ViewCounts {
    pub fn compute(tasks: &[Task], now: NaiveDateTime) -> Self {
        let defaults = SecondaryFilters::default();
        let favorites = SecondaryFilters {
            favorite: true,
            ..Default::default()
        };
        let count = |view, filters: &SecondaryFilters| classify(tasks, view, filters, now).len();

        Self {
            inbox: count(ViewSelector::Inbox, &defaults),
            today: count(ViewSelector::Today, &defaults),
            upcoming: count(ViewSelector::Upcoming, &defaults),
            all: count(ViewSelector::All, &defaults),
            favorites: count(ViewSelector::All, &favorites),
            overdue: tasks.iter().filter(|task| task.is_overdue(now)).count(),
        }
    }
}

/// Reporting window for completion statistics, named `week`, `month` or `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsRange {
    Week,
    #[default]
    Month,
    All,
}

impl StatsRange {
    fn window(self) -> Option<Duration> {
        match self {
            StatsRange::Week => Some(Duration::days(7)),
            StatsRange::Month => Some(Duration::days(30)),
            StatsRange::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    /// Percentage of `total` that is completed, 0 when there are no tasks.
    pub completion_rate: f64,
}

impl CompletionStats {
    /// Completion figures over `range`, ending at `now_utc`.
    ///
    /// A task counts as completed in the window by `completed_at`, falling back
    /// to `updated_at`. The total counts tasks created in the window, or every
    /// task for [`StatsRange::All`].
    pub fn compute(tasks: &[Task], range: StatsRange, now_utc: NaiveDateTime) -> Self {
        let in_window = |at: Option<NaiveDateTime>| match range.window() {
            None => true,
            Some(window) => at.is_some_and(|at| at >= now_utc - window && at <= now_utc),
        };

        let completed = tasks
            .iter()
            .filter(|task| task.is_completed())
            .filter(|task| in_window(task.completed_at.or(task.updated_at)))
            .count();

        let total = match range {
            StatsRange::All => tasks.len(),
            _ => tasks.iter().filter(|task| in_window(task.created_at)).count(),
        };

        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 * 100.0 / total as f64
        };

        Self {
            completed,
            total,
            completion_rate,
        }
    }
}
