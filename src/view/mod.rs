//! View classification.
//!
//! Decides which tasks a view shows. Secondary filters (search, tags, status,
//! priority, favorite) narrow the collection first; the selected view's own
//! rule partitions what is left. Nothing here sorts, mutates, or reads the
//! clock: `now` is always passed in.

pub mod grouping;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::NaiveDateTime;

use crate::constants::{TITLE_ALL, TITLE_INBOX, TITLE_NOTIFICATIONS, TITLE_TODAY, TITLE_UPCOMING};
use crate::entities::{normalize_tag_name, Placement, Priority, Task, TaskStatus};
use crate::utils::datetime;

pub use grouping::{group_by_date, DateGroup};

/// The active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewSelector {
    /// Uncategorized, undated tasks.
    #[default]
    Inbox,
    /// Tasks whose deadline falls on today's local date.
    Today,
    /// Tasks whose deadline falls in the current Monday..Sunday week.
    Upcoming,
    /// Categorized or dated tasks; everything once a status/priority/favorite lens is on.
    All,
    /// Not a task view: backed by the notification feed.
    Notifications,
}

impl ViewSelector {
    pub const ALL: [ViewSelector; 5] = [
        ViewSelector::Inbox,
        ViewSelector::Today,
        ViewSelector::Upcoming,
        ViewSelector::All,
        ViewSelector::Notifications,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewSelector::Inbox => "inbox",
            ViewSelector::Today => "today",
            ViewSelector::Upcoming => "upcoming",
            ViewSelector::All => "all",
            ViewSelector::Notifications => "notifications",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewSelector::Inbox => TITLE_INBOX,
            ViewSelector::Today => TITLE_TODAY,
            ViewSelector::Upcoming => TITLE_UPCOMING,
            ViewSelector::All => TITLE_ALL,
            ViewSelector::Notifications => TITLE_NOTIFICATIONS,
        }
    }

    /// Whether the presentation groups this view by deadline date.
    pub fn is_grouped(self) -> bool {
        matches!(self, ViewSelector::Today | ViewSelector::Upcoming | ViewSelector::All)
    }

    /// The view's own inclusion rule, applied after secondary filters.
    pub fn admits(self, task: &Task, now: NaiveDateTime, lens_active: bool) -> bool {
        match self {
            ViewSelector::Inbox => task.placement() == Placement::Inbox,
            ViewSelector::Today => task.deadline.is_some_and(|deadline| deadline.date() == now.date()),
            ViewSelector::Upcoming => task
                .deadline
                .is_some_and(|deadline| datetime::in_same_week(deadline, now)),
            ViewSelector::All => lens_active || task.placement() != Placement::Inbox,
            ViewSelector::Notifications => false,
        }
    }
}

impl fmt::Display for ViewSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewSelector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        match ViewSelector::ALL.into_iter().find(|view| view.as_str() == wanted) {
            Some(view) => Ok(view),
            None => bail!("Unknown view '{}'", s),
        }
    }
}

/// Filters combined orthogonally with the active view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondaryFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// When set, only favorited tasks that are not completed pass.
    pub favorite: bool,
    /// Free text; a leading `#` searches tag names only.
    pub search: Option<String>,
    /// Lowercase tag names; a task must carry all of them.
    pub tags: BTreeSet<String>,
}

impl SecondaryFilters {
    /// Status, priority or favorite filter active.
    pub fn has_lens(&self) -> bool {
        self.status.is_some() || self.priority.is_some() || self.favorite
    }

    pub fn is_empty(&self) -> bool {
        !self.has_lens() && self.search_query().is_none() && self.tags.is_empty()
    }

    /// Add the tag to the selection, or remove it if already selected.
    pub fn toggle_tag(&mut self, name: &str) {
        let name = normalize_tag_name(name);
        if name.is_empty() {
            return;
        }
        if !self.tags.remove(&name) {
            self.tags.insert(name);
        }
    }

    fn search_query(&self) -> Option<SearchQuery> {
        let raw = self.search.as_deref()?.trim();
        match raw.strip_prefix('#') {
            Some(tag) => {
                let tag = tag.trim().to_lowercase();
                (!tag.is_empty()).then_some(SearchQuery::Tag(tag))
            }
            None => (!raw.is_empty()).then(|| SearchQuery::Text(raw.to_lowercase())),
        }
    }

    /// Every secondary filter, in pipeline order.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.matches_tags(task)
            && self.status.map_or(true, |status| task.status == Some(status))
            && self.priority.map_or(true, |priority| task.priority == Some(priority))
            && (!self.favorite || (task.is_favorite && !task.is_completed()))
    }

    fn matches_search(&self, task: &Task) -> bool {
        match self.search_query() {
            None => true,
            Some(SearchQuery::Tag(needle)) => task.tags.iter().any(|tag| tag.to_lowercase().contains(&needle)),
            Some(SearchQuery::Text(needle)) => {
                task.title.to_lowercase().contains(&needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }

    fn matches_tags(&self, task: &Task) -> bool {
        self.tags.iter().all(|tag| task.has_tag(tag))
    }
}

enum SearchQuery {
    Tag(String),
    Text(String),
}

/// Visible subset of `tasks` for `selector` under `filters` at local time `now`.
///
/// Input order is preserved. `Notifications` is not a task view and yields
/// nothing.
pub fn classify<'a>(
    tasks: &'a [Task],
    selector: ViewSelector,
    filters: &SecondaryFilters,
    now: NaiveDateTime,
) -> Vec<&'a Task> {
    if selector == ViewSelector::Notifications {
        return Vec::new();
    }

    let lens_active = filters.has_lens();
    tasks
        .iter()
        .filter(|task| filters.matches(task))
        .filter(|task| selector.admits(task, now, lens_active))
        .collect()
}
