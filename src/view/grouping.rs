//! Date grouping for the presentation of non-inbox views.

use std::collections::BTreeMap;

use crate::constants::NO_DATE_LABEL;
use crate::entities::Task;
use crate::utils::datetime;

/// Tasks sharing a deadline date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup<'a> {
    /// `YYYY-MM-DD`, or `None` for the "No date" bucket.
    pub key: Option<String>,
    pub tasks: Vec<&'a Task>,
}

impl DateGroup<'_> {
    pub fn label(&self) -> &str {
        self.key.as_deref().unwrap_or(NO_DATE_LABEL)
    }
}

/// Group by deadline date in ascending key order, with undated tasks last.
///
/// Order within a group follows the input.
pub fn group_by_date<'a>(tasks: &[&'a Task]) -> Vec<DateGroup<'a>> {
    let mut dated: BTreeMap<String, Vec<&'a Task>> = BTreeMap::new();
    let mut undated = Vec::new();

    for task in tasks {
        match task.deadline {
            Some(deadline) => dated.entry(datetime::format_ymd(deadline.date())).or_default().push(*task),
            None => undated.push(*task),
        }
    }

    let mut groups: Vec<DateGroup<'a>> = dated
        .into_iter()
        .map(|(key, tasks)| DateGroup { key: Some(key), tasks })
        .collect();

    if !undated.is_empty() {
        groups.push(DateGroup { key: None, tasks: undated });
    }

    groups
}
