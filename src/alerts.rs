use chrono::Local;

use crate::constants::MAX_ALERTS;

/// A user-visible message raised when an action fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub timestamp: String,
    pub message: String,
}

/// Queue of alerts awaiting the presentation layer
#[derive(Debug, Clone, Default)]
pub struct Alerts {
    entries: Vec<Alert>,
}

impl Alerts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alert, dropping the oldest once the queue is full
    pub fn push(&mut self, message: String) {
        let timestamp = Local::now().format("%H:%M:%S%.3f").to_string();
        self.entries.push(Alert { timestamp, message });

        if self.entries.len() > MAX_ALERTS {
            let overflow = self.entries.len() - MAX_ALERTS;
            self.entries.drain(..overflow);
        }
    }

    /// All alerts, newest first
    pub fn newest_first(&self) -> Vec<Alert> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn latest(&self) -> Option<&Alert> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every alert, newest first
    pub fn drain(&mut self) -> Vec<Alert> {
        let mut drained: Vec<Alert> = self.entries.drain(..).collect();
        drained.reverse();
        drained
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
