//! Persisted sign-in state.
//!
//! The session file is a small JSON key-value map. The signed-in user lives
//! under [`SESSION_KEY`]; other keys are preserved on save.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::constants::SESSION_KEY;
use crate::entities::User;

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored user, if any.
    ///
    /// A missing file means signed out. An unreadable or malformed file is
    /// logged and treated the same way.
    pub fn load(&self) -> Option<User> {
        let map = self.read_map()?;
        let value = map.get(SESSION_KEY)?.clone();
        match serde_json::from_value(value) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring malformed session entry in {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, user: &User) -> Result<()> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(
            SESSION_KEY.to_string(),
            serde_json::to_value(user).context("Failed to serialize session")?,
        );
        self.write_map(&map)?;
        debug!("Saved session for user {}", user.user_id);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let Some(mut map) = self.read_map() else {
            return Ok(());
        };
        if map.remove(SESSION_KEY).is_some() {
            self.write_map(&map)?;
            debug!("Cleared session in {}", self.path.display());
        }
        Ok(())
    }

    fn read_map(&self) -> Option<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(map) => Some(map),
            Err(e) => {
                warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(map).context("Failed to serialize session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }
}
