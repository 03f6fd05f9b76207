//! Backend factory for creating backend instances from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};

use super::{rest::RestBackend, Backend};
use crate::config::BackendConfig;

/// Create a backend instance from its configuration section.
///
/// # Errors
/// Returns error if:
/// - Backend type is unknown
/// - The HTTP client cannot be built
pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn Backend>> {
    match config.backend_type.as_str() {
        "rest" => {
            let timeout = Duration::from_secs(config.timeout_seconds);
            let backend = RestBackend::new(&config.base_url, timeout)?;
            log::debug!("Created REST backend for {}", backend.base_url());
            Ok(Arc::new(backend))
        }
        _ => Err(anyhow!("Unknown backend type: {}", config.backend_type)),
    }
}
