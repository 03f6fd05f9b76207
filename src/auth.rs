use std::fmt::Write;

use anyhow::{bail, Result};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `password`, as the registration endpoint expects.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{:02x}", byte);
        out
    })
}

pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        bail!("Please enter a valid email address");
    }
    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(())
}
