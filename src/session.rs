//! Authenticated session state.
//!
//! The token and organization identity live in an explicit [`Session`]
//! value that is loaded from disk and passed into every authenticated API
//! call — never read from ambient global state. `fcst login` creates the
//! file, `fcst logout` removes it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub org_id: i64,
    pub org_name: String,
}

impl Session {
    /// Load the session saved by a previous `fcst login`.
    pub fn load(path: &Path) -> Result<Session> {
        if !path.exists() {
            anyhow::bail!("Not signed in. Run `fcst login` first.");
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let session: Session =
            serde_json::from_str(&content).with_context(|| "Failed to parse session file")?;
        Ok(session)
    }

    /// Persist the session for later invocations.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;
        Ok(())
    }

    /// Remove the session file. Removing a session that does not exist is
    /// not an error.
    pub fn clear(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
        }
        Ok(())
    }
}
