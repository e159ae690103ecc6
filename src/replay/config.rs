use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{ReplayError, ReplayResult};

/// Replay feature configuration.
///
/// Recording is opt-in: with the default configuration a [`crate::ReplayManager`] has no
/// recorder and every recording call is an advisory no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ReplayConfig {
    /// Create a recorder and accept recording calls.
    pub enable_gfx_replay_save: bool,
    /// Pretty-print exported JSON.
    pub pretty_json: bool,
}

impl ReplayConfig {
    /// Configuration with recording turned on.
    pub fn recording() -> Self {
        Self {
            enable_gfx_replay_save: true,
            ..Self::default()
        }
    }

    /// Parse a configuration from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReplayResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReplayError::validation(format!("parse replay config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReplayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReplayError::io(format!("open replay config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/config.rs"]
mod tests;
