/// Error taxonomy shared by the config store, theme table and session registry.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No config file yet. Defaults apply.
    #[error("config file not found at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Saving failed; the in-memory configuration is left as it was.
    #[error("failed to write config {}: {source}", path.display())]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("theme index {0} is out of range (expected 0..=4)")]
    InvalidThemeIndex(i64),

    #[error("failed to spawn shell '{shell}': {reason}")]
    SessionSpawnFailed { shell: String, reason: String },

    #[error("could not determine the home directory")]
    NoHomeDirectory,
}
