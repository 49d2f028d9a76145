//! Error types for the two fallible boundaries: configuration and saves.

use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration failure. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config defines no worlds")]
    NoWorlds,

    #[error("invalid window size {width}x{height}")]
    InvalidWindow { width: u32, height: u32 },
}

/// Save storage failure. Recoverable: callers fall back to a new session
/// or keep playing with the previous save intact.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode save record: {0}")]
    Serialize(serde_json::Error),

    #[error("save file is corrupted or incomplete: {0}")]
    Corrupt(String),
}
