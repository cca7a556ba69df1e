//! Error types for mailkeep operations

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("DDL file {} not found", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Unable to read file {} or it is empty", .0.display())]
    ScriptUnreadable(PathBuf),

    /// A SQL script failed; `version` is set for numbered upgrade files
    #[error("{}", script_message(.version, .message))]
    Script {
        version: Option<u64>,
        message: String,
    },

    #[error("Specified database schema directory doesn't exist: {}", .0.display())]
    SchemaDirNotFound(PathBuf),

    #[error("DDL Upgrade files for {driver} driver not found in {}", .path.display())]
    DialectDirNotFound { driver: String, path: PathBuf },

    #[error("Specify a host name")]
    NoHost,

    #[error("Unsupported database driver: {0}")]
    UnsupportedDriver(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid preferences data: {0}")]
    Preferences(#[from] serde_json::Error),
}

fn script_message(version: &Option<u64>, message: &str) -> String {
    match version {
        Some(v) => format!("Error in DDL upgrade {}: {}", v, message),
        None => message.to_string(),
    }
}

/// Result type alias using AdminError
pub type Result<T> = std::result::Result<T, AdminError>;
