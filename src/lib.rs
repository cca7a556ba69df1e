#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Mailkeep - administrative utilities for a webmail SQL store
//!
//! Mailkeep installs and upgrades the database schema of a webmail
//! installation and runs the periodic maintenance jobs around it. It can be
//! used as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Database layer and maintenance lenses | `rusqlite`, `config` |
//! | `cli` | The `mailkeep` binary | `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: all database functionality
//!   - `core`: connection, schema installer, version tracker, upgrader
//!   - `webmail`: user and contact repositories
//!
//! - **[`lens`]**: maintenance operations
//!   - `clean`: purge soft-deleted records past the retention window
//!   - `index`: rebuild contact search words
//!   - `prefs`: bulk preference edits
//!
//! - **[`config`]**: configuration management and host resolution
//!
//! - **[`error`]**: the [`AdminError`] type returned by the library
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mailkeep::{DatabaseConn, SchemaInstaller, SchemaUpgrader, UpgradeOptions};
//! use std::path::Path;
//!
//! let db = DatabaseConn::connect("sqlite:////var/lib/webmail/db.sqlite")?;
//! let mut out = std::io::stdout();
//!
//! // fresh install
//! SchemaInstaller::new(&db).install(Path::new("sql"), &mut out)?;
//!
//! // later: apply numbered upgrades
//! let report = SchemaUpgrader::new(&db).run(
//!     Path::new("sql"),
//!     "webmail",
//!     None,
//!     &UpgradeOptions::default(),
//!     &mut out,
//! )?;
//! assert!(report.is_success());
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod lens;

pub use config::{HostSetting, MailkeepConfig};
pub use error::{AdminError, Result};

pub use database::{
    DatabaseConn, SchemaInstaller, SchemaStatus, SchemaUpgrader, StartingVersion, UpgradeOptions,
    UpgradeReport, UpgradeStatus, VersionTracker,
};

pub use lens::clean::{CleanLens, CleanResult};
pub use lens::index::{IndexLens, IndexResult};
pub use lens::prefs::{PrefType, PrefUpdate, PrefsLens};
