//! Core database infrastructure
//!
//! This module provides the foundational database components used throughout mailkeep:
//! - `DatabaseConn`: SQLite connection wrapper with driver, table prefix and debug settings
//! - `SchemaInstaller`: initial schema provisioning
//! - `VersionTracker`: per-component schema versions in the `system` table
//! - `SchemaUpgrader`: numbered upgrade file runner

mod connection;
mod schema;
mod upgrade;
mod version;

pub use connection::{DatabaseConn, Dsn, SQLITE_DRIVER};
pub use schema::{SchemaInstaller, SchemaStatus};
pub use upgrade::{
    legacy_version, SchemaUpgrader, StartingVersion, UpgradeOptions, UpgradeReport,
    UpgradeStatus, LEGACY_RELEASE_VERSIONS, PRE_TRACKING_VERSION, VERSIONING_CUTOFF,
};
pub use version::VersionTracker;
