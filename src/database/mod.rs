//! Database module
//!
//! This module provides all database functionality for mailkeep, organized into:
//!
//! - **core**: connection, schema installation, version tracking and upgrades
//! - **webmail**: repositories for the application tables (users, contacts)
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   ├── connection  # DatabaseConn wrapper (DSN, table prefix, scripts)
//! │   ├── schema      # Initial schema installer
//! │   ├── version     # system table version rows
//! │   └── upgrade     # numbered upgrade walker
//! │
//! └── webmail/        # Application data
//!     ├── users       # accounts and preferences
//!     └── contacts    # address book and search words
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use mailkeep::database::{DatabaseConn, SchemaUpgrader, UpgradeOptions};
//!
//! let db = DatabaseConn::connect("sqlite:////var/lib/webmail/db.sqlite")?;
//! let report = SchemaUpgrader::new(&db).run(
//!     Path::new("sql"),
//!     "webmail",
//!     None,
//!     &UpgradeOptions::default(),
//!     &mut std::io::stdout(),
//! )?;
//! ```

pub mod core;
pub mod webmail;

pub use core::{
    legacy_version, DatabaseConn, Dsn, SchemaInstaller, SchemaStatus, SchemaUpgrader,
    StartingVersion, UpgradeOptions, UpgradeReport, UpgradeStatus, VersionTracker,
    LEGACY_RELEASE_VERSIONS, PRE_TRACKING_VERSION, SQLITE_DRIVER, VERSIONING_CUTOFF,
};

pub use webmail::{ContactRecord, ContactRepository, Preferences, UserRecord, UserRepository};
