//! Database schema installation
//!
//! Fresh databases are provisioned from a dialect-specific `<driver>.initial.sql`
//! file that creates every base table at once.

use crate::database::core::{DatabaseConn, VersionTracker};
use crate::error::{AdminError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Installs the initial schema into an empty database
pub struct SchemaInstaller<'a> {
    db: &'a DatabaseConn,
}

impl<'a> SchemaInstaller<'a> {
    pub fn new(db: &'a DatabaseConn) -> Self {
        Self { db }
    }

    /// Path of the initial DDL file for the connection's driver
    pub fn initial_script_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.initial.sql", self.db.provider()))
    }

    /// Create the database schema from `<dir>/<driver>.initial.sql`
    ///
    /// Prints `Creating database schema... [OK]` (or `[FAILED]`) to `out`.
    /// A missing, unreadable or empty file is an error, as is any failure
    /// reported while executing the script.
    pub fn install<W: Write>(&self, dir: &Path, out: &mut W) -> Result<()> {
        let file = self.initial_script_path(dir);
        if !file.exists() {
            return Err(AdminError::ScriptNotFound(file));
        }

        write!(out, "Creating database schema... ")?;
        out.flush()?;

        let result = match std::fs::read_to_string(&file) {
            Ok(sql) if !sql.trim().is_empty() => self.db.exec_script(&sql),
            _ => Err(AdminError::ScriptUnreadable(file.clone())),
        };

        match result {
            Ok(()) => {
                writeln!(out, "[OK]")?;
                info!("database schema created from {}", file.display());
                Ok(())
            }
            Err(e) => {
                writeln!(out, "[FAILED]")?;
                Err(e)
            }
        }
    }

    /// Check the current schema state for a component
    pub fn check_status(&self, component: &str) -> Result<SchemaStatus> {
        let prefix = self.db.table_prefix();
        let has_tables = self
            .db
            .list_tables()?
            .iter()
            .any(|t| t.starts_with(prefix) && !t.starts_with("sqlite_"));

        if !has_tables {
            return Ok(SchemaStatus::NotInitialized);
        }

        match VersionTracker::new(self.db).get_version(component)? {
            Some(version) => Ok(SchemaStatus::Versioned(version)),
            None => Ok(SchemaStatus::Unversioned),
        }
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Database has no tables (fresh database)
    NotInitialized,

    /// Tables exist but no version row is tracked for the component
    Unversioned,

    /// Schema version recorded in the system table
    Versioned(u64),
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaStatus::NotInitialized => write!(f, "not initialized"),
            SchemaStatus::Unversioned => write!(f, "initialized (unversioned)"),
            SchemaStatus::Versioned(v) => write!(f, "initialized (v{})", v),
        }
    }
}
