//! Per-component schema version tracking
//!
//! Versions live in the key/value `system` table as `<component>-version`.

use crate::database::core::DatabaseConn;
use crate::error::Result;
use rusqlite::OptionalExtension;
use tracing::debug;

/// Reads and writes schema version rows in the `system` table
pub struct VersionTracker<'a> {
    db: &'a DatabaseConn,
}

impl<'a> VersionTracker<'a> {
    pub fn new(db: &'a DatabaseConn) -> Self {
        Self { db }
    }

    fn row_name(component: &str) -> String {
        format!("{}-version", component)
    }

    /// Get the tracked version of a component
    ///
    /// Returns `None` when the system table does not exist yet or holds no
    /// row for the component. A stored `0` is returned as `Some(0)`.
    pub fn get_version(&self, component: &str) -> Result<Option<u64>> {
        if !self.db.table_exists("system")? {
            return Ok(None);
        }

        let sql = format!(
            "SELECT value FROM {} WHERE name = ?1",
            self.db.quoted_table_name("system")
        );
        self.db.log_query(&sql);

        let value: Option<Option<String>> = self
            .db
            .conn
            .query_row(&sql, [Self::row_name(component)], |row| row.get(0))
            .optional()?;

        // keep digits only, e.g. "2013011000 " or "v2013011000"
        let digits: String = value
            .flatten()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();

        Ok(digits.parse().ok())
    }

    /// Record the version of a component
    ///
    /// Updates the existing row, and inserts one when nothing was updated.
    /// This stays portable across SQL dialects; two writers racing here could
    /// both insert, which is acceptable as only one instance runs at a time.
    pub fn set_version(&self, component: &str, version: u64) -> Result<()> {
        let table = self.db.quoted_table_name("system");
        let name = Self::row_name(component);
        let value = version.to_string();

        let updated = self.db.execute_with_params(
            &format!("UPDATE {} SET value = ?1 WHERE name = ?2", table),
            [&value, &name],
        )?;

        if updated == 0 {
            self.db.execute_with_params(
                &format!("INSERT INTO {} (name, value) VALUES (?1, ?2)", table),
                [&name, &value],
            )?;
        }

        debug!("{} set to {}", name, value);
        Ok(())
    }
}
