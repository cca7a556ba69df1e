//! Retention cleanup lens
//!
//! Physically removes soft-deleted rows once they are older than the
//! retention window.

use crate::database::DatabaseConn;
use crate::error::{AdminError, Result};
use chrono::{Duration, Local, NaiveDateTime};
use std::io::Write;
use tracing::info;

/// Tables with `del` / `changed` soft-delete columns
pub const RETENTION_TABLES: &[&str] = &["contacts", "contactgroups", "identities", "responses"];

/// Rows removed from one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanResult {
    pub table: String,
    pub deleted: usize,
}

/// Lens for purging soft-deleted records
pub struct CleanLens<'a> {
    db: &'a DatabaseConn,
}

impl<'a> CleanLens<'a> {
    pub fn new(db: &'a DatabaseConn) -> Self {
        Self { db }
    }

    /// Cutoff timestamp: midnight of the day `days` days before `now`
    ///
    /// A retention window reaching past the representable date range is a
    /// configuration error.
    pub fn threshold(days: u32, now: NaiveDateTime) -> Result<String> {
        let day = Duration::try_days(i64::from(days))
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                AdminError::Config(format!("Retention of {} days is out of range", days))
            })?
            .date();
        Ok(format!("{} 00:00:00", day.format("%Y-%m-%d")))
    }

    /// Remove deleted records older than `days` days
    pub fn clean<W: Write>(&self, days: u32, out: &mut W) -> Result<Vec<CleanResult>> {
        self.clean_at(days, Local::now().naive_local(), out)
    }

    /// Same as [`CleanLens::clean`] with an explicit current time
    pub fn clean_at<W: Write>(
        &self,
        days: u32,
        now: NaiveDateTime,
        out: &mut W,
    ) -> Result<Vec<CleanResult>> {
        let threshold = Self::threshold(days, now)?;
        info!("removing deleted records changed before {}", threshold);

        let mut results = Vec::with_capacity(RETENTION_TABLES.len());
        for table in RETENTION_TABLES {
            let deleted = self.db.execute_with_params(
                &format!(
                    "DELETE FROM {} WHERE del = 1 AND changed < ?1",
                    self.db.quoted_table_name(table)
                ),
                [&threshold],
            )?;

            writeln!(out, "{} records deleted from '{}'", deleted, table)?;
            results.push(CleanResult {
                table: table.to_string(),
                deleted,
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - Duration::days(days))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    fn create_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        for table in RETENTION_TABLES {
            db.exec_script(&format!(
                "CREATE TABLE {} (id INTEGER PRIMARY KEY, del TINYINT NOT NULL DEFAULT 0, changed DATETIME NOT NULL);",
                table
            ))
            .unwrap();
        }
        db
    }

    fn insert(db: &DatabaseConn, table: &str, id: i64, del: i64, changed: &str) {
        db.conn
            .execute(
                &format!("INSERT INTO {} (id, del, changed) VALUES (?1, ?2, ?3)", table),
                rusqlite::params![id, del, changed],
            )
            .unwrap();
    }

    fn ids(db: &DatabaseConn, table: &str) -> Vec<i64> {
        let mut stmt = db
            .conn
            .prepare(&format!("SELECT id FROM {} ORDER BY id", table))
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_threshold_truncated_to_midnight() {
        assert_eq!(CleanLens::threshold(30, now()).unwrap(), "2024-03-01 00:00:00");
        assert_eq!(CleanLens::threshold(0, now()).unwrap(), "2024-03-31 00:00:00");
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(matches!(
            CleanLens::threshold(100_000_000, now()),
            Err(AdminError::Config(_))
        ));
        assert!(CleanLens::threshold(u32::MAX, now()).is_err());
    }

    #[test]
    fn test_clean_out_of_range_deletes_nothing() {
        let db = create_test_db();
        insert(&db, "contacts", 1, 1, &days_ago(31));

        let mut out = Vec::new();
        let result = CleanLens::new(&db).clean_at(100_000_000, now(), &mut out);

        assert!(matches!(result, Err(AdminError::Config(_))));
        assert!(out.is_empty());
        assert_eq!(ids(&db, "contacts"), vec![1]);
    }

    #[test]
    fn test_retention_boundary() {
        let db = create_test_db();
        insert(&db, "contacts", 1, 1, &days_ago(31));
        insert(&db, "contacts", 2, 1, &days_ago(29));
        insert(&db, "contacts", 3, 0, &days_ago(400));
        insert(&db, "identities", 4, 1, &days_ago(90));
        insert(&db, "identities", 5, 0, &days_ago(90));

        let mut out = Vec::new();
        let results = CleanLens::new(&db).clean_at(30, now(), &mut out).unwrap();

        assert_eq!(ids(&db, "contacts"), vec![2, 3]);
        assert_eq!(ids(&db, "identities"), vec![5]);

        let counts: Vec<(&str, usize)> = results
            .iter()
            .map(|r| (r.table.as_str(), r.deleted))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("contacts", 1),
                ("contactgroups", 0),
                ("identities", 1),
                ("responses", 0)
            ]
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1 records deleted from 'contacts'\n\
             0 records deleted from 'contactgroups'\n\
             1 records deleted from 'identities'\n\
             0 records deleted from 'responses'\n"
        );
    }

    #[test]
    fn test_prefixed_tables() {
        let db = DatabaseConn::open_in_memory()
            .unwrap()
            .with_table_prefix("rc_");
        for table in RETENTION_TABLES {
            db.exec_script(&format!(
                "CREATE TABLE {} (id INTEGER PRIMARY KEY, del TINYINT NOT NULL DEFAULT 0, changed DATETIME NOT NULL);",
                table
            ))
            .unwrap();
        }
        insert(&db, "rc_responses", 1, 1, &days_ago(10));

        let results = CleanLens::new(&db)
            .clean_at(7, now(), &mut Vec::new())
            .unwrap();
        assert_eq!(results[3].deleted, 1);
    }
}
