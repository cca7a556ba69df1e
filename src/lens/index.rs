//! Contact reindex lens
//!
//! Rebuilds the search words of every address book entry, user by user.

use crate::database::{ContactRepository, DatabaseConn, UserRepository};
use crate::error::Result;
use std::io::Write;
use tracing::debug;

/// Contacts reindexed for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResult {
    pub user_id: i64,
    pub contacts: usize,
}

/// Lens for rebuilding contact search words
pub struct IndexLens<'a> {
    db: &'a DatabaseConn,
}

impl<'a> IndexLens<'a> {
    pub fn new(db: &'a DatabaseConn) -> Self {
        Self { db }
    }

    /// Reindex the contacts of all users in ascending user id order
    pub fn reindex<W: Write>(&self, out: &mut W) -> Result<Vec<IndexResult>> {
        let mut results = Vec::new();

        for user_id in UserRepository::new(self.db).list_ids()? {
            writeln!(out, "Indexing contacts for user {}...", user_id)?;

            let contacts = ContactRepository::new(self.db, user_id);
            let mut count = 0;
            for mut record in contacts.list_records()? {
                record.words = None;
                if contacts.update(&record)? {
                    count += 1;
                }
            }

            debug!("reindexed {} contacts for user {}", count, user_id);
            results.push(IndexResult {
                user_id,
                contacts: count,
            });
        }

        writeln!(out, "done.")?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.exec_script(
            "CREATE TABLE users (
                user_id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                mail_host TEXT NOT NULL,
                preferences TEXT
            );
            CREATE TABLE contacts (
                contact_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                changed DATETIME NOT NULL DEFAULT '1000-01-01 00:00:00',
                del TINYINT NOT NULL DEFAULT 0,
                name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                firstname TEXT NOT NULL DEFAULT '',
                surname TEXT NOT NULL DEFAULT '',
                vcard TEXT,
                words TEXT
            );
            INSERT INTO users (user_id, username, mail_host) VALUES
                (7, 'grace', 'localhost'),
                (2, 'bob', 'localhost'),
                (5, 'eve', 'localhost');
            INSERT INTO contacts (user_id, del, name, email, words) VALUES
                (2, 0, 'Ann Smith', 'ann@example.com', 'outdated words'),
                (2, 0, 'Ben Jones', 'ben@example.com', NULL),
                (2, 1, 'Old Friend', 'old@example.com', 'keep me'),
                (7, 0, 'Cat Brown', 'cat@example.com', NULL);",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_reindex_all_users() {
        let db = create_test_db();
        let mut out = Vec::new();

        let results = IndexLens::new(&db).reindex(&mut out).unwrap();

        assert_eq!(
            results,
            vec![
                IndexResult { user_id: 2, contacts: 2 },
                IndexResult { user_id: 5, contacts: 0 },
                IndexResult { user_id: 7, contacts: 1 },
            ]
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Indexing contacts for user 2...\n\
             Indexing contacts for user 5...\n\
             Indexing contacts for user 7...\n\
             done.\n"
        );

        let words = |email: &str| -> Option<String> {
            db.conn
                .query_row(
                    "SELECT words FROM contacts WHERE email = ?1",
                    [email],
                    |row| row.get(0),
                )
                .unwrap()
        };
        assert_eq!(words("ann@example.com").as_deref(), Some("ann smith ann@example.com"));
        assert_eq!(words("cat@example.com").as_deref(), Some("cat brown cat@example.com"));
        // deleted rows are left alone
        assert_eq!(words("old@example.com").as_deref(), Some("keep me"));
    }
}
