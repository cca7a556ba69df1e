//! User repository
//!
//! Provides account enumeration and preference storage. Preferences are a
//! JSON object kept in the `preferences` column of the users table.

use crate::database::core::DatabaseConn;
use crate::error::Result;
use serde_json::{Map, Value};

/// A user's preference mapping
pub type Preferences = Map<String, Value>;

/// A row of the users table
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: String,
    pub mail_host: String,
    pub preferences: Preferences,
}

/// Repository for user account operations
pub struct UserRepository<'a> {
    db: &'a DatabaseConn,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConn) -> Self {
        Self { db }
    }

    /// Parse a stored preferences blob; NULL or blank means no preferences
    pub fn parse_preferences(raw: Option<&str>) -> Result<Preferences> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Preferences::new()),
            Some(s) => Ok(serde_json::from_str(s)?),
        }
    }

    /// All user ids in ascending order
    pub fn list_ids(&self) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT user_id FROM {} ORDER BY user_id",
            self.db.quoted_table_name("users")
        );
        self.db.log_query(&sql);

        let mut stmt = self.db.conn.prepare(&sql)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// Load all users, or only the one with `user_id`
    pub fn select(&self, user_id: Option<i64>) -> Result<Vec<UserRecord>> {
        let sql = format!(
            "SELECT user_id, username, mail_host, preferences FROM {} \
             WHERE (?1 IS NULL OR user_id = ?1) ORDER BY user_id",
            self.db.quoted_table_name("users")
        );
        self.db.log_query(&sql);

        let mut stmt = self.db.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(user_id, username, mail_host, prefs)| {
                Ok(UserRecord {
                    user_id,
                    username,
                    mail_host,
                    preferences: Self::parse_preferences(prefs.as_deref())?,
                })
            })
            .collect()
    }

    /// Replace the stored preferences of a user
    pub fn save_preferences(&self, user_id: i64, prefs: &Preferences) -> Result<()> {
        let blob = serde_json::to_string(prefs)?;
        self.db.execute_with_params(
            &format!(
                "UPDATE {} SET preferences = ?1 WHERE user_id = ?2",
                self.db.quoted_table_name("users")
            ),
            rusqlite::params![blob, user_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.exec_script(
            "CREATE TABLE users (
                user_id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                mail_host TEXT NOT NULL,
                preferences TEXT
            );
            INSERT INTO users (user_id, username, mail_host, preferences) VALUES
                (3, 'carol', 'localhost', '{\"timezone\":\"UTC\"}'),
                (1, 'alice', 'localhost', NULL),
                (2, 'bob', 'localhost', '');",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_list_ids_sorted() {
        let db = create_test_db();
        assert_eq!(UserRepository::new(&db).list_ids().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_select_all_and_one() {
        let db = create_test_db();
        let repo = UserRepository::new(&db);

        let all = repo.select(None).unwrap();
        assert_eq!(
            all.iter().map(|u| u.user_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(all[0].preferences.is_empty());
        assert!(all[1].preferences.is_empty());

        let one = repo.select(Some(3)).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].username, "carol");
        assert_eq!(one[0].preferences.get("timezone"), Some(&json!("UTC")));

        assert!(repo.select(Some(42)).unwrap().is_empty());
    }

    #[test]
    fn test_save_preferences() {
        let db = create_test_db();
        let repo = UserRepository::new(&db);

        let mut prefs = Preferences::new();
        prefs.insert("htmleditor".to_string(), json!(true));
        repo.save_preferences(1, &prefs).unwrap();

        let user = repo.select(Some(1)).unwrap().remove(0);
        assert_eq!(user.preferences, prefs);
    }

    #[test]
    fn test_invalid_preferences_blob() {
        assert!(UserRepository::parse_preferences(Some("a:1:{")).is_err());
    }
}
