//! Address book repository
//!
//! Contacts carry a derived `words` column used for searching. It holds the
//! normalized, de-duplicated tokens of the contact's name, email and vCard
//! fields, and is rebuilt on every update.

use crate::database::core::DatabaseConn;
use crate::error::Result;
use chrono::Local;

/// vCard properties that contribute search words
const VCARD_SEARCH_PROPERTIES: &[&str] = &["FN", "N", "NICKNAME", "ORG", "EMAIL", "NOTE"];

/// A non-deleted address book entry
#[derive(Debug, Clone, Default)]
pub struct ContactRecord {
    pub contact_id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub firstname: String,
    pub surname: String,
    pub vcard: Option<String>,
    /// Cached search words, `None` once discarded for recomputation
    pub words: Option<String>,
}

impl ContactRecord {
    /// Compute the search words for this contact
    pub fn search_words(&self) -> String {
        let mut sources = vec![
            self.name.as_str(),
            self.firstname.as_str(),
            self.surname.as_str(),
            self.email.as_str(),
        ];
        let vcard_fields = self.vcard.as_deref().map(vcard_values).unwrap_or_default();
        sources.extend(vcard_fields.iter().map(String::as_str));

        let mut words: Vec<String> = Vec::new();
        for source in sources {
            for token in tokenize(source) {
                if !words.contains(&token) {
                    words.push(token);
                }
            }
        }
        words.join(" ")
    }
}

/// Lowercase tokens of at least two characters
///
/// Dots and `@` are not separators so email addresses stay whole.
fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| c.is_whitespace() || ";,\"'/+-:()<>[]".contains(c))
        .map(|t| t.trim_matches('.'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Values of the searchable properties of a vCard
fn vcard_values(vcard: &str) -> Vec<String> {
    // unfold continuation lines
    let mut lines: Vec<String> = Vec::new();
    for line in vcard.lines() {
        match line.strip_prefix(|c: char| c == ' ' || c == '\t') {
            Some(cont) => {
                if let Some(last) = lines.last_mut() {
                    last.push_str(cont);
                }
            }
            None => lines.push(line.to_string()),
        }
    }

    let mut values = Vec::new();
    for line in lines {
        let Some((property, value)) = line.split_once(':') else {
            continue;
        };
        let name = property.split(';').next().unwrap_or_default();
        // drop a group prefix such as `item1.EMAIL`
        let name = name.rsplit('.').next().unwrap_or_default().to_uppercase();

        if VCARD_SEARCH_PROPERTIES.contains(&name.as_str()) {
            let value = value
                .replace("\\n", " ")
                .replace("\\N", " ")
                .replace("\\,", ",")
                .replace("\\;", ";");
            values.push(value);
        }
    }
    values
}

/// Repository for one user's address book
pub struct ContactRepository<'a> {
    db: &'a DatabaseConn,
    user_id: i64,
}

impl<'a> ContactRepository<'a> {
    pub fn new(db: &'a DatabaseConn, user_id: i64) -> Self {
        Self { db, user_id }
    }

    /// All non-deleted contacts of the user
    pub fn list_records(&self) -> Result<Vec<ContactRecord>> {
        let sql = format!(
            "SELECT contact_id, user_id, name, email, firstname, surname, vcard, words \
             FROM {} WHERE user_id = ?1 AND del <> 1 ORDER BY name, email, contact_id",
            self.db.quoted_table_name("contacts")
        );
        self.db.log_query(&sql);

        let mut stmt = self.db.conn.prepare(&sql)?;
        let records = stmt
            .query_map([self.user_id], |row| {
                Ok(ContactRecord {
                    contact_id: row.get(0)?,
                    user_id: row.get(1)?,
                    name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    email: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    firstname: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    surname: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    vcard: row.get(6)?,
                    words: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Write a contact back, recomputing its search words
    ///
    /// Returns `true` if a row was updated.
    pub fn update(&self, record: &ContactRecord) -> Result<bool> {
        let words = record.search_words();
        let changed = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let updated = self.db.execute_with_params(
            &format!(
                "UPDATE {} SET changed = ?1, name = ?2, email = ?3, firstname = ?4, \
                 surname = ?5, vcard = ?6, words = ?7 \
                 WHERE contact_id = ?8 AND user_id = ?9 AND del <> 1",
                self.db.quoted_table_name("contacts")
            ),
            rusqlite::params![
                changed,
                record.name,
                record.email,
                record.firstname,
                record.surname,
                record.vcard,
                words,
                record.contact_id,
                self.user_id,
            ],
        )?;
        Ok(updated > 0)
    }
}
