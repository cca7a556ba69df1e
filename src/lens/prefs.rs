//! User preference lens
//!
//! Sets one named preference for all users or a single user, writing only
//! the accounts whose preferences actually change.

use crate::database::{DatabaseConn, UserRepository};
use crate::error::Result;
use crate::lens::utils::{parse_boolean, parse_int};
use serde_json::Value;
use std::io::Write;
use tracing::info;

/// Type the new preference value is coerced to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefType {
    Bool,
    Int,
    #[default]
    String,
}

impl PrefType {
    /// Parse a type name; unknown names fall back to `String`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bool" | "boolean" => PrefType::Bool,
            "int" | "integer" => PrefType::Int,
            _ => PrefType::String,
        }
    }

    /// Coerce a raw string to this type
    pub fn coerce(&self, value: &str) -> Value {
        match self {
            PrefType::Bool => Value::Bool(parse_boolean(value)),
            PrefType::Int => Value::from(parse_int(value)),
            PrefType::String => Value::String(value.to_string()),
        }
    }
}

impl std::fmt::Display for PrefType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefType::Bool => write!(f, "bool"),
            PrefType::Int => write!(f, "int"),
            PrefType::String => write!(f, "string"),
        }
    }
}

/// Outcome for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefUpdate {
    pub user_id: i64,
    /// `false` when the preferences were already up to date
    pub saved: bool,
}

/// Lens for bulk preference edits
pub struct PrefsLens<'a> {
    db: &'a DatabaseConn,
}

impl<'a> PrefsLens<'a> {
    pub fn new(db: &'a DatabaseConn) -> Self {
        Self { db }
    }

    /// Set preference `name` to `value` for the selected users
    pub fn modify<W: Write>(
        &self,
        name: &str,
        value: &str,
        user_id: Option<i64>,
        pref_type: PrefType,
        out: &mut W,
    ) -> Result<Vec<PrefUpdate>> {
        let value = pref_type.coerce(value);
        let repo = UserRepository::new(self.db);

        let mut updates = Vec::new();
        for user in repo.select(user_id)? {
            write!(out, "Updating prefs for user {}...", user.user_id)?;

            let mut prefs = user.preferences.clone();
            prefs.insert(name.to_string(), value.clone());

            let saved = prefs != user.preferences;
            if saved {
                repo.save_preferences(user.user_id, &prefs)?;
                writeln!(out, "saved.")?;
            } else {
                writeln!(out, "nothing changed.")?;
            }

            updates.push(PrefUpdate {
                user_id: user.user_id,
                saved,
            });
        }

        info!(
            "preference '{}' saved for {} of {} users",
            name,
            updates.iter().filter(|u| u.saved).count(),
            updates.len()
        );
        Ok(updates)
    }
}
