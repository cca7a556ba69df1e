//! Lens module
//!
//! Lenses hold the maintenance operations that sit on top of the database
//! layer. Each lens borrows a [`DatabaseConn`](crate::database::DatabaseConn),
//! writes operator-facing progress lines to a caller-supplied writer, and
//! returns typed results so the CLI and tests can inspect what happened.
//!
//! | Lens | Operation |
//! |------|-----------|
//! | `CleanLens` | purge soft-deleted rows past the retention window |
//! | `IndexLens` | rebuild contact search words for every user |
//! | `PrefsLens` | set one preference for all users or a single user |
//!
//! Schema install and upgrade live in [`crate::database::core`] since they
//! operate on the schema rather than on user data.
//!
//! ```rust,ignore
//! use mailkeep::database::DatabaseConn;
//! use mailkeep::lens::clean::CleanLens;
//!
//! let db = DatabaseConn::connect("sqlite:///webmail.db")?;
//! let results = CleanLens::new(&db).clean(7, &mut std::io::stdout())?;
//! ```

pub mod utils;

pub mod clean;
pub mod index;
pub mod prefs;
