//! Webmail data repositories
//!
//! SQL access to the application tables the maintenance tasks touch:
//! - users (account enumeration, preferences)
//! - contacts (address book entries and their search words)

mod contacts;
mod users;

pub use contacts::{ContactRecord, ContactRepository};
pub use users::{Preferences, UserRecord, UserRepository};
