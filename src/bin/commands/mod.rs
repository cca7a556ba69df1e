pub mod clean;
pub mod host;
pub mod index;
pub mod init;
pub mod mod_pref;
pub mod status;
pub mod update;
pub mod version;

use std::path::PathBuf;

/// Schema directory from the command line, falling back to the configured one
pub(crate) fn schema_dir(arg: Option<PathBuf>, config: &mailkeep::MailkeepConfig) -> PathBuf {
    arg.unwrap_or_else(|| PathBuf::from(&config.schema_dir))
}
