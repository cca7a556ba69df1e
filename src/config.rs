use crate::error::AdminError;
use anyhow::{anyhow, Result};
use config::Config;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Mail host setting: a single host or a list of hosts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HostSetting {
    Single(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailkeepConfig {
    /// Write-capable database connection string
    pub db_dsnw: String,

    /// Prefix prepended to every table name
    pub db_prefix: String,

    /// Log every SQL statement at debug level
    pub sql_debug: bool,

    /// Default mail host for account-oriented commands
    pub imap_host: Option<HostSetting>,

    /// Directory holding `<dialect>.initial.sql` and `<dialect>/<N>.sql`
    pub schema_dir: String,

    /// Abort `update` with an error when a script fails
    pub strict_upgrade: bool,

    /// Age in days after which deleted records are purged
    pub retention_days: u32,
}

const EMPTY_CONFIG: &str = r#"### mailkeep configuration file

### write-capable database connection
# db_dsnw = "sqlite:////var/lib/webmail/webmail.db"

### prefix for all table names
# db_prefix = ""

### log every SQL statement (same as --debug)
# sql_debug = false

### default mail host, a single name or a list with exactly one entry
# imap_host = "localhost"

### directory with <dialect>.initial.sql and <dialect>/<version>.sql
# schema_dir = "sql"

### fail `update` with an error status on the first failing script
# strict_upgrade = true

### days to keep deleted contacts, groups, identities and responses
# retention_days = 7
"#;

impl Default for MailkeepConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            db_dsnw: format!("sqlite:///{}/.mailkeep/webmail.db", home_dir),
            db_prefix: String::new(),
            sql_debug: false,
            imap_host: None,
            schema_dir: "sql".to_string(),
            strict_upgrade: true,
            retention_days: 7,
        }
    }
}

impl MailkeepConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<MailkeepConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                let mailkeep_dir = Self::config_dir()?;
                std::fs::create_dir_all(mailkeep_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create mailkeep directory: {}", e))?;
                let p = format!("{}/mailkeep.toml", mailkeep_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of MAILKEEP)
        // E.g., `MAILKEEP_DB_PREFIX=rc_ mailkeep clean` would set the table prefix
        builder = builder.add_source(
            config::Environment::with_prefix("MAILKEEP")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("imap_host"),
        );

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        Self::from_settings(settings)
    }

    /// Deserialize already-merged settings, filling in defaults
    pub fn from_settings(settings: Config) -> Result<MailkeepConfig> {
        settings
            .try_deserialize::<MailkeepConfig>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))
    }

    fn config_dir() -> Result<String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        Ok(format!("{}/.mailkeep", home_dir))
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.mailkeep/mailkeep.toml", home_dir)
    }

    /// Resolve the mail host for account-oriented commands
    ///
    /// An explicit, non-empty argument wins. Otherwise the configured
    /// `imap_host` is used when it names exactly one host. URL-style values
    /// such as `ssl://imap.example.com:993` and `host:port` pairs are
    /// reduced to their host part.
    pub fn resolve_host(&self, arg: Option<&str>) -> std::result::Result<String, AdminError> {
        let candidate = match arg.map(str::trim).filter(|s| !s.is_empty()) {
            Some(host) => host.to_string(),
            None => match &self.imap_host {
                Some(HostSetting::Single(host)) if !host.trim().is_empty() => {
                    host.trim().to_string()
                }
                Some(HostSetting::List(hosts)) if hosts.len() == 1 => hosts[0].trim().to_string(),
                _ => return Err(AdminError::NoHost),
            },
        };

        if candidate.is_empty() {
            return Err(AdminError::NoHost);
        }
        Ok(host_part(&candidate))
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let hosts = match &self.imap_host {
            None => "(none)".to_string(),
            Some(HostSetting::Single(h)) => h.clone(),
            Some(HostSetting::List(l)) => l.join(", "),
        };
        let prefix = if self.db_prefix.is_empty() {
            "(none)"
        } else {
            self.db_prefix.as_str()
        };

        [
            format!("Config File:        {}", Self::config_file_path()),
            format!("Database DSN:       {}", self.db_dsnw),
            format!("Table Prefix:       {}", prefix),
            format!("SQL Debug:          {}", self.sql_debug),
            format!("Mail Host:          {}", hosts),
            format!("Schema Directory:   {}", self.schema_dir),
            format!("Strict Upgrade:     {}", self.strict_upgrade),
            format!("Retention:          {} days", self.retention_days),
        ]
        .join("\n")
    }
}

/// Host part of a `scheme://host:port` or `host:port` value
///
/// Bare IPv6 addresses and values that do not parse as a host pass
/// through unchanged.
fn host_part(value: &str) -> String {
    let parsed = if value.contains("://") {
        Url::parse(value)
    } else if value.matches(':').count() > 1 && !value.starts_with('[') {
        // bare IPv6 address
        return value.to_string();
    } else {
        Url::parse(&format!("imap://{}", value))
    };
    match parsed {
        Ok(url) => url
            .host_str()
            .filter(|h| !h.is_empty())
            .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
            .unwrap_or_else(|| value.to_string()),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> MailkeepConfig {
        let settings = Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        MailkeepConfig::from_settings(settings).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = MailkeepConfig::default();
        assert!(config.db_dsnw.starts_with("sqlite:///"));
        assert!(config.db_dsnw.ends_with("/.mailkeep/webmail.db"));
        assert_eq!(config.schema_dir, "sql");
        assert_eq!(config.retention_days, 7);
        assert!(config.strict_upgrade);
        assert!(config.imap_host.is_none());
    }

    #[test]
    fn test_empty_template_gives_defaults() {
        assert_eq!(from_toml(EMPTY_CONFIG), MailkeepConfig::default());
    }

    #[test]
    fn test_file_values() {
        let config = from_toml(
            r#"
            db_dsnw = "sqlite:////var/lib/webmail/db.sqlite"
            db_prefix = "rc_"
            sql_debug = true
            imap_host = ["imap.example.com", "imap2.example.com"]
            strict_upgrade = false
            retention_days = 30
            "#,
        );
        assert_eq!(config.db_dsnw, "sqlite:////var/lib/webmail/db.sqlite");
        assert_eq!(config.db_prefix, "rc_");
        assert!(config.sql_debug);
        assert!(!config.strict_upgrade);
        assert_eq!(config.retention_days, 30);
        assert_eq!(
            config.imap_host,
            Some(HostSetting::List(vec![
                "imap.example.com".to_string(),
                "imap2.example.com".to_string()
            ]))
        );
    }

    #[test]
    fn test_new_creates_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailkeep.toml");
        let path_str = path.to_string_lossy().to_string();

        let config = MailkeepConfig::new(&Some(path_str)).unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EMPTY_CONFIG);
        assert_eq!(config.schema_dir, "sql");
    }

    #[test]
    fn test_resolve_host_argument_wins() {
        let config = from_toml(r#"imap_host = "configured.example.com""#);
        assert_eq!(
            config.resolve_host(Some("cli.example.com")).unwrap(),
            "cli.example.com"
        );
        assert_eq!(
            config.resolve_host(Some("")).unwrap(),
            "configured.example.com"
        );
        assert_eq!(config.resolve_host(None).unwrap(), "configured.example.com");
    }

    #[test]
    fn test_resolve_host_from_list() {
        let single = from_toml(r#"imap_host = ["only.example.com"]"#);
        assert_eq!(single.resolve_host(None).unwrap(), "only.example.com");

        let many = from_toml(r#"imap_host = ["a.example.com", "b.example.com"]"#);
        assert!(matches!(many.resolve_host(None), Err(AdminError::NoHost)));
    }

    #[test]
    fn test_resolve_host_missing() {
        let config = MailkeepConfig::default();
        let err = config.resolve_host(None).unwrap_err();
        assert!(matches!(err, AdminError::NoHost));
        assert_eq!(err.to_string(), "Specify a host name");
    }

    #[test]
    fn test_resolve_host_url() {
        let config = from_toml(r#"imap_host = "tls://192.168.12.44:993""#);
        assert_eq!(config.resolve_host(None).unwrap(), "192.168.12.44");
        assert_eq!(
            config.resolve_host(Some("ssl://imap.example.com")).unwrap(),
            "imap.example.com"
        );
        assert_eq!(config.resolve_host(Some("localhost")).unwrap(), "localhost");
    }

    #[test]
    fn test_resolve_host_with_port() {
        let config = from_toml(r#"imap_host = "imap.example.com:143""#);
        assert_eq!(config.resolve_host(None).unwrap(), "imap.example.com");
        assert_eq!(
            config.resolve_host(Some("192.168.12.44:993")).unwrap(),
            "192.168.12.44"
        );
        assert_eq!(config.resolve_host(Some("[::1]:143")).unwrap(), "::1");
        assert_eq!(config.resolve_host(Some("::1")).unwrap(), "::1");
    }
}
