//! Numbered schema upgrades
//!
//! Upgrade files live in `<dir>/<driver>/` and are named `<version>.sql`.
//! Files newer than the current version are applied in ascending numeric
//! order, and the tracked version is advanced after each one.

use crate::database::core::{DatabaseConn, VersionTracker};
use crate::error::{AdminError, Result};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

static UPGRADE_FILE_PATTERN: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

/// Assumed version of databases created before the system table existed
pub const PRE_TRACKING_VERSION: u64 = 2012080700;

/// First upgrade version that records itself in the system table
pub const VERSIONING_CUTOFF: u64 = 2013011000;

/// Release strings of versions that predate schema version tracking
///
/// Consulted only when no version row exists. This table is frozen and
/// must not grow with new releases.
pub const LEGACY_RELEASE_VERSIONS: &[(&str, u64)] = &[
    ("0.1-stable", 1),
    ("0.1.1", 2008030300),
    ("0.2-alpha", 2008040500),
    ("0.2-beta", 2008060900),
    ("0.2-stable", 2008092100),
    ("0.2.1", 2008092100),
    ("0.2.2", 2008092100),
    ("0.3-stable", 2008092100),
    ("0.3.1", 2009090400),
    ("0.4-beta", 2009103100),
    ("0.4", 2010042300),
    ("0.4.1", 2010042300),
    ("0.4.2", 2010042300),
    ("0.5-beta", 2010100600),
    ("0.5", 2010100600),
    ("0.5.1", 2010100600),
    ("0.5.2", 2010100600),
    ("0.5.3", 2010100600),
    ("0.5.4", 2010100600),
    ("0.6-beta", 2011011200),
    ("0.6", 2011011200),
    ("0.7-beta", 2011092800),
    ("0.7", 2011111600),
    ("0.7.1", 2011111600),
    ("0.7.2", 2011111600),
    ("0.7.3", 2011111600),
    ("0.7.4", 2011111600),
    ("0.8-beta", 2011121400),
    ("0.8-rc", 2011121400),
    ("0.8.0", 2011121400),
    ("0.8.1", 2011121400),
    ("0.8.2", 2011121400),
    ("0.8.3", 2011121400),
    ("0.8.4", 2011121400),
    ("0.8.5", 2011121400),
    ("0.8.6", 2011121400),
    ("0.9-beta", 2012080700),
];

/// Map a legacy release string to its schema version
pub fn legacy_version(release: &str) -> Option<u64> {
    LEGACY_RELEASE_VERSIONS
        .iter()
        .find(|(r, _)| *r == release)
        .map(|(_, v)| *v)
}

/// Options controlling upgrade behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeOptions {
    /// Turn failures into errors instead of an unsuccessful report
    pub errors: bool,
    /// Suppress per-file progress lines
    pub quiet: bool,
}

/// Where the starting version came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartingVersion {
    /// Read from the system table
    Tracked(u64),
    /// Mapped from a legacy release string
    Legacy { release: String, version: u64 },
    /// Nothing known; assume the last release before version tracking
    Fallback(u64),
}

impl StartingVersion {
    pub fn version(&self) -> u64 {
        match self {
            StartingVersion::Tracked(v) => *v,
            StartingVersion::Legacy { version, .. } => *version,
            StartingVersion::Fallback(v) => *v,
        }
    }
}

impl std::fmt::Display for StartingVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartingVersion::Tracked(v) => write!(f, "{} (tracked)", v),
            StartingVersion::Legacy { release, version } => {
                write!(f, "{} (from release {})", version, release)
            }
            StartingVersion::Fallback(v) => write!(f, "{} (assumed)", v),
        }
    }
}

/// Terminal state of an upgrade run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// All pending files were applied (possibly none)
    Completed,
    /// The schema directory does not exist
    MissingSchemaDir(PathBuf),
    /// The schema directory has no subdirectory for the driver
    MissingDialectDir(PathBuf),
    /// A file failed; later files were not attempted
    Failed { version: u64, message: String },
}

/// Result of an upgrade run
#[derive(Debug, Clone)]
pub struct UpgradeReport {
    pub component: String,
    pub start: Option<StartingVersion>,
    /// Versions applied successfully, in order
    pub applied: Vec<u64>,
    pub status: UpgradeStatus,
}

impl UpgradeReport {
    pub fn is_success(&self) -> bool {
        self.status == UpgradeStatus::Completed
    }
}

/// Applies numbered upgrade files to the database
pub struct SchemaUpgrader<'a> {
    db: &'a DatabaseConn,
}

impl<'a> SchemaUpgrader<'a> {
    pub fn new(db: &'a DatabaseConn) -> Self {
        Self { db }
    }

    /// Determine the version to upgrade from
    pub fn resolve_start(
        &self,
        component: &str,
        legacy_release: Option<&str>,
    ) -> Result<StartingVersion> {
        if let Some(version) = VersionTracker::new(self.db).get_version(component)? {
            return Ok(StartingVersion::Tracked(version));
        }

        if let Some(release) = legacy_release {
            if let Some(version) = legacy_version(release) {
                return Ok(StartingVersion::Legacy {
                    release: release.to_string(),
                    version,
                });
            }
            warn!("unknown legacy release '{}', assuming {}", release, PRE_TRACKING_VERSION);
        }

        Ok(StartingVersion::Fallback(PRE_TRACKING_VERSION))
    }

    /// Upgrade versions in `dir` newer than `start`, sorted numerically
    pub fn pending_versions(dir: &Path, start: u64) -> Result<Vec<u64>> {
        let re = UPGRADE_FILE_PATTERN
            .get_or_init(|| Regex::new(r"^([0-9]+)\.sql$"))
            .as_ref()
            .map_err(|e| AdminError::Config(format!("Invalid upgrade file pattern: {}", e)))?;

        let mut versions = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            // follows symlinks, packaged scripts are often linked in
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(caps) = name.to_str().and_then(|n| re.captures(n)) else {
                continue;
            };
            match caps[1].parse::<u64>() {
                Ok(v) if v > start => versions.push(v),
                Ok(_) => {}
                Err(_) => warn!("skipping upgrade file with oversized version: {}", &caps[0]),
            }
        }

        versions.sort_unstable();
        Ok(versions)
    }

    /// Update the schema of `component` using the files in `<dir>/<driver>/`
    ///
    /// Progress is printed to `out` unless `opts.quiet` is set. With
    /// `opts.errors` a missing directory or failed file is returned as an
    /// error; otherwise it is reported through [`UpgradeReport::status`].
    pub fn run<W: Write>(
        &self,
        dir: &Path,
        component: &str,
        legacy_release: Option<&str>,
        opts: &UpgradeOptions,
        out: &mut W,
    ) -> Result<UpgradeReport> {
        let mut report = UpgradeReport {
            component: component.to_string(),
            start: None,
            applied: Vec::new(),
            status: UpgradeStatus::Completed,
        };

        if !dir.exists() {
            if opts.errors {
                return Err(AdminError::SchemaDirNotFound(dir.to_path_buf()));
            }
            report.status = UpgradeStatus::MissingSchemaDir(dir.to_path_buf());
            return Ok(report);
        }

        let start = self.resolve_start(component, legacy_release)?;
        info!("{} schema version: {}", component, start);
        let start_version = start.version();
        report.start = Some(start);

        let dialect_dir = dir.join(self.db.provider());
        if !dialect_dir.exists() {
            if opts.errors {
                return Err(AdminError::DialectDirNotFound {
                    driver: self.db.provider().to_string(),
                    path: dialect_dir,
                });
            }
            report.status = UpgradeStatus::MissingDialectDir(dialect_dir);
            return Ok(report);
        }

        for version in Self::pending_versions(&dialect_dir, start_version)? {
            if !opts.quiet {
                write!(
                    out,
                    "Updating database schema for {} ({})... ",
                    component, version
                )?;
                out.flush()?;
            }

            let file = dialect_dir.join(format!("{}.sql", version));
            if let Err(e) = self.apply_file(component, version, &file) {
                if !opts.quiet {
                    writeln!(out, "[FAILED]")?;
                }
                let message = match e {
                    AdminError::Script { message, .. } => message,
                    other => other.to_string(),
                };
                if opts.errors {
                    return Err(AdminError::Script {
                        version: Some(version),
                        message,
                    });
                }
                report.status = UpgradeStatus::Failed { version, message };
                return Ok(report);
            }

            if !opts.quiet {
                writeln!(out, "[OK]")?;
            }
            info!("applied {} schema upgrade {}", component, version);
            report.applied.push(version);
        }

        Ok(report)
    }

    /// Run one upgrade file and record its version when past the cutoff
    fn apply_file(&self, component: &str, version: u64, file: &Path) -> Result<()> {
        let sql = std::fs::read_to_string(file)?;
        if !sql.trim().is_empty() {
            self.db.exec_script(&sql)?;
        }

        // older files predate the system table
        if version < VERSIONING_CUTOFF {
            return Ok(());
        }

        VersionTracker::new(self.db).set_version(component, version)
    }
}
