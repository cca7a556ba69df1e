use anyhow::{anyhow, Result};
use clap::Args;
use mailkeep::{
    DatabaseConn, MailkeepConfig, SchemaUpgrader, StartingVersion, UpgradeOptions, UpgradeStatus,
};
use std::path::PathBuf;

/// Arguments for the Update command
#[derive(Args)]
pub struct UpdateArgs {
    /// Directory with <dialect>/<version>.sql files, defaults to the configured schema_dir
    #[clap(short, long)]
    pub dir: Option<PathBuf>,

    /// Component whose schema is upgraded
    #[clap(short, long, default_value = "webmail")]
    pub package: String,

    /// Release the installation was running before versions were tracked, e.g. 0.8.1
    #[clap(short = 'r', long = "from-release")]
    pub from_release: Option<String>,

    /// Do not print per-file progress
    #[clap(short, long)]
    pub quiet: bool,

    /// Report failures without aborting, overrides strict_upgrade
    #[clap(long)]
    pub lenient: bool,
}

pub fn run(config: &MailkeepConfig, db: &DatabaseConn, args: UpdateArgs) -> Result<()> {
    let UpdateArgs {
        dir,
        package,
        from_release,
        quiet,
        lenient,
    } = args;

    let dir = super::schema_dir(dir, config);
    let opts = UpgradeOptions {
        errors: config.strict_upgrade && !lenient,
        quiet,
    };

    let mut stdout = std::io::stdout();
    let report = SchemaUpgrader::new(db).run(
        &dir,
        &package,
        from_release.as_deref(),
        &opts,
        &mut stdout,
    )?;

    match report.status {
        UpgradeStatus::Completed => {
            if !quiet {
                match (&report.start, report.applied.last()) {
                    (_, Some(last)) => println!(
                        "{} upgrade(s) applied, {} schema is now at version {}",
                        report.applied.len(),
                        package,
                        last
                    ),
                    (Some(StartingVersion::Tracked(v)), None) => {
                        println!("{} schema is up to date (version {})", package, v)
                    }
                    (_, None) => println!("{} schema is up to date", package),
                }
            }
            Ok(())
        }
        UpgradeStatus::MissingSchemaDir(path) => Err(anyhow!(
            "Schema directory not found: {}",
            path.display()
        )),
        UpgradeStatus::MissingDialectDir(path) => Err(anyhow!(
            "No upgrade scripts for driver {}: {} not found",
            db.provider(),
            path.display()
        )),
        UpgradeStatus::Failed { version, message } => Err(anyhow!(
            "Error in DDL upgrade {}: {}",
            version,
            message
        )),
    }
}
