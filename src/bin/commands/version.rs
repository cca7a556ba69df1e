use anyhow::Result;
use clap::Args;
use mailkeep::{DatabaseConn, VersionTracker};

/// Arguments for the Version command
#[derive(Args)]
pub struct VersionArgs {
    /// Component to look up
    #[clap(short, long, default_value = "webmail")]
    pub package: String,
}

pub fn run(db: &DatabaseConn, args: VersionArgs) -> Result<()> {
    match VersionTracker::new(db).get_version(&args.package)? {
        Some(version) => println!("{}: {}", args.package, version),
        None => println!("{}: not tracked", args.package),
    }
    Ok(())
}
