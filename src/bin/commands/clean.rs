use anyhow::Result;
use clap::Args;
use mailkeep::{CleanLens, DatabaseConn, MailkeepConfig};
use tracing::info;

/// Arguments for the Clean command
#[derive(Args)]
pub struct CleanArgs {
    /// Keep deleted records younger than this many days, defaults to retention_days
    #[clap(short, long)]
    pub days: Option<u32>,
}

pub fn run(config: &MailkeepConfig, db: &DatabaseConn, args: CleanArgs) -> Result<()> {
    let days = args.days.unwrap_or(config.retention_days);
    let mut stdout = std::io::stdout();

    let results = CleanLens::new(db).clean(days, &mut stdout)?;
    info!(
        "{} records purged in total",
        results.iter().map(|r| r.deleted).sum::<usize>()
    );
    Ok(())
}
