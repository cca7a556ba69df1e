use anyhow::Result;
use clap::Args;
use mailkeep::{DatabaseConn, MailkeepConfig, SchemaInstaller};
use std::path::PathBuf;

/// Arguments for the Init command
#[derive(Args)]
pub struct InitArgs {
    /// Directory with the initial DDL file, defaults to the configured schema_dir
    #[clap(short, long)]
    pub dir: Option<PathBuf>,
}

pub fn run(config: &MailkeepConfig, db: &DatabaseConn, args: InitArgs) -> Result<()> {
    let dir = super::schema_dir(args.dir, config);
    let mut stdout = std::io::stdout();

    SchemaInstaller::new(db).install(&dir, &mut stdout)?;
    Ok(())
}
