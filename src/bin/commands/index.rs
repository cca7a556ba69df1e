use anyhow::Result;
use clap::Args;
use mailkeep::{DatabaseConn, IndexLens};

/// Arguments for the IndexContacts command
#[derive(Args)]
pub struct IndexArgs {}

pub fn run(db: &DatabaseConn, _args: IndexArgs) -> Result<()> {
    let mut stdout = std::io::stdout();
    IndexLens::new(db).reindex(&mut stdout)?;
    Ok(())
}
