use anyhow::Result;
use clap::Args;
use mailkeep::MailkeepConfig;

/// Arguments for the Host command
#[derive(Args)]
pub struct HostArgs {
    /// Host name, overrides the configured imap_host
    #[clap(short = 'H', long)]
    pub host: Option<String>,
}

pub fn run(config: &MailkeepConfig, args: HostArgs) -> Result<()> {
    let host = config.resolve_host(args.host.as_deref())?;
    println!("{}", host);
    Ok(())
}
