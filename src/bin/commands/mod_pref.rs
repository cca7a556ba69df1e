use anyhow::Result;
use clap::Args;
use mailkeep::{DatabaseConn, PrefType, PrefsLens};

/// Arguments for the ModPref command
#[derive(Args)]
pub struct ModPrefArgs {
    /// Preference name
    pub name: String,

    /// New value; an empty value is false for bool and 0 for int
    #[clap(default_value = "")]
    pub value: String,

    /// Only update this user
    #[clap(short, long)]
    pub user_id: Option<i64>,

    /// Value type: bool, int or string
    #[clap(short = 't', long = "type", default_value = "string")]
    pub pref_type: String,
}

pub fn run(db: &DatabaseConn, args: ModPrefArgs) -> Result<()> {
    let ModPrefArgs {
        name,
        value,
        user_id,
        pref_type,
    } = args;

    let mut stdout = std::io::stdout();
    PrefsLens::new(db).modify(
        &name,
        &value,
        user_id,
        PrefType::parse(&pref_type),
        &mut stdout,
    )?;
    Ok(())
}
