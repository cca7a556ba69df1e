use anyhow::Result;
use clap::Args;
use mailkeep::{DatabaseConn, MailkeepConfig, SchemaInstaller};

/// Arguments for the Status command
#[derive(Args)]
pub struct StatusArgs {
    /// Component whose schema status is shown
    #[clap(short, long, default_value = "webmail")]
    pub package: String,

    /// Also show row counts of the webmail tables
    #[clap(short, long)]
    pub verbose: bool,
}

const COUNTED_TABLES: &[&str] = &[
    "users",
    "contacts",
    "contactgroups",
    "identities",
    "responses",
];

pub fn run(config: &MailkeepConfig, args: StatusArgs, debug: bool) -> Result<()> {
    let StatusArgs { package, verbose } = args;

    println!("{}", config.summary());
    println!();

    let mut db = match DatabaseConn::connect(&config.db_dsnw) {
        Ok(db) => db.with_table_prefix(&config.db_prefix),
        Err(e) => {
            println!("Database:           unavailable ({})", e);
            return Ok(());
        }
    };
    db.set_debug(debug);

    println!("Driver:             {}", db.provider());
    println!(
        "System Table:       {}",
        if db.table_exists("system")? {
            "present"
        } else {
            "missing"
        }
    );
    println!(
        "Schema Status:      {} {}",
        package,
        SchemaInstaller::new(&db).check_status(&package)?
    );

    if verbose {
        for table in COUNTED_TABLES {
            let count = if db.table_exists(table)? {
                db.table_count(table)?.to_string()
            } else {
                "-".to_string()
            };
            println!("  {:<16} {}", db.table_name(table), count);
        }
    }

    Ok(())
}
