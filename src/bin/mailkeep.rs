use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use mailkeep::*;
use tracing::{debug, Level};

mod commands;

use commands::clean::CleanArgs;
use commands::host::HostArgs;
use commands::index::IndexArgs;
use commands::init::InitArgs;
use commands::mod_pref::ModPrefArgs;
use commands::status::StatusArgs;
use commands::update::UpdateArgs;
use commands::version::VersionArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.mailkeep/mailkeep.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information, including every SQL statement
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema from the initial DDL file
    Init(InitArgs),

    /// Apply numbered schema upgrade files
    Update(UpdateArgs),

    /// Show the tracked schema version of a component
    Version(VersionArgs),

    /// Purge deleted records older than the retention window
    Clean(CleanArgs),

    /// Rebuild the search words of all address book entries
    IndexContacts(IndexArgs),

    /// Set a user preference for all users or a single user
    ModPref(ModPrefArgs),

    /// Resolve the mail host used by account scripts
    Host(HostArgs),

    /// Show configuration and database status
    Status(StatusArgs),
}

/// Open the write connection described by the configuration
fn open_database(config: &MailkeepConfig, debug: bool) -> Result<DatabaseConn> {
    let mut db = DatabaseConn::connect(&config.db_dsnw)
        .map_err(|e| anyhow!("Unable to connect to {}: {}", config.db_dsnw, e))?
        .with_table_prefix(&config.db_prefix);
    db.set_debug(debug || config.sql_debug);
    debug!("connected to {} ({})", config.db_dsnw, db.provider());
    Ok(db)
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match MailkeepConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let debug = cli.debug || config.sql_debug;
    tracing_subscriber::fmt()
        .with_max_level(if debug { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Host(args) => commands::host::run(&config, args),
        Commands::Status(args) => commands::status::run(&config, args, debug),
        command => open_database(&config, debug).and_then(|db| match command {
            Commands::Init(args) => commands::init::run(&config, &db, args),
            Commands::Update(args) => commands::update::run(&config, &db, args),
            Commands::Version(args) => commands::version::run(&db, args),
            Commands::Clean(args) => commands::clean::run(&config, &db, args),
            Commands::IndexContacts(args) => commands::index::run(&db, args),
            Commands::ModPref(args) => commands::mod_pref::run(&db, args),
            Commands::Host(_) | Commands::Status(_) => Ok(()),
        }),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
