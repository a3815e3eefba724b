use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod agenda;
pub mod init;
pub mod migrate;
pub mod serve;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Create the database
    Init {
        #[arg(long, action, default_value = "false")]
        db: bool,
    },
    /// Migrate the db schema
    Migrate {
        #[arg(long, action, default_value = "false")]
        db: bool,
    },
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Print a tutor's agenda for a day
    Agenda {
        #[arg(long)]
        tutor: i64,
        /// YYYYMMDD or YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Client UTC offset in minutes, e.g. -420 for UTC-7
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<String>,
        /// Also print every lesson date for the tutor
        #[arg(long, action, default_value = "false")]
        dates: bool,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init { db }) => {
            init::run(db, &config.db_path).await?;
        }
        Some(Command::Migrate { db }) => {
            migrate::run(db, &config.db_path).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Agenda {
            tutor,
            date,
            offset,
            dates,
        }) => {
            agenda::run(tutor, date, offset, dates, &config).await?;
        }
        None => {}
    }

    Ok(())
}
