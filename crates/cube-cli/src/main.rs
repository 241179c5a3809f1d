mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cube::config::CONFIG_FILE;

#[derive(Parser)]
#[command(name = "cube")]
#[command(version, about = "Cube CLI - inspect routes and schemas", long_about = None)]
struct Cli {
    /// Path to the project configuration
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered route in dispatch order
    Routes,

    /// Resolve a request against the route table
    Match {
        /// HTTP method (GET, POST, ...)
        method: String,

        /// Request path, query string allowed
        path: String,
    },

    /// Render CREATE TABLE statements from a schema file
    Schema {
        /// Schema file with [[table]] entries
        file: PathBuf,

        /// SQL dialect to render
        #[arg(short, long, default_value = "sqlite")]
        dialect: Dialect,

        /// Run the statements against the configured database
        #[arg(long)]
        apply: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Dialect {
    Sqlite,
    Postgres,
    Mysql,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Routes => {
            commands::routes::execute(&cli.config)?;
        }
        Commands::Match { method, path } => {
            commands::resolve::execute(&cli.config, &method, &path)?;
        }
        Commands::Schema {
            file,
            dialect,
            apply,
        } => {
            commands::schema::execute(&cli.config, &file, dialect, apply).await?;
        }
    }

    Ok(())
}
