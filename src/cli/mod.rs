pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "cmrp")]
#[command(about = "CMRP CLI - Operator interface for the directory admin API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        default_value = "http://localhost:3000",
        help = "Base URL of a running admin API server"
    )]
    pub server: String,

    #[arg(long, global = true, help = "Bearer token forwarded to admin endpoints")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Capture a full directory backup")]
    Backup,

    #[command(about = "Restore a named backup file into the directory")]
    Restore {
        #[arg(help = "Backup object key, e.g. cmrp-users_backup_<timestamp>.json")]
        file: String,
    },

    #[command(about = "Probe directory health")]
    Health,

    #[command(about = "List directory users with role counts")]
    ListUsers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = utils::ApiClient::new(cli.server.clone(), cli.token.clone());

    match cli.command {
        Commands::Backup => commands::backup::handle(&client, output_format).await,
        Commands::Restore { file } => commands::restore::handle(&client, &file, output_format).await,
        Commands::Health => commands::health::handle(&client, output_format).await,
        Commands::ListUsers => commands::users::handle(&client, output_format).await,
    }
}
