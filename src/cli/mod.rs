pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "ph")]
#[command(about = "Post Hole CLI - drive a Post Hole server over HTTP")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server base URL (default: POSTHOLE_URL or http://127.0.0.1:8000)")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Operations on items across all models")]
    Items {
        #[command(subcommand)]
        cmd: commands::items::ItemsCommands,
    },

    #[command(about = "Operations scoped to one model name")]
    Models {
        #[command(subcommand)]
        cmd: commands::models::ModelsCommands,
    },
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

impl Cli {
    /// Resolve the server base URL: flag, then env, then localhost default
    pub fn base_url(&self) -> String {
        self.url
            .clone()
            .or_else(|| std::env::var("POSTHOLE_URL").ok())
            .unwrap_or_else(|| "http://127.0.0.1:8000".to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = client::ApiClient::new(cli.base_url());

    match cli.command {
        Commands::Items { cmd } => commands::items::handle(cmd, &client, output_format).await,
        Commands::Models { cmd } => commands::models::handle(cmd, &client, output_format).await,
    }
}
