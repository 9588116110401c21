use clap::Subcommand;
use reqwest::Method;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_value, read_stdin_json};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ModelsCommands {
    #[command(about = "Show per-model counts and version histograms")]
    List,

    #[command(about = "List items of one model")]
    Items {
        #[arg(help = "Model name")]
        model: String,
        #[arg(long, help = "Include soft-deleted items")]
        show_deleted: bool,
        #[arg(long, help = "Page size")]
        limit: Option<i64>,
        #[arg(long, help = "Rows to skip")]
        offset: Option<i64>,
    },

    #[command(about = "Create an item under a model from a JSON payload on stdin")]
    Create {
        #[arg(help = "Model name")]
        model: String,
        #[arg(long, help = "Version tag for the stored item")]
        version: Option<f64>,
    },
}

pub async fn handle(
    cmd: ModelsCommands,
    client: &ApiClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ModelsCommands::List => {
            let data = client.get("/model/list", &[]).await?;
            output_value(&output_format, &data)
        }
        ModelsCommands::Items { model, show_deleted, limit, offset } => {
            let mut query = vec![("show_deleted", show_deleted.to_string())];
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(offset) = offset {
                query.push(("offset", offset.to_string()));
            }
            let data = client.get(&format!("/model/{}", model), &query).await?;
            output_value(&output_format, &data)
        }
        ModelsCommands::Create { model, version } => {
            let payload = read_stdin_json()?;
            let mut query = Vec::new();
            if let Some(version) = version {
                query.push(("version", version.to_string()));
            }
            let data =
                client.send_json(Method::POST, &format!("/model/{}", model), &query, &payload).await?;
            output_value(&output_format, &data)
        }
    }
}
