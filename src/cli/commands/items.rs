use clap::Subcommand;
use reqwest::Method;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_value, read_stdin_json};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ItemsCommands {
    #[command(about = "List items across all models")]
    List {
        #[arg(long, help = "Include soft-deleted items")]
        show_deleted: bool,
        #[arg(long, help = "Page size")]
        limit: Option<i64>,
        #[arg(long, help = "Rows to skip")]
        offset: Option<i64>,
    },

    #[command(about = "Fetch one item by id")]
    Get {
        #[arg(help = "Item id")]
        id: String,
        #[arg(long, help = "Return the item even when soft-deleted")]
        show_deleted: bool,
    },

    #[command(about = "Create an item from a JSON payload on stdin")]
    Create,

    #[command(about = "Replace an item from a JSON payload on stdin")]
    Replace {
        #[arg(help = "Item id")]
        id: String,
    },

    #[command(about = "Partially update an item from a JSON payload on stdin")]
    Update {
        #[arg(help = "Item id")]
        id: String,
        #[arg(long, help = "Allow patching a soft-deleted item")]
        update_deleted: bool,
    },

    #[command(about = "Delete an item (soft delete unless --permanent)")]
    Delete {
        #[arg(help = "Item id")]
        id: String,
        #[arg(long, help = "Remove the row entirely")]
        permanent: bool,
    },
}

pub async fn handle(
    cmd: ItemsCommands,
    client: &ApiClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ItemsCommands::List { show_deleted, limit, offset } => {
            let mut query = vec![("show_deleted", show_deleted.to_string())];
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(offset) = offset {
                query.push(("offset", offset.to_string()));
            }
            let data = client.get("/items", &query).await?;
            output_value(&output_format, &data)
        }
        ItemsCommands::Get { id, show_deleted } => {
            let query = vec![("show_deleted", show_deleted.to_string())];
            let data = client.get(&format!("/item/{}", id), &query).await?;
            output_value(&output_format, &data)
        }
        ItemsCommands::Create => {
            let payload = read_stdin_json()?;
            let data = client.send_json(Method::POST, "/", &[], &payload).await?;
            output_value(&output_format, &data)
        }
        ItemsCommands::Replace { id } => {
            let payload = read_stdin_json()?;
            let data =
                client.send_json(Method::PUT, &format!("/item/{}", id), &[], &payload).await?;
            output_value(&output_format, &data)
        }
        ItemsCommands::Update { id, update_deleted } => {
            let payload = read_stdin_json()?;
            let query = vec![("update_deleted", update_deleted.to_string())];
            let data =
                client.send_json(Method::PATCH, &format!("/item/{}", id), &query, &payload).await?;
            output_value(&output_format, &data)
        }
        ItemsCommands::Delete { id, permanent } => {
            let query = vec![("permanent", permanent.to_string())];
            let data = client.delete(&format!("/item/{}", id), &query).await?;
            output_value(&output_format, &data)
        }
    }
}
