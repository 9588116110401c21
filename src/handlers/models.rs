use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::config;
use crate::database::{DatabaseManager, ItemDraft, ItemRepository, ListOptions};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::items::{json_payload, ListQuery};

#[derive(Debug, Deserialize)]
pub struct CreateQuery {
    /// Version tag for the stored item
    pub version: Option<f64>,
}

async fn repository() -> Result<ItemRepository, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ItemRepository::new(pool))
}

/// GET /model/list - Get information about models
///
/// Returns one entry per model name with counts, oldest/newest created
/// timestamps and a version histogram.
pub async fn model_list() -> ApiResult<Value> {
    let repository = repository().await?;
    let summaries = repository.model_summaries().await?;
    Ok(ApiResponse::success(json!(summaries)))
}

/// GET /model/:model_name - List all items of a particular model
pub async fn model_items(
    Path(model_name): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Value> {
    let api = &config().api;
    let repository = repository().await?;

    let items = repository
        .list(ListOptions {
            show_deleted: query.show_deleted.unwrap_or(api.show_deleted_default),
            model: Some(model_name),
            limit: query.limit.unwrap_or(api.default_limit),
            offset: query.offset.unwrap_or(0),
        })
        .await?;

    Ok(ApiResponse::success(json!(items)))
}

/// POST /model/:model_name - Create an item with the model name in the URL
///
/// The whole request body becomes the item's data, so completely schema-free
/// payloads work here. The optional version query param tags the item.
pub async fn model_create(
    Path(model_name): Path<String>,
    Query(query): Query<CreateQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let payload = json_payload(payload)?;
    let draft = ItemDraft {
        model: model_name,
        version: query.version.unwrap_or(config().api.create_version_default),
        data: payload,
        deleted: false,
    };
    draft.validate()?;

    let repository = repository().await?;
    let item = repository.insert(draft).await?;
    Ok(ApiResponse::created(json!(item)))
}
