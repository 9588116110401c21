use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::config;
use crate::database::{DatabaseManager, ItemDraft, ItemPatch, ItemRepository, ListOptions};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Include soft-deleted items in the listing
    pub show_deleted: Option<bool>,
    /// Pagination (optional)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReadQuery {
    pub show_deleted: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    /// Allow patching an item that is already soft-deleted
    pub update_deleted: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// Remove the row entirely instead of marking it deleted
    pub permanent: Option<bool>,
}

async fn repository() -> Result<ItemRepository, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ItemRepository::new(pool))
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id)
        .map_err(|_| ApiError::bad_request(format!("Invalid item id: {}", id)))
}

/// Unwrap a JSON body, turning extractor rejections (malformed JSON, wrong
/// content type) into the same error envelope every other failure uses
pub(crate) fn json_payload(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
    }
}

/// GET /items - List all items in the database
pub async fn list_items(Query(query): Query<ListQuery>) -> ApiResult<Value> {
    let api = &config().api;
    let repository = repository().await?;

    let items = repository
        .list(ListOptions {
            show_deleted: query.show_deleted.unwrap_or(api.show_deleted_default),
            model: None,
            limit: query.limit.unwrap_or(api.default_limit),
            offset: query.offset.unwrap_or(0),
        })
        .await?;

    Ok(ApiResponse::success(json!(items)))
}

/// GET /item/:id - Return a specific item by its ID
pub async fn read_item(
    Path(id): Path<String>,
    Query(query): Query<ReadQuery>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let repository = repository().await?;
    let item = repository.fetch_404(id).await?;

    // A soft-deleted item looks absent unless explicitly requested
    let show_deleted = query.show_deleted.unwrap_or(config().api.show_deleted_default);
    if item.deleted && !show_deleted {
        return Err(ApiError::not_found("Item not found"));
    }

    Ok(ApiResponse::success(json!(item)))
}

/// POST / - Create a new item in the database
pub async fn create_item(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let payload = json_payload(payload)?;
    let draft: ItemDraft =
        serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))?;
    draft.validate()?;

    let repository = repository().await?;
    let item = repository.insert(draft).await?;

    Ok(ApiResponse::created(json!(item)))
}

/// PUT /item/:id - Replace an item
///
/// All caller-editable fields are overwritten with the payload or its
/// defaults. For partial updates, use PATCH.
pub async fn replace_item(
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let payload = json_payload(payload)?;
    let draft: ItemDraft =
        serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))?;
    draft.validate()?;

    let repository = repository().await?;
    let mut item = repository.fetch_404(id).await?;

    item.model = draft.model;
    item.version = draft.version;
    item.data = draft.data;
    item.deleted = draft.deleted;

    let item = repository.save(item).await?;
    Ok(ApiResponse::success(json!(item)))
}

/// PATCH /item/:id - Partially update an item
///
/// Only fields present in the payload change. The contents of `data` are
/// replaced wholesale, not merged.
pub async fn update_item(
    Path(id): Path<String>,
    Query(query): Query<UpdateQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let payload = json_payload(payload)?;
    let patch: ItemPatch =
        serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))?;
    patch.validate()?;

    let repository = repository().await?;
    let mut item = repository.fetch_404(id).await?;

    let update_deleted = query.update_deleted.unwrap_or(config().api.update_deleted_default);
    if item.deleted && !update_deleted {
        return Err(ApiError::not_found("Item not found"));
    }

    patch.apply_to(&mut item);
    let item = repository.save(item).await?;
    Ok(ApiResponse::success(json!(item)))
}

/// DELETE /item/:id - Delete an item
///
/// Soft delete by default; permanent=true removes the row from the database.
pub async fn delete_item(
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let repository = repository().await?;
    let mut item = repository.fetch_404(id).await?;

    let permanent = query.permanent.unwrap_or(config().api.delete_permanent_default);
    if permanent {
        repository.hard_delete(id).await?;
    } else {
        item.deleted = true;
        repository.save(item).await?;
    }

    Ok(ApiResponse::success(json!({ "ok": true })))
}
