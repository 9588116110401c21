use axum::extract::{Path, Query};
use axum::Form;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::config::config;
use crate::database::{DatabaseManager, ItemDraft, ItemRepository};
use crate::middleware::{ApiResponse, ApiResult};

use super::models::CreateQuery;

/// POST /form/:model_name - Create an item by submitting form data
///
/// Point a web form's action at this endpoint; every named input becomes a
/// key in the item's data. Inputs without a name attribute are dropped by the
/// browser before the request is sent.
pub async fn create_from_form(
    Path(model_name): Path<String>,
    Query(query): Query<CreateQuery>,
    Form(fields): Form<HashMap<String, String>>,
) -> ApiResult<Value> {
    let data: Map<String, Value> =
        fields.into_iter().map(|(k, v)| (k, Value::String(v))).collect();

    let draft = ItemDraft {
        model: model_name,
        version: query.version.unwrap_or(config().api.create_version_default),
        data: Value::Object(data),
        deleted: false,
    };
    draft.validate()?;

    let pool = DatabaseManager::pool().await?;
    let item = ItemRepository::new(pool).insert(draft).await?;
    Ok(ApiResponse::created(json!(item)))
}
