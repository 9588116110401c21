//! Builds the OpenAPI 3 document served at /openapi.json.
//!
//! The document is assembled from the running configuration, so disabled
//! route groups disappear from the docs along with the routes themselves.

use serde_json::{json, Map, Value};

use crate::config::AppConfig;

/// Assemble the full OpenAPI document for the given configuration
pub fn document(config: &AppConfig) -> Value {
    let mut paths = Map::new();

    paths.insert("/".to_string(), root_path(config));
    paths.insert("/health".to_string(), health_path());

    if config.api.items_enabled {
        paths.insert("/items".to_string(), items_path());
        paths.insert("/item/{item_id}".to_string(), item_path());
    }
    if config.api.models_enabled {
        paths.insert("/model/list".to_string(), model_list_path());
        paths.insert("/model/{model_name}".to_string(), model_path());
    }
    if config.api.forms_enabled {
        paths.insert("/form/{model_name}".to_string(), form_path());
    }

    json!({
        "openapi": "3.0.2",
        "info": {
            "title": config.site.title,
            "description": config.site.description,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "tags": [
            { "name": "Items", "description": "Perform actions on all model types." },
            { "name": "Models", "description": "Perform actions on specific model types." },
            { "name": "Forms", "description": "Create items from web form submissions." },
        ],
        "paths": Value::Object(paths),
        "components": { "schemas": schemas() },
    })
}

fn root_path(config: &AppConfig) -> Value {
    let mut methods = Map::new();
    methods.insert(
        "get".to_string(),
        json!({
            "summary": "Service banner",
            "responses": { "200": envelope_response("Service name, version and endpoint map") }
        }),
    );
    if config.api.items_enabled {
        methods.insert(
            "post".to_string(),
            json!({
                "tags": ["Items"],
                "summary": "Create a new item",
                "requestBody": json_body("#/components/schemas/ItemDraft"),
                "responses": {
                    "201": item_response("The stored item"),
                    "400": error_response()
                }
            }),
        );
    }
    Value::Object(methods)
}

fn health_path() -> Value {
    json!({
        "get": {
            "summary": "Service and database health",
            "responses": {
                "200": envelope_response("Database reachable"),
                "503": error_response()
            }
        }
    })
}

fn items_path() -> Value {
    json!({
        "get": {
            "tags": ["Items"],
            "summary": "List all items in the database",
            "parameters": [
                query_param("show_deleted", "boolean", "Include soft-deleted items"),
                query_param("offset", "integer", "Rows to skip"),
                query_param("limit", "integer", "Page size, capped server-side"),
            ],
            "responses": { "200": item_list_response() }
        }
    })
}

fn item_path() -> Value {
    json!({
        "get": {
            "tags": ["Items"],
            "summary": "Return a specific item by its ID",
            "parameters": [
                path_param("item_id"),
                query_param("show_deleted", "boolean", "Return the item even when soft-deleted"),
            ],
            "responses": { "200": item_response("The item"), "404": error_response() }
        },
        "put": {
            "tags": ["Items"],
            "summary": "Replace an item",
            "description": "All caller-editable fields are overwritten with the payload or its defaults. For partial updates use PATCH.",
            "parameters": [path_param("item_id")],
            "requestBody": json_body("#/components/schemas/ItemDraft"),
            "responses": { "200": item_response("The replaced item"), "404": error_response() }
        },
        "patch": {
            "tags": ["Items"],
            "summary": "Partially update an item",
            "description": "Only fields present in the payload change. The contents of `data` are replaced wholesale, not merged.",
            "parameters": [
                path_param("item_id"),
                query_param("update_deleted", "boolean", "Allow patching a soft-deleted item"),
            ],
            "requestBody": json_body("#/components/schemas/ItemPatch"),
            "responses": { "200": item_response("The updated item"), "404": error_response() }
        },
        "delete": {
            "tags": ["Items"],
            "summary": "Delete an item",
            "description": "Soft delete by default; pass permanent=true to remove the row entirely.",
            "parameters": [
                path_param("item_id"),
                query_param("permanent", "boolean", "Remove the row instead of marking it deleted"),
            ],
            "responses": { "200": envelope_response("{\"ok\": true}"), "404": error_response() }
        }
    })
}

fn model_list_path() -> Value {
    json!({
        "get": {
            "tags": ["Models"],
            "summary": "Get information about models",
            "description": "Per-model counts, timestamps and a version histogram.",
            "responses": {
                "200": array_response("#/components/schemas/ModelSummary", "One entry per model name")
            }
        }
    })
}

fn model_path() -> Value {
    json!({
        "get": {
            "tags": ["Models"],
            "summary": "List all items of a particular model",
            "parameters": [
                path_param("model_name"),
                query_param("show_deleted", "boolean", "Include soft-deleted items"),
                query_param("offset", "integer", "Rows to skip"),
                query_param("limit", "integer", "Page size, capped server-side"),
            ],
            "responses": { "200": item_list_response() }
        },
        "post": {
            "tags": ["Models"],
            "summary": "Create an item with the model name in the URL",
            "description": "The whole request body becomes the item's data, so completely schema-free payloads work here.",
            "parameters": [
                path_param("model_name"),
                query_param("version", "number", "Version tag for the stored item"),
            ],
            "requestBody": json_body_free_form(),
            "responses": { "201": item_response("The stored item"), "400": error_response() }
        }
    })
}

fn form_path() -> Value {
    json!({
        "post": {
            "tags": ["Forms"],
            "summary": "Create an item by submitting form data",
            "description": "Point a web form's action here; every named input becomes a key in the item's data. Inputs without a name attribute are dropped by the browser.",
            "parameters": [
                path_param("model_name"),
                query_param("version", "number", "Version tag for the stored item"),
            ],
            "requestBody": {
                "content": {
                    "application/x-www-form-urlencoded": {
                        "schema": { "type": "object", "additionalProperties": { "type": "string" } }
                    }
                }
            },
            "responses": { "201": item_response("The stored item") }
        }
    })
}

fn schemas() -> Value {
    json!({
        "Item": {
            "type": "object",
            "required": ["id", "model", "version", "data", "created", "deleted"],
            "properties": {
                "id": { "type": "string", "format": "uuid" },
                "model": { "type": "string" },
                "version": { "type": "number" },
                "data": { "type": "object", "additionalProperties": true },
                "created": { "type": "string", "format": "date-time" },
                "last_updated": { "type": "string", "format": "date-time", "nullable": true },
                "deleted": { "type": "boolean" }
            },
            "example": {
                "id": "7f2b6f86-1a9e-4d0e-9c30-0a1f1fb2a111",
                "model": "ContactForm",
                "version": 1.0,
                "data": {
                    "email": "avi@email.com",
                    "subject": "Contact form example",
                    "body": "This is an example of arbitrary data that can be stored in the data field."
                },
                "created": "2021-09-03T06:04:51.477Z",
                "last_updated": null,
                "deleted": false
            }
        },
        "ItemDraft": {
            "type": "object",
            "required": ["model", "data"],
            "properties": {
                "model": { "type": "string" },
                "version": { "type": "number", "default": 0 },
                "data": { "type": "object", "additionalProperties": true },
                "deleted": { "type": "boolean", "default": false }
            },
            "example": {
                "model": "ContactForm",
                "version": 1.0,
                "data": { "email": "avi@email.com", "subject": "Contact form example" }
            }
        },
        "ItemPatch": {
            "type": "object",
            "properties": {
                "model": { "type": "string" },
                "version": { "type": "number" },
                "data": { "type": "object", "additionalProperties": true },
                "deleted": { "type": "boolean" }
            },
            "example": {
                "data": { "key": "New value replacing the data currently stored." }
            }
        },
        "ModelSummary": {
            "type": "object",
            "required": ["model", "count", "deleted_count", "total_count",
                         "oldest_created", "newest_created", "versions"],
            "properties": {
                "model": { "type": "string" },
                "count": { "type": "integer" },
                "deleted_count": { "type": "integer" },
                "total_count": { "type": "integer" },
                "oldest_created": { "type": "string", "format": "date-time" },
                "newest_created": { "type": "string", "format": "date-time" },
                "versions": { "type": "object", "additionalProperties": { "type": "integer" } }
            }
        },
        "Error": {
            "type": "object",
            "required": ["error", "message", "code"],
            "properties": {
                "error": { "type": "boolean" },
                "message": { "type": "string" },
                "code": { "type": "string" },
                "field_errors": { "type": "object", "additionalProperties": { "type": "string" } }
            }
        }
    })
}

// Small builders for the repetitive parts of the document

fn path_param(name: &str) -> Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn query_param(name: &str, kind: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": { "type": kind }
    })
}

fn json_body(schema_ref: &str) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": { "$ref": schema_ref } } }
    })
}

fn json_body_free_form() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "type": "object", "additionalProperties": true }
            }
        }
    })
}

fn envelope(inner: Value) -> Value {
    json!({
        "type": "object",
        "properties": {
            "success": { "type": "boolean" },
            "data": inner
        }
    })
}

fn envelope_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": envelope(json!({ "type": "object" })) } }
    })
}

fn item_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": envelope(json!({ "$ref": "#/components/schemas/Item" }))
            }
        }
    })
}

fn item_list_response() -> Value {
    array_response("#/components/schemas/Item", "Matching items")
}

fn array_response(schema_ref: &str, description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": envelope(json!({ "type": "array", "items": { "$ref": schema_ref } }))
            }
        }
    })
}

fn error_response() -> Value {
    json!({
        "description": "Error",
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Error" } }
        }
    })
}
