mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

fn unique_model(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{}_{:x}", prefix, nanos)
}

#[tokio::test]
async fn model_create_takes_name_from_path_and_version_from_query() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let model = unique_model("pathcreate");

    // Completely schema-free body: the whole payload becomes data
    let payload = json!({ "anything": ["goes", { "here": true }] });
    let res = client
        .post(format!("{}/model/{}?version=1.5", server.base_url, model))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    let item = &body["data"];
    assert_eq!(item["model"], model);
    assert_eq!(item["version"], 1.5);
    assert_eq!(item["data"], payload);

    Ok(())
}

#[tokio::test]
async fn model_create_rejects_non_object_body() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/model/{}", server.base_url, unique_model("badbody")))
        .json(&json!(["not", "an", "object"]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn model_items_only_returns_that_model() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let model_a = unique_model("scope_a");
    let model_b = unique_model("scope_b");

    for model in [&model_a, &model_b] {
        client
            .post(format!("{}/", server.base_url))
            .json(&json!({ "model": model, "data": {} }))
            .send()
            .await?;
    }

    let res = client.get(format!("{}/model/{}", server.base_url, model_a)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let items = body["data"].as_array().cloned().unwrap_or_default();

    assert_eq!(items.len(), 1, "expected exactly one item: {}", body);
    for item in items {
        assert_eq!(item["model"], model_a);
    }

    Ok(())
}

#[tokio::test]
async fn model_list_reports_counts_and_version_histogram() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let model = unique_model("summary");

    // Two live items on version 1, one soft-deleted on version 2.5
    for version in [1.0, 1.0, 2.5] {
        client
            .post(format!("{}/", server.base_url))
            .json(&json!({ "model": model, "version": version, "data": {} }))
            .send()
            .await?;
    }
    let res = client
        .get(format!("{}/model/{}?show_deleted=true", server.base_url, model))
        .send()
        .await?;
    let items = res.json::<serde_json::Value>().await?["data"].as_array().cloned().unwrap();
    let victim = items.iter().find(|i| i["version"] == 2.5).unwrap();
    client
        .delete(format!("{}/item/{}", server.base_url, victim["id"].as_str().unwrap()))
        .send()
        .await?;

    let res = client.get(format!("{}/model/list", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let summaries = body["data"].as_array().cloned().unwrap_or_default();
    let summary = summaries
        .iter()
        .find(|s| s["model"] == model)
        .unwrap_or_else(|| panic!("model {} missing from summaries", model));

    assert_eq!(summary["count"], 2);
    assert_eq!(summary["deleted_count"], 1);
    assert_eq!(summary["total_count"], 3);
    assert_eq!(summary["versions"]["1"], 2);
    assert_eq!(summary["versions"]["2.5"], 1);
    assert!(summary["oldest_created"].is_string());
    assert!(summary["newest_created"].is_string());

    Ok(())
}
