use anyhow::{bail, Context};
use serde_json::Value;

/// Thin HTTP wrapper that unwraps the server's response envelope
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url, http: reqwest::Client::new() }
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("request to {} failed", path))?;
        Self::unwrap_envelope(response).await
    }

    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
    ) -> anyhow::Result<Value> {
        let response = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .query(query)
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {} failed", path))?;
        Self::unwrap_envelope(response).await
    }

    pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let response = self
            .http
            .delete(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("request to {} failed", path))?;
        Self::unwrap_envelope(response).await
    }

    /// Pull `data` out of the success envelope, or surface the server's error
    /// message with its status code.
    async fn unwrap_envelope(response: reqwest::Response) -> anyhow::Result<Value> {
        let status = response.status();
        let body: Value = response.json().await.context("response was not JSON")?;

        if status.is_success() && body.get("success").and_then(Value::as_bool).unwrap_or(false) {
            return Ok(body.get("data").cloned().unwrap_or(Value::Null));
        }

        let message = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("unknown server error");
        bail!("server returned {}: {}", status, message)
    }
}
