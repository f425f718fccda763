use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mock server returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// A response to register for `method` + `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMock {
    pub path: String,
    pub method: String,
    pub response: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub conditions: Map<String, Value>,
}

impl RegisterMock {
    pub fn new(method: &str, path: &str, response: Value) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            response,
            status_code: None,
            description: None,
            conditions: Map::new(),
        }
    }

    pub fn status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Only serve this response when path parameter `name` equals `value`.
    pub fn when(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.conditions.insert(name.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub message: String,
    pub route: Value,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteListing {
    pub route: String,
    pub responses: Vec<Value>,
}

/// Client for the mock server's management API.
#[derive(Debug, Clone)]
pub struct MockClient {
    client: Client,
    base_url: String,
}

impl MockClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register a candidate response.
    pub async fn register(&self, mock: &RegisterMock) -> Result<Registered, ClientError> {
        let resp = self
            .client
            .post(self.url("/mock/register"))
            .json(mock)
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// All registered routes, in registration order.
    pub async fn routes(&self) -> Result<Vec<RouteListing>, ClientError> {
        let resp = self.client.get(self.url("/mock/routes")).send().await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// Delete the response with id `created_at` from `method` + `path`.
    pub async fn delete_response(
        &self,
        created_at: &str,
        method: &str,
        path: &str,
    ) -> Result<Value, ClientError> {
        let resp = self
            .client
            .delete(self.url(&format!("/mock/routes/{created_at}")))
            .json(&serde_json::json!({ "path": path, "method": method }))
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// Remove every registered route.
    pub async fn flush(&self) -> Result<Value, ClientError> {
        let resp = self.client.delete(self.url("/mock/flush")).send().await?;
        Ok(checked(resp).await?.json().await?)
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(checked(resp).await?.json().await?)
    }

    pub async fn debug_routes(&self) -> Result<Value, ClientError> {
        let resp = self.client.get(self.url("/system/debug/routes")).send().await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// Send an arbitrary request, e.g. to exercise a registered mock.
    pub async fn call(&self, method: Method, path: &str) -> Result<Response, reqwest::Error> {
        self.client.request(method, self.url(path)).send().await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn checked(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
