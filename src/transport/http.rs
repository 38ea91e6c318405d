use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ClientConfig, TodoTransport};
use crate::core::{CacheError, NewTodo, Result, Todo, TodoId, TodoPatch};

/// [`TodoTransport`] over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn item_url(&self, id: TodoId) -> String {
        self.config.url(&format!("/todos/{}", id.value()))
    }
}

#[async_trait]
impl TodoTransport for HttpTransport {
    async fn list(&self) -> Result<Vec<Todo>> {
        let response = self.client.get(self.config.url("/todos")).send().await?;
        parse_json(response).await
    }

    async fn create(&self, draft: &NewTodo) -> Result<Todo> {
        let response = self
            .client
            .post(self.config.url("/todos"))
            .json(draft)
            .send()
            .await?;
        parse_json(response).await
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<()> {
        let response = self.client.patch(self.item_url(id)).json(patch).send().await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        ensure_success(response).await.map(|_| ())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %message, "request rejected");
    Err(CacheError::server(
        status.as_u16(),
        if message.is_empty() {
            status.to_string()
        } else {
            message
        },
    ))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|err| CacheError::transport(format!("invalid response body: {err}")))
}
