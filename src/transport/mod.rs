pub mod config;
pub mod http;

use async_trait::async_trait;

use crate::core::{NewTodo, Result, Todo, TodoId, TodoPatch};

pub use config::ClientConfig;
pub use http::HttpTransport;

/// The remote `todos` resource.
///
/// Implementations report any non-2xx answer as [`CacheError::Server`] and
/// anything that prevented an answer as [`CacheError::Transport`].
///
/// [`CacheError::Server`]: crate::core::CacheError::Server
/// [`CacheError::Transport`]: crate::core::CacheError::Transport
#[async_trait]
pub trait TodoTransport: Send + Sync {
    /// `GET /todos`
    async fn list(&self) -> Result<Vec<Todo>>;
    /// `POST /todos`
    async fn create(&self, draft: &NewTodo) -> Result<Todo>;
    /// `PATCH /todos/{id}`; the response body is ignored.
    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<()>;
    /// `DELETE /todos/{id}`
    async fn delete(&self, id: TodoId) -> Result<()>;
}
