//! Reference backend for the `todos` resource.
//!
//! Behaves like a json-server instance serving a single `todos` array:
//! bare JSON bodies, numeric ids assigned on create, `{}` on delete.

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use error::{AppError, AppResult};
pub use store::TodoStore;

pub fn build_router(store: Arc<TodoStore>) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/:id",
            get(handlers::get_todo)
                .patch(handlers::patch_todo)
                .delete(handlers::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}
