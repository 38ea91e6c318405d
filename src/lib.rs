// ============================================================================
// todo_cache
// ============================================================================

//! Optimistic client-side cache for a REST `todos` resource.
//!
//! # Examples
//!
//! ```no_run
//! use todo_cache::{ClientConfig, NewTodo, OptimisticCollectionCache};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = OptimisticCollectionCache::http(ClientConfig::from_env()?)?;
//! cache.fetch_all().await?;
//!
//! // Visible in the cache right away, confirmed or rolled back later.
//! let pending = cache.add(NewTodo::new("write docs"));
//! assert_eq!(cache.snapshot().map(|todos| todos.len() > 0), Some(true));
//!
//! let confirmed = pending.await?;
//! cache.remove(confirmed.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod core;
pub mod server;
pub mod transport;

pub use cache::{Collection, Mutation, OptimisticCollectionCache, PlaceholderIds};
pub use core::{CacheError, NewTodo, Result, Todo, TodoId, TodoPatch};
pub use transport::{ClientConfig, HttpTransport, TodoTransport};
