use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::core::{CacheError, Result};

/// Completion of a mutation whose speculative patch is already applied.
///
/// The round trip runs on its own task: dropping this handle stops waiting
/// for the outcome but never cancels the request or the reconciliation.
#[derive(Debug)]
#[must_use = "mutations report failures through the returned future"]
pub struct Mutation<T> {
    handle: JoinHandle<Result<T>>,
}

impl<T> Mutation<T> {
    pub(crate) fn new(handle: JoinHandle<Result<T>>) -> Self {
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for Mutation<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|joined| joined.map_err(CacheError::from).and_then(|result| result))
    }
}
