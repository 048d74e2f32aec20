//! Remote document store access
//!
//! The store itself is an external HTTP service. [`DocumentStore`] is the
//! seam the editor talks through; [`http::HttpStore`] is the real client and
//! [`worker::StoreWorker`] runs requests off the UI thread.

pub mod http;
#[cfg(test)]
pub mod memory;
pub mod worker;

use std::future::Future;

use thiserror::Error;

use crate::core::document::DocumentId;

pub use http::HttpStore;
pub use worker::{StoreEvent, StoreWorker};

/// Failure talking to the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to document store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("document store responded with status {0}")]
    Status(u16),

    #[error("malformed document store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Backend holding documents keyed by id
pub trait DocumentStore: Send + Sync + 'static {
    /// Look a document up; `Ok(None)` when the store has never seen it
    fn fetch(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Create or replace a document's content
    fn save(
        &self,
        id: &DocumentId,
        content: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<T: DocumentStore> DocumentStore for std::sync::Arc<T> {
    fn fetch(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        (**self).fetch(id)
    }

    fn save(
        &self,
        id: &DocumentId,
        content: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).save(id, content)
    }
}
