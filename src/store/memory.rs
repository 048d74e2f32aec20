//! In-process document store for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{DocumentStore, StoreError};
use crate::core::document::DocumentId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, String>>,
    saves: Mutex<Vec<String>>,
    fail_saves: AtomicBool,
    save_delay: Mutex<Duration>,
}

impl MemoryStore {
    pub fn with_document(id: &str, content: &str) -> Self {
        let store = Self::default();
        store
            .documents
            .lock()
            .unwrap()
            .insert(id.to_string(), content.to_string());
        store
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    /// Every content saved, in arrival order
    pub fn saves(&self) -> Vec<String> {
        self.saves.lock().unwrap().clone()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make every save take this long, like a slow network
    pub fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.lock().unwrap() = delay;
    }
}

impl DocumentStore for MemoryStore {
    async fn fetch(&self, id: &DocumentId) -> Result<Option<String>, StoreError> {
        Ok(self.get(id.as_str()))
    }

    async fn save(&self, id: &DocumentId, content: &str) -> Result<(), StoreError> {
        let delay = *self.save_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Status(500));
        }
        self.saves.lock().unwrap().push(content.to_string());
        self.documents
            .lock()
            .unwrap()
            .insert(id.as_str().to_string(), content.to_string());
        Ok(())
    }
}
