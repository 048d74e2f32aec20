//! Editing session for a single shared document
//!
//! Ties the text surface to the store: loads the document when opened,
//! turns edits into debounced saves and tracks what the status bar shows.

use std::time::{Duration, Instant};

use crate::core::autosave::{AutoSave, SaveStatus};
use crate::core::document::{Document, DocumentId};
use crate::core::share::{share_url, Toast};
use crate::store::{DocumentStore, StoreEvent, StoreWorker};

/// Message shown after the share link is copied
pub const LINK_COPIED: &str = "Link copied!";

/// Whether the initial fetch has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

/// Open document plus its save pipeline
#[derive(Debug)]
pub struct EditorSession {
    pub document: Document,
    /// Tags this session's store requests
    session: u64,
    load_state: LoadState,
    line_count: usize,
    autosave: AutoSave,
    debounce: Duration,
    toast: Option<Toast>,
}

impl EditorSession {
    /// Open a document and request its content from the store
    pub fn open<S: DocumentStore>(id: DocumentId, debounce: Duration, worker: &StoreWorker<S>) -> Self {
        tracing::info!("Opening document {}", id);
        let session = worker.begin_session();
        worker.load(session, id.clone());

        let document = Document::placeholder(id);
        Self {
            line_count: document.line_count(),
            document,
            session,
            load_state: LoadState::Loading,
            autosave: AutoSave::new(debounce, false),
            debounce,
            toast: None,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.document.id
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn status(&self) -> SaveStatus {
        self.autosave.status()
    }

    /// Apply a store outcome.
    ///
    /// Only outcomes of this session's own requests count, and the document
    /// is loaded at most once so later fetches can't clobber edits.
    pub fn handle_event(&mut self, event: StoreEvent) {
        if event.session() != self.session {
            tracing::debug!("Dropping store event from another session");
            return;
        }
        match event {
            StoreEvent::Loaded { id, result, .. } if self.is_loading() => {
                let data = match result {
                    Ok(data) => data,
                    Err(e) => {
                        tracing::error!("Error fetching document {}: {}", id, e);
                        None
                    }
                };
                self.document = Document::from_store(id, data);
                self.line_count = self.document.line_count();
                self.autosave = AutoSave::new(self.debounce, self.document.exists);
                self.load_state = LoadState::Ready;
            }
            StoreEvent::Saved {
                id,
                generation,
                result,
                ..
            } => match result {
                Ok(()) => {
                    tracing::info!("Document {} saved", id);
                    self.document.exists = true;
                    self.autosave.complete(generation, true);
                }
                Err(e) => {
                    tracing::error!("Auto-save of {} failed: {}", id, e);
                    self.autosave.complete(generation, false);
                }
            },
            StoreEvent::Loaded { id, .. } => {
                tracing::debug!("Ignoring repeated load of {}", id)
            }
        }
    }

    /// The text surface changed `document.content`
    pub fn on_edit(&mut self, now: Instant) {
        self.line_count = self.document.line_count();
        self.autosave.schedule(self.document.content.clone(), now);
    }

    /// Submit saves whose debounce elapsed.
    ///
    /// Returns how long until something needs another look (pending save or
    /// visible toast).
    pub fn tick<S: DocumentStore>(&mut self, worker: &StoreWorker<S>, now: Instant) -> Option<Duration> {
        if let Some(ticket) = self.autosave.poll(now) {
            worker.save(self.session, self.document.id.clone(), ticket.generation, ticket.content);
        }

        if self.toast.as_ref().is_some_and(|toast| !toast.is_visible(now)) {
            self.toast = None;
        }

        let toast_wait = self.toast.as_ref().map(|toast| toast.remaining(now));
        match (self.autosave.time_until_due(now), toast_wait) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Send pending edits now instead of waiting for the debounce
    pub fn save_now<S: DocumentStore>(&mut self, worker: &StoreWorker<S>) {
        if let Some(ticket) = self.autosave.flush() {
            worker.save(self.session, self.document.id.clone(), ticket.generation, ticket.content);
        }
    }

    /// Save pending edits and wait until the store has every save this
    /// session submitted, used when the window closes
    pub fn flush_blocking<S: DocumentStore>(&mut self, worker: &StoreWorker<S>, timeout: Duration) {
        self.save_now(worker);
        if !worker.wait_idle(timeout) {
            tracing::error!("Timed out saving {} before closing", self.document.id);
        }
        for event in worker.drain_events() {
            self.handle_event(event);
        }
        if self.status() == SaveStatus::Saved {
            tracing::info!("All edits to {} saved before closing", self.document.id);
        }
    }

    /// Build the share link and show the "copied" toast
    pub fn share(&mut self, base: &str, now: Instant, toast_duration: Duration) -> String {
        let url = share_url(base, &self.document.id);
        tracing::info!("Share link: {}", url);
        self.toast = Some(Toast::new(LINK_COPIED, now, toast_duration));
        url
    }

    /// Toast to draw this frame
    pub fn toast(&self, now: Instant) -> Option<&Toast> {
        self.toast.as_ref().filter(|toast| toast.is_visible(now))
    }
}
