//! Debounced auto-save scheduling
//!
//! Every edit pushes the save deadline back by the debounce delay. Once the
//! deadline passes the latest content is handed out as a [`SaveTicket`] and
//! the caller submits it to the store. Time is passed in explicitly so the
//! scheduler stays independent of the frame loop.

use std::time::{Duration, Instant};

/// Default quiet period before an edit is saved
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(700);

/// Save indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing stored yet
    Ready,
    /// Edits waiting for the debounce deadline
    Pending,
    /// Save request in flight
    Saving,
    Saved,
    Failed,
}

impl SaveStatus {
    pub fn label(self) -> &'static str {
        match self {
            SaveStatus::Ready => "Ready",
            SaveStatus::Pending | SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "Saved",
            SaveStatus::Failed => "Save failed",
        }
    }

    pub fn is_busy(self) -> bool {
        matches!(self, SaveStatus::Pending | SaveStatus::Saving)
    }
}

/// Content due to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub generation: u64,
    pub content: String,
}

#[derive(Debug)]
struct PendingSave {
    content: String,
    due: Instant,
}

/// Debounce timer plus save bookkeeping for one document
#[derive(Debug)]
pub struct AutoSave {
    delay: Duration,
    pending: Option<PendingSave>,
    last_issued: u64,
    status: SaveStatus,
}

impl AutoSave {
    pub fn new(delay: Duration, exists: bool) -> Self {
        Self {
            delay,
            pending: None,
            last_issued: 0,
            status: if exists {
                SaveStatus::Saved
            } else {
                SaveStatus::Ready
            },
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Record an edit and restart the debounce timer
    pub fn schedule(&mut self, content: String, now: Instant) {
        self.pending = Some(PendingSave {
            content,
            due: now + self.delay,
        });
        self.status = SaveStatus::Pending;
    }

    /// Hand out the pending content once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<SaveTicket> {
        let due = self.pending.as_ref()?.due;
        if due <= now {
            self.flush()
        } else {
            None
        }
    }

    /// Hand out the pending content right away
    pub fn flush(&mut self) -> Option<SaveTicket> {
        let pending = self.pending.take()?;
        self.last_issued += 1;
        self.status = SaveStatus::Saving;
        Some(SaveTicket {
            generation: self.last_issued,
            content: pending.content,
        })
    }

    /// Time left until the pending edit is due
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.due.saturating_duration_since(now))
    }

    /// Apply the outcome of a save request.
    ///
    /// Completions for anything but the newest ticket are ignored, as are
    /// completions that arrive while newer edits are still pending.
    pub fn complete(&mut self, generation: u64, succeeded: bool) {
        if generation != self.last_issued || self.pending.is_some() {
            tracing::debug!(
                "Ignoring stale save completion {} (latest {})",
                generation,
                self.last_issued
            );
            return;
        }
        self.status = if succeeded {
            SaveStatus::Saved
        } else {
            SaveStatus::Failed
        };
    }
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, false)
    }
}
