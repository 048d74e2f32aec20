//! Background execution of store requests
//!
//! The UI thread never waits on the network. Requests go to a single loop
//! running on a small tokio runtime and are handled in submission order;
//! outcomes come back as [`StoreEvent`]s drained once per frame.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::{DocumentStore, StoreError};
use crate::core::document::DocumentId;

/// Called after every event so the UI can wake up
pub type Notify = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug)]
enum StoreRequest {
    Load {
        session: u64,
        id: DocumentId,
    },
    Save {
        session: u64,
        id: DocumentId,
        generation: u64,
        content: String,
    },
    /// Answered once every request queued before it has finished
    Barrier(Sender<()>),
}

/// Outcome of a store request.
///
/// `session` echoes the token the request was submitted with, so an editor
/// reopened on the same document can tell its own outcomes apart.
#[derive(Debug)]
pub enum StoreEvent {
    Loaded {
        session: u64,
        id: DocumentId,
        result: Result<Option<String>, StoreError>,
    },
    Saved {
        session: u64,
        id: DocumentId,
        generation: u64,
        result: Result<(), StoreError>,
    },
}

impl StoreEvent {
    pub fn session(&self) -> u64 {
        match self {
            StoreEvent::Loaded { session, .. } | StoreEvent::Saved { session, .. } => *session,
        }
    }
}

/// Runs store requests off the UI thread
pub struct StoreWorker<S> {
    requests: UnboundedSender<StoreRequest>,
    events: Receiver<StoreEvent>,
    next_session: AtomicU64,
    _runtime: Runtime,
    _store: PhantomData<fn() -> S>,
}

impl<S: DocumentStore> StoreWorker<S> {
    /// Start the runtime and its request loop
    pub fn new(store: S, notify: Option<Notify>) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("codeshare-store")
            .enable_all()
            .build()?;

        let store = Arc::new(store);
        let (request_tx, request_rx) = unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        runtime.spawn(run_requests(store, request_rx, event_tx, notify));

        Ok(Self {
            requests: request_tx,
            events: event_rx,
            next_session: AtomicU64::new(1),
            _runtime: runtime,
            _store: PhantomData,
        })
    }

    /// Token for a newly opened editor; never handed out twice
    pub fn begin_session(&self) -> u64 {
        self.next_session.fetch_add(1, Ordering::Relaxed)
    }

    /// Queue a fetch
    pub fn load(&self, session: u64, id: DocumentId) {
        self.submit(StoreRequest::Load { session, id });
    }

    /// Queue a save
    pub fn save(&self, session: u64, id: DocumentId, generation: u64, content: String) {
        self.submit(StoreRequest::Save {
            session,
            id,
            generation,
            content,
        });
    }

    /// Block until every request submitted so far has finished.
    ///
    /// Returns `false` if that did not happen within `timeout`. Outcomes stay
    /// queued for [`drain_events`](Self::drain_events).
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let (done_tx, done_rx) = mpsc::channel();
        self.submit(StoreRequest::Barrier(done_tx));
        done_rx.recv_timeout(timeout).is_ok()
    }

    /// Events that arrived since the last call (non-blocking)
    pub fn drain_events(&self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Wait for the next event
    #[cfg(test)]
    pub fn recv_event(&self, timeout: Duration) -> Option<StoreEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    fn submit(&self, request: StoreRequest) {
        if self.requests.send(request).is_err() {
            tracing::error!("Store request loop has stopped; request dropped");
        }
    }
}

async fn run_requests<S: DocumentStore>(
    store: Arc<S>,
    mut requests: UnboundedReceiver<StoreRequest>,
    events: Sender<StoreEvent>,
    notify: Option<Notify>,
) {
    while let Some(first) = requests.recv().await {
        let mut batch = vec![first];
        while let Ok(next) = requests.try_recv() {
            batch.push(next);
        }

        for request in coalesce(batch) {
            let event = match request {
                StoreRequest::Barrier(done) => {
                    let _ = done.send(());
                    continue;
                }
                StoreRequest::Load { session, id } => {
                    let result = store.fetch(&id).await;
                    StoreEvent::Loaded {
                        session,
                        id,
                        result,
                    }
                }
                StoreRequest::Save {
                    session,
                    id,
                    generation,
                    content,
                } => {
                    let result = store.save(&id, &content).await;
                    StoreEvent::Saved {
                        session,
                        id,
                        generation,
                        result,
                    }
                }
            };
            if events.send(event).is_err() {
                return; // Receiver dropped
            }
            if let Some(ref notify) = notify {
                notify();
            }
        }
    }
}

/// Drop queued saves that a later save of the same document supersedes.
/// Saves never move across a barrier.
fn coalesce(batch: Vec<StoreRequest>) -> Vec<StoreRequest> {
    let mut kept: Vec<StoreRequest> = Vec::with_capacity(batch.len());
    let mut fence = 0;
    for request in batch {
        match request {
            StoreRequest::Save { ref id, .. } => {
                let mut tail = kept.split_off(fence);
                tail.retain(|queued| {
                    !matches!(queued, StoreRequest::Save { id: queued_id, .. } if queued_id == id)
                });
                kept.append(&mut tail);
            }
            StoreRequest::Barrier(_) => fence = kept.len() + 1,
            StoreRequest::Load { .. } => {}
        }
        kept.push(request);
    }
    kept
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::store::memory::MemoryStore;

    const WAIT: Duration = Duration::from_secs(5);

    fn id(s: &str) -> DocumentId {
        DocumentId::parse(s).unwrap()
    }

    fn save(doc: &str, generation: u64) -> StoreRequest {
        StoreRequest::Save {
            session: 1,
            id: id(doc),
            generation,
            content: format!("v{}", generation),
        }
    }

    fn summary(request: &StoreRequest) -> String {
        match request {
            StoreRequest::Load { id, .. } => format!("load {}", id),
            StoreRequest::Save { id, generation, .. } => format!("save {} #{}", id, generation),
            StoreRequest::Barrier(_) => "barrier".to_string(),
        }
    }

    #[test]
    fn test_coalesce_keeps_latest_save_per_document() {
        let (done, _) = mpsc::channel();
        let batch = vec![
            StoreRequest::Load {
                session: 1,
                id: id("aaaa1111"),
            },
            save("aaaa1111", 1),
            save("bbbb2222", 2),
            save("aaaa1111", 3),
            StoreRequest::Barrier(done),
        ];
        let kept: Vec<String> = coalesce(batch).iter().map(summary).collect();
        assert_eq!(
            kept,
            vec!["load aaaa1111", "save bbbb2222 #2", "save aaaa1111 #3", "barrier"]
        );
    }

    #[test]
    fn test_coalesce_stops_at_barrier() {
        let (done, _) = mpsc::channel();
        let batch = vec![save("aaaa1111", 1), StoreRequest::Barrier(done), save("aaaa1111", 2)];
        let kept: Vec<String> = coalesce(batch).iter().map(summary).collect();
        assert_eq!(kept, vec!["save aaaa1111 #1", "barrier", "save aaaa1111 #2"]);
    }

    #[test]
    fn test_sessions_are_unique() {
        let worker = StoreWorker::new(MemoryStore::default(), None).unwrap();
        let first = worker.begin_session();
        assert_ne!(first, worker.begin_session());
    }

    #[test]
    fn test_load_existing_and_missing() {
        let worker = StoreWorker::new(MemoryStore::with_document("aaaa1111", "hello"), None).unwrap();

        worker.load(3, id("aaaa1111"));
        match worker.recv_event(WAIT) {
            Some(StoreEvent::Loaded { session, result, .. }) => {
                assert_eq!(session, 3);
                assert_eq!(result.unwrap(), Some("hello".to_string()))
            }
            other => panic!("unexpected event: {:?}", other),
        }

        worker.load(3, id("zzzz9999"));
        match worker.recv_event(WAIT) {
            Some(StoreEvent::Loaded { result, .. }) => assert_eq!(result.unwrap(), None),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_save_reports_generation_and_notifies() {
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        let notify: Notify = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let store = Arc::new(MemoryStore::default());
        let worker = StoreWorker::new(store.clone(), Some(notify)).unwrap();
        worker.save(1, id("aaaa1111"), 7, "content".into());

        match worker.recv_event(WAIT) {
            Some(StoreEvent::Saved {
                generation, result, ..
            }) => {
                assert_eq!(generation, 7);
                assert!(result.is_ok());
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(store.get("aaaa1111"), Some("content".to_string()));
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_save_is_reported() {
        let store = Arc::new(MemoryStore::default());
        store.set_fail_saves(true);
        let worker = StoreWorker::new(store, None).unwrap();
        worker.save(1, id("aaaa1111"), 1, "lost".into());

        match worker.recv_event(WAIT) {
            Some(StoreEvent::Saved { result, .. }) => {
                assert!(matches!(result, Err(StoreError::Status(500))))
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_wait_idle_outlasts_slow_save() {
        let store = Arc::new(MemoryStore::default());
        store.set_save_delay(Duration::from_millis(300));
        let worker = StoreWorker::new(store.clone(), None).unwrap();

        worker.save(1, id("aaaa1111"), 1, "draft".into());
        worker.save(1, id("aaaa1111"), 2, "final".into());
        assert!(worker.wait_idle(WAIT));
        assert_eq!(store.get("aaaa1111"), Some("final".to_string()));

        drop(worker);
        assert_eq!(store.get("aaaa1111"), Some("final".to_string()));
    }

    #[test]
    fn test_wait_idle_times_out() {
        let store = Arc::new(MemoryStore::default());
        store.set_save_delay(Duration::from_secs(2));
        let worker = StoreWorker::new(store, None).unwrap();

        worker.save(1, id("aaaa1111"), 1, "slow".into());
        assert!(!worker.wait_idle(Duration::from_millis(50)));
    }
}
