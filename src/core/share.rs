//! Share links and the transient "copied" notification

use std::time::{Duration, Instant};

use super::document::DocumentId;

/// How long a toast stays on screen by default
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2000);

/// Public link for a document
pub fn share_url(base: &str, id: &DocumentId) -> String {
    format!("{}/{}", base.trim_end_matches('/'), id)
}

/// Short-lived notification shown in the editor corner
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    shown_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: Instant, duration: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at: now,
            duration,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.duration
    }

    /// Time until the toast should disappear
    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .saturating_sub(now.saturating_duration_since(self.shown_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_url() {
        let id = DocumentId::parse("Zx81abCD").unwrap();
        assert_eq!(share_url("https://share.dev/", &id), "https://share.dev/Zx81abCD");
        assert_eq!(share_url("http://localhost:3000", &id), "http://localhost:3000/Zx81abCD");
    }

    #[test]
    fn test_toast_expires() {
        let now = Instant::now();
        let toast = Toast::new("Link copied!", now, DEFAULT_TOAST_DURATION);
        assert!(toast.is_visible(now + Duration::from_millis(1999)));
        assert!(!toast.is_visible(now + DEFAULT_TOAST_DURATION));
        assert_eq!(toast.remaining(now + Duration::from_millis(500)), Duration::from_millis(1500));
    }
}
