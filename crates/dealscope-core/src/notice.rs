//! Transient status messages with a fixed display window.
//!
//! Connection and validation feedback is shown for five seconds and then
//! disappears; a newer notice replaces the current one and restarts the
//! window, so an old expiry can never hide a fresh message. Time is passed
//! in by the caller, which keeps expiry testable without sleeping.

use std::time::{Duration, Instant};

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    expires_at: Instant,
}

/// Holds at most one notice; posting replaces whatever is showing.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn post(&mut self, kind: NoticeKind, text: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            kind,
            text: text.into(),
            expires_at: now + NOTICE_TTL,
        });
    }

    /// The notice to show, if any is still within its window.
    pub fn visible(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| now < n.expires_at)
    }

    /// Drop an expired notice (called from the tick handler).
    pub fn sweep(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.current = None;
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_visible_within_window() {
        let mut board = NoticeBoard::default();
        let start = Instant::now();
        board.post(NoticeKind::Error, "Connection failed", start);
        assert!(board.visible(start).is_some());
        assert!(board
            .visible(start + Duration::from_millis(4_999))
            .is_some());
    }

    #[test]
    fn notice_gone_after_five_seconds() {
        let mut board = NoticeBoard::default();
        let start = Instant::now();
        board.post(NoticeKind::Success, "Connected", start);
        assert!(board.visible(start + NOTICE_TTL).is_none());
        board.sweep(start + NOTICE_TTL);
        assert!(board.visible(start).is_none(), "swept notice stays gone");
    }

    #[test]
    fn replacement_restarts_the_window() {
        let mut board = NoticeBoard::default();
        let start = Instant::now();
        board.post(NoticeKind::Error, "first", start);
        let later = start + Duration::from_secs(4);
        board.post(NoticeKind::Success, "second", later);
        // The old deadline has passed; the new notice must still be up.
        let past_first_deadline = start + Duration::from_secs(6);
        let shown = board.visible(past_first_deadline).expect("second notice visible");
        assert_eq!(shown.text, "second");
        assert!(board.visible(later + NOTICE_TTL).is_none());
    }
}
