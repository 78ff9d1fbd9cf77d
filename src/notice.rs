//! Transient status messages.

use std::time::Duration;

use derive_getters::Getters;
use tracing::{debug, instrument};

/// A message shown until its auto-clear fires.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Notice {
    /// Identifies this notice when its auto-clear fires.
    id: u64,
    /// Message text.
    text: String,
    /// How long the message stays up.
    duration: Duration,
}

/// Single-slot message area.
///
/// A new notice replaces the current one outright; the replaced notice's
/// pending auto-clear then no longer matches and is ignored.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
    next_id: u64,
}

impl NoticeBoard {
    /// Shows `text` for `duration`, superseding whatever was shown.
    #[instrument(skip(self, text), fields(text = %text.as_ref()))]
    pub fn notify(&mut self, text: impl AsRef<str>, duration: Duration) -> Notice {
        self.next_id += 1;
        let notice = Notice {
            id: self.next_id,
            text: text.as_ref().to_string(),
            duration,
        };
        debug!(id = notice.id, ?duration, "Notice posted");
        self.current = Some(notice.clone());
        notice
    }

    /// Auto-clear for notice `id`. Returns whether anything was cleared.
    pub fn expire(&mut self, id: u64) -> bool {
        match &self.current {
            Some(notice) if notice.id == id => {
                debug!(id, "Notice expired");
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Notice on display, if any.
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
