use crate::upload::types::UploadEvent;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

// Percentages are only sent when they grow.
#[derive(Debug)]
pub struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    last_reported: AtomicU8,
    events: Sender<UploadEvent>,
}

impl ProgressTracker {
    pub fn new(total: u64, events: Sender<UploadEvent>) -> Arc<Self> {
        Arc::new(Self {
            total,
            sent: AtomicU64::new(0),
            last_reported: AtomicU8::new(0),
            events,
        })
    }

    pub fn advance(&self, bytes: usize) {
        let sent = self.sent.fetch_add(bytes as u64, Ordering::SeqCst) + bytes as u64;
        let percent = percent_of(sent, self.total);

        let previous = self.last_reported.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            tracing::debug!(percent, sent, total = self.total, "upload progress");
            let _ = self.events.send(UploadEvent::Progress(percent));
        }
    }
}

/// `round(sent / total * 100)`, clamped to 100. An empty payload counts as done.
pub fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let rounded = (sent.saturating_mul(100) + total / 2) / total;
    rounded.min(100) as u8
}
