use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use slog_scope::debug;

/// Identifies one resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// The currently displayed background. Only the most recently started request may write it,
/// so a slow response to an outdated configuration cannot replace a newer image.
#[derive(Debug, Default)]
pub struct BackgroundSlot {
    latest: AtomicU64,
    image: Mutex<Option<String>>,
}

impl BackgroundSlot {
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Stores `image` if `ticket` is still the latest request.
    pub fn apply(&self, ticket: Ticket, image: Option<String>) -> bool {
        let mut current = self.image.lock();
        if ticket.0 != self.latest.load(Ordering::SeqCst) {
            debug!("Discarding wallpaper of superseded request {}", ticket.0);
            return false;
        }
        *current = image;
        true
    }

    pub fn image(&self) -> Option<String> {
        self.image.lock().clone()
    }
}
