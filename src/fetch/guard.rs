use crate::models::DateWindow;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Issued when a fetch starts; identifies the selection it was made for.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    generation: u64,
    window: DateWindow,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }
}

/// Discards responses that arrive after a newer selection was made.
///
/// Every selection change issues a ticket with a higher generation; only a
/// response carrying the latest ticket is accepted.
#[derive(Debug, Default)]
pub struct SelectionGuard {
    latest: AtomicU64,
}

impl SelectionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, window: DateWindow) -> Ticket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { generation, window }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.generation
    }

    /// `Some(response)` when `ticket` is still the latest, `None` otherwise.
    pub fn accept<T>(&self, ticket: &Ticket, response: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(response)
        } else {
            debug!(
                generation = ticket.generation,
                latest = self.latest.load(Ordering::SeqCst),
                window = %ticket.window,
                "Discarding stale response"
            );
            None
        }
    }
}
