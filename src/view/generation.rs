use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Identifies one fetch issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Issues [`Ticket`]s and tells which one is current.
///
/// A ticket stays current until a newer one is issued or the owning view
/// is dismissed. Dismissal is final.
#[derive(Debug, Default)]
pub struct Generation {
    latest: AtomicU64,
    dismissed: AtomicBool,
}

impl Generation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new fetch, superseding every earlier ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether a result fetched under `ticket` may still be applied.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.dismissed.load(Ordering::Acquire) && self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Marks the owning view as gone; no ticket is current afterwards.
    pub fn dismiss(&self) {
        self.dismissed.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        self.dismissed.load(Ordering::Acquire)
    }
}
