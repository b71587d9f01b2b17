//! # Request Sequencing
//!
//! Stale-result suppression for a consumer that can re-query before the
//! previous query resolves (e.g. a search box feeding the recording list).
//!
//! ```text
//!   begin() → #1 ──── query "zin" ─────────────────────────► done: stale, dropped
//!   begin() → #2 ──── query "zinn" ────────► done: current, applied
//! ```
//!
//! The in-flight query is not cancelled; its result is simply ignored when
//! a newer ticket has been issued in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// The raw sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic per-consumer request counter.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    /// Creates a sequence with no requests issued.
    pub fn new() -> Self {
        RequestSequence::default()
    }

    /// Issues the next ticket, superseding every earlier one.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued ticket, without issuing a new one.
    ///
    /// Follow-up requests (loading the next page) join the current
    /// generation instead of superseding it.
    pub fn current(&self) -> RequestTicket {
        RequestTicket(self.latest.load(Ordering::SeqCst))
    }

    /// Whether `ticket` is still the most recently issued one.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
