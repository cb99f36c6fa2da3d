//! Last-write-wins ordering for render requests.
//!
//! Every request captures a [`Ticket`] when it is issued. When its work
//! completes, the ticket is compared against the newest one handed out;
//! anything older is stale and must be dropped instead of drawn.

/// Sequence number captured when a render request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// The raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets and answers whether a
/// completed request is still the latest.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    latest: u64,
}

impl Sequencer {
    /// Create a sequencer that has issued nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issue the next ticket. Every earlier ticket becomes stale.
    pub const fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Returns `true` if `ticket` is the most recently issued one.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Invalidate every outstanding ticket without issuing a usable one.
    pub const fn invalidate(&mut self) {
        self.latest += 1;
    }
}
