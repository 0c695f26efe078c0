//! Per-dependency and per-dependent bookkeeping, per spec.md §4.3:
//! "Each federate tracks, per dependency D, a `DependencyInfo`".

use helics_core::{GlobalFederateId, Time};

/// What a federate knows about one upstream dependency.
#[derive(Debug, Clone, Copy)]
pub struct DependencyInfo {
    pub federate: GlobalFederateId,
    /// The earliest time this dependency could still generate an event.
    pub next_event: Time,
    /// The minimum next-event time this dependency forwards from its own
    /// dependencies (used when the dependency is itself a relay/core).
    pub minimum_forwarded: Time,
    /// The last time actually granted to this dependency.
    pub last_grant: Time,
    /// Whether this dependency has an iteration pending at `next_event`
    /// (keeps a requester from granting past a dependency still iterating).
    pub iterating: bool,
}

impl DependencyInfo {
    pub fn new(federate: GlobalFederateId) -> Self {
        Self {
            federate,
            next_event: Time::ZERO,
            minimum_forwarded: Time::MAX_TIME,
            last_grant: Time::ZERO,
            iterating: false,
        }
    }

    /// The bound this dependency currently imposes on `T_allow`: the
    /// smaller of its own next-event time and whatever minimum it forwards
    /// from its own upstream dependencies.
    pub fn effective_bound(&self) -> Time {
        self.next_event.min(self.minimum_forwarded)
    }
}

/// What a federate tracks about a downstream dependent, to decide when a
/// null message is owed ("sends a null message whenever its own advertised
/// next-event time changes materially").
#[derive(Debug, Clone, Copy)]
pub struct DependentInfo {
    pub federate: GlobalFederateId,
    pub last_reported: Time,
}

impl DependentInfo {
    pub fn new(federate: GlobalFederateId) -> Self {
        Self {
            federate,
            last_reported: Time::MIN_TIME,
        }
    }

    /// Whether `new_time` differs enough from the last report to be worth
    /// sending a null message for.
    pub fn needs_notification(&self, new_time: Time) -> bool {
        new_time != self.last_reported
    }
}
