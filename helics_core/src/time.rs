//! Logical time.
//!
//! HELICS's C++ core represents time as a `double` number of seconds
//! (`examples/original_source/.../InputInfo.hpp`'s `Time` type). Floating
//! point time compares badly across the network (§8 "Safety of grant"
//! requires exact, reproducible ordering), so the core instead follows
//! `boomerang_core::time::Tag`'s fixed-point approach: time is stored as
//! integer nanoseconds since the federation epoch. A federate that never
//! iterates observes [`Time`] alone; the `(Time, iteration)` pair shows up
//! explicitly wherever spec.md calls for it (input source queues, the
//! endpoint deque tie-break, `TimeCoordinator` iteration bookkeeping).

use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in federation logical time, in nanoseconds since the federation epoch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(i64);

impl Time {
    pub const ZERO: Self = Self(0);
    /// `Tag::NEVER`-equivalent: the smallest representable time.
    pub const MIN_TIME: Self = Self(i64::MIN);
    /// `Tag::FOREVER`-equivalent: a time no finite grant ever reaches.
    pub const MAX_TIME: Self = Self(i64::MAX);
    /// The minimal resolvable gap between two distinct times, used to express
    /// "strictly less than" grant bounds (`T_allow - epsilon` in §4.3).
    pub const EPSILON: Self = Self(1);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self((seconds * 1_000_000_000.0).round() as i64)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Saturating add, used for delay application where overflow should
    /// clamp to [`Time::MAX_TIME`] rather than wrap (an unbounded
    /// `inputDelay` or filter time-shift must never wrap into the past).
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<Duration> for Time {
    fn from(d: Duration) -> Self {
        Self(d.as_nanos().min(i64::MAX as u128) as i64)
    }
}

impl std::ops::Add for Time {
    type Output = Time;
    fn add(self, rhs: Time) -> Time {
        self.saturating_add(rhs)
    }
}

impl std::ops::Sub for Time {
    type Output = Time;
    fn sub(self, rhs: Time) -> Time {
        self.saturating_sub(rhs)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::MAX_TIME {
            write!(f, "MAX_TIME")
        } else {
            write!(f, "{:.9}", self.as_seconds())
        }
    }
}

/// A request for how the caller wants repeated requests at the same [`Time`]
/// handled (the `iterate` argument to `requestTime`, §4.3).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterationRequest {
    /// Never iterate; grants strictly increase (§8 "Iteration fixpoint").
    #[default]
    NoIterations,
    /// Always report `Iterating` if any dependency still has pending data
    /// at this time, regardless of whether our own inputs changed.
    ForceIteration,
    /// Iterate only if an observed input actually changed at the granted time.
    IterateIfNeeded,
}

/// The result returned alongside a granted [`Time`] from `requestTime`/`enterExecutingMode`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationResult {
    /// The federation granted strictly more time; proceed.
    NextStep,
    /// The same time was granted again because an input changed; iterate.
    Iterating,
    /// The federation or a dependency entered the error state.
    Error,
    /// The federation halted before this grant could be produced.
    Halted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_ordering() {
        assert!(Time::ZERO < Time::from_seconds(1.0));
        assert!(Time::from_seconds(1.0) < Time::MAX_TIME);
    }

    #[test]
    fn test_saturating_add_no_wrap() {
        let t = Time::MAX_TIME.saturating_add(Time::from_seconds(1.0));
        assert_eq!(t, Time::MAX_TIME);
    }
}
