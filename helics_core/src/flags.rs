//! Federate and interface option flags, per spec.md §4.2/§4.3 and
//! `examples/original_source/src/helics/core/flag-definitions.h`.
//!
//! Bit positions are carried over from the original numbering verbatim so
//! that a flag set transported as a raw bitmask (§6's wire config surface)
//! round-trips against the C++ core's own numbering even though nothing in
//! this workspace talks to that core directly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single boolean option settable on a federate or one of its interfaces.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Federate only observes the federation; it never holds up a grant
    /// and is excluded from dependency cycles.
    Observer = 0,
    /// Federate cannot be interrupted by an external time request once
    /// executing; grants to it are never revised downward.
    Uninterruptible = 1,
    /// Interface only ever produces data; no resources are allocated for
    /// inbound delivery.
    SourceOnly = 2,
    /// A publication suppresses re-sending a value that compares equal to
    /// the last one sent.
    OnlyTransmitOnChange = 3,
    /// An input suppresses re-delivery of a value that compares equal to
    /// the last one consumed.
    OnlyUpdateOnChange = 4,
    /// `requestTime` blocks until the current time's inputs are fully
    /// resolved even if a later time could already be granted.
    WaitForCurrentTimeUpdate = 5,
    /// Reserved for rollback support; accepted but not acted on (§5 Non-goals).
    Rollback = 8,
    /// Federate runs ahead of its dependencies using estimated inputs and
    /// can be asked to roll back; accepted but not acted on (§5 Non-goals).
    ForwardCompute = 9,
    /// Type or unit mismatches between a pub/input pair are logged rather
    /// than rejected at connection time.
    IgnoreInterfaceTypeMismatch = 6,
}

impl Flag {
    pub const fn bit(self) -> u32 {
        self as u32
    }
}

/// A bitset of [`Flag`]s, as carried on `FederateInfo`/interface registration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagSet(u32);

impl FlagSet {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn set(&mut self, flag: Flag, value: bool) {
        if value {
            self.0 |= 1 << flag.bit();
        } else {
            self.0 &= !(1 << flag.bit());
        }
    }

    pub fn with(mut self, flag: Flag) -> Self {
        self.set(flag, true);
        self
    }

    pub fn is_set(&self, flag: Flag) -> bool {
        self.0 & (1 << flag.bit()) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_set_roundtrip() {
        let flags = FlagSet::new()
            .with(Flag::Uninterruptible)
            .with(Flag::OnlyTransmitOnChange);
        assert!(flags.is_set(Flag::Uninterruptible));
        assert!(flags.is_set(Flag::OnlyTransmitOnChange));
        assert!(!flags.is_set(Flag::Observer));
    }
}
