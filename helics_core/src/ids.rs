//! Identifiers, per spec.md §3 "Identifiers".
//!
//! Unlike the `tinymap::key_type!` keys used internally by
//! [`helics_interfaces`] for its own per-federate tables, these ids cross
//! process and network boundaries, so they're plain `Copy` newtypes with
//! stable `Display`/`serde` forms rather than slotmap-style generational
//! keys.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Process-local handle returned by the core at registration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FederateId(pub u32);

impl fmt::Display for FederateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fed{}", self.0)
    }
}

/// Core-assigned, unique-across-the-federation federate id, stamped by the broker.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlobalFederateId(pub u32);

impl GlobalFederateId {
    /// Sentinel used before the broker has assigned a real id.
    pub const UNASSIGNED: Self = Self(u32::MAX);
}

impl fmt::Display for GlobalFederateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gfed{}", self.0)
    }
}

/// Per-federate local index into an [`helics_interfaces`]-owned interface table.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceHandle(pub u32);

impl fmt::Display for InterfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Uniquely names any publication/input/endpoint/filter on the network.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlobalHandle {
    pub federate: GlobalFederateId,
    pub handle: InterfaceHandle,
}

impl GlobalHandle {
    pub const fn new(federate: GlobalFederateId, handle: InterfaceHandle) -> Self {
        Self { federate, handle }
    }
}

impl fmt::Display for GlobalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.federate, self.handle)
    }
}

/// Opaque, transport-owned destination key used by `CoordinatorCore`.
///
/// Never interpreted by the core itself; transports mint and consume
/// these. Kept as a plain `u64` so a transport can pack whatever addressing
/// scheme it needs (socket index, shared-memory slot, etc.) without the
/// core depending on the scheme.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Route(pub u64);

impl Route {
    /// The route of the federation's root broker/parent.
    pub const PARENT: Self = Self(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_handle_display() {
        let gh = GlobalHandle::new(GlobalFederateId(2), InterfaceHandle(7));
        assert_eq!(gh.to_string(), "gfed2/h7");
    }
}
