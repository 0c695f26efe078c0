//! The closed option/property enum consumed by `setProperty`/`getProperty`,
//! per spec.md §4.2.

use helics_core::Time;

/// A recognized interface option. Not every variant applies to every
/// interface kind; [`crate::registry::InterfaceRegistry::set_property`]
/// rejects ones that don't apply to the handle's kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterfaceOption {
    // common
    ConnectionRequired,
    ConnectionOptional,
    SingleConnectionOnly,
    MultipleConnectionsAllowed,
    Connections(u32),

    // input-only
    IgnoreInterrupts,
    HandleOnlyUpdateOnChange,
    StrictTypeChecking,
    IgnoreUnitMismatch,
    InputPriorityLocation(helics_core::GlobalHandle),
    ClearPriorityList,
    TimeRestricted(Time),
    /// The tolerance `onlyUpdateOnChange` compares incoming values against
    /// (spec.md §4.1's per-input change-detection `delta`).
    InputDelta(f64),

    // publication-only
    HandleOnlyTransmitOnChange,
    BufferData,

    // endpoint-only
    SendOnly,
    ReceiveOnly,
}

/// The value reported back by `getProperty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(u32),
    Time(Time),
}
