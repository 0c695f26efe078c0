//! Per-federate runtime: the lifecycle state machine, the command types
//! that cross a federate's mailbox, and the `FederateState` that owns a
//! federate's interface registry and time coordinator, per spec.md §4.4.

pub mod command;
pub mod federate;
pub mod state;

pub use command::{Command, Iterate};
pub use federate::{EventVectorMode, FederateState};
pub use state::LifecycleState;
