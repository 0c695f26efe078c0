//! `TimeCoordinator`, per spec.md §4.3: computes the earliest time a grant
//! to a requested time is safe, given a federate's dependencies and
//! dependents, using a Chandy-Misra-style null-message algorithm with
//! iteration, a four-stage grant-timeout escalation protocol, and
//! real-time grant scheduling.

pub mod coordinator;
pub mod dependency;
pub mod grant_timeout;
pub mod realtime;

pub use coordinator::{ProcessResult, TimeCoordinator};
pub use dependency::{DependencyInfo, DependentInfo};
pub use grant_timeout::{GrantTimeoutStage, GrantTimeoutTracker};
pub use realtime::RealTimeScheduler;
