//! Core types shared by every crate in the HELICS federation core:
//! identifiers (§3 "Identifiers"), the logical-time representation, the
//! closed error taxonomy (§7), and the flag/property enums (§4.2, §4.3,
//! §6) that flow between [`helics_interfaces`], [`helics_time`] and
//! [`helics_federate`].
//!
//! ## Feature flags
//! - `serde`: derive `Serialize`/`Deserialize` on the wire-visible types.

pub mod config;
pub mod error;
pub mod flags;
pub mod ids;
pub mod time;

pub use error::{Error, ErrorCode, Result};
pub use flags::Flag;
pub use ids::{FederateId, GlobalFederateId, GlobalHandle, InterfaceHandle, Route};
pub use time::{IterationRequest, IterationResult, Time};
