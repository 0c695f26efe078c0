//! `InterfaceRegistry`, per spec.md §4.2: owns the four interface tables of
//! a federate (publications, inputs, endpoints, filters) plus translators;
//! validates option flags and connectivity; translates external targets to
//! `GlobalHandle`s.

pub mod endpoint;
pub mod filter;
pub mod input;
pub mod message;
pub mod options;
pub mod publication;
pub mod registry;
pub mod translator;
pub mod units;

pub use endpoint::Endpoint;
pub use filter::{Filter, FilterKind, FilterOperator};
pub use input::Input;
pub use message::Message;
pub use options::{InterfaceOption, PropertyValue};
pub use publication::Publication;
pub use registry::{compatible, InterfaceIssue, InterfaceRegistry, RegistrationState};
pub use translator::Translator;
