//! The broker: a process-level hub that multiplexes many `FederateState`s,
//! performs name registration, forwards commands, and answers queries
//! (spec.md §4.5).

pub mod coordinator;
pub mod message;
pub mod query;
pub mod transport;

pub use coordinator::{CoordinatorCore, InterfaceKind};
pub use message::{BrokerMessage, ClockSyncStat, FederateAck, RegisterFederate};
pub use query::{parse_target, route_query, QueryTarget};
pub use transport::{connect_broker, Transport};
