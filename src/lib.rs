//! HELICS is a co-simulation runtime that federates independent simulators
//! via a distributed time-advancement protocol, an interface graph
//! (publications/inputs/endpoints/filters/translators), and value/message
//! pipelines between federates.
//!
//! ## Example
//!
//! Register a publication and an input and step time forward:
//!
//! ```rust
//! use helics::{Federate, ValueFederate};
//! use helics_core::{GlobalFederateId, IterationRequest, Time};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut fed = ValueFederate::new(GlobalFederateId(0), "fedA");
//! fed.register_publication("out", "double", "").unwrap();
//! fed.enter_initializing_mode().await.unwrap();
//! fed.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();
//! fed.publish("out", 3.5_f64.into()).unwrap();
//! let (granted, _) = fed.request_time(Time::from_seconds(1.0), IterationRequest::NoIterations).await.unwrap();
//! assert_eq!(granted, Time::from_seconds(1.0));
//! fed.finalize().await.unwrap();
//! # }
//! ```
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

#[cfg(feature = "broker")]
pub mod runner;

mod federate;

#[cfg(feature = "message")]
mod message_federate;
#[cfg(feature = "value")]
mod value_federate;

// Re-exports, mirroring the root crate's `pub use boomerang_broker as broker;` shape.
#[cfg(feature = "broker")]
pub use helics_broker as broker;
pub use helics_core as core;
pub use helics_federate as federate_core;
pub use helics_interfaces as interfaces;
pub use helics_time as time;
#[cfg(feature = "value")]
pub use helics_value as value;

pub use federate::Federate;
#[cfg(feature = "message")]
pub use message_federate::MessageFederate;
#[cfg(feature = "value")]
pub use value_federate::ValueFederate;

pub use helics_core::{Error, Result};
