//! `Command`: the federate-local analogue of spec.md's `ActionMessage`,
//! the universal intra-core command record. A real `ActionMessage` carries
//! an action code, ids/handles, a time, a counter/flags, and payload bytes
//! destined for the wire (§6 "Internal command wire format"); here it's a
//! closed Rust enum instead, since nothing in this workspace serializes it
//! to the wire directly (§0 Non-goals).

use helics_core::{GlobalFederateId, GlobalHandle, InterfaceHandle, IterationRequest, Time};
use helics_interfaces::Message;

#[derive(Debug, Clone)]
pub enum Command {
    /// `CMD_PUB`: a value arrived for one of our inputs.
    Publish {
        dest: InterfaceHandle,
        source: GlobalHandle,
        time: Time,
        iteration: u32,
        data: Vec<u8>,
    },
    /// `CMD_SEND_MESSAGE`: a message arrived for one of our endpoints.
    SendMessage { dest: InterfaceHandle, message: Message },
    /// `CMD_ADD_PUBLISHER`/`CMD_ADD_SUBSCRIBER`/`CMD_ADD_DEPENDENCY`.
    AddSource {
        input: InterfaceHandle,
        source: GlobalHandle,
        type_tag: String,
        units: String,
    },
    AddDestination {
        publication: InterfaceHandle,
        destination: GlobalHandle,
    },
    AddDependency(GlobalFederateId),
    /// `CMD_INIT_GRANT`.
    InitGrant,
    /// `CMD_EXEC_GRANT`.
    ExecGrant,
    /// `CMD_TIME_GRANT`/`CMD_TIME_CHECK`: an upstream dependency's report.
    TimeGrant {
        from: GlobalFederateId,
        next_event: Time,
        iterating: bool,
    },
    /// `CMD_FORCE_TIME_GRANT`.
    ForceTimeGrant(Time),
    /// `CMD_ERROR`.
    Error { code: helics_core::ErrorCode, message: String },
    /// `CMD_STOP`/`CMD_DISCONNECT` addressed to self.
    Disconnect,
}

impl Command {
    /// The dependency this command was sent by, if it is meaningfully
    /// ordered relative to other commands from the same sender (spec.md §5
    /// Ordering guarantee 1: "messages from a given sender are processed at
    /// the receiver in send order").
    pub fn sender(&self) -> Option<GlobalFederateId> {
        match self {
            Command::TimeGrant { from, .. } => Some(*from),
            Command::Publish { source, .. } => Some(source.federate),
            Command::SendMessage { message, .. } => Some(message.source.federate),
            _ => None,
        }
    }
}

/// The `iterate` argument threaded through `enterExecutingMode`/`requestTime`.
pub type Iterate = IterationRequest;
