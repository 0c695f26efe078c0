//! `Message`, per spec.md "Entities" and
//! `examples/original_source/src/helics/application_api/Message.h`.

use helics_core::{GlobalHandle, Time};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageFlags(u16);

impl MessageFlags {
    pub const NONE: Self = Self(0);
}

/// A message moving through an `Endpoint`'s deque.
///
/// `original_source`/`original_destination` are preserved across filter
/// rerouting so a destination-side filter or the receiving federate can
/// still see where a message actually started.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub time: Time,
    pub flags: MessageFlags,
    pub message_id: u64,
    pub payload: Vec<u8>,
    pub source: GlobalHandle,
    pub destination: GlobalHandle,
    pub original_source: GlobalHandle,
    pub original_destination: GlobalHandle,
    pub counter: u64,
}

impl Message {
    pub fn new(
        time: Time,
        source: GlobalHandle,
        destination: GlobalHandle,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            time,
            flags: MessageFlags::NONE,
            message_id: 0,
            payload,
            source,
            destination,
            original_source: source,
            original_destination: destination,
            counter: 0,
        }
    }
}

/// Deque ordering key: `(time, original_source)`, per spec.md Invariant on
/// `Endpoint`.
pub fn message_order_key(msg: &Message) -> (Time, GlobalHandle) {
    (msg.time, msg.original_source)
}
