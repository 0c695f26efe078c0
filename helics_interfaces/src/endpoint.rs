//! `Endpoint`, grounded on
//! `examples/original_source/src/helics/core/EndpointInfo.hpp`.

use std::collections::VecDeque;

use helics_core::GlobalHandle;

use crate::message::{message_order_key, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    Single,
    Multiple,
}

/// A federate's message port.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub id: GlobalHandle,
    pub key: String,
    pub type_tag: String,
    pub targeted_only: bool,
    pub connection_mode: ConnectionMode,
    pub required: bool,
    /// `CONNECTIONS`: the number of connections this endpoint must have
    /// once interfaces are checked; 0 means "not enforced."
    pub required_connections: u32,
    pub send_only: bool,
    pub receive_only: bool,
    pub has_filter: bool,
    queue: VecDeque<Message>,
}

impl Endpoint {
    pub fn new(id: GlobalHandle, key: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            type_tag: type_tag.into(),
            targeted_only: false,
            connection_mode: ConnectionMode::Multiple,
            required: false,
            required_connections: 0,
            send_only: false,
            receive_only: false,
            has_filter: false,
            queue: VecDeque::new(),
        }
    }

    /// Insert-sort by `(time, original_source)`; ties are broken by
    /// insertion among equal keys staying in arrival order (stable).
    pub fn add_message(&mut self, message: Message) {
        let key = message_order_key(&message);
        let pos = self
            .queue
            .iter()
            .position(|m| message_order_key(m) > key)
            .unwrap_or(self.queue.len());
        self.queue.insert(pos, message);
    }

    pub fn pop_front(&mut self) -> Option<Message> {
        self.queue.pop_front()
    }

    pub fn front(&self) -> Option<&Message> {
        self.queue.front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn first_message_time(&self) -> Option<helics_core::Time> {
        self.queue.front().map(|m| m.time)
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helics_core::Time;

    fn gh(f: u32, h: u32) -> GlobalHandle {
        GlobalHandle::new(helics_core::GlobalFederateId(f), helics_core::InterfaceHandle(h))
    }

    #[test]
    fn test_messages_sorted_by_time_then_source() {
        let mut ep = Endpoint::new(gh(0, 0), "ep", "string");
        ep.add_message(Message::new(Time::from_seconds(2.0), gh(2, 0), gh(0, 0), vec![]));
        ep.add_message(Message::new(Time::from_seconds(1.0), gh(3, 0), gh(0, 0), vec![]));
        ep.add_message(Message::new(Time::from_seconds(1.0), gh(1, 0), gh(0, 0), vec![]));
        assert_eq!(ep.pop_front().unwrap().source, gh(1, 0));
        assert_eq!(ep.pop_front().unwrap().source, gh(3, 0));
        assert_eq!(ep.pop_front().unwrap().source, gh(2, 0));
    }
}
