//! `MessageFederate`: endpoint registration and the send/receive round trip
//! through an `Endpoint`'s ordered deque, per spec.md §4.1/§4.2.

use std::ops::{Deref, DerefMut};

use helics_core::{GlobalFederateId, GlobalHandle, InterfaceHandle, Result, Time};
use helics_interfaces::{Filter, FilterKind, FilterOperator, Message};

use crate::Federate;

pub struct MessageFederate {
    federate: Federate,
}

impl MessageFederate {
    pub fn new(id: GlobalFederateId, name: impl Into<String>) -> Self {
        Self { federate: Federate::new(id, name) }
    }

    pub fn with_config(id: GlobalFederateId, config: helics_core::config::FederateConfig) -> Self {
        Self { federate: Federate::with_config(id, config) }
    }

    pub fn register_endpoint(&mut self, key: &str, type_tag: &str) -> Result<InterfaceHandle> {
        self.federate.state.registry.register_endpoint(key, type_tag)
    }

    /// Register a filter on this federate and wire it to apply to messages
    /// leaving (`FilterKind::Source`) or arriving at (`FilterKind::Destination`)
    /// `target` (spec.md §4.2's filter pipeline).
    pub fn register_filter(
        &mut self,
        key: &str,
        kind: FilterKind,
        target: GlobalHandle,
        operator: Box<dyn FilterOperator>,
    ) -> Result<InterfaceHandle> {
        let handle = self.federate.state.registry.register_filter(key, kind)?;
        let filter = self.federate.state.registry.filter_mut(handle).expect("just registered");
        filter.operator = operator;
        filter.add_target(target);
        Ok(handle)
    }

    fn handle_for_endpoint(&self, key: &str) -> Result<InterfaceHandle> {
        self.federate
            .state
            .registry
            .endpoints()
            .find(|e| e.key == key)
            .map(|e| e.id.handle)
            .ok_or_else(|| helics_core::Error::InvalidIdentifier(format!("no endpoint named '{key}'")))
    }

    /// Run `message` through every source filter targeting its origin
    /// endpoint, in registration order, the same fold `FilterFederate`-style
    /// pipelines use: each filter may pass, drop, shift, or clone the
    /// message before it continues to the next.
    fn apply_source_filters(&self, message: Message) -> Vec<Message> {
        let source = message.source;
        let mut pending = vec![message];
        for filter in self.federate.state.registry.filters() {
            if filter.kind != FilterKind::Source || !filter.target_endpoints.contains(&source) {
                continue;
            }
            pending = pending.into_iter().flat_map(|m| filter.operator.apply(m)).collect();
        }
        pending
    }

    /// Build the message(s) `send_message` would emit for `source_key` sending
    /// to `destination` at `time`, after source-filter application, without
    /// delivering them. Same-federate destinations are delivered directly by
    /// [`MessageFederate::send_message`]; cross-federate ones are the
    /// caller's (the [`crate::runner::Federation`]'s) job to forward.
    pub fn outgoing_messages(&self, source_key: &str, destination: GlobalHandle, time: Time, payload: Vec<u8>) -> Result<Vec<Message>> {
        let source_handle = self.handle_for_endpoint(source_key)?;
        let source = GlobalHandle::new(self.federate.id(), source_handle);
        let message = Message::new(time, source, destination, payload);
        Ok(self.apply_source_filters(message))
    }

    /// Queue a message for local delivery to `destination`, inserted into
    /// the destination endpoint's deque in `(time, original_source)` order
    /// (spec.md's `Endpoint` invariant), after running it through any
    /// source filters registered on `source_key`'s endpoint. Cross-federate
    /// delivery is the broker's job once the destination's endpoint lives
    /// in another federate; this only covers the in-process same-federate
    /// case directly.
    pub fn send_message(&mut self, source_key: &str, destination: GlobalHandle, time: Time, payload: Vec<u8>) -> Result<()> {
        let messages = self.outgoing_messages(source_key, destination, time, payload)?;
        for message in messages {
            if message.destination.federate == self.federate.id() {
                if let Some(endpoint) = self.federate.state.registry.endpoint_mut(message.destination.handle) {
                    endpoint.add_message(message);
                }
            }
        }
        Ok(())
    }

    /// Pop the earliest-ordered pending message for `key`, if any.
    pub fn get_message(&mut self, key: &str) -> Result<Option<Message>> {
        let handle = self.handle_for_endpoint(key)?;
        Ok(self
            .federate
            .state
            .registry
            .endpoint_mut(handle)
            .and_then(|e| e.pop_front()))
    }

    pub fn has_message(&self, key: &str) -> Result<bool> {
        let handle = self.handle_for_endpoint(key)?;
        Ok(self
            .federate
            .state
            .registry
            .endpoint(handle)
            .map(|e| !e.is_empty())
            .unwrap_or(false))
    }
}

impl Deref for MessageFederate {
    type Target = Federate;
    fn deref(&self) -> &Federate {
        &self.federate
    }
}

impl DerefMut for MessageFederate {
    fn deref_mut(&mut self) -> &mut Federate {
        &mut self.federate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_and_receive_same_federate_loopback() {
        let mut fed = MessageFederate::new(GlobalFederateId(0), "fedA");
        fed.register_endpoint("a", "string").unwrap();
        fed.register_endpoint("b", "string").unwrap();
        let b = fed.handle_for_endpoint("b").unwrap();
        let dest = GlobalHandle::new(GlobalFederateId(0), b);
        fed.enter_initializing_mode().await.unwrap();
        fed.enter_executing_mode(helics_core::IterationRequest::NoIterations).await.unwrap();
        fed.send_message("a", dest, Time::ZERO, b"hello".to_vec()).unwrap();
        assert!(fed.has_message("b").unwrap());
        let msg = fed.get_message("b").unwrap().unwrap();
        assert_eq!(msg.payload, b"hello");
    }
}
