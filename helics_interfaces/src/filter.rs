//! `Filter`, grounded on
//! `examples/original_source/src/helics/core/FilterInfo.cpp`.

use helics_core::{GlobalHandle, Time};

use crate::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Source,
    Destination,
}

/// The callback behavior a filter applies to a message passing through it.
///
/// Cloning filters may emit additional messages alongside the original;
/// generating filters may fabricate messages with no input at all. Both
/// are modeled as "one message in (or none), zero or more out".
pub trait FilterOperator: std::fmt::Debug + Send + Sync {
    fn apply(&self, message: Message) -> Vec<Message>;
}

/// Passes the message through unchanged.
#[derive(Debug, Default)]
pub struct IdentityOperator;

impl FilterOperator for IdentityOperator {
    fn apply(&self, message: Message) -> Vec<Message> {
        vec![message]
    }
}

/// Adds a fixed delay to the message's delivery time.
#[derive(Debug)]
pub struct TimeShiftOperator {
    pub delay: Time,
}

impl FilterOperator for TimeShiftOperator {
    fn apply(&self, mut message: Message) -> Vec<Message> {
        message.time = message.time.saturating_add(self.delay);
        vec![message]
    }
}

/// Drops every message it sees.
#[derive(Debug, Default)]
pub struct DropOperator;

impl FilterOperator for DropOperator {
    fn apply(&self, _message: Message) -> Vec<Message> {
        Vec::new()
    }
}

/// A filter on an endpoint's source or destination path.
pub struct Filter {
    pub id: GlobalHandle,
    pub key: String,
    pub kind: FilterKind,
    pub target_endpoints: Vec<GlobalHandle>,
    pub input_type: String,
    pub output_type: String,
    pub operator: Box<dyn FilterOperator>,
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("target_endpoints", &self.target_endpoints)
            .finish()
    }
}

impl Filter {
    pub fn new(id: GlobalHandle, key: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            id,
            key: key.into(),
            kind,
            target_endpoints: Vec::new(),
            input_type: String::new(),
            output_type: String::new(),
            operator: Box::new(IdentityOperator),
        }
    }

    pub fn add_target(&mut self, target: GlobalHandle) {
        if !self.target_endpoints.contains(&target) {
            self.target_endpoints.push(target);
        }
    }

    pub fn remove_target(&mut self, target: GlobalHandle) {
        self.target_endpoints.retain(|t| *t != target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gh(f: u32, h: u32) -> GlobalHandle {
        GlobalHandle::new(helics_core::GlobalFederateId(f), helics_core::InterfaceHandle(h))
    }

    #[test]
    fn test_time_shift_operator() {
        let op = TimeShiftOperator { delay: Time::from_seconds(1.0) };
        let msg = Message::new(Time::ZERO, gh(0, 0), gh(1, 0), vec![]);
        let out = op.apply(msg);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].time, Time::from_seconds(1.0));
    }

    #[test]
    fn test_drop_operator() {
        let op = DropOperator;
        let msg = Message::new(Time::ZERO, gh(0, 0), gh(1, 0), vec![]);
        assert!(op.apply(msg).is_empty());
    }
}
