//! `Publication`, grounded on
//! `examples/original_source/src/helics/core/PublicationInfo.hpp`.

use helics_core::GlobalHandle;

/// A federate's declared output.
#[derive(Debug, Clone)]
pub struct Publication {
    pub id: GlobalHandle,
    pub key: String,
    pub type_tag: String,
    pub units: String,
    pub only_transmit_on_change: bool,
    pub delta: f64,
    pub required: bool,
    /// `CONNECTIONS`: the number of subscribers this publication must have
    /// once interfaces are checked; 0 means "not enforced."
    pub required_connections: u32,
    pub subscribers: Vec<GlobalHandle>,
    /// Most recently published bytes, kept for change detection and for
    /// replaying to a late-joining subscriber.
    last_published: Option<Vec<u8>>,
}

impl Publication {
    pub fn new(id: GlobalHandle, key: impl Into<String>, type_tag: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            type_tag: type_tag.into(),
            units: units.into(),
            only_transmit_on_change: false,
            delta: 0.0,
            required: false,
            required_connections: 0,
            subscribers: Vec::new(),
            last_published: None,
        }
    }

    pub fn add_subscriber(&mut self, subscriber: GlobalHandle) {
        if !self.subscribers.contains(&subscriber) {
            self.subscribers.push(subscriber);
        }
    }

    pub fn remove_subscriber(&mut self, subscriber: GlobalHandle) {
        self.subscribers.retain(|s| *s != subscriber);
    }

    /// Record a publish, returning `true` if the bytes differ from the last
    /// publish (mirrors `PublicationInfo::CheckSetValue`).
    pub fn check_set_value(&mut self, data: &[u8]) -> bool {
        let changed = self.last_published.as_deref() != Some(data);
        if changed {
            self.last_published = Some(data.to_vec());
        }
        changed
    }

    pub fn last_published(&self) -> Option<&[u8]> {
        self.last_published.as_deref()
    }
}
