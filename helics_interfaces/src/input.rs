//! `Input`, grounded on
//! `examples/original_source/src/helics/core/InputInfo.hpp`.

use std::collections::VecDeque;

use helics_core::{GlobalHandle, Time};

/// One record in a source's queue: `(time, iteration, bytes)`, kept in
/// strictly non-decreasing `(time, iteration)` order (spec.md Invariant 3).
#[derive(Debug, Clone)]
pub struct DataRecord {
    pub time: Time,
    pub iteration: u32,
    pub data: Vec<u8>,
}

/// Per-source bookkeeping for an `Input`.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub handle: GlobalHandle,
    pub type_tag: String,
    pub units: String,
    queue: VecDeque<DataRecord>,
    /// Set once the source federate disconnects; no further data is
    /// accepted from it after this time.
    pub deactivated: Option<Time>,
}

impl SourceInfo {
    fn new(handle: GlobalHandle, type_tag: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            handle,
            type_tag: type_tag.into(),
            units: units.into(),
            queue: VecDeque::new(),
            deactivated: None,
        }
    }

    /// Insert a record, enforcing non-decreasing `(time, iteration)` order
    /// and uniqueness per source (spec.md Invariant 3). A record with an
    /// iteration equal to the last queued one at the same time replaces it
    /// (a later resend of the same iteration supersedes the earlier one).
    fn add_data(&mut self, record: DataRecord) {
        if let Some(last) = self.queue.back() {
            if (record.time, record.iteration) == (last.time, last.iteration) {
                *self.queue.back_mut().unwrap() = record;
                return;
            }
        }
        self.queue.push_back(record);
    }

    pub fn current_data(&self) -> Option<&DataRecord> {
        self.queue.back()
    }

    pub fn queue(&self) -> impl Iterator<Item = &DataRecord> {
        self.queue.iter()
    }
}

/// A federate's declared input.
#[derive(Debug, Clone)]
pub struct Input {
    pub id: GlobalHandle,
    pub key: String,
    pub type_tag: String,
    pub units: String,
    pub only_update_on_change: bool,
    /// The tolerance `onlyUpdateOnChange` compares values against; 0.0 means
    /// "any difference counts."
    pub delta: f64,
    pub strict_type_match: bool,
    pub ignore_unit_mismatch: bool,
    pub min_time_gap: Time,
    pub required: bool,
    /// `CONNECTIONS`: the number of sources this input must have once
    /// interfaces are checked; 0 means "not enforced" (spec.md §4.2's
    /// "required count not met" condition).
    pub required_connections: u32,
    /// Priority order over `sources`, by `GlobalHandle`; empty means
    /// registration order.
    pub priority_sources: Vec<GlobalHandle>,
    sources: Vec<SourceInfo>,
}

impl Input {
    pub fn new(id: GlobalHandle, key: impl Into<String>, type_tag: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            type_tag: type_tag.into(),
            units: units.into(),
            only_update_on_change: false,
            delta: 0.0,
            strict_type_match: false,
            ignore_unit_mismatch: false,
            min_time_gap: Time::ZERO,
            required: false,
            required_connections: 0,
            priority_sources: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn sources(&self) -> &[SourceInfo] {
        &self.sources
    }

    /// Idempotent on re-add, per spec.md §4.2.
    pub fn add_source(&mut self, handle: GlobalHandle, type_tag: impl Into<String>, units: impl Into<String>) {
        if self.sources.iter().any(|s| s.handle == handle) {
            return;
        }
        self.sources.push(SourceInfo::new(handle, type_tag, units));
    }

    pub fn remove_source(&mut self, handle: GlobalHandle) {
        self.sources.retain(|s| s.handle != handle);
        self.priority_sources.retain(|h| *h != handle);
    }

    pub fn disconnect_source(&mut self, handle: GlobalHandle, at: Time) {
        if let Some(source) = self.sources.iter_mut().find(|s| s.handle == handle) {
            source.deactivated = Some(at);
        }
    }

    pub fn add_data(&mut self, source: GlobalHandle, record: DataRecord) {
        if let Some(s) = self.sources.iter_mut().find(|s| s.handle == source) {
            s.add_data(record);
        }
    }

    /// The order user code observes multiple sources in when their times
    /// tie: the priority list if set, else registration order (spec.md §5
    /// Ordering guarantee 3).
    pub fn observation_order(&self) -> Vec<GlobalHandle> {
        if self.priority_sources.is_empty() {
            self.sources.iter().map(|s| s.handle).collect()
        } else {
            let mut ordered: Vec<GlobalHandle> = self
                .priority_sources
                .iter()
                .copied()
                .filter(|h| self.sources.iter().any(|s| s.handle == *h))
                .collect();
            for s in &self.sources {
                if !ordered.contains(&s.handle) {
                    ordered.push(s.handle);
                }
            }
            ordered
        }
    }
}

/// `checkTypeMatch(t1, t2, strict)`, per `InputInfo.hpp`'s free function of
/// the same name: delegates to [`crate::registry::compatible`].
pub fn check_type_match(declared: &str, source: &str, strict: bool) -> bool {
    crate::registry::compatible(declared, source, strict)
}

/// `checkUnitMatch(u1, u2, strict)`.
pub fn check_unit_match(a: &str, b: &str, ignore: bool) -> bool {
    ignore || crate::units::unit_compatible(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gh(f: u32, h: u32) -> GlobalHandle {
        GlobalHandle::new(helics_core::GlobalFederateId(f), helics_core::InterfaceHandle(h))
    }

    #[test]
    fn test_add_source_idempotent() {
        let mut input = Input::new(gh(0, 0), "in", "double", "");
        input.add_source(gh(1, 0), "double", "");
        input.add_source(gh(1, 0), "double", "");
        assert_eq!(input.sources().len(), 1);
    }

    #[test]
    fn test_data_ordering_by_time_and_iteration() {
        let mut input = Input::new(gh(0, 0), "in", "double", "");
        input.add_source(gh(1, 0), "double", "");
        let src = gh(1, 0);
        input.add_data(src, DataRecord { time: Time::ZERO, iteration: 0, data: vec![1] });
        input.add_data(src, DataRecord { time: Time::from_seconds(1.0), iteration: 0, data: vec![2] });
        let records: Vec<_> = input.sources()[0].queue().collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].time < records[1].time);
    }
}
