//! `ValueFederate`: publication/input registration and the publish/get
//! round trip through [`helics_value`]'s codec, per spec.md §4.1/§4.2.

use std::ops::{Deref, DerefMut};

use helics_core::{GlobalFederateId, InterfaceHandle, Result};
use helics_value::Value;

use crate::Federate;

pub struct ValueFederate {
    federate: Federate,
}

impl ValueFederate {
    pub fn new(id: GlobalFederateId, name: impl Into<String>) -> Self {
        Self { federate: Federate::new(id, name) }
    }

    pub fn with_config(id: GlobalFederateId, config: helics_core::config::FederateConfig) -> Self {
        Self { federate: Federate::with_config(id, config) }
    }

    pub fn register_publication(&mut self, key: &str, type_tag: &str, units: &str) -> Result<InterfaceHandle> {
        self.federate.state.registry.register_publication(key, type_tag, units)
    }

    pub fn register_input(&mut self, key: &str, type_tag: &str, units: &str) -> Result<InterfaceHandle> {
        self.federate.state.registry.register_input(key, type_tag, units)
    }

    /// Encode `value` and record it on the named publication, honoring
    /// `only_transmit_on_change` the same way
    /// `PublicationInfo::CheckSetValue` does: a call that doesn't change the
    /// encoded bytes is recorded but produces no downstream effect here,
    /// since fan-out to subscribers is the broker's job once this
    /// publication has subscribers wired up.
    pub fn publish(&mut self, key: &str, value: Value) -> Result<bool> {
        let handle = self.handle_for_publication(key)?;
        let encoded = helics_value::encode(&value);
        let publication = self
            .federate
            .state
            .registry
            .publication_mut(handle)
            .expect("dispatch table returned a handle with no publication");
        Ok(publication.check_set_value(&encoded))
    }

    /// The most recent value on `key`'s current (highest-priority) source,
    /// coerced to `target` if it differs from the source's declared type.
    pub fn get_input(&self, key: &str, target: helics_value::TargetType) -> Result<Option<Value>> {
        let handle = self.handle_for_input(key)?;
        let input = self
            .federate
            .state
            .registry
            .input(handle)
            .expect("dispatch table returned a handle with no input");
        let Some(source) = input.observation_order().into_iter().find_map(|h| {
            input
                .sources()
                .iter()
                .find(|s| s.handle == h)
                .filter(|s| s.current_data().is_some())
        }) else {
            return Ok(None);
        };
        let record = source.current_data().expect("filtered for Some above");
        let value = helics_value::decode(&record.data)?;
        Ok(Some(helics_value::coerce(&value, target)?))
    }

    /// This publication's own handle and its current subscriber list, for a
    /// broker-style caller fanning out a value a local `publish` just
    /// recorded (the in-process [`crate::runner::Federation`] harness has no
    /// background task pumping publishes on its own).
    pub fn publication_subscribers(&self, key: &str) -> Result<(helics_core::GlobalHandle, Vec<helics_core::GlobalHandle>)> {
        let handle = self.handle_for_publication(key)?;
        let publication = self
            .federate
            .state
            .registry
            .publication(handle)
            .expect("dispatch table returned a handle with no publication");
        Ok((helics_core::GlobalHandle::new(self.federate.id(), handle), publication.subscribers.clone()))
    }

    /// The raw encoded bytes currently recorded on `key`, for forwarding
    /// through [`crate::runner::Federation::publish_value`].
    pub fn last_published(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let handle = self.handle_for_publication(key)?;
        Ok(self
            .federate
            .state
            .registry
            .publication(handle)
            .and_then(|p| p.last_published())
            .map(|b| b.to_vec()))
    }

    fn handle_for_publication(&self, key: &str) -> Result<InterfaceHandle> {
        self.federate
            .state
            .registry
            .publications()
            .find(|p| p.key == key)
            .map(|p| p.id.handle)
            .ok_or_else(|| helics_core::Error::InvalidIdentifier(format!("no publication named '{key}'")))
    }

    fn handle_for_input(&self, key: &str) -> Result<InterfaceHandle> {
        self.federate
            .state
            .registry
            .inputs()
            .find(|i| i.key == key)
            .map(|i| i.id.handle)
            .ok_or_else(|| helics_core::Error::InvalidIdentifier(format!("no input named '{key}'")))
    }
}

impl Deref for ValueFederate {
    type Target = Federate;
    fn deref(&self) -> &Federate {
        &self.federate
    }
}

impl DerefMut for ValueFederate {
    fn deref_mut(&mut self) -> &mut Federate {
        &mut self.federate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helics_core::{IterationRequest, Time};

    #[tokio::test]
    async fn test_publish_then_get_after_grant() {
        let mut fed = ValueFederate::new(GlobalFederateId(0), "fedA");
        fed.register_publication("out", "double", "").unwrap();
        fed.register_input("in", "double", "").unwrap();
        let out = fed.handle_for_publication("out").unwrap();
        let in_handle = fed.handle_for_input("in").unwrap();
        fed.federate.state.registry.input_mut(in_handle).unwrap().add_source(
            helics_core::GlobalHandle::new(GlobalFederateId(0), out),
            "double",
            "",
        );
        fed.enter_initializing_mode().await.unwrap();
        fed.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();
        fed.federate.state.registry.input_mut(in_handle).unwrap().add_data(
            helics_core::GlobalHandle::new(GlobalFederateId(0), out),
            helics_interfaces::input::DataRecord {
                time: Time::ZERO,
                iteration: 0,
                data: helics_value::encode(&Value::Double(2.5)),
            },
        );
        let got = fed.get_input("in", helics_value::TargetType::Double).unwrap();
        assert_eq!(got, Some(Value::Double(2.5)));
    }

    #[tokio::test]
    async fn test_get_input_skips_source_with_no_data_yet() {
        let mut fed = ValueFederate::new(GlobalFederateId(0), "fedA");
        fed.register_input("in", "double", "").unwrap();
        let in_handle = fed.handle_for_input("in").unwrap();
        let first = helics_core::GlobalHandle::new(GlobalFederateId(1), InterfaceHandle(0));
        let second = helics_core::GlobalHandle::new(GlobalFederateId(2), InterfaceHandle(0));
        let input = fed.federate.state.registry.input_mut(in_handle).unwrap();
        input.add_source(first, "double", "");
        input.add_source(second, "double", "");
        fed.enter_initializing_mode().await.unwrap();
        fed.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();
        // Only the second-registered source has actually published anything.
        fed.federate.state.registry.input_mut(in_handle).unwrap().add_data(
            second,
            helics_interfaces::input::DataRecord {
                time: Time::ZERO,
                iteration: 0,
                data: helics_value::encode(&Value::Double(7.0)),
            },
        );
        let got = fed.get_input("in", helics_value::TargetType::Double).unwrap();
        assert_eq!(got, Some(Value::Double(7.0)));
    }

    #[tokio::test]
    async fn test_get_input_honors_priority_list_over_registration_order() {
        let mut fed = ValueFederate::new(GlobalFederateId(0), "fedA");
        fed.register_input("in", "double", "").unwrap();
        let in_handle = fed.handle_for_input("in").unwrap();
        let first = helics_core::GlobalHandle::new(GlobalFederateId(1), InterfaceHandle(0));
        let second = helics_core::GlobalHandle::new(GlobalFederateId(2), InterfaceHandle(0));
        let input = fed.federate.state.registry.input_mut(in_handle).unwrap();
        input.add_source(first, "double", "");
        input.add_source(second, "double", "");
        fed.federate
            .state
            .registry
            .set_property(in_handle, helics_interfaces::options::InterfaceOption::InputPriorityLocation(second))
            .unwrap();
        fed.enter_initializing_mode().await.unwrap();
        fed.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();
        // Both sources have data; the priority list names `second` first.
        fed.federate.state.registry.input_mut(in_handle).unwrap().add_data(
            first,
            helics_interfaces::input::DataRecord { time: Time::ZERO, iteration: 0, data: helics_value::encode(&Value::Double(1.0)) },
        );
        fed.federate.state.registry.input_mut(in_handle).unwrap().add_data(
            second,
            helics_interfaces::input::DataRecord { time: Time::ZERO, iteration: 0, data: helics_value::encode(&Value::Double(2.0)) },
        );
        let got = fed.get_input("in", helics_value::TargetType::Double).unwrap();
        assert_eq!(got, Some(Value::Double(2.0)));
    }

    #[test]
    fn test_unknown_publication_is_invalid_identifier() {
        let fed = ValueFederate::new(GlobalFederateId(0), "fedA");
        assert!(matches!(
            fed.handle_for_publication("missing"),
            Err(helics_core::Error::InvalidIdentifier(_))
        ));
    }
}
