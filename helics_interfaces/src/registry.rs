//! `InterfaceRegistry`, per spec.md §4.2.
//!
//! Owns the four interface tables of a single federate. Each kind is kept
//! in its own dense [`tinymap::TinyMap`] (the same keyed-collection pattern
//! `boomerang_runtime` uses for its per-reactor port/action tables); a
//! `InterfaceHandle -> (kind, local key)` side table lets callers address
//! any interface by the single flat handle space the rest of the core uses.

use std::collections::HashMap;

use helics_core::{Error, Flag, GlobalFederateId, GlobalHandle, InterfaceHandle, Result, Time};

use crate::endpoint::Endpoint;
use crate::filter::{Filter, FilterKind};
use crate::input::Input;
use crate::options::{InterfaceOption, PropertyValue};
use crate::publication::Publication;
use crate::translator::Translator;

tinymap::key_type! { PubKey }
tinymap::key_type! { InputKey }
tinymap::key_type! { EndpointKey }
tinymap::key_type! { FilterKey }
tinymap::key_type! { TranslatorKey }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Publication(PubKey),
    Input(InputKey),
    Endpoint(EndpointKey),
    Filter(FilterKey),
    Translator(TranslatorKey),
}

/// An `(error_code, message)` pair as returned by `checkInterfacesForIssues`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceIssue {
    pub code: helics_core::ErrorCode,
    pub message: String,
}

/// The states registration is allowed in, per spec.md Invariant 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Created,
    Locked,
}

pub struct InterfaceRegistry {
    federate: GlobalFederateId,
    state: RegistrationState,
    next_handle: u32,
    dispatch: HashMap<InterfaceHandle, Kind>,
    pub_names: HashMap<String, InterfaceHandle>,
    input_names: HashMap<String, InterfaceHandle>,
    endpoint_names: HashMap<String, InterfaceHandle>,
    filter_names: HashMap<String, InterfaceHandle>,
    translator_names: HashMap<String, InterfaceHandle>,
    publications: tinymap::TinyMap<PubKey, Publication>,
    inputs: tinymap::TinyMap<InputKey, Input>,
    endpoints: tinymap::TinyMap<EndpointKey, Endpoint>,
    filters: tinymap::TinyMap<FilterKey, Filter>,
    translators: tinymap::TinyMap<TranslatorKey, Translator>,
    /// Propagates to every input created after it is set, per spec.md §4.2
    /// "Change-detection flag propagates from the registry to each input
    /// created thereafter."
    default_only_update_on_change: bool,
}

impl InterfaceRegistry {
    pub fn new(federate: GlobalFederateId) -> Self {
        Self {
            federate,
            state: RegistrationState::Created,
            next_handle: 0,
            dispatch: HashMap::new(),
            pub_names: HashMap::new(),
            input_names: HashMap::new(),
            endpoint_names: HashMap::new(),
            filter_names: HashMap::new(),
            translator_names: HashMap::new(),
            publications: tinymap::TinyMap::new(),
            inputs: tinymap::TinyMap::new(),
            endpoints: tinymap::TinyMap::new(),
            filters: tinymap::TinyMap::new(),
            translators: tinymap::TinyMap::new(),
            default_only_update_on_change: false,
        }
    }

    pub fn set_default_only_update_on_change(&mut self, value: bool) {
        self.default_only_update_on_change = value;
    }

    /// Registration only proceeds in CREATED (spec.md Invariant 5); call
    /// this once the federate enters INITIALIZING to close the window.
    pub fn lock(&mut self) {
        self.state = RegistrationState::Locked;
    }

    fn check_creatable(&self) -> Result<()> {
        if self.state != RegistrationState::Created {
            return Err(Error::InvalidFunctionCall(
                "interfaces can only be registered while the federate is in CREATED state".into(),
            ));
        }
        Ok(())
    }

    fn mint_handle(&mut self) -> GlobalHandle {
        let handle = InterfaceHandle(self.next_handle);
        self.next_handle += 1;
        GlobalHandle::new(self.federate, handle)
    }

    pub fn register_publication(
        &mut self,
        key: &str,
        type_tag: &str,
        units: &str,
    ) -> Result<InterfaceHandle> {
        self.check_creatable()?;
        if self.pub_names.contains_key(key) {
            return Err(Error::RegistrationFailure(format!(
                "duplicate publication key '{key}'"
            )));
        }
        let gh = self.mint_handle();
        let local = self.publications.insert(Publication::new(gh, key, type_tag, units));
        self.dispatch.insert(gh.handle, Kind::Publication(local));
        self.pub_names.insert(key.to_string(), gh.handle);
        Ok(gh.handle)
    }

    pub fn register_input(&mut self, key: &str, type_tag: &str, units: &str) -> Result<InterfaceHandle> {
        self.check_creatable()?;
        if self.input_names.contains_key(key) {
            return Err(Error::RegistrationFailure(format!("duplicate input key '{key}'")));
        }
        let gh = self.mint_handle();
        let mut input = Input::new(gh, key, type_tag, units);
        input.only_update_on_change = self.default_only_update_on_change;
        let local = self.inputs.insert(input);
        self.dispatch.insert(gh.handle, Kind::Input(local));
        self.input_names.insert(key.to_string(), gh.handle);
        Ok(gh.handle)
    }

    pub fn register_endpoint(&mut self, key: &str, type_tag: &str) -> Result<InterfaceHandle> {
        self.check_creatable()?;
        if self.endpoint_names.contains_key(key) {
            return Err(Error::RegistrationFailure(format!("duplicate endpoint key '{key}'")));
        }
        let gh = self.mint_handle();
        let local = self.endpoints.insert(Endpoint::new(gh, key, type_tag));
        self.dispatch.insert(gh.handle, Kind::Endpoint(local));
        self.endpoint_names.insert(key.to_string(), gh.handle);
        Ok(gh.handle)
    }

    pub fn register_filter(&mut self, key: &str, kind: FilterKind) -> Result<InterfaceHandle> {
        self.check_creatable()?;
        if self.filter_names.contains_key(key) {
            return Err(Error::RegistrationFailure(format!("duplicate filter key '{key}'")));
        }
        let gh = self.mint_handle();
        let local = self.filters.insert(Filter::new(gh, key, kind));
        self.dispatch.insert(gh.handle, Kind::Filter(local));
        self.filter_names.insert(key.to_string(), gh.handle);
        Ok(gh.handle)
    }

    pub fn register_translator(&mut self, key: &str, endpoint_type: &str, units: &str) -> Result<InterfaceHandle> {
        self.check_creatable()?;
        if self.translator_names.contains_key(key) {
            return Err(Error::RegistrationFailure(format!("duplicate translator key '{key}'")));
        }
        let gh = self.mint_handle();
        let local = self.translators.insert(Translator::new(gh, key, endpoint_type, units));
        self.dispatch.insert(gh.handle, Kind::Translator(local));
        self.translator_names.insert(key.to_string(), gh.handle);
        Ok(gh.handle)
    }

    pub fn publication(&self, handle: InterfaceHandle) -> Option<&Publication> {
        match self.dispatch.get(&handle) {
            Some(Kind::Publication(k)) => self.publications.get(*k),
            _ => None,
        }
    }

    pub fn publication_mut(&mut self, handle: InterfaceHandle) -> Option<&mut Publication> {
        match self.dispatch.get(&handle) {
            Some(Kind::Publication(k)) => self.publications.get_mut(*k),
            _ => None,
        }
    }

    pub fn input(&self, handle: InterfaceHandle) -> Option<&Input> {
        match self.dispatch.get(&handle) {
            Some(Kind::Input(k)) => self.inputs.get(*k),
            _ => None,
        }
    }

    pub fn input_mut(&mut self, handle: InterfaceHandle) -> Option<&mut Input> {
        match self.dispatch.get(&handle) {
            Some(Kind::Input(k)) => self.inputs.get_mut(*k),
            _ => None,
        }
    }

    pub fn endpoint(&self, handle: InterfaceHandle) -> Option<&Endpoint> {
        match self.dispatch.get(&handle) {
            Some(Kind::Endpoint(k)) => self.endpoints.get(*k),
            _ => None,
        }
    }

    pub fn endpoint_mut(&mut self, handle: InterfaceHandle) -> Option<&mut Endpoint> {
        match self.dispatch.get(&handle) {
            Some(Kind::Endpoint(k)) => self.endpoints.get_mut(*k),
            _ => None,
        }
    }

    pub fn filter(&self, handle: InterfaceHandle) -> Option<&Filter> {
        match self.dispatch.get(&handle) {
            Some(Kind::Filter(k)) => self.filters.get(*k),
            _ => None,
        }
    }

    pub fn filter_mut(&mut self, handle: InterfaceHandle) -> Option<&mut Filter> {
        match self.dispatch.get(&handle) {
            Some(Kind::Filter(k)) => self.filters.get_mut(*k),
            _ => None,
        }
    }

    pub fn translator(&self, handle: InterfaceHandle) -> Option<&Translator> {
        match self.dispatch.get(&handle) {
            Some(Kind::Translator(k)) => self.translators.get(*k),
            _ => None,
        }
    }

    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.publications.values()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Input> {
        self.inputs.values()
    }

    pub fn inputs_mut(&mut self) -> impl Iterator<Item = &mut Input> {
        self.inputs.values_mut()
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn filters(&self) -> impl Iterator<Item = &Filter> {
        self.filters.values()
    }

    pub fn set_property(&mut self, handle: InterfaceHandle, option: InterfaceOption) -> Result<()> {
        use InterfaceOption as O;
        match self.dispatch.get(&handle).copied() {
            Some(Kind::Input(k)) => {
                let input = self.inputs.get_mut(k).expect("dispatch table out of sync");
                match option {
                    O::HandleOnlyUpdateOnChange => input.only_update_on_change = true,
                    O::StrictTypeChecking => input.strict_type_match = true,
                    O::IgnoreUnitMismatch => input.ignore_unit_mismatch = true,
                    O::IgnoreInterrupts => {}
                    O::ConnectionRequired => input.required = true,
                    O::ConnectionOptional => input.required = false,
                    O::InputPriorityLocation(target) => input.priority_sources.push(target),
                    O::ClearPriorityList => input.priority_sources.clear(),
                    O::TimeRestricted(gap) => input.min_time_gap = gap,
                    O::InputDelta(delta) => input.delta = delta,
                    O::Connections(n) => input.required_connections = n,
                    _ => {
                        return Err(Error::InvalidParameter(format!(
                            "{option:?} does not apply to an input"
                        )))
                    }
                }
            }
            Some(Kind::Publication(k)) => {
                let publication = self.publications.get_mut(k).expect("dispatch table out of sync");
                match option {
                    O::HandleOnlyTransmitOnChange => publication.only_transmit_on_change = true,
                    O::ConnectionRequired => publication.required = true,
                    O::ConnectionOptional => publication.required = false,
                    O::Connections(n) => publication.required_connections = n,
                    O::BufferData => {}
                    _ => {
                        return Err(Error::InvalidParameter(format!(
                            "{option:?} does not apply to a publication"
                        )))
                    }
                }
            }
            Some(Kind::Endpoint(k)) => {
                let endpoint = self.endpoints.get_mut(k).expect("dispatch table out of sync");
                match option {
                    O::SendOnly => endpoint.send_only = true,
                    O::ReceiveOnly => endpoint.receive_only = true,
                    O::ConnectionRequired => endpoint.required = true,
                    O::ConnectionOptional => endpoint.required = false,
                    O::SingleConnectionOnly => {
                        endpoint.connection_mode = crate::endpoint::ConnectionMode::Single
                    }
                    O::MultipleConnectionsAllowed => {
                        endpoint.connection_mode = crate::endpoint::ConnectionMode::Multiple
                    }
                    O::Connections(n) => endpoint.required_connections = n,
                    _ => {
                        return Err(Error::InvalidParameter(format!(
                            "{option:?} does not apply to an endpoint"
                        )))
                    }
                }
            }
            _ => {
                return Err(Error::InvalidIdentifier(format!(
                    "no interface registered for handle {handle}"
                )))
            }
        }
        Ok(())
    }

    pub fn get_property(&self, handle: InterfaceHandle, option: InterfaceOption) -> Result<PropertyValue> {
        use InterfaceOption as O;
        match (self.dispatch.get(&handle), option) {
            (Some(Kind::Input(k)), O::HandleOnlyUpdateOnChange) => Ok(PropertyValue::Bool(
                self.inputs.get(*k).expect("dispatch table out of sync").only_update_on_change,
            )),
            (Some(Kind::Input(k)), O::StrictTypeChecking) => Ok(PropertyValue::Bool(
                self.inputs.get(*k).expect("dispatch table out of sync").strict_type_match,
            )),
            (Some(Kind::Input(k)), O::TimeRestricted(_)) => Ok(PropertyValue::Time(
                self.inputs.get(*k).expect("dispatch table out of sync").min_time_gap,
            )),
            (Some(Kind::Publication(k)), O::HandleOnlyTransmitOnChange) => Ok(PropertyValue::Bool(
                self.publications
                    .get(*k)
                    .expect("dispatch table out of sync")
                    .only_transmit_on_change,
            )),
            (None, _) => Err(Error::InvalidIdentifier(format!(
                "no interface registered for handle {handle}"
            ))),
            _ => Err(Error::InvalidParameter(format!(
                "{option:?} is not a recognized property for this interface"
            ))),
        }
    }

    /// `checkInterfacesForIssues`: required connections without targets,
    /// required count not met, or type/unit mismatch under strict mode.
    pub fn check_interfaces_for_issues(&self) -> Vec<InterfaceIssue> {
        let mut issues = Vec::new();
        for input in self.inputs.values() {
            if input.required && input.sources().is_empty() {
                issues.push(InterfaceIssue {
                    code: helics_core::ErrorCode::ConnectionFailure,
                    message: format!("input '{}' requires a connection but has none", input.key),
                });
            }
            if input.required_connections > 0 && (input.sources().len() as u32) < input.required_connections {
                issues.push(InterfaceIssue {
                    code: helics_core::ErrorCode::ConnectionFailure,
                    message: format!(
                        "input '{}' requires {} connections but has {}",
                        input.key,
                        input.required_connections,
                        input.sources().len()
                    ),
                });
            }
            for source in input.sources() {
                if !compatible(&input.type_tag, &source.type_tag, input.strict_type_match) {
                    issues.push(InterfaceIssue {
                        code: helics_core::ErrorCode::ConnectionFailure,
                        message: format!(
                            "input '{}' type '{}' incompatible with source type '{}'",
                            input.key, input.type_tag, source.type_tag
                        ),
                    });
                }
                if !input.ignore_unit_mismatch
                    && !crate::units::unit_compatible(&input.units, &source.units)
                {
                    issues.push(InterfaceIssue {
                        code: helics_core::ErrorCode::ConnectionFailure,
                        message: format!(
                            "input '{}' units '{}' incompatible with source units '{}'",
                            input.key, input.units, source.units
                        ),
                    });
                }
            }
        }
        for publication in self.publications.values() {
            if publication.required && publication.subscribers.is_empty() {
                issues.push(InterfaceIssue {
                    code: helics_core::ErrorCode::ConnectionFailure,
                    message: format!(
                        "publication '{}' requires a subscriber but has none",
                        publication.key
                    ),
                });
            }
            if publication.required_connections > 0
                && (publication.subscribers.len() as u32) < publication.required_connections
            {
                issues.push(InterfaceIssue {
                    code: helics_core::ErrorCode::ConnectionFailure,
                    message: format!(
                        "publication '{}' requires {} connections but has {}",
                        publication.key,
                        publication.required_connections,
                        publication.subscribers.len()
                    ),
                });
            }
        }
        for endpoint in self.endpoints.values() {
            if endpoint.required && endpoint.is_empty() {
                issues.push(InterfaceIssue {
                    code: helics_core::ErrorCode::ConnectionFailure,
                    message: format!("endpoint '{}' requires a connection but has none", endpoint.key),
                });
            }
            if endpoint.required_connections > 0 && (endpoint.len() as u32) < endpoint.required_connections {
                issues.push(InterfaceIssue {
                    code: helics_core::ErrorCode::ConnectionFailure,
                    message: format!(
                        "endpoint '{}' requires {} connections but has {}",
                        endpoint.key,
                        endpoint.required_connections,
                        endpoint.len()
                    ),
                });
            }
        }
        issues
    }
}

/// `compatible(t1, t2, strict)`, per spec.md §4.2.
pub fn compatible(t1: &str, t2: &str, strict: bool) -> bool {
    const EMPTY_LIKE: &[&str] = &["", "any", "def", "raw", "json"];
    if EMPTY_LIKE.contains(&t1) || EMPTY_LIKE.contains(&t2) {
        return true;
    }
    if t1.eq_ignore_ascii_case(t2) {
        return true;
    }
    if strict {
        return false;
    }
    const COERCIBLE: &[&[&str]] = &[
        &["double", "int", "int64", "bool", "string"],
        &["vector", "double_vector"],
        &["complex", "complex_f"],
        &["complex_vector"],
    ];
    COERCIBLE.iter().any(|group| {
        group.iter().any(|g| g.eq_ignore_ascii_case(t1)) && group.iter().any(|g| g.eq_ignore_ascii_case(t2))
    })
}

/// `Flag`s that are meaningful at the registry layer rather than the time
/// coordinator (`SOURCE_ONLY`, `OBSERVER` are consumed by `helics_time`
/// instead; this just validates the federate-level flag set is sane for
/// interface registration).
pub fn validate_federate_flags(flags: &[Flag]) -> Result<()> {
    if flags.contains(&Flag::Observer) && flags.contains(&Flag::SourceOnly) {
        return Err(Error::InvalidParameter(
            "a federate cannot be both OBSERVER and SOURCE_ONLY".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fed(n: u32) -> GlobalFederateId {
        GlobalFederateId(n)
    }

    #[test]
    fn test_duplicate_registration_is_error() {
        let mut reg = InterfaceRegistry::new(fed(0));
        reg.register_publication("out", "double", "").unwrap();
        assert!(reg.register_publication("out", "double", "").is_err());
    }

    #[test]
    fn test_registration_blocked_after_lock() {
        let mut reg = InterfaceRegistry::new(fed(0));
        reg.lock();
        assert!(matches!(
            reg.register_publication("out", "double", ""),
            Err(Error::InvalidFunctionCall(_))
        ));
    }

    #[test]
    fn test_required_input_without_source_is_an_issue() {
        let mut reg = InterfaceRegistry::new(fed(0));
        let h = reg.register_input("in", "double", "").unwrap();
        reg.set_property(h, InterfaceOption::ConnectionRequired).unwrap();
        let issues = reg.check_interfaces_for_issues();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_required_connections_not_met_is_an_issue() {
        let mut reg = InterfaceRegistry::new(fed(0));
        let h = reg.register_input("in", "double", "").unwrap();
        reg.set_property(h, InterfaceOption::Connections(2)).unwrap();
        reg.input_mut(h).unwrap().add_source(
            GlobalHandle::new(fed(1), helics_core::InterfaceHandle(0)),
            "double",
            "",
        );
        let issues = reg.check_interfaces_for_issues();
        assert_eq!(issues.len(), 1);

        reg.input_mut(h).unwrap().add_source(
            GlobalHandle::new(fed(2), helics_core::InterfaceHandle(0)),
            "double",
            "",
        );
        assert!(reg.check_interfaces_for_issues().is_empty());
    }

    #[test]
    fn test_compatible_empty_like_always_matches() {
        assert!(compatible("any", "double", true));
        assert!(compatible("double", "int", false));
        assert!(!compatible("double", "int", true));
    }
}
