//! Query routing, per spec.md §4.5: `query(target, key)` dispatches by
//! target type (federate / core / broker / global); well-known keys are
//! answered directly, anything else falls through to `#invalid`.

use crate::coordinator::CoordinatorCore;

/// What `target` named in a `query(target, key)` call resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget<'a> {
    Federate(&'a str),
    Core,
    Broker,
    Global(&'a str),
}

pub fn parse_target(target: &str) -> QueryTarget<'_> {
    match target {
        "core" => QueryTarget::Core,
        "broker" => QueryTarget::Broker,
        "global" => QueryTarget::Global(""),
        other if other.starts_with("global/") => QueryTarget::Global(&other["global/".len()..]),
        other => QueryTarget::Federate(other),
    }
}

/// Answer a query against current coordinator/federate state.
///
/// Well-known keys: `publications`, `inputs`, `endpoints`, `dependencies`,
/// `dependents`, `current_time`, `global_time`, `exists`, `global`,
/// `globals/<name>`, `list`. Anything else falls through to `#invalid`
/// (spec.md §4.5 has no user-registered query callback in this workspace's
/// scope, since the query *data source* callback is an external-app
/// concern per §1).
pub fn route_query(core: &CoordinatorCore, target: &str, key: &str) -> String {
    match (parse_target(target), key) {
        (QueryTarget::Core, "list") | (QueryTarget::Broker, "list") => core.federate_names().join(";"),
        (QueryTarget::Core, "exists") | (QueryTarget::Broker, "exists") => "true".to_string(),
        (QueryTarget::Global(name), _) if !name.is_empty() => core
            .global_value(name)
            .unwrap_or_else(|| "#invalid".to_string()),
        (QueryTarget::Global(""), "global") => core.all_globals_json(),
        (QueryTarget::Federate(name), "exists") => core.has_federate(name).to_string(),
        (QueryTarget::Federate(name), "publications") => core
            .federate_interface_keys(name, crate::coordinator::InterfaceKind::Publication)
            .unwrap_or_else(|| "#invalid".to_string()),
        (QueryTarget::Federate(name), "inputs") => core
            .federate_interface_keys(name, crate::coordinator::InterfaceKind::Input)
            .unwrap_or_else(|| "#invalid".to_string()),
        (QueryTarget::Federate(name), "endpoints") => core
            .federate_interface_keys(name, crate::coordinator::InterfaceKind::Endpoint)
            .unwrap_or_else(|| "#invalid".to_string()),
        (QueryTarget::Federate(name), "current_time" | "global_time") => core
            .federate_time(name)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "#invalid".to_string()),
        (QueryTarget::Federate(name), "dependencies") => core
            .federate_dependencies(name)
            .unwrap_or_else(|| "#invalid".to_string()),
        (QueryTarget::Federate(name), "dependents") => core
            .federate_dependents(name)
            .unwrap_or_else(|| "#invalid".to_string()),
        _ => "#invalid".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("core"), QueryTarget::Core);
        assert_eq!(parse_target("broker"), QueryTarget::Broker);
        assert_eq!(parse_target("global/foo"), QueryTarget::Global("foo"));
        assert_eq!(parse_target("fedA"), QueryTarget::Federate("fedA"));
    }

    #[test]
    fn test_unknown_query_is_invalid() {
        let core = CoordinatorCore::new("fed1");
        assert_eq!(route_query(&core, "nonexistent", "bogus"), "#invalid");
    }
}
