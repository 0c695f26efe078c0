//! Federate configuration, per spec.md §6 "Configuration surface consumed
//! by the core".
//!
//! This is a plain in-memory struct, not a file format: parsing
//! TOML/JSON/CLI args into one is explicitly out of scope (§5 Non-goals)
//! and left to a caller. The shape mirrors `FederateInfo` in the original
//! source closely enough that a caller translating from that format has an
//! obvious field-by-field mapping.

use crate::flags::FlagSet;
use crate::time::Time;

/// How a federate's requested wallclock-relative grants are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RealTimeMode {
    #[default]
    Disabled,
    /// Grants are delayed to track wallclock, tolerating up to `lag` behind
    /// and `lead` ahead before intervening (§4.3 "real-time mode").
    Enabled,
}

/// Per-federate timing configuration (§4.3's `timeDelta`/`period`/`offset`
/// family plus the two input/output delays applied at the interface layer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeConfig {
    /// Minimum distance between two distinct grants to this federate.
    pub time_delta: Time,
    /// If set, grants are restricted to `offset + k * period` for integer `k`.
    pub period: Option<Time>,
    pub offset: Time,
    /// Delay applied to inbound values/messages before the federate observes them.
    pub input_delay: Time,
    /// Delay applied to outbound values/messages before downstream federates observe them.
    pub output_delay: Time,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_delta: Time::EPSILON,
            period: None,
            offset: Time::ZERO,
            input_delay: Time::ZERO,
            output_delay: Time::ZERO,
        }
    }
}

/// The four-stage grant-timeout escalation schedule (§4.3 "Grant timeout").
///
/// "Stages trigger at multiples of the configured timeout": stage 1 (log a
/// diagnostic) at `1 * timeout`, stage 2 (resend state) at `2 * timeout`,
/// stage 3 (full dependency dump) at `3 * timeout`, stage 4 (forced
/// disconnect) at `4 * timeout`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrantTimeoutConfig {
    pub timeout: std::time::Duration,
    /// Whether stage 4 is permitted to forcibly disconnect a federate.
    pub allow_forced_disconnect: bool,
}

impl Default for GrantTimeoutConfig {
    fn default() -> Self {
        Self {
            timeout: std::time::Duration::from_secs(10),
            allow_forced_disconnect: false,
        }
    }
}

/// Full configuration for registering a federate with a core/broker.
#[derive(Debug, Clone)]
pub struct FederateConfig {
    pub name: String,
    pub core_name: Option<String>,
    pub core_init_string: Option<String>,
    pub broker_name: Option<String>,
    pub broker_address: Option<String>,
    pub time: TimeConfig,
    pub real_time: RealTimeMode,
    pub rt_lag: Time,
    pub rt_lead: Time,
    pub max_iterations: u32,
    pub flags: FlagSet,
    pub grant_timeout: GrantTimeoutConfig,
}

impl FederateConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            core_name: None,
            core_init_string: None,
            broker_name: None,
            broker_address: None,
            time: TimeConfig::default(),
            real_time: RealTimeMode::default(),
            rt_lag: Time::ZERO,
            rt_lead: Time::ZERO,
            max_iterations: 10,
            flags: FlagSet::new(),
            grant_timeout: GrantTimeoutConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_federate_config() {
        let cfg = FederateConfig::new("fed_a");
        assert_eq!(cfg.name, "fed_a");
        assert_eq!(cfg.max_iterations, 10);
        assert_eq!(cfg.time.time_delta, Time::EPSILON);
    }
}
