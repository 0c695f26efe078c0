//! The four-stage grant-timeout escalation protocol, per spec.md §4.3
//! "Grant timeout": stages trigger at multiples of the configured timeout
//! while a `requestTime` has not yet been granted.

use std::time::Duration;

use helics_core::config::GrantTimeoutConfig;

/// Which escalation stage has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GrantTimeoutStage {
    /// Stage 1 (`1 * timeout`): log a diagnostic naming the suspected
    /// blocking dependencies.
    Diagnostic,
    /// Stage 2 (`2 * timeout`): resend this federate's state to its dependencies.
    ResendState,
    /// Stage 3 (`3 * timeout`): dump full dependency state ("TIME DEBUGGING").
    FullDump,
    /// Stage 4 (`4 * timeout`): force-disconnect the blocking federate, if permitted.
    ForceDisconnect,
}

impl GrantTimeoutStage {
    fn threshold(self, timeout: Duration) -> Duration {
        let multiple = match self {
            GrantTimeoutStage::Diagnostic => 1,
            GrantTimeoutStage::ResendState => 2,
            GrantTimeoutStage::FullDump => 3,
            GrantTimeoutStage::ForceDisconnect => 4,
        };
        timeout * multiple
    }

    const ALL: [GrantTimeoutStage; 4] = [
        GrantTimeoutStage::Diagnostic,
        GrantTimeoutStage::ResendState,
        GrantTimeoutStage::FullDump,
        GrantTimeoutStage::ForceDisconnect,
    ];
}

/// Tracks wallclock elapsed time against a [`GrantTimeoutConfig`] and
/// reports which stage (if any) a fresh elapsed duration has newly crossed.
#[derive(Debug, Clone, Copy)]
pub struct GrantTimeoutTracker {
    config: GrantTimeoutConfig,
    highest_stage_reached: Option<GrantTimeoutStage>,
}

impl GrantTimeoutTracker {
    pub fn new(config: GrantTimeoutConfig) -> Self {
        Self {
            config,
            highest_stage_reached: None,
        }
    }

    /// Reset on every successful grant; a federate that isn't stuck doesn't
    /// accumulate timeout state.
    pub fn reset(&mut self) {
        self.highest_stage_reached = None;
    }

    /// Called periodically with the elapsed time since the outstanding
    /// `requestTime` was issued. Returns `Some(stage)` exactly once per
    /// stage, in order, the first time `elapsed` crosses that stage's
    /// threshold.
    pub fn poll(&mut self, elapsed: Duration) -> Option<GrantTimeoutStage> {
        if self.config.timeout.is_zero() {
            return None;
        }
        for stage in GrantTimeoutStage::ALL {
            let already_reached = self.highest_stage_reached.is_some_and(|h| h >= stage);
            if already_reached {
                continue;
            }
            if stage == GrantTimeoutStage::ForceDisconnect && !self.config.allow_forced_disconnect {
                continue;
            }
            if elapsed >= stage.threshold(self.config.timeout) {
                self.highest_stage_reached = Some(stage);
                return Some(stage);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GrantTimeoutConfig {
        GrantTimeoutConfig {
            timeout: Duration::from_secs(10),
            allow_forced_disconnect: true,
        }
    }

    #[test]
    fn test_stages_fire_once_each_in_order() {
        let mut tracker = GrantTimeoutTracker::new(config());
        assert_eq!(tracker.poll(Duration::from_secs(5)), None);
        assert_eq!(tracker.poll(Duration::from_secs(11)), Some(GrantTimeoutStage::Diagnostic));
        assert_eq!(tracker.poll(Duration::from_secs(15)), None);
        assert_eq!(tracker.poll(Duration::from_secs(21)), Some(GrantTimeoutStage::ResendState));
        assert_eq!(tracker.poll(Duration::from_secs(31)), Some(GrantTimeoutStage::FullDump));
        assert_eq!(tracker.poll(Duration::from_secs(41)), Some(GrantTimeoutStage::ForceDisconnect));
        assert_eq!(tracker.poll(Duration::from_secs(100)), None);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut tracker = GrantTimeoutTracker::new(config());
        tracker.poll(Duration::from_secs(11));
        tracker.reset();
        assert_eq!(tracker.poll(Duration::from_secs(11)), Some(GrantTimeoutStage::Diagnostic));
    }

    #[test]
    fn test_disconnect_suppressed_when_not_allowed() {
        let mut cfg = config();
        cfg.allow_forced_disconnect = false;
        let mut tracker = GrantTimeoutTracker::new(cfg);
        tracker.poll(Duration::from_secs(11));
        tracker.poll(Duration::from_secs(21));
        tracker.poll(Duration::from_secs(31));
        assert_eq!(tracker.poll(Duration::from_secs(41)), None);
    }
}
