//! Real-time grant scheduling, per spec.md §4.3 "Real-time mode": schedules
//! a wallclock timer that injects `CMD_FORCE_TIME_GRANT` if a grant hasn't
//! arrived by `now + (T_req + rt_lag) - start_clock`, and sleeps a federate
//! that has gotten ahead of `now - rt_lead`.

use std::time::{Duration, Instant};

use helics_core::Time;

pub struct RealTimeScheduler {
    start_clock: Instant,
    pub rt_lag: Time,
    pub rt_lead: Time,
}

impl RealTimeScheduler {
    pub fn new(rt_lag: Time, rt_lead: Time) -> Self {
        Self {
            start_clock: Instant::now(),
            rt_lag,
            rt_lead,
        }
    }

    fn to_duration(t: Time) -> Duration {
        Duration::from_nanos(t.as_nanos().max(0) as u64)
    }

    /// The wallclock instant at which, absent a real grant, a
    /// `CMD_FORCE_TIME_GRANT` for `t_req` should be injected.
    pub fn force_grant_deadline(&self, t_req: Time) -> Instant {
        self.start_clock + Self::to_duration(t_req.saturating_add(self.rt_lag))
    }

    /// How long this federate should sleep after being granted `t_granted`
    /// before proceeding, to avoid running ahead of wallclock by more than
    /// `rt_lead`. `None` if it isn't ahead.
    pub fn sleep_after_grant(&self, t_granted: Time) -> Option<Duration> {
        let target = self.start_clock + Self::to_duration(t_granted.saturating_sub(self.rt_lead));
        let now = Instant::now();
        target.checked_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ahead_returns_none() {
        let sched = RealTimeScheduler::new(Time::ZERO, Time::ZERO);
        assert!(sched.sleep_after_grant(Time::ZERO).is_none());
    }

    #[test]
    fn test_force_grant_deadline_after_lag() {
        let sched = RealTimeScheduler::new(Time::from_seconds(1.0), Time::ZERO);
        let deadline = sched.force_grant_deadline(Time::from_seconds(2.0));
        assert!(deadline >= sched.start_clock + Duration::from_secs(3));
    }
}
