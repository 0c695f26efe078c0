//! `TimeCoordinator`, per spec.md §4.3.
//!
//! Computes, for the owning federate, the earliest time at which a grant to
//! a requested `T_req` is safe, given its dependencies and dependents, using
//! a Chandy-Misra-style null-message algorithm with iteration.

use std::collections::HashMap;

use helics_core::{GlobalFederateId, IterationRequest, IterationResult, Time};

use crate::dependency::{DependencyInfo, DependentInfo};

/// The result of feeding an inbound time message through
/// [`TimeCoordinator::process_time_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// The message was applied and may have changed `T_allow`.
    Processed,
    /// The message changed nothing (e.g. a stale report from a dependency
    /// that has already advanced further).
    NoEffect,
    /// The message arrived out of order relative to what this coordinator
    /// can currently make sense of; the caller should queue it on a
    /// per-sender delay queue and re-offer it after the next transition.
    DelayProcessing,
}

/// Whether a dependency's data at `T_allow` obliges the coordinator to defer
/// a grant that would otherwise be safe.
fn has_pending_iteration(dependencies: &HashMap<GlobalFederateId, DependencyInfo>, t_allow: Time) -> bool {
    dependencies
        .values()
        .any(|dep| dep.iterating && dep.next_event <= t_allow)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Requested,
}

pub struct TimeCoordinator {
    federate: GlobalFederateId,
    dependencies: HashMap<GlobalFederateId, DependencyInfo>,
    dependents: HashMap<GlobalFederateId, DependentInfo>,

    pub input_delay: Time,
    pub output_delay: Time,
    pub time_delta: Time,
    pub period: Option<Time>,
    pub offset: Time,
    pub uninterruptible: bool,
    pub max_iterations: u32,

    time_requested: Time,
    time_granted: Time,
    iteration: u32,
    iterate: IterationRequest,
    phase: Phase,
}

impl TimeCoordinator {
    pub fn new(federate: GlobalFederateId) -> Self {
        Self {
            federate,
            dependencies: HashMap::new(),
            dependents: HashMap::new(),
            input_delay: Time::ZERO,
            output_delay: Time::ZERO,
            time_delta: Time::EPSILON,
            period: None,
            offset: Time::ZERO,
            uninterruptible: false,
            max_iterations: 10,
            time_requested: Time::ZERO,
            time_granted: Time::ZERO,
            iteration: 0,
            iterate: IterationRequest::NoIterations,
            phase: Phase::Idle,
        }
    }

    pub fn federate(&self) -> GlobalFederateId {
        self.federate
    }

    pub fn time_granted(&self) -> Time {
        self.time_granted
    }

    pub fn add_dependency(&mut self, dep: GlobalFederateId) {
        self.dependencies.entry(dep).or_insert_with(|| DependencyInfo::new(dep));
    }

    pub fn remove_dependency(&mut self, dep: GlobalFederateId) {
        self.dependencies.remove(&dep);
    }

    pub fn add_dependent(&mut self, dep: GlobalFederateId) {
        self.dependents.entry(dep).or_insert_with(|| DependentInfo::new(dep));
    }

    pub fn remove_dependent(&mut self, dep: GlobalFederateId) {
        self.dependents.remove(&dep);
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &DependencyInfo> {
        self.dependencies.values()
    }

    /// `min over deps (dep.next_event + inputDelay)`, before the epsilon
    /// that turns it into a strict bound. Kept separate from
    /// [`TimeCoordinator::compute_t_allow`] because the "is a dependency
    /// still iterating at the time I'd grant" check in `evaluate` needs to
    /// compare against the dependency's own reported time, not that time
    /// shifted by epsilon.
    fn raw_bound(&self) -> Time {
        if self.dependencies.is_empty() {
            return Time::MAX_TIME;
        }
        self.dependencies
            .values()
            .map(|dep| dep.effective_bound().saturating_add(self.input_delay))
            .min()
            .unwrap_or(Time::MAX_TIME)
    }

    /// `T_allow = min over deps (dep.next_event + inputDelay) - epsilon`.
    ///
    /// A federate with no dependencies is unconstrained: it is always
    /// allowed to reach `time_requested`.
    pub fn compute_t_allow(&self) -> Time {
        self.raw_bound().saturating_sub(Time::EPSILON)
    }

    /// Snap a candidate grant time to the configured `period`/`offset`
    /// grid, per spec.md §4.3 `PERIOD`/`OFFSET` properties.
    fn snap_to_period(&self, t: Time) -> Time {
        let Some(period) = self.period else { return t };
        if period <= Time::ZERO {
            return t;
        }
        let period_ns = period.as_nanos();
        let offset_ns = self.offset.as_nanos();
        let t_ns = t.as_nanos();
        let steps = (t_ns - offset_ns + period_ns - 1).div_euclid(period_ns);
        Time::from_nanos(offset_ns + steps * period_ns)
    }

    /// `requestTime(T_req, iterate)`, per spec.md §4.3 steps 1-3.
    pub fn request_time(&mut self, t_req: Time, iterate: IterationRequest) -> (Time, IterationResult) {
        self.time_requested = t_req;
        self.iterate = iterate;
        self.phase = Phase::Requested;
        self.evaluate()
    }

    /// Re-run the grant decision against the current dependency state; used
    /// both by `request_time` and after any `process_time_message` that
    /// changes `T_allow` while a request is outstanding.
    pub fn evaluate(&mut self) -> (Time, IterationResult) {
        if self.phase != Phase::Requested {
            return (self.time_granted, IterationResult::NextStep);
        }

        let raw_bound = self.raw_bound();
        let t_allow = raw_bound.saturating_sub(Time::EPSILON);
        let pending_iteration = has_pending_iteration(&self.dependencies, self.time_requested.min(raw_bound));

        if t_allow >= self.time_requested && !pending_iteration {
            self.time_granted = self.time_requested;
            self.iteration = 0;
            self.phase = Phase::Idle;
            return (self.time_granted, IterationResult::NextStep);
        }

        let wants_to_iterate = self.iterate == IterationRequest::ForceIteration
            || (self.iterate == IterationRequest::IterateIfNeeded && pending_iteration);

        if wants_to_iterate && self.iteration < self.max_iterations {
            self.iteration += 1;
            return (self.time_granted, IterationResult::Iterating);
        }

        let bound = self.snap_to_period(t_allow.min(self.time_requested));

        if wants_to_iterate {
            // MAX_ITERATIONS reached: stop iterating and force the best
            // grant available rather than loop forever (spec.md's
            // "iterate until convergence or MAX_ITERATIONS, then NEXT_STEP").
            let grant = bound.max(self.time_granted);
            self.time_granted = grant;
            self.iteration = 0;
            self.phase = Phase::Idle;
            return (grant, IterationResult::NextStep);
        }

        // Bounded by a dependency that hasn't reported enough progress yet.
        // A bound no better than what's already granted carries no new
        // information: stay requested and let the caller keep polling
        // (this is what lets the grant-timeout escalation in FederateState
        // actually have something to escalate about) rather than handing
        // back a grant that doesn't advance time, or worse, regresses it.
        if bound <= self.time_granted {
            return (self.time_granted, IterationResult::Iterating);
        }
        self.time_granted = bound;
        self.iteration = 0;
        self.phase = Phase::Idle;
        (bound, IterationResult::NextStep)
    }

    /// `CMD_FORCE_TIME_GRANT`: grant immediately if `action_time >= time_granted`.
    pub fn force_grant(&mut self, action_time: Time) -> Time {
        let grant = action_time.max(self.time_granted);
        self.time_granted = grant;
        self.iteration = 0;
        self.phase = Phase::Idle;
        grant
    }

    /// Apply an updated next-event report from a dependency, per
    /// `update_federate_next_event_tag_locked`-style bookkeeping.
    ///
    /// Returns [`ProcessResult::Processed`] if this changed `T_allow`'s
    /// governing bound, `NoEffect` if the report was stale (the dependency
    /// reporting a time earlier than one it already passed), or
    /// `DelayProcessing` if the sender isn't a known dependency yet.
    pub fn process_time_message(
        &mut self,
        sender: GlobalFederateId,
        next_event: Time,
        iterating: bool,
    ) -> ProcessResult {
        let Some(dep) = self.dependencies.get_mut(&sender) else {
            return ProcessResult::DelayProcessing;
        };
        if next_event < dep.last_grant {
            return ProcessResult::NoEffect;
        }
        let changed = dep.next_event != next_event || dep.iterating != iterating;
        dep.next_event = next_event;
        dep.iterating = iterating;
        if next_event > dep.last_grant {
            dep.last_grant = next_event;
        }
        if changed {
            ProcessResult::Processed
        } else {
            ProcessResult::NoEffect
        }
    }

    /// Whether this federate's own advertised next-event time has changed
    /// enough since the last report to a given dependent to owe it a null
    /// message (spec.md §4.3's outbound report trigger).
    pub fn owes_notification(&self, dependent: GlobalFederateId, current_next_event: Time) -> bool {
        self.dependents
            .get(&dependent)
            .map_or(true, |d| d.needs_notification(current_next_event))
    }

    pub fn mark_notified(&mut self, dependent: GlobalFederateId, reported: Time) {
        self.dependents
            .entry(dependent)
            .or_insert_with(|| DependentInfo::new(dependent))
            .last_reported = reported;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fed(n: u32) -> GlobalFederateId {
        GlobalFederateId(n)
    }

    #[test]
    fn test_grant_immediate_when_unconstrained() {
        let mut tc = TimeCoordinator::new(fed(0));
        let (t, result) = tc.request_time(Time::from_seconds(1.0), IterationRequest::NoIterations);
        assert_eq!(t, Time::from_seconds(1.0));
        assert_eq!(result, IterationResult::NextStep);
    }

    #[test]
    fn test_grant_bounded_by_dependency() {
        let mut tc = TimeCoordinator::new(fed(0));
        tc.add_dependency(fed(1));
        tc.process_time_message(fed(1), Time::from_seconds(0.5), false);
        let (t, result) = tc.request_time(Time::from_seconds(2.0), IterationRequest::NoIterations);
        assert!(t < Time::from_seconds(2.0));
        assert_eq!(result, IterationResult::NextStep);
    }

    #[test]
    fn test_iteration_when_dependency_still_iterating() {
        let mut tc = TimeCoordinator::new(fed(0));
        tc.add_dependency(fed(1));
        tc.process_time_message(fed(1), Time::ZERO, true);
        let (_, result) = tc.request_time(Time::ZERO, IterationRequest::IterateIfNeeded);
        assert_eq!(result, IterationResult::Iterating);
    }

    #[test]
    fn test_force_grant_respects_time_granted() {
        let mut tc = TimeCoordinator::new(fed(0));
        tc.force_grant(Time::from_seconds(1.0));
        let grant = tc.force_grant(Time::from_seconds(0.5));
        assert_eq!(grant, Time::from_seconds(1.0));
    }

    #[test]
    fn test_stale_dependency_report_is_no_effect() {
        let mut tc = TimeCoordinator::new(fed(0));
        tc.add_dependency(fed(1));
        tc.process_time_message(fed(1), Time::from_seconds(2.0), false);
        assert_eq!(
            tc.process_time_message(fed(1), Time::from_seconds(1.0), false),
            ProcessResult::NoEffect
        );
    }

    #[test]
    fn test_unknown_sender_delays() {
        let mut tc = TimeCoordinator::new(fed(0));
        assert_eq!(
            tc.process_time_message(fed(99), Time::ZERO, false),
            ProcessResult::DelayProcessing
        );
    }
}
