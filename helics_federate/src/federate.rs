//! `FederateState`, per spec.md §4.4.
//!
//! Single owner of a federate's interface registry, time coordinator, and
//! mailbox. Serializes user-facing operations and inbound commands through
//! a single processing path: a [`tokio::sync::Mutex`] held for the
//! duration of [`FederateState::drain_mailbox`] ensures exactly one caller
//! is ever applying commands at a time, mirroring the single-threaded
//! per-federate event loop the original core uses.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use helics_core::config::{FederateConfig, RealTimeMode};
use helics_core::{
    Error, Flag, GlobalFederateId, GlobalHandle, IterationRequest, IterationResult, Result, Time,
};
use helics_interfaces::InterfaceRegistry;
use helics_time::{GrantTimeoutStage, GrantTimeoutTracker, RealTimeScheduler, TimeCoordinator};
use tokio::sync::{mpsc, Mutex};

use crate::command::Command;
use crate::state::LifecycleState;

/// What the last `*Async` call was, so a second one before `*Complete` is
/// rejected as `InvalidFunctionCall` (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingCall {
    EnterInitializing,
    EnterExecuting(IterationRequest),
    RequestTime(Time, IterationRequest),
    Finalize,
}

/// How far an input's event vector reaches, per spec.md §4.4 "Event vector".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventVectorMode {
    Inclusive,
    UpTo,
    NextIteration,
}

pub struct FederateState {
    federate: GlobalFederateId,
    state: LifecycleState,
    pub registry: InterfaceRegistry,
    pub coordinator: TimeCoordinator,

    mailbox_tx: mpsc::UnboundedSender<Command>,
    mailbox_rx: mpsc::UnboundedReceiver<Command>,
    processing: Mutex<()>,

    /// Senders marked delayed by `process_time_message` returning
    /// `DelayProcessing`; their commands accumulate here until the next
    /// state transition re-scans them (spec.md §4.4 "Queue ordering &
    /// delayed messages").
    delayed: HashMap<GlobalFederateId, VecDeque<Command>>,

    pending_call: Option<PendingCall>,
    error: Option<(helics_core::ErrorCode, String)>,
    grant_timeout: GrantTimeoutTracker,
    real_time: Option<RealTimeScheduler>,
}

impl FederateState {
    /// A federate with default configuration and no real-time scheduling.
    pub fn new(federate: GlobalFederateId) -> Self {
        Self::with_config(federate, FederateConfig::new(""))
    }

    /// Build from a full [`FederateConfig`] (spec.md §6), applying its time
    /// properties to the time coordinator and its grant-timeout/real-time
    /// settings to this federate's escalation and scheduling state.
    pub fn with_config(federate: GlobalFederateId, config: FederateConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        if config.flags.is_set(Flag::Observer) && config.flags.is_set(Flag::SourceOnly) {
            tracing::warn!("federate config sets both OBSERVER and SOURCE_ONLY; ignoring SOURCE_ONLY");
        }
        let mut coordinator = TimeCoordinator::new(federate);
        coordinator.input_delay = config.time.input_delay;
        coordinator.output_delay = config.time.output_delay;
        coordinator.time_delta = config.time.time_delta;
        coordinator.period = config.time.period;
        coordinator.offset = config.time.offset;
        coordinator.uninterruptible = config.flags.is_set(Flag::Uninterruptible);
        coordinator.max_iterations = config.max_iterations;
        let real_time = match config.real_time {
            RealTimeMode::Disabled => None,
            RealTimeMode::Enabled => Some(RealTimeScheduler::new(config.rt_lag, config.rt_lead)),
        };
        Self {
            federate,
            state: LifecycleState::Created,
            registry: InterfaceRegistry::new(federate),
            coordinator,
            mailbox_tx: tx,
            mailbox_rx: rx,
            processing: Mutex::new(()),
            delayed: HashMap::new(),
            pending_call: None,
            error: None,
            grant_timeout: GrantTimeoutTracker::new(config.grant_timeout),
            real_time,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn federate_id(&self) -> GlobalFederateId {
        self.federate
    }

    /// A cloneable handle producers (the broker, peer federates) use to
    /// deposit commands; the mailbox itself accepts `Command` by value.
    pub fn mailbox_sender(&self) -> mpsc::UnboundedSender<Command> {
        self.mailbox_tx.clone()
    }

    fn transition(&mut self, next: LifecycleState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::SystemFailure(format!(
                "illegal transition {:?} -> {:?}",
                self.state, next
            )));
        }
        self.state = next;
        if next == LifecycleState::Initializing {
            self.registry.lock();
        }
        Ok(())
    }

    fn set_error(&mut self, code: helics_core::ErrorCode, message: String) {
        self.error = Some((code, message.clone()));
        self.state = LifecycleState::Error;
        tracing::error!(federate = ?self.federate, %message, "federate entered ERROR state");
    }

    /// Apply one command to registry/coordinator state. Returns `true` if
    /// applying it triggered a state transition a blocking caller might be
    /// waiting on.
    fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Publish { dest, source, time, iteration, data } => {
                if let Some(input) = self.registry.input_mut(dest) {
                    input.add_data(source, helics_interfaces::input::DataRecord { time, iteration, data });
                }
                false
            }
            Command::SendMessage { dest, message } => {
                if let Some(endpoint) = self.registry.endpoint_mut(dest) {
                    endpoint.add_message(message);
                }
                false
            }
            Command::AddSource { input, source, type_tag, units } => {
                if let Some(i) = self.registry.input_mut(input) {
                    i.add_source(source, type_tag, units);
                }
                self.coordinator.add_dependency(source.federate);
                false
            }
            Command::AddDestination { publication, destination } => {
                if let Some(p) = self.registry.publication_mut(publication) {
                    p.add_subscriber(destination);
                }
                self.coordinator.add_dependent(destination.federate);
                false
            }
            Command::AddDependency(fed) => {
                self.coordinator.add_dependency(fed);
                false
            }
            Command::InitGrant => self.transition(LifecycleState::Initializing).is_ok(),
            Command::ExecGrant => self.transition(LifecycleState::Executing).is_ok(),
            Command::TimeGrant { from, next_event, iterating } => {
                use helics_time::ProcessResult;
                match self.coordinator.process_time_message(from, next_event, iterating) {
                    ProcessResult::Processed => {
                        self.coordinator.evaluate();
                        true
                    }
                    ProcessResult::NoEffect => false,
                    ProcessResult::DelayProcessing => {
                        self.delayed.entry(from).or_default().push_back(Command::TimeGrant {
                            from,
                            next_event,
                            iterating,
                        });
                        false
                    }
                }
            }
            Command::ForceTimeGrant(t) => {
                self.coordinator.force_grant(t);
                true
            }
            Command::Error { code, message } => {
                self.set_error(code, message);
                true
            }
            Command::Disconnect => {
                let _ = self.transition(LifecycleState::Finished);
                true
            }
        }
    }

    /// Re-scan delayed senders' queues after a state transition, per
    /// spec.md §4.4: "a command that re-delays stops the scan on that
    /// sender's queue (head-of-line within a sender) but other senders
    /// continue."
    fn rescan_delayed(&mut self) {
        let senders: Vec<GlobalFederateId> = self.delayed.keys().copied().collect();
        for sender in senders {
            loop {
                let Some(cmd) = self.delayed.get_mut(&sender).and_then(|q| q.pop_front()) else {
                    self.delayed.remove(&sender);
                    break;
                };
                let before = self.delayed.get(&sender).map_or(0, |q| q.len());
                self.apply(cmd);
                let after = self.delayed.get(&sender).map_or(0, |q| q.len());
                if after > before {
                    // re-delayed itself during apply(); stop this sender's scan.
                    break;
                }
            }
        }
    }

    /// Drain every command currently queued, applying each in order
    /// (spec.md §5 Ordering guarantee 1), then re-scan delayed queues.
    async fn drain_mailbox(&mut self) {
        let _guard = self.processing.lock().await;
        while let Ok(cmd) = self.mailbox_rx.try_recv() {
            self.apply(cmd);
        }
        self.rescan_delayed();
    }

    async fn wait_for_state(&mut self, target: impl Fn(LifecycleState) -> bool) -> Result<()> {
        loop {
            self.drain_mailbox().await;
            if target(self.state) {
                return Ok(());
            }
            if self.state.is_terminal() {
                return match &self.error {
                    Some((_, msg)) => Err(Error::FunctionExecutionFailure(msg.clone())),
                    None => Ok(()),
                };
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    // -- Blocking entry points (spec.md §4.4) --------------------------------

    pub async fn enter_initializing_mode(&mut self) -> Result<()> {
        if self.state != LifecycleState::Created {
            return Err(Error::InvalidFunctionCall(
                "enterInitializingMode called outside CREATED".into(),
            ));
        }
        self.mailbox_tx.send(Command::InitGrant).ok();
        self.wait_for_state(|s| s != LifecycleState::Created).await
    }

    pub async fn enter_executing_mode(&mut self, iterate: IterationRequest) -> Result<IterationResult> {
        if self.state != LifecycleState::Initializing {
            return Err(Error::InvalidFunctionCall(
                "enterExecutingMode called outside INITIALIZING".into(),
            ));
        }
        let issues = self.registry.check_interfaces_for_issues();
        if !issues.is_empty() {
            let message = issues
                .into_iter()
                .map(|i| i.message)
                .collect::<Vec<_>>()
                .join("; ");
            self.set_error(helics_core::ErrorCode::ConnectionFailure, message.clone());
            return Err(Error::ConnectionFailure(message));
        }
        self.mailbox_tx.send(Command::ExecGrant).ok();
        self.wait_for_state(|s| s != LifecycleState::Initializing).await?;
        if self.state == LifecycleState::Error {
            return Ok(IterationResult::Error);
        }
        let (_, result) = self.grant_loop(Time::ZERO, iterate).await?;
        Ok(result)
    }

    pub async fn request_time(&mut self, t: Time, iterate: IterationRequest) -> Result<(Time, IterationResult)> {
        if self.state != LifecycleState::Executing {
            return Err(Error::InvalidFunctionCall(
                "requestTime called outside EXECUTING".into(),
            ));
        }
        self.grant_loop(t, iterate).await
    }

    /// Drives the coordinator to a grant for `t`, per spec.md §4.3: issue the
    /// request, then alternate draining the mailbox (for inbound
    /// `TimeGrant`/`ForceTimeGrant` reports) with re-evaluating until a
    /// `NextStep` comes back, escalating through [`GrantTimeoutTracker`]
    /// along the way. Shared by `requestTime` and the initial grant in
    /// `enterExecutingMode`, which is just a request for `t=0`.
    async fn grant_loop(&mut self, t: Time, iterate: IterationRequest) -> Result<(Time, IterationResult)> {
        self.grant_timeout.reset();
        let start = Instant::now();
        let (mut granted, mut result) = self.coordinator.request_time(t, iterate);
        loop {
            self.drain_mailbox().await;
            if self.state == LifecycleState::Error {
                return Ok((self.coordinator.time_granted(), IterationResult::Error));
            }
            let (g, r) = self.coordinator.evaluate();
            granted = g;
            result = r;
            if result == IterationResult::NextStep {
                break;
            }
            match self.grant_timeout.poll(start.elapsed()) {
                Some(GrantTimeoutStage::ForceDisconnect) => {
                    let granted_time = self.coordinator.force_grant(t);
                    tracing::warn!(
                        federate = ?self.federate,
                        "grant timeout stage 4 reached; force-granting requestTime"
                    );
                    return Ok((granted_time, IterationResult::NextStep));
                }
                Some(stage) => {
                    tracing::warn!(federate = ?self.federate, ?stage, "grant timeout stage reached");
                }
                None => {}
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        if let Some(scheduler) = &self.real_time {
            if let Some(delay) = scheduler.sleep_after_grant(granted) {
                tokio::time::sleep(delay).await;
            }
        }
        Ok((granted, result))
    }

    /// The event vector: inputs with a record in range under `mode`, and,
    /// for inputs flagged `onlyUpdateOnChange`, whose value actually
    /// differs from the record before it (via `helics_value::changed`).
    pub fn events(&self, up_to: Time, mode: EventVectorMode) -> Vec<GlobalHandle> {
        self.registry
            .inputs()
            .filter(|input| Self::input_has_event(input, up_to, mode))
            .map(|input| input.id)
            .collect()
    }

    fn input_has_event(input: &helics_interfaces::Input, up_to: Time, mode: EventVectorMode) -> bool {
        input.sources().iter().any(|source| {
            let records: Vec<_> = source.queue().collect();
            let Some(idx) = records.iter().rposition(|r| match mode {
                EventVectorMode::Inclusive => r.time <= up_to,
                EventVectorMode::UpTo => r.time < up_to,
                EventVectorMode::NextIteration => r.time == up_to,
            }) else {
                return false;
            };
            if !input.only_update_on_change || idx == 0 {
                return true;
            }
            match (
                helics_value::decode(&records[idx].data),
                helics_value::decode(&records[idx - 1].data),
            ) {
                (Ok(new), Ok(prev)) => helics_value::changed(&prev, &new, input.delta),
                _ => true,
            }
        })
    }

    pub async fn finalize(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Ok(());
        }
        self.mailbox_tx.send(Command::Disconnect).ok();
        self.wait_for_state(|s| s.is_terminal()).await
    }

    // -- Async split API (spec.md §4.4) --------------------------------------

    pub fn enter_executing_mode_async(&mut self, iterate: IterationRequest) -> Result<()> {
        if self.pending_call.is_some() {
            return Err(Error::InvalidFunctionCall(
                "another async call is already outstanding".into(),
            ));
        }
        self.pending_call = Some(PendingCall::EnterExecuting(iterate));
        Ok(())
    }

    pub async fn enter_executing_mode_complete(&mut self) -> Result<IterationResult> {
        match self.pending_call.take() {
            Some(PendingCall::EnterExecuting(iterate)) => self.enter_executing_mode(iterate).await,
            _ => Err(Error::InvalidFunctionCall(
                "enterExecutingModeComplete called with no matching Async call outstanding".into(),
            )),
        }
    }

    pub fn request_time_async(&mut self, t: Time, iterate: IterationRequest) -> Result<()> {
        if self.pending_call.is_some() {
            return Err(Error::InvalidFunctionCall(
                "another async call is already outstanding".into(),
            ));
        }
        self.pending_call = Some(PendingCall::RequestTime(t, iterate));
        Ok(())
    }

    pub async fn request_time_complete(&mut self) -> Result<(Time, IterationResult)> {
        match self.pending_call.take() {
            Some(PendingCall::RequestTime(t, iterate)) => self.request_time(t, iterate).await,
            _ => Err(Error::InvalidFunctionCall(
                "requestTimeComplete called with no matching Async call outstanding".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fed(n: u32) -> GlobalFederateId {
        GlobalFederateId(n)
    }

    #[tokio::test]
    async fn test_lifecycle_happy_path() {
        let mut f = FederateState::new(fed(0));
        f.enter_initializing_mode().await.unwrap();
        assert_eq!(f.state(), LifecycleState::Initializing);
        let result = f.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();
        assert_eq!(result, IterationResult::NextStep);
        assert_eq!(f.state(), LifecycleState::Executing);
        f.finalize().await.unwrap();
        assert_eq!(f.state(), LifecycleState::Finished);
    }

    #[tokio::test]
    async fn test_request_time_outside_executing_is_invalid_call() {
        let mut f = FederateState::new(fed(0));
        let err = f.request_time(Time::ZERO, IterationRequest::NoIterations).await;
        assert!(matches!(err, Err(Error::InvalidFunctionCall(_))));
    }

    #[tokio::test]
    async fn test_double_async_call_rejected() {
        let mut f = FederateState::new(fed(0));
        f.enter_initializing_mode().await.unwrap();
        f.enter_executing_mode_async(IterationRequest::NoIterations).unwrap();
        let err = f.request_time_async(Time::ZERO, IterationRequest::NoIterations);
        assert!(matches!(err, Err(Error::InvalidFunctionCall(_))));
    }

    #[tokio::test]
    async fn test_required_input_blocks_executing() {
        let mut f = FederateState::new(fed(0));
        let h = f.registry.register_input("in", "double", "").unwrap();
        f.registry
            .set_property(h, helics_interfaces::InterfaceOption::ConnectionRequired)
            .unwrap();
        f.enter_initializing_mode().await.unwrap();
        let err = f.enter_executing_mode(IterationRequest::NoIterations).await;
        assert!(err.is_err());
        assert_eq!(f.state(), LifecycleState::Error);
    }
}
