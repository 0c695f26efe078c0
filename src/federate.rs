//! `Federate`: the lifecycle surface shared by every federate kind,
//! wrapping a [`helics_federate::FederateState`] with the federate's
//! registered name, mirroring how the root `boomerang` crate wraps a
//! `runtime::Scheduler` behind its own public API.

use helics_core::{GlobalFederateId, InterfaceHandle, IterationRequest, IterationResult, Result, Time};
use helics_federate::{EventVectorMode, FederateState};
use helics_interfaces::InterfaceOption;

pub struct Federate {
    pub(crate) state: FederateState,
    name: String,
}

impl Federate {
    pub fn new(id: GlobalFederateId, name: impl Into<String>) -> Self {
        Self {
            state: FederateState::new(id),
            name: name.into(),
        }
    }

    pub fn with_config(id: GlobalFederateId, config: helics_core::config::FederateConfig) -> Self {
        let name = config.name.clone();
        Self {
            state: FederateState::with_config(id, config),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> GlobalFederateId {
        self.state.federate_id()
    }

    pub fn state(&self) -> helics_federate::LifecycleState {
        self.state.state()
    }

    /// The most recent time this federate was granted, for a broker-style
    /// caller reporting it onward to dependents.
    pub fn granted_time(&self) -> Time {
        self.state.coordinator.time_granted()
    }

    pub async fn enter_initializing_mode(&mut self) -> Result<()> {
        self.state.enter_initializing_mode().await
    }

    pub async fn enter_executing_mode(&mut self, iterate: IterationRequest) -> Result<IterationResult> {
        self.state.enter_executing_mode(iterate).await
    }

    pub async fn request_time(&mut self, t: Time, iterate: IterationRequest) -> Result<(Time, IterationResult)> {
        self.state.request_time(t, iterate).await
    }

    pub async fn finalize(&mut self) -> Result<()> {
        self.state.finalize().await
    }

    pub fn events(&self, up_to: Time, mode: EventVectorMode) -> Vec<helics_core::GlobalHandle> {
        self.state.events(up_to, mode)
    }

    /// Set a per-interface option (e.g. `HandleOnlyUpdateOnChange`,
    /// `ConnectionRequired`) on whichever registered interface owns `handle`.
    pub fn set_property(&mut self, handle: InterfaceHandle, option: InterfaceOption) -> Result<()> {
        self.state.registry.set_property(handle, option)
    }

    pub fn mailbox_sender(&self) -> tokio::sync::mpsc::UnboundedSender<helics_federate::Command> {
        self.state.mailbox_sender()
    }
}
