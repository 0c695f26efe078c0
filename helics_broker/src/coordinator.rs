//! `CoordinatorCore`, per spec.md §4.5: the process-level hub that
//! multiplexes many `FederateState`s, performs global name registration,
//! forwards commands between federates, and answers queries.
//!
//! Grounded on `boomerang_federated::rti::Rti`/`rti::federate::Federate`
//! (`examples/boomerang_federated/src/rti/mod.rs`,
//! `examples/boomerang_federated/src/rti/federate.rs`): the teacher's `Rti`
//! holds one `tokio::sync::mpsc` channel per connected federate and
//! forwards `RtiMsg`s between them; this keeps that shape but drops the
//! federation-id/neighbor-structure TCP handshake the teacher performs,
//! since federates here register in-process.

use std::collections::HashMap;

use helics_core::{Error, GlobalFederateId, GlobalHandle, Result, Time};
use helics_federate::Command;
use tokio::sync::mpsc;

use crate::message::{ClockSyncStat, FederateAck, RegisterFederate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Publication,
    Input,
    Endpoint,
}

struct FederateEntry {
    name: String,
    mailbox: mpsc::UnboundedSender<Command>,
    publications: Vec<String>,
    inputs: Vec<String>,
    endpoints: Vec<String>,
    dependencies: Vec<GlobalFederateId>,
    dependents: Vec<GlobalFederateId>,
    current_time: Time,
    clock_sync: ClockSyncStat,
}

pub struct CoordinatorCore {
    federation_id: String,
    next_id: u32,
    federates: HashMap<GlobalFederateId, FederateEntry>,
    names: HashMap<String, GlobalFederateId>,
    globals: HashMap<String, String>,
}

impl CoordinatorCore {
    pub fn new(federation_id: impl Into<String>) -> Self {
        Self {
            federation_id: federation_id.into(),
            next_id: 0,
            federates: HashMap::new(),
            names: HashMap::new(),
            globals: HashMap::new(),
        }
    }

    pub fn federation_id(&self) -> &str {
        &self.federation_id
    }

    /// `CMD_REG_FED` / `CMD_FED_ACK`: synchronous name reservation. A
    /// duplicate federate name in the same federation is rejected, mirroring
    /// `check_fed_ids`'s `FederateKeyInUse` rejection path in the teacher.
    pub fn register_federate(
        &mut self,
        request: RegisterFederate,
        mailbox: mpsc::UnboundedSender<Command>,
    ) -> FederateAck {
        if self.names.contains_key(&request.name) {
            return FederateAck::Rejected {
                code: helics_core::ErrorCode::RegistrationFailure,
                message: format!("federate name '{}' already registered", request.name),
            };
        }
        let id = GlobalFederateId(self.next_id);
        self.next_id += 1;
        self.names.insert(request.name.clone(), id);
        self.federates.insert(
            id,
            FederateEntry {
                name: request.name,
                mailbox,
                publications: Vec::new(),
                inputs: Vec::new(),
                endpoints: Vec::new(),
                dependencies: Vec::new(),
                dependents: Vec::new(),
                current_time: Time::ZERO,
                clock_sync: request.clock_sync,
            },
        );
        FederateAck::Accepted(id)
    }

    /// The clock-sync status a federate negotiated at registration. Always
    /// `Off` until synchronization math is implemented.
    pub fn federate_clock_sync(&self, name: &str) -> Option<ClockSyncStat> {
        let id = self.names.get(name)?;
        self.federates.get(id).map(|e| e.clock_sync)
    }

    /// Mirrors the interface keys a federate registered, so queries like
    /// `publications`/`inputs`/`endpoints` can be answered without routing
    /// a call into the federate itself.
    pub fn declare_interfaces(
        &mut self,
        id: GlobalFederateId,
        publications: Vec<String>,
        inputs: Vec<String>,
        endpoints: Vec<String>,
    ) -> Result<()> {
        let entry = self
            .federates
            .get_mut(&id)
            .ok_or_else(|| Error::InvalidIdentifier(format!("unknown federate {id}")))?;
        entry.publications = publications;
        entry.inputs = inputs;
        entry.endpoints = endpoints;
        Ok(())
    }

    pub fn report_time(&mut self, id: GlobalFederateId, time: Time) {
        if let Some(entry) = self.federates.get_mut(&id) {
            entry.current_time = time;
        }
    }

    /// `addSourceTarget`: wire an input up to a publication/endpoint, sending
    /// `Command::AddSource` to the input's federate and recording the
    /// dependency edge both ways for query routing.
    pub fn add_source_target(
        &mut self,
        input: GlobalHandle,
        source: GlobalHandle,
        type_tag: impl Into<String>,
        units: impl Into<String>,
    ) -> Result<()> {
        self.send(
            input.federate,
            Command::AddSource {
                input: input.handle,
                source,
                type_tag: type_tag.into(),
                units: units.into(),
            },
        )?;
        self.link(input.federate, source.federate);
        Ok(())
    }

    /// `addDestinationTarget`: wire a publication up to a subscriber input.
    pub fn add_destination_target(&mut self, publication: GlobalHandle, destination: GlobalHandle) -> Result<()> {
        self.send(
            publication.federate,
            Command::AddDestination { publication: publication.handle, destination },
        )?;
        self.link(destination.federate, publication.federate);
        Ok(())
    }

    fn link(&mut self, dependent: GlobalFederateId, dependency: GlobalFederateId) {
        if let Some(entry) = self.federates.get_mut(&dependent) {
            if !entry.dependencies.contains(&dependency) {
                entry.dependencies.push(dependency);
            }
        }
        if let Some(entry) = self.federates.get_mut(&dependency) {
            if !entry.dependents.contains(&dependent) {
                entry.dependents.push(dependent);
            }
        }
    }

    /// Forward a command from one federate's mailbox to another's,
    /// per spec.md §5 Ordering guarantee 1 ("messages from a given sender
    /// are processed at the receiver in send order") — this relies on each
    /// federate's mailbox being an unbounded FIFO channel.
    pub fn forward(&mut self, to: GlobalFederateId, command: Command) -> Result<()> {
        self.send(to, command)
    }

    fn send(&self, to: GlobalFederateId, command: Command) -> Result<()> {
        let entry = self
            .federates
            .get(&to)
            .ok_or_else(|| Error::InvalidIdentifier(format!("unknown federate {to}")))?;
        entry
            .mailbox
            .send(command)
            .map_err(|_| Error::Disconnected)
    }

    /// Disconnect every connected federate, draining the coordinator.
    pub fn disconnect(&mut self) {
        for entry in self.federates.values() {
            let _ = entry.mailbox.send(Command::Disconnect);
        }
        self.federates.clear();
        self.names.clear();
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.globals.insert(name.into(), value.into());
    }

    pub fn global_value(&self, name: &str) -> Option<String> {
        self.globals.get(name).cloned()
    }

    pub fn all_globals_json(&self) -> String {
        let entries: Vec<String> = self
            .globals
            .iter()
            .map(|(k, v)| format!("\"{k}\":\"{v}\""))
            .collect();
        format!("{{{}}}", entries.join(","))
    }

    pub fn federate_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_federate(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn federate_id(&self, name: &str) -> Option<GlobalFederateId> {
        self.names.get(name).copied()
    }

    pub fn federate_interface_keys(&self, name: &str, kind: InterfaceKind) -> Option<String> {
        let id = self.names.get(name)?;
        let entry = self.federates.get(id)?;
        let keys = match kind {
            InterfaceKind::Publication => &entry.publications,
            InterfaceKind::Input => &entry.inputs,
            InterfaceKind::Endpoint => &entry.endpoints,
        };
        Some(keys.join(";"))
    }

    pub fn federate_time(&self, name: &str) -> Option<Time> {
        let id = self.names.get(name)?;
        self.federates.get(id).map(|e| e.current_time)
    }

    pub fn federate_dependencies(&self, name: &str) -> Option<String> {
        let id = self.names.get(name)?;
        let entry = self.federates.get(id)?;
        Some(
            entry
                .dependencies
                .iter()
                .filter_map(|dep| self.federates.get(dep).map(|e| e.name.clone()))
                .collect::<Vec<_>>()
                .join(";"),
        )
    }

    /// Raw dependent ids of `id`, for a driver forwarding
    /// `Command::TimeGrant` notifications without a name round-trip.
    pub fn dependents_of(&self, id: GlobalFederateId) -> Vec<GlobalFederateId> {
        self.federates.get(&id).map(|e| e.dependents.clone()).unwrap_or_default()
    }

    pub fn federate_dependents(&self, name: &str) -> Option<String> {
        let id = self.names.get(name)?;
        let entry = self.federates.get(id)?;
        Some(
            entry
                .dependents
                .iter()
                .filter_map(|dep| self.federates.get(dep).map(|e| e.name.clone()))
                .collect::<Vec<_>>()
                .join(";"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailbox() -> (mpsc::UnboundedSender<Command>, mpsc::UnboundedReceiver<Command>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_duplicate_federate_name_rejected() {
        let mut core = CoordinatorCore::new("fed1");
        let (tx1, _rx1) = mailbox();
        let (tx2, _rx2) = mailbox();
        assert!(matches!(
            core.register_federate(RegisterFederate { name: "A".into(), clock_sync: ClockSyncStat::Off }, tx1),
            FederateAck::Accepted(_)
        ));
        assert!(matches!(
            core.register_federate(RegisterFederate { name: "A".into(), clock_sync: ClockSyncStat::Off }, tx2),
            FederateAck::Rejected { .. }
        ));
    }

    #[test]
    fn test_add_source_target_links_dependency() {
        let mut core = CoordinatorCore::new("fed1");
        let (tx_a, _rx_a) = mailbox();
        let (tx_b, mut rx_b) = mailbox();
        let FederateAck::Accepted(a) = core.register_federate(RegisterFederate { name: "A".into(), clock_sync: ClockSyncStat::Off }, tx_a) else {
            panic!()
        };
        let FederateAck::Accepted(b) = core.register_federate(RegisterFederate { name: "B".into(), clock_sync: ClockSyncStat::Off }, tx_b) else {
            panic!()
        };
        let input = GlobalHandle::new(b, helics_core::InterfaceHandle(0));
        let pub_handle = GlobalHandle::new(a, helics_core::InterfaceHandle(0));
        core.add_source_target(input, pub_handle, "double", "").unwrap();
        assert_eq!(core.federate_dependencies("B").unwrap(), "A");
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_forward_to_unknown_federate_is_invalid_identifier() {
        let mut core = CoordinatorCore::new("fed1");
        let err = core.forward(GlobalFederateId(99), Command::Disconnect);
        assert!(matches!(err, Err(Error::InvalidIdentifier(_))));
    }
}
