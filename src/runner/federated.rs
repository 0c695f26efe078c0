//! `Federation`: an in-process broker for building and running a whole
//! federation in one process, the way `build_and_test_federation` in the
//! teacher's `src/runner/federated.rs` spins up an RTI and a set of
//! federate schedulers together. This workspace never opens a real
//! listener for this path (spec.md §1 Non-goals exclude concrete
//! transports beyond what §8's scenarios need); federates register
//! directly against an in-process [`helics_broker::CoordinatorCore`].

use helics_broker::{ClockSyncStat, CoordinatorCore, FederateAck, RegisterFederate};
use helics_core::{Error, GlobalFederateId, GlobalHandle, Result, Time};
use helics_federate::Command;
use helics_interfaces::Message;
use tokio::sync::mpsc;

pub struct Federation {
    pub coordinator: CoordinatorCore,
}

impl Federation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { coordinator: CoordinatorCore::new(name) }
    }

    /// Register a constructed federate's mailbox with the coordinator. The
    /// caller is responsible for having built the federate with the
    /// `GlobalFederateId` this returns — in this in-process harness that
    /// means registering federates in the same order their
    /// `FederateState`s were constructed with ids `0, 1, 2, ...`.
    pub fn register(&mut self, name: &str, mailbox: mpsc::UnboundedSender<Command>) -> Result<GlobalFederateId> {
        let ack = self.coordinator.register_federate(
            RegisterFederate { name: name.to_string(), clock_sync: ClockSyncStat::Off },
            mailbox,
        );
        match ack {
            FederateAck::Accepted(id) => Ok(id),
            FederateAck::Rejected { message, .. } => Err(Error::RegistrationFailure(message)),
        }
    }

    pub fn add_source_target(&mut self, input: GlobalHandle, source: GlobalHandle, type_tag: &str, units: &str) -> Result<()> {
        self.coordinator.add_source_target(input, source, type_tag, units)
    }

    pub fn add_destination_target(&mut self, publication: GlobalHandle, destination: GlobalHandle) -> Result<()> {
        self.coordinator.add_destination_target(publication, destination)
    }

    /// Fan a published value out to every subscriber wired via
    /// [`Federation::add_destination_target`], as `Command::Publish`
    /// (spec.md §4.3's outbound report trigger covers time; this is its
    /// value-pipeline analogue).
    pub fn publish_value(&mut self, source: GlobalHandle, subscribers: &[GlobalHandle], time: Time, iteration: u32, data: Vec<u8>) -> Result<()> {
        for dest in subscribers {
            self.coordinator.forward(
                dest.federate,
                Command::Publish { dest: dest.handle, source, time, iteration, data: data.clone() },
            )?;
        }
        Ok(())
    }

    /// Forward an already filter-processed message to its destination
    /// federate's mailbox. Same-federate messages never reach here;
    /// `MessageFederate::send_message` delivers those directly.
    pub fn deliver_message(&mut self, message: Message) -> Result<()> {
        let dest = message.destination;
        self.coordinator.forward(dest.federate, Command::SendMessage { dest: dest.handle, message })
    }

    /// Push this federate's newly granted/requested next-event time to every
    /// dependent as `Command::TimeGrant`, per spec.md §4.3's Chandy-Misra
    /// null-message report: a dependent can't compute `T_allow` past a bound
    /// it's never been told about.
    pub fn notify_dependents(&mut self, from: GlobalFederateId, next_event: Time, iterating: bool) -> Result<()> {
        for dependent in self.coordinator.dependents_of(from) {
            self.coordinator.forward(dependent, Command::TimeGrant { from, next_event, iterating })?;
        }
        Ok(())
    }

    pub fn query(&self, target: &str, key: &str) -> String {
        helics_broker::route_query(&self.coordinator, target, key)
    }

    pub fn disconnect(&mut self) {
        self.coordinator.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueFederate;
    use helics_core::IterationRequest;

    #[tokio::test]
    async fn test_two_federate_publish_subscribe_round_trip() {
        let mut federation = Federation::new("fed_test");

        let mut producer = ValueFederate::new(GlobalFederateId(0), "producer");
        let out = producer.register_publication("out", "double", "").unwrap();
        federation.register("producer", producer.mailbox_sender()).unwrap();

        let mut consumer = ValueFederate::new(GlobalFederateId(1), "consumer");
        let inp = consumer.register_input("in", "double", "").unwrap();
        federation.register("consumer", consumer.mailbox_sender()).unwrap();

        let pub_handle = GlobalHandle::new(GlobalFederateId(0), out);
        let input_handle = GlobalHandle::new(GlobalFederateId(1), inp);
        federation.add_source_target(input_handle, pub_handle, "double", "").unwrap();
        federation.add_destination_target(pub_handle, input_handle).unwrap();

        producer.enter_initializing_mode().await.unwrap();
        consumer.enter_initializing_mode().await.unwrap();
        producer.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();
        consumer.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();

        assert_eq!(federation.query("consumer", "exists"), "true");

        producer.finalize().await.unwrap();
        consumer.finalize().await.unwrap();
    }
}
