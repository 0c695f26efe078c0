//! Two federates, a published double, and a subscriber whose input only
//! reports an event when the delivered value actually changed by more than
//! its configured delta.

use helics::core::{GlobalFederateId, GlobalHandle, IterationRequest, Time};
use helics::federate_core::EventVectorMode;
use helics::interfaces::InterfaceOption;
use helics::runner::Federation;
use helics::value::{TargetType, Value};
use helics::ValueFederate;

#[tokio::test]
async fn test_change_filtered_subscriber_sees_only_distinct_values() {
    let mut federation = Federation::new("s1");

    let mut producer = ValueFederate::new(GlobalFederateId(0), "producer");
    let out = producer.register_publication("pub1", "double", "").unwrap();
    federation.register("producer", producer.mailbox_sender()).unwrap();

    let mut consumer = ValueFederate::new(GlobalFederateId(1), "consumer");
    let input = consumer.register_input("sub1", "double", "").unwrap();
    consumer.set_property(input, InterfaceOption::HandleOnlyUpdateOnChange).unwrap();
    consumer.set_property(input, InterfaceOption::InputDelta(0.1)).unwrap();
    let input_handle = GlobalHandle::new(GlobalFederateId(1), input);
    federation.register("consumer", consumer.mailbox_sender()).unwrap();

    let pub_handle = GlobalHandle::new(GlobalFederateId(0), out);
    federation.add_source_target(input_handle, pub_handle, "double", "").unwrap();
    federation.add_destination_target(pub_handle, input_handle).unwrap();

    producer.enter_initializing_mode().await.unwrap();
    consumer.enter_initializing_mode().await.unwrap();
    producer.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();
    consumer.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();

    // A publishes 1.0@t=0, 1.05@t=1, 1.2@t=2, 1.2@t=3; B observes only t=0
    // (first value) and t=2 (1.2 is more than 0.1 away from 1.05).
    let steps = [(0.0_f64, 1.0_f64), (1.0, 1.05), (2.0, 1.2), (3.0, 1.2)];
    let mut event_times = Vec::new();
    for (t, value) in steps {
        producer.publish("pub1", Value::Double(value)).unwrap();
        let bytes = producer.last_published("pub1").unwrap().unwrap();
        let (handle, subs) = producer.publication_subscribers("pub1").unwrap();
        federation.publish_value(handle, &subs, Time::from_seconds(t), 0, bytes).unwrap();

        let (p_granted, _) = producer
            .request_time(Time::from_seconds(t), IterationRequest::NoIterations)
            .await
            .unwrap();
        federation
            .notify_dependents(GlobalFederateId(0), p_granted.saturating_add(Time::EPSILON), false)
            .unwrap();

        let (granted, _) = consumer
            .request_time(Time::from_seconds(t), IterationRequest::NoIterations)
            .await
            .unwrap();
        assert_eq!(granted, Time::from_seconds(t));
        if !consumer.events(granted, EventVectorMode::Inclusive).is_empty() {
            event_times.push(granted);
            let got = consumer.get_input("sub1", TargetType::Double).unwrap();
            assert_eq!(got, Some(Value::Double(value)));
        }
    }

    assert_eq!(event_times, vec![Time::ZERO, Time::from_seconds(2.0)]);

    producer.finalize().await.unwrap();
    consumer.finalize().await.unwrap();
}
