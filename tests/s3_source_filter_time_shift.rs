//! Fed A sends a message at t=1 to Fed B's endpoint through a source filter
//! that shifts delivery by +2.0; B's `requestTime(5)` should stop at the
//! shifted delivery time (3.0) rather than running straight to 5, and the
//! delivered message must carry the shifted time with its source/original
//! fields intact.

use helics::core::{GlobalFederateId, GlobalHandle, InterfaceHandle, IterationRequest, Time};
use helics::federate_core::Command;
use helics::interfaces::{FilterKind, TimeShiftOperator};
use helics::runner::Federation;
use helics::MessageFederate;

#[tokio::test]
async fn test_source_filter_shifts_delivery_time() {
    let mut federation = Federation::new("s3");

    let mut fed_a = MessageFederate::new(GlobalFederateId(0), "fedA");
    let e = fed_a.register_endpoint("e", "string").unwrap();
    let e_handle = GlobalHandle::new(GlobalFederateId(0), e);
    fed_a
        .register_filter("shift", FilterKind::Source, e_handle, Box::new(TimeShiftOperator { delay: Time::from_seconds(2.0) }))
        .unwrap();
    federation.register("fedA", fed_a.mailbox_sender()).unwrap();

    let mut fed_b = MessageFederate::new(GlobalFederateId(1), "fedB");
    let b_in: InterfaceHandle = fed_b.register_endpoint("in", "string").unwrap();
    let b_handle = GlobalHandle::new(GlobalFederateId(1), b_in);
    federation.register("fedB", fed_b.mailbox_sender()).unwrap();

    // fedB depends on fedA for time: there's no addSourceTarget-style
    // wiring for endpoints, so the dependency edge is declared directly.
    fed_b.mailbox_sender().send(Command::AddDependency(GlobalFederateId(0))).ok();

    fed_a.enter_initializing_mode().await.unwrap();
    fed_b.enter_initializing_mode().await.unwrap();
    fed_a.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();
    fed_b.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();

    let (a_granted, _) = fed_a
        .request_time(Time::from_seconds(1.0), IterationRequest::NoIterations)
        .await
        .unwrap();
    assert_eq!(a_granted, Time::from_seconds(1.0));

    let messages = fed_a
        .outgoing_messages("e", b_handle, a_granted, b"hello".to_vec())
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].time, Time::from_seconds(3.0));
    for message in messages {
        federation.deliver_message(message).unwrap();
    }

    // fedA has nothing further to send; it reports that directly to fedB so
    // fedB isn't stuck waiting on it forever (the dependency above was
    // declared straight to fedB's coordinator, not through the broker's
    // addSourceTarget/addDestinationTarget bookkeeping, so the report has
    // to go the same way).
    fed_b
        .mailbox_sender()
        .send(Command::TimeGrant {
            from: GlobalFederateId(0),
            next_event: Time::from_seconds(3.0).saturating_add(Time::EPSILON),
            iterating: false,
        })
        .ok();

    let (b_granted, _) = fed_b
        .request_time(Time::from_seconds(5.0), IterationRequest::NoIterations)
        .await
        .unwrap();
    assert_eq!(b_granted, Time::from_seconds(3.0));

    assert!(fed_b.has_message("in").unwrap());
    let msg = fed_b.get_message("in").unwrap().unwrap();
    assert_eq!(msg.time, Time::from_seconds(3.0));
    assert_eq!(msg.payload, b"hello");
    assert_eq!(msg.original_source, GlobalHandle::new(GlobalFederateId(0), e));
    assert_eq!(msg.source, GlobalHandle::new(GlobalFederateId(0), e));

    fed_a.finalize().await.unwrap();
    fed_b.finalize().await.unwrap();
}
