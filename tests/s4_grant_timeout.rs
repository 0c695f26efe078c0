//! A federate blocked on a slow dependency escalates through the
//! grant-timeout stages, but never forces a disconnect when
//! `allow_forced_disconnect` is off, and still resolves correctly once the
//! dependency finally reports.

use std::time::{Duration, Instant};

use helics::core::config::{FederateConfig, GrantTimeoutConfig};
use helics::core::{GlobalFederateId, IterationRequest, IterationResult, Time};
use helics::federate_core::Command;
use helics::Federate;

#[tokio::test]
async fn test_blocked_dependency_escalates_then_resolves() {
    let mut config = FederateConfig::new("fedA");
    config.grant_timeout = GrantTimeoutConfig { timeout: Duration::from_millis(30), allow_forced_disconnect: false };
    let mut a = Federate::with_config(GlobalFederateId(0), config);

    a.enter_initializing_mode().await.unwrap();
    a.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();

    a.mailbox_sender().send(Command::AddDependency(GlobalFederateId(1))).ok();
    // Throwaway request: its only purpose is to drain the mailbox so the
    // dependency above is registered on the coordinator before the request
    // that actually exercises the timeout below.
    a.request_time(Time::ZERO, IterationRequest::NoIterations).await.unwrap();

    tokio::spawn({
        let target = a.mailbox_sender();
        async move {
            // Long enough to cross stages 1-3 (30/60/90ms); stage 4 would
            // land at 120ms but never fires since forced disconnect is off.
            tokio::time::sleep(Duration::from_millis(150)).await;
            target
                .send(Command::TimeGrant {
                    from: GlobalFederateId(1),
                    next_event: Time::from_seconds(2.0).saturating_add(Time::EPSILON),
                    iterating: false,
                })
                .ok();
        }
    });

    let start = Instant::now();
    let (granted, result) = a
        .request_time(Time::from_seconds(2.0), IterationRequest::NoIterations)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(granted, Time::from_seconds(2.0));
    assert_eq!(result, IterationResult::NextStep);
    assert!(elapsed >= Duration::from_millis(140), "expected to block until the dependency reported, elapsed={elapsed:?}");
}
