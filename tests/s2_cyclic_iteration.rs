//! A federate with a dependency that keeps reporting `iterating = true` at
//! the same time it's requesting: the grant must keep coming back
//! `ITERATING` until the dependency settles or `MAX_ITERATIONS` is hit, at
//! which point it must still resolve to `NEXT_STEP` rather than hang.

use helics::core::{GlobalFederateId, IterationRequest, IterationResult, Time};
use helics::federate_core::Command;
use helics::Federate;

#[tokio::test]
async fn test_iterate_if_needed_converges_before_max_iterations() {
    let mut a = Federate::new(GlobalFederateId(0), "fedA");
    a.enter_initializing_mode().await.unwrap();
    a.mailbox_sender().send(Command::AddDependency(GlobalFederateId(1))).ok();

    // Peer B reports `iterating` at the same time for a few rounds, then
    // settles, well under the default MAX_ITERATIONS=10.
    tokio::spawn({
        let target = a.mailbox_sender();
        async move {
            for _ in 0..3 {
                tokio::time::sleep(std::time::Duration::from_millis(2)).await;
                target
                    .send(Command::TimeGrant { from: GlobalFederateId(1), next_event: Time::ZERO, iterating: true })
                    .ok();
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
            target
                .send(Command::TimeGrant { from: GlobalFederateId(1), next_event: Time::ZERO, iterating: false })
                .ok();
        }
    });

    let result = a.enter_executing_mode(IterationRequest::IterateIfNeeded).await.unwrap();
    assert_eq!(result, IterationResult::NextStep);
}

#[tokio::test]
async fn test_iterate_if_needed_stops_at_max_iterations() {
    let mut a = Federate::new(GlobalFederateId(0), "fedA");
    a.enter_initializing_mode().await.unwrap();
    a.mailbox_sender().send(Command::AddDependency(GlobalFederateId(1))).ok();

    // Peer B never stops reporting `iterating`; the coordinator's own
    // `max_iterations` (default 10) must cut the loop off regardless and
    // still hand back a grant instead of looping forever.
    tokio::spawn({
        let target = a.mailbox_sender();
        async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                if target
                    .send(Command::TimeGrant { from: GlobalFederateId(1), next_event: Time::ZERO, iterating: true })
                    .is_err()
                {
                    break;
                }
            }
        }
    });

    let result = a.enter_executing_mode(IterationRequest::IterateIfNeeded).await.unwrap();
    assert_eq!(result, IterationResult::NextStep);
}
