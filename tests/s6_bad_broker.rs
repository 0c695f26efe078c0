//! A broker address that refuses the connection fails registration quickly
//! rather than hanging, and a federate that never got past construction
//! stays in `CREATED` throughout.

use std::time::{Duration, Instant};

use helics::broker::connect_broker;
use helics::core::GlobalFederateId;
use helics::federate_core::LifecycleState;
use helics::Federate;

#[tokio::test]
async fn test_unreachable_broker_fails_registration_quickly() {
    let fed = Federate::new(GlobalFederateId(0), "fedA");
    assert_eq!(fed.state(), LifecycleState::Created);

    let start = Instant::now();
    let result = connect_broker("127.0.0.1:1", Duration::from_millis(800)).await;
    let elapsed = start.elapsed();

    assert!(matches!(result, Err(helics::Error::RegistrationFailure(_))));
    assert!(elapsed < Duration::from_secs(1), "registration failure took too long: {elapsed:?}");

    // Nothing about the failed broker dial touches the federate's own
    // lifecycle: it never left CREATED.
    assert_eq!(fed.state(), LifecycleState::Created);
}
