//! An unconstrained federate in real-time mode is granted immediately by
//! the coordinator, but paces its return to wallclock via
//! `RealTimeScheduler::sleep_after_grant` rather than racing ahead of it.

use std::time::{Duration, Instant};

use helics::core::config::{FederateConfig, RealTimeMode};
use helics::core::{GlobalFederateId, IterationRequest, Time};
use helics::Federate;

#[tokio::test]
async fn test_real_time_mode_paces_grant_to_wallclock() {
    let mut config = FederateConfig::new("fedA");
    config.real_time = RealTimeMode::Enabled;
    config.rt_lag = Time::ZERO;
    config.rt_lead = Time::ZERO;
    let mut fed = Federate::with_config(GlobalFederateId(0), config);

    fed.enter_initializing_mode().await.unwrap();
    fed.enter_executing_mode(IterationRequest::NoIterations).await.unwrap();

    let start = Instant::now();
    let (granted, _) = fed
        .request_time(Time::from_seconds(0.05), IterationRequest::NoIterations)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(granted, Time::from_seconds(0.05));
    assert!(elapsed >= Duration::from_millis(40), "expected real-time pacing to delay the grant, elapsed={elapsed:?}");
}
