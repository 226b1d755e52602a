//! Boot-time link establishment, retry budget exhaustion and the
//! fatal-restart path.

use plantpet::app::service::AppService;
use plantpet::connectivity::LinkState;
use plantpet::delivery::DeliveryOutcome;
use plantpet::error::{CommsError, Error};

use crate::mock_hw::{
    ApBehaviour, BRIGHT, MockHardware, MockNet, MockWait, RecordingSink, WET, test_config,
};

#[test]
fn start_brings_link_up() {
    let mut net = MockNet::offline(ApBehaviour::Available);
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(test_config(), "PP-TEST");

    app.start(&mut net, &mut wait, &mut sink).unwrap();
    assert_eq!(net.begins, 1);
    assert_eq!(app.link_state(), LinkState::Connected);
    assert_eq!(app.link_rssi(), Some(-55));
}

#[test]
fn exhausted_budget_at_boot_is_fatal_and_sends_nothing() {
    let mut net = MockNet::offline(ApBehaviour::Unreachable);
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(test_config(), "PP-TEST");

    let err = app.start(&mut net, &mut wait, &mut sink).unwrap_err();
    assert_eq!(
        err,
        Error::Comms(CommsError::RetriesExhausted { attempts: 3 })
    );
    assert!(err.is_fatal());
    assert_eq!(net.begins, 3);
    assert!(net.requests.is_empty());
    // Each attempt waited its full bound, servicing updates on every poll.
    assert_eq!(wait.slept_ms, 3 * 1_000);
    assert_eq!(wait.update_polls, 3 * 4);
}

#[test]
fn exhaustion_during_delivery_aborts_tick_before_any_request() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();

    net.link_up = false;
    net.ap = ApBehaviour::Unreachable;

    // Window 1: two failed attempts, both sinks skipped.
    for _ in 0..3 {
        app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    }
    // Window 2: third attempt spends the budget.
    app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    let err = app
        .tick(&mut hw, &mut net, &mut wait, &mut sink)
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(net.begins, 3);
    assert!(net.requests.is_empty(), "no request after the terminal error");
}

#[test]
fn successful_reconnect_refills_budget() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();

    // Burn two attempts.
    net.link_up = false;
    net.ap = ApBehaviour::Unreachable;
    for _ in 0..3 {
        app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    }
    assert_eq!(net.begins, 2);

    // AP comes back: recovery resets the counter, so a later outage
    // gets the full budget again.
    net.ap = ApBehaviour::Available;
    for _ in 0..3 {
        app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    }
    net.link_up = false;
    net.ap = ApBehaviour::Unreachable;
    for _ in 0..3 {
        let report = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
        if let Some(window) = report.window {
            assert_eq!(window.rest, DeliveryOutcome::SkippedNoLink);
        }
    }
    assert_eq!(net.begins, 5);
}

#[test]
fn missing_credentials_run_offline_without_restart() {
    let mut net = MockNet::offline(ApBehaviour::Available);
    net.has_credentials = false;
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");

    app.start(&mut net, &mut wait, &mut sink).unwrap();
    for _ in 0..9 {
        let report = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
        if let Some(window) = report.window {
            assert_eq!(window.time_series, DeliveryOutcome::SkippedNoLink);
            assert_eq!(window.rest, DeliveryOutcome::SkippedNoLink);
        }
    }
    assert_eq!(net.begins, 0);
    assert!(net.requests.is_empty());
    assert_eq!(hw.renders.len(), 9, "local feedback keeps running");
}
