//! Per-sink failure isolation and link recovery during delivery.

use plantpet::app::events::AppEvent;
use plantpet::app::ports::TransportError;
use plantpet::app::service::AppService;
use plantpet::delivery::{DeliveryOutcome, Sink};

use crate::mock_hw::{
    ApBehaviour, BRIGHT, MockHardware, MockNet, MockWait, RecordingSink, WET, test_config,
};

/// Run `n` ticks and return the report of the last one.
fn run(
    app: &mut AppService,
    n: usize,
    hw: &mut MockHardware,
    net: &mut MockNet,
    wait: &mut MockWait,
    sink: &mut RecordingSink,
) -> plantpet::app::service::TickReport {
    let mut last = None;
    for _ in 0..n {
        last = Some(app.tick(hw, net, wait, sink).expect("tick"));
    }
    last.expect("at least one tick")
}

#[test]
fn failing_time_series_does_not_block_rest() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();

    net.respond(Ok(500));
    let window = run(&mut app, 3, &mut hw, &mut net, &mut wait, &mut sink)
        .window
        .expect("window");

    assert!(matches!(
        window.time_series,
        DeliveryOutcome::HttpError { status: 500, .. }
    ));
    assert_eq!(window.rest, DeliveryOutcome::Delivered { status: 201 });
    assert_eq!(net.requests.len(), 2, "each sink tried exactly once");

    // The window was cleared once; the next one starts from scratch.
    assert_eq!(app.pending_samples(), 0);
    let next = run(&mut app, 3, &mut hw, &mut net, &mut wait, &mut sink)
        .window
        .expect("second window");
    assert_eq!(next.averages.samples, 3);
    assert!(next.time_series.is_success());
}

#[test]
fn transport_error_on_rest_is_reported_not_retried() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();

    net.respond(Ok(204));
    net.respond(Err(TransportError::Timeout));
    let window = run(&mut app, 3, &mut hw, &mut net, &mut wait, &mut sink)
        .window
        .unwrap();

    assert!(window.time_series.is_success());
    assert_eq!(
        window.rest,
        DeliveryOutcome::TransportError(TransportError::Timeout)
    );
    assert_eq!(net.requests.len(), 2);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::Delivery { sink: Sink::Rest, outcome } if !outcome.is_success()
        )),
        1
    );
}

#[test]
fn wrong_success_code_counts_as_failure() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();

    // 200 is not the time-series sink's success code.
    net.respond(Ok(200));
    let window = run(&mut app, 3, &mut hw, &mut net, &mut wait, &mut sink)
        .window
        .unwrap();
    assert!(matches!(
        window.time_series,
        DeliveryOutcome::HttpError { status: 200, .. }
    ));
}

#[test]
fn dropped_link_is_recovered_before_sending() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();

    run(&mut app, 2, &mut hw, &mut net, &mut wait, &mut sink);
    net.link_up = false;
    let window = run(&mut app, 1, &mut hw, &mut net, &mut wait, &mut sink)
        .window
        .unwrap();

    assert_eq!(net.begins, 1, "one reconnect, then both sinks share the link");
    assert!(window.time_series.is_success());
    assert!(window.rest.is_success());
}

#[test]
fn unrecoverable_link_skips_sinks_but_clears_window() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();

    net.link_up = false;
    net.ap = ApBehaviour::Unreachable;
    let window = run(&mut app, 3, &mut hw, &mut net, &mut wait, &mut sink)
        .window
        .unwrap();

    // Budget of 3: one attempt per sink leaves one in reserve.
    assert_eq!(net.begins, 2);
    assert_eq!(window.time_series, DeliveryOutcome::SkippedNoLink);
    assert_eq!(window.rest, DeliveryOutcome::SkippedNoLink);
    assert!(net.requests.is_empty());
    assert_eq!(app.pending_samples(), 0);
}

#[test]
fn every_post_services_updates() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    // Alert and window close on the same tick: three POSTs back to back.
    let mut hw = MockHardware::scores(&[60, 60, 20]);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();
    let polls_before = wait.update_polls;

    run(&mut app, 2, &mut hw, &mut net, &mut wait, &mut sink);
    assert_eq!(wait.update_polls, polls_before, "no sends, no polls");

    let report = run(&mut app, 1, &mut hw, &mut net, &mut wait, &mut sink);
    assert!(report.alert.is_some() && report.window.is_some());
    assert_eq!(net.requests.len(), 3);
    assert_eq!(wait.update_polls - polls_before, 3);
}

#[test]
fn failed_posts_still_service_updates() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(&mut net, &mut wait, &mut sink).unwrap();

    net.respond(Err(TransportError::Timeout));
    net.respond(Ok(503));
    let window = run(&mut app, 3, &mut hw, &mut net, &mut wait, &mut sink)
        .window
        .unwrap();

    assert!(!window.time_series.is_success());
    assert!(!window.rest.is_success());
    assert_eq!(wait.update_polls, 2);
}
