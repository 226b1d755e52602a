//! Integration tests for the full sampling tick:
//! read → calibrate → score → accumulate → alert → emit + deliver → render.

use plantpet::alert::AlertTransition;
use plantpet::app::events::AppEvent;
use plantpet::app::service::AppService;
use plantpet::delivery::DeliveryOutcome;
use plantpet::score::Mood;

use crate::mock_hw::{
    BRIGHT, MockHardware, MockNet, MockWait, RecordingSink, WET, test_config,
};

fn started_app(net: &mut MockNet, wait: &mut MockWait, sink: &mut RecordingSink) -> AppService {
    let mut app = AppService::new(test_config(), "PP-TEST");
    app.start(net, wait, sink).expect("start");
    app
}

#[test]
fn healthy_plant_emits_one_window_per_three_ticks() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::constant(WET, BRIGHT);
    let mut app = started_app(&mut net, &mut wait, &mut sink);

    let r1 = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    let r2 = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    assert!(r1.window.is_none() && r2.window.is_none());
    assert_eq!(app.pending_samples(), 2);
    assert!(net.requests.is_empty(), "nothing sent mid-window");

    let r3 = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    let window = r3.window.expect("window due at tick 3");
    assert_eq!(window.averages.samples, 3);
    assert_eq!(window.time_series, DeliveryOutcome::Delivered { status: 204 });
    assert_eq!(window.rest, DeliveryOutcome::Delivered { status: 201 });
    assert_eq!(app.pending_samples(), 0);

    assert_eq!(net.requests.len(), 2);
    assert_eq!(
        net.requests[0].body,
        "plant_status,device_id=PP-TEST soil_pct=100.00,ldr_pct=100.00,happiness=100i"
    );
    assert!(net.requests[1].url.ends_with("/rest/v1/plant_readings"));
    assert!(net.requests[1].body.contains("\"ldr_pct\":100.0"));

    assert!(r3.alert.is_none());
    assert_eq!(hw.renders.len(), 3);
    assert_eq!(hw.last_mood(), Some(Mood::Happy));
}

#[test]
fn window_averages_are_arithmetic_means() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    // Scores 80, 70, 60 with dark light.
    let mut hw = MockHardware::scores(&[80, 70, 60]);
    let mut app = started_app(&mut net, &mut wait, &mut sink);

    let mut last = None;
    for _ in 0..3 {
        last = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap().window;
    }
    let avg = last.unwrap().averages;
    assert!((avg.score - 70.0).abs() < 1e-4);
    assert!((avg.soil_pct - 70.5).abs() < 1e-3);
    assert_eq!(avg.light_pct, 0.0);
    assert!(net.requests[0].body.ends_with("happiness=70i"));
}

#[test]
fn hysteresis_sequence_raises_once_and_recovers_once() {
    let scores = [60, 35, 35, 44, 42, 47];
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::scores(&scores);
    let mut app = started_app(&mut net, &mut wait, &mut sink);

    let mut transitions = Vec::new();
    for (i, expected) in scores.iter().enumerate() {
        let report = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
        assert_eq!(report.vitals.score, *expected, "tick {}", i + 1);
        if let Some((t, outcome)) = report.alert {
            assert_eq!(outcome, DeliveryOutcome::Delivered { status: 200 });
            transitions.push((report.tick, t));
        }
    }

    assert_eq!(transitions.len(), 2);
    assert!(matches!(transitions[0], (2, AlertTransition::Degraded(v)) if v.score == 35));
    assert!(matches!(transitions[1], (6, AlertTransition::Recovered(v)) if v.score == 47));
    assert!(!app.alert_state().alerted);

    let alerts: Vec<_> = net
        .requests
        .iter()
        .filter(|r| r.content_type == "application/x-www-form-urlencoded")
        .collect();
    assert_eq!(alerts.len(), 2);
    assert!(alerts[0].body.ends_with("sound=siren"));
    assert!(alerts[1].body.ends_with("sound=magic"));

    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertRaised(_))), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertCleared(_))), 1);
}

#[test]
fn alert_state_advances_even_when_alert_delivery_fails() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::scores(&[20, 20]);
    let mut app = started_app(&mut net, &mut wait, &mut sink);

    net.respond(Ok(500));
    let report = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    let (_, outcome) = report.alert.expect("degraded transition");
    assert!(matches!(outcome, DeliveryOutcome::HttpError { status: 500, .. }));
    assert!(app.alert_state().alerted);

    // Still below threshold: no repeat notification.
    let report = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    assert!(report.alert.is_none());
    assert_eq!(net.requests.len(), 1);
}

#[test]
fn mood_follows_score_thresholds() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::scores(&[90, 50, 30, 10]);
    let mut app = started_app(&mut net, &mut wait, &mut sink);

    let moods: Vec<Mood> = (0..4)
        .map(|_| app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap().mood)
        .collect();
    assert_eq!(moods, [Mood::Happy, Mood::Ok, Mood::Angry, Mood::Dead]);
}

#[test]
fn out_of_range_raw_codes_saturate() {
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    // Soil probe pinned to the rail beyond "dry", LDR at full scale.
    let mut hw = MockHardware::constant(4095, 4095);
    let mut app = started_app(&mut net, &mut wait, &mut sink);

    let report = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
    assert_eq!(report.vitals.soil_pct, 0.0);
    assert_eq!(report.vitals.light_pct, 100.0);
    assert_eq!(report.vitals.score, 0);
}

#[test]
fn recovery_fires_on_first_score_above_band() {
    let scores = [60, 35, 35, 50, 42, 47];
    let mut net = MockNet::online();
    let mut wait = MockWait::default();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::scores(&scores);
    let mut app = started_app(&mut net, &mut wait, &mut sink);

    let transitions: Vec<_> = (0..scores.len())
        .filter_map(|_| {
            let report = app.tick(&mut hw, &mut net, &mut wait, &mut sink).unwrap();
            report.alert.map(|(t, _)| (report.tick, t))
        })
        .collect();

    assert_eq!(transitions.len(), 2, "one degraded, one recovered");
    assert!(matches!(transitions[0], (2, AlertTransition::Degraded(v)) if v.score == 35));
    assert!(matches!(transitions[1], (4, AlertTransition::Recovered(v)) if v.score == 50));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertRaised(_))), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertCleared(_))), 1);
}
