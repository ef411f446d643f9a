use serde_json::Value;
use std::time::{Duration, Instant};
use uptime_monitor::{Config, MonitorController, MonitorState, ProbeOutcome};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_until_stopped(controller: &MonitorController, within: Duration) -> Duration {
    let started = Instant::now();
    while controller.state().await != MonitorState::Stopped {
        assert!(started.elapsed() < within, "run did not stop by itself");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    started.elapsed()
}

#[tokio::test]
async fn unreachable_target_run_times_out_on_its_own() {
    let config = Config {
        target_url: "http://127.0.0.1:1/".to_string(),
        poll_interval: Duration::from_secs(1),
        probe_timeout: Duration::from_millis(500),
        max_run_duration: Duration::from_secs(2),
        healthy_status_code: 200,
    };
    let controller = MonitorController::new(config).unwrap();

    controller.start().await;
    let elapsed = wait_until_stopped(&controller, Duration::from_secs(5)).await;
    assert!(elapsed >= Duration::from_millis(1900), "stopped too early: {:?}", elapsed);

    let records = controller.snapshot().await;
    assert!(
        (1..=3).contains(&records.len()),
        "unexpected record count {}",
        records.len()
    );
    for record in records.iter() {
        assert_eq!(record.outcome, ProbeOutcome::Failure);
        assert!(record.status_code.is_none());
        assert!(record.response_time_seconds.is_none());
    }
}

#[tokio::test]
async fn healthy_target_is_recorded_in_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(20)))
        .mount(&server)
        .await;

    let config = Config {
        target_url: server.uri(),
        poll_interval: Duration::from_millis(50),
        probe_timeout: Duration::from_secs(2),
        max_run_duration: Duration::from_millis(300),
        healthy_status_code: 200,
    };
    let controller = MonitorController::new(config).unwrap();

    controller.start().await;
    wait_until_stopped(&controller, Duration::from_secs(3)).await;

    let records = controller.snapshot().await;
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.is_success()));

    let json = serde_json::to_value(records.as_slice()).unwrap();
    let first = &json[0];
    assert_eq!(first["status"], "success");
    assert_eq!(first["status_code"], 200);
    assert!(first["response_time"].as_f64().unwrap() >= 0.02);

    let timestamp = first["timestamp"].as_str().unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok());
    assert!(matches!(first, Value::Object(map) if map.len() == 4));
}

#[tokio::test]
async fn degraded_target_produces_failures_with_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config {
        target_url: server.uri(),
        poll_interval: Duration::from_millis(30),
        probe_timeout: Duration::from_secs(2),
        max_run_duration: Duration::from_secs(60),
        healthy_status_code: 200,
    };
    let controller = MonitorController::new(config).unwrap();

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    controller.stop().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let settled = controller.snapshot().await.len();
    assert!(settled >= 2);
    for record in controller.snapshot().await.iter() {
        assert_eq!(record.outcome, ProbeOutcome::Failure);
        assert_eq!(record.status_code, Some(500));
    }

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(controller.snapshot().await.len(), settled);
}
