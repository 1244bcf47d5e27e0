use slipway::HealthStatus;
use slipway::health::classify;

#[test]
fn json_ok_body_is_healthy() {
    assert_eq!(classify(r#"{"status":"ok"}"#), HealthStatus::Healthy);
}

#[test]
fn degraded_body_is_not_healthy() {
    assert_eq!(classify(r#"{"status":"degraded"}"#), HealthStatus::Starting);
}

#[test]
fn bare_tokens_are_healthy() {
    assert_eq!(classify("ok"), HealthStatus::Healthy);
    assert_eq!(classify("healthy"), HealthStatus::Healthy);
    assert_eq!(classify(r#"{"ready":true}"#), HealthStatus::Healthy);
}

#[test]
fn empty_body_is_not_healthy() {
    assert_eq!(classify(""), HealthStatus::Starting);
}

#[test]
fn match_is_case_sensitive() {
    assert_eq!(classify("OK"), HealthStatus::Starting);
    assert_eq!(classify("Healthy"), HealthStatus::Starting);
}

#[test]
fn labels() {
    assert_eq!(HealthStatus::Healthy.label(), "OK");
    assert_eq!(HealthStatus::Starting.label(), "Starting");
}
