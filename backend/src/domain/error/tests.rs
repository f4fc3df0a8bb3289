//! Tests for the error payload shape and trace capture.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
fn constructors_set_codes() {
    let cases = [
        (Error::invalid_request("bad"), ErrorCode::InvalidRequest),
        (Error::unauthorized("who"), ErrorCode::Unauthorized),
        (Error::rate_limited("slow"), ErrorCode::RateLimited),
        (Error::provisioning_failed("boom"), ErrorCode::ProvisioningFailed),
        (Error::service_unavailable("down"), ErrorCode::ServiceUnavailable),
        (Error::internal("oops"), ErrorCode::InternalError),
    ];
    for (error, code) in cases {
        assert_eq!(error.code(), code);
    }
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_a_fallback_for_blank_messages() {
    let error = Error::new(ErrorCode::RateLimited, "");
    assert_eq!(error.message(), "Too many requests");
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::internal("boom").try_with_trace_id(" ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a UUID");
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_message_under_error_key(expected_trace_id: String) {
    let error = Error::rate_limited("Try again in 4 hours.")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"retryAfterHours": 4}));
    let body = serde_json::to_value(&error).expect("serialise");
    assert_eq!(
        body,
        json!({
            "code": "rate_limited",
            "error": "Try again in 4 hours.",
            "traceId": TRACE_ID,
            "details": {"retryAfterHours": 4}
        })
    );
}

#[rstest]
fn deserialisation_round_trips_and_validates() {
    let parsed: Error = serde_json::from_value(json!({
        "code": "provisioning_failed",
        "error": "cleanup failed",
        "details": {"stage": "clients"}
    }))
    .expect("valid payload");
    assert_eq!(parsed.code(), ErrorCode::ProvisioningFailed);
    assert_eq!(parsed.details(), Some(&json!({"stage": "clients"})));

    let blank = serde_json::from_value::<Error>(json!({"code": "internal_error", "error": " "}));
    assert!(blank.is_err());
}
