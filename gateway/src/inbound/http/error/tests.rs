//! Tests for HTTP error mapping.

use super::*;
use crate::domain::TraceId;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::bad_gateway("down"), StatusCode::BAD_GATEWAY)]
#[case(Error::gateway_timeout("slow"), StatusCode::GATEWAY_TIMEOUT)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::new(ErrorCode::IdentityRejected(403), "nope"), StatusCode::FORBIDDEN)]
#[case(Error::new(ErrorCode::IdentityRejected(418), "teapot"), StatusCode::IM_A_TEAPOT)]
#[case(Error::new(ErrorCode::IdentityRejected(42), "weird"), StatusCode::UNAUTHORIZED)]
#[case(Error::new(ErrorCode::IdentityRejected(503), "down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::new(ErrorCode::IdentityRejected(101), "switching"), StatusCode::UNAUTHORIZED)]
#[case(Error::new(ErrorCode::IdentityRejected(204), "empty"), StatusCode::UNAUTHORIZED)]
#[case(Error::new(ErrorCode::IdentityRejected(302), "moved"), StatusCode::UNAUTHORIZED)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, trace_id, body)
}

#[actix_web::test]
async fn error_body_is_a_single_error_field() {
    let error = Error::forbidden("chat access denied").with_trace_id(TRACE_ID);
    let (status, trace_id, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(trace_id.as_deref(), Some(TRACE_ID));
    assert_eq!(body, json!({ "error": "chat access denied" }));
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("connection string leaked").with_trace_id(TRACE_ID);
    let (status, trace_id, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(trace_id.as_deref(), Some(TRACE_ID));
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[actix_web::test]
async fn trace_header_omitted_outside_request_scope() {
    let (_, trace_id, _) = body_of(&Error::bad_gateway("down")).await;
    assert!(trace_id.is_none());
}

#[actix_web::test]
async fn trace_header_reflects_scoped_identifier() {
    let scoped = TraceId::generate();
    let error = TraceId::scope(scoped, async { Error::not_found("gone") }).await;
    let (_, trace_id, _) = body_of(&error).await;
    assert_eq!(trace_id, Some(scoped.to_string()));
}

#[test]
fn actix_errors_become_redacted_internal_errors() {
    let actix_error = actix_web::error::ErrorBadRequest("secret detail");
    let error = Error::from(actix_error);
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Internal server error");
}
