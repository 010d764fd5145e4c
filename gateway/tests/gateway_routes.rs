//! End-to-end behaviour of the assembled gateway app over recording doubles.

mod support;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{self, HeaderName};
use actix_web::http::{Method, StatusCode};
use actix_web::test::{self, TestRequest};
use gateway::domain::UserId;
use gateway::domain::ports::{FixtureIdentityResolver, UnconfiguredIdentityResolver};
use rstest::rstest;
use serde_json::{Value, json};
use support::{APP_ORIGIN, BackendCall, RecordingBackend, chat, gateway_app, paper};

const BEARER: &str = "Bearer integration-token";

fn header_value(res: &ServiceResponse<impl MessageBody>, name: HeaderName) -> Option<String> {
    res.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn caller(raw: i64) -> Arc<FixtureIdentityResolver> {
    Arc::new(FixtureIdentityResolver::new(
        UserId::new(raw).expect("positive id"),
    ))
}

#[actix_web::test]
async fn search_relays_text_and_tags_response_with_trace_id() {
    let backend = RecordingBackend::default().with_papers(vec![paper("W1"), paper("W2")]);
    let app = test::init_service(gateway_app(Arc::new(backend.clone()), caller(5))).await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/ai/search/papers?text=graph%20theory")
            .insert_header(("Authorization", BEARER))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["papers"][0]["id"], "W1");
    assert_eq!(body["papers"][1]["abstract"], "abstract W2");
    assert_eq!(
        backend.calls(),
        vec![BackendCall::Search {
            text: "graph theory".to_owned(),
            chat_id: None,
        }]
    );
}

#[actix_web::test]
async fn missing_token_never_reaches_backend() {
    let backend = RecordingBackend::default();
    let app = test::init_service(gateway_app(Arc::new(backend.clone()), caller(5))).await;

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/api/chats").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "error": "Token required" }));
    assert!(backend.calls().is_empty());
}

#[actix_web::test]
async fn unconfigured_identity_service_is_bad_gateway() {
    let backend = RecordingBackend::default();
    let app = test::init_service(gateway_app(
        Arc::new(backend.clone()),
        Arc::new(UnconfiguredIdentityResolver),
    ))
    .await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/chats")
            .insert_header(("Authorization", BEARER))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(backend.calls().is_empty());
}

#[actix_web::test]
async fn foreign_chat_history_is_forbidden_without_fetching_it() {
    let backend = RecordingBackend::default().with_chats(vec![chat(7, 5), chat(9, 6)]);
    let app = test::init_service(gateway_app(Arc::new(backend.clone()), caller(5))).await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/chats/9/history")
            .insert_header(("Authorization", BEARER))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(backend.calls(), vec![BackendCall::ListChats { user_id: 5 }]);
}

#[actix_web::test]
async fn owned_chat_query_is_recorded_against_the_chat() {
    let backend = RecordingBackend::default()
        .with_chats(vec![chat(7, 5)])
        .with_papers(vec![paper("W3")]);
    let app = test::init_service(gateway_app(Arc::new(backend.clone()), caller(5))).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/chats/7/history")
            .insert_header(("Authorization", BEARER))
            .set_json(json!({ "text": "protein folding" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["papers"][0]["id"], "W3");
    assert_eq!(
        backend.calls(),
        vec![
            BackendCall::ListChats { user_id: 5 },
            BackendCall::Search {
                text: "protein folding".to_owned(),
                chat_id: Some(7),
            },
        ]
    );
}

#[actix_web::test]
async fn owned_chat_history_is_returned_in_backend_order() {
    let backend = RecordingBackend::default()
        .with_chats(vec![chat(7, 5)])
        .with_papers(vec![paper("W4")]);
    let app = test::init_service(gateway_app(Arc::new(backend.clone()), caller(5))).await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/chats/7/history?user_id=5")
            .insert_header(("Authorization", BEARER))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["chat_messages"][0]["search_query"], "graph neural networks");
    assert_eq!(body["chat_messages"][0]["papers"][0]["id"], "W4");
    assert_eq!(
        backend.calls(),
        vec![
            BackendCall::ListChats { user_id: 5 },
            BackendCall::History { chat_id: 7 },
        ]
    );
}

#[actix_web::test]
async fn chat_is_created_for_the_token_owner() {
    let backend = RecordingBackend::default();
    let app = test::init_service(gateway_app(Arc::new(backend.clone()), caller(5))).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/chats")
            .insert_header(("Authorization", BEARER))
            .set_json(json!({ "title": "reading list" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["chat_id"], 100);
    assert_eq!(body["user_id"], 5);
    assert_eq!(
        backend.calls(),
        vec![BackendCall::CreateChat {
            user_id: 5,
            title: "reading list".to_owned(),
        }]
    );
}

#[rstest]
#[case("/health/ready")]
#[case("/health/live")]
#[actix_web::test]
async fn probes_are_public(#[case] path: &str) {
    let app = test::init_service(gateway_app(
        Arc::new(RecordingBackend::default()),
        Arc::new(UnconfiguredIdentityResolver),
    ))
    .await;

    let res = test::call_service(&app, TestRequest::get().uri(path).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn empty_chat_query_fails_after_ownership_check_without_searching() {
    let backend = RecordingBackend::default().with_chats(vec![chat(9, 42)]);
    let app = test::init_service(gateway_app(Arc::new(backend.clone()), caller(42))).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/chats/9/history")
            .insert_header(("Authorization", BEARER))
            .set_json(json!({ "text": "" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.calls(), vec![BackendCall::ListChats { user_id: 42 }]);
}

#[actix_web::test]
async fn zero_user_id_falls_back_to_token_owner() {
    let backend = RecordingBackend::default().with_chats(vec![chat(7, 42)]);
    let app = test::init_service(gateway_app(Arc::new(backend.clone()), caller(42))).await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/chats?user_id=0")
            .insert_header(("Authorization", BEARER))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["chats"][0]["chat_id"], 7);
    assert_eq!(body["chats"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case("/api/chats", "POST")]
#[case("/api/chats/7/history", "GET")]
#[case("/api/ai/paper/add", "POST")]
#[actix_web::test]
async fn preflight_is_answered_without_identity_check(#[case] path: &str, #[case] method: &str) {
    let backend = RecordingBackend::default();
    let app = test::init_service(gateway_app(
        Arc::new(backend.clone()),
        Arc::new(UnconfiguredIdentityResolver),
    ))
    .await;

    let res = test::call_service(
        &app,
        TestRequest::default()
            .method(Method::OPTIONS)
            .uri(path)
            .insert_header((header::ORIGIN, APP_ORIGIN))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, method))
            .insert_header((
                header::ACCESS_CONTROL_REQUEST_HEADERS,
                "authorization,content-type",
            ))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        header_value(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
        Some(APP_ORIGIN)
    );
    assert_eq!(
        header_value(&res, header::ACCESS_CONTROL_ALLOW_CREDENTIALS).as_deref(),
        Some("true")
    );
    let headers = header_value(&res, header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(headers.contains("authorization"), "allowed headers: {headers}");
    assert!(headers.contains("content-type"), "allowed headers: {headers}");
    assert!(backend.calls().is_empty());
}

#[actix_web::test]
async fn cross_origin_read_carries_allow_origin() {
    let backend = RecordingBackend::default().with_chats(vec![chat(7, 5)]);
    let app = test::init_service(gateway_app(Arc::new(backend), caller(5))).await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/chats")
            .insert_header((header::ORIGIN, APP_ORIGIN))
            .insert_header(("Authorization", BEARER))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        header_value(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
        Some(APP_ORIGIN)
    );
    assert_eq!(
        header_value(&res, header::ACCESS_CONTROL_ALLOW_CREDENTIALS).as_deref(),
        Some("true")
    );
}

#[actix_web::test]
async fn rejected_cross_origin_request_still_carries_allow_origin() {
    let app = test::init_service(gateway_app(
        Arc::new(RecordingBackend::default()),
        caller(5),
    ))
    .await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/chats")
            .insert_header((header::ORIGIN, APP_ORIGIN))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        header_value(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
        Some(APP_ORIGIN)
    );
}

#[actix_web::test]
async fn foreign_origin_is_not_granted_access() {
    let app = test::init_service(gateway_app(
        Arc::new(RecordingBackend::default()),
        caller(5),
    ))
    .await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/chats")
            .insert_header((header::ORIGIN, "https://evil.example"))
            .insert_header(("Authorization", BEARER))
            .to_request(),
    )
    .await;

    assert_eq!(header_value(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN), None);
}
