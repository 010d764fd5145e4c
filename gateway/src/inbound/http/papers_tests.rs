//! Tests for paper search and indexing handlers.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use crate::domain::ports::{MockSemanticBackend, RpcFailure};
use crate::domain::{AddPaperOutcome, NewPaper};
use crate::inbound::http::test_utils::{BEARER, gateway_app, paper, paper_ids, token_for};

async fn send(backend: MockSemanticBackend, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(gateway_app(backend, token_for(42))).await;
    let response = actix_test::call_service(
        &app,
        request.insert_header((AUTHORIZATION, BEARER)).to_request(),
    )
    .await;
    let status = response.status();
    let body = actix_test::read_body_json(response).await;
    (status, body)
}

#[rstest::rstest]
#[case("/api/ai/search/papers")]
#[case("/api/ai/search/papers?text=")]
#[case("/api/ai/search/papers?text=%20%20")]
#[actix_web::test]
async fn search_requires_text(#[case] uri: &str) {
    let mut backend = MockSemanticBackend::new();
    backend.expect_search_papers().times(0);

    let (status, body) = send(backend, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "text is required" }));
}

#[actix_web::test]
async fn search_preserves_backend_order_without_chat() {
    let mut backend = MockSemanticBackend::new();
    backend
        .expect_search_papers()
        .withf(|query| query.text == "graph neural networks" && query.chat_id.is_none())
        .times(1)
        .returning(|_| Ok(vec![paper("W3"), paper("W1"), paper("W2")]));

    let (status, body) = send(
        backend,
        actix_test::TestRequest::get().uri("/api/ai/search/papers?text=graph%20neural%20networks"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(paper_ids(&body), ["W3", "W1", "W2"]);
    assert_eq!(body["papers"][0]["abstract"], "abstract W3");
    assert_eq!(body["papers"][0]["year"], 2020);
}

#[actix_web::test]
async fn repeated_search_returns_identical_sequence() {
    let mut backend = MockSemanticBackend::new();
    backend
        .expect_search_papers()
        .times(2)
        .returning(|_| Ok(vec![paper("A"), paper("B")]));
    let app = actix_test::init_service(gateway_app(backend, token_for(42))).await;

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let request = actix_test::TestRequest::get()
            .uri("/api/ai/search/papers?text=transformers")
            .insert_header((AUTHORIZATION, BEARER))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[actix_web::test]
async fn empty_search_is_an_empty_array() {
    let mut backend = MockSemanticBackend::new();
    backend
        .expect_search_papers()
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let (status, body) = send(
        backend,
        actix_test::TestRequest::get().uri("/api/ai/search/papers?text=nothing"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "papers": [] }));
}

#[actix_web::test]
async fn search_backend_timeout_is_gateway_timeout() {
    let mut backend = MockSemanticBackend::new();
    backend
        .expect_search_papers()
        .times(1)
        .returning(|_| Err(RpcFailure::deadline_exceeded("backend too slow")));

    let (status, body) = send(
        backend,
        actix_test::TestRequest::get().uri("/api/ai/search/papers?text=slow"),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, json!({ "error": "backend too slow" }));
}

#[actix_web::test]
async fn add_paper_flattens_work_references() {
    let mut backend = MockSemanticBackend::new();
    backend
        .expect_add_paper()
        .withf(|paper: &NewPaper| {
            paper.id == "W9"
                && paper.abstract_text == "Summary"
                && paper.referenced_works == ["W1", "W2"]
                && paper.related_works == ["W3"]
        })
        .times(1)
        .returning(|_| Ok(AddPaperOutcome::Added));

    let (status, body) = send(
        backend,
        actix_test::TestRequest::post()
            .uri("/api/ai/paper/add")
            .set_json(json!({
                "id": "W9",
                "title": "A paper",
                "abstract": "Summary",
                "year": 2019,
                "best_oa_location": "https://oa.example/W9",
                "referenced_paper": [{ "id": "W1" }, { "id": "W2" }],
                "related_paper": [{ "id": "W3" }],
            })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn add_paper_surfaces_backend_rejection_as_bad_request() {
    let mut backend = MockSemanticBackend::new();
    backend
        .expect_add_paper()
        .times(1)
        .returning(|_| Ok(AddPaperOutcome::Rejected("paper already exists".to_owned())));

    let (status, body) = send(
        backend,
        actix_test::TestRequest::post()
            .uri("/api/ai/paper/add")
            .set_json(json!({ "id": "W1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "paper already exists" }));
}

#[actix_web::test]
async fn add_paper_rejects_malformed_json_without_backend_call() {
    let mut backend = MockSemanticBackend::new();
    backend.expect_add_paper().times(0);

    let (status, body) = send(
        backend,
        actix_test::TestRequest::post()
            .uri("/api/ai/paper/add")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"id": "W1", "year": "last year"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().expect("error message");
    assert!(!message.is_empty());
}
