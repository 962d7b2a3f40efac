use std::io::Write;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use casedesk_api::{
    config::AppConfig,
    dataset::Dataset,
    services::{adjudication::OpenAiChatClient, cases::CaseService},
    AppState,
};

fn test_config(dataset_path: &str, base_url: &str) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_json: false,
        dataset_path: dataset_path.to_string(),
        cors_allowed_origins: None,
        openai_api_key: "test-key".to_string(),
        openai_base_url: base_url.to_string(),
        openai_model: "gpt-3.5-turbo".to_string(),
    }
}

/// Dataset with one long-late order, one far-future order, and one record
/// with an unusable date.
fn write_dataset() -> NamedTempFile {
    let records = json!([
        {
            "item_id": "late-1",
            "item_name": "Paracetamol",
            "vendor": {"name": "PharmaCorp", "details": "4 star"},
            "quantity": 40,
            "unit_price": 2.5,
            "total_price": 100.0,
            "hospital_department": "Emergency",
            "stock_before_order": 500,
            "current_inventory": 25,
            "priority": "Yes",
            "external_factor_encitation": "Rainy weather, Heavy traffic",
            "order_date": "2024-01-01",
            "estimated_days_promised": 5,
            "buffer_days_given": 2,
            "distance": 50
        },
        {
            "item_id": "future-1",
            "item_name": "Ibuprofen",
            "vendor": {"name": "MediSupply", "details": "3 star"},
            "order_date": "2099-01-01",
            "estimated_days_promised": 10,
            "buffer_days_given": 3
        },
        {
            "item_id": "bad-date-1",
            "item_name": "Amoxicillin",
            "order_date": "not-a-date"
        }
    ]);

    let mut file = NamedTempFile::new().expect("temp dataset file");
    file.write_all(serde_json::to_string_pretty(&records).unwrap().as_bytes())
        .expect("write dataset");
    file
}

fn build_app(dataset_file: &NamedTempFile, base_url: &str) -> Router {
    let dataset_path = dataset_file.path().to_str().unwrap().to_string();
    let dataset = Arc::new(Dataset::load(&dataset_path).expect("load dataset"));
    let cfg = test_config(&dataset_path, base_url);

    let adjudicator = Arc::new(OpenAiChatClient::new(
        cfg.openai_base_url.clone(),
        cfg.openai_api_key.clone(),
        cfg.openai_model.clone(),
    ));
    let cases = CaseService::new(dataset.clone(), adjudicator);

    let state = AppState {
        dataset,
        config: cfg,
        cases,
    };

    Router::new()
        .merge(casedesk_api::app_routes())
        .with_state(state)
}

async fn solve_case(app: Router, item_id: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/solve_case")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "item_id": item_id }).to_string()))
        .unwrap();

    app.oneshot(request).await.unwrap()
}

async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

async fn response_json(response: Response) -> Value {
    serde_json::from_str(&response_text(response).await).expect("json response")
}

#[tokio::test]
async fn late_order_returns_wrapped_decision() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("is delayed by"))
        .and(body_string_contains("PharmaCorp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  The vendor is at fault.  "}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dataset = write_dataset();
    let app = build_app(&dataset, &server.uri());

    let response = solve_case(app, "late-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_text(response).await,
        "Decision on the order with ID late-1: The vendor is at fault."
    );
}

#[tokio::test]
async fn on_time_order_never_calls_the_adjudication_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dataset = write_dataset();
    let app = build_app(&dataset, &server.uri());

    let response = solve_case(app, "future-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_text(response).await,
        "The order with ID future-1 should be delivered soon."
    );
}

#[tokio::test]
async fn unknown_item_id_maps_to_404() {
    let server = MockServer::start().await;
    let dataset = write_dataset();
    let app = build_app(&dataset, &server.uri());

    let response = solve_case(app, "nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn unusable_order_date_maps_to_500() {
    let server = MockServer::start().await;
    let dataset = write_dataset();
    let app = build_app(&dataset, &server.uri());

    let response = solve_case(app, "bad-date-1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Malformed record"));
}

#[tokio::test]
async fn adjudication_service_failure_maps_to_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let dataset = write_dataset();
    let app = build_app(&dataset, &server.uri());

    let response = solve_case(app, "late-1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Adjudication service error"));
}

#[tokio::test]
async fn empty_choices_from_the_model_maps_to_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dataset = write_dataset();
    let app = build_app(&dataset, &server.uri());

    let response = solve_case(app, "late-1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_probe_reports_dataset_size() {
    let server = MockServer::start().await;
    let dataset = write_dataset();
    let app = build_app(&dataset, &server.uri());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health/detailed")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["dataset_records"], 3);
}
