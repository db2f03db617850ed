//! Gemini wire-format tests against a local stub server

mod common;

use std::sync::{Arc, Mutex};

use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tripbot::config::GeminiConfig;
use tripbot::gateway::decode_image;
use tripbot::{
    GeminiClient, GenerativeModel, ImageUpload, ModelGateway, ModelResult, PromptTemplateSet,
    SectionId, SectionRouter, UserInput,
};

#[derive(Clone, Default)]
struct Recorded {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    queries: Arc<Mutex<Vec<Option<String>>>>,
}

async fn generate(
    State(recorded): State<Recorded>,
    Path(call): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    recorded.calls.lock().unwrap().push((call, body));
    recorded
        .queries
        .lock()
        .unwrap()
        .push(uri.query().map(str::to_owned));

    match headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) {
        Some("valid_test_key") => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Goa is lovely in January."}]},
                    "finishReason": "STOP"
                }]
            })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}})),
        ),
    }
}

async fn start_stub() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/v1beta/models/{call}", post(generate))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1beta"), recorded)
}

fn client(base_url: &str, api_key: &str) -> GeminiClient {
    GeminiClient::from_config(&GeminiConfig {
        api_key: Some(api_key.to_string()),
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..GeminiConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_text_request_format() {
    let (base_url, recorded) = start_stub().await;
    let client = client(&base_url, "valid_test_key");

    let answer = client
        .generate_text("Provide top restaurants and hotels in Goa", "Goa")
        .await
        .unwrap();
    assert_eq!(answer, "Goa is lovely in January.");

    let calls = recorded.calls.lock().unwrap();
    let (call, body) = &calls[0];
    assert_eq!(call, "gemini-1.5-pro:generateContent");
    assert_eq!(
        body["contents"][0]["parts"],
        json!([
            {"text": "Provide top restaurants and hotels in Goa"},
            {"text": "Goa"}
        ])
    );
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(recorded.queries.lock().unwrap()[0], None);
}

#[tokio::test]
async fn test_vision_request_uses_vision_model_and_inline_data() {
    let (base_url, recorded) = start_stub().await;
    let client = client(&base_url, "valid_test_key");
    let image = decode_image(&common::png_bytes()).unwrap();

    client
        .generate_vision("Describe this place", &image)
        .await
        .unwrap();

    let calls = recorded.calls.lock().unwrap();
    let (call, body) = &calls[0];
    assert_eq!(call, "gemini-1.5-flash:generateContent");
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], "Describe this place");
    assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
    assert!(!parts[1]["inlineData"]["data"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_api_error_becomes_failure_result() {
    let (base_url, _recorded) = start_stub().await;
    let gateway = ModelGateway::new(Arc::new(client(&base_url, "wrong_test_key")));
    let request = PromptTemplateSet::build(
        SectionId::TransportGuide,
        &UserInput::default().with_destination("Goa"),
    )
    .unwrap();

    match gateway.complete_text(&request).await {
        ModelResult::Failure(reason) => {
            assert!(reason.contains("400"));
            assert!(reason.contains("API key not valid"));
        }
        ModelResult::Success(text) => panic!("expected failure, got {text}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_becomes_failure_result() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = ModelGateway::new(Arc::new(client(
        &format!("http://{addr}/v1beta"),
        "SECRETKEY12345",
    )));
    let request = PromptTemplateSet::build(
        SectionId::LocationFinder,
        &UserInput::default().with_image(ImageUpload::new(common::png_bytes(), None)),
    )
    .unwrap();

    let result = gateway.complete_vision(&request).await;
    assert!(matches!(result, ModelResult::Failure(ref reason) if !reason.is_empty()));
    assert!(result.display_text().starts_with("Error: "));
    assert!(!result.display_text().contains("SECRETKEY12345"));
}

#[tokio::test]
async fn test_transport_failure_never_reveals_api_key() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let router = SectionRouter::new(ModelGateway::new(Arc::new(client(
        &format!("http://{addr}/v1beta"),
        "SECRETKEY12345",
    ))));
    let response = router
        .handle(
            SectionId::TransportGuide,
            &UserInput::default().with_destination("Goa"),
        )
        .await
        .unwrap();

    let text = response.result.display_text();
    assert!(!response.result.is_success());
    assert!(text.starts_with("Error: "));
    assert!(!text.contains("SECRETKEY12345"), "key leaked: {text}");
}
