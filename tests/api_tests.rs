//! HTTP surface tests, driven in-process with `oneshot`

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tripbot::TripBotConfig;
use tripbot::web;

use common::{MockModel, png_bytes, router_with};

const BOUNDARY: &str = "tripbot-test-boundary";

enum FormPart<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, Vec<u8>),
}

fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            FormPart::File(name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn app(model: Arc<MockModel>) -> Router {
    web::app(router_with(model), &TripBotConfig::default())
}

async fn post_form(app: Router, slug: &str, parts: &[FormPart<'_>]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/sections/{slug}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_list_sections() {
    let response = app(Arc::new(MockModel::default()))
        .oneshot(
            Request::builder()
                .uri("/api/sections")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let sections: Value = serde_json::from_slice(&bytes).unwrap();
    let sections = sections.as_array().unwrap();
    assert_eq!(sections.len(), 5);
    assert_eq!(sections[0]["slug"], "location-finder");
    assert_eq!(sections[0]["fields"][0], "image");
    assert_eq!(sections[4]["label"], "Restaurant & Hotel Planner");
}

#[tokio::test]
async fn test_index_page_is_served() {
    let response = app(Arc::new(MockModel::default()))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("TripBot AI"));
}

#[tokio::test]
async fn test_transport_answer_with_links() {
    let model = Arc::new(MockModel::default());
    let (status, body) = post_form(
        app(model.clone()),
        "transport-guide",
        &[FormPart::Text("destination", "Jaipur")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["heading"], "Transport Guide");
    assert!(body["text"].as_str().unwrap().contains("reaching Jaipur"));
    assert_eq!(body["links"].as_array().unwrap().len(), 4);
    assert_eq!(body["links_title"], "Direct Booking Links");
    assert_eq!(model.text_calls(), 1);
}

#[tokio::test]
async fn test_trip_planner_dates() {
    let model = Arc::new(MockModel::default());
    let (status, body) = post_form(
        app(model.clone()),
        "trip-planner",
        &[
            FormPart::Text("start_date", "2024-01-01"),
            FormPart::Text("end_date", "2024-01-05"),
            FormPart::Text("destination", "Goa, 5 days"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("from 2024-01-01 to 2024-01-05"));
}

#[tokio::test]
async fn test_location_finder_with_image() {
    let model = Arc::new(MockModel::default());
    let (status, body) = post_form(
        app(model.clone()),
        "location-finder",
        &[FormPart::File("image", "image/png", png_bytes())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["heading"], "Tour Bot");
    assert_eq!(body["text"], "vision answer for a 4x3 picture");
    assert_eq!(model.vision_calls(), 1);
}

#[tokio::test]
async fn test_missing_image_is_bad_request() {
    let model = Arc::new(MockModel::default());
    let (status, body) = post_form(app(model.clone()), "location-finder", &[]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failure");
    assert!(body["text"].as_str().unwrap().starts_with("Error: "));
    assert_eq!(model.total_calls(), 0);
}

#[tokio::test]
async fn test_negative_budget_is_unprocessable() {
    let model = Arc::new(MockModel::default());
    let (status, body) = post_form(
        app(model.clone()),
        "budget-planner",
        &[
            FormPart::Text("budget", "-5"),
            FormPart::Text("destination", "Goa"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["section"], "budget-planner");
    assert_eq!(model.total_calls(), 0);
}

#[tokio::test]
async fn test_malformed_date_is_unprocessable() {
    let (status, body) = post_form(
        app(Arc::new(MockModel::default())),
        "trip-planner",
        &[FormPart::Text("start_date", "next tuesday")],
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["text"].as_str().unwrap().contains("start_date"));
}

#[tokio::test]
async fn test_unknown_section_is_not_found() {
    let (status, body) = post_form(app(Arc::new(MockModel::default())), "weather", &[]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "failure");
}

#[tokio::test]
async fn test_remote_failure_is_rendered_as_text() {
    let model = Arc::new(MockModel::failing("API key not valid"));
    let (status, body) = post_form(
        app(model),
        "accommodation-planner",
        &[FormPart::Text("destination", "Udaipur")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failure");
    assert_eq!(body["text"], "Error: API key not valid");
    assert_eq!(body["links"].as_array().unwrap().len(), 2);
}
