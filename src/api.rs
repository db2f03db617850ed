//! JSON API for the single-page form
//!
//! `POST /api/sections/{slug}` takes the section's form as multipart data
//! and returns the model's answer plus any booking links. Every failure
//! still carries displayable text starting with `Error: `.

use axum::{
    Router,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::TripBotError;
use crate::gateway::ModelResult;
use crate::models::{AuxLink, ImageUpload, InputField, SectionId, UserInput};
use crate::router::{SectionResponse, SectionRouter};

#[derive(Clone)]
pub struct AppState {
    pub router: SectionRouter,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSection {
    pub slug: String,
    pub label: String,
    pub heading: String,
    pub action_label: String,
    pub fields: Vec<InputField>,
    pub links_title: Option<String>,
    pub links: Vec<ApiLink>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Success,
    Failure,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiAnswer {
    pub section: Option<String>,
    pub heading: Option<String>,
    pub status: AnswerStatus,
    pub text: String,
    pub links_title: Option<String>,
    pub links: Vec<ApiLink>,
}

impl From<&AuxLink> for ApiLink {
    fn from(link: &AuxLink) -> Self {
        Self {
            label: link.label.to_string(),
            url: link.url.to_string(),
        }
    }
}

impl From<SectionId> for ApiSection {
    fn from(section: SectionId) -> Self {
        Self {
            slug: section.slug().to_string(),
            label: section.label().to_string(),
            heading: section.heading().to_string(),
            action_label: section.action_label().to_string(),
            fields: section.fields().to_vec(),
            links_title: section.links_title().map(str::to_string),
            links: section.links().iter().map(ApiLink::from).collect(),
        }
    }
}

impl From<SectionResponse> for ApiAnswer {
    fn from(response: SectionResponse) -> Self {
        let status = match response.result {
            ModelResult::Success(_) => AnswerStatus::Success,
            ModelResult::Failure(_) => AnswerStatus::Failure,
        };
        Self {
            section: Some(response.section.slug().to_string()),
            heading: Some(response.section.heading().to_string()),
            status,
            text: response.result.display_text(),
            links_title: response.section.links_title().map(str::to_string),
            links: response.links.iter().map(ApiLink::from).collect(),
        }
    }
}

/// Errors raised before the model is asked anything
#[derive(Debug)]
pub enum ApiError {
    Domain {
        section: Option<SectionId>,
        error: TripBotError,
    },
    Multipart(MultipartError),
}

impl ApiError {
    fn for_section(section: SectionId) -> impl Fn(TripBotError) -> ApiError {
        move |error| ApiError::Domain {
            section: Some(section),
            error,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, section, message) = match self {
            ApiError::Domain { section, error } => {
                let status = match error {
                    TripBotError::InputMissing { .. } => StatusCode::BAD_REQUEST,
                    TripBotError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    TripBotError::ImpossibleState { .. } => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, section, error.user_message())
            }
            ApiError::Multipart(err) => (err.status(), None, err.body_text()),
        };

        warn!(%status, "Rejected request: {}", message);

        let body = ApiAnswer {
            section: section.map(|s| s.slug().to_string()),
            heading: section.map(|s| s.heading().to_string()),
            status: AnswerStatus::Failure,
            text: format!("Error: {message}"),
            links_title: None,
            links: Vec::new(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sections", get(get_sections))
        .route("/sections/{section}", post(ask_section))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn get_sections() -> Json<Vec<ApiSection>> {
    Json(SectionId::ALL.into_iter().map(ApiSection::from).collect())
}

async fn ask_section(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiAnswer>, ApiError> {
    let section = slug.parse::<SectionId>().map_err(|error| ApiError::Domain {
        section: None,
        error,
    })?;
    let input = read_form(multipart, section).await?;

    info!(section = %section, "Handling form submission");
    let response = state
        .router
        .handle(section, &input)
        .await
        .map_err(ApiError::for_section(section))?;

    Ok(Json(ApiAnswer::from(response)))
}

/// Collect the multipart form into `UserInput`; blank fields count as absent
async fn read_form(mut multipart: Multipart, section: SectionId) -> Result<UserInput, ApiError> {
    let mut input = UserInput::default();
    let invalid = ApiError::for_section(section);

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("destination") => input.destination = non_blank(field.text().await?),
            Some("start_date") => {
                input.start_date = non_blank(field.text().await?)
                    .map(|s| parse_date("start_date", &s))
                    .transpose()
                    .map_err(&invalid)?;
            }
            Some("end_date") => {
                input.end_date = non_blank(field.text().await?)
                    .map(|s| parse_date("end_date", &s))
                    .transpose()
                    .map_err(&invalid)?;
            }
            Some("budget") => {
                input.budget = non_blank(field.text().await?)
                    .map(|s| parse_budget(&s))
                    .transpose()
                    .map_err(&invalid)?;
            }
            Some("image") => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    input.image = Some(ImageUpload::new(bytes.to_vec(), content_type));
                }
            }
            other => {
                tracing::debug!("Ignoring unknown form field {:?}", other);
            }
        }
    }

    Ok(input)
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

fn parse_date(field: &str, value: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        TripBotError::invalid_input(format!("{field} must be a date like 2024-01-31"))
    })
}

fn parse_budget(value: &str) -> crate::Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| TripBotError::invalid_input(format!("budget '{value}' is not a number")))
}
