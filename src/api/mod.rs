use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument};

use crate::{
    WanderlustError,
    generation::GenerationClient,
    metrics::{GenerationOutcome, Metrics, track_requests},
    models::{COUNTRIES, Month, POPULAR_DESTINATIONS, TripParameters},
    prompt::build_prompt,
    sanitize::sanitize,
};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn GenerationClient>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(client: Arc<dyn GenerationClient>, metrics: Arc<Metrics>) -> Self {
        Self { client, metrics }
    }
}

/// Either a ready-made prompt or the trip to build one from
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GenerateRequest {
    Prompt { prompt: String },
    Trip(TripParameters),
}

impl GenerateRequest {
    fn into_prompt(self) -> String {
        match self {
            GenerateRequest::Prompt { prompt } => prompt,
            GenerateRequest::Trip(params) => build_prompt(&params),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Reply text exactly as generated
    pub output: String,
    /// Cleaned reply reduced to allow-listed markup
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub months: Vec<&'static str>,
    pub popular_destinations: &'static [&'static str],
    pub countries: &'static [&'static str],
    pub defaults: TripParameters,
}

impl IntoResponse for WanderlustError {
    fn into_response(self) -> Response {
        let status = match &self {
            WanderlustError::Validation { .. } => StatusCode::BAD_REQUEST,
            WanderlustError::GenerationInProgress => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let tracked = Router::new()
        .route("/generate", post(generate))
        .route("/options", get(options))
        .route_layer(middleware::from_fn_with_state(state.clone(), track_requests));

    // Scrapes are not counted as app requests
    Router::new()
        .merge(tracked)
        .route("/metrics", get(metrics))
        .with_state(state)
}

#[instrument(skip_all)]
async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, WanderlustError> {
    let prompt = request.into_prompt();
    debug!("API: {}", prompt);

    match state.client.generate(&prompt).await {
        Ok(output) => {
            state.metrics.record_generation(GenerationOutcome::Success);
            let html = sanitize(&output);
            Ok(Json(GenerateResponse { output, html }))
        }
        Err(e) => {
            state.metrics.record_generation(GenerationOutcome::Failure);
            error!("Error generating content: {}", e);
            Err(e.into())
        }
    }
}

async fn metrics(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let body = state.metrics.render().map_err(|e| {
        error!("Failed to encode metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

async fn options() -> Json<FormOptions> {
    Json(FormOptions {
        months: Month::ALL.iter().map(Month::label).collect(),
        popular_destinations: &POPULAR_DESTINATIONS,
        countries: COUNTRIES,
        defaults: TripParameters::default(),
    })
}
