use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::{Html, Json},
    routing::{get, post},
};
use intake_flow::{
    InMemorySessionStorage, InterviewRunner, ModelClient, ReportOutcome,
    transcript::opening_question,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::{
    config::ServiceConfig,
    llm::OpenRouterModelClient,
    models::{
        ContinueInterviewRequest, ContinueInterviewResponse, StartInterviewRequest,
        StartInterviewResponse,
    },
};

const INDEX_HTML: &str = include_str!("../static/index.html");

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    warn!(status = %rejection.status(), error = %rejection.body_text(), "Rejected request body");
    bad_request_error(&rejection.body_text())
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<InterviewRunner>,
}

impl AppState {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        let session_storage = Arc::new(InMemorySessionStorage::new());
        Self {
            runner: Arc::new(InterviewRunner::new(model, session_storage)),
        }
    }
}

pub fn create_app(config: &ServiceConfig) -> Router {
    info!(model = %config.model, "Using OpenRouter model client");
    let model = Arc::new(OpenRouterModelClient::new(
        &config.openrouter_api_key,
        config.model.clone(),
    ));
    build_router(AppState::new(model))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/start_interview", post(start_interview))
        .route("/continue_interview", post(continue_interview))
        .route("/get_report", get(get_report))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag every request with a correlation id and run it inside a span carrying it
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn start_interview(
    State(state): State<AppState>,
    request: Result<Json<StartInterviewRequest>, JsonRejection>,
) -> ApiResult<StartInterviewResponse> {
    let Json(request) = request.map_err(rejection_error)?;
    info!("Starting new interview");

    let session = state
        .runner
        .start(&request.initial_symptom)
        .await
        .map_err(|e| {
            if e.is_client_error() {
                bad_request_error(&e.to_string())
            } else {
                error!(error = %e, "Error starting interview");
                internal_error(&format!("An unexpected error occurred: {}", e))
            }
        })?;

    Ok(Json(StartInterviewResponse {
        interview_id: session.id,
        initial_question: opening_question(&session.initial_symptom),
        history: session.turns().to_vec(),
    }))
}

async fn continue_interview(
    State(state): State<AppState>,
    request: Result<Json<ContinueInterviewRequest>, JsonRejection>,
) -> ApiResult<ContinueInterviewResponse> {
    let Json(request) = request.map_err(rejection_error)?;
    info!(
        response_length = request.user_response.len(),
        "Continuing interview"
    );

    match state.runner.continue_interview(&request.user_response).await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(e) if e.is_client_error() => {
            warn!(error = %e, "Rejected continue request");
            Err(bad_request_error(&e.to_string()))
        }
        Err(e) => {
            error!(error = %e, "Error continuing interview");
            state.runner.force_complete().await;
            Err(internal_error(&format!(
                "An unexpected error occurred during the interview process: {}",
                e
            )))
        }
    }
}

async fn get_report(State(state): State<AppState>) -> ApiResult<ReportOutcome> {
    match state.runner.report().await {
        Ok(report) => Ok(Json(report)),
        Err(e) if e.is_client_error() => Err(bad_request_error(&e.to_string())),
        Err(e) => {
            error!(error = %e, "Error generating report");
            Err(internal_error(&format!("An unexpected error occurred: {}", e)))
        }
    }
}
