//! REST API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use diaclass_core::{ApiConfig, Decision, DiaclassError, ModelMetadata, PatientProfile};
use diaclass_engine::InferenceEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

/// Application state shared across handlers
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
}

/// Create the API router
pub fn create_router(engine: Arc<InferenceEngine>, config: &ApiConfig) -> Router {
    let state = Arc::new(AppState { engine });

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metadata", get(get_metadata))
        .route("/predict", post(make_prediction))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors_enabled {
        router.layer(cors_layer(&config.cors_origins))
    } else {
        router
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Error body, `{"detail": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

/// Map an engine error onto an HTTP status
fn error_response(err: DiaclassError) -> ApiError {
    let status = match &err {
        DiaclassError::MissingFeature(_) | DiaclassError::InvalidFeature(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        e if e.is_bundle_error() => StatusCode::SERVICE_UNAVAILABLE,
        DiaclassError::Io(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, err.to_string())
}

/// Welcome message
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Diabetes Classification API. See /metadata for the required features."
    }))
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Liveness probe; always 200, the body carries the verdict
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let healthy = state.engine.is_healthy().await;

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        model_loaded: healthy,
        loaded_at: state.engine.store().loaded_at(),
    })
}

/// Model name, version, threshold and required features
async fn get_metadata(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelMetadata>, ApiError> {
    let metadata = state.engine.metadata().await.map_err(error_response)?;
    Ok(Json(metadata))
}

/// Diabetes risk prediction
async fn make_prediction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PatientProfile>, JsonRejection>,
) -> Result<Json<Decision>, ApiError> {
    let Json(profile) = payload.map_err(|rejection| {
        api_error(rejection.status(), rejection.body_text())
    })?;

    let request_id = Uuid::new_v4();
    match state.engine.predict(&profile).await {
        Ok(decision) => {
            info!(
                request_id = %request_id,
                prediction = %decision.prediction,
                probability = decision.probability,
                "Prediction served"
            );
            Ok(Json(decision))
        }
        Err(DiaclassError::ScoringFailed(reason)) => {
            warn!(request_id = %request_id, error = %reason, "Prediction error");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while processing the prediction.",
            ))
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Prediction error");
            Err(error_response(e))
        }
    }
}
