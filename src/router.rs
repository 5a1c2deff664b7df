use crate::config::Config;
use crate::decoder;
use crate::models::{AnalysisResult, ErrorDetail, ErrorResponse, ImageSubmission};
use crate::request_id;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{Span, debug, info, warn};

pub fn build_router(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let body_limit = match config.server.max_body_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    let app = Router::new()
        .route("/pddd/analyze", post(analyze))
        .route("/health", get(|| async { "OK" }))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http().make_span_with(request_id::make_request_span))
        .layer(request_id::propagate_layer())
        .layer(request_id::set_layer())
        .layer(config.cors.layer()?)
        .with_state(state);
    Ok(app)
}

#[axum_macros::debug_handler]
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<ImageSubmission>, JsonRejection>,
) -> Response {
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            info!("Rejected analysis request: {}", rejection.body_text());
            let error_response = ErrorResponse {
                error: ErrorDetail {
                    message: rejection.body_text(),
                    r#type: "invalid_request_error".to_string(),
                    code: Some("invalid_body".to_string()),
                },
            };
            return (rejection.status(), Json(error_response)).into_response();
        }
    };

    debug!(
        "Analysis request: mime_type={}, payload_len={}",
        submission.mime_type,
        submission.data.len()
    );

    // decode + classify are CPU bound
    let span = Span::current();
    let result = tokio::task::spawn_blocking(move || {
        span.in_scope(|| run_analysis(&state, &submission))
    })
    .await
    .unwrap_or_else(|e| {
        warn!("Analysis task failed: {}", e);
        AnalysisResult::unknown()
    });

    Json(result).into_response()
}

/// Decode failures are not surfaced to the caller; they yield the default verdict.
pub fn run_analysis(state: &AppState, submission: &ImageSubmission) -> AnalysisResult {
    let image = match decoder::decode_image(submission) {
        Ok(image) => image,
        Err(e) => {
            warn!("Failed to decode image for PDDD: {}", e);
            return AnalysisResult::unknown();
        }
    };

    let result = state.classifier.classify(&image);
    info!(
        "Classifier {} -> {} ({:.2}, {:?})",
        state.classifier.name(),
        result.disease_name,
        result.disease_confidence,
        result.health_status
    );
    result
}
