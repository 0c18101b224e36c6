use crate::error::{ServerError, ServerResult};
use crate::middleware::RequestId;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use codesim::{Language, RawSourceFile, Report};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Batch comparison request
///
/// ```json
/// {
///   "files": [
///     { "filename": "a.py", "content": "print(1)", "language": "py" },
///     { "filename": "b.py", "content": [112, 114, 105, 110, 116], "language": "py" }
///   ]
/// }
/// ```
///
/// `content` is either a string or an array of raw bytes.
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportRequest {
    pub files: Vec<RawSourceFile>,
}

/// Supported language tags
#[derive(Debug, Deserialize, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<String>,
}

/// List the language tags a batch may use.
pub async fn list_languages() -> impl IntoResponse {
    Json(LanguagesResponse {
        languages: Language::ALL.iter().map(|l| l.tag().to_string()).collect(),
    })
}

/// Compare every pair of submitted files and return the ranked report.
///
/// The batch runs on the blocking pool: tokenization and scoring are CPU
/// bound and the embedding provider may block on HTTP.
pub async fn create_report(
    State(state): State<Arc<ServerState>>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> ServerResult<Json<Report>> {
    let Json(request) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(state.config.max_body_size_mb)
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    })?;

    let request_id = request_id.map(|Extension(id)| id.0).unwrap_or_default();
    let file_count = request.files.len();
    let start = Instant::now();

    let engine = Arc::clone(&state.engine);
    let report = tokio::task::spawn_blocking(move || engine.run(request.files)).await??;

    tracing::info!(
        request_id = %request_id,
        file_count,
        comparison_count = report.comparison_count,
        elapsed_ms = start.elapsed().as_millis(),
        "report_created"
    );

    Ok(Json(report))
}
