use crate::errors::{AppError, ResultExt};
use crate::models::{ClaimForm, CounterOfferRequest, SubmissionOutcome, SubmissionRequest};
use crate::report;
use crate::session::{SessionStore, DEFAULT_SESSION};
use crate::sheets_client::SheetsClient;
use crate::submission::SubmissionService;
use crate::template::TemplateStore;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the spreadsheet-recording API.
    pub sheets_client: SheetsClient,
    /// Per-session last-calculation cache.
    pub sessions: SessionStore,
    /// Print template loaded at startup.
    pub template: TemplateStore,
}

/// Health check endpoint.
///
/// Reports service status and whether the print template loaded.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-sma-api",
            "version": "0.1.0",
            "template_ready": state.template.is_ready(),
        })),
    )
}

/// Session id from the `x-session-id` header; the single-user page may omit
/// it entirely.
fn session_id(headers: &HeaderMap) -> String {
    headers
        .get("x-session-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

/// POST /api/v1/options
///
/// Computes the three settlement options for a claim form. Pure; nothing is
/// cached or submitted.
pub async fn compute_options(Json(form): Json<ClaimForm>) -> Json<report::SettlementOptions> {
    tracing::info!("POST /options - beneficiary: '{}'", form.beneficiary_name);
    Json(report::compute_options(&form))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    /// When set, the response carries a download disposition with the
    /// `Relatorio_SMA_<name>.html` filename.
    #[serde(default)]
    pub download: bool,
}

/// POST /api/v1/report
///
/// Renders the printable report for a claim form. Returns 503 while the
/// print template is missing, so rendering before readiness is detectable
/// instead of silently producing an empty document.
pub async fn render_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
    Json(form): Json<ClaimForm>,
) -> Result<Response, AppError> {
    tracing::info!(
        "POST /report - beneficiary: '{}', download: {}",
        form.beneficiary_name,
        params.download
    );

    let Some(template) = state.template.html() else {
        return Err(AppError::TemplateUnavailable);
    };

    let options = report::compute_options(&form);
    let document = report::render_report(&form, &options, template);

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8");
    if params.download {
        let file_name = report::report_file_name(&form.beneficiary_name);
        // Header values are latin-1; non-ASCII characters in the name become
        // underscores here, the pure filename helper keeps them.
        let ascii_name: String = file_name
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ascii_name),
        );
    }

    builder
        .body(axum::body::Body::from(document))
        .map_err(|e| AppError::InternalError(format!("Failed to build report response: {}", e)))
}

/// POST /api/v1/calculations
///
/// Submits a calculation summary to the spreadsheet API and remembers the
/// form/result pair for later counter-offer revisions.
pub async fn submit_calculation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SubmissionRequest>,
) -> Result<Json<SubmissionOutcome>, AppError> {
    let session = session_id(&headers);
    tracing::info!("POST /calculations - session: {}", session);

    let service = SubmissionService::new(state.sheets_client.clone(), state.sessions.clone());
    let outcome = service
        .submit(&session, request.form, request.result, request.counter_offer)
        .await
        .context("recording calculation in spreadsheet")?;

    Ok(Json(outcome))
}

/// POST /api/v1/calculations/counter-offer
///
/// Re-submits the session's last calculation with a revised counter-offer.
/// Returns 409 when the session has no prior calculation; no network call is
/// made in that case.
pub async fn submit_counter_offer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CounterOfferRequest>,
) -> Result<Json<SubmissionOutcome>, AppError> {
    let session = session_id(&headers);
    tracing::info!(
        "POST /calculations/counter-offer - session: {}, value: {}",
        session,
        request.counter_offer
    );

    let service = SubmissionService::new(state.sheets_client.clone(), state.sessions.clone());
    let outcome = service
        .resubmit_with_counter_offer(&session, request.counter_offer)
        .await?;

    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_id_defaults_when_header_absent() {
        let headers = HeaderMap::new();
        assert_eq!(session_id(&headers), DEFAULT_SESSION);
    }

    #[test]
    fn session_id_reads_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-session-id", HeaderValue::from_static("abc-123"));
        assert_eq!(session_id(&headers), "abc-123");
    }

    #[test]
    fn blank_session_header_falls_back_to_default() {
        let mut headers = HeaderMap::new();
        headers.insert("x-session-id", HeaderValue::from_static("   "));
        assert_eq!(session_id(&headers), DEFAULT_SESSION);
    }
}
