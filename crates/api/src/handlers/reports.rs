//! Handlers for the `/reports` resource: PDF download and e-mail delivery.
//!
//! Both endpoints take a client-built [`ReportData`] snapshot. Store-backed
//! reports for a job are served by `GET /jobs/{id}/report`, which shares
//! [`render_report`] and [`pdf_response`] with these handlers.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use haulage_core::error::CoreError;
use haulage_core::recipients::validate_recipients;
use haulage_core::report::ReportData;
use haulage_report::GeneratedReport;
use serde::{Deserialize, Serialize};

use crate::delivery::email::ReportEmail;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /reports/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    #[serde(alias = "reportData")]
    pub report_data: Option<ReportData>,
}

/// Recipients and message text for `POST /reports/email`.
#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub recipients: Vec<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Request body for `POST /reports/email`.
#[derive(Debug, Deserialize)]
pub struct EmailReportRequest {
    #[serde(alias = "reportData")]
    pub report_data: Option<ReportData>,
    #[serde(alias = "emailConfig")]
    pub email_config: Option<EmailSettings>,
}

/// Outcome of a report e-mail.
#[derive(Debug, Serialize)]
pub struct EmailReportResponse {
    pub success: bool,
    pub message: &'static str,
    pub emails_sent: usize,
    pub filename: String,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Generate a report off the async reactor.
pub async fn render_report(state: &AppState, data: ReportData) -> AppResult<GeneratedReport> {
    let generator = state.reports.clone();
    let report = tokio::task::spawn_blocking(move || generator.generate(&data))
        .await
        .map_err(|e| AppError::InternalError(format!("Report task failed: {e}")))??;
    Ok(report)
}

/// A PDF download response with an attachment filename.
pub fn pdf_response(report: GeneratedReport) -> Response {
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.filename),
        ),
        (header::CONTENT_LENGTH, report.bytes.len().to_string()),
    ];
    (headers, report.bytes).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reports/generate
///
/// Render the supplied snapshot and return it as a PDF attachment.
pub async fn generate_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateReportRequest>,
) -> AppResult<Response> {
    let data = input.report_data.ok_or_else(|| {
        AppError::Core(CoreError::Validation("Report data is required".into()))
    })?;
    let report_type = data.report_type;

    let report = render_report(&state, data).await?;
    tracing::info!(
        user_id = auth.user_id,
        report_type = report_type.as_str(),
        filename = %report.filename,
        pages = report.page_count,
        "Report generated",
    );

    Ok(pdf_response(report))
}

/// POST /api/v1/reports/email
///
/// Validate recipients, render the report, and mail it as an attachment.
/// Any malformed address rejects the whole request before rendering.
pub async fn email_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EmailReportRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(data), Some(settings)) = (input.report_data, input.email_config) else {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid request data. Missing report data or email configuration.".into(),
        )));
    };
    let recipients = validate_recipients(&settings.recipients)?;

    let mailer = state.mailer.clone().ok_or_else(|| {
        AppError::InternalError("SMTP is not configured; report e-mail unavailable".into())
    })?;

    let report = render_report(&state, data).await?;
    let filename = report.filename.clone();

    let emails_sent = mailer
        .send(ReportEmail {
            recipients: &recipients,
            subject: settings.subject.as_deref(),
            message: settings.message.as_deref(),
            filename: &filename,
            pdf: report.bytes,
        })
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        emails_sent,
        filename = %filename,
        "Report e-mailed",
    );

    Ok(Json(EmailReportResponse {
        success: true,
        message: "Email sent successfully",
        emails_sent,
        filename,
    }))
}
