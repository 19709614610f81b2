use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Counter-offer resubmission attempted before any calculation was
    /// submitted in the session.
    NoPriorCalculation,
    /// The print template failed to load at startup.
    TemplateUnavailable,
    /// Transport or decoding fault while talking to an external API.
    ExternalApiError(String),
    /// The spreadsheet API answered but flagged the submission as failed.
    SubmissionRejected(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NoPriorCalculation => write!(f, "No prior calculation in session"),
            AppError::TemplateUnavailable => write!(f, "Print template unavailable"),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::SubmissionRejected(msg) => write!(f, "Submission rejected: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every body carries `success: false` plus a message, so the calculator
    /// page branches on it the same way it branches on the spreadsheet API's
    /// own responses.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NoPriorCalculation => {
                tracing::warn!("Counter-offer without a prior calculation");
                // Message shown verbatim on the page.
                (StatusCode::CONFLICT, "Faça um cálculo primeiro".to_string())
            }
            AppError::TemplateUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Print template not loaded".to_string(),
            ),
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::SubmissionRejected(msg) => {
                tracing::error!("Submission rejected: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                // Delegate to underlying error's response
                return source.clone().into_response();
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApiError(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_and_displays_chain() {
        let base: Result<(), AppError> = Err(AppError::ExternalApiError("timeout".to_string()));
        let wrapped = base.context("recording calculation");
        let message = wrapped.unwrap_err().to_string();
        assert!(message.starts_with("recording calculation:"));
        assert!(message.contains("timeout"));
    }

    #[test]
    fn no_prior_calculation_displays_without_payload() {
        assert_eq!(
            AppError::NoPriorCalculation.to_string(),
            "No prior calculation in session"
        );
    }
}
