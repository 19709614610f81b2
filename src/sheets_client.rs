use crate::errors::AppError;
use crate::models::{SheetsApiResponse, SubmissionRecord};
use std::time::Duration;

/// Client for the spreadsheet-recording API.
///
/// One JSON POST per submission; no queuing and no retries. The request
/// timeout is explicit so a hung endpoint cannot block a submission forever.
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    endpoint_url: String,
}

impl SheetsClient {
    pub fn new(endpoint_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create sheets client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint_url,
        })
    }

    /// Sends one submission record.
    ///
    /// HTTP success plus `success: true` in the body is the only success
    /// path. A reachable endpoint that answers anything else becomes
    /// `SubmissionRejected` carrying the server-reported message; transport
    /// and decoding faults become `ExternalApiError`.
    pub async fn record_calculation(
        &self,
        record: &SubmissionRecord,
    ) -> Result<SheetsApiResponse, AppError> {
        tracing::info!(
            "Recording calculation for '{}' at {}",
            record.nome_beneficiario,
            self.endpoint_url
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .header("Content-Type", "application/json")
            .json(record)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Sheets API request failed: {}", e))
            })?;

        let status = response.status();
        let body: SheetsApiResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse sheets API response: {}", e))
        })?;

        if status.is_success() && body.success {
            tracing::info!("✓ Calculation recorded in spreadsheet");
            Ok(body)
        } else {
            let message = body
                .error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::error!("Sheets API rejected submission ({}): {}", status, message);
            Err(AppError::SubmissionRejected(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = SheetsClient::new(
            "https://example.com/api/registrar".to_string(),
            Duration::from_secs(30),
        );
        assert!(client.is_ok());
    }
}
