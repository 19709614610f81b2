use serde::Deserialize;

/// Production spreadsheet-recording endpoint, overridable via `SHEETS_API_URL`.
pub const DEFAULT_SHEETS_API_URL: &str =
    "https://api-calculadoras-sheets.vercel.app/api/registrar-calculo-sma";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub sheets_api_url: String,
    pub sheets_timeout_secs: u64,
    pub template_path: String,
    pub session_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            sheets_api_url: {
                let url = std::env::var("SHEETS_API_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.to_string());
                let parsed = url::Url::parse(&url)
                    .map_err(|_| anyhow::anyhow!("SHEETS_API_URL must be a valid URL"))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    anyhow::bail!("SHEETS_API_URL must use http:// or https://");
                }
                url
            },
            sheets_timeout_secs: std::env::var("SHEETS_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SHEETS_TIMEOUT_SECS must be a number of seconds"))?,
            template_path: std::env::var("TEMPLATE_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "print-template.html".to_string()),
            session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SESSION_TTL_SECS must be a number of seconds"))?,
        };

        // Log successful configuration load
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Sheets API URL: {}", config.sheets_api_url);
        tracing::debug!("Sheets timeout: {}s", config.sheets_timeout_secs);
        tracing::debug!("Template path: {}", config.template_path);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
