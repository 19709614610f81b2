//! Print template loaded once at startup.
//!
//! The template is a best-effort co-located asset; a missing file degrades
//! the report endpoint instead of preventing startup, and the readiness
//! state is reported so callers can detect the degraded mode.

/// Readiness of the print template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateState {
    Ready,
    Missing,
}

#[derive(Debug, Clone)]
pub struct TemplateStore {
    html: Option<String>,
}

impl TemplateStore {
    /// Reads the template from `path`. Load failure is logged and leaves the
    /// store in the `Missing` state.
    pub async fn load(path: &str) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(html) => {
                tracing::info!("Print template loaded from {} ({} bytes)", path, html.len());
                Self { html: Some(html) }
            }
            Err(e) => {
                tracing::warn!("Failed to load print template from {}: {}", path, e);
                Self { html: None }
            }
        }
    }

    /// Builds a ready store from in-memory HTML.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
        }
    }

    pub fn state(&self) -> TemplateState {
        if self.html.is_some() {
            TemplateState::Ready
        } else {
            TemplateState::Missing
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == TemplateState::Ready
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reports_missing_state() {
        let store = TemplateStore::load("does-not-exist.html").await;
        assert_eq!(store.state(), TemplateState::Missing);
        assert!(store.html().is_none());
    }

    #[test]
    fn in_memory_template_is_ready() {
        let store = TemplateStore::from_html("<html>{{NOME_BENEFICIARIO}}</html>");
        assert!(store.is_ready());
        assert!(store.html().unwrap().contains("{{NOME_BENEFICIARIO}}"));
    }
}
