//! Per-session "last calculation" cache.
//!
//! The calculator page kept its last form/result pair in page-global state
//! so a counter-offer could be re-submitted without recomputation. Here that
//! becomes an explicit TTL cache keyed by session id; `None` is the unset
//! state a caller must handle before the first calculation.

use crate::models::{CalculationResult, ClaimForm};
use moka::future::Cache;
use std::time::Duration;

/// Session id used when the page does not send an `x-session-id` header.
pub const DEFAULT_SESSION: &str = "default";

/// Last submitted calculation for one session.
#[derive(Debug, Clone)]
pub struct StoredCalculation {
    pub form: ClaimForm,
    pub result: CalculationResult,
}

#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, StoredCalculation>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(10_000)
                .build(),
        }
    }

    pub async fn remember(&self, session_id: &str, form: ClaimForm, result: CalculationResult) {
        self.cache
            .insert(session_id.to_string(), StoredCalculation { form, result })
            .await;
    }

    pub async fn last(&self, session_id: &str) -> Option<StoredCalculation> {
        self.cache.get(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remembers_last_calculation_per_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let form = ClaimForm {
            beneficiary_name: "Ana".to_string(),
            ..Default::default()
        };

        store
            .remember("abc", form.clone(), CalculationResult::default())
            .await;

        let stored = store.last("abc").await.expect("stored calculation");
        assert_eq!(stored.form.beneficiary_name, "Ana");
        assert!(store.last("other").await.is_none());
    }

    #[tokio::test]
    async fn later_calculation_overwrites_earlier_one() {
        let store = SessionStore::new(Duration::from_secs(60));
        let first = ClaimForm {
            beneficiary_name: "Primeira".to_string(),
            ..Default::default()
        };
        let second = ClaimForm {
            beneficiary_name: "Segunda".to_string(),
            ..Default::default()
        };

        store.remember("abc", first, CalculationResult::default()).await;
        store.remember("abc", second, CalculationResult::default()).await;

        let stored = store.last("abc").await.expect("stored calculation");
        assert_eq!(stored.form.beneficiary_name, "Segunda");
    }
}
