//! Endpoint wrappers, one `impl ApiClient` block per backend area.

pub mod claims;
pub mod masters;
pub mod users;

use tracing::info;

use crate::client::ApiClient;
use crate::dashboard::{DashboardSummary, summarize};
use crate::error::Result;
use crate::models::{ClaimRecord, FraudClaimItem};

/// Everything the dashboard needs, fetched together.
#[derive(Debug, Clone)]
pub struct DashboardInputs {
    pub claims: Vec<ClaimRecord>,
    pub fraud_items: Vec<FraudClaimItem>,
}

impl DashboardInputs {
    pub fn summarize(&self) -> DashboardSummary {
        summarize(&self.claims, &self.fraud_items)
    }
}

/// Fetch claims and fraud-flagged claims concurrently. If either request
/// fails the whole load fails.
pub async fn fetch_dashboard_inputs(client: &ApiClient) -> Result<DashboardInputs> {
    let (claims, fraud_items) = tokio::try_join!(client.list_claims(), client.list_fraud_claims())?;
    info!(
        claim_count = claims.len(),
        fraud_count = fraud_items.len(),
        "Dashboard inputs loaded"
    );
    Ok(DashboardInputs {
        claims,
        fraud_items,
    })
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;
    use crate::client::test_support::client_for;
    use crate::error::ConsoleError;

    #[tokio::test]
    async fn dashboard_join_succeeds_when_both_succeed() {
        let router = Router::new()
            .route(
                "/api/fnol/",
                get(|| async {
                    Json(json!([
                        { "id": 1, "status": "Closed Damage Detection", "claim_amount": 1000 },
                        { "id": 2, "status": "Open", "estimated_amount": "250" }
                    ]))
                }),
            )
            .route(
                "/api/fraud-claims/",
                get(|| async {
                    Json(json!([
                        { "complaint_id": "CLM-2", "riskScore": 80, "status": "under_review", "amount": 250 }
                    ]))
                }),
            );
        let client = client_for(router).await;

        let inputs = fetch_dashboard_inputs(&client).await.unwrap();
        let summary = inputs.summarize();
        assert_eq!(summary.total_claims, 2);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.total_settlement, 1250.0);
        assert_eq!(summary.stp_rate, 50);
        assert_eq!(summary.automation_rate, 100);
        assert_eq!(summary.fraud_flagged, 1);
    }

    #[tokio::test]
    async fn dashboard_join_fails_if_either_side_fails() {
        let router = Router::new()
            .route("/api/fnol/", get(|| async { Json(json!([])) }))
            .route(
                "/api/fraud-claims/",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" }))) }),
            );
        let client = client_for(router).await;

        let err = fetch_dashboard_inputs(&client).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Api { status: 500, .. }));
        assert_eq!(err.user_message(), "boom");
    }
}
