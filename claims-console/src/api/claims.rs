use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    ClaimEvaluation, ClaimRecord, FnolEnvelope, FnolPayload, FraudClaimItem, ProcessClaimResponse,
    SaveFnolResponse,
};

impl ApiClient {
    pub async fn list_claims(&self) -> Result<Vec<ClaimRecord>> {
        let claims: Vec<ClaimRecord> = self.get_list("/fnol/").await?;
        info!(claim_count = claims.len(), "Fetched claims");
        Ok(claims)
    }

    pub async fn get_claim(&self, id: &str) -> Result<ClaimRecord> {
        self.get_json(&format!("/fnol/{id}/")).await
    }

    /// Persist an intake payload without running the assessment.
    pub async fn save_fnol(&self, payload: &FnolPayload) -> Result<SaveFnolResponse> {
        let saved: SaveFnolResponse = self
            .post_json("/save-fnol/", &FnolEnvelope { fnol: payload })
            .await?;
        info!(claim_id = %payload.claim_id, id = %saved.id, "Saved FNOL");
        Ok(saved)
    }

    /// Run the backend assessment pipeline on an intake payload.
    pub async fn process_claim(&self, payload: &FnolPayload) -> Result<ProcessClaimResponse> {
        let outcome: ProcessClaimResponse = self
            .post_json("/process-claim/", &FnolEnvelope { fnol: payload })
            .await?;
        info!(
            claim_id = %payload.claim_id,
            decision = outcome.decision.as_deref().unwrap_or("-"),
            "Processed claim"
        );
        Ok(outcome)
    }

    pub async fn list_fraud_claims(&self) -> Result<Vec<FraudClaimItem>> {
        let items: Vec<FraudClaimItem> = self.get_list("/fraud-claims/").await?;
        info!(fraud_count = items.len(), "Fetched fraud-flagged claims");
        Ok(items)
    }

    pub async fn get_claim_evaluation(&self, complaint_id: &str) -> Result<ClaimEvaluation> {
        self.get_json(&format!("/fnol/{complaint_id}/evaluation/")).await
    }

    /// Re-run validation for an existing claim; the backend stores the
    /// evaluation and updates the claim status.
    pub async fn run_fraud_detection(&self, complaint_id: &str) -> Result<ProcessClaimResponse> {
        self.post_empty(&format!("/fnol/{complaint_id}/run-fraud-detection/"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::Path,
        routing::{get, post},
    };
    use serde_json::{Value, json};

    use crate::client::test_support::client_for;
    use crate::models::FnolPayload;

    #[tokio::test]
    async fn claim_endpoints_decode_backend_shapes() {
        let router = Router::new()
            .route(
                "/api/fnol/",
                get(|| async {
                    Json(json!([
                        { "id": 1, "complaint_id": "CLM-1", "status": "Open", "raw_response": null },
                        { "id": "2", "estimated_amount": "1500.00" }
                    ]))
                }),
            )
            .route(
                "/api/fnol/{id}/",
                get(|Path(id): Path<String>| async move {
                    Json(json!({ "id": id, "complaint_id": "CLM-7" }))
                }),
            )
            .route(
                "/api/fnol/{id}/run-fraud-detection/",
                post(|Path(id): Path<String>| async move {
                    Json(json!({ "claim_id": id, "decision": "MANUAL_REVIEW", "threshold": 0.6 }))
                }),
            );
        let client = client_for(router).await;

        let claims = client.list_claims().await.unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[1].estimated_amount, Some(1500.0));

        let claim = client.get_claim("7").await.unwrap();
        assert_eq!(claim.id, "7");

        let outcome = client.run_fraud_detection("CLM-7").await.unwrap();
        assert_eq!(outcome.claim_id.as_deref(), Some("CLM-7"));
        assert_eq!(outcome.threshold, Some(0.6));
    }

    #[tokio::test]
    async fn intake_posts_wrapped_payload() {
        let router = Router::new().route(
            "/api/save-fnol/",
            post(|Json(body): Json<Value>| async move {
                let claim_id = body["fnol"]["claim_id"].as_str().unwrap_or_default().to_string();
                Json(json!({ "message": format!("Saved {claim_id}"), "id": 41 }))
            }),
        );
        let client = client_for(router).await;

        let payload = FnolPayload {
            claim_id: "CLM-2024-0001".into(),
            ..FnolPayload::default()
        };
        let saved = client.save_fnol(&payload).await.unwrap();
        assert_eq!(saved.id, "41");
        assert_eq!(saved.message, "Saved CLM-2024-0001");
    }
}
