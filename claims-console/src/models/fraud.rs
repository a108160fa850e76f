use serde::{Deserialize, Serialize};

use super::{de_f64, de_id, de_opt_i64, de_vec_or_null};

/// Review state of a fraud-flagged claim as reported by `GET /fraud-claims/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudReviewStatus {
    UnderReview,
    Confirmed,
    Cleared,
    /// Anything the backend adds later is treated as still under review.
    #[serde(other)]
    Other,
}

impl FraudReviewStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FraudReviewStatus::Confirmed => "Business Validation Failed",
            FraudReviewStatus::Cleared => "Cleared",
            FraudReviewStatus::UnderReview | FraudReviewStatus::Other => "Under Review",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, FraudReviewStatus::Cleared)
    }
}

/// One claim that has been through fraud detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudClaimItem {
    #[serde(deserialize_with = "de_id")]
    pub complaint_id: String,
    #[serde(rename = "claimNumber", default)]
    pub claim_number: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(rename = "riskScore", default, deserialize_with = "de_f64")]
    pub risk_score: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "de_f64")]
    pub amount: f64,
    pub status: FraudReviewStatus,
    #[serde(rename = "detectedAt", default)]
    pub detected_at: Option<String>,
    #[serde(default, deserialize_with = "de_vec_or_null")]
    pub indicators: Vec<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub times_processed: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub re_open: Option<i64>,
    #[serde(default)]
    pub latest_claim_status: Option<String>,
}

impl FraudClaimItem {
    pub fn can_reopen(&self) -> bool {
        self.re_open == Some(1)
    }
}
