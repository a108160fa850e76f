use serde::{Deserialize, Serialize};

use super::{de_id, de_opt_f64, de_opt_flag, de_opt_i64, de_opt_string, de_vec_or_null};

/// A claim (FNOL) record as returned by `GET /fnol/` and `GET /fnol/:id/`.
///
/// Only `id` is guaranteed. Everything else may be missing depending on the
/// backend version, so the projector in [`crate::projection`] resolves each
/// display field through an explicit fallback chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub complaint_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub coverage_type: Option<String>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub policy_status: Option<String>,
    #[serde(default)]
    pub policy_holder_name: Option<String>,

    #[serde(default)]
    pub vehicle_make: Option<String>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub vehicle_year: Option<i64>,
    #[serde(default)]
    pub vehicle_registration_number: Option<String>,

    #[serde(default)]
    pub incident_type: Option<String>,
    #[serde(default)]
    pub incident_description: Option<String>,
    #[serde(default)]
    pub incident_date_time: Option<String>,

    #[serde(default, deserialize_with = "de_opt_f64")]
    pub estimated_amount: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub claim_amount: Option<f64>,

    #[serde(default)]
    pub llm_damages: Option<serde_json::Value>,
    #[serde(default)]
    pub llm_severity: Option<String>,
    #[serde(default, deserialize_with = "de_vec_or_null")]
    pub damage_photos: Vec<String>,

    #[serde(default)]
    pub raw_response: Option<RawSubmission>,

    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// The original intake form, echoed back by the backend.
///
/// Every section is independently optional and every field inside a section
/// is optional as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSubmission {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub claim_id: Option<String>,
    #[serde(default)]
    pub policy: Option<PolicySection>,
    #[serde(default)]
    pub vehicle: Option<VehicleSection>,
    #[serde(default)]
    pub incident: Option<IncidentSection>,
    #[serde(default)]
    pub claimant: Option<ClaimantSection>,
    #[serde(default)]
    pub documents: Option<DocumentSection>,
    #[serde(default)]
    pub history: Option<HistorySection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySection {
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub policy_status: Option<String>,
    #[serde(default)]
    pub coverage_type: Option<String>,
    #[serde(default)]
    pub policy_start_date: Option<String>,
    #[serde(default)]
    pub policy_end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleSection {
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub year: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentSection {
    #[serde(default)]
    pub date_time_of_loss: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub loss_description: Option<String>,
    #[serde(default)]
    pub claim_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub estimated_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimantSection {
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driving_license_number: Option<String>,
    #[serde(default)]
    pub license_valid_till: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    #[serde(default, deserialize_with = "de_opt_flag")]
    pub rc_copy_uploaded: Option<bool>,
    #[serde(default, deserialize_with = "de_opt_flag")]
    pub dl_copy_uploaded: Option<bool>,
    #[serde(default, deserialize_with = "de_opt_flag")]
    pub photos_uploaded: Option<bool>,
    #[serde(default, deserialize_with = "de_opt_flag")]
    pub fir_uploaded: Option<bool>,
    #[serde(default, deserialize_with = "de_vec_or_null")]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySection {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub previous_claims_last_12_months: Option<i64>,
}

/// Intake payload built by the claim intake form and sent to
/// `POST /save-fnol/` and `POST /process-claim/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnolPayload {
    pub claim_id: String,
    pub policy: FnolPolicy,
    pub vehicle: FnolVehicle,
    pub incident: FnolIncident,
    pub claimant: FnolClaimant,
    pub documents: FnolDocuments,
    pub history: FnolHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnolPolicy {
    pub policy_number: String,
    pub policy_status: String,
    pub coverage_type: String,
    pub policy_start_date: String,
    pub policy_end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnolVehicle {
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnolIncident {
    pub date_time_of_loss: String,
    pub location: String,
    pub loss_description: String,
    pub claim_type: String,
    pub estimated_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnolClaimant {
    pub driver_name: String,
    pub driving_license_number: String,
    pub license_valid_till: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FnolDocuments {
    pub rc_copy_uploaded: bool,
    pub dl_copy_uploaded: bool,
    pub photos_uploaded: bool,
    pub fir_uploaded: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FnolHistory {
    pub previous_claims_last_12_months: u32,
}

impl Default for FnolPayload {
    /// Blank form with the intake screen's preselected values.
    fn default() -> Self {
        Self {
            claim_id: String::new(),
            policy: FnolPolicy {
                policy_number: String::new(),
                policy_status: "Active".to_string(),
                coverage_type: "Comprehensive".to_string(),
                policy_start_date: String::new(),
                policy_end_date: String::new(),
            },
            vehicle: FnolVehicle {
                registration_number: String::new(),
                make: String::new(),
                model: String::new(),
                year: chrono::Datelike::year(&chrono::Utc::now()),
            },
            incident: FnolIncident {
                date_time_of_loss: String::new(),
                location: "Bangalore".to_string(),
                loss_description: String::new(),
                claim_type: "Own Damage".to_string(),
                estimated_amount: 0.0,
            },
            claimant: FnolClaimant {
                driver_name: String::new(),
                driving_license_number: String::new(),
                license_valid_till: String::new(),
            },
            documents: FnolDocuments::default(),
            history: FnolHistory::default(),
        }
    }
}

/// `{ "fnol": ... }` envelope expected by the intake endpoints.
#[derive(Debug, Serialize)]
pub struct FnolEnvelope<'a> {
    pub fnol: &'a FnolPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFnolResponse {
    #[serde(default)]
    pub message: String,
    #[serde(deserialize_with = "de_id")]
    pub id: String,
}

/// Assessment returned by `POST /process-claim/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessClaimResponse {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub claim_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub damage_confidence: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub fraud_score: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub evaluation_score: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub claim_type: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub claim_status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Latest evaluation stored for a claim (damage detection review).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimEvaluation {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub complaint_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub damage_confidence: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub estimated_amount: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub claim_amount: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub threshold_value: Option<f64>,
    #[serde(default)]
    pub claim_type: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub claim_status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub llm_damages: Option<Vec<String>>,
    #[serde(default)]
    pub llm_severity: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_record_without_raw_submission() {
        let record: ClaimRecord = serde_json::from_value(json!({
            "id": "CLM-100",
            "complaint_id": "CLM-100",
            "status": "Open",
            "estimated_amount": "1250.50",
            "claim_amount": null,
            "raw_response": null
        }))
        .unwrap();
        assert_eq!(record.id, "CLM-100");
        assert_eq!(record.estimated_amount, Some(1250.5));
        assert_eq!(record.claim_amount, None);
        assert!(record.raw_response.is_none());
    }

    #[test]
    fn decodes_numeric_id_and_partial_sections() {
        let record: ClaimRecord = serde_json::from_value(json!({
            "id": 42,
            "raw_response": {
                "claim_id": "CLM-42",
                "vehicle": { "make": "Toyota", "year": "2021" },
                "incident": { "estimated_amount": 900 }
            }
        }))
        .unwrap();
        assert_eq!(record.id, "42");
        let raw = record.raw_response.unwrap();
        assert_eq!(raw.claim_id.as_deref(), Some("CLM-42"));
        let vehicle = raw.vehicle.unwrap();
        assert_eq!(vehicle.year, Some(2021));
        assert_eq!(vehicle.model, None);
        assert!(raw.policy.is_none());
        assert_eq!(raw.incident.unwrap().estimated_amount, Some(900.0));
    }

    #[test]
    fn null_lists_and_numeric_flags_decode_leniently() {
        let record: ClaimRecord = serde_json::from_value(json!({
            "id": 7,
            "damage_photos": null,
            "raw_response": {
                "documents": {
                    "rc_copy_uploaded": 1,
                    "dl_copy_uploaded": 0,
                    "photos_uploaded": "yes",
                    "fir_uploaded": null,
                    "photos": null
                }
            }
        }))
        .unwrap();
        assert!(record.damage_photos.is_empty());
        let docs = record.raw_response.unwrap().documents.unwrap();
        assert_eq!(docs.rc_copy_uploaded, Some(true));
        assert_eq!(docs.dl_copy_uploaded, Some(false));
        assert_eq!(docs.photos_uploaded, Some(true));
        assert_eq!(docs.fir_uploaded, None);
        assert!(docs.photos.is_empty());
    }

    #[test]
    fn intake_envelope_wraps_payload() {
        let payload = FnolPayload {
            claim_id: "CLM-1".to_string(),
            ..FnolPayload::default()
        };
        let body = serde_json::to_value(FnolEnvelope { fnol: &payload }).unwrap();
        assert_eq!(body["fnol"]["claim_id"], "CLM-1");
        assert_eq!(body["fnol"]["incident"]["claim_type"], "Own Damage");
        assert!(body["fnol"]["documents"].get("photos").is_none());
    }
}
