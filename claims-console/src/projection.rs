//! Flattening of raw claim records into display rows.
//!
//! Each display field is resolved through a fixed chain: explicit top-level
//! field, then the nested raw submission, then [`PLACEHOLDER`]. Projection
//! never fails and never mutates the source record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{ClaimRecord, RawSubmission, non_blank};
use crate::status::{StatusContext, StatusKey, normalize_in};

/// Rendered wherever a value is unknown.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub id: String,
    pub claim_number: String,
    pub customer_name: String,
    pub policy_number: String,
    pub vehicle: String,
    pub claim_type: String,
    pub incident_date: String,
    pub amount: f64,
    pub status: StatusKey,
    /// Intake timestamp used for recency ordering; not rendered.
    #[serde(skip)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip)]
    pub incident_at: Option<NaiveDateTime>,
}

impl DisplayRow {
    pub fn has_claim_type(&self) -> bool {
        self.claim_type != PLACEHOLDER
    }
}

pub fn project_claim(record: &ClaimRecord, context: StatusContext) -> DisplayRow {
    let raw = record.raw_response.as_ref();
    let incident_raw = incident_timestamp_text(record);

    DisplayRow {
        id: record.id.clone(),
        claim_number: claim_number(record),
        customer_name: customer_name(record),
        policy_number: text_or_placeholder(
            non_blank(record.policy_number.as_deref())
                .or_else(|| non_blank(raw_policy(raw, |p| p.policy_number.as_deref()))),
        ),
        vehicle: vehicle_description(record),
        claim_type: text_or_placeholder(claim_type(record)),
        incident_date: incident_raw
            .map(|text| match parse_timestamp(text) {
                Some(ts) => ts.date().format("%Y-%m-%d").to_string(),
                None => text.to_string(),
            })
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        amount: resolve_amount(record),
        status: normalize_in(record.status.as_deref(), context),
        created_at: record.created_date.as_deref().and_then(parse_timestamp),
        incident_at: incident_raw.and_then(parse_timestamp),
    }
}

pub fn project_claims(records: &[ClaimRecord], context: StatusContext) -> Vec<DisplayRow> {
    records.iter().map(|r| project_claim(r, context)).collect()
}

/// Raw-submission claim id, then complaint id, then a synthesized number.
pub fn claim_number(record: &ClaimRecord) -> String {
    record
        .raw_response
        .as_ref()
        .and_then(|raw| non_blank(raw.claim_id.as_deref()))
        .or_else(|| non_blank(record.complaint_id.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("CLM-{}", record.id))
}

fn customer_name(record: &ClaimRecord) -> String {
    text_or_placeholder(non_blank(record.policy_holder_name.as_deref()).or_else(|| {
        record
            .raw_response
            .as_ref()
            .and_then(|raw| raw.claimant.as_ref())
            .and_then(|c| non_blank(c.driver_name.as_deref()))
    }))
}

/// "2022 Toyota Camry" when year, make and model are all known.
pub fn vehicle_description(record: &ClaimRecord) -> String {
    let raw_vehicle = record.raw_response.as_ref().and_then(|r| r.vehicle.as_ref());

    let year = record
        .vehicle_year
        .filter(|y| *y > 0)
        .or_else(|| raw_vehicle.and_then(|v| v.year).filter(|y| *y > 0));
    let make = non_blank(record.vehicle_make.as_deref())
        .or_else(|| raw_vehicle.and_then(|v| non_blank(v.make.as_deref())));
    let model = non_blank(record.vehicle_model.as_deref())
        .or_else(|| raw_vehicle.and_then(|v| non_blank(v.model.as_deref())));

    match (year, make, model) {
        (Some(year), Some(make), Some(model)) => format!("{year} {make} {model}"),
        _ => PLACEHOLDER.to_string(),
    }
}

fn claim_type(record: &ClaimRecord) -> Option<&str> {
    non_blank(record.incident_type.as_deref()).or_else(|| {
        record
            .raw_response
            .as_ref()
            .and_then(|raw| raw.incident.as_ref())
            .and_then(|i| non_blank(i.claim_type.as_deref()))
    })
}

fn incident_timestamp_text(record: &ClaimRecord) -> Option<&str> {
    non_blank(record.incident_date_time.as_deref()).or_else(|| {
        record
            .raw_response
            .as_ref()
            .and_then(|raw| raw.incident.as_ref())
            .and_then(|i| non_blank(i.date_time_of_loss.as_deref()))
    })
}

/// Claim amount, then estimated amount (top-level, then raw intake), then zero.
pub fn resolve_amount(record: &ClaimRecord) -> f64 {
    record
        .claim_amount
        .or(record.estimated_amount)
        .or_else(|| {
            record
                .raw_response
                .as_ref()
                .and_then(|raw| raw.incident.as_ref())
                .and_then(|i| i.estimated_amount)
        })
        .unwrap_or(0.0)
}

fn raw_policy<'a, F>(raw: Option<&'a RawSubmission>, field: F) -> Option<&'a str>
where
    F: Fn(&'a crate::models::PolicySection) -> Option<&'a str>,
{
    raw.and_then(|r| r.policy.as_ref()).and_then(field)
}

fn text_or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(PLACEHOLDER).to_string()
}

/// Accepts the timestamp shapes the backend emits: RFC 3339, naive
/// date-times with `T` or space, and bare dates.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Everything the claim detail screen shows beyond the list row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimDetailView {
    pub row: DisplayRow,
    pub policy_status: String,
    pub coverage_type: String,
    pub policy_period: String,
    pub registration_number: String,
    pub incident_location: String,
    pub loss_description: String,
    pub documents: Vec<(String, bool)>,
    pub previous_claims: Option<i64>,
    pub damage_photos: Vec<String>,
    pub detected_damages: Vec<String>,
    pub damage_severity: String,
}

pub fn project_detail(record: &ClaimRecord, context: StatusContext) -> ClaimDetailView {
    let raw = record.raw_response.as_ref();
    let policy = raw.and_then(|r| r.policy.as_ref());
    let vehicle = raw.and_then(|r| r.vehicle.as_ref());
    let incident = raw.and_then(|r| r.incident.as_ref());
    let docs = raw.and_then(|r| r.documents.as_ref());

    let policy_period = match (
        policy.and_then(|p| non_blank(p.policy_start_date.as_deref())),
        policy.and_then(|p| non_blank(p.policy_end_date.as_deref())),
    ) {
        (Some(start), Some(end)) => format!("{start} to {end}"),
        _ => PLACEHOLDER.to_string(),
    };

    let documents = [
        ("RC copy", docs.and_then(|d| d.rc_copy_uploaded)),
        ("Driving licence", docs.and_then(|d| d.dl_copy_uploaded)),
        (
            "Damage photos",
            docs.and_then(|d| d.photos_uploaded)
                .or_else(|| (!record.damage_photos.is_empty()).then_some(true)),
        ),
        ("FIR", docs.and_then(|d| d.fir_uploaded)),
    ]
    .into_iter()
    .map(|(name, flag)| (name.to_string(), flag.unwrap_or(false)))
    .collect();

    let mut damage_photos = record.damage_photos.clone();
    if damage_photos.is_empty() {
        if let Some(docs) = docs {
            damage_photos = docs.photos.clone();
        }
    }

    ClaimDetailView {
        row: project_claim(record, context),
        policy_status: text_or_placeholder(
            non_blank(record.policy_status.as_deref())
                .or_else(|| policy.and_then(|p| non_blank(p.policy_status.as_deref()))),
        ),
        coverage_type: text_or_placeholder(
            non_blank(record.coverage_type.as_deref())
                .or_else(|| policy.and_then(|p| non_blank(p.coverage_type.as_deref()))),
        ),
        policy_period,
        registration_number: text_or_placeholder(
            non_blank(record.vehicle_registration_number.as_deref())
                .or_else(|| vehicle.and_then(|v| non_blank(v.registration_number.as_deref()))),
        ),
        incident_location: text_or_placeholder(incident.and_then(|i| non_blank(i.location.as_deref()))),
        loss_description: text_or_placeholder(
            non_blank(record.incident_description.as_deref())
                .or_else(|| incident.and_then(|i| non_blank(i.loss_description.as_deref()))),
        ),
        documents,
        previous_claims: raw
            .and_then(|r| r.history.as_ref())
            .and_then(|h| h.previous_claims_last_12_months),
        damage_photos,
        detected_damages: detected_damages(record.llm_damages.as_ref()),
        damage_severity: text_or_placeholder(non_blank(record.llm_severity.as_deref())),
    }
}

/// `llm_damages` arrives either as a JSON array or as a JSON-encoded string of one.
fn detected_damages(value: Option<&serde_json::Value>) -> Vec<String> {
    let decoded;
    let value = match value {
        Some(serde_json::Value::String(s)) => {
            decoded = serde_json::from_str::<serde_json::Value>(s).ok();
            decoded.as_ref()
        }
        other => other,
    };
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{Currency, format_currency};
    use crate::models::{ClaimantSection, IncidentSection, VehicleSection};
    use serde_json::json;

    fn full_raw() -> RawSubmission {
        RawSubmission {
            claim_id: Some("CLM-2024-0892".to_string()),
            vehicle: Some(VehicleSection {
                make: Some("Toyota".into()),
                model: Some("Camry".into()),
                year: Some(2022),
                registration_number: Some("KA01AB1234".into()),
            }),
            incident: Some(IncidentSection {
                claim_type: Some("Own Damage".into()),
                date_time_of_loss: Some("2024-02-01T09:30:00".into()),
                estimated_amount: Some(4500.0),
                ..Default::default()
            }),
            claimant: Some(ClaimantSection {
                driver_name: Some("Sarah Mitchell".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn top_level_fields_win_over_raw_submission() {
        let record = ClaimRecord {
            id: "7".into(),
            complaint_id: Some("CMP-7".into()),
            policy_holder_name: Some("Top Level".into()),
            incident_type: Some("Theft".into()),
            claim_amount: Some(1200.0),
            estimated_amount: Some(999.0),
            raw_response: Some(full_raw()),
            ..Default::default()
        };
        let row = project_claim(&record, StatusContext::ClaimsList);
        assert_eq!(row.claim_number, "CLM-2024-0892");
        assert_eq!(row.customer_name, "Top Level");
        assert_eq!(row.claim_type, "Theft");
        assert_eq!(row.vehicle, "2022 Toyota Camry");
        assert_eq!(row.incident_date, "2024-02-01");
        assert_eq!(row.amount, 1200.0);
    }

    #[test]
    fn missing_raw_submission_uses_top_level_only() {
        let record = ClaimRecord {
            id: "11".into(),
            complaint_id: Some("CMP-11".into()),
            status: Some("Fraudulent".into()),
            policy_holder_name: Some("Anan".into()),
            vehicle_make: Some("Honda".into()),
            vehicle_model: Some("City".into()),
            vehicle_year: Some(2019),
            incident_type: Some("Own Damage".into()),
            incident_date_time: Some("2024-03-05T12:00:00+07:00".into()),
            estimated_amount: Some(3000.0),
            raw_response: None,
            ..Default::default()
        };
        let row = project_claim(&record, StatusContext::ClaimsList);
        assert_eq!(row.claim_number, "CMP-11");
        assert_eq!(row.customer_name, "Anan");
        assert_eq!(row.vehicle, "2019 Honda City");
        assert_eq!(row.incident_date, "2024-03-05");
        assert_eq!(row.amount, 3000.0);
        assert_eq!(row.status, StatusKey::Fraudulent);
    }

    #[test]
    fn empty_record_gets_placeholders() {
        let record = ClaimRecord {
            id: "99".into(),
            ..Default::default()
        };
        let row = project_claim(&record, StatusContext::Dashboard);
        assert_eq!(row.claim_number, "CLM-99");
        assert_eq!(row.customer_name, PLACEHOLDER);
        assert_eq!(row.vehicle, PLACEHOLDER);
        assert_eq!(row.claim_type, PLACEHOLDER);
        assert_eq!(row.incident_date, PLACEHOLDER);
        assert_eq!(row.amount, 0.0);
        assert_eq!(row.status, StatusKey::Open);
        assert!(!row.has_claim_type());
    }

    #[test]
    fn vehicle_needs_all_three_parts_from_either_source() {
        let mut record = ClaimRecord {
            id: "1".into(),
            vehicle_make: Some("Mazda".into()),
            raw_response: Some(RawSubmission {
                vehicle: Some(VehicleSection {
                    model: Some("CX-5".into()),
                    year: Some(2020),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(vehicle_description(&record), "2020 Mazda CX-5");
        record.vehicle_make = Some("  ".into());
        assert_eq!(vehicle_description(&record), PLACEHOLDER);
    }

    #[test]
    fn reprojection_is_stable_and_source_untouched() {
        let record = ClaimRecord {
            id: "5".into(),
            raw_response: Some(full_raw()),
            ..Default::default()
        };
        let before = record.clone();
        let a = project_claim(&record, StatusContext::ClaimsList);
        let b = project_claim(&record, StatusContext::ClaimsList);
        assert_eq!(a, b);
        assert_eq!(format_currency(a.amount, Currency::Usd), "$4,500");
        assert_eq!(
            format_currency(a.amount, Currency::Usd),
            format_currency(b.amount, Currency::Usd)
        );
        assert_eq!(record, before);
    }

    #[test]
    fn detail_view_decodes_string_encoded_damages() {
        let record: ClaimRecord = serde_json::from_value(json!({
            "id": "CLM-3",
            "llm_damages": "[\"scratch\", \"dent\"]",
            "llm_severity": "moderate",
            "damage_photos": ["media/vehicle_damage/a.jpg"],
            "raw_response": {
                "policy": { "policy_start_date": "2024-01-01", "policy_end_date": "2024-12-31" },
                "documents": { "fir_uploaded": true },
                "history": { "previous_claims_last_12_months": 2 }
            }
        }))
        .unwrap();
        let view = project_detail(&record, StatusContext::ClaimsList);
        assert_eq!(view.detected_damages, vec!["scratch", "dent"]);
        assert_eq!(view.damage_severity, "moderate");
        assert_eq!(view.policy_period, "2024-01-01 to 2024-12-31");
        assert_eq!(view.previous_claims, Some(2));
        assert!(view.documents.contains(&("FIR".to_string(), true)));
        assert!(view.documents.contains(&("Damage photos".to_string(), true)));
    }

    #[test]
    fn parses_backend_timestamp_shapes() {
        assert!(parse_timestamp("2024-02-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-02-01T10:00:00.123456").is_some());
        assert!(parse_timestamp("2024-02-01 10:00:00").is_some());
        assert!(parse_timestamp("2024-02-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
