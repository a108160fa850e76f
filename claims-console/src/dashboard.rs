//! Dashboard aggregates computed from already-fetched collections.
//!
//! Everything here is a pure fold over its inputs. Percentages are rounded
//! to the nearest integer and a zero denominator yields 0.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{ClaimRecord, FraudClaimItem, FraudReviewStatus};
use crate::projection::{DisplayRow, project_claims, resolve_amount};
use crate::status::{StatusContext, StatusKey};

pub const TREND_BUCKETS: usize = 10;
pub const RECENT_CLAIMS_LIMIT: usize = 5;
pub const FRAUD_ALERT_LIMIT: usize = 5;
pub const OTHER_CLAIM_TYPE: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_claims: usize,
    pub pending_review: usize,
    pub approved: usize,
    pub business_validation_failed: usize,
    pub fraud_flagged: usize,
    pub total_settlement: f64,
    pub stp_rate: u32,
    pub automation_rate: u32,
    pub trend: Vec<TrendPoint>,
    pub by_type: Vec<TypeShare>,
    pub recent_claims: Vec<DisplayRow>,
    pub fraud: FraudSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub claims: usize,
    pub approved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeShare {
    pub claim_type: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudSummary {
    pub total: usize,
    pub under_review: usize,
    pub confirmed: usize,
    pub cleared: usize,
    pub detection_rate: u32,
    pub alerts: Vec<FraudClaimItem>,
}

/// `round(100 * part / whole)`, 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u32
}

pub fn summarize(claims: &[ClaimRecord], fraud_items: &[FraudClaimItem]) -> DashboardSummary {
    let rows = project_claims(claims, StatusContext::Dashboard);

    let total_claims = rows.len();
    let count = |pred: fn(&StatusKey) -> bool| rows.iter().filter(|r| pred(&r.status)).count();
    let pending_review = count(StatusKey::is_pending_review);
    let approved = count(|k| *k == StatusKey::AutoApproved);
    let business_validation_failed = count(|k| *k == StatusKey::Fraudulent);

    let total_settlement = claims.iter().map(resolve_amount).sum();
    let fraud_flagged = fraud_items.iter().filter(|i| i.status.is_open()).count();
    let fraud = fraud_summary(fraud_items);

    tracing::debug!(
        total_claims,
        approved,
        pending_review,
        fraud_items = fraud_items.len(),
        "Computed dashboard summary"
    );

    DashboardSummary {
        total_claims,
        pending_review,
        approved,
        business_validation_failed,
        fraud_flagged,
        total_settlement,
        stp_rate: percentage(approved, total_claims),
        automation_rate: percentage(approved + pending_review, total_claims),
        trend: trend_series(&rows, TREND_BUCKETS),
        by_type: claims_by_type(&rows),
        recent_claims: recent_claims(&rows, RECENT_CLAIMS_LIMIT),
        fraud,
    }
}

/// Daily claim and approval counts for the most recent `buckets` days that
/// have any claims, oldest first.
///
/// The day comes from the created timestamp, falling back to the incident
/// timestamp. Rows with neither are left out.
pub fn trend_series(rows: &[DisplayRow], buckets: usize) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for row in rows {
        let Some(at) = row.created_at.or(row.incident_at) else {
            continue;
        };
        let entry = by_day.entry(at.date()).or_default();
        entry.0 += 1;
        if row.status == StatusKey::AutoApproved {
            entry.1 += 1;
        }
    }

    let skip = by_day.len().saturating_sub(buckets);
    by_day
        .into_iter()
        .skip(skip)
        .map(|(date, (claims, approved))| TrendPoint {
            date,
            claims,
            approved,
        })
        .collect()
}

/// Share of each claim type, largest first. Rows without a type count as "Other".
pub fn claims_by_type(rows: &[DisplayRow]) -> Vec<TypeShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        let key = if row.has_claim_type() {
            row.claim_type.as_str()
        } else {
            OTHER_CLAIM_TYPE
        };
        *counts.entry(key).or_default() += 1;
    }

    let total = rows.len();
    let mut shares: Vec<TypeShare> = counts
        .into_iter()
        .map(|(claim_type, count)| TypeShare {
            claim_type: claim_type.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    // BTreeMap already ordered names; stable sort keeps that for equal counts.
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Newest rows by created timestamp; rows without one sort last.
pub fn recent_claims(rows: &[DisplayRow], limit: usize) -> Vec<DisplayRow> {
    let mut sorted: Vec<&DisplayRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.into_iter().take(limit).cloned().collect()
}

pub fn fraud_summary(items: &[FraudClaimItem]) -> FraudSummary {
    let count = |status: FraudReviewStatus| items.iter().filter(|i| i.status == status).count();
    let confirmed = count(FraudReviewStatus::Confirmed);

    let mut alerts: Vec<FraudClaimItem> = items
        .iter()
        .filter(|i| i.status.is_open())
        .cloned()
        .collect();
    alerts.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    alerts.truncate(FRAUD_ALERT_LIMIT);

    FraudSummary {
        total: items.len(),
        under_review: count(FraudReviewStatus::UnderReview),
        confirmed,
        cleared: count(FraudReviewStatus::Cleared),
        detection_rate: percentage(confirmed, items.len()),
        alerts,
    }
}
