//! Normalization of free-text backend claim statuses into canonical keys.
//!
//! The backend reports statuses as display strings ("Closed Damage
//! Detection", "Business Rule Validation-fail", ...). Everything in the
//! console works on [`StatusKey`] instead, recomputed from the raw string
//! every time it is needed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConsoleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKey {
    AutoApproved,
    Fraudulent,
    ManualReview,
    Open,
    Pending,
    PendingDamageDetection,
}

/// Visual treatment of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Approved,
    Rejected,
    Processing,
    Pending,
}

/// Call sites disagree on what an unrecognized status means; each passes its
/// own default explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusContext {
    ClaimsList,
    Dashboard,
    Reports,
}

impl StatusContext {
    pub fn default_key(self) -> StatusKey {
        match self {
            StatusContext::ClaimsList => StatusKey::Pending,
            StatusContext::Dashboard | StatusContext::Reports => StatusKey::Open,
        }
    }
}

const PHRASES: &[(&str, StatusKey)] = &[
    ("closed damage detection", StatusKey::AutoApproved),
    ("recommendation shared", StatusKey::AutoApproved),
    ("fraudulent", StatusKey::Fraudulent),
    ("business rule validation-fail", StatusKey::Fraudulent),
    ("manual review", StatusKey::ManualReview),
    ("fnol", StatusKey::Open),
    ("open", StatusKey::Open),
    ("open to fnol", StatusKey::Open),
    ("pending", StatusKey::Open),
    ("business rule validation-pass", StatusKey::PendingDamageDetection),
    ("pending damage detection", StatusKey::PendingDamageDetection),
];

/// Map a raw status string to its canonical key.
///
/// Matching is exact on the trimmed, lowercased input. Absent, blank and
/// unrecognized input all resolve to `default_key`.
pub fn normalize_status(raw: Option<&str>, default_key: StatusKey) -> StatusKey {
    let Some(raw) = raw else {
        return default_key;
    };
    let needle = raw.trim().to_lowercase();
    PHRASES
        .iter()
        .find(|(phrase, _)| *phrase == needle)
        .map(|(_, key)| *key)
        .unwrap_or(default_key)
}

pub fn normalize_in(raw: Option<&str>, context: StatusContext) -> StatusKey {
    normalize_status(raw, context.default_key())
}

impl StatusKey {
    pub const ALL: [StatusKey; 6] = [
        StatusKey::AutoApproved,
        StatusKey::Fraudulent,
        StatusKey::ManualReview,
        StatusKey::Open,
        StatusKey::Pending,
        StatusKey::PendingDamageDetection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKey::AutoApproved => "auto_approved",
            StatusKey::Fraudulent => "fraudulent",
            StatusKey::ManualReview => "manual_review",
            StatusKey::Open => "open",
            StatusKey::Pending => "pending",
            StatusKey::PendingDamageDetection => "pending_damage_detection",
        }
    }

    pub fn parse(key: &str) -> Option<StatusKey> {
        StatusKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(key.trim()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusKey::AutoApproved => "Recommendation shared",
            StatusKey::Fraudulent => "Business Rule Validation-fail",
            StatusKey::ManualReview => "Manual Review",
            StatusKey::Open => "FNOL",
            StatusKey::Pending => "Pending",
            StatusKey::PendingDamageDetection => "Business Rule Validation-pass",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            StatusKey::AutoApproved => BadgeVariant::Approved,
            StatusKey::Fraudulent => BadgeVariant::Rejected,
            StatusKey::Open | StatusKey::PendingDamageDetection => BadgeVariant::Processing,
            StatusKey::ManualReview | StatusKey::Pending => BadgeVariant::Pending,
        }
    }

    /// Counted as "pending review" on the dashboard.
    pub fn is_pending_review(&self) -> bool {
        matches!(
            self,
            StatusKey::Open | StatusKey::PendingDamageDetection | StatusKey::Pending
        )
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKey {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusKey::parse(s).ok_or_else(|| {
            ConsoleError::Config(format!("unknown status '{}'", s.trim()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_phrases_ignore_case_and_whitespace() {
        let cases = [
            ("Closed Damage Detection", StatusKey::AutoApproved),
            ("  RECOMMENDATION SHARED ", StatusKey::AutoApproved),
            ("Fraudulent", StatusKey::Fraudulent),
            ("Business Rule Validation-Fail", StatusKey::Fraudulent),
            ("manual review", StatusKey::ManualReview),
            ("FNOL", StatusKey::Open),
            ("Open", StatusKey::Open),
            ("Open to FNOL", StatusKey::Open),
            ("\tpending\n", StatusKey::Open),
            ("Business Rule Validation-pass", StatusKey::PendingDamageDetection),
            ("Pending Damage Detection", StatusKey::PendingDamageDetection),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_status(Some(raw), StatusKey::Pending), expected, "{raw:?}");
            assert_eq!(normalize_status(Some(raw), StatusKey::Open), expected, "{raw:?}");
        }
    }

    #[test]
    fn unknown_blank_and_missing_use_call_site_default() {
        for raw in [Some(""), Some("   "), Some("Closed"), Some("fraud"), None] {
            assert_eq!(normalize_in(raw, StatusContext::ClaimsList), StatusKey::Pending);
            assert_eq!(normalize_in(raw, StatusContext::Dashboard), StatusKey::Open);
            assert_eq!(normalize_in(raw, StatusContext::Reports), StatusKey::Open);
        }
    }

    #[test]
    fn six_record_scenario() {
        let raws = [
            Some("Closed Damage Detection"),
            Some("Fraudulent"),
            Some("Open"),
            Some("Pending Damage Detection"),
            Some(""),
            None,
        ];
        let list: Vec<_> = raws
            .iter()
            .map(|r| normalize_in(*r, StatusContext::ClaimsList))
            .collect();
        assert_eq!(
            list,
            vec![
                StatusKey::AutoApproved,
                StatusKey::Fraudulent,
                StatusKey::Open,
                StatusKey::PendingDamageDetection,
                StatusKey::Pending,
                StatusKey::Pending,
            ]
        );
        let dashboard: Vec<_> = raws
            .iter()
            .map(|r| normalize_in(*r, StatusContext::Dashboard))
            .collect();
        assert_eq!(&dashboard[4..], &[StatusKey::Open, StatusKey::Open]);
    }

    #[test]
    fn normalization_is_idempotent_on_labels_of_round_trippable_keys() {
        for key in [StatusKey::AutoApproved, StatusKey::Fraudulent, StatusKey::PendingDamageDetection] {
            assert_eq!(normalize_status(Some(key.label()), StatusKey::Pending), key);
        }
        assert_eq!(StatusKey::parse("Pending_Damage_Detection"), Some(StatusKey::PendingDamageDetection));
        assert_eq!(StatusKey::parse("nope"), None);
    }
}
