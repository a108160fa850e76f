//! Form validation. Everything here runs before a request is built, so a
//! failed form never reaches the network.

use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;

use crate::error::{ConsoleError, Result};
use crate::models::{
    ClaimTypeDraft, DamageCodeDraft, FnolPayload, FraudRuleDraft, PricingConfigDraft,
    PricingValueType,
};

pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// Optional sign, optional currency symbol, digits with optional thousands
/// separators, optional fraction, optional trailing percent sign.
static AMOUNT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<sign>[-+]?)\s*[฿$€£₹]?\s*(?P<num>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)\s*%?$",
    )
    .ok()
});

/// Parse user-entered numeric text such as `฿1,250.50`, `12.5%` or `-300`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let caps = AMOUNT.as_ref()?.captures(text.trim())?;
    let digits = caps.name("num")?.as_str().replace(',', "");
    let value: f64 = digits.parse().ok()?;
    match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => Some(-value),
        _ => Some(value),
    }
}

/// Collects every problem on a form instead of stopping at the first.
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Trimmed value, or `None` after recording a "required" error.
    pub fn require<'a>(&mut self, label: &str, value: &'a str) -> Option<&'a str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(format!("{label} is required"));
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn percentage(&mut self, label: &str, text: &str) -> Option<f64> {
        match parse_amount(text) {
            Some(value) if (0.0..=100.0).contains(&value) => Some(value),
            Some(_) => {
                self.push(format!("{label} must be between 0 and 100"));
                None
            }
            None => {
                self.push(format!("{label} must be a number"));
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConsoleError::Validation(self.errors))
        }
    }
}

pub fn damage_code_draft(damage_type: &str, severity: &str, is_active: bool) -> Result<DamageCodeDraft> {
    let mut form = FormErrors::new();
    let damage_type = form.require("Damage type", damage_type);
    let severity = form.percentage("Severity percentage", severity);
    form.finish()?;
    Ok(DamageCodeDraft {
        damage_type: damage_type.unwrap_or_default().to_string(),
        severity_percentage: severity.unwrap_or_default(),
        is_active,
    })
}

pub fn claim_type_draft(name: &str, risk: &str, is_active: bool) -> Result<ClaimTypeDraft> {
    let mut form = FormErrors::new();
    let name = form.require("Claim type name", name);
    let risk = form.percentage("Risk percentage", risk);
    form.finish()?;
    Ok(ClaimTypeDraft {
        claim_type_name: name.unwrap_or_default().to_string(),
        risk_percentage: risk.unwrap_or_default(),
        is_active,
    })
}

pub fn fraud_rule_draft(
    rule_type: &str,
    rule_group: &str,
    description: &str,
    expression: &str,
    is_active: bool,
) -> Result<FraudRuleDraft> {
    let mut form = FormErrors::new();
    let rule_type = form.require("Rule type", rule_type);
    let expression = form.require("Rule expression", expression);
    form.finish()?;
    Ok(FraudRuleDraft {
        rule_type: rule_type.unwrap_or_default().to_string(),
        rule_group: rule_group.trim().to_string(),
        rule_description: description.trim().to_string(),
        rule_expression: expression.unwrap_or_default().to_string(),
        is_active,
    })
}

/// Problem with `value` for the declared config type, if any.
pub fn pricing_value_error(value: &str, value_type: PricingValueType) -> Option<String> {
    let value = value.trim();
    match value_type {
        PricingValueType::String => None,
        PricingValueType::Number => match parse_amount(value) {
            Some(n) if n.fract() == 0.0 => None,
            _ => Some("Config value must be a whole number".to_string()),
        },
        PricingValueType::Decimal => match parse_amount(value) {
            Some(_) => None,
            None => Some("Config value must be a decimal number".to_string()),
        },
        PricingValueType::Boolean => match value.to_ascii_lowercase().as_str() {
            "true" | "false" => None,
            _ => Some("Config value must be true or false".to_string()),
        },
        PricingValueType::Json => serde_json::from_str::<serde_json::Value>(value)
            .err()
            .map(|e| format!("Config value must be valid JSON ({e})")),
    }
}

pub fn pricing_config_draft(
    key: &str,
    name: &str,
    value: &str,
    value_type: PricingValueType,
    description: &str,
    is_active: bool,
) -> Result<PricingConfigDraft> {
    let mut form = FormErrors::new();
    let key = form.require("Config key", key);
    let value_text = form.require("Config value", value);
    if let Some(problem) = value_text.and_then(|v| pricing_value_error(v, value_type)) {
        form.push(problem);
    }
    form.finish()?;
    Ok(PricingConfigDraft {
        config_key: key.unwrap_or_default().to_string(),
        config_name: name.trim().to_string(),
        config_value: value.trim().to_string(),
        config_type: value_type,
        description: description.trim().to_string(),
        is_active,
    })
}

/// Intake form checks: identifiers present, vehicle year plausible, amount not negative.
pub fn validate_fnol(payload: &FnolPayload) -> Result<()> {
    let mut form = FormErrors::new();
    form.require("Claim ID", &payload.claim_id);
    form.require("Policy number", &payload.policy.policy_number);
    form.require("Driver name", &payload.claimant.driver_name);

    let max_year = Utc::now().year() + 1;
    let year = payload.vehicle.year;
    if !(MIN_VEHICLE_YEAR..=max_year).contains(&year) {
        form.push(format!(
            "Vehicle year must be between {MIN_VEHICLE_YEAR} and {max_year}"
        ));
    }

    let amount = payload.incident.estimated_amount;
    if !amount.is_finite() || amount < 0.0 {
        form.push("Estimated amount cannot be negative");
    }

    form.finish()
}
