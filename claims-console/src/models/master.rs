use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::str::FromStr;

use crate::error::ConsoleError;

use super::{de_f64, de_flag, de_id, default_true};

/// Common shape of every master-data record.
pub trait MasterRecord: Clone + Send + Sync {
    fn id(&self) -> &str;
    /// Natural key shown in the first table column (name or code).
    fn natural_key(&self) -> &str;
    /// Primary configuration value rendered as text.
    fn value_text(&self) -> String;
    /// Numeric form of the value, when it has one; drives value sorting.
    fn value_number(&self) -> Option<f64>;
    fn description(&self) -> Option<&str>;
    fn is_active(&self) -> bool;
    fn created_date(&self) -> Option<&str>;
}

/// Binds a master-data record to its REST collection and its create/update form.
pub trait MasterEntity: MasterRecord + DeserializeOwned + Serialize + 'static {
    type Draft: Serialize + Send + Sync;
    /// Collection path under the API base, without trailing slash.
    const COLLECTION: &'static str;
    /// Human label used in notifications ("Damage code created").
    const LABEL: &'static str;
    /// Permission module guarding this entity (`<module>.view` etc).
    const PERMISSION_MODULE: &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageCode {
    #[serde(deserialize_with = "de_id")]
    pub damage_id: String,
    pub damage_type: String,
    #[serde(default, deserialize_with = "de_f64")]
    pub severity_percentage: f64,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    pub is_active: bool,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageCodeDraft {
    pub damage_type: String,
    pub severity_percentage: f64,
    pub is_active: bool,
}

impl MasterRecord for DamageCode {
    fn id(&self) -> &str {
        &self.damage_id
    }
    fn natural_key(&self) -> &str {
        &self.damage_type
    }
    fn value_text(&self) -> String {
        format!("{}%", trim_decimal(self.severity_percentage))
    }
    fn value_number(&self) -> Option<f64> {
        Some(self.severity_percentage)
    }
    fn description(&self) -> Option<&str> {
        None
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn created_date(&self) -> Option<&str> {
        self.created_date.as_deref()
    }
}

impl MasterEntity for DamageCode {
    type Draft = DamageCodeDraft;
    const COLLECTION: &'static str = "/masters/damage-codes";
    const LABEL: &'static str = "Damage code";
    const PERMISSION_MODULE: &'static str = "damage_config";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimType {
    #[serde(deserialize_with = "de_id")]
    pub claim_type_id: String,
    pub claim_type_name: String,
    #[serde(default, deserialize_with = "de_f64")]
    pub risk_percentage: f64,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    pub is_active: bool,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimTypeDraft {
    pub claim_type_name: String,
    pub risk_percentage: f64,
    pub is_active: bool,
}

impl MasterRecord for ClaimType {
    fn id(&self) -> &str {
        &self.claim_type_id
    }
    fn natural_key(&self) -> &str {
        &self.claim_type_name
    }
    fn value_text(&self) -> String {
        format!("{}%", trim_decimal(self.risk_percentage))
    }
    fn value_number(&self) -> Option<f64> {
        Some(self.risk_percentage)
    }
    fn description(&self) -> Option<&str> {
        None
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn created_date(&self) -> Option<&str> {
        self.created_date.as_deref()
    }
}

impl MasterEntity for ClaimType {
    type Draft = ClaimTypeDraft;
    const COLLECTION: &'static str = "/masters/claim-types";
    const LABEL: &'static str = "Claim type";
    const PERMISSION_MODULE: &'static str = "claim_config";
}

/// Fraud / policy / damage / document rule evaluated by the backend rules engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRule {
    #[serde(deserialize_with = "de_id")]
    pub rule_id: String,
    pub rule_type: String,
    #[serde(default)]
    pub rule_group: String,
    #[serde(default)]
    pub rule_description: String,
    #[serde(default)]
    pub rule_expression: String,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    pub is_active: bool,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRuleDraft {
    pub rule_type: String,
    pub rule_group: String,
    pub rule_description: String,
    pub rule_expression: String,
    pub is_active: bool,
}

impl MasterRecord for FraudRule {
    fn id(&self) -> &str {
        &self.rule_id
    }
    fn natural_key(&self) -> &str {
        &self.rule_type
    }
    fn value_text(&self) -> String {
        self.rule_expression.clone()
    }
    fn value_number(&self) -> Option<f64> {
        None
    }
    fn description(&self) -> Option<&str> {
        Some(self.rule_description.as_str()).filter(|d| !d.is_empty())
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn created_date(&self) -> Option<&str> {
        self.created_date.as_deref()
    }
}

impl MasterEntity for FraudRule {
    type Draft = FraudRuleDraft;
    const COLLECTION: &'static str = "/masters/claim-rules";
    const LABEL: &'static str = "Fraud rule";
    const PERMISSION_MODULE: &'static str = "fraud_rules";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingValueType {
    #[default]
    String,
    Number,
    Decimal,
    Json,
    Boolean,
}

impl FromStr for PricingValueType {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(PricingValueType::String),
            "number" => Ok(PricingValueType::Number),
            "decimal" => Ok(PricingValueType::Decimal),
            "json" => Ok(PricingValueType::Json),
            "boolean" => Ok(PricingValueType::Boolean),
            other => Err(ConsoleError::Config(format!(
                "unknown config type '{other}', expected string, number, decimal, json or boolean"
            ))),
        }
    }
}

/// Key/value pricing setting (thresholds, rates, amounts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(deserialize_with = "de_id")]
    pub config_id: String,
    pub config_key: String,
    #[serde(default)]
    pub config_name: String,
    #[serde(default)]
    pub config_value: String,
    #[serde(default)]
    pub config_type: PricingValueType,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    pub is_active: bool,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfigDraft {
    pub config_key: String,
    pub config_name: String,
    pub config_value: String,
    pub config_type: PricingValueType,
    pub description: String,
    pub is_active: bool,
}

impl MasterRecord for PricingConfig {
    fn id(&self) -> &str {
        &self.config_id
    }
    fn natural_key(&self) -> &str {
        &self.config_key
    }
    fn value_text(&self) -> String {
        self.config_value.clone()
    }
    fn value_number(&self) -> Option<f64> {
        self.config_value.trim().parse().ok()
    }
    fn description(&self) -> Option<&str> {
        Some(self.description.as_str()).filter(|d| !d.is_empty())
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn created_date(&self) -> Option<&str> {
        self.created_date.as_deref()
    }
}

impl MasterEntity for PricingConfig {
    type Draft = PricingConfigDraft;
    const COLLECTION: &'static str = "/masters/pricing-configs";
    const LABEL: &'static str = "Pricing config";
    const PERMISSION_MODULE: &'static str = "price_config";
}

fn trim_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
