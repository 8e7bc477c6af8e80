//! Store Settings Model

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Where the rounding unit is applied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingLevel {
    /// Snap only the final total; components are left untouched
    #[default]
    Ticket,
    /// Snap each line's base amount before summation
    Line,
}

/// Direction used when snapping to the rounding unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMethod {
    /// Round half away from zero
    #[default]
    Round,
    Ceil,
    Floor,
}

fn default_rounding_unit() -> i64 {
    100
}

/// Ticket rounding policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundingRule {
    #[serde(default)]
    pub level: RoundingLevel,
    #[serde(default)]
    pub method: RoundingMethod,
    /// Yen unit amounts are snapped to; `unit <= 1` disables snapping
    #[serde(default = "default_rounding_unit")]
    pub unit: i64,
}

impl Default for RoundingRule {
    fn default() -> Self {
        Self {
            level: RoundingLevel::Ticket,
            method: RoundingMethod::Round,
            unit: 100,
        }
    }
}

fn default_service_fee_rate() -> f64 {
    0.20
}

fn default_tax_rate() -> f64 {
    0.10
}

/// Venue-wide pricing configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    /// Service charge fraction of the serviceable base, in [0, 1]
    #[serde(default = "default_service_fee_rate")]
    pub service_fee_rate: f64,
    /// Consumption tax fraction, in [0, 1]
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(default)]
    pub rounding: RoundingRule,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_fee_rate: 0.20,
            tax_rate: 0.10,
            rounding: RoundingRule::default(),
        }
    }
}

impl PricingConfig {
    /// Reject rates outside [0, 1] and non-positive rounding units
    pub fn validate(&self) -> AppResult<()> {
        if !self.service_fee_rate.is_finite() || !(0.0..=1.0).contains(&self.service_fee_rate) {
            return Err(AppError::validation(format!(
                "service_fee_rate must be between 0 and 1, got {}",
                self.service_fee_rate
            )));
        }
        if !self.tax_rate.is_finite() || !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(AppError::validation(format!(
                "tax_rate must be between 0 and 1, got {}",
                self.tax_rate
            )));
        }
        if self.rounding.unit < 1 {
            return Err(AppError::validation(format!(
                "rounding unit must be positive, got {}",
                self.rounding.unit
            )));
        }
        Ok(())
    }
}

/// Store settings (singleton)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub receipt_footer: String,
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_name: "Club Night+".to_string(),
            currency: "JPY".to_string(),
            receipt_footer: "ご来店ありがとうございました。".to_string(),
            pricing: PricingConfig::default(),
        }
    }
}
