//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Default billing window for time-based items (minutes)
pub const DEFAULT_UNIT_MINUTES: u32 = 60;

/// Billing mode for a menu item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingMode {
    /// Price × quantity
    #[default]
    Fixed,
    /// Price × ceil(elapsed minutes / unit minutes), for time-billed items
    PerUnit,
}

fn default_true() -> bool {
    true
}

fn default_unit_minutes() -> u32 {
    DEFAULT_UNIT_MINUTES
}

/// Menu catalog entry
///
/// Templates for order lines: the catalog is read-only input to order
/// entry, and a ticket line snapshots the fields it needs at add time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    /// Short code shown on keypads/receipts (e.g. "SET60")
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Unit price in yen
    pub price: i64,
    /// Included in the service-fee base
    #[serde(default = "default_true")]
    pub serviceable: bool,
    /// Included in the tax base
    #[serde(default = "default_true")]
    pub taxable: bool,
    #[serde(default)]
    pub pricing: PricingMode,
    /// Billing window for [`PricingMode::PerUnit`] items
    #[serde(default = "default_unit_minutes")]
    pub unit_minutes: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}
