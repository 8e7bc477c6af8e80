//! Ticket Model (伝票)

use super::menu_item::{DEFAULT_UNIT_MINUTES, MenuItem, PricingMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticket status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    /// Terminal state: settled tickets accept no further line mutation
    Paid,
}

/// Payment method recorded at settlement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Invoice,
}

fn default_true() -> bool {
    true
}

fn default_quantity() -> u32 {
    1
}

fn default_unit_minutes() -> u32 {
    DEFAULT_UNIT_MINUTES
}

/// One order line on a ticket
///
/// Snapshots the menu fields it depends on, so later catalog edits do
/// not reprice lines already on a ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketLine {
    /// Unique within the ticket
    pub line_id: String,
    /// Source catalog entry, empty for synthetic lines (split shares)
    #[serde(default)]
    pub menu_id: String,
    pub name: String,
    /// Unit price in yen
    pub unit_price: i64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub serviceable: bool,
    #[serde(default = "default_true")]
    pub taxable: bool,
    #[serde(default)]
    pub pricing: PricingMode,
    #[serde(default = "default_unit_minutes")]
    pub unit_minutes: u32,
}

impl TicketLine {
    /// Snapshot a catalog entry into a new line
    pub fn from_menu_item(item: &MenuItem, quantity: u32) -> Self {
        Self {
            line_id: uuid::Uuid::new_v4().to_string(),
            menu_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            serviceable: item.serviceable,
            taxable: item.taxable,
            pricing: item.pricing,
            unit_minutes: item.unit_minutes,
        }
    }
}

/// One customer tab, from open to settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// `T-YYYYMMDD-NNN`, date-scoped sequential
    pub id: String,
    pub seat: Option<String>,
    pub customer_name: Option<String>,
    /// Attending staff member
    pub staff_id: Option<String>,
    /// Insertion order is meaningful: the last line is the transfer target
    #[serde(default)]
    pub lines: Vec<TicketLine>,
    /// Check-in time
    pub opened_at: DateTime<Utc>,
    /// Check-out time, unset while the guest is still seated
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub memo: Option<String>,
}

/// Update ticket header fields payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TicketInfoUpdate {
    pub seat: Option<String>,
    pub customer_name: Option<String>,
    pub staff_id: Option<String>,
    pub memo: Option<String>,
}

impl Ticket {
    pub fn is_paid(&self) -> bool {
        self.status == TicketStatus::Paid
    }

    /// Minutes between check-in and check-out, rounded to the nearest
    /// minute. Zero while the ticket has no check-out time, which makes
    /// unclosed time-based lines bill at zero.
    pub fn elapsed_minutes(&self) -> i64 {
        match self.closed_at {
            Some(closed) => {
                let secs = (closed - self.opened_at).num_seconds();
                ((secs + 30) / 60).max(0)
            }
            None => 0,
        }
    }
}
