//! Staff Model

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    /// Cast member (キャスト)
    #[default]
    Cast,
    /// Floor/back-office staff
    Staff,
}

fn default_true() -> bool {
    true
}

/// Staff member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    pub id: String,
    /// Staff code (e.g. "S001")
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub role: StaffRole,
    #[serde(default = "default_true")]
    pub active: bool,
}
