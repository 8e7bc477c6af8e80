//! Shared types for the Night Desk POS
//!
//! Domain models and error types used across the desk core and any
//! front-end embedding it: menu catalog entries, tickets and their
//! lines, staff, attendance records, and store settings.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
