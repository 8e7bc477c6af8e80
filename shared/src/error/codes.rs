//! Unified error codes for the Night Desk POS
//!
//! Error codes are shared between the desk core and any embedding
//! front-end. They are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Ticket errors
//! - 6xxx: Menu errors
//! - 8xxx: Staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Ticket ====================
    /// Ticket not found
    TicketNotFound = 4001,
    /// Ticket has already been paid
    TicketAlreadyPaid = 4002,
    /// Ticket line not found
    TicketLineNotFound = 4003,
    /// Ticket has no lines
    TicketEmpty = 4004,
    /// Split count outside the allowed range
    SplitCountInvalid = 4005,
    /// Quantity must be positive and within bounds
    InvalidQuantity = 4006,
    /// Monetary amount is negative or out of bounds
    InvalidAmount = 4007,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has an invalid price
    MenuInvalidPrice = 6002,
    /// Menu import document is malformed
    MenuImportInvalid = 6003,

    // ==================== 8xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 8001,
    /// Staff member is already clocked in
    AlreadyClockedIn = 8002,
    /// Staff member has no open attendance record
    NotClockedIn = 8003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",

            // Ticket
            ErrorCode::TicketNotFound => "Ticket not found",
            ErrorCode::TicketAlreadyPaid => "Ticket has already been paid",
            ErrorCode::TicketLineNotFound => "Ticket line not found",
            ErrorCode::TicketEmpty => "Ticket has no lines",
            ErrorCode::SplitCountInvalid => "Split count outside the allowed range",
            ErrorCode::InvalidQuantity => "Quantity must be positive and within bounds",
            ErrorCode::InvalidAmount => "Monetary amount is negative or out of bounds",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuInvalidPrice => "Menu item has an invalid price",
            ErrorCode::MenuImportInvalid => "Menu import document is malformed",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::AlreadyClockedIn => "Staff member is already clocked in",
            ErrorCode::NotClockedIn => "Staff member has no open attendance record",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),

            // Ticket
            4001 => Ok(ErrorCode::TicketNotFound),
            4002 => Ok(ErrorCode::TicketAlreadyPaid),
            4003 => Ok(ErrorCode::TicketLineNotFound),
            4004 => Ok(ErrorCode::TicketEmpty),
            4005 => Ok(ErrorCode::SplitCountInvalid),
            4006 => Ok(ErrorCode::InvalidQuantity),
            4007 => Ok(ErrorCode::InvalidAmount),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuInvalidPrice),
            6003 => Ok(ErrorCode::MenuImportInvalid),

            // Staff
            8001 => Ok(ErrorCode::StaffNotFound),
            8002 => Ok(ErrorCode::AlreadyClockedIn),
            8003 => Ok(ErrorCode::NotClockedIn),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::TicketAlreadyPaid,
            ErrorCode::SplitCountInvalid,
            ErrorCode::MenuImportInvalid,
            ErrorCode::NotClockedIn,
            ErrorCode::DatabaseError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code_rejected() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
        assert_eq!(ErrorCode::try_from(5001), Err(InvalidErrorCode(5001)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::TicketAlreadyPaid).unwrap();
        assert_eq!(json, "4002");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::TicketAlreadyPaid);
    }
}
