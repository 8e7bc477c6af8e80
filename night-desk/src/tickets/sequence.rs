//! Ticket ID sequencing (採番: T-YYYYMMDD-###)
//!
//! Ids are date-scoped: the prefix carries the local calendar date and
//! the 3-digit suffix counts up within that day. There is no stored
//! counter; the next number is re-derived from the tickets currently
//! present, so the day rollover happens implicitly when the prefix
//! changes.

use chrono::{Local, NaiveDate};
use shared::models::Ticket;

const TICKET_PREFIX: &str = "T-";
const SUFFIX_WIDTH: usize = 3;

/// Next ticket id for today's local date
///
/// Known limitation: because the scan only sees currently present
/// tickets, deleting the day's highest-numbered ticket lets its number
/// be issued again. Uniqueness holds among present tickets, not across
/// everything ever issued.
pub fn next_ticket_id(existing: &[Ticket]) -> String {
    next_ticket_id_on(existing, Local::now().date_naive())
}

/// Next ticket id for an explicit date
///
/// Ids with a different date prefix or a non-numeric suffix are
/// skipped, never fatal.
pub fn next_ticket_id_on(existing: &[Ticket], date: NaiveDate) -> String {
    let prefix = format!("{}{}-", TICKET_PREFIX, date.format("%Y%m%d"));

    let max = existing
        .iter()
        .filter_map(|t| t.id.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    // Width overflow past 999 widens the field rather than truncating
    format!("{}{:0width$}", prefix, max + 1, width = SUFFIX_WIDTH)
}
