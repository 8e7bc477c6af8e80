//! CSV export (帳票出力)
//!
//! Flat files for the accountant: one row per settled ticket and one
//! row per attendance record. Fields with commas, quotes, or newlines
//! get RFC 4180 quoting; everything else is written bare.

use chrono::{DateTime, Local, Utc};
use shared::error::AppResult;
use shared::models::Ticket;

use crate::storage::DeskStorage;
use crate::tickets::ticket_totals;

const TICKETS_HEADER: &str =
    "ticket_id,opened_at,closed_at,seat,customer,staff_id,payment_method,subtotal,service_fee,tax,total";
const ATTENDANCE_HEADER: &str = "staff_id,staff_name,clock_in,clock_out,worked_minutes";

/// CSV builder over the desk storage
#[derive(Clone)]
pub struct CsvExport {
    storage: DeskStorage,
}

impl CsvExport {
    pub fn with_storage(storage: DeskStorage) -> Self {
        Self { storage }
    }

    /// Settled tickets with their priced totals, oldest first
    pub fn tickets_csv(&self) -> AppResult<String> {
        let config = self.storage.load_settings()?.pricing;

        let mut tickets: Vec<Ticket> = self
            .storage
            .all_tickets()?
            .into_iter()
            .filter(Ticket::is_paid)
            .collect();
        tickets.sort_by(|a, b| a.closed_at.cmp(&b.closed_at).then(a.id.cmp(&b.id)));

        let mut out = String::from(TICKETS_HEADER);
        out.push('\n');
        for ticket in &tickets {
            let totals = ticket_totals(ticket, &config)?;
            let row = [
                quote(&ticket.id),
                timestamp(Some(ticket.opened_at)),
                timestamp(ticket.closed_at),
                quote(ticket.seat.as_deref().unwrap_or("")),
                quote(ticket.customer_name.as_deref().unwrap_or("")),
                quote(ticket.staff_id.as_deref().unwrap_or("")),
                method_label(ticket.payment_method).to_string(),
                totals.subtotal.to_string(),
                totals.service_fee.to_string(),
                totals.tax.to_string(),
                totals.total.to_string(),
            ];
            out.push_str(&row.join(","));
            out.push('\n');
        }
        Ok(out)
    }

    /// All attendance records, oldest clock-in first
    pub fn attendance_csv(&self) -> AppResult<String> {
        let staff: std::collections::HashMap<String, String> = self
            .storage
            .all_staff()?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let mut records = self.storage.all_attendance()?;
        records.sort_by(|a, b| a.clock_in.cmp(&b.clock_in));

        let mut out = String::from(ATTENDANCE_HEADER);
        out.push('\n');
        for record in &records {
            let name = staff.get(&record.staff_id).map(String::as_str).unwrap_or("");
            let row = [
                quote(&record.staff_id),
                quote(name),
                timestamp(Some(record.clock_in)),
                timestamp(record.clock_out),
                record.worked_minutes().to_string(),
            ];
            out.push_str(&row.join(","));
            out.push('\n');
        }
        Ok(out)
    }
}

/// Wire-format label, matching the JSON representation
fn method_label(method: shared::models::PaymentMethod) -> &'static str {
    use shared::models::PaymentMethod::*;
    match method {
        Cash => "CASH",
        Card => "CARD",
        Invoice => "INVOICE",
    }
}

/// Local wall-clock timestamp, empty when unset
fn timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => String::new(),
    }
}

/// RFC 4180 field quoting, applied only when needed
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
