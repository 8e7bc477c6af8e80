//! Ticket manager
//!
//! All ticket mutations go through here: open, line operations,
//! check-out, settlement, equal split, and line transfer. Every
//! operation is one synchronous storage update; multi-ticket operations
//! (split, transfer) commit atomically via `put_tickets`.

use crate::pricing::{self, TicketTotals};
use crate::storage::DeskStorage;
use crate::tickets::sequence;
use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    MenuItem, PaymentMethod, PricingConfig, PricingMode, Ticket, TicketInfoUpdate, TicketLine,
    TicketStatus,
};

/// Allowed range for equal split
const MIN_SPLIT: u32 = 2;
const MAX_SPLIT: u32 = 20;

/// Display name for synthetic equal-split lines
const SPLIT_LINE_NAME: &str = "割り勘";

/// Ticket manager over the desk storage
#[derive(Clone)]
pub struct TicketManager {
    storage: DeskStorage,
}

impl TicketManager {
    pub fn with_storage(storage: DeskStorage) -> Self {
        Self { storage }
    }

    // ==================== Lookup ====================

    pub fn get(&self, ticket_id: &str) -> AppResult<Ticket> {
        self.storage
            .get_ticket(ticket_id)?
            .ok_or_else(|| {
                AppError::new(ErrorCode::TicketNotFound).with_detail("ticket_id", ticket_id)
            })
    }

    pub fn all(&self) -> AppResult<Vec<Ticket>> {
        Ok(self.storage.all_tickets()?)
    }

    fn ensure_open(ticket: &Ticket) -> AppResult<()> {
        if ticket.is_paid() {
            return Err(AppError::new(ErrorCode::TicketAlreadyPaid)
                .with_detail("ticket_id", ticket.id.clone()));
        }
        Ok(())
    }

    // ==================== Lifecycle ====================

    /// Open a new empty ticket with the next sequenced id for today
    pub fn open_ticket(&self, seat: Option<String>) -> AppResult<Ticket> {
        let existing = self.storage.all_tickets()?;
        let ticket = Ticket {
            id: sequence::next_ticket_id(&existing),
            seat,
            customer_name: None,
            staff_id: None,
            lines: vec![],
            opened_at: Utc::now(),
            closed_at: None,
            status: TicketStatus::Open,
            payment_method: PaymentMethod::Cash,
            memo: None,
        };
        self.storage.put_ticket(&ticket)?;
        tracing::info!(ticket_id = %ticket.id, "Ticket opened");
        Ok(ticket)
    }

    /// Update header fields (seat, customer, staff, memo)
    pub fn update_info(&self, ticket_id: &str, update: TicketInfoUpdate) -> AppResult<Ticket> {
        let mut ticket = self.get(ticket_id)?;
        Self::ensure_open(&ticket)?;
        if let Some(seat) = update.seat {
            ticket.seat = Some(seat);
        }
        if let Some(name) = update.customer_name {
            ticket.customer_name = Some(name);
        }
        if let Some(staff_id) = update.staff_id {
            ticket.staff_id = Some(staff_id);
        }
        if let Some(memo) = update.memo {
            ticket.memo = Some(memo);
        }
        self.storage.put_ticket(&ticket)?;
        Ok(ticket)
    }

    /// Record the intended payment method ahead of settlement
    pub fn set_payment_method(&self, ticket_id: &str, method: PaymentMethod) -> AppResult<Ticket> {
        let mut ticket = self.get(ticket_id)?;
        Self::ensure_open(&ticket)?;
        ticket.payment_method = method;
        self.storage.put_ticket(&ticket)?;
        Ok(ticket)
    }

    /// Stamp the check-out time, fixing the billable window for
    /// time-based lines
    pub fn check_out_at(&self, ticket_id: &str, at: DateTime<Utc>) -> AppResult<Ticket> {
        let mut ticket = self.get(ticket_id)?;
        Self::ensure_open(&ticket)?;
        ticket.closed_at = Some(at);
        self.storage.put_ticket(&ticket)?;
        Ok(ticket)
    }

    pub fn check_out(&self, ticket_id: &str) -> AppResult<Ticket> {
        self.check_out_at(ticket_id, Utc::now())
    }

    /// Settle the ticket: one-way transition to PAID
    ///
    /// Settling an already paid ticket is a logged no-op, not an error.
    pub fn settle(&self, ticket_id: &str, method: PaymentMethod) -> AppResult<Ticket> {
        let mut ticket = self.get(ticket_id)?;
        if ticket.is_paid() {
            tracing::warn!(ticket_id = %ticket.id, "Settle ignored: ticket already paid");
            return Ok(ticket);
        }
        if ticket.closed_at.is_none() {
            ticket.closed_at = Some(Utc::now());
        }
        ticket.payment_method = method;
        ticket.status = TicketStatus::Paid;
        self.storage.put_ticket(&ticket)?;
        tracing::info!(ticket_id = %ticket.id, method = ?method, "Ticket settled");
        Ok(ticket)
    }

    // ==================== Line operations ====================

    /// Add a line from a catalog entry
    pub fn add_line(&self, ticket_id: &str, item: &MenuItem, quantity: u32) -> AppResult<Ticket> {
        let mut ticket = self.get(ticket_id)?;
        Self::ensure_open(&ticket)?;

        let line = TicketLine::from_menu_item(item, quantity);
        pricing::validate_line(&line)?;
        ticket.lines.push(line);
        self.storage.put_ticket(&ticket)?;
        Ok(ticket)
    }

    pub fn update_quantity(
        &self,
        ticket_id: &str,
        line_id: &str,
        quantity: u32,
    ) -> AppResult<Ticket> {
        let mut ticket = self.get(ticket_id)?;
        Self::ensure_open(&ticket)?;

        let line = ticket
            .lines
            .iter_mut()
            .find(|l| l.line_id == line_id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::TicketLineNotFound).with_detail("line_id", line_id)
            })?;
        line.quantity = quantity;
        pricing::validate_line(line)?;
        self.storage.put_ticket(&ticket)?;
        Ok(ticket)
    }

    pub fn remove_line(&self, ticket_id: &str, line_id: &str) -> AppResult<Ticket> {
        let mut ticket = self.get(ticket_id)?;
        Self::ensure_open(&ticket)?;

        let before = ticket.lines.len();
        ticket.lines.retain(|l| l.line_id != line_id);
        if ticket.lines.len() == before {
            return Err(
                AppError::new(ErrorCode::TicketLineNotFound).with_detail("line_id", line_id)
            );
        }
        self.storage.put_ticket(&ticket)?;
        Ok(ticket)
    }

    // ==================== Totals ====================

    /// Price the ticket under the stored venue settings
    pub fn totals(&self, ticket_id: &str) -> AppResult<TicketTotals> {
        let ticket = self.get(ticket_id)?;
        let config = self.storage.load_settings()?.pricing;
        ticket_totals(&ticket, &config)
    }

    // ==================== Split / transfer ====================

    /// Split the ticket's total equally across `count` tickets
    ///
    /// `per = floor(total / count)`; the original ticket absorbs the
    /// remainder, so the shares sum to exactly the pre-split total. The
    /// original's lines are replaced by one synthetic share line; the
    /// other `count - 1` shares go onto freshly opened tickets.
    pub fn equal_split(&self, ticket_id: &str, count: u32) -> AppResult<Vec<Ticket>> {
        if !(MIN_SPLIT..=MAX_SPLIT).contains(&count) {
            return Err(AppError::new(ErrorCode::SplitCountInvalid)
                .with_detail("count", count)
                .with_detail("min", MIN_SPLIT)
                .with_detail("max", MAX_SPLIT));
        }

        let mut original = self.get(ticket_id)?;
        Self::ensure_open(&original)?;
        if original.lines.is_empty() {
            return Err(
                AppError::new(ErrorCode::TicketEmpty).with_detail("ticket_id", ticket_id)
            );
        }

        let config = self.storage.load_settings()?.pricing;
        let total = ticket_totals(&original, &config)?.total;

        let per = total / i64::from(count);
        let remainder = total - per * i64::from(count);

        original.lines = vec![split_line(per + remainder)];

        let mut existing = self.storage.all_tickets()?;
        let mut batch = vec![original];
        for _ in 1..count {
            let share = Ticket {
                id: sequence::next_ticket_id(&existing),
                seat: batch[0].seat.clone(),
                customer_name: None,
                staff_id: batch[0].staff_id.clone(),
                lines: vec![split_line(per)],
                opened_at: batch[0].opened_at,
                closed_at: batch[0].closed_at,
                status: TicketStatus::Open,
                payment_method: PaymentMethod::Cash,
                memo: None,
            };
            existing.push(share.clone());
            batch.push(share);
        }

        self.storage.put_tickets(&batch)?;
        tracing::info!(ticket_id, count, total, per, remainder, "Ticket split equally");
        Ok(batch)
    }

    /// Move the last line of `from` onto `to`, verbatim
    pub fn transfer_last_line(&self, from_id: &str, to_id: &str) -> AppResult<(Ticket, Ticket)> {
        if from_id == to_id {
            return Err(AppError::invalid_request(
                "cannot transfer a line onto the same ticket",
            ));
        }
        let mut from = self.get(from_id)?;
        let mut to = self.get(to_id)?;
        Self::ensure_open(&from)?;
        Self::ensure_open(&to)?;

        let line = from.lines.pop().ok_or_else(|| {
            AppError::new(ErrorCode::TicketEmpty).with_detail("ticket_id", from_id)
        })?;
        to.lines.push(line);

        self.storage
            .put_tickets(&[from.clone(), to.clone()])?;
        tracing::info!(from_id, to_id, "Last line transferred");
        Ok((from, to))
    }
}

/// Price a ticket under the given config
///
/// Tickets consisting solely of synthetic split lines are priced
/// without the ticket-level snap: their amounts came out of an
/// already-rounded total and must re-total to exactly their share.
pub(crate) fn ticket_totals(ticket: &Ticket, config: &PricingConfig) -> AppResult<TicketTotals> {
    let mut config = *config;
    if !ticket.lines.is_empty() && ticket.lines.iter().all(|l| l.menu_id.is_empty()) {
        config.rounding.unit = 1;
    }
    pricing::compute_totals(&ticket.lines, &config, ticket.elapsed_minutes())
}

/// Synthetic fee- and tax-exempt line carrying one equal-split share
fn split_line(amount: i64) -> TicketLine {
    TicketLine {
        line_id: uuid::Uuid::new_v4().to_string(),
        menu_id: String::new(),
        name: SPLIT_LINE_NAME.to_string(),
        unit_price: amount,
        quantity: 1,
        serviceable: false,
        taxable: false,
        pricing: PricingMode::Fixed,
        unit_minutes: shared::models::DEFAULT_UNIT_MINUTES,
    }
}
