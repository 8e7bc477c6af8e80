//! Sales dashboard aggregates (売上集計)
//!
//! Everything here reads settled tickets only: an open tab is not yet
//! revenue. Days are bucketed by the check-out date in local time, the
//! same calendar the ticket sequencer runs on.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;
use shared::models::{PricingConfig, Ticket};
use std::collections::HashMap;

use crate::storage::DeskStorage;
use crate::tickets::ticket_totals;

/// One day's settled sales
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailySales {
    pub date: NaiveDate,
    pub ticket_count: u32,
    pub total: i64,
}

/// One catalog entry's settled volume
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuRanking {
    pub menu_id: String,
    pub name: String,
    pub quantity: u32,
    /// Base amount across all settled lines, before fee and tax
    pub amount: i64,
}

/// Headline figures for the dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesKpi {
    pub ticket_count: u32,
    /// Sum of settled ticket totals
    pub gross_sales: i64,
    /// Gross sales over ticket count, floored; zero with no tickets
    pub average_spend: i64,
}

/// Report builder over the desk storage
#[derive(Clone)]
pub struct SalesReports {
    storage: DeskStorage,
}

impl SalesReports {
    pub fn with_storage(storage: DeskStorage) -> Self {
        Self { storage }
    }

    fn paid_tickets(&self) -> AppResult<Vec<Ticket>> {
        Ok(self
            .storage
            .all_tickets()?
            .into_iter()
            .filter(Ticket::is_paid)
            .collect())
    }

    /// Per-day totals, oldest day first
    pub fn daily_sales(&self) -> AppResult<Vec<DailySales>> {
        let config = self.storage.load_settings()?.pricing;
        let mut by_day: HashMap<NaiveDate, (u32, i64)> = HashMap::new();

        for ticket in self.paid_tickets()? {
            let day = settled_day(&ticket);
            let total = ticket_totals(&ticket, &config)?.total;
            let entry = by_day.entry(day).or_default();
            entry.0 += 1;
            entry.1 += total;
        }

        let mut days: Vec<DailySales> = by_day
            .into_iter()
            .map(|(date, (ticket_count, total))| DailySales {
                date,
                ticket_count,
                total,
            })
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }

    /// Best-selling catalog entries, by base amount then quantity
    ///
    /// Synthetic split lines carry no catalog id and are excluded.
    pub fn top_menu(&self, limit: usize) -> AppResult<Vec<MenuRanking>> {
        let mut by_menu: HashMap<String, MenuRanking> = HashMap::new();

        for ticket in self.paid_tickets()? {
            let elapsed = ticket.elapsed_minutes();
            for line in &ticket.lines {
                if line.menu_id.is_empty() {
                    continue;
                }
                let amount = crate::pricing::line_base_amount(line, elapsed);
                let entry = by_menu
                    .entry(line.menu_id.clone())
                    .or_insert_with(|| MenuRanking {
                        menu_id: line.menu_id.clone(),
                        name: line.name.clone(),
                        quantity: 0,
                        amount: 0,
                    });
                entry.quantity += line.quantity;
                entry.amount += amount;
            }
        }

        let mut ranking: Vec<MenuRanking> = by_menu.into_values().collect();
        ranking.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then(b.quantity.cmp(&a.quantity))
                .then(a.menu_id.cmp(&b.menu_id))
        });
        ranking.truncate(limit);
        Ok(ranking)
    }

    /// Headline figures across all settled tickets
    pub fn kpi(&self) -> AppResult<SalesKpi> {
        let config = self.storage.load_settings()?.pricing;
        self.kpi_with(&config)
    }

    fn kpi_with(&self, config: &PricingConfig) -> AppResult<SalesKpi> {
        let mut kpi = SalesKpi::default();
        for ticket in self.paid_tickets()? {
            kpi.ticket_count += 1;
            kpi.gross_sales += ticket_totals(&ticket, config)?.total;
        }
        if kpi.ticket_count > 0 {
            kpi.average_spend = kpi.gross_sales / i64::from(kpi.ticket_count);
        }
        Ok(kpi)
    }
}

/// Day a ticket's revenue belongs to: check-out date, local time
///
/// Settled tickets always carry a check-out stamp; the open-time
/// fallback only guards against hand-edited data.
fn settled_day(ticket: &Ticket) -> NaiveDate {
    ticket
        .closed_at
        .unwrap_or(ticket.opened_at)
        .with_timezone(&Local)
        .date_naive()
}
