//! Pricing engine
//!
//! Computes a ticket's money pipeline: line base amounts → subtotal →
//! service fee → tax → final total, under the venue's [`PricingConfig`].
//!
//! Two asymmetries are deliberate and must stay exactly as they are,
//! matching the venue's paper-ledger convention:
//! - the service fee **rounds half-up** while the tax **truncates**;
//! - with ticket-level rounding only the final total is snapped to the
//!   rounding unit, so the displayed components need not sum to it.
//!
//! All amounts are integer yen. Rate multiplication goes through
//! `rust_decimal`; money never touches bare float arithmetic.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    DEFAULT_UNIT_MINUTES, PricingConfig, PricingMode, RoundingLevel, RoundingMethod, TicketLine,
};

/// Maximum allowed unit price per line (¥10,000,000)
pub const MAX_PRICE: i64 = 10_000_000;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: u32 = 9999;

/// Computed totals for one ticket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTotals {
    pub subtotal: i64,
    pub service_fee: i64,
    pub tax: i64,
    pub total: i64,
}

/// Validate a ticket line before pricing
///
/// Quantity is unsigned by construction, so "negative quantity" is
/// unrepresentable; zero and oversized values are still rejected here.
///
/// The price cap applies to catalog lines only. Synthetic lines (empty
/// `menu_id`) carry an equal-split share of an already-validated ticket
/// total, which can legitimately exceed any single catalog price.
pub fn validate_line(line: &TicketLine) -> AppResult<()> {
    if line.unit_price < 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("unit price must be non-negative, got {}", line.unit_price),
        )
        .with_detail("line_id", line.line_id.clone()));
    }
    if !line.menu_id.is_empty() && line.unit_price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!(
                "unit price exceeds maximum allowed ({}), got {}",
                MAX_PRICE, line.unit_price
            ),
        )
        .with_detail("line_id", line.line_id.clone()));
    }
    if line.quantity == 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            "quantity must be positive, got 0",
        )
        .with_detail("line_id", line.line_id.clone()));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!(
                "quantity exceeds maximum allowed ({}), got {}",
                MAX_QUANTITY, line.quantity
            ),
        )
        .with_detail("line_id", line.line_id.clone()));
    }
    Ok(())
}

/// Base amount of one line in yen
///
/// Fixed lines bill `price × quantity`. Per-unit lines bill
/// `price × ceil(elapsed / unit_minutes)`; with no check-out yet the
/// elapsed time is zero and the line bills zero.
pub fn line_base_amount(line: &TicketLine, elapsed_minutes: i64) -> i64 {
    match line.pricing {
        PricingMode::Fixed => line.unit_price * i64::from(line.quantity),
        PricingMode::PerUnit => {
            let window = if line.unit_minutes == 0 {
                i64::from(DEFAULT_UNIT_MINUTES)
            } else {
                i64::from(line.unit_minutes)
            };
            let elapsed = elapsed_minutes.max(0);
            let units = (elapsed + window - 1) / window;
            line.unit_price * units
        }
    }
}

/// Convert a configured rate to Decimal
///
/// Rates are pre-validated finite via `PricingConfig::validate()`. If a
/// non-finite value somehow reaches here, log and fall back to zero
/// rather than corrupting a monetary calculation.
#[inline]
fn rate_decimal(rate: f64) -> Decimal {
    Decimal::from_f64(rate).unwrap_or_else(|| {
        tracing::error!(rate = ?rate, "Non-finite rate in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Multiply an amount by a rate, rounding half away from zero
fn apply_rate_half_up(amount: i64, rate: f64) -> i64 {
    (Decimal::from(amount) * rate_decimal(rate))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Multiply an amount by a rate, truncating toward zero
fn apply_rate_truncate(amount: i64, rate: f64) -> i64 {
    (Decimal::from(amount) * rate_decimal(rate))
        .trunc()
        .to_i64()
        .unwrap_or(0)
}

/// Snap a non-negative amount to a multiple of `unit`
///
/// `unit <= 1` is a no-op: every integer amount already sits on the grid.
pub fn round_to_unit(amount: i64, method: RoundingMethod, unit: i64) -> i64 {
    if unit <= 1 {
        return amount;
    }
    match method {
        RoundingMethod::Round => ((amount + unit / 2).div_euclid(unit)) * unit,
        RoundingMethod::Ceil => ((amount + unit - 1).div_euclid(unit)) * unit,
        RoundingMethod::Floor => (amount.div_euclid(unit)) * unit,
    }
}

/// Compute a ticket's totals
///
/// Pure function of its inputs: lines, venue pricing config, and the
/// elapsed seated minutes (used only by per-unit lines).
///
/// Pipeline:
/// 1. base amount per line (line-level rounding snaps each base here)
/// 2. `subtotal` = Σ base
/// 3. `service_fee` = half-up(serviceable base × service_fee_rate)
/// 4. `tax` = truncate((taxable base + service_fee) × tax_rate) —
///    the service fee is itself taxable
/// 5. `total` = subtotal + fee + tax, snapped to the rounding unit when
///    the rounding level is TICKET
pub fn compute_totals(
    lines: &[TicketLine],
    config: &PricingConfig,
    elapsed_minutes: i64,
) -> AppResult<TicketTotals> {
    config.validate()?;

    let mut subtotal: i64 = 0;
    let mut service_base: i64 = 0;
    let mut taxable_base: i64 = 0;

    let line_rounding = config.rounding.level == RoundingLevel::Line;

    for line in lines {
        validate_line(line)?;
        let mut base = line_base_amount(line, elapsed_minutes);
        if line_rounding {
            base = round_to_unit(base, config.rounding.method, config.rounding.unit);
        }
        subtotal += base;
        if line.serviceable {
            service_base += base;
        }
        if line.taxable {
            taxable_base += base;
        }
    }

    let service_fee = apply_rate_half_up(service_base, config.service_fee_rate);
    let tax = apply_rate_truncate(taxable_base + service_fee, config.tax_rate);

    let mut total = subtotal + service_fee + tax;
    if config.rounding.level == RoundingLevel::Ticket {
        total = round_to_unit(total, config.rounding.method, config.rounding.unit);
    }

    Ok(TicketTotals {
        subtotal,
        service_fee,
        tax,
        total,
    })
}

#[cfg(test)]
mod tests;
