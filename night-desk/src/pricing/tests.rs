use super::*;
use shared::models::RoundingRule;

fn line(price: i64, qty: u32) -> TicketLine {
    TicketLine {
        line_id: uuid::Uuid::new_v4().to_string(),
        menu_id: "m1".to_string(),
        name: "Item".to_string(),
        unit_price: price,
        quantity: qty,
        serviceable: true,
        taxable: true,
        pricing: PricingMode::Fixed,
        unit_minutes: DEFAULT_UNIT_MINUTES,
    }
}

fn per_unit_line(price: i64, unit_minutes: u32) -> TicketLine {
    TicketLine {
        pricing: PricingMode::PerUnit,
        unit_minutes,
        ..line(price, 1)
    }
}

fn default_config() -> PricingConfig {
    PricingConfig::default()
}

fn config_with_unit(unit: i64, method: RoundingMethod) -> PricingConfig {
    PricingConfig {
        rounding: RoundingRule {
            level: RoundingLevel::Ticket,
            method,
            unit,
        },
        ..PricingConfig::default()
    }
}

#[test]
fn test_bottle_example() {
    // ¥6000 bottle, 20% service, 10% tax, round total to nearest 100
    let totals = compute_totals(&[line(6000, 1)], &default_config(), 0).unwrap();
    assert_eq!(totals.subtotal, 6000);
    assert_eq!(totals.service_fee, 1200);
    assert_eq!(totals.tax, 720); // floor((6000 + 1200) * 0.1)
    assert_eq!(totals.total, 7900); // 7920 rounded to nearest 100
}

#[test]
fn test_empty_ticket_is_all_zero() {
    let totals = compute_totals(&[], &default_config(), 0).unwrap();
    assert_eq!(totals, TicketTotals::default());
}

#[test]
fn test_unit_one_disables_snapping() {
    let config = config_with_unit(1, RoundingMethod::Round);
    let totals = compute_totals(&[line(6000, 1)], &config, 0).unwrap();
    assert_eq!(totals.total, 7920);
}

#[test]
fn test_fee_rounds_half_up_tax_truncates() {
    // Service fee 1230 * 0.15 = 184.5 rounds up to 185; a truncating fee
    // would read 184. Tax (1230 + 185) * 0.1 = 141.5 truncates to 141.
    let config = PricingConfig {
        service_fee_rate: 0.15,
        rounding: RoundingRule {
            unit: 1,
            ..RoundingRule::default()
        },
        ..PricingConfig::default()
    };
    let totals = compute_totals(&[line(1230, 1)], &config, 0).unwrap();
    assert_eq!(totals.service_fee, 185);
    assert_eq!(totals.tax, 141);
}

#[test]
fn test_tax_truncates_toward_zero() {
    let config = PricingConfig {
        service_fee_rate: 0.0,
        rounding: RoundingRule {
            unit: 1,
            ..RoundingRule::default()
        },
        ..PricingConfig::default()
    };
    // 999 * 0.1 = 99.9 -> 99
    let totals = compute_totals(&[line(999, 1)], &config, 0).unwrap();
    assert_eq!(totals.service_fee, 0);
    assert_eq!(totals.tax, 99);
}

#[test]
fn test_non_serviceable_line_excluded_from_fee_base() {
    // 指名料 carries no service charge but is still taxed
    let nomination = TicketLine {
        serviceable: false,
        ..line(2000, 1)
    };
    let config = config_with_unit(1, RoundingMethod::Round);
    let totals = compute_totals(&[line(6000, 1), nomination], &config, 0).unwrap();
    assert_eq!(totals.subtotal, 8000);
    assert_eq!(totals.service_fee, 1200); // 6000 * 0.2 only
    assert_eq!(totals.tax, 920); // (8000 + 1200) * 0.1
}

#[test]
fn test_non_taxable_line_excluded_from_tax_base() {
    let untaxed = TicketLine {
        taxable: false,
        ..line(1000, 1)
    };
    let config = config_with_unit(1, RoundingMethod::Round);
    let totals = compute_totals(&[untaxed], &config, 0).unwrap();
    assert_eq!(totals.service_fee, 200);
    assert_eq!(totals.tax, 20); // the fee itself is still taxed
    assert_eq!(totals.total, 1220);
}

#[test]
fn test_per_unit_line_bills_by_elapsed_window() {
    let set = per_unit_line(3000, 60);
    let config = config_with_unit(1, RoundingMethod::Round);

    // No check-out yet: zero units, zero charge
    let totals = compute_totals(std::slice::from_ref(&set), &config, 0).unwrap();
    assert_eq!(totals.subtotal, 0);
    assert_eq!(totals.total, 0);

    // Exactly one window
    let totals = compute_totals(std::slice::from_ref(&set), &config, 60).unwrap();
    assert_eq!(totals.subtotal, 3000);

    // One minute over starts the next window
    let totals = compute_totals(std::slice::from_ref(&set), &config, 61).unwrap();
    assert_eq!(totals.subtotal, 6000);

    let totals = compute_totals(&[set], &config, 90).unwrap();
    assert_eq!(totals.subtotal, 6000);
}

#[test]
fn test_per_unit_zero_window_falls_back_to_sixty() {
    let set = per_unit_line(3000, 0);
    let config = config_with_unit(1, RoundingMethod::Round);
    let totals = compute_totals(&[set], &config, 120).unwrap();
    assert_eq!(totals.subtotal, 6000);
}

#[test]
fn test_negative_price_rejected() {
    let err = compute_totals(&[line(-100, 1)], &default_config(), 0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidAmount);
}

#[test]
fn test_zero_quantity_rejected() {
    let err = compute_totals(&[line(500, 0)], &default_config(), 0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidQuantity);
}

#[test]
fn test_oversized_price_rejected() {
    let err = compute_totals(&[line(MAX_PRICE + 1, 1)], &default_config(), 0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidAmount);
}

#[test]
fn test_synthetic_line_exempt_from_price_cap() {
    // Split shares carry a validated ticket total, not a catalog price
    let share = TicketLine {
        menu_id: String::new(),
        serviceable: false,
        taxable: false,
        ..line(MAX_PRICE + 1, 1)
    };
    let config = config_with_unit(1, RoundingMethod::Round);
    let totals = compute_totals(&[share], &config, 0).unwrap();
    assert_eq!(totals.total, MAX_PRICE + 1);

    let negative = TicketLine {
        menu_id: String::new(),
        ..line(-1, 1)
    };
    let err = compute_totals(&[negative], &config, 0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidAmount);
}

#[test]
fn test_invalid_config_rejected() {
    let config = PricingConfig {
        tax_rate: 1.5,
        ..PricingConfig::default()
    };
    let err = compute_totals(&[line(500, 1)], &config, 0).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[test]
fn test_total_always_multiple_of_unit() {
    let config = default_config();
    let cases: [&[TicketLine]; 4] = [
        &[],
        &[line(1, 1)],
        &[line(777, 3), line(42, 1)],
        &[line(6000, 1), line(800, 2), line(1200, 5)],
    ];
    for lines in cases {
        let totals = compute_totals(lines, &config, 0).unwrap();
        assert_eq!(totals.total % config.rounding.unit, 0);
        assert!(totals.subtotal >= 0);
        assert!(totals.service_fee >= 0);
        assert!(totals.tax >= 0);
    }
}

#[test]
fn test_total_covers_subtotal() {
    // With floor rounding the snap can eat up to unit-1 yen, never more
    // than the fee+tax added on top for these inputs
    let config = config_with_unit(100, RoundingMethod::Floor);
    let totals = compute_totals(&[line(777, 3), line(42, 1)], &config, 0).unwrap();
    assert!(totals.total >= totals.subtotal);
}

#[test]
fn test_ceil_and_floor_methods() {
    // 6000 -> raw total 7920
    let totals = compute_totals(
        &[line(6000, 1)],
        &config_with_unit(100, RoundingMethod::Ceil),
        0,
    )
    .unwrap();
    assert_eq!(totals.total, 8000);

    let totals = compute_totals(
        &[line(6000, 1)],
        &config_with_unit(100, RoundingMethod::Floor),
        0,
    )
    .unwrap();
    assert_eq!(totals.total, 7900);
}

#[test]
fn test_components_need_not_sum_to_snapped_total() {
    let totals = compute_totals(&[line(6000, 1)], &default_config(), 0).unwrap();
    assert_ne!(
        totals.subtotal + totals.service_fee + totals.tax,
        totals.total
    );
}

#[test]
fn test_line_level_rounding_snaps_bases_not_total() {
    let config = PricingConfig {
        service_fee_rate: 0.0,
        tax_rate: 0.0,
        rounding: RoundingRule {
            level: RoundingLevel::Line,
            method: RoundingMethod::Round,
            unit: 100,
        },
    };
    let totals = compute_totals(&[line(120, 1), line(230, 1)], &config, 0).unwrap();
    assert_eq!(totals.subtotal, 300); // 100 + 200
    assert_eq!(totals.total, 300);
}

#[test]
fn test_pure_function_idempotence() {
    let lines = [line(6000, 1), line(800, 2)];
    let config = default_config();
    let first = compute_totals(&lines, &config, 45).unwrap();
    let second = compute_totals(&lines, &config, 45).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_round_to_unit_half_up() {
    assert_eq!(round_to_unit(7950, RoundingMethod::Round, 100), 8000);
    assert_eq!(round_to_unit(7949, RoundingMethod::Round, 100), 7900);
    assert_eq!(round_to_unit(0, RoundingMethod::Round, 100), 0);
    assert_eq!(round_to_unit(7920, RoundingMethod::Round, 1), 7920);
    assert_eq!(round_to_unit(7920, RoundingMethod::Round, 0), 7920);
}
