//! Price computation for cut lumber, sheet goods and sale totals.
//!
//! Every computed price is rounded to the nearest multiple of 100 pesos.
//! This is a store-wide rule that also applies when a percentage update is
//! re-applied to an already-rounded price; the rounding then compounds, which
//! is accepted behaviour.

use crate::domain::sale::DeliveryType;

/// Conversion factor from inch x inch x meter to board feet ("pie tablar").
pub const BOARD_FEET_FACTOR: f64 = 0.2734;

/// Surcharge applied when a cut is planed ("cepillado").
pub const PLANING_SURCHARGE: f64 = 0.066;

/// Round a raw price to the nearest multiple of 100 pesos.
pub fn round_to_hundreds(value: f64) -> i64 {
    (value / 100.0).round() as i64 * 100
}

/// Price of a lumber cut: `factor x height x width x length x price_per_foot`,
/// rounded to hundreds. Height and width are in inches, length in meters.
///
/// Returns 0 when any dimension or the price per foot is zero or negative.
pub fn cut_price(height: f64, width: f64, length: f64, price_per_foot: f64) -> i64 {
    if height <= 0.0 || width <= 0.0 || length <= 0.0 || price_per_foot <= 0.0 {
        return 0;
    }
    round_to_hundreds(BOARD_FEET_FACTOR * height * width * length * price_per_foot)
}

/// Apply the planing surcharge to an already-rounded base price and re-round.
pub fn apply_planing(base: i64) -> i64 {
    round_to_hundreds(base as f64 * (1.0 + PLANING_SURCHARGE))
}

/// Price of a sheet good cut by area, in square meters.
pub fn sheet_price(width: f64, length: f64, price_per_m2: f64) -> i64 {
    if width <= 0.0 || length <= 0.0 || price_per_m2 <= 0.0 {
        return 0;
    }
    round_to_hundreds(width * length * price_per_m2)
}

/// Price of a strip or moulding cut by linear meter.
pub fn strip_price(length: f64, price_per_m: f64) -> i64 {
    if length <= 0.0 || price_per_m <= 0.0 {
        return 0;
    }
    round_to_hundreds(length * price_per_m)
}

/// Re-price a catalog entry by a percentage and round back to hundreds.
pub fn increase_price(price: i64, percent: f64) -> i64 {
    round_to_hundreds(price as f64 * (1.0 + percent / 100.0))
}

/// Gross amount of a line before discount.
pub fn line_gross(unit_price: i64, quantity: f64) -> i64 {
    (unit_price as f64 * quantity).round() as i64
}

/// Discount amount of a line, from its gross and a percentage.
pub fn line_discount(gross: i64, discount_percent: f64) -> i64 {
    (gross as f64 * discount_percent / 100.0).round() as i64
}

/// Final amount of a sale: `subtotal - discount_total + shipping_cost`.
///
/// The shipping cost is forced to zero for local pickup, regardless of any
/// value previously entered on the form.
pub fn order_total(
    subtotal: i64,
    discount_total: i64,
    shipping_cost: i64,
    delivery_type: DeliveryType,
) -> i64 {
    let shipping = match delivery_type {
        DeliveryType::LocalPickup => 0,
        DeliveryType::HomeDelivery => shipping_cost,
    };
    subtotal - discount_total + shipping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_hundreds_handles_both_directions() {
        assert_eq!(round_to_hundreds(27.34), 0);
        assert_eq!(round_to_hundreds(49.9), 0);
        assert_eq!(round_to_hundreds(50.0), 100);
        assert_eq!(round_to_hundreds(109.36), 100);
        assert_eq!(round_to_hundreds(149.9), 100);
        assert_eq!(round_to_hundreds(150.0), 200);
        assert_eq!(round_to_hundreds(28782.0), 28800);
    }

    #[test]
    fn cut_price_rounds_to_nearest_hundred() {
        // raw 0.2734 x 1 x 1 x 1 x 100 = 27.34
        assert_eq!(cut_price(1.0, 1.0, 1.0, 100.0), 0);
        // raw 109.36 rounds down to 100
        assert_eq!(cut_price(1.0, 1.0, 1.0, 400.0), 100);
        // raw 2.0 x 3.0 x 2.5 x 850 x 0.2734 = 3485.85
        assert_eq!(cut_price(2.0, 3.0, 2.5, 850.0), 3500);
    }

    #[test]
    fn cut_price_guards_each_parameter_independently() {
        assert_eq!(cut_price(0.0, 1.0, 1.0, 100.0), 0);
        assert_eq!(cut_price(1.0, 0.0, 1.0, 100.0), 0);
        assert_eq!(cut_price(1.0, 1.0, 0.0, 100.0), 0);
        assert_eq!(cut_price(1.0, 1.0, 1.0, 0.0), 0);
        assert_eq!(cut_price(-1.0, 1.0, 1.0, 100.0), 0);
        assert_eq!(cut_price(1.0, -1.0, 1.0, 100.0), 0);
        assert_eq!(cut_price(1.0, 1.0, -1.0, 100.0), 0);
        assert_eq!(cut_price(1.0, 1.0, 1.0, -100.0), 0);
    }

    #[test]
    fn small_dimension_cut_rounds_to_zero() {
        // raw 0.2734 x 2 x 0.1 x 3 x 50 = 8.202
        assert_eq!(cut_price(2.0, 0.1, 3.0, 50.0), 0);
    }

    #[test]
    fn planing_surcharge_is_re_rounded() {
        assert_eq!(apply_planing(1000), 1100); // 1066
        assert_eq!(apply_planing(10000), 10700); // 10660
        assert_eq!(apply_planing(27000), 28800); // 28782
        assert_eq!(apply_planing(0), 0);
    }

    #[test]
    fn sheet_and_strip_prices_guard_non_positive_inputs() {
        assert_eq!(sheet_price(1.22, 2.44, 5000.0), 14900); // 14884.0
        assert_eq!(sheet_price(0.0, 2.44, 5000.0), 0);
        assert_eq!(sheet_price(1.22, -2.44, 5000.0), 0);
        assert_eq!(strip_price(3.0, 450.0), 1400); // 1350
        assert_eq!(strip_price(0.0, 450.0), 0);
        assert_eq!(strip_price(3.0, 0.0), 0);
    }

    #[test]
    fn increase_price_compounds_rounding() {
        assert_eq!(increase_price(1200, 10.0), 1300); // 1320
        assert_eq!(increase_price(100, 30.0), 100); // 130 rounds back down
        // two +30% passes stay at 100, while a single +69% pass moves to 200
        assert_eq!(increase_price(increase_price(100, 30.0), 30.0), 100);
        assert_eq!(increase_price(100, 69.0), 200);
    }

    #[test]
    fn line_amounts_round_to_whole_pesos() {
        assert_eq!(line_gross(1500, 2.5), 3750);
        assert_eq!(line_discount(3750, 10.0), 375);
        assert_eq!(line_discount(3750, 0.0), 0);
    }

    #[test]
    fn order_total_zeroes_shipping_on_pickup() {
        assert_eq!(
            order_total(10000, 500, 1500, DeliveryType::HomeDelivery),
            11000
        );
        // a shipping cost entered before switching to pickup is ignored
        assert_eq!(order_total(10000, 500, 1500, DeliveryType::LocalPickup), 9500);
    }
}
