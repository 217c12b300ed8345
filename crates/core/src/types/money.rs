//! Money formatting. Every price in the shop is in Polish zloty.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency code appended to every displayed amount.
pub const CURRENCY: &str = "PLN";

/// Format an amount for display, e.g. `"150.00 PLN"`.
#[must_use]
pub fn format_pln(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2} {CURRENCY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_two_decimals() {
        assert_eq!(format_pln(Decimal::new(150, 0)), "150.00 PLN");
        assert_eq!(format_pln(Decimal::new(899, 1)), "89.90 PLN");
        assert_eq!(format_pln(Decimal::ZERO), "0.00 PLN");
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(format_pln(Decimal::new(10_005, 3)), "10.01 PLN");
    }
}
