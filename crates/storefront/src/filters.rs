//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use portell_core::format_pln;
use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an amount in zloty, `150.00 PLN`.
///
/// Usage in templates: `{{ product.price|pln }}`
#[askama::filter_fn]
pub fn pln(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    let amount: Decimal = raw
        .parse()
        .map_err(|e| askama::Error::Custom(format!("not an amount: {raw}: {e}").into()))?;
    Ok(format_pln(amount))
}
