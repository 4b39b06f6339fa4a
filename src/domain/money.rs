//! Currency precision, rounding and formatting of commission amounts.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::operation::CurrencyCode;

pub const DEFAULT_DECIMALS: u32 = 2;

const CURRENCY_DECIMALS: &[(&str, u32)] = &[("EUR", 2), ("USD", 2), ("JPY", 0)];

/// Fraction of the smallest currency unit below which a remainder is treated
/// as conversion residue rather than a real amount. Division through a rate
/// leaves residue near the 28th significant digit, far below this.
const CEIL_TOLERANCE: Decimal = dec!(0.000000000001);

/// Number of minor-unit digits for the currency (0 for currencies without
/// a minor unit).
pub fn decimal_places(currency: &CurrencyCode) -> u32 {
    CURRENCY_DECIMALS
        .iter()
        .find(|(code, _)| *code == currency.as_str())
        .map(|(_, decimals)| *decimals)
        .unwrap_or(DEFAULT_DECIMALS)
}

/// Round `amount` up to the currency's precision, leaving amounts that are
/// already exact at that precision untouched.
///
/// The one exception to rounding up: a remainder smaller than 1e-12 of the
/// currency's smallest unit is dropped, so the result may undershoot
/// `amount` by at most that much.
pub fn round_up(amount: Decimal, currency: &CurrencyCode) -> Decimal {
    let decimals = decimal_places(currency);
    let scale = Decimal::from(10u64.pow(decimals));

    let scaled = amount * scale;
    let whole = scaled.floor();
    let units = if scaled - whole < CEIL_TOLERANCE {
        whole
    } else {
        whole + Decimal::ONE
    };

    (units / scale).round_dp(decimals)
}

/// Render an amount with exactly the currency's decimal places and no symbol.
pub fn format_amount(amount: Decimal, currency: &CurrencyCode) -> String {
    let decimals = decimal_places(currency) as usize;
    format!("{:.*}", decimals, amount)
}
