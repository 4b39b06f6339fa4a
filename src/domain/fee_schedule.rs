//! Commission rates and weekly allowance limits.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::operation::CurrencyCode;

#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    pub base_currency: CurrencyCode,
    pub deposit_rate: Decimal,
    pub business_withdraw_rate: Decimal,
    pub private_withdraw_rate: Decimal,
    /// Base-currency amount a private account may withdraw per ISO week
    /// without commission.
    pub weekly_free_amount: Decimal,
    /// Number of withdrawals per ISO week the free amount applies to.
    pub weekly_free_operations: u32,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            base_currency: CurrencyCode::from_static("EUR"),
            deposit_rate: dec!(0.0003),
            business_withdraw_rate: dec!(0.005),
            private_withdraw_rate: dec!(0.003),
            weekly_free_amount: dec!(1000),
            weekly_free_operations: 3,
        }
    }
}
