//! Fee rules: each computes the unrounded commission for one operation.

use rust_decimal::Decimal;

use super::allowance::{AllowanceKey, WeeklyAllowanceTracker};
use super::error::CommissionError;
use super::fee_schedule::FeeSchedule;
use super::operation::{CurrencyCode, Operation};
use super::rates::RateSource;

pub trait FeeRule {
    /// Unrounded commission in the operation's currency. Called exactly once
    /// per operation, in input order.
    fn compute(&mut self, operation: &Operation, rates: &RateSource)
        -> Result<Decimal, CommissionError>;

    fn name(&self) -> &'static str;
}

/// Flat percentage of the deposited amount.
#[derive(Debug, Clone)]
pub struct DepositRule {
    rate: Decimal,
}

impl DepositRule {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

impl FeeRule for DepositRule {
    fn compute(&mut self, operation: &Operation, _rates: &RateSource) -> Result<Decimal, CommissionError> {
        Ok(operation.amount * self.rate)
    }

    fn name(&self) -> &'static str {
        "deposit"
    }
}

/// Flat percentage of the withdrawn amount.
#[derive(Debug, Clone)]
pub struct BusinessWithdrawRule {
    rate: Decimal,
}

impl BusinessWithdrawRule {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

impl FeeRule for BusinessWithdrawRule {
    fn compute(&mut self, operation: &Operation, _rates: &RateSource) -> Result<Decimal, CommissionError> {
        Ok(operation.amount * self.rate)
    }

    fn name(&self) -> &'static str {
        "business withdraw"
    }
}

/// Percentage of the withdrawn amount above the account's weekly free
/// amount. Only the first `free_operations` withdrawals of an ISO week draw
/// on the free amount; later ones are charged in full.
#[derive(Debug)]
pub struct PrivateWithdrawRule {
    rate: Decimal,
    free_amount: Decimal,
    free_operations: u32,
    base_currency: CurrencyCode,
    tracker: WeeklyAllowanceTracker,
}

impl PrivateWithdrawRule {
    pub fn new(schedule: &FeeSchedule) -> Self {
        Self {
            rate: schedule.private_withdraw_rate,
            free_amount: schedule.weekly_free_amount,
            free_operations: schedule.weekly_free_operations,
            base_currency: schedule.base_currency.clone(),
            tracker: WeeklyAllowanceTracker::new(),
        }
    }

    pub fn tracker(&self) -> &WeeklyAllowanceTracker {
        &self.tracker
    }
}

impl FeeRule for PrivateWithdrawRule {
    fn compute(&mut self, operation: &Operation, rates: &RateSource) -> Result<Decimal, CommissionError> {
        let key = AllowanceKey::for_operation(operation);
        let amount_base = rates.convert(operation.amount, &operation.currency, &self.base_currency)?;
        let usage = self.tracker.record(key, amount_base);

        if usage.operation_number > self.free_operations {
            return Ok(operation.amount * self.rate);
        }

        let remaining = (self.free_amount - usage.withdrawn_before).max(Decimal::ZERO);
        let free_base = amount_base.min(remaining);
        let free = rates.convert(free_base, &self.base_currency, &operation.currency)?;
        let chargeable = (operation.amount - free).max(Decimal::ZERO);

        tracing::trace!(
            account = operation.account_id,
            operation_number = usage.operation_number,
            %free_base,
            %chargeable,
            "private withdraw allowance"
        );

        Ok(chargeable * self.rate)
    }

    fn name(&self) -> &'static str {
        "private withdraw"
    }
}
