//! Weekly fee-free allowance bookkeeping for private withdrawals.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::operation::Operation;

/// (account, ISO year, ISO week)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub account_id: u64,
    pub iso_year: i32,
    pub iso_week: u32,
}

impl AllowanceKey {
    pub fn for_operation(operation: &Operation) -> Self {
        let (iso_year, iso_week) = operation.iso_week();
        Self {
            account_id: operation.account_id,
            iso_year,
            iso_week,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AllowanceState {
    pub operation_count: u32,
    pub withdrawn_total: Decimal,
}

/// Snapshot of one withdrawal's position in its week, taken right after it
/// was recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyUsage {
    /// 1-based position of the withdrawal within the week.
    pub operation_number: u32,
    /// Base-currency total withdrawn in the week before this withdrawal.
    pub withdrawn_before: Decimal,
}

#[derive(Debug, Default)]
pub struct WeeklyAllowanceTracker {
    weeks: HashMap<AllowanceKey, AllowanceState>,
}

impl WeeklyAllowanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a withdrawal of `amount_base` (already in base currency)
    /// under `key` and report where it lands in the week.
    pub fn record(&mut self, key: AllowanceKey, amount_base: Decimal) -> WeeklyUsage {
        let state = self.weeks.entry(key).or_default();
        state.operation_count += 1;
        state.withdrawn_total += amount_base;

        WeeklyUsage {
            operation_number: state.operation_count,
            withdrawn_before: state.withdrawn_total - amount_base,
        }
    }

    pub fn state(&self, key: &AllowanceKey) -> Option<&AllowanceState> {
        self.weeks.get(key)
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }
}
