//! Commission engine: rule dispatch and rounding.
//!
//! One engine is built per calculation run. Rules are created once at build
//! time and keep their state (the weekly allowance pools) for the engine's
//! lifetime, so operations must be fed in input order.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::error::CommissionError;
use super::fee_rule::{BusinessWithdrawRule, DepositRule, FeeRule, PrivateWithdrawRule};
use super::fee_schedule::FeeSchedule;
use super::money::round_up;
use super::operation::{AccountCategory, Operation, OperationKind};
use super::rates::RateSource;

type RuleKey = (OperationKind, AccountCategory);

pub struct CommissionEngine {
    rates: RateSource,
    rules: Vec<Box<dyn FeeRule>>,
    registry: HashMap<RuleKey, usize>,
}

impl CommissionEngine {
    /// An engine with no rules registered.
    pub fn new(rates: RateSource) -> Self {
        Self {
            rates,
            rules: Vec::new(),
            registry: HashMap::new(),
        }
    }

    /// Deposits for every category, business and private withdrawals.
    pub fn standard(schedule: &FeeSchedule, rates: RateSource) -> Self {
        let mut engine = Self::new(rates);
        let deposit = engine.add_rule(Box::new(DepositRule::new(schedule.deposit_rate)));
        engine.register(OperationKind::Deposit, AccountCategory::Private, deposit);
        engine.register(OperationKind::Deposit, AccountCategory::Business, deposit);

        let business = engine.add_rule(Box::new(BusinessWithdrawRule::new(
            schedule.business_withdraw_rate,
        )));
        engine.register(OperationKind::Withdraw, AccountCategory::Business, business);

        let private = engine.add_rule(Box::new(PrivateWithdrawRule::new(schedule)));
        engine.register(OperationKind::Withdraw, AccountCategory::Private, private);
        engine
    }

    /// Take ownership of a rule and return its handle for [`register`](Self::register).
    pub fn add_rule(&mut self, rule: Box<dyn FeeRule>) -> usize {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    /// Route (kind, category) to a previously added rule. Several pairs may
    /// share one rule instance.
    ///
    /// # Panics
    ///
    /// Panics if `rule` was not returned by [`add_rule`](Self::add_rule).
    pub fn register(&mut self, kind: OperationKind, category: AccountCategory, rule: usize) {
        assert!(rule < self.rules.len(), "unknown rule handle {rule}");
        self.registry.insert((kind, category), rule);
    }

    pub fn rates(&self) -> &RateSource {
        &self.rates
    }

    /// Commission for one operation, rounded up to its currency's precision.
    pub fn calculate(&mut self, operation: &Operation) -> Result<Decimal, CommissionError> {
        let index = *self
            .registry
            .get(&(operation.kind, operation.category))
            .ok_or(CommissionError::NoRuleForOperation {
                kind: operation.kind,
                category: operation.category,
            })?;

        let rule = &mut self.rules[index];
        let raw = rule.compute(operation, &self.rates)?;
        let commission = round_up(raw, &operation.currency);

        tracing::debug!(
            rule = rule.name(),
            account = operation.account_id,
            amount = %operation.amount,
            currency = %operation.currency,
            %raw,
            %commission,
            "commission calculated"
        );
        Ok(commission)
    }

    /// Commissions for a batch, in input order. A failing operation yields an
    /// error in its slot and does not stop the rest of the batch.
    pub fn calculate_all(&mut self, operations: &[Operation]) -> Vec<Result<Decimal, CommissionError>> {
        operations.iter().map(|op| self.calculate(op)).collect()
    }
}
