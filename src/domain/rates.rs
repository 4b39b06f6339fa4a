//! Exchange rate table and the cached rate source used by the fee rules.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::error::CommissionError;
use super::operation::CurrencyCode;
use crate::ports::rate_port::RateProviderPort;

/// Built-in rates used when the provider is unavailable (EUR base).
pub const FALLBACK_RATES: &[(&str, Decimal)] = &[
    ("EUR", dec!(1)),
    ("USD", dec!(1.1497)),
    ("JPY", dec!(129.53)),
];

pub const FALLBACK_BASE: &str = "EUR";

/// Rates of every known currency relative to one base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl RateTable {
    pub fn new(base: CurrencyCode) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(base.clone(), Decimal::ONE);
        Self { base, rates }
    }

    pub fn with_rate(mut self, currency: CurrencyCode, rate: Decimal) -> Self {
        self.insert(currency, rate);
        self
    }

    /// The base currency always stays at 1.
    pub fn insert(&mut self, currency: CurrencyCode, rate: Decimal) {
        if currency != self.base {
            self.rates.insert(currency, rate);
        }
    }

    pub fn fallback() -> Self {
        let mut table = RateTable::new(CurrencyCode::from_static(FALLBACK_BASE));
        for (code, rate) in FALLBACK_RATES {
            table.insert(CurrencyCode::from_static(code), *rate);
        }
        table
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn rates(&self) -> impl Iterator<Item = (&CurrencyCode, &Decimal)> {
        self.rates.iter()
    }

    /// Every rate must be positive; conversions divide by them.
    pub fn validate(&self) -> Result<(), CommissionError> {
        match self.rates.iter().find(|(_, rate)| **rate <= Decimal::ZERO) {
            Some((currency, rate)) => Err(CommissionError::RateProvider {
                reason: format!("rate for {} must be positive, got {}", currency, rate),
            }),
            None => Ok(()),
        }
    }

    fn lookup(&self, currency: &CurrencyCode) -> Result<Decimal, CommissionError> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| CommissionError::UnknownCurrency {
                currency: currency.to_string(),
            })
    }

    /// Conversion factor from `from` to `to`, pivoting through the base.
    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, CommissionError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        if *from == self.base {
            return self.lookup(to);
        }
        let from_rate = self.lookup(from)?;
        if *to == self.base {
            return Ok(Decimal::ONE / from_rate);
        }
        let to_rate = self.lookup(to)?;
        Ok(to_rate / from_rate)
    }

    /// Convert an amount, pivoting through the base currency.
    pub fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, CommissionError> {
        if from == to {
            return Ok(amount);
        }
        if *from == self.base {
            return Ok(amount * self.lookup(to)?);
        }
        let from_rate = self.lookup(from)?;
        if *to == self.base {
            return Ok(amount / from_rate);
        }
        let to_rate = self.lookup(to)?;
        Ok(amount / from_rate * to_rate)
    }
}

/// Lazily loads a [`RateTable`] from a provider on first use and caches it
/// for the rest of the run. Falls back to [`RateTable::fallback`] when the
/// provider fails.
pub struct RateSource {
    provider: Box<dyn RateProviderPort>,
    table: OnceLock<RateTable>,
    used_fallback: OnceLock<bool>,
}

impl RateSource {
    pub fn new(provider: Box<dyn RateProviderPort>) -> Self {
        Self {
            provider,
            table: OnceLock::new(),
            used_fallback: OnceLock::new(),
        }
    }

    /// A source that never consults a provider. An invalid table is
    /// replaced by the fallback on first use, as a failing provider would be.
    pub fn from_table(table: RateTable) -> Self {
        let source = Self::new(Box::new(StaticRates(table.clone())));
        if table.validate().is_ok() {
            let _ = source.table.set(table);
            let _ = source.used_fallback.set(false);
        }
        source
    }

    pub fn table(&self) -> &RateTable {
        self.table.get_or_init(|| {
            let fetched = self
                .provider
                .fetch_rates()
                .and_then(|table| table.validate().map(|_| table));
            match fetched {
                Ok(table) => {
                    tracing::debug!(
                        base = %table.base(),
                        currencies = table.rates.len(),
                        "loaded exchange rates"
                    );
                    let _ = self.used_fallback.set(false);
                    table
                }
                Err(e) => {
                    tracing::warn!("{e}; using built-in exchange rates");
                    let _ = self.used_fallback.set(true);
                    RateTable::fallback()
                }
            }
        })
    }

    /// Whether the built-in table had to stand in for the provider.
    pub fn used_fallback(&self) -> bool {
        self.table();
        self.used_fallback.get().copied().unwrap_or(false)
    }

    pub fn base(&self) -> &CurrencyCode {
        self.table().base()
    }

    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, CommissionError> {
        self.table().rate(from, to)
    }

    pub fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, CommissionError> {
        self.table().convert(amount, from, to)
    }
}

struct StaticRates(RateTable);

impl RateProviderPort for StaticRates {
    fn fetch_rates(&self) -> Result<RateTable, CommissionError> {
        Ok(self.0.clone())
    }
}
