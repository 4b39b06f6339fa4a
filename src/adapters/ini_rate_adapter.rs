//! Exchange rates read from the `[rates]` section of an INI file.

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::RATES_SECTION;
use crate::domain::error::CommissionError;
use crate::domain::operation::CurrencyCode;
use crate::domain::rates::RateTable;
use crate::ports::config_port::ConfigPort;
use crate::ports::rate_port::RateProviderPort;
use rust_decimal::Decimal;
use std::path::Path;

pub struct IniRateAdapter {
    config: Result<FileConfigAdapter, String>,
    base: CurrencyCode,
}

impl IniRateAdapter {
    /// Rates from an already loaded configuration.
    pub fn from_config(config: FileConfigAdapter, base: CurrencyCode) -> Self {
        Self {
            config: Ok(config),
            base,
        }
    }

    /// A provider with no rate data; fetching always fails.
    pub fn unconfigured(base: CurrencyCode) -> Self {
        Self {
            config: Err("no rates configured".to_string()),
            base,
        }
    }

    /// Rates from a file. A file that cannot be read is reported when the
    /// rates are fetched, not here.
    pub fn from_file<P: AsRef<Path>>(path: P, base: CurrencyCode) -> Self {
        let config = FileConfigAdapter::from_file(path).map_err(|e| e.to_string());
        Self { config, base }
    }
}

impl RateProviderPort for IniRateAdapter {
    fn fetch_rates(&self) -> Result<RateTable, CommissionError> {
        let config = self
            .config
            .as_ref()
            .map_err(|reason| CommissionError::RateProvider {
                reason: reason.clone(),
            })?;
        rate_table_from_config(config, &self.base)
    }
}

/// Build a rate table from the `[rates]` section of `config`.
pub fn rate_table_from_config(
    config: &dyn ConfigPort,
    base: &CurrencyCode,
) -> Result<RateTable, CommissionError> {
    let keys = config
        .section_keys(RATES_SECTION)
        .ok_or_else(|| CommissionError::RateProvider {
            reason: format!("no [{}] section", RATES_SECTION),
        })?;

    let mut table = RateTable::new(base.clone());
    for key in keys {
        let currency: CurrencyCode = key
            .parse()
            .map_err(|reason: String| CommissionError::RateProvider { reason })?;
        let rate = config
            .get_decimal(RATES_SECTION, &key)
            .filter(|r| *r > Decimal::ZERO)
            .ok_or_else(|| CommissionError::RateProvider {
                reason: format!("rate for {} must be a positive number", currency),
            })?;
        if currency == *base && rate != Decimal::ONE {
            return Err(CommissionError::RateProvider {
                reason: format!("base currency {} must have rate 1", base),
            });
        }
        table.insert(currency, rate);
    }
    Ok(table)
}
