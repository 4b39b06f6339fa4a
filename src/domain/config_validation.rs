//! Configuration validation.
//!
//! Validates every config field before a calculation run starts. Absent keys
//! are fine (defaults apply); present keys must hold sensible values.

use crate::domain::error::CommissionError;
use crate::domain::operation::CurrencyCode;
use crate::ports::config_port::ConfigPort;
use rust_decimal::Decimal;

pub const COMMISSION_SECTION: &str = "commission";
pub const RATES_SECTION: &str = "rates";

const RATE_KEYS: &[&str] = &[
    "deposit_rate",
    "business_withdraw_rate",
    "private_withdraw_rate",
];

pub fn validate_commission_config(config: &dyn ConfigPort) -> Result<(), CommissionError> {
    validate_base_currency(config)?;
    validate_rates_non_negative(config)?;
    validate_free_amount(config)?;
    validate_free_operations(config)?;
    Ok(())
}

pub fn validate_rates_config(config: &dyn ConfigPort) -> Result<(), CommissionError> {
    let Some(keys) = config.section_keys(RATES_SECTION) else {
        return Ok(());
    };
    for key in keys {
        if key.parse::<CurrencyCode>().is_err() {
            return Err(invalid(RATES_SECTION, &key, "not a three-letter currency code"));
        }
        match config.get_decimal(RATES_SECTION, &key) {
            Some(rate) if rate > Decimal::ZERO => {}
            _ => return Err(invalid(RATES_SECTION, &key, "rate must be a positive number")),
        }
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> CommissionError {
    CommissionError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_base_currency(config: &dyn ConfigPort) -> Result<(), CommissionError> {
    match config.get_string(COMMISSION_SECTION, "base_currency") {
        None => Ok(()),
        Some(s) => s
            .parse::<CurrencyCode>()
            .map(|_| ())
            .map_err(|reason| invalid(COMMISSION_SECTION, "base_currency", &reason)),
    }
}

/// A present key must parse as a decimal that is zero or more.
fn non_negative_decimal(config: &dyn ConfigPort, key: &str) -> Result<(), CommissionError> {
    if config.get_string(COMMISSION_SECTION, key).is_none() {
        return Ok(());
    }
    match config.get_decimal(COMMISSION_SECTION, key) {
        Some(value) if value >= Decimal::ZERO => Ok(()),
        _ => Err(invalid(
            COMMISSION_SECTION,
            key,
            &format!("{} must be a non-negative number", key),
        )),
    }
}

fn validate_rates_non_negative(config: &dyn ConfigPort) -> Result<(), CommissionError> {
    for key in RATE_KEYS {
        non_negative_decimal(config, key)?;
    }
    Ok(())
}

fn validate_free_amount(config: &dyn ConfigPort) -> Result<(), CommissionError> {
    non_negative_decimal(config, "weekly_free_amount")
}

fn validate_free_operations(config: &dyn ConfigPort) -> Result<(), CommissionError> {
    let Some(raw) = config.get_string(COMMISSION_SECTION, "weekly_free_operations") else {
        return Ok(());
    };
    match raw.trim().parse::<u32>() {
        Ok(_) => Ok(()),
        Err(_) => Err(invalid(
            COMMISSION_SECTION,
            "weekly_free_operations",
            "weekly_free_operations must be a whole number of zero or more",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_commission_config_passes() {
        let config = make_config(
            r#"
[commission]
base_currency = EUR
deposit_rate = 0.0003
business_withdraw_rate = 0.005
private_withdraw_rate = 0.003
weekly_free_amount = 1000
weekly_free_operations = 3
"#,
        );
        assert!(validate_commission_config(&config).is_ok());
    }

    #[test]
    fn empty_config_passes() {
        let config = make_config("");
        assert!(validate_commission_config(&config).is_ok());
        assert!(validate_rates_config(&config).is_ok());
    }

    #[test]
    fn bad_base_currency_fails() {
        let config = make_config("[commission]\nbase_currency = EURO\n");
        let err = validate_commission_config(&config).unwrap_err();
        assert!(
            matches!(err, CommissionError::ConfigInvalid { key, .. } if key == "base_currency")
        );
    }

    #[test]
    fn negative_deposit_rate_fails() {
        let config = make_config("[commission]\ndeposit_rate = -0.1\n");
        let err = validate_commission_config(&config).unwrap_err();
        assert!(
            matches!(err, CommissionError::ConfigInvalid { key, .. } if key == "deposit_rate")
        );
    }

    #[test]
    fn non_numeric_withdraw_rate_fails() {
        let config = make_config("[commission]\nprivate_withdraw_rate = lots\n");
        let err = validate_commission_config(&config).unwrap_err();
        assert!(
            matches!(err, CommissionError::ConfigInvalid { key, .. } if key == "private_withdraw_rate")
        );
    }

    #[test]
    fn zero_rate_is_allowed() {
        let config = make_config("[commission]\nbusiness_withdraw_rate = 0\n");
        assert!(validate_commission_config(&config).is_ok());
    }

    #[test]
    fn negative_free_amount_fails() {
        let config = make_config("[commission]\nweekly_free_amount = -1\n");
        let err = validate_commission_config(&config).unwrap_err();
        assert!(
            matches!(err, CommissionError::ConfigInvalid { key, .. } if key == "weekly_free_amount")
        );
    }

    #[test]
    fn fractional_free_operations_fails() {
        let config = make_config("[commission]\nweekly_free_operations = 2.5\n");
        let err = validate_commission_config(&config).unwrap_err();
        assert!(
            matches!(err, CommissionError::ConfigInvalid { key, .. } if key == "weekly_free_operations")
        );
    }

    #[test]
    fn negative_free_operations_fails() {
        let config = make_config("[commission]\nweekly_free_operations = -3\n");
        assert!(validate_commission_config(&config).is_err());
    }

    #[test]
    fn valid_rates_pass() {
        let config = make_config("[rates]\nEUR = 1\nUSD = 1.1497\nJPY = 129.53\n");
        assert!(validate_rates_config(&config).is_ok());
    }

    #[test]
    fn zero_rate_fails() {
        let config = make_config("[rates]\nUSD = 0\n");
        let err = validate_rates_config(&config).unwrap_err();
        assert!(matches!(err, CommissionError::ConfigInvalid { key, .. } if key == "usd"));
    }

    #[test]
    fn bad_rate_currency_fails() {
        let config = make_config("[rates]\nUS_DOLLAR = 1.1\n");
        let err = validate_rates_config(&config).unwrap_err();
        assert!(
            matches!(err, CommissionError::ConfigInvalid { section, .. } if section == "rates")
        );
    }
}
