//! Operation records and their classifying enums.

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountCategory {
    Private,
    Business,
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountCategory::Private => write!(f, "private"),
            AccountCategory::Business => write!(f, "business"),
        }
    }
}

impl FromStr for AccountCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(AccountCategory::Private),
            "business" => Ok(AccountCategory::Business),
            other => Err(format!("unknown account category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Deposit,
    Withdraw,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Deposit => write!(f, "deposit"),
            OperationKind::Withdraw => write!(f, "withdraw"),
        }
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(OperationKind::Deposit),
            "withdraw" => Ok(OperationKind::Withdraw),
            other => Err(format!("unknown operation type '{other}'")),
        }
    }
}

/// ISO 4217 style three-letter currency code, always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// For codes known to be valid at compile time.
    pub(crate) fn from_static(code: &'static str) -> Self {
        CurrencyCode(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code))
        } else {
            Err(format!("invalid currency code '{}'", s.trim()))
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub date: NaiveDateTime,
    pub account_id: u64,
    pub category: AccountCategory,
    pub kind: OperationKind,
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Operation {
    /// ISO-8601 (year, week) the operation falls into. Weeks start on Monday,
    /// so 2014-12-31 and 2015-01-01 share week 2015-W01.
    pub fn iso_week(&self) -> (i32, u32) {
        let week = self.date.date().iso_week();
        (week.year(), week.week())
    }
}
