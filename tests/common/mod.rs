#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use commissioner::domain::error::CommissionError;
use commissioner::domain::operation::{AccountCategory, CurrencyCode, Operation, OperationKind};
use commissioner::domain::rates::{RateSource, RateTable};
use commissioner::ports::rate_port::RateProviderPort;
use rust_decimal::Decimal;
use std::cell::Cell;
use std::rc::Rc;

/// The reference batch and the commissions it must produce, in order.
pub const SAMPLE_CSV: &str = "\
2014-12-31,4,private,withdraw,1200.00,EUR
2015-01-01,4,private,withdraw,1000.00,EUR
2016-01-05,4,private,withdraw,1000.00,EUR
2016-01-05,1,private,deposit,200.00,EUR
2016-01-06,2,business,withdraw,300.00,EUR
2016-01-06,1,private,withdraw,30000,JPY
2016-01-07,1,private,withdraw,1000.00,EUR
2016-01-07,1,private,withdraw,100.00,USD
2016-01-10,1,private,withdraw,100.00,EUR
2016-01-10,2,business,deposit,10000.00,EUR
2016-01-10,3,private,withdraw,1000.00,EUR
2016-02-15,1,private,withdraw,300.00,EUR
2016-02-19,5,private,withdraw,3000000,JPY
";

pub const SAMPLE_EXPECTED: &[&str] = &[
    "0.60", "3.00", "0.00", "0.06", "1.50", "0", "0.70", "0.30", "0.30", "3.00", "0.00", "0.00",
    "8612",
];

pub fn ccy(code: &str) -> CurrencyCode {
    code.parse().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_op(
    on: NaiveDateTime,
    account_id: u64,
    category: AccountCategory,
    kind: OperationKind,
    amount: Decimal,
    currency: &str,
) -> Operation {
    Operation {
        date: on,
        account_id,
        category,
        kind,
        amount,
        currency: ccy(currency),
    }
}

pub fn private_withdraw(on: NaiveDateTime, account_id: u64, amount: Decimal, currency: &str) -> Operation {
    make_op(
        on,
        account_id,
        AccountCategory::Private,
        OperationKind::Withdraw,
        amount,
        currency,
    )
}

pub fn fallback_rates() -> RateSource {
    RateSource::from_table(RateTable::fallback())
}

/// Rate provider that serves a fixed table (or an error) and counts fetches.
pub struct MockRateProvider {
    pub table: Option<RateTable>,
    pub fetches: Rc<Cell<usize>>,
}

impl MockRateProvider {
    pub fn with_table(table: RateTable) -> Self {
        Self {
            table: Some(table),
            fetches: Rc::new(Cell::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            table: None,
            fetches: Rc::new(Cell::new(0)),
        }
    }
}

impl RateProviderPort for MockRateProvider {
    fn fetch_rates(&self) -> Result<RateTable, CommissionError> {
        self.fetches.set(self.fetches.get() + 1);
        self.table.clone().ok_or_else(|| CommissionError::RateProvider {
            reason: "rate service unreachable".into(),
        })
    }
}
