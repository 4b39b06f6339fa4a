//! CSV operation file adapter.
//!
//! Rows are headerless: `date,account_id,category,kind,amount,currency`.
//! Rows that do not parse are logged and skipped.

use crate::domain::error::CommissionError;
use crate::domain::operation::{AccountCategory, CurrencyCode, Operation, OperationKind};
use crate::ports::operation_port::OperationPort;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

const COLUMNS: usize = 6;

pub struct CsvOperationAdapter {
    path: PathBuf,
}

impl CsvOperationAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OperationPort for CsvOperationAdapter {
    fn read_operations(&self) -> Result<Vec<Operation>, CommissionError> {
        let file = File::open(&self.path).map_err(|e| CommissionError::InputRead {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        read_operations_from(file, &self.path.display().to_string())
    }
}

/// Parse operations from any reader; `source` names it in errors and logs.
pub fn read_operations_from<R: Read>(reader: R, source: &str) -> Result<Vec<Operation>, CommissionError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut operations = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(CommissionError::InputRead {
                    path: source.to_string(),
                    reason: format!("CSV error: {}", e),
                });
            }
            Err(e) => {
                skipped += 1;
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                tracing::warn!("{}:{}: skipping row: {}", source, line, e);
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        match parse_record(&record) {
            Ok(op) => operations.push(op),
            Err(reason) => {
                skipped += 1;
                tracing::warn!("{}:{}: skipping row: {}", source, line, reason);
            }
        }
    }

    tracing::info!(
        source,
        read = operations.len(),
        skipped,
        "operations loaded"
    );
    Ok(operations)
}

fn parse_record(record: &StringRecord) -> Result<Operation, String> {
    if record.len() != COLUMNS {
        return Err(format!("expected {} columns, found {}", COLUMNS, record.len()));
    }

    let date = parse_date(&record[0])?;
    let account_id: u64 = record[1]
        .parse()
        .map_err(|e| format!("invalid account id '{}': {}", &record[1], e))?;
    let category: AccountCategory = record[2].parse()?;
    let kind: OperationKind = record[3].parse()?;
    let amount: Decimal = record[4]
        .parse()
        .map_err(|e| format!("invalid amount '{}': {}", &record[4], e))?;
    if amount < Decimal::ZERO {
        return Err(format!("negative amount '{}'", &record[4]));
    }
    let currency: CurrencyCode = record[5].parse()?;

    Ok(Operation {
        date,
        account_id,
        category,
        kind,
        amount,
        currency,
    })
}

fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid date '{}'", value))
}
