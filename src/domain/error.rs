//! Domain error types.

use super::operation::{AccountCategory, OperationKind};

/// Top-level error type for commissioner.
#[derive(Debug, thiserror::Error)]
pub enum CommissionError {
    #[error("unknown currency {currency}")]
    UnknownCurrency { currency: String },

    #[error("no commission rule for {kind} operation on {category} account")]
    NoRuleForOperation {
        kind: OperationKind,
        category: AccountCategory,
    },

    #[error("failed to read operations from {path}: {reason}")]
    InputRead { path: String, reason: String },

    #[error("rate provider unavailable: {reason}")]
    RateProvider { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CommissionError> for std::process::ExitCode {
    fn from(err: &CommissionError) -> Self {
        let code: u8 = match err {
            CommissionError::Io(_) | CommissionError::InputRead { .. } => 1,
            CommissionError::ConfigParse { .. } | CommissionError::ConfigInvalid { .. } => 2,
            CommissionError::RateProvider { .. } => 3,
            CommissionError::UnknownCurrency { .. }
            | CommissionError::NoRuleForOperation { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
