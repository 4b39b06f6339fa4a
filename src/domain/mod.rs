//! Core domain types and logic.

pub mod operation;
pub mod money;
pub mod rates;
pub mod allowance;
pub mod fee_schedule;
pub mod fee_rule;
pub mod engine;
pub mod config_validation;
pub mod error;
