//! Port traits the domain depends on.

pub mod config_port;
pub mod operation_port;
pub mod rate_port;
