//! Operation row source port trait.

use crate::domain::error::CommissionError;
use crate::domain::operation::Operation;

pub trait OperationPort {
    /// All valid operations in their original order. Malformed rows are the
    /// implementation's concern and never reach the caller.
    fn read_operations(&self) -> Result<Vec<Operation>, CommissionError>;
}
