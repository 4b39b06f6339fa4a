//! Configuration access port trait.

use rust_decimal::Decimal;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// `None` when the key is absent or not a number.
    fn get_decimal(&self, section: &str, key: &str) -> Option<Decimal>;

    /// Keys present in `section`, or `None` if the section does not exist.
    fn section_keys(&self, section: &str) -> Option<Vec<String>>;
}
