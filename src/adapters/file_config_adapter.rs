//! INI configuration adapter.
//!
//! Section and key lookups are case-insensitive; configparser stores both
//! lowercased. Numeric values are parsed as `Decimal` so rates keep their
//! exact written precision.

use crate::domain::error::CommissionError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use rust_decimal::Decimal;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CommissionError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| CommissionError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// Trimmed, non-empty value for `key`.
    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.value(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.value(section, key)
            .and_then(|v| Self::parse_bool(&v))
            .unwrap_or(default)
    }

    fn get_decimal(&self, section: &str, key: &str) -> Option<Decimal> {
        self.value(section, key)?.parse().ok()
    }

    fn section_keys(&self, section: &str) -> Option<Vec<String>> {
        let entries = self.config.get_map_ref().get(&section.to_lowercase())?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Some(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[commission]
base_currency = EUR
weekly_free_operations = 3

[rates]
USD = 1.1497
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("commission", "base_currency"),
            Some("EUR".to_string())
        );
        assert_eq!(
            adapter.get_string("rates", "usd"),
            Some("1.1497".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter =
            FileConfigAdapter::from_string("[commission]\ndeposit_rate = 0.0003\n").unwrap();
        assert_eq!(adapter.get_string("commission", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[commission]\nweekly_free_operations = 5\n").unwrap();
        assert_eq!(adapter.get_int("commission", "weekly_free_operations", 0), 5);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[commission]\n").unwrap();
        assert_eq!(adapter.get_int("commission", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[commission]\nweekly_free_operations = abc\n")
                .unwrap();
        assert_eq!(adapter.get_int("commission", "weekly_free_operations", 42), 42);
    }

    #[test]
    fn get_decimal_keeps_exact_value() {
        let adapter =
            FileConfigAdapter::from_string("[commission]\ndeposit_rate = 0.0003\n").unwrap();
        assert_eq!(
            adapter.get_decimal("commission", "deposit_rate"),
            Some(dec!(0.0003))
        );
    }

    #[test]
    fn get_decimal_none_for_missing_or_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[commission]\ndeposit_rate = cheap\n").unwrap();
        assert_eq!(adapter.get_decimal("commission", "deposit_rate"), None);
        assert_eq!(adapter.get_decimal("commission", "missing"), None);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[output]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("output", "a", false));
        assert!(adapter.get_bool("output", "b", false));
        assert!(adapter.get_bool("output", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[output]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("output", "a", true));
        assert!(!adapter.get_bool("output", "b", true));
        assert!(!adapter.get_bool("output", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[output]\n").unwrap();
        assert!(adapter.get_bool("output", "missing", true));
        assert!(!adapter.get_bool("output", "missing", false));
    }

    #[test]
    fn section_keys_lists_sorted_lowercase_keys() {
        let adapter =
            FileConfigAdapter::from_string("[rates]\nUSD = 1.1\nEUR = 1\nJPY = 129\n").unwrap();
        assert_eq!(
            adapter.section_keys("rates"),
            Some(vec!["eur".to_string(), "jpy".to_string(), "usd".to_string()])
        );
        assert_eq!(adapter.section_keys("missing"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[rates]\nUSD = 1.2\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_decimal("rates", "USD"), Some(dec!(1.2)));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(
            matches!(err, CommissionError::ConfigParse { file, .. } if file == "/nonexistent/path/config.ini")
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let adapter = FileConfigAdapter::from_string(
            "[commission]\nbase_currency =\nweekly_free_operations =\n",
        )
        .unwrap();
        assert_eq!(adapter.get_string("commission", "base_currency"), None);
        assert_eq!(adapter.get_int("commission", "weekly_free_operations", 3), 3);
        assert_eq!(adapter.get_decimal("commission", "base_currency"), None);
    }

    #[test]
    fn bool_accepts_on_off() {
        let adapter =
            FileConfigAdapter::from_string("[calculation]\nstrict = on\nquiet = off\n").unwrap();
        assert!(adapter.get_bool("calculation", "strict", false));
        assert!(!adapter.get_bool("calculation", "quiet", true));
    }
}
