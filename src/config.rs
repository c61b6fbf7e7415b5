// Importer configuration - fixed per importer instance, supplied by the host

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_ACCOUNT_ROOT: &str = "Assets:Rabobank:Checkings";

const ROOT_ACCOUNT_TYPES: [&str; 5] = ["Assets", "Liabilities", "Equity", "Income", "Expenses"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterConfig {
    /// Commodity attached to every amount, e.g. `EUR`.
    pub currency: String,
    /// Account every posting and balance assertion targets.
    pub account_root: String,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        ImporterConfig {
            currency: DEFAULT_CURRENCY.to_string(),
            account_root: DEFAULT_ACCOUNT_ROOT.to_string(),
        }
    }
}

impl ImporterConfig {
    pub fn new(currency: impl Into<String>, account_root: impl Into<String>) -> Self {
        ImporterConfig {
            currency: currency.into(),
            account_root: account_root.into(),
        }
    }

    /// Read a JSON object `{"currency": ..., "account_root": ...}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ImporterConfig = serde_json::from_str(&text)
            .map_err(|e| ImportError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let currency_ok = !self.currency.is_empty()
            && self
                .currency
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !currency_ok {
            return Err(ImportError::Config(format!(
                "currency {:?} is not an upper-case commodity code",
                self.currency
            )));
        }

        let mut components = self.account_root.split(':');
        let root_ok = components
            .next()
            .is_some_and(|root| ROOT_ACCOUNT_TYPES.contains(&root));
        let rest_ok = components.all(|c| !c.is_empty() && !c.contains(char::is_whitespace));
        if !root_ok || !rest_ok {
            return Err(ImportError::Config(format!(
                "account {:?} is not a valid ledger account",
                self.account_root
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(ImporterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_currency() {
        for currency in ["", "eur", "E U"] {
            let config = ImporterConfig::new(currency, DEFAULT_ACCOUNT_ROOT);
            assert!(matches!(config.validate(), Err(ImportError::Config(_))), "{currency}");
        }
    }

    #[test]
    fn test_rejects_bad_account() {
        for account in ["", "Bank:Checking", "Assets::Checking", "Assets:My Bank"] {
            let config = ImporterConfig::new("EUR", account);
            assert!(matches!(config.validate(), Err(ImportError::Config(_))), "{account}");
        }
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"currency": "USD", "account_root": "Assets:US:Rabobank"}}"#).unwrap();

        let config = ImporterConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config, ImporterConfig::new("USD", "Assets:US:Rabobank"));
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"currency": "USD"}}"#).unwrap();

        let err = ImporterConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));
    }
}
