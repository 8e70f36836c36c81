//! Run configuration.
//!
//! Loaded from an optional TOML file. Every field has a default, so an
//! empty file (or no file) is a valid configuration; command-line flags are
//! applied on top by the caller.

use crate::assemble::AccountInfo;
use crate::errors::{LedgerError, Result};
use crate::identity::{IdStrategyKind, DEFAULT_PROFILE_URL_BASE};
use crate::input::{TableLayout, DEFAULT_NOT_FOLLOWING_BACK_SUFFIX};
use crate::reduce::ReducerOptions;
use serde::Deserialize;
use std::path::Path;

/// The observing account as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub username: String,
    pub full_name: String,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub account: AccountConfig,
    pub profile_url_base: String,
    pub id_strategy: IdStrategyKind,
    pub not_following_back_suffix: String,
    pub assign_order_index: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            account: AccountConfig::default(),
            profile_url_base: DEFAULT_PROFILE_URL_BASE.to_string(),
            id_strategy: IdStrategyKind::default(),
            not_following_back_suffix: DEFAULT_NOT_FOLLOWING_BACK_SUFFIX.to_string(),
            assign_order_index: false,
        }
    }
}

impl LedgerConfig {
    /// Parse configuration from TOML text; `label` names the source in errors
    pub fn from_toml_str(text: &str, label: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| LedgerError::InvalidConfig {
            path: label.to_string(),
            reason: e.to_string(),
        })
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// - `InputNotFound` if the file does not exist
    /// - `Io` if it cannot be read
    /// - `InvalidConfig` if it is not valid TOML for this shape
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LedgerError::InputNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::io(format!("read {}", path.display()), e),
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn account_info(&self) -> AccountInfo {
        AccountInfo::new(
            &self.account.username,
            &self.account.full_name,
            &self.profile_url_base,
        )
    }

    pub fn reducer_options(&self) -> ReducerOptions {
        ReducerOptions {
            profile_url_base: self.profile_url_base.clone(),
            assign_order_index: self.assign_order_index,
        }
    }

    pub fn suffixed_layout(&self) -> TableLayout {
        TableLayout::SuffixedColumns {
            suffix: self.not_following_back_suffix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let cfg = LedgerConfig::from_toml_str("", "empty").unwrap();
        assert_eq!(cfg, LedgerConfig::default());
    }

    #[test]
    fn test_full_file() {
        let text = r#"
            profile_url_base = "https://example.test/"
            id_strategy = "random"
            not_following_back_suffix = "_nfb"
            assign_order_index = true

            [account]
            username = "me"
            full_name = "Me"
        "#;
        let cfg = LedgerConfig::from_toml_str(text, "inline").unwrap();

        assert_eq!(cfg.id_strategy, IdStrategyKind::Random);
        assert!(cfg.assign_order_index);
        assert_eq!(cfg.account_info().profile_url, "https://example.test/me");
        assert_eq!(
            cfg.suffixed_layout(),
            TableLayout::SuffixedColumns {
                suffix: "_nfb".to_string()
            }
        );
    }

    #[test]
    fn test_bad_strategy_is_invalid_config() {
        let err = LedgerConfig::from_toml_str("id_strategy = \"md5\"", "inline").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfig { .. }));
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let err = LedgerConfig::load(Path::new("/no/such/followledger.toml")).unwrap_err();
        assert!(matches!(err, LedgerError::InputNotFound { .. }));
    }
}
