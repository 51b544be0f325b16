//! Ledger configuration loaded from the environment.

use serde::{Deserialize, Serialize};

use sheetstock_core::{DomainError, DomainResult};
use sheetstock_inventory::{DateRange, HistoryOrder};

pub const HISTORY_ORDER_VAR: &str = "SHEETSTOCK_HISTORY_ORDER";
pub const HIDE_INACTIVE_VAR: &str = "SHEETSTOCK_HIDE_INACTIVE";
pub const DATE_RANGE_VAR: &str = "SHEETSTOCK_DATE_RANGE";

/// Presentation defaults for ledger queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub history_order: HistoryOrder,
    #[serde(default = "default_hide_inactive")]
    pub hide_inactive: bool,
    #[serde(default)]
    pub date_range: DateRange,
}

fn default_hide_inactive() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            history_order: HistoryOrder::default(),
            hide_inactive: default_hide_inactive(),
            date_range: DateRange::default(),
        }
    }
}

impl LedgerConfig {
    /// Read the configuration from process environment variables.
    ///
    /// Unset variables keep their defaults; set-but-invalid values are errors.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DomainResult<Self> {
        let mut config = Self::default();

        if let Some(order) = lookup(HISTORY_ORDER_VAR) {
            config.history_order = order.parse()?;
        }
        if let Some(flag) = lookup(HIDE_INACTIVE_VAR) {
            config.hide_inactive = parse_bool(HIDE_INACTIVE_VAR, &flag)?;
        }
        if let Some(range) = lookup(DATE_RANGE_VAR) {
            config.date_range = range.parse()?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> DomainResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(DomainError::validation(format!("{key}: expected a boolean, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_keep_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.history_order, HistoryOrder::ItemAsc);
        assert!(config.hide_inactive);
        assert_eq!(config.date_range, DateRange::All);
    }

    #[test]
    fn variables_override_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (HISTORY_ORDER_VAR, "date_desc"),
            (HIDE_INACTIVE_VAR, "off"),
            (DATE_RANGE_VAR, "month"),
        ]))
        .unwrap();
        assert_eq!(config.history_order, HistoryOrder::DateDesc);
        assert!(!config.hide_inactive);
        assert_eq!(config.date_range, DateRange::Month);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = LedgerConfig::from_lookup(lookup(&[(HIDE_INACTIVE_VAR, "maybe")])).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(LedgerConfig::from_lookup(lookup(&[(DATE_RANGE_VAR, "decade")])).is_err());
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: LedgerConfig = serde_json::from_str(r#"{ "history_order": "date_desc" }"#).unwrap();
        assert_eq!(config.history_order, HistoryOrder::DateDesc);
        assert!(config.hide_inactive);
    }
}
