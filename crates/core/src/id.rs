//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Identifier of a stock event.
///
/// Opaque text. The only ordering it takes part in is the same-day tie-break of
/// the running-balance history, where ids compare as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

/// Identifier of the party that owns stock on site (matched by exact name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerName(String);

macro_rules! impl_text_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the value is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_text_newtype!(EventId, "EventId");
impl_text_newtype!(CustomerName, "CustomerName");

impl EventId {
    /// Generate a fresh identifier.
    ///
    /// Uses UUIDv7 text: ids generated later sort after ids generated earlier,
    /// so the same-day tie-break follows creation order for ids minted here.
    /// Prefer passing ids explicitly in tests for determinism.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

/// Identity of a distinct stock item: `(code, type)`, e.g. `("A-100", "Acrylic 5mm")`.
///
/// Ordering is by code, then type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub code: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

impl ItemKey {
    pub fn new(code: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            item_type: item_type.into(),
        }
    }

    /// Case-insensitive substring match against code or type.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle) || self.item_type.to_lowercase().contains(needle)
    }
}

impl ValueObject for ItemKey {}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.code, self.item_type)
    }
}
