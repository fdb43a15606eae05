//! Length thresholds per field kind.
//!
//! Thresholds are data: the rule tables read them from here instead of
//! embedding numbers, and deployments can overlay them from a JSON file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::field::FieldKind;

/// Inclusive character-count bounds. `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LengthBounds {
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub max: Option<usize>,
}

impl LengthBounds {
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_most(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    bounds: BTreeMap<FieldKind, LengthBounds>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let bounds = FieldKind::ALL
            .into_iter()
            .map(|kind| (kind, default_bounds(kind)))
            .collect();
        Self { bounds }
    }
}

fn default_bounds(kind: FieldKind) -> LengthBounds {
    match kind {
        FieldKind::Email => LengthBounds::at_most(255),
        FieldKind::Password => LengthBounds::between(8, 128),
        FieldKind::ConfirmPassword => LengthBounds::unbounded(),
        FieldKind::Username => LengthBounds::between(3, 50),
        FieldKind::FirstName | FieldKind::LastName => LengthBounds::at_most(50),
        FieldKind::Phone => LengthBounds::between(10, 20),
        FieldKind::StreetName => LengthBounds::at_most(100),
        FieldKind::StreetNumber => LengthBounds::at_most(20),
        FieldKind::Unit => LengthBounds::at_most(10),
        FieldKind::PostalCode => LengthBounds::between(5, 10),
        FieldKind::City | FieldKind::Province | FieldKind::Country => LengthBounds::at_most(100),
    }
}

impl ThresholdTable {
    /// Bounds for `kind`; kinds missing from the table are unbounded.
    pub fn get(&self, kind: FieldKind) -> LengthBounds {
        self.bounds.get(&kind).copied().unwrap_or_default()
    }

    pub fn set(&mut self, kind: FieldKind, bounds: LengthBounds) -> Result<(), ConfigError> {
        check_bounds(kind, bounds)?;
        self.bounds.insert(kind, bounds);
        Ok(())
    }

    /// Parses a partial table and overlays it on the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// let table = ThresholdTable::from_json_str(r#"{ "postal_code": { "min": 3, "max": 7 } }"#)?;
    /// assert_eq!(table.get(FieldKind::PostalCode), LengthBounds::between(3, 7));
    /// assert_eq!(table.get(FieldKind::Password), LengthBounds::between(8, 128));
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let overrides: BTreeMap<FieldKind, LengthBounds> = serde_json::from_str(json)?;
        let mut table = Self::default();
        for (kind, bounds) in overrides {
            table.set(kind, bounds)?;
        }
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

fn check_bounds(kind: FieldKind, bounds: LengthBounds) -> Result<(), ConfigError> {
    match (bounds.min, bounds.max) {
        (Some(min), Some(max)) if min > max => Err(ConfigError::InvertedBounds {
            field: kind.to_string(),
            min,
            max,
        }),
        _ => Ok(()),
    }
}
