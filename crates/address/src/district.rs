use crate::{AddressError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Label shown for the unselected district option.
pub const DISTRICT_PLACEHOLDER_LABEL: &str = "Select Metro District";

/// City/state/zip implied by selecting a district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultLocation {
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location: Option<DefaultLocation>,
}

/// Static district reference data.
///
/// TOML form:
///
/// ```toml
/// [[district]]
/// key = "ventana"
/// label = "Ventana Metro District"
///
/// [district.default_location]
/// city = "Fountain"
/// state = "CO"
/// zip = "80817"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictCatalog {
    #[serde(rename = "district", default)]
    districts: Vec<District>,
}

impl DistrictCatalog {
    pub fn new(districts: Vec<District>) -> Result<Self> {
        let catalog = Self { districts };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn builtin() -> Self {
        let plain = |key: &str, label: &str| District {
            key: key.to_string(),
            label: label.to_string(),
            default_location: None,
        };
        Self {
            districts: vec![
                plain("waters_edge", "Waters Edge Metro District"),
                plain("highlands_mead", "Highlands Mead Metro District"),
                plain("saddler_ridge", "Saddler Ridge Metro District"),
                District {
                    key: "ventana".to_string(),
                    label: "Ventana Metro District".to_string(),
                    default_location: Some(DefaultLocation {
                        city: "Fountain".to_string(),
                        state: "CO".to_string(),
                        zip: "80817".to_string(),
                    }),
                },
            ],
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for district in &self.districts {
            if district.key.trim().is_empty() {
                return Err(AddressError::InvalidConfig(
                    "district key must not be empty".to_string(),
                ));
            }
            if !seen.insert(district.key.as_str()) {
                return Err(AddressError::InvalidConfig(format!(
                    "duplicate district key '{}'",
                    district.key
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(|d| d.label.as_str())
    }

    pub fn default_location(&self, key: &str) -> Option<&DefaultLocation> {
        self.get(key).and_then(|d| d.default_location.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &District> {
        self.districts.iter()
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

impl Default for DistrictCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
