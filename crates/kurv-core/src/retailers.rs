use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Colour used for retailers that are priced but missing from the directory.
pub const FALLBACK_COLOR: &str = "#9ca3af";

/// Upstream record shape a retailer's data source speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// Prices in minor units with an optional per-retailer price block.
    FamilyA,
    /// Prices in major units with a separate discount price.
    FamilyB,
    /// Prices in major units under a nested `pricing` object.
    FamilyC,
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schema::FamilyA => write!(f, "family_a"),
            Schema::FamilyB => write!(f, "family_b"),
            Schema::FamilyC => write!(f, "family_c"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerConfig {
    pub id: String,
    pub name: String,
    /// Brand colour as `#rrggbb`.
    pub color: String,
    pub schema: Schema,
    /// Root of the retailer's product API. Retailers without one can only
    /// be fed from files.
    pub base_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RetailersFile {
    pub retailers: Vec<RetailerConfig>,
}

/// Load and validate the retailer directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_retailers(path: &Path) -> Result<RetailersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RetailersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let retailers_file: RetailersFile =
        serde_yaml::from_str(&content).map_err(ConfigError::RetailersFileParse)?;

    validate_retailers(&retailers_file)?;

    Ok(retailers_file)
}

fn validate_retailers(retailers_file: &RetailersFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for retailer in &retailers_file.retailers {
        if retailer.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "retailer id must be non-empty".to_string(),
            ));
        }

        if retailer.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' must have a non-empty name",
                retailer.id
            )));
        }

        if !is_hex_color(&retailer.color) {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' has invalid color '{}'; expected #rrggbb",
                retailer.id, retailer.color
            )));
        }

        if let Some(base_url) = &retailer.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "retailer '{}' has base_url '{}' without an http(s) scheme",
                    retailer.id, base_url
                )));
            }
        }

        if !seen_ids.insert(retailer.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate retailer id: '{}'",
                retailer.id
            )));
        }
    }

    Ok(())
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Display name and colour for one retailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetailerDisplay {
    pub name: String,
    pub color: String,
}

/// Lookup table over the configured retailers.
#[derive(Debug, Clone, Default)]
pub struct RetailerDirectory {
    retailers: Vec<RetailerConfig>,
    by_id: HashMap<String, usize>,
}

impl RetailerDirectory {
    #[must_use]
    pub fn new(retailers: Vec<RetailerConfig>) -> Self {
        let by_id = retailers
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id.clone(), idx))
            .collect();
        Self { retailers, by_id }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RetailerConfig> {
        self.by_id.get(id).map(|&idx| &self.retailers[idx])
    }

    /// Name and colour for `id`. Unknown retailers display as their id in
    /// [`FALLBACK_COLOR`].
    #[must_use]
    pub fn display(&self, id: &str) -> RetailerDisplay {
        self.get(id).map_or_else(
            || RetailerDisplay {
                name: id.to_owned(),
                color: FALLBACK_COLOR.to_owned(),
            },
            |r| RetailerDisplay {
                name: r.name.clone(),
                color: r.color.clone(),
            },
        )
    }

    #[must_use]
    pub fn retailers(&self) -> &[RetailerConfig] {
        &self.retailers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.retailers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retailers.is_empty()
    }
}

impl From<RetailersFile> for RetailerDirectory {
    fn from(file: RetailersFile) -> Self {
        Self::new(file.retailers)
    }
}

#[cfg(test)]
#[path = "retailers_test.rs"]
mod tests;
