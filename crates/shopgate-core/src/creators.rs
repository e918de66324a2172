use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One creator storefront known to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorConfig {
    /// URL slug used by the browser, e.g. `"nina-studio"`.
    pub slug: String,
    /// Identifier the agent backend knows this creator by.
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatorsFile {
    pub creators: Vec<CreatorConfig>,
}

/// Read-only slug index over the configured creators.
#[derive(Debug, Clone, Default)]
pub struct CreatorDirectory {
    by_slug: HashMap<String, CreatorConfig>,
}

impl CreatorDirectory {
    #[must_use]
    pub fn new(creators: Vec<CreatorConfig>) -> Self {
        let by_slug = creators
            .into_iter()
            .map(|c| (slug_key(&c.slug), c))
            .collect();
        Self { by_slug }
    }

    /// Looks up a creator by slug, ignoring ASCII case and surrounding whitespace.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&CreatorConfig> {
        self.by_slug.get(&slug_key(slug))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

impl From<CreatorsFile> for CreatorDirectory {
    fn from(file: CreatorsFile) -> Self {
        Self::new(file.creators)
    }
}

/// Load and validate the creator directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_creators(path: &Path) -> Result<CreatorsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CreatorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let creators_file: CreatorsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CreatorsFileParse)?;

    validate_creators(&creators_file)?;

    Ok(creators_file)
}

fn slug_key(slug: &str) -> String {
    slug.trim().to_lowercase()
}

fn validate_creators(creators_file: &CreatorsFile) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();

    for creator in &creators_file.creators {
        if creator.slug.trim().is_empty() {
            return Err(ConfigError::Validation(
                "creator slug must be non-empty".to_string(),
            ));
        }

        if creator.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "creator '{}' has an empty id",
                creator.slug
            )));
        }

        if !seen_slugs.insert(slug_key(&creator.slug)) {
            return Err(ConfigError::Validation(format!(
                "duplicate creator slug: '{}'",
                creator.slug
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "creators_test.rs"]
mod tests;
