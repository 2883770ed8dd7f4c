//! Lookup configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `cidian_core::Config` (flattened via serde)
//! - The syllable limit used when segmenting space-free pinyin
//!
//! # Example
//!
//! ```rust
//! use cidian::LookupConfig;
//!
//! let config = LookupConfig::from_toml_str("max_page_size = 50\nmax_syllables = 4").unwrap();
//! assert_eq!(config.base().max_page_size, 50);
//! assert_eq!(config.max_syllables, 4);
//! ```

use crate::classify::DEFAULT_MAX_SYLLABLES;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LookupConfig {
    /// Base configuration fields (paging, cache)
    #[serde(flatten)]
    pub base: cidian_core::Config,

    /// Most syllables a space-free token may split into and still read as pinyin
    #[serde(default = "default_max_syllables")]
    pub max_syllables: usize,
}

fn default_max_syllables() -> usize {
    DEFAULT_MAX_SYLLABLES
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base: cidian_core::Config::default(),
            max_syllables: DEFAULT_MAX_SYLLABLES,
        }
    }
}

impl LookupConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn base(&self) -> &cidian_core::Config {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut cidian_core::Config {
        &mut self.base
    }
}
