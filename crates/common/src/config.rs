//! TOML configuration for a sqlgate server or CLI session.
//!
//! ```toml
//! default_database = "default"
//!
//! [settings]
//! readonly = 0
//! allow_ddl = true
//! insert_allow_materialized_columns = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_database: String,
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_database: "default".to_string(),
            settings: Settings::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }
}
