//! File-based configuration.
//!
//! ```toml
//! [database]
//! url = "postgres://localhost/staff"
//!
//! [entities.person]
//! first_name = { type = "text", limit = 50 }
//!
//! [entities.shift]
//! workers = { type = ["person"], reverse = "shifts_worked" }
//! ```
//!
//! The `TETHER_DATABASE_URL` environment variable overrides `database.url`.

use std::path::Path;

use serde::Deserialize;
use tether_core::{Result, TetherError};

use crate::schema::{Declarations, Registry};

/// Environment variable that overrides [`DatabaseConfig::url`].
pub const DATABASE_URL_ENV: &str = "TETHER_DATABASE_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// libpq-style connection string or URL
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub entities: Declarations,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TetherError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| TetherError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// The connection string, preferring the environment over the file.
    pub fn database_url(&self) -> Result<String> {
        resolve_url(std::env::var(DATABASE_URL_ENV).ok(), self.database.url.as_deref())
    }

    /// Builds the declared entities.
    pub fn registry(&self) -> Result<Registry> {
        self.entities.build()
    }
}

fn resolve_url(env: Option<String>, file: Option<&str>) -> Result<String> {
    env.filter(|url| !url.is_empty())
        .or_else(|| file.map(str::to_string))
        .ok_or_else(|| {
            TetherError::Config(format!(
                "no database url: set `database.url` or {DATABASE_URL_ENV}"
            ))
        })
}
