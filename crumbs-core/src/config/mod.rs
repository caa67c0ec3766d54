//! Configuration system for Crumbs
//!
//! # Configuration Hierarchy
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** (`CookieOptions` builder) - Highest priority
//! 2. **Environment Variables** - Override file config
//! 3. **Config File** (crumbs.toml) - Override defaults
//! 4. **Defaults** - Lowest priority
//!
//! # Example
//!
//! ```no_run
//! use crumbs_core::config::CrumbsConfig;
//! use crumbs_core::session::CookieAttributes;
//!
//! let config = CrumbsConfig::load()?;
//! let cookie = CookieAttributes::create(config.cookie.to_options()?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cookie;
pub mod logging;

pub use cookie::CookieConfig;
pub use logging::LoggingConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete Crumbs configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrumbsConfig {
    pub cookie: CookieConfig,
    pub logging: LoggingConfig,
}

impl CrumbsConfig {
    /// Load configuration with full supersedence chain
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (crumbs.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        Self::load_from("crumbs.toml")
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.cookie.merge(other.cookie);
        self.logging.merge(other.logging);
    }

    pub fn apply_env_vars(&mut self) {
        self.cookie.apply_env_vars();
        self.logging.apply_env_vars();
    }

    pub fn validate(&self) -> Result<()> {
        self.cookie.validate().context("Invalid [cookie] section")?;
        self.logging.validate().context("Invalid [logging] section")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CrumbsConfig::default();
        assert_eq!(config.cookie.path, "/");
        assert!(config.cookie.http_only);
        assert!(!config.cookie.partitioned);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[cookie]
path = "/app"
secure = true
same_site = "Lax"
max_age_ms = 3600000

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = CrumbsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.cookie.path, "/app");
        assert_eq!(config.cookie.secure, Some(true));
        assert_eq!(config.cookie.same_site.as_deref(), Some("Lax"));
        assert_eq!(config.cookie.max_age_ms, Some(3_600_000));
        assert!(config.cookie.http_only);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cookie\npath = ").unwrap();
        assert!(CrumbsConfig::from_file(file.path()).is_err());
    }

    // Single test so the environment mutation cannot race another load
    #[test]
    fn test_load_from_chain() {
        let missing = CrumbsConfig::load_from("/nonexistent/crumbs.toml").unwrap();
        assert_eq!(missing.cookie, CookieConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cookie]\npath = \"/file\"\nmax_age_ms = 1000").unwrap();

        let config = CrumbsConfig::load_from(file.path()).unwrap();
        assert_eq!(config.cookie.path, "/file");
        assert_eq!(config.cookie.max_age_ms, Some(1000));

        std::env::set_var("RS_COOKIE_PATH", "/env");
        let config = CrumbsConfig::load_from(file.path());
        std::env::remove_var("RS_COOKIE_PATH");
        let config = config.unwrap();
        assert_eq!(config.cookie.path, "/env");
        assert_eq!(config.cookie.max_age_ms, Some(1000));

        let mut invalid = tempfile::NamedTempFile::new().unwrap();
        writeln!(invalid, "[cookie]\npath = \"app\"").unwrap();
        let err = CrumbsConfig::load_from(invalid.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("must start with '/'"));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(CrumbsConfig::from_file("/nonexistent/crumbs.toml").is_err());
    }
}
