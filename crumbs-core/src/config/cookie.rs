//! Session cookie configuration

use crate::session::{CookieOptions, SameSite};
use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Session cookie configuration
///
/// Template for the attributes of every cookie a session layer issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Cookie path
    /// Env: RS_COOKIE_PATH
    /// Default: "/"
    pub path: String,

    /// Set HttpOnly flag on cookies (XSS protection)
    /// Env: RS_COOKIE_HTTPONLY
    /// Default: true
    pub http_only: bool,

    /// Set Partitioned flag on cookies
    /// Env: RS_COOKIE_PARTITIONED
    /// Default: false
    pub partitioned: bool,

    /// Set Secure flag on cookies (HTTPS only)
    /// Env: RS_COOKIE_SECURE
    /// Default: unset
    pub secure: Option<bool>,

    /// Cookie domain
    /// Env: RS_COOKIE_DOMAIN
    /// Default: unset
    pub domain: Option<String>,

    /// SameSite: "Strict", "Lax", "None", "true" or "false"
    /// Env: RS_COOKIE_SAMESITE
    /// Default: unset
    pub same_site: Option<String>,

    /// Priority: "Low", "Medium" or "High"
    /// Env: RS_COOKIE_PRIORITY
    /// Default: unset
    pub priority: Option<String>,

    /// Cookie lifetime in milliseconds, unset for a browser-session cookie
    /// Env: RS_COOKIE_MAX_AGE_MS
    /// Default: unset
    pub max_age_ms: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            http_only: true,
            partitioned: false,
            secure: None,
            domain: None,
            same_site: None,
            priority: None,
            max_age_ms: None,
        }
    }
}

impl CookieConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_vars(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("RS_COOKIE_PATH") {
            self.path = path;
        }

        if let Some(http_only) = lookup("RS_COOKIE_HTTPONLY") {
            self.http_only = http_only.parse().unwrap_or(true);
        }

        if let Some(partitioned) = lookup("RS_COOKIE_PARTITIONED") {
            self.partitioned = partitioned.parse().unwrap_or(false);
        }

        if let Some(secure) = lookup("RS_COOKIE_SECURE") {
            if let Ok(s) = secure.parse() {
                self.secure = Some(s);
            }
        }

        if let Some(domain) = lookup("RS_COOKIE_DOMAIN") {
            self.domain = Some(domain);
        }

        if let Some(same_site) = lookup("RS_COOKIE_SAMESITE") {
            self.same_site = Some(same_site);
        }

        if let Some(priority) = lookup("RS_COOKIE_PRIORITY") {
            self.priority = Some(priority);
        }

        if let Some(max_age) = lookup("RS_COOKIE_MAX_AGE_MS") {
            if let Ok(m) = max_age.parse() {
                self.max_age_ms = Some(m);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            bail!("Invalid path: must start with '/'");
        }

        if let Some(ref same_site) = self.same_site {
            if same_site.parse::<SameSite>().is_err() {
                bail!("Invalid same_site: must be Strict, Lax, None, true or false");
            }
        }

        if let Some(ref priority) = self.priority {
            if !["low", "medium", "high"].contains(&priority.to_ascii_lowercase().as_str()) {
                bail!("Invalid priority: must be Low, Medium or High");
            }
        }

        if matches!(self.max_age_ms, Some(m) if m < 0) {
            bail!("Invalid max_age_ms: must not be negative");
        }

        Ok(())
    }

    /// Options for a freshly issued session cookie
    pub fn to_options(&self) -> Result<CookieOptions> {
        self.validate()?;

        let mut options = CookieOptions::new()
            .with_path(self.path.clone())
            .with_http_only(self.http_only)
            .with_partitioned(self.partitioned);

        options.secure = self.secure;
        options.domain = self.domain.clone();
        options.priority = self.priority.clone();
        options.same_site = match self.same_site {
            Some(ref s) => Some(s.parse::<SameSite>().map_err(|e| anyhow!(e))?),
            None => None,
        };
        if let Some(ms) = self.max_age_ms {
            options = options.with_max_age(ms);
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MaxAge, SameSitePolicy};
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid() {
        let config = CookieConfig::default();
        assert!(config.validate().is_ok());

        let options = config.to_options().unwrap();
        assert_eq!(options.path.as_deref(), Some("/"));
        assert_eq!(options.http_only, Some(true));
        assert_eq!(options.partitioned, Some(false));
        assert_eq!(options.max_age, None);
    }

    #[test]
    fn test_apply_vars() {
        let vars: HashMap<&str, &str> = [
            ("RS_COOKIE_PATH", "/app"),
            ("RS_COOKIE_HTTPONLY", "false"),
            ("RS_COOKIE_SECURE", "true"),
            ("RS_COOKIE_SAMESITE", "Strict"),
            ("RS_COOKIE_MAX_AGE_MS", "86400000"),
        ]
        .into_iter()
        .collect();

        let mut config = CookieConfig::default();
        config.apply_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.path, "/app");
        assert!(!config.http_only);
        assert_eq!(config.secure, Some(true));
        assert_eq!(config.same_site.as_deref(), Some("Strict"));
        assert_eq!(config.max_age_ms, Some(86_400_000));
        assert_eq!(config.domain, None);
    }

    #[test]
    fn test_validation_failures() {
        let config = CookieConfig { path: "app".to_string(), ..Default::default() };
        assert!(config.validate().is_err());

        let config =
            CookieConfig { same_site: Some("Sometimes".to_string()), ..Default::default() };
        assert!(config.validate().is_err());

        let config = CookieConfig { priority: Some("urgent".to_string()), ..Default::default() };
        assert!(config.validate().is_err());

        let config = CookieConfig { max_age_ms: Some(-1), ..Default::default() };
        assert!(config.validate().is_err());
        assert!(config.to_options().is_err());
    }

    #[test]
    fn test_to_options() {
        let config = CookieConfig {
            secure: Some(true),
            domain: Some("example.com".to_string()),
            same_site: Some("lax".to_string()),
            priority: Some("High".to_string()),
            max_age_ms: Some(60_000),
            ..Default::default()
        };

        let options = config.to_options().unwrap();
        assert_eq!(options.secure, Some(true));
        assert_eq!(options.domain.as_deref(), Some("example.com"));
        assert_eq!(options.same_site, Some(SameSite::Policy(SameSitePolicy::Lax)));
        assert_eq!(options.priority.as_deref(), Some("High"));
        assert_eq!(options.max_age, Some(MaxAge::Millis(60_000)));
    }
}
