//! Session cookie attributes
//!
//! This module models the attribute set of the cookie a session layer
//! hands out with every response:
//! - [`CookieAttributes`], a mutable record where `expires` is the only
//!   stored expiration and `max_age` is always derived from it
//! - [`CookieData`], the plain snapshot persisted by session stores
//! - [`HeaderSerializer`], turning a name/value pair plus attributes into a
//!   `Set-Cookie` header value
//!
//! # Example
//!
//! ```no_run
//! use crumbs_core::session::{CookieAttributes, CookieOptions, SameSitePolicy};
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut cookie = CookieAttributes::create(
//!     CookieOptions::new()
//!         .with_max_age(3_600_000)
//!         .with_secure(true)
//!         .with_same_site(SameSitePolicy::Lax),
//! );
//!
//! // Rolling sessions push the expiration back to the configured lifetime
//! cookie.reset_max_age();
//!
//! let header = cookie.serialize("sid", "abc123")?;
//! # Ok(())
//! # }
//! ```

mod clock;
mod cookie;
mod data;
mod diagnostics;
mod header;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cookie::{CookieAttributes, CookieContext, CookieOptions, MaxAge};
pub use data::CookieData;
pub use diagnostics::{
    DeprecationWarning, Diagnostics, LogDiagnostics, RecordingDiagnostics, SilentDiagnostics,
    DEPRECATION_NAMESPACE,
};
pub use header::{CookieSerializer, HeaderSerializer, SerializeError};

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// SameSite cookie policy
///
/// Names are matched case-insensitively when parsed or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SameSitePolicy {
    /// Strict - cookie only sent to same site
    Strict,

    /// Lax - cookie sent on top-level navigation
    Lax,

    /// None - cookie sent on all requests (requires Secure)
    None,
}

impl FromStr for SameSitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSitePolicy::Strict),
            "lax" => Ok(SameSitePolicy::Lax),
            "none" => Ok(SameSitePolicy::None),
            other => Err(format!("unknown SameSite value: {}", other)),
        }
    }
}

impl TryFrom<String> for SameSitePolicy {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// SameSite attribute value
///
/// Either a named policy or a boolean, where `true` means `Strict` and
/// `false` leaves the attribute out of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SameSite {
    Enabled(bool),
    Policy(SameSitePolicy),
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        SameSite::Policy(policy)
    }
}

impl From<bool> for SameSite {
    fn from(enabled: bool) -> Self {
        SameSite::Enabled(enabled)
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "true" => Ok(SameSite::Enabled(true)),
            "false" => Ok(SameSite::Enabled(false)),
            _ => s.parse().map(SameSite::Policy),
        }
    }
}

/// Accepts a boolean or any string [`FromStr`] understands
impl<'de> Deserialize<'de> for SameSite {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(enabled) => Ok(SameSite::Enabled(enabled)),
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
