//! Plain-data snapshot of a cookie's attributes
//!
//! This is the shape session stores persist and the JSON form of a cookie.

use super::SameSite;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of cookie attributes
///
/// Always carries all nine keys; unset attributes serialize as `null`.
/// `expires` is the raw instant, never a recomputed max-age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieData {
    pub original_max_age: Option<i64>,

    #[serde(default)]
    pub partitioned: bool,

    pub priority: Option<String>,

    pub expires: Option<DateTime<Utc>>,

    pub secure: Option<bool>,

    #[serde(default = "default_http_only")]
    pub http_only: bool,

    pub domain: Option<String>,

    #[serde(default = "default_path")]
    pub path: String,

    pub same_site: Option<SameSite>,
}

pub(crate) fn default_path() -> String {
    "/".to_string()
}

fn default_http_only() -> bool {
    true
}
