//! Session cookie attributes
//!
//! `expires` is the only stored expiration. `max_age` is computed from it on
//! every read, so it shrinks as time passes, and every write to it is turned
//! into a new `expires`.

use super::clock::{Clock, SystemClock};
use super::data::{default_path, CookieData};
use super::diagnostics::{DeprecationWarning, Diagnostics, LogDiagnostics};
use super::header::{CookieSerializer, HeaderSerializer, SerializeError};
use super::SameSite;
use crate::error::{CookieError, CookieResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

const MAX_AGE_AS_DATE: DeprecationWarning =
    DeprecationWarning::new("maxAge as Date; pass number of milliseconds instead");

/// Key reserved for the snapshot view, never copied from options
const RESERVED_KEY: &str = "data";

/// Value accepted by [`CookieAttributes::set_max_age`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxAge {
    /// Lifetime in milliseconds from now
    Millis(i64),

    /// Absolute instant. Deprecated, reported through [`Diagnostics`].
    At(DateTime<Utc>),
}

impl From<std::time::Duration> for MaxAge {
    fn from(duration: std::time::Duration) -> Self {
        MaxAge::Millis(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
    }
}

impl From<Duration> for MaxAge {
    fn from(duration: Duration) -> Self {
        MaxAge::Millis(duration.num_milliseconds())
    }
}

/// Attributes a cookie is created with
///
/// Unset fields keep their defaults. Applied in a fixed order: plain
/// attributes, `expires`, `max_age`, then `original_max_age`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: Option<String>,
    pub http_only: Option<bool>,
    pub partitioned: Option<bool>,
    pub secure: Option<bool>,
    pub domain: Option<String>,
    pub same_site: Option<SameSite>,
    pub priority: Option<String>,
    pub max_age: Option<MaxAge>,
    pub expires: Option<DateTime<Utc>>,
    pub original_max_age: Option<i64>,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    pub fn with_partitioned(mut self, partitioned: bool) -> Self {
        self.partitioned = Some(partitioned);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_same_site(mut self, same_site: impl Into<SameSite>) -> Self {
        self.same_site = Some(same_site.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Lifetime in milliseconds
    pub fn with_max_age(mut self, ms: i64) -> Self {
        self.max_age = Some(MaxAge::Millis(ms));
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_original_max_age(mut self, ms: i64) -> Self {
        self.original_max_age = Some(ms);
        self
    }

    /// Read options out of a dynamic mapping
    ///
    /// Falsy values (`null`, `false`, `0`, `""`) count as no options. Any
    /// other non-object is rejected. The reserved `data` key is skipped and
    /// unknown keys are ignored.
    pub fn from_value(value: &Value) -> CookieResult<Self> {
        if is_falsy(value) {
            return Ok(Self::default());
        }

        let map =
            value.as_object().ok_or_else(|| CookieError::invalid("options must be an object"))?;

        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                RESERVED_KEY => continue,
                "path" => options.path = opt_string(key, value)?,
                "httpOnly" => options.http_only = opt_bool(key, value)?,
                "partitioned" => options.partitioned = opt_bool(key, value)?,
                "secure" => options.secure = opt_bool(key, value)?,
                "domain" => options.domain = opt_string(key, value)?,
                "sameSite" => options.same_site = opt_same_site(value)?,
                "priority" => options.priority = opt_string(key, value)?,
                "maxAge" => options.max_age = parse_max_age(value)?,
                "expires" => options.expires = opt_instant(value)?,
                "originalMaxAge" => options.original_max_age = opt_millis(key, value)?,
                other => log::debug!("Ignoring unknown cookie option '{}'", other),
            }
        }

        Ok(options)
    }
}

impl From<CookieData> for CookieOptions {
    fn from(data: CookieData) -> Self {
        Self {
            path: Some(data.path),
            http_only: Some(data.http_only),
            partitioned: Some(data.partitioned),
            secure: data.secure,
            domain: data.domain,
            same_site: data.same_site,
            priority: data.priority,
            max_age: None,
            expires: data.expires,
            original_max_age: data.original_max_age,
        }
    }
}

/// Services a cookie consults: the time source and the advisory sink
#[derive(Clone)]
pub struct CookieContext {
    clock: Arc<dyn Clock>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Default for CookieContext {
    fn default() -> Self {
        Self { clock: Arc::new(SystemClock), diagnostics: Arc::new(LogDiagnostics) }
    }
}

impl CookieContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl std::fmt::Debug for CookieContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieContext").finish_non_exhaustive()
    }
}

/// Attribute set of one session cookie
#[derive(Clone)]
pub struct CookieAttributes {
    /// Cookie path
    pub path: String,

    /// HttpOnly flag (no JavaScript access)
    pub http_only: bool,

    /// Partitioned flag, always materialized
    pub partitioned: bool,

    /// Secure flag (HTTPS only)
    pub secure: Option<bool>,

    /// Cookie domain
    pub domain: Option<String>,

    /// SameSite policy
    pub same_site: Option<SameSite>,

    /// Priority, passed through to the header
    pub priority: Option<String>,

    original_max_age: Option<i64>,
    expires: Option<DateTime<Utc>>,
    context: CookieContext,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieAttributes {
    /// Session cookie with default attributes
    pub fn new() -> Self {
        Self::create(CookieOptions::default())
    }

    pub fn create(options: CookieOptions) -> Self {
        Self::create_in(options, CookieContext::default())
    }

    /// Create with an explicit clock and diagnostics sink
    pub fn create_in(options: CookieOptions, context: CookieContext) -> Self {
        let mut cookie = Self {
            path: default_path(),
            http_only: true,
            partitioned: false,
            secure: None,
            domain: None,
            same_site: None,
            priority: None,
            original_max_age: None,
            expires: None,
            context,
        };

        if let Some(path) = options.path {
            cookie.path = path;
        }
        if let Some(http_only) = options.http_only {
            cookie.http_only = http_only;
        }
        if let Some(partitioned) = options.partitioned {
            cookie.partitioned = partitioned;
        }
        cookie.secure = options.secure;
        cookie.domain = options.domain;
        cookie.same_site = options.same_site;
        cookie.priority = options.priority;

        if let Some(expires) = options.expires {
            cookie.set_expires(Some(expires));
        }
        if let Some(max_age) = options.max_age {
            cookie.set_max_age(Some(max_age));
        }
        if options.original_max_age.is_some() {
            cookie.original_max_age = options.original_max_age;
        }

        // Must run last so an expiration from the options is already visible
        if cookie.original_max_age.is_none() {
            cookie.original_max_age = cookie.max_age();
        }

        log::trace!(
            "Created cookie attributes (path={}, expires={:?}, original_max_age={:?})",
            cookie.path,
            cookie.expires,
            cookie.original_max_age
        );

        cookie
    }

    /// Create from a dynamic mapping of attribute names to values
    pub fn from_value(value: &Value) -> CookieResult<Self> {
        Self::from_value_in(value, CookieContext::default())
    }

    pub fn from_value_in(value: &Value, context: CookieContext) -> CookieResult<Self> {
        Ok(Self::create_in(CookieOptions::from_value(value)?, context))
    }

    /// Rehydrate a persisted snapshot
    pub fn from_data(data: CookieData) -> Self {
        Self::from_data_in(data, CookieContext::default())
    }

    pub fn from_data_in(data: CookieData, context: CookieContext) -> Self {
        Self::create_in(data.into(), context)
    }

    /// Absolute expiration, `None` for a session cookie
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Set the expiration and take a fresh `original_max_age` baseline
    pub fn set_expires(&mut self, expires: Option<DateTime<Utc>>) {
        self.expires = expires;
        self.original_max_age = self.max_age();
    }

    /// Remaining lifetime in milliseconds
    ///
    /// Recomputed from `expires` on every call, so it decreases as the
    /// clock advances and goes negative once the cookie has expired.
    pub fn max_age(&self) -> Option<i64> {
        self.expires.map(|expires| (expires - self.context.clock.now()).num_milliseconds())
    }

    /// Set the expiration relative to now
    ///
    /// `None` turns the cookie into a session cookie. Passing an instant is
    /// deprecated and reported to the diagnostics sink.
    pub fn set_max_age(&mut self, max_age: Option<MaxAge>) {
        let expires = match max_age {
            Some(MaxAge::Millis(ms)) => Some(self.instant_after(ms)),
            Some(MaxAge::At(at)) => {
                self.context.diagnostics.deprecated(&MAX_AGE_AS_DATE);
                Some(at)
            }
            None => None,
        };
        self.set_expires(expires);
    }

    /// [`set_max_age`](Self::set_max_age) for a dynamic value
    ///
    /// Numbers are milliseconds, `null`, `false` and `""` clear the
    /// expiration; anything else is rejected.
    pub fn set_max_age_value(&mut self, value: &Value) -> CookieResult<()> {
        let max_age = parse_max_age(value)?;
        self.set_max_age(max_age);
        Ok(())
    }

    /// Baseline max-age captured when the expiration was last set
    pub fn original_max_age(&self) -> Option<i64> {
        self.original_max_age
    }

    /// Push the expiration back to the configured lifetime
    pub fn reset_max_age(&mut self) {
        self.set_max_age(self.original_max_age.map(MaxAge::Millis));
    }

    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|expires| expires <= self.context.clock.now())
    }

    /// Plain-data snapshot, the persisted and JSON form
    pub fn data(&self) -> CookieData {
        CookieData {
            original_max_age: self.original_max_age,
            partitioned: self.partitioned,
            priority: self.priority.clone(),
            expires: self.expires,
            secure: self.secure,
            http_only: self.http_only,
            domain: self.domain.clone(),
            path: self.path.clone(),
            same_site: self.same_site,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.data())
    }

    /// Build a `Set-Cookie` header value
    pub fn serialize(&self, name: &str, value: &str) -> Result<String, SerializeError> {
        self.serialize_with(&HeaderSerializer, name, value)
    }

    /// Build a header value with a custom serializer, its errors untouched
    pub fn serialize_with<S: CookieSerializer>(
        &self,
        serializer: &S,
        name: &str,
        value: &str,
    ) -> Result<String, S::Error> {
        serializer.serialize(name, value, &self.data())
    }

    fn instant_after(&self, ms: i64) -> DateTime<Utc> {
        let now = self.context.clock.now();
        Duration::try_milliseconds(ms)
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(if ms > 0 { DateTime::<Utc>::MAX_UTC } else { DateTime::<Utc>::MIN_UTC })
    }
}

impl std::fmt::Debug for CookieAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieAttributes")
            .field("path", &self.path)
            .field("http_only", &self.http_only)
            .field("partitioned", &self.partitioned)
            .field("secure", &self.secure)
            .field("domain", &self.domain)
            .field("same_site", &self.same_site)
            .field("priority", &self.priority)
            .field("original_max_age", &self.original_max_age)
            .field("expires", &self.expires)
            .finish()
    }
}

impl Serialize for CookieAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CookieAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        CookieData::deserialize(deserializer).map(CookieAttributes::from_data)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn as_millis(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f.trunc() as i64))
}

fn parse_max_age(value: &Value) -> CookieResult<Option<MaxAge>> {
    if value.is_number() {
        return Ok(as_millis(value).map(MaxAge::Millis));
    }
    if is_falsy(value) {
        return Ok(None);
    }
    Err(CookieError::invalid("maxAge must be a number or Date"))
}

fn opt_string(key: &str, value: &Value) -> CookieResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(CookieError::invalid(format!("{} must be a string", key))),
    }
}

fn opt_bool(key: &str, value: &Value) -> CookieResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        _ => Err(CookieError::invalid(format!("{} must be a boolean", key))),
    }
}

fn opt_millis(key: &str, value: &Value) -> CookieResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(_) => Ok(as_millis(value)),
        _ => Err(CookieError::invalid(format!("{} must be a number", key))),
    }
}

fn opt_same_site(value: &Value) -> CookieResult<Option<SameSite>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(SameSite::Enabled(*b))),
        Value::String(s) => s.parse().map(Some).map_err(CookieError::InvalidArgument),
        _ => Err(CookieError::invalid("sameSite must be a string or boolean")),
    }
}

fn opt_instant(value: &Value) -> CookieResult<Option<DateTime<Utc>>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(|e| CookieError::invalid(format!("expires is not a valid date: {}", e))),
        _ => Err(CookieError::invalid("expires must be a date string")),
    }
}
