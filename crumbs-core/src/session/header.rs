//! `Set-Cookie` header serialization

use super::{CookieData, SameSite, SameSitePolicy};
use chrono::Datelike;

/// Turns a name, a value and an attribute snapshot into a header value
pub trait CookieSerializer {
    type Error;

    fn serialize(&self, name: &str, value: &str, attributes: &CookieData)
        -> Result<String, Self::Error>;
}

/// Header serialization errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error("argument name is invalid: {0:?}")]
    InvalidName(String),
    #[error("argument val is invalid: {0:?}")]
    InvalidValue(String),
    #[error("option domain is invalid: {0:?}")]
    InvalidDomain(String),
    #[error("option path is invalid: {0:?}")]
    InvalidPath(String),
    #[error("option priority is invalid: {0:?}")]
    InvalidPriority(String),
    #[error("option expires is invalid: {0}")]
    InvalidExpires(String),
}

/// RFC 6265 `Set-Cookie` serializer
///
/// Values are percent-encoded the way `encodeURIComponent` does it before
/// they are written. `originalMaxAge` is
/// session bookkeeping and never turns into a `Max-Age` attribute; the
/// expiration travels as `Expires`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderSerializer;

impl CookieSerializer for HeaderSerializer {
    type Error = SerializeError;

    fn serialize(
        &self,
        name: &str,
        value: &str,
        attributes: &CookieData,
    ) -> Result<String, SerializeError> {
        if !is_cookie_name(name) {
            return Err(SerializeError::InvalidName(name.to_string()));
        }

        let encoded = encode_value(value);
        if !is_cookie_value(&encoded) {
            return Err(SerializeError::InvalidValue(value.to_string()));
        }

        let mut parts = vec![format!("{}={}", name, encoded)];

        if let Some(ref domain) = attributes.domain {
            if !is_domain_value(domain) {
                return Err(SerializeError::InvalidDomain(domain.clone()));
            }
            parts.push(format!("Domain={}", domain));
        }

        if !is_path_value(&attributes.path) {
            return Err(SerializeError::InvalidPath(attributes.path.clone()));
        }
        parts.push(format!("Path={}", attributes.path));

        if let Some(expires) = attributes.expires {
            // cookie-date allows at most four year digits
            if !(0..=9999).contains(&expires.year()) {
                return Err(SerializeError::InvalidExpires(expires.to_rfc3339()));
            }
            parts.push(format!("Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT")));
        }

        if attributes.http_only {
            parts.push("HttpOnly".to_string());
        }

        if attributes.secure == Some(true) {
            parts.push("Secure".to_string());
        }

        if attributes.partitioned {
            parts.push("Partitioned".to_string());
        }

        if let Some(ref priority) = attributes.priority {
            let priority = match priority.to_ascii_lowercase().as_str() {
                "low" => "Low",
                "medium" => "Medium",
                "high" => "High",
                _ => return Err(SerializeError::InvalidPriority(priority.clone())),
            };
            parts.push(format!("Priority={}", priority));
        }

        let same_site = match attributes.same_site {
            Some(SameSite::Enabled(true)) | Some(SameSite::Policy(SameSitePolicy::Strict)) => {
                Some("Strict")
            }
            Some(SameSite::Policy(SameSitePolicy::Lax)) => Some("Lax"),
            Some(SameSite::Policy(SameSitePolicy::None)) => Some("None"),
            Some(SameSite::Enabled(false)) | None => None,
        };
        if let Some(same_site) = same_site {
            parts.push(format!("SameSite={}", same_site));
        }

        Ok(parts.join("; "))
    }
}

/// Percent-encode, leaving `!'()*` as is
fn encode_value(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Visible ASCII except `;` and `=`
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (0x21..=0x7e).contains(&b) && b != b';' && b != b'=')
}

fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2b | 0x2d..=0x3a | 0x3c..=0x5b | 0x5d..=0x7e)
}

/// `*cookie-octet` or the same wrapped in double quotes
fn is_cookie_value(value: &str) -> bool {
    let bytes = value.as_bytes();
    let inner = if bytes.len() >= 2 && bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
        &bytes[1..bytes.len() - 1]
    } else {
        bytes
    };
    inner.iter().all(|&b| is_cookie_octet(b))
}

/// Dot-separated labels, an optional leading dot
fn is_domain_value(domain: &str) -> bool {
    let domain = domain.strip_prefix('.').unwrap_or(domain);
    !domain.is_empty()
        && domain.split('.').all(|label| {
            let bytes = label.as_bytes();
            !bytes.is_empty()
                && bytes.len() <= 63
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
                && bytes[0] != b'-'
                && bytes[bytes.len() - 1] != b'-'
        })
}

/// Printable ASCII except `;` and `<`
fn is_path_value(path: &str) -> bool {
    path.bytes().all(|b| (0x20..=0x7e).contains(&b) && b != b';' && b != b'<')
}
