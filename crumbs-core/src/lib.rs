//! Crumbs - Core
//!
//! Session cookie attributes for server-side session layers.
//!
//! # Overview
//!
//! A session layer hands out one cookie per session. [`CookieAttributes`]
//! holds that cookie's attributes and keeps its two views of expiration
//! consistent: `expires` (an absolute instant, the only stored value) and
//! `max_age` (milliseconds left, always derived). It also remembers the
//! `original_max_age` captured when the expiration was last set, which
//! rolling-session logic uses to renew the cookie.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use crumbs_core::session::{CookieAttributes, CookieOptions};
//!
//! let mut cookie = CookieAttributes::create(CookieOptions::new().with_max_age(60_000));
//! let header = cookie.serialize("sid", "abc123")?;
//! let snapshot = cookie.data(); // persisted by the session store
//! ```
//!
//! # Architecture
//!
//! - [`session`] - Cookie attributes, snapshot, header serializer, clock and diagnostics
//! - [`config`] - Cookie defaults from TOML and environment variables
//! - [`logging`] - `env_logger` setup for the `log` facade

pub mod config; // Configuration system with TOML support
pub mod error;
pub mod logging;
pub mod session;

pub use error::{CookieError, CookieResult};
pub use session::{CookieAttributes, CookieData, CookieOptions, MaxAge};
