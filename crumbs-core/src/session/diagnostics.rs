//! Advisory diagnostics (deprecations) raised by cookie handling
//!
//! Deprecations never interrupt execution. They are handed to a
//! [`Diagnostics`] sink so applications can route them to their logger,
//! silence them, or assert on them in tests.

use std::sync::Mutex;

/// Namespace under which deprecations are reported
pub const DEPRECATION_NAMESPACE: &str = "crumbs-session";

/// A non-fatal deprecation notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationWarning {
    pub namespace: &'static str,
    pub message: &'static str,
}

impl DeprecationWarning {
    pub const fn new(message: &'static str) -> Self {
        Self { namespace: DEPRECATION_NAMESPACE, message }
    }
}

impl std::fmt::Display for DeprecationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} deprecated {}", self.namespace, self.message)
    }
}

/// Sink for advisory events
pub trait Diagnostics: Send + Sync {
    fn deprecated(&self, warning: &DeprecationWarning);
}

/// Reports deprecations through the `log` facade at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn deprecated(&self, warning: &DeprecationWarning) {
        log::warn!(target: "crumbs::deprecation", "{}", warning);
    }
}

/// Drops every notice
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn deprecated(&self, _warning: &DeprecationWarning) {}
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: Mutex<Vec<DeprecationWarning>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices recorded so far, oldest first
    pub fn warnings(&self) -> Vec<DeprecationWarning> {
        match self.warnings.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warnings().is_empty()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn deprecated(&self, warning: &DeprecationWarning) {
        match self.warnings.lock() {
            Ok(mut guard) => guard.push(warning.clone()),
            Err(poisoned) => poisoned.into_inner().push(warning.clone()),
        }
    }
}
