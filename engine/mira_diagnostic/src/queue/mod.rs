//! Diagnostic queue for collecting and deduplicating diagnostics.
//!
//! Features:
//! - Error limit to prevent overwhelming output
//! - Deduplication of identical consecutive reports (a rewrite loop can
//!   hit the same failing builtin many times per pass)

use crate::Diagnostic;

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further reports are dropped
    /// (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical to the previous one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting diagnostics during evaluation.
///
/// The evaluator owns one queue per session; builtins report into it and
/// callers flush it after the pass completes.
#[derive(Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    config: DiagnosticConfig,
    error_count: usize,
    suppressed: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic, applying the error limit and deduplication.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if self.config.deduplicate && self.diagnostics.last() == Some(&diagnostic) {
            self.suppressed = self.suppressed.saturating_add(1);
            return;
        }
        if diagnostic.is_error() {
            if self.config.error_limit != 0 && self.error_count >= self.config.error_limit {
                self.suppressed = self.suppressed.saturating_add(1);
                return;
            }
            self.error_count = self.error_count.saturating_add(1);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Number of error-severity diagnostics accepted so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of diagnostics dropped by the limit or dedup.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// View the queued diagnostics without draining them.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Drain the queue, returning the accepted diagnostics in report order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        self.suppressed = 0;
        std::mem::take(&mut self.diagnostics)
    }
}
