//! Evaluation context: diagnostic reporting for builtins.

use mira_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use mira_ir::{Node, NodeError};

/// The context a builtin evaluates under.
///
/// Owns the diagnostic queue; builtins report recoverable failures here
/// and return the `$Failed` sentinel instead of raising.
#[derive(Debug, Default)]
pub struct EvalContext {
    diagnostics: DiagnosticQueue,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    /// Drain the queued diagnostics.
    pub fn flush_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.flush()
    }

    /// `type`: the type specification is not supported.
    pub fn message_type(&mut self, spec: &Node) {
        self.diagnostics.add(
            Diagnostic::error(
                ErrorCode::E6001,
                format!("The type specification {spec} is not supported in NumericArray."),
            )
            .with_offending(spec.to_string()),
        );
    }

    /// `data`: the data is not coercible to a numeric array.
    pub fn message_data(&mut self, data: &Node) {
        self.diagnostics.add(
            Diagnostic::error(
                ErrorCode::E6002,
                format!("Numeric data expected at position 1 in NumericArray[{data}]."),
            )
            .with_offending(data.to_string()),
        );
    }

    /// An internal invariant failure surfaced during evaluation. The
    /// operation degrades rather than raising.
    pub fn message_invariant(&mut self, error: &NodeError) {
        let code = match error {
            NodeError::UnsupportedElementType { .. } => ErrorCode::E6003,
            NodeError::HeadReassignment { .. }
            | NodeError::ReentrantMaterialization
            | NodeError::LiteralCacheBreach { .. } => ErrorCode::E9001,
        };
        self.diagnostics.add(Diagnostic::error(code, error.to_string()));
    }
}
