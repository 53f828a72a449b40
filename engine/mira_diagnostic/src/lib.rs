//! Diagnostic system for the Mira evaluator.
//!
//! Evaluation in Mira never unwinds across the rewrite pipeline: builtins
//! report problems as diagnostics and return a failure sentinel to the
//! caller. This crate provides the pieces they report with:
//!
//! - `ErrorCode` for searchability (`E####`, phase-keyed)
//! - `Diagnostic` — code, severity, message, offending-expression text
//! - `DiagnosticQueue` — collection with an error limit and deduplication

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;
