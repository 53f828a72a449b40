//! Mira Eval - evaluator driver and the `NumericArray` bridge.
//!
//! This crate hosts the builtin-facing side of the numeric-array layer:
//!
//! - `EvalContext`: diagnostic reporting for recoverable failures
//! - `numeric_array`: construct, normal-form, and display-summary over
//!   the symbolic tree
//! - `Interpreter`: the single fixed-point step driver that dispatches
//!   list nodes and the `NumericArray`/`Normal` heads, plus a bounded
//!   fixed-point loop over that step
//!
//! Failures here are recoverable by contract: a diagnostic goes to the
//! context's queue and the operation returns the `$Failed` sentinel.
//! Nothing raises across the pipeline.

mod context;
mod interpreter;
pub mod numeric_array;

pub use context::EvalContext;
pub use interpreter::Interpreter;
