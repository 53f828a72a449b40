//! Mira IR - the symbolic expression tree.
//!
//! This crate contains the core data structures of the rewrite engine:
//!
//! - `Symbol`: interned identifiers with O(1) equality
//! - `Node`: a unit of the symbolic tree (scalars, strings, symbols,
//!   generic expressions, list nodes, numeric-array atoms)
//! - `LiteralValue` / `LiteralSeq`: primitive values a literal node
//!   denotes, independent of symbol bindings
//! - `NumericArrayAtom`: immutable wrapper of a dense buffer and its tag
//! - `ListNode`: the eager/lazy list with a derived literal cache, one
//!   fixed-point evaluation step, and at-most-once materialization of
//!   dense buffers into symbolic children
//!
//! # Design notes
//!
//! All composite nodes are `Arc`-backed and immutable after construction.
//! "Same instance" therefore means pointer identity on the payload, and
//! every change during evaluation produces a brand-new node with a
//! freshly derived literal cache. The cache is never patched in place.

mod atom;
mod errors;
mod eval_step;
mod list;
mod literal;
mod node;
mod symbol;

pub use atom::NumericArrayAtom;
pub use errors::NodeError;
pub use eval_step::{Evaluator, Step};
pub use list::ListNode;
pub use literal::{LiteralSeq, LiteralValue};
pub use node::{ExprNode, Node};
pub use symbol::{
    sym_automatic, sym_failed, sym_false, sym_list, sym_normal, sym_numeric_array, sym_to_string,
    sym_true, sym_unevaluated, Symbol,
};
