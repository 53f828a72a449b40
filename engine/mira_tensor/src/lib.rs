//! Mira Tensor - dense numeric storage for the Mira engine.
//!
//! This crate contains the pieces of the engine that live *outside* the
//! symbolic tree:
//!
//! - `TypeTag`: element type descriptors (integer/floating/complex widths)
//!   with a process-wide registry of registered type names and a parser
//!   for raw low-level descriptors
//! - `DenseBuffer`: contiguous, homogeneously-typed, multi-dimensional
//!   storage with cheap leading-axis sub-views
//!
//! A `DenseBuffer` is treated as immutable once it has been wrapped by an
//! atom or list node. No in-place write path is exposed here; sub-views
//! share the underlying storage by reference count.

mod buffer;
mod type_tag;

pub use buffer::{common_numeric_tag, AxisEntry, BufferError, DenseBuffer, ElementKind, Scalar};
pub use type_tag::{resolve_spec_str, Category, TagError, TypeTag};
