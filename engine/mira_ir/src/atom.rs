//! The numeric-array atom.

use std::fmt;

use mira_tensor::{DenseBuffer, ElementKind, TypeTag};

use crate::errors::NodeError;
use crate::literal::LiteralSeq;

/// Immutable wrapper of a dense buffer and its element tag.
///
/// Created only by the coercion layer; the buffer is exclusively owned in
/// the sense that no in-place write path exists, so two atoms produced by
/// same-tag reuse may share one buffer safely.
///
/// Equality is elementwise-buffer-equal and tag-equal.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericArrayAtom {
    buffer: DenseBuffer,
    tag: TypeTag,
}

impl NumericArrayAtom {
    /// Wrap a numeric buffer. The tag is taken from the buffer; boolean
    /// and raw buffers are not atoms and are rejected here.
    pub fn new(buffer: DenseBuffer) -> Result<NumericArrayAtom, NodeError> {
        match buffer.kind() {
            ElementKind::Numeric(tag) => Ok(NumericArrayAtom { buffer, tag }),
            kind @ (ElementKind::Bool | ElementKind::Raw) => {
                Err(NodeError::UnsupportedElementType { kind: kind.name() })
            }
        }
    }

    pub fn buffer(&self) -> &DenseBuffer {
        &self.buffer
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn shape(&self) -> &[usize] {
        self.buffer.shape()
    }

    /// The atom's primitive sequence: the buffer itself.
    pub fn literal_seq(&self) -> LiteralSeq {
        LiteralSeq::Dense(self.buffer.clone())
    }

    /// Shape-and-type descriptor, e.g. `"2x3, Integer32"`. Reads only
    /// metadata.
    pub fn summary(&self) -> String {
        self.buffer.summary()
    }
}

impl fmt::Display for NumericArrayAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumericArray[<{}>]", self.summary())
    }
}
