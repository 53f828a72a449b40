//! Primitive values carried by literal nodes.
//!
//! A literal node's value is fully known independent of symbol bindings.
//! `LiteralValue` is the primitive form of one node; `LiteralSeq` is the
//! ordered sequence a literal list node denotes. A lazy dense-backed list
//! keeps its source buffer *as* the sequence, so literal queries never
//! force materialization.

use std::sync::Arc;

use mira_tensor::{AxisEntry, DenseBuffer, Scalar};

/// The primitive value of a single literal node.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Real(f64),
    Complex { re: f64, im: f64 },
    Bool(bool),
    Str(Arc<str>),
    List(Arc<Vec<LiteralValue>>),
}

impl LiteralValue {
    /// Convert a buffer scalar to its primitive form. Raw bytes have no
    /// primitive form.
    pub fn from_scalar(scalar: Scalar) -> Option<LiteralValue> {
        match scalar {
            Scalar::Int(v) => Some(LiteralValue::Int(v)),
            Scalar::UInt(v) => Some(match i64::try_from(v) {
                Ok(v) => LiteralValue::Int(v),
                Err(_) => LiteralValue::Real(v as f64),
            }),
            Scalar::Real(v) => Some(LiteralValue::Real(v)),
            Scalar::Complex { re, im } => Some(LiteralValue::Complex { re, im }),
            Scalar::Bool(v) => Some(LiteralValue::Bool(v)),
            Scalar::Raw(_) => None,
        }
    }

    /// Convert a whole buffer to a nested primitive list.
    pub fn from_buffer(buffer: &DenseBuffer) -> Option<LiteralValue> {
        let mut out = Vec::with_capacity(buffer.outer_len());
        for entry in buffer.axis_iter() {
            out.push(match entry {
                AxisEntry::Sub(sub) => LiteralValue::from_buffer(&sub)?,
                AxisEntry::Scalar(s) => LiteralValue::from_scalar(s)?,
            });
        }
        Some(LiteralValue::List(Arc::new(out)))
    }
}

/// The ordered primitive sequence of a literal list node.
///
/// `Values` is an explicit sequence built by the literal scan; `Dense`
/// keeps the source buffer itself, answering literal queries from shape
/// metadata and element reads without building symbolic children.
#[derive(Clone, Debug)]
pub enum LiteralSeq {
    Values(Arc<Vec<LiteralValue>>),
    Dense(DenseBuffer),
}

impl LiteralSeq {
    pub fn from_values(values: Vec<LiteralValue>) -> LiteralSeq {
        LiteralSeq::Values(Arc::new(values))
    }

    pub fn len(&self) -> usize {
        match self {
            LiteralSeq::Values(v) => v.len(),
            LiteralSeq::Dense(b) => b.outer_len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The primitive value at `index`, or `None` when out of range or
    /// when a dense entry has no primitive form.
    pub fn get(&self, index: usize) -> Option<LiteralValue> {
        match self {
            LiteralSeq::Values(v) => v.get(index).cloned(),
            LiteralSeq::Dense(b) => match b.entry(index)? {
                AxisEntry::Sub(sub) => LiteralValue::from_buffer(&sub),
                AxisEntry::Scalar(s) => LiteralValue::from_scalar(s),
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<LiteralValue>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Expand to an explicit value vector (copies dense entries).
    pub fn to_values(&self) -> Option<Vec<LiteralValue>> {
        self.iter().collect()
    }
}

/// Equality is elementwise over primitive values, regardless of backing.
impl PartialEq for LiteralSeq {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::{LiteralSeq, LiteralValue};
    use mira_tensor::{DenseBuffer, ElementKind, Scalar, TypeTag};
    use pretty_assertions::assert_eq;

    fn int_buffer(shape: &[usize], values: &[i64]) -> DenseBuffer {
        let scalars: Vec<Scalar> = values.iter().map(|&v| Scalar::Int(v)).collect();
        DenseBuffer::from_scalars(ElementKind::Numeric(TypeTag::Int64), shape, &scalars)
            .expect("valid buffer")
    }

    #[test]
    fn dense_seq_reads_without_expanding() {
        let seq = LiteralSeq::Dense(int_buffer(&[3], &[10, 20, 30]));
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(2), Some(LiteralValue::Int(30)));
        assert_eq!(seq.get(3), None);
    }

    #[test]
    fn dense_and_explicit_sequences_compare_equal() {
        let dense = LiteralSeq::Dense(int_buffer(&[2], &[1, 2]));
        let explicit =
            LiteralSeq::from_values(vec![LiteralValue::Int(1), LiteralValue::Int(2)]);
        assert_eq!(dense, explicit);
    }

    #[test]
    fn nested_dense_entries_become_nested_lists() {
        let seq = LiteralSeq::Dense(int_buffer(&[2, 2], &[1, 2, 3, 4]));
        assert_eq!(
            seq.get(1),
            Some(LiteralValue::List(
                vec![LiteralValue::Int(3), LiteralValue::Int(4)].into()
            ))
        );
    }

    #[test]
    fn raw_scalars_have_no_primitive_form() {
        assert_eq!(LiteralValue::from_scalar(Scalar::Raw(7)), None);
    }
}
