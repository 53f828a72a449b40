//! Contiguous, homogeneously-typed, multi-dimensional storage.
//!
//! A [`DenseBuffer`] is a shape (ordered non-negative extents) over flat
//! row-major storage of one element kind. Indexing along the leading axis
//! yields either a sub-buffer view (sharing the same storage) or a scalar,
//! so an N-dimensional buffer decomposes without copying.
//!
//! Buffers are immutable once constructed. Views hold a reference-counted
//! handle on the storage; two atoms may share one buffer safely because no
//! in-place write path exists.

use std::sync::Arc;

use smallvec::SmallVec;
use thiserror::Error;

use crate::type_tag::TypeTag;

/// Shape storage; most arrays in practice are rank <= 4.
pub(crate) type Shape = SmallVec<[usize; 4]>;

/// Element kind of a buffer.
///
/// `Numeric` kinds are the only ones an atom may carry; `Bool` buffers
/// arrive from logical data sources and are promoted on materialization;
/// `Raw` buffers are untyped bytes with no promotion rule.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElementKind {
    Numeric(TypeTag),
    Bool,
    Raw,
}

impl ElementKind {
    /// Display name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Numeric(tag) => tag.name(),
            ElementKind::Bool => "Boolean",
            ElementKind::Raw => "Raw",
        }
    }

    /// The numeric tag, when this kind has one.
    pub fn tag(self) -> Option<TypeTag> {
        match self {
            ElementKind::Numeric(tag) => Some(tag),
            ElementKind::Bool | ElementKind::Raw => None,
        }
    }
}

/// A single element read out of a buffer, widened to its category's
/// largest width. Same-kind buffers read out identically, so elementwise
/// equality over these is exact.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Real(f64),
    Complex { re: f64, im: f64 },
    Bool(bool),
    Raw(u8),
}

impl Scalar {
    pub fn kind_name(self) -> &'static str {
        match self {
            Scalar::Int(_) => "integer",
            Scalar::UInt(_) => "unsigned integer",
            Scalar::Real(_) => "real",
            Scalar::Complex { .. } => "complex",
            Scalar::Bool(_) => "boolean",
            Scalar::Raw(_) => "raw byte",
        }
    }

    /// The scalar as a real part pair, for complex targets.
    fn as_complex(self) -> Option<(f64, f64)> {
        match self {
            Scalar::Int(v) => Some((v as f64, 0.0)),
            Scalar::UInt(v) => Some((v as f64, 0.0)),
            Scalar::Real(v) => Some((v, 0.0)),
            Scalar::Complex { re, im } => Some((re, im)),
            Scalar::Bool(v) => Some((f64::from(u8::from(v)), 0.0)),
            Scalar::Raw(_) => None,
        }
    }

    /// The scalar as a real value; complex and raw have none.
    fn as_real(self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(v as f64),
            Scalar::UInt(v) => Some(v as f64),
            Scalar::Real(v) => Some(v),
            Scalar::Bool(v) => Some(f64::from(u8::from(v))),
            Scalar::Complex { .. } | Scalar::Raw(_) => None,
        }
    }

    /// The scalar as a signed integer, truncating reals toward zero;
    /// complex and raw have none. Booleans use the fixed 0/1 table.
    fn as_int(self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(v),
            // Wraps above i64::MAX, matching fixed-width store behavior.
            Scalar::UInt(v) => Some(v as i64),
            Scalar::Real(v) => Some(v as i64),
            Scalar::Bool(v) => Some(i64::from(v)),
            Scalar::Complex { .. } | Scalar::Raw(_) => None,
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Real(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

/// Failure to build or cast a buffer.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum BufferError {
    #[error("shape holds {expected} elements but {got} were supplied")]
    ShapeMismatch { expected: usize, got: usize },
    #[error("cannot cast a {from} element to {to}")]
    Cast { from: &'static str, to: &'static str },
}

/// Flat homogeneous storage, one variant per element kind.
#[derive(Clone, Debug)]
enum Storage {
    I8(Arc<[i8]>),
    I16(Arc<[i16]>),
    I32(Arc<[i32]>),
    I64(Arc<[i64]>),
    U8(Arc<[u8]>),
    U16(Arc<[u16]>),
    U32(Arc<[u32]>),
    U64(Arc<[u64]>),
    F32(Arc<[f32]>),
    F64(Arc<[f64]>),
    // Complex elements as [re, im] pairs.
    C64(Arc<[[f32; 2]]>),
    C128(Arc<[[f64; 2]]>),
    Bool(Arc<[bool]>),
    Raw(Arc<[u8]>),
}

impl Storage {
    fn kind(&self) -> ElementKind {
        match self {
            Storage::I8(_) => ElementKind::Numeric(TypeTag::Int8),
            Storage::I16(_) => ElementKind::Numeric(TypeTag::Int16),
            Storage::I32(_) => ElementKind::Numeric(TypeTag::Int32),
            Storage::I64(_) => ElementKind::Numeric(TypeTag::Int64),
            Storage::U8(_) => ElementKind::Numeric(TypeTag::UInt8),
            Storage::U16(_) => ElementKind::Numeric(TypeTag::UInt16),
            Storage::U32(_) => ElementKind::Numeric(TypeTag::UInt32),
            Storage::U64(_) => ElementKind::Numeric(TypeTag::UInt64),
            Storage::F32(_) => ElementKind::Numeric(TypeTag::Real32),
            Storage::F64(_) => ElementKind::Numeric(TypeTag::Real64),
            Storage::C64(_) => ElementKind::Numeric(TypeTag::Complex64),
            Storage::C128(_) => ElementKind::Numeric(TypeTag::Complex128),
            Storage::Bool(_) => ElementKind::Bool,
            Storage::Raw(_) => ElementKind::Raw,
        }
    }

    fn read(&self, i: usize) -> Scalar {
        match self {
            Storage::I8(d) => Scalar::Int(i64::from(d[i])),
            Storage::I16(d) => Scalar::Int(i64::from(d[i])),
            Storage::I32(d) => Scalar::Int(i64::from(d[i])),
            Storage::I64(d) => Scalar::Int(d[i]),
            Storage::U8(d) => Scalar::UInt(u64::from(d[i])),
            Storage::U16(d) => Scalar::UInt(u64::from(d[i])),
            Storage::U32(d) => Scalar::UInt(u64::from(d[i])),
            Storage::U64(d) => Scalar::UInt(d[i]),
            Storage::F32(d) => Scalar::Real(f64::from(d[i])),
            Storage::F64(d) => Scalar::Real(d[i]),
            Storage::C64(d) => Scalar::Complex {
                re: f64::from(d[i][0]),
                im: f64::from(d[i][1]),
            },
            Storage::C128(d) => Scalar::Complex {
                re: d[i][0],
                im: d[i][1],
            },
            Storage::Bool(d) => Scalar::Bool(d[i]),
            Storage::Raw(d) => Scalar::Raw(d[i]),
        }
    }
}

/// One entry along a buffer's leading axis.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisEntry {
    /// A sub-buffer view over the remaining axes (rank > 1).
    Sub(DenseBuffer),
    /// A scalar element (rank 1).
    Scalar(Scalar),
}

/// Dense multi-dimensional buffer: shape over flat row-major storage.
///
/// Cloning and leading-axis sub-views are cheap; storage is shared.
#[derive(Clone, Debug)]
pub struct DenseBuffer {
    shape: Shape,
    /// Flat offset of this view's first element.
    offset: usize,
    data: Storage,
}

impl DenseBuffer {
    /// Build a buffer of `kind` with the given shape from scalars in
    /// row-major order, casting each element to the target kind.
    pub fn from_scalars(
        kind: ElementKind,
        shape: &[usize],
        elements: &[Scalar],
    ) -> Result<DenseBuffer, BufferError> {
        let expected: usize = shape.iter().product();
        if expected != elements.len() {
            return Err(BufferError::ShapeMismatch {
                expected,
                got: elements.len(),
            });
        }
        let data = Storage::collect(kind, elements)?;
        Ok(DenseBuffer {
            shape: Shape::from_slice(shape),
            offset: 0,
            data,
        })
    }

    /// Element kind of the storage.
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// The numeric tag, when the storage is numeric.
    pub fn tag(&self) -> Option<TypeTag> {
        self.kind().tag()
    }

    /// Ordered extents of this view.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements in this view.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extent of the leading axis.
    pub fn outer_len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Elements spanned by one step along the leading axis.
    fn outer_stride(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// The entry at `index` along the leading axis, or `None` when out of
    /// range. Sub-buffers share this buffer's storage.
    pub fn entry(&self, index: usize) -> Option<AxisEntry> {
        if index >= self.outer_len() {
            return None;
        }
        if self.rank() == 1 {
            return Some(AxisEntry::Scalar(self.data.read(self.offset + index)));
        }
        let stride = self.outer_stride();
        Some(AxisEntry::Sub(DenseBuffer {
            shape: self.shape.iter().skip(1).copied().collect(),
            offset: self.offset + index * stride,
            data: self.data.clone(),
        }))
    }

    /// Iterate the leading axis in order.
    pub fn axis_iter(&self) -> impl Iterator<Item = AxisEntry> + '_ {
        (0..self.outer_len()).filter_map(|i| self.entry(i))
    }

    /// Iterate every element of this view in row-major order.
    pub fn flat_iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).map(|i| self.data.read(self.offset + i))
    }

    /// Cast this buffer to another kind, copying the elements.
    ///
    /// Same-kind casts still copy; callers that want same-tag reuse check
    /// the kind first and keep the original handle.
    pub fn cast(&self, kind: ElementKind) -> Result<DenseBuffer, BufferError> {
        let elements: Vec<Scalar> = self.flat_iter().collect();
        DenseBuffer::from_scalars(kind, &self.shape, &elements)
    }

    /// Shape-and-type descriptor, e.g. `"2x3, Integer32"`. Reads only
    /// metadata; never touches elements.
    pub fn summary(&self) -> String {
        let dims = self
            .shape
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("x");
        format!("{dims}, {}", self.kind().name())
    }
}

/// Elementwise equality: kinds, shapes, and every element equal.
impl PartialEq for DenseBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.shape == other.shape
            && self.flat_iter().eq(other.flat_iter())
    }
}

impl Storage {
    /// Collect scalars into storage of `kind`, casting each.
    fn collect(kind: ElementKind, elements: &[Scalar]) -> Result<Storage, BufferError> {
        fn cast_err(from: Scalar, kind: ElementKind) -> BufferError {
            BufferError::Cast {
                from: from.kind_name(),
                to: kind.name(),
            }
        }

        // Float-to-int conversion saturates at the bounds of i64 before
        // the width wrap below, matching `as` semantics throughout.
        macro_rules! ints {
            ($variant:ident, $ty:ty) => {{
                let mut out: Vec<$ty> = Vec::with_capacity(elements.len());
                for &e in elements {
                    let v = e.as_int().ok_or_else(|| cast_err(e, kind))?;
                    out.push(v as $ty);
                }
                Storage::$variant(out.into())
            }};
        }

        let tag = match kind {
            ElementKind::Numeric(tag) => tag,
            // Bool and Raw are source kinds, never coercion targets.
            ElementKind::Bool | ElementKind::Raw => {
                let from = elements.first().copied().unwrap_or(Scalar::Int(0));
                return Err(cast_err(from, kind));
            }
        };

        let storage = match tag {
            TypeTag::Int8 => ints!(I8, i8),
            TypeTag::Int16 => ints!(I16, i16),
            TypeTag::Int32 => ints!(I32, i32),
            TypeTag::Int64 => ints!(I64, i64),
            TypeTag::UInt8 => ints!(U8, u8),
            TypeTag::UInt16 => ints!(U16, u16),
            TypeTag::UInt32 => ints!(U32, u32),
            TypeTag::UInt64 => ints!(U64, u64),
            TypeTag::Real32 => {
                let mut out: Vec<f32> = Vec::with_capacity(elements.len());
                for &e in elements {
                    let v = e.as_real().ok_or_else(|| cast_err(e, kind))?;
                    out.push(v as f32);
                }
                Storage::F32(out.into())
            }
            TypeTag::Real64 => {
                let mut out: Vec<f64> = Vec::with_capacity(elements.len());
                for &e in elements {
                    out.push(e.as_real().ok_or_else(|| cast_err(e, kind))?);
                }
                Storage::F64(out.into())
            }
            TypeTag::Complex64 => {
                let mut out: Vec<[f32; 2]> = Vec::with_capacity(elements.len());
                for &e in elements {
                    let (re, im) = e.as_complex().ok_or_else(|| cast_err(e, kind))?;
                    out.push([re as f32, im as f32]);
                }
                Storage::C64(out.into())
            }
            TypeTag::Complex128 => {
                let mut out: Vec<[f64; 2]> = Vec::with_capacity(elements.len());
                for &e in elements {
                    let (re, im) = e.as_complex().ok_or_else(|| cast_err(e, kind))?;
                    out.push([re, im]);
                }
                Storage::C128(out.into())
            }
        };
        Ok(storage)
    }
}

/// Build a boolean buffer directly (a logical data source).
impl DenseBuffer {
    pub fn from_bools(shape: &[usize], elements: &[bool]) -> Result<DenseBuffer, BufferError> {
        let expected: usize = shape.iter().product();
        if expected != elements.len() {
            return Err(BufferError::ShapeMismatch {
                expected,
                got: elements.len(),
            });
        }
        Ok(DenseBuffer {
            shape: Shape::from_slice(shape),
            offset: 0,
            data: Storage::Bool(elements.to_vec().into()),
        })
    }

    /// Build a raw byte buffer (untyped external payload).
    pub fn from_raw_bytes(shape: &[usize], elements: &[u8]) -> Result<DenseBuffer, BufferError> {
        let expected: usize = shape.iter().product();
        if expected != elements.len() {
            return Err(BufferError::ShapeMismatch {
                expected,
                got: elements.len(),
            });
        }
        Ok(DenseBuffer {
            shape: Shape::from_slice(shape),
            offset: 0,
            data: Storage::Raw(elements.to_vec().into()),
        })
    }
}

/// Narrowest common numeric tag for mixed scalar data: any complex leaf
/// widens everything to `Complex128`, any real leaf to `Real64`,
/// otherwise `Int64`. Boolean-only data does not come through here (it
/// takes the fixed 0/1 promotion to `UInt8` instead).
pub fn common_numeric_tag(has_real: bool, has_complex: bool) -> TypeTag {
    if has_complex {
        TypeTag::Complex128
    } else if has_real {
        TypeTag::Real64
    } else {
        TypeTag::Int64
    }
}
