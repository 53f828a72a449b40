//! Element type tags and the type-specification resolver.
//!
//! A `TypeTag` names one concrete numeric element type. Tags come from
//! three places: the inference marker (`Automatic`), the fixed registry of
//! registered type names (`"Integer32"`, `"Real64"`, ...), or a raw
//! low-level descriptor (`"int32"`, `"f8"`, ...). Resolution never yields
//! a partial tag: it either produces a valid numeric tag or fails with
//! [`TagError`].

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Numeric category of an element type.
///
/// Every tag belongs to exactly one of these; a tag is never assigned a
/// non-numeric category.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Category {
    Integer,
    Floating,
    Complex,
}

/// Concrete element type of a dense buffer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeTag {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Real32,
    Real64,
    Complex64,
    Complex128,
}

/// Failure to resolve a type specification.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum TagError {
    /// The specification names no registered type and is not a valid raw
    /// descriptor of a numeric type.
    #[error("the type specification {spec:?} is not supported")]
    Unsupported { spec: String },
}

impl TypeTag {
    pub const ALL: [TypeTag; 12] = [
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::UInt8,
        TypeTag::UInt16,
        TypeTag::UInt32,
        TypeTag::UInt64,
        TypeTag::Real32,
        TypeTag::Real64,
        TypeTag::Complex64,
        TypeTag::Complex128,
    ];

    /// Numeric category of this tag.
    pub fn category(self) -> Category {
        match self {
            TypeTag::Int8
            | TypeTag::Int16
            | TypeTag::Int32
            | TypeTag::Int64
            | TypeTag::UInt8
            | TypeTag::UInt16
            | TypeTag::UInt32
            | TypeTag::UInt64 => Category::Integer,
            TypeTag::Real32 | TypeTag::Real64 => Category::Floating,
            TypeTag::Complex64 | TypeTag::Complex128 => Category::Complex,
        }
    }

    /// Bit width of one element (the full complex element, not one part).
    pub fn bit_width(self) -> u16 {
        match self {
            TypeTag::Int8 | TypeTag::UInt8 => 8,
            TypeTag::Int16 | TypeTag::UInt16 => 16,
            TypeTag::Int32 | TypeTag::UInt32 | TypeTag::Real32 => 32,
            TypeTag::Int64 | TypeTag::UInt64 | TypeTag::Real64 | TypeTag::Complex64 => 64,
            TypeTag::Complex128 => 128,
        }
    }

    pub fn is_signed(self) -> bool {
        !matches!(
            self,
            TypeTag::UInt8 | TypeTag::UInt16 | TypeTag::UInt32 | TypeTag::UInt64
        )
    }

    /// Registered name of this tag (the key users write in type specs).
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Int8 => "Integer8",
            TypeTag::Int16 => "Integer16",
            TypeTag::Int32 => "Integer32",
            TypeTag::Int64 => "Integer64",
            TypeTag::UInt8 => "UnsignedInteger8",
            TypeTag::UInt16 => "UnsignedInteger16",
            TypeTag::UInt32 => "UnsignedInteger32",
            TypeTag::UInt64 => "UnsignedInteger64",
            TypeTag::Real32 => "Real32",
            TypeTag::Real64 => "Real64",
            TypeTag::Complex64 => "Complex64",
            TypeTag::Complex128 => "Complex128",
        }
    }

    /// Look up a registered type name.
    pub fn from_registered_name(name: &str) -> Option<TypeTag> {
        registry().get(name).copied()
    }

    /// Parse a raw low-level descriptor: a lowercase name (`"int32"`,
    /// `"float64"`, `"complex128"`) or a width code (`"i4"`, `"u1"`,
    /// `"f8"`, `"c16"`, widths in bytes).
    ///
    /// Descriptors of non-numeric types (e.g. `"bool"`) are rejected; the
    /// resolver must never fall back to an untyped buffer.
    pub fn parse_descriptor(descriptor: &str) -> Option<TypeTag> {
        let tag = match descriptor {
            "int8" | "i1" => TypeTag::Int8,
            "int16" | "i2" => TypeTag::Int16,
            "int32" | "i4" => TypeTag::Int32,
            "int64" | "i8" => TypeTag::Int64,
            "uint8" | "u1" => TypeTag::UInt8,
            "uint16" | "u2" => TypeTag::UInt16,
            "uint32" | "u4" => TypeTag::UInt32,
            "uint64" | "u8" => TypeTag::UInt64,
            "float32" | "f4" => TypeTag::Real32,
            "float64" | "f8" => TypeTag::Real64,
            "complex64" | "c8" => TypeTag::Complex64,
            "complex128" | "c16" => TypeTag::Complex128,
            _ => return None,
        };
        Some(tag)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The process-wide registry of registered type names.
///
/// Initialized once, read-only thereafter.
fn registry() -> &'static FxHashMap<&'static str, TypeTag> {
    static REGISTRY: OnceLock<FxHashMap<&'static str, TypeTag>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = FxHashMap::default();
        for tag in TypeTag::ALL {
            map.insert(tag.name(), tag);
        }
        map
    })
}

/// The inference marker accepted by [`resolve_spec_str`].
const INFERENCE_MARKER: &str = "Automatic";

/// Resolve a type specification string.
///
/// Returns `Ok(None)` for the inference marker, `Ok(Some(tag))` for a
/// registered name or a valid raw descriptor, and `Err` otherwise.
pub fn resolve_spec_str(spec: &str) -> Result<Option<TypeTag>, TagError> {
    if spec == INFERENCE_MARKER {
        return Ok(None);
    }
    if let Some(tag) = TypeTag::from_registered_name(spec) {
        return Ok(Some(tag));
    }
    if let Some(tag) = TypeTag::parse_descriptor(spec) {
        return Ok(Some(tag));
    }
    Err(TagError::Unsupported {
        spec: spec.to_string(),
    })
}

#[cfg(test)]
mod tests;
