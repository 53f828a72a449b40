//! The `NumericArray` bridge: construct, normal-form, display-summary.
//!
//! `construct` moves data from the symbolic tree into a dense buffer:
//! resolve the type spec, coerce the data, wrap the result as an atom
//! inside a head-wrapped expression that carries the buffer as its
//! trusted literal sequence. `normal_form` reverses it through the lazy
//! materialization engine. `display_summary` renders the shape/type
//! descriptor without touching elements.
//!
//! Failures are recoverable: a `type` or `data` diagnostic goes to the
//! context and the operation returns the `$Failed` sentinel.

use std::sync::Arc;

use tracing::debug;

use mira_ir::{
    sym_automatic, sym_failed, sym_numeric_array, ListNode, LiteralSeq, LiteralValue, Node,
    NodeError, NumericArrayAtom,
};
use mira_tensor::{
    common_numeric_tag, resolve_spec_str, DenseBuffer, ElementKind, Scalar, TypeTag,
};

use crate::context::EvalContext;

/// The `$Failed` sentinel.
pub fn failed() -> Node {
    Node::Symbol(sym_failed())
}

/// A resolved type specification.
enum TagSpec {
    /// Infer the tag from the data.
    Infer,
    Concrete(TypeTag),
}

/// Resolve a type-spec node: the inference marker, a registered name, or
/// a raw descriptor. On failure the `type` diagnostic is reported and
/// `None` returned; no partial tag ever escapes.
fn resolve_tag(spec: &Node, ctx: &mut EvalContext) -> Option<TagSpec> {
    let key = match spec {
        Node::Symbol(s) if *s == sym_automatic() => return Some(TagSpec::Infer),
        Node::Symbol(s) => s.as_str(),
        Node::Str(s) => &**s,
        _ => {
            ctx.message_type(spec);
            return None;
        }
    };
    match resolve_spec_str(key) {
        Ok(None) => Some(TagSpec::Infer),
        Ok(Some(tag)) => Some(TagSpec::Concrete(tag)),
        Err(_) => {
            ctx.message_type(spec);
            None
        }
    }
}

/// Coercion input, as a closed union. Classification is structural;
/// nothing is probed for the presence of fields.
enum CoerceSource<'a> {
    /// Already an atom: reuse its buffer.
    Atom(&'a NumericArrayAtom),
    /// A head-wrapped array expression carrying an inner atom.
    WrappedAtom(&'a NumericArrayAtom),
    /// A list node that already carries its primitive values.
    LiteralList(&'a LiteralSeq),
    /// Anything else: convert to nested primitives from scratch.
    Generic(&'a Node),
}

fn classify(data: &Node) -> CoerceSource<'_> {
    match data {
        Node::Array(atom) => CoerceSource::Atom(atom),
        Node::Expr(expr) => match (data.head_symbol(), expr.args().first()) {
            (Some(head), Some(Node::Array(atom))) if head == sym_numeric_array() => {
                CoerceSource::WrappedAtom(atom)
            }
            _ => CoerceSource::Generic(data),
        },
        Node::List(list) => match list.literal_seq() {
            Some(seq) => CoerceSource::LiteralList(seq),
            None => CoerceSource::Generic(data),
        },
        _ => CoerceSource::Generic(data),
    }
}

/// Scalar categories seen while flattening, for tag inference.
#[derive(Default)]
struct SeenCategories {
    boolean: bool,
    real: bool,
    complex: bool,
}

impl SeenCategories {
    /// The inferred tag: all-boolean data takes the fixed 0/1 table into
    /// `UnsignedInteger8`; mixed data widens to the narrowest common
    /// numeric category.
    fn infer(&self, saw_numeric: bool) -> TypeTag {
        if self.boolean && !saw_numeric {
            TypeTag::UInt8
        } else {
            common_numeric_tag(self.real, self.complex)
        }
    }
}

struct Flattened {
    shape: Vec<usize>,
    scalars: Vec<Scalar>,
    seen: SeenCategories,
    saw_numeric: bool,
}

/// Flatten nested primitive values into shape + row-major scalars,
/// verifying rectangularity. Any non-numeric leaf fails.
fn flatten(values: &[LiteralValue]) -> Option<Flattened> {
    // Shape from the first spine; the walk verifies every sibling.
    let mut shape = vec![values.len()];
    let mut probe = values;
    while let Some(LiteralValue::List(items)) = probe.first() {
        shape.push(items.len());
        probe = items;
    }

    let mut out = Flattened {
        scalars: Vec::new(),
        seen: SeenCategories::default(),
        saw_numeric: false,
        shape,
    };
    if walk(values, 0, &mut out) {
        Some(out)
    } else {
        None
    }
}

fn walk(values: &[LiteralValue], level: usize, out: &mut Flattened) -> bool {
    if values.len() != out.shape[level] {
        return false;
    }
    let leaf = level + 1 == out.shape.len();
    for value in values {
        match value {
            LiteralValue::List(items) => {
                if leaf || !walk(items, level + 1, out) {
                    return false;
                }
            }
            LiteralValue::Int(v) => {
                if !leaf {
                    return false;
                }
                out.saw_numeric = true;
                out.scalars.push(Scalar::Int(*v));
            }
            LiteralValue::Real(v) => {
                if !leaf {
                    return false;
                }
                out.saw_numeric = true;
                out.seen.real = true;
                out.scalars.push(Scalar::Real(*v));
            }
            LiteralValue::Complex { re, im } => {
                if !leaf {
                    return false;
                }
                out.saw_numeric = true;
                out.seen.complex = true;
                out.scalars.push(Scalar::Complex { re: *re, im: *im });
            }
            LiteralValue::Bool(v) => {
                if !leaf {
                    return false;
                }
                out.seen.boolean = true;
                out.scalars.push(Scalar::Bool(*v));
            }
            // Strings (or anything else) are non-numeric leaves.
            LiteralValue::Str(_) => return false,
        }
    }
    true
}

/// Build a buffer from nested primitives under the requested or
/// inferred tag.
fn buffer_from_values(
    values: &[LiteralValue],
    requested: Option<TypeTag>,
) -> Option<DenseBuffer> {
    let flat = flatten(values)?;
    let tag = requested.unwrap_or_else(|| flat.seen.infer(flat.saw_numeric));
    DenseBuffer::from_scalars(ElementKind::Numeric(tag), &flat.shape, &flat.scalars).ok()
}

/// Coerce `data` into a buffer of the requested tag (or an inferred one).
///
/// Post-condition: the result's tag equals the requested tag, casting if
/// needed; a buffer is only reused without copy when the tags already
/// agree. Non-numeric data yields `None`, never an untyped buffer.
fn coerce(data: &Node, requested: Option<TypeTag>) -> Option<DenseBuffer> {
    match classify(data) {
        CoerceSource::Atom(atom) | CoerceSource::WrappedAtom(atom) => match requested {
            Some(tag) if atom.tag() != tag => {
                atom.buffer().cast(ElementKind::Numeric(tag)).ok()
            }
            // Same-tag reuse: share the buffer, no copy.
            _ => Some(atom.buffer().clone()),
        },
        CoerceSource::LiteralList(seq) => {
            let values = seq.to_values()?;
            buffer_from_values(&values, requested)
        }
        CoerceSource::Generic(node) => match node.literal_value()? {
            LiteralValue::List(values) => buffer_from_values(&values, requested),
            // Scalar data is not a list; nothing to wrap.
            _ => None,
        },
    }
}

/// `NumericArray[data, typespec]`: construct the head-wrapped atom.
///
/// The wrapper carries the atom's buffer as its trusted literal
/// sequence, so the primitive value survives later rewrites of the
/// wrapped form.
pub fn construct(data: &Node, spec: &Node, ctx: &mut EvalContext) -> Node {
    let Some(tag_spec) = resolve_tag(spec, ctx) else {
        return failed();
    };
    let requested = match tag_spec {
        TagSpec::Infer => None,
        TagSpec::Concrete(tag) => Some(tag),
    };
    let Some(buffer) = coerce(data, requested) else {
        ctx.message_data(data);
        return failed();
    };
    let atom = match NumericArrayAtom::new(buffer) {
        Ok(atom) => atom,
        Err(err) => {
            ctx.message_invariant(&err);
            return failed();
        }
    };
    debug!(summary = %atom.summary(), "constructed numeric array");
    let literal = atom.literal_seq();
    Node::expr_with_literal(
        Node::Symbol(sym_numeric_array()),
        vec![Node::array(atom)],
        literal,
    )
}

/// `NumericArray[data]`: the one-argument form defaults the type spec to
/// the inference marker.
pub fn construct_default(data: &Node, ctx: &mut EvalContext) -> Node {
    construct(data, &Node::Symbol(sym_automatic()), ctx)
}

/// The inner atom of a constructed array: either the bare atom or the
/// head-wrapped expression carrying one.
pub fn unwrap_atom(node: &Node) -> Option<&NumericArrayAtom> {
    match classify(node) {
        CoerceSource::Atom(atom) | CoerceSource::WrappedAtom(atom) => Some(atom),
        CoerceSource::LiteralList(_) | CoerceSource::Generic(_) => None,
    }
}

/// `Normal[...]`: the fully materialized nested list/scalar view, built
/// through the lazy materialization engine.
pub fn normal_form(node: &Node, ctx: &mut EvalContext) -> Node {
    let Some(atom) = unwrap_atom(node) else {
        // No rule applies; leave the expression as it stands.
        return node.clone();
    };
    match materialized_view(atom) {
        Ok(view) => view,
        Err(err) => {
            ctx.message_invariant(&err);
            failed()
        }
    }
}

fn materialized_view(atom: &NumericArrayAtom) -> Result<Node, NodeError> {
    let root = Node::List(Arc::new(ListNode::lazy_dense(atom.buffer().clone())?));
    deep_materialize(&root)?;
    Ok(root)
}

fn deep_materialize(node: &Node) -> Result<(), NodeError> {
    if let Node::List(list) = node {
        for child in list.elements()?.iter() {
            deep_materialize(child)?;
        }
    }
    Ok(())
}

/// The `NumericArray[<shape, type>]` summary string, from metadata only;
/// never materializes elements.
pub fn display_summary(node: &Node) -> Option<Node> {
    let atom = unwrap_atom(node)?;
    Some(Node::string(format!("NumericArray[<{}>]", atom.summary())))
}
