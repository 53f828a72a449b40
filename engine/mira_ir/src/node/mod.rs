//! A unit of the symbolic expression tree.

use std::fmt;
use std::sync::Arc;

use crate::atom::NumericArrayAtom;
use crate::list::ListNode;
use crate::literal::{LiteralSeq, LiteralValue};
use crate::symbol::{sym_false, sym_list, sym_true, Symbol};

/// A node of the symbolic tree.
///
/// Scalars are inline; composites are `Arc`-backed and immutable, so
/// cloning a node is cheap and "same instance" is pointer identity on the
/// payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Int(i64),
    Real(f64),
    Complex { re: f64, im: f64 },
    Str(Arc<str>),
    Symbol(Symbol),
    /// A generic head-wrapped expression.
    Expr(Arc<ExprNode>),
    /// A list node (eager or lazily materialized).
    List(Arc<ListNode>),
    /// A numeric-array atom.
    Array(Arc<NumericArrayAtom>),
}

/// A generic expression: head applied to ordered arguments.
///
/// An expression may carry a trusted literal sequence supplied by the
/// producer that built it (the head-wrapped `NumericArray[atom]` form
/// does this so its primitive value survives the rewrite loop). The
/// sequence is supplied at construction and never patched afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ExprNode {
    head: Node,
    args: Vec<Node>,
    literal: Option<LiteralSeq>,
}

impl ExprNode {
    pub fn head(&self) -> &Node {
        &self.head
    }

    pub fn args(&self) -> &[Node] {
        &self.args
    }

    pub fn literal_seq(&self) -> Option<&LiteralSeq> {
        self.literal.as_ref()
    }
}

impl Node {
    pub fn int(v: i64) -> Node {
        Node::Int(v)
    }

    pub fn real(v: f64) -> Node {
        Node::Real(v)
    }

    pub fn complex(re: f64, im: f64) -> Node {
        Node::Complex { re, im }
    }

    pub fn string(s: impl Into<Arc<str>>) -> Node {
        Node::Str(s.into())
    }

    pub fn symbol(name: &str) -> Node {
        Node::Symbol(Symbol::intern(name))
    }

    /// The logical constant for `v`, per the fixed table.
    pub fn bool_constant(v: bool) -> Node {
        Node::Symbol(if v { sym_true() } else { sym_false() })
    }

    /// Build a generic expression.
    pub fn expr(head: Node, args: Vec<Node>) -> Node {
        Node::Expr(Arc::new(ExprNode {
            head,
            args,
            literal: None,
        }))
    }

    /// Build a generic expression carrying a trusted literal sequence.
    pub fn expr_with_literal(head: Node, args: Vec<Node>, literal: LiteralSeq) -> Node {
        Node::Expr(Arc::new(ExprNode {
            head,
            args,
            literal: Some(literal),
        }))
    }

    /// Build an eager list node from elements (scans for literalness).
    pub fn list(elements: Vec<Node>) -> Node {
        Node::List(Arc::new(ListNode::from_elements(elements)))
    }

    pub fn array(atom: NumericArrayAtom) -> Node {
        Node::Array(Arc::new(atom))
    }

    /// Head symbol of this node, when it has one.
    pub fn head_symbol(&self) -> Option<Symbol> {
        match self {
            Node::Expr(e) => match e.head() {
                Node::Symbol(s) => Some(*s),
                _ => None,
            },
            Node::List(_) => Some(sym_list()),
            _ => None,
        }
    }

    /// True if this is `head[...]` with exactly `argc` arguments.
    pub fn has_form(&self, head: Symbol, argc: usize) -> bool {
        match self {
            Node::Expr(e) => self.head_symbol() == Some(head) && e.args().len() == argc,
            _ => false,
        }
    }

    /// True if this node's value is fully known, independent of symbol
    /// bindings. The logical constants count as literal booleans.
    pub fn is_literal(&self) -> bool {
        match self {
            Node::Int(_) | Node::Real(_) | Node::Complex { .. } | Node::Str(_) | Node::Array(_) => {
                true
            }
            Node::Symbol(s) => *s == sym_true() || *s == sym_false(),
            Node::Expr(e) => e.literal.is_some(),
            Node::List(l) => l.is_literal(),
        }
    }

    /// The primitive value of a literal node.
    pub fn literal_value(&self) -> Option<LiteralValue> {
        match self {
            Node::Int(v) => Some(LiteralValue::Int(*v)),
            Node::Real(v) => Some(LiteralValue::Real(*v)),
            Node::Complex { re, im } => Some(LiteralValue::Complex { re: *re, im: *im }),
            Node::Str(s) => Some(LiteralValue::Str(s.clone())),
            Node::Symbol(s) if *s == sym_true() => Some(LiteralValue::Bool(true)),
            Node::Symbol(s) if *s == sym_false() => Some(LiteralValue::Bool(false)),
            Node::Symbol(_) => None,
            Node::Expr(e) => {
                let values = e.literal.as_ref()?.to_values()?;
                Some(LiteralValue::List(Arc::new(values)))
            }
            Node::List(l) => {
                let values = l.literal_seq()?.to_values()?;
                Some(LiteralValue::List(Arc::new(values)))
            }
            Node::Array(a) => LiteralValue::from_buffer(a.buffer()),
        }
    }

    /// True if this node is in final (irreducible) form: no evaluation
    /// step can replace it.
    pub fn is_final(&self) -> bool {
        match self {
            Node::Int(_)
            | Node::Real(_)
            | Node::Complex { .. }
            | Node::Str(_)
            | Node::Symbol(_)
            | Node::Array(_) => true,
            Node::List(l) => l.is_fully_final(),
            // A literal-bearing expression is a finished value; anything
            // else may still match a rewrite rule.
            Node::Expr(e) => e.literal.is_some(),
        }
    }

    /// Pointer identity for composite payloads, value identity for
    /// inline scalars. This is the "changed" test of the fixed-point
    /// step: a value-equal but distinct composite counts as different.
    pub fn same_instance(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Int(a), Node::Int(b)) => a == b,
            (Node::Real(a), Node::Real(b)) => a.to_bits() == b.to_bits(),
            (Node::Complex { re: ar, im: ai }, Node::Complex { re: br, im: bi }) => {
                ar.to_bits() == br.to_bits() && ai.to_bits() == bi.to_bits()
            }
            (Node::Symbol(a), Node::Symbol(b)) => a == b,
            (Node::Str(a), Node::Str(b)) => Arc::ptr_eq(a, b),
            (Node::Expr(a), Node::Expr(b)) => Arc::ptr_eq(a, b),
            (Node::List(a), Node::List(b)) => Arc::ptr_eq(a, b),
            (Node::Array(a), Node::Array(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Rebuild a node from a primitive value (the reverse of
    /// [`Node::literal_value`]). Lists come back as eager literal lists.
    pub fn from_literal(value: &LiteralValue) -> Node {
        match value {
            LiteralValue::Int(v) => Node::Int(*v),
            LiteralValue::Real(v) => Node::Real(*v),
            LiteralValue::Complex { re, im } => Node::Complex { re: *re, im: *im },
            LiteralValue::Bool(v) => Node::bool_constant(*v),
            LiteralValue::Str(s) => Node::Str(s.clone()),
            LiteralValue::List(items) => {
                Node::list(items.iter().map(Node::from_literal).collect())
            }
        }
    }
}

/// Format a real the way the engine prints machine reals: `1.` not `1`.
fn fmt_real(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_finite() && v.fract() == 0.0 {
        write!(f, "{v:.0}.")
    } else {
        write!(f, "{v}")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Int(v) => write!(f, "{v}"),
            Node::Real(v) => fmt_real(f, *v),
            Node::Complex { re, im } => {
                fmt_real(f, *re)?;
                write!(f, " + ")?;
                fmt_real(f, *im)?;
                write!(f, "*I")
            }
            Node::Str(s) => write!(f, "\"{s}\""),
            Node::Symbol(s) => write!(f, "{s}"),
            Node::Expr(e) => {
                write!(f, "{}[", e.head())?;
                for (i, arg) in e.args().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
            Node::List(l) => write!(f, "{l}"),
            Node::Array(a) => write!(f, "{a}"),
        }
    }
}
