//! List nodes: the eager list with a derived literal cache, one
//! fixed-point evaluation step, and lazy materialization of dense
//! buffers.
//!
//! A list node's head is fixed at `List` for its whole life. Its children
//! live behind one accessor over an explicit eager/lazy store: an eager
//! node holds its children outright, a lazy node holds a dense source
//! buffer and derives children on first access, memoized thereafter.
//!
//! The literal cache is strictly derived. It is computed by the
//! construction scan (or supplied by a trusted producer, or taken
//! directly from a lazy node's source buffer) and is never patched after
//! the fact: the fixed-point step builds a brand-new node with a freshly
//! derived cache whenever anything changed.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::trace;

use mira_tensor::{AxisEntry, DenseBuffer, ElementKind, Scalar};

use crate::errors::NodeError;
use crate::eval_step::{Evaluator, Step};
use crate::literal::LiteralSeq;
use crate::node::Node;
use crate::symbol::{sym_list, sym_unevaluated, Symbol};

/// Children storage: explicit eager/lazy capability.
enum ElementStore {
    Eager(Arc<[Node]>),
    Lazy {
        source: DenseBuffer,
        cell: RwLock<MemoCell>,
    },
}

/// Memoization slot for lazily derived children.
///
/// `Busy` marks an in-flight materialization so a re-entrant access is
/// detected instead of looping.
enum MemoCell {
    Empty,
    Busy,
    Ready(Arc<[Node]>),
}

/// A list node.
pub struct ListNode {
    store: ElementStore,
    /// Derived literal cache; unset means "not yet scanned".
    literal: OnceLock<Option<LiteralSeq>>,
    /// Derived "every element is final" flag.
    finality: OnceLock<bool>,
}

impl ListNode {
    /// Build an eager list node, scanning the elements left-to-right for
    /// literalness. The scan short-circuits at the first non-literal
    /// element; on a full pass the ordered primitive values are cached.
    pub fn from_elements(elements: Vec<Node>) -> ListNode {
        let node = Self::from_elements_deferred(elements);
        let _ = node.literal.set(match &node.store {
            ElementStore::Eager(els) => scan_literal(els),
            ElementStore::Lazy { .. } => None,
        });
        node
    }

    /// Build an eager list node without scanning; the literal status is
    /// derived on first query instead.
    pub fn from_elements_deferred(elements: Vec<Node>) -> ListNode {
        ListNode {
            store: ElementStore::Eager(elements.into()),
            literal: OnceLock::new(),
            finality: OnceLock::new(),
        }
    }

    /// Build an eager list node with a literal sequence the producer
    /// already knows. The sequence is trusted verbatim and not
    /// re-verified element-by-element; only the length is checked, since
    /// a mismatch there is a certain contract breach. In debug builds a
    /// breach is fatal; otherwise the node degrades to a fresh scan.
    pub fn with_literal_values(elements: Vec<Node>, values: LiteralSeq) -> ListNode {
        if values.len() != elements.len() {
            debug_assert!(
                false,
                "literal cache length {} does not cover {} elements",
                values.len(),
                elements.len()
            );
            return Self::from_elements(elements);
        }
        let node = Self::from_elements_deferred(elements);
        let _ = node.literal.set(Some(values));
        node
    }

    /// Build a lazy list node over a dense buffer. No children are built
    /// or copied; the literal cache is the source buffer itself.
    ///
    /// Only numeric and boolean element kinds have promotion rules; any
    /// other kind fails here, at construction, not at first access.
    pub fn lazy_dense(source: DenseBuffer) -> Result<ListNode, NodeError> {
        match source.kind() {
            ElementKind::Numeric(_) | ElementKind::Bool => {}
            kind @ ElementKind::Raw => {
                return Err(NodeError::UnsupportedElementType { kind: kind.name() });
            }
        }
        let node = ListNode {
            literal: OnceLock::new(),
            finality: OnceLock::new(),
            store: ElementStore::Lazy {
                source,
                cell: RwLock::new(MemoCell::Empty),
            },
        };
        let seq = match &node.store {
            ElementStore::Lazy { source, .. } => LiteralSeq::Dense(source.clone()),
            ElementStore::Eager(_) => unreachable!("store built as lazy above"),
        };
        let _ = node.literal.set(Some(seq));
        Ok(node)
    }

    /// The head, fixed at construction.
    pub fn head(&self) -> Symbol {
        sym_list()
    }

    /// The head tag is immutable; any reassignment other than the
    /// identity is an invariant violation.
    pub fn set_head(&self, head: Symbol) -> Result<(), NodeError> {
        if head == sym_list() {
            return Ok(());
        }
        Err(NodeError::HeadReassignment {
            attempted: head.as_str().to_string(),
        })
    }

    /// Number of children. Known without materializing: a lazy node reads
    /// its source buffer's leading extent.
    pub fn len(&self) -> usize {
        match &self.store {
            ElementStore::Eager(els) => els.len(),
            ElementStore::Lazy { source, .. } => source.outer_len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The symbolic child view. For a lazy node the first call derives
    /// the children from the source buffer; later calls return the memo.
    pub fn elements(&self) -> Result<Arc<[Node]>, NodeError> {
        match &self.store {
            ElementStore::Eager(els) => Ok(els.clone()),
            ElementStore::Lazy { source, cell } => {
                {
                    let guard = cell.read();
                    match &*guard {
                        MemoCell::Ready(els) => return Ok(els.clone()),
                        MemoCell::Busy => {
                            drop(guard);
                            debug_assert!(false, "re-entrant materialization of a lazy list node");
                            return Err(NodeError::ReentrantMaterialization);
                        }
                        MemoCell::Empty => {}
                    }
                }
                {
                    let mut guard = cell.write();
                    match &*guard {
                        MemoCell::Ready(els) => return Ok(els.clone()),
                        MemoCell::Busy => {
                            drop(guard);
                            debug_assert!(false, "re-entrant materialization of a lazy list node");
                            return Err(NodeError::ReentrantMaterialization);
                        }
                        MemoCell::Empty => *guard = MemoCell::Busy,
                    }
                }
                trace!(len = source.outer_len(), "materializing dense list node");
                let built = derive_children(source);
                let mut guard = cell.write();
                match built {
                    Ok(els) => {
                        *guard = MemoCell::Ready(els.clone());
                        Ok(els)
                    }
                    Err(err) => {
                        *guard = MemoCell::Empty;
                        Err(err)
                    }
                }
            }
        }
    }

    /// The child at `index`, materializing if needed.
    pub fn child(&self, index: usize) -> Result<Option<Node>, NodeError> {
        Ok(self.elements()?.get(index).cloned())
    }

    /// True once the symbolic child view exists. Primarily a probe for
    /// testing laziness; eager nodes are born materialized.
    pub fn is_materialized(&self) -> bool {
        match &self.store {
            ElementStore::Eager(_) => true,
            ElementStore::Lazy { cell, .. } => matches!(&*cell.read(), MemoCell::Ready(_)),
        }
    }

    /// The source buffer of a lazy node.
    pub fn source_buffer(&self) -> Option<&DenseBuffer> {
        match &self.store {
            ElementStore::Eager(_) => None,
            ElementStore::Lazy { source, .. } => Some(source),
        }
    }

    /// Tri-state literal status without forcing a scan: `None` means not
    /// yet derived.
    pub fn literal_known(&self) -> Option<bool> {
        self.literal.get().map(Option::is_some)
    }

    fn literal_state(&self) -> &Option<LiteralSeq> {
        self.literal.get_or_init(|| match &self.store {
            ElementStore::Eager(els) => scan_literal(els),
            // Lazy constructors always pre-populate the cache.
            ElementStore::Lazy { source, .. } => Some(LiteralSeq::Dense(source.clone())),
        })
    }

    /// True if every element's value is fully known.
    pub fn is_literal(&self) -> bool {
        self.literal_state().is_some()
    }

    /// The ordered primitive values of a literal node.
    pub fn literal_seq(&self) -> Option<&LiteralSeq> {
        self.literal_state().as_ref()
    }

    /// True if every element is in final (irreducible) form.
    pub fn is_fully_final(&self) -> bool {
        *self.finality.get_or_init(|| {
            if self.is_literal() {
                return true;
            }
            match &self.store {
                ElementStore::Eager(els) => els.iter().all(Node::is_final),
                // Lazy children derive from numeric data; always final.
                ElementStore::Lazy { .. } => true,
            }
        })
    }

    /// Perform one fixed-point evaluation step on the elements.
    ///
    /// If every element is already final this returns `Step::Unchanged`
    /// and the caller keeps the same instance. Otherwise every element
    /// not held inside `Unevaluated[...]` is evaluated once; a change is
    /// decided by instance identity, not value equality. Any change
    /// produces a brand-new node with a freshly derived literal cache.
    pub fn eval_elements_once(
        &self,
        evaluator: &mut dyn Evaluator,
    ) -> Result<Step, NodeError> {
        if self.is_fully_final() {
            return Ok(Step::Unchanged);
        }
        let elements = self.elements()?;
        let mut updated: Vec<Node> = elements.to_vec();
        let mut changed = false;
        for (index, element) in elements.iter().enumerate() {
            if element.has_form(sym_unevaluated(), 1) {
                continue;
            }
            if let Some(new) = evaluator.eval_once(element) {
                if !element.same_instance(&new) {
                    changed = true;
                    updated[index] = new;
                }
            }
        }
        if changed {
            trace!(len = updated.len(), "list node rebuilt after element step");
            Ok(Step::Changed(Node::List(Arc::new(ListNode::from_elements(
                updated,
            )))))
        } else {
            Ok(Step::Unchanged)
        }
    }
}

/// Left-to-right literal scan, short-circuiting at the first non-literal
/// element.
fn scan_literal(elements: &[Node]) -> Option<LiteralSeq> {
    let mut values = Vec::with_capacity(elements.len());
    for element in elements {
        values.push(element.literal_value()?);
    }
    Some(LiteralSeq::from_values(values))
}

/// Derive the symbolic children of a dense buffer: sub-buffers wrap
/// recursively as lazy list nodes, scalars become leaves by element
/// category.
fn derive_children(source: &DenseBuffer) -> Result<Arc<[Node]>, NodeError> {
    let mut children = Vec::with_capacity(source.outer_len());
    for entry in source.axis_iter() {
        children.push(match entry {
            AxisEntry::Sub(sub) => Node::List(Arc::new(ListNode::lazy_dense(sub)?)),
            AxisEntry::Scalar(scalar) => scalar_leaf(scalar)?,
        });
    }
    Ok(children.into())
}

/// Leaf node for one buffer scalar, by element category.
fn scalar_leaf(scalar: Scalar) -> Result<Node, NodeError> {
    Ok(match scalar {
        Scalar::Int(v) => Node::Int(v),
        Scalar::UInt(v) => match i64::try_from(v) {
            Ok(v) => Node::Int(v),
            Err(_) => Node::Real(v as f64),
        },
        Scalar::Real(v) => Node::Real(v),
        Scalar::Complex { re, im } => Node::Complex { re, im },
        // Fixed promotion table for logical data.
        Scalar::Bool(v) => Node::bool_constant(v),
        // Unreachable after the construction-time kind check.
        Scalar::Raw(_) => {
            return Err(NodeError::UnsupportedElementType {
                kind: ElementKind::Raw.name(),
            })
        }
    })
}

/// Structural equality over children; literal nodes compare their
/// primitive sequences so two dense-backed nodes never materialize just
/// to compare.
impl PartialEq for ListNode {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if let (Some(a), Some(b)) = (self.literal_seq(), other.literal_seq()) {
            return a == b;
        }
        match (self.elements(), other.elements()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Elided representation; never materializes.
impl fmt::Debug for ListNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.store {
            ElementStore::Eager(_) => "eager",
            ElementStore::Lazy { .. } if self.is_materialized() => "lazy, materialized",
            ElementStore::Lazy { .. } => "lazy, unmaterialized",
        };
        write!(f, "<ListNode: {} elements, {state}>", self.len())
    }
}

/// `{e1,e2,...}` form; materializes a lazy node's children.
impl fmt::Display for ListNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(elements) = self.elements() else {
            return f.write_str("{<materializing>}");
        };
        f.write_str("{")?;
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests;
