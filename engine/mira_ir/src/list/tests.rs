use std::sync::Arc;

use super::ListNode;
use crate::errors::NodeError;
use crate::eval_step::{Evaluator, Step};
use crate::literal::{LiteralSeq, LiteralValue};
use crate::node::Node;
use crate::symbol::{sym_list, Symbol};
use mira_tensor::{DenseBuffer, ElementKind, Scalar, TypeTag};
use pretty_assertions::assert_eq;

fn int_buffer(shape: &[usize], values: &[i64]) -> DenseBuffer {
    let scalars: Vec<Scalar> = values.iter().map(|&v| Scalar::Int(v)).collect();
    DenseBuffer::from_scalars(ElementKind::Numeric(TypeTag::Int64), shape, &scalars)
        .expect("valid buffer")
}

/// Evaluator stub: rewrites the symbol `x` to `9`, counts every call.
struct RewriteX {
    calls: usize,
}

impl RewriteX {
    fn new() -> Self {
        RewriteX { calls: 0 }
    }
}

impl Evaluator for RewriteX {
    fn eval_once(&mut self, node: &Node) -> Option<Node> {
        self.calls += 1;
        match node {
            Node::Symbol(s) if s.as_str() == "x" => Some(Node::int(9)),
            _ => None,
        }
    }
}

/// Evaluator stub: replaces every list child with a value-equal but
/// freshly allocated copy.
struct Reallocate;

impl Evaluator for Reallocate {
    fn eval_once(&mut self, node: &Node) -> Option<Node> {
        match node {
            Node::List(l) => {
                let elements = l.elements().ok()?;
                Some(Node::list(elements.to_vec()))
            }
            _ => None,
        }
    }
}

#[test]
fn construction_scan_caches_ordered_values() {
    let list = ListNode::from_elements(vec![Node::int(1), Node::real(2.5)]);
    assert_eq!(list.literal_known(), Some(true));
    assert_eq!(
        list.literal_seq(),
        Some(&LiteralSeq::from_values(vec![
            LiteralValue::Int(1),
            LiteralValue::Real(2.5),
        ]))
    );
}

#[test]
fn scan_short_circuits_on_non_literal() {
    let list = ListNode::from_elements(vec![Node::int(1), Node::symbol("x"), Node::int(2)]);
    assert_eq!(list.literal_known(), Some(false));
    assert!(!list.is_literal());
    assert_eq!(list.literal_seq(), None);
}

#[test]
fn deferred_scan_resolves_on_first_query() {
    let list = ListNode::from_elements_deferred(vec![Node::int(1), Node::int(2)]);
    assert_eq!(list.literal_known(), None);
    assert!(list.is_literal());
    assert_eq!(list.literal_known(), Some(true));
}

#[test]
fn trusted_literal_values_skip_the_scan() {
    // A producer that already knows the values supplies them verbatim;
    // the elements are deliberately not scanned.
    let list = ListNode::with_literal_values(
        vec![Node::int(1), Node::int(2)],
        LiteralSeq::from_values(vec![LiteralValue::Int(1), LiteralValue::Int(2)]),
    );
    assert_eq!(list.literal_known(), Some(true));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "literal cache length")]
fn trusted_literal_length_mismatch_is_fatal_in_debug() {
    let _ = ListNode::with_literal_values(
        vec![Node::int(1), Node::int(2)],
        LiteralSeq::from_values(vec![LiteralValue::Int(1)]),
    );
}

#[test]
fn head_is_fixed() {
    let list = ListNode::from_elements(vec![Node::int(1)]);
    assert_eq!(list.head(), sym_list());
    assert_eq!(list.set_head(sym_list()), Ok(()));
    assert_eq!(
        list.set_head(Symbol::intern("Plus")),
        Err(NodeError::HeadReassignment {
            attempted: "Plus".to_string()
        })
    );
}

#[test]
fn step_on_final_elements_is_unchanged_without_eval() {
    let list = ListNode::from_elements(vec![Node::int(1), Node::symbol("y")]);
    let mut eval = RewriteX::new();
    let step = list.eval_elements_once(&mut eval).expect("step");
    assert!(!step.is_changed());
    // All elements were already final, so nothing was evaluated.
    assert_eq!(eval.calls, 0);
}

#[test]
fn step_rebuilds_with_fresh_literal_cache() {
    // f[x] keeps the list non-final so the step walks the elements.
    let pending = Node::expr(Node::symbol("f"), vec![]);
    let list = ListNode::from_elements(vec![Node::symbol("x"), Node::int(1), pending]);
    assert!(!list.is_literal());

    struct RewriteBoth;
    impl Evaluator for RewriteBoth {
        fn eval_once(&mut self, node: &Node) -> Option<Node> {
            match node {
                Node::Symbol(s) if s.as_str() == "x" => Some(Node::int(9)),
                Node::Expr(_) => Some(Node::int(7)),
                _ => None,
            }
        }
    }

    let step = list.eval_elements_once(&mut RewriteBoth).expect("step");
    let Step::Changed(Node::List(new_list)) = step else {
        panic!("expected a changed list");
    };
    // The new node derived its own cache; the old node is untouched.
    assert_eq!(
        new_list.literal_seq(),
        Some(&LiteralSeq::from_values(vec![
            LiteralValue::Int(9),
            LiteralValue::Int(1),
            LiteralValue::Int(7),
        ]))
    );
    assert!(!list.is_literal());
}

#[test]
fn value_equal_replacement_still_counts_as_changed() {
    let inner = Node::list(vec![Node::symbol("z")]);
    // The pending expression keeps the list non-final so the step walks
    // the elements at all.
    let pending = Node::expr(Node::symbol("g"), vec![]);
    let list = ListNode::from_elements(vec![inner, pending]);
    let step = list.eval_elements_once(&mut Reallocate).expect("step");
    assert!(step.is_changed());
}

#[test]
fn unevaluated_elements_are_skipped() {
    let held = Node::expr(
        Node::symbol("Unevaluated"),
        vec![Node::symbol("x")],
    );
    let list = ListNode::from_elements(vec![held]);
    let mut eval = RewriteX::new();
    let step = list.eval_elements_once(&mut eval).expect("step");
    assert!(!step.is_changed());
    assert_eq!(eval.calls, 0);
}

#[test]
fn lazy_node_knows_length_and_values_without_materializing() {
    let list = ListNode::lazy_dense(int_buffer(&[2, 2], &[1, 2, 3, 4])).expect("numeric");
    assert!(!list.is_materialized());
    assert_eq!(list.len(), 2);
    assert!(list.is_literal());
    assert_eq!(
        list.literal_seq().and_then(LiteralSeq::to_values),
        Some(vec![
            LiteralValue::List(Arc::new(vec![LiteralValue::Int(1), LiteralValue::Int(2)])),
            LiteralValue::List(Arc::new(vec![LiteralValue::Int(3), LiteralValue::Int(4)])),
        ])
    );
    assert!(!list.is_materialized());
}

#[test]
fn first_child_access_materializes_exactly_once() {
    let list = ListNode::lazy_dense(int_buffer(&[2, 2], &[1, 2, 3, 4])).expect("numeric");
    let first = list.elements().expect("materialize");
    assert!(list.is_materialized());
    let second = list.elements().expect("memoized");
    assert!(Arc::ptr_eq(&first, &second));

    // Children of a rank-2 buffer are lazy nodes over the rows.
    let Node::List(row) = &first[1] else {
        panic!("expected a nested list node");
    };
    assert!(!row.is_materialized());
    assert_eq!(row.child(0).expect("row"), Some(Node::Int(3)));
}

#[test]
fn boolean_buffers_promote_to_logical_constants() {
    let bools = DenseBuffer::from_bools(&[2], &[true, false]).expect("valid buffer");
    let list = ListNode::lazy_dense(bools).expect("promotable");
    let elements = list.elements().expect("materialize");
    assert_eq!(elements[0], Node::bool_constant(true));
    assert_eq!(elements[1], Node::bool_constant(false));
}

#[test]
fn raw_buffers_fail_at_construction() {
    let raw = DenseBuffer::from_raw_bytes(&[2], &[1, 2]).expect("valid buffer");
    assert!(matches!(
        ListNode::lazy_dense(raw),
        Err(NodeError::UnsupportedElementType { kind: "Raw" })
    ));
}

#[test]
fn step_on_lazy_literal_node_stays_unmaterialized() {
    let list = ListNode::lazy_dense(int_buffer(&[3], &[1, 2, 3])).expect("numeric");
    let mut eval = RewriteX::new();
    let step = list.eval_elements_once(&mut eval).expect("step");
    assert!(!step.is_changed());
    assert_eq!(eval.calls, 0);
    assert!(!list.is_materialized());
}

#[test]
fn dense_nodes_compare_by_values_without_materializing() {
    let a = ListNode::lazy_dense(int_buffer(&[2], &[1, 2])).expect("numeric");
    let b = ListNode::from_elements(vec![Node::int(1), Node::int(2)]);
    assert_eq!(a, b);
    assert!(!a.is_materialized());
}

#[test]
fn display_materializes_and_renders_braces() {
    let list = ListNode::lazy_dense(int_buffer(&[2, 2], &[1, 2, 3, 4])).expect("numeric");
    assert_eq!(list.to_string(), "{{1,2},{3,4}}");
    assert!(list.is_materialized());
}

#[test]
fn debug_never_materializes() {
    let list = ListNode::lazy_dense(int_buffer(&[2, 2], &[1, 2, 3, 4])).expect("numeric");
    let repr = format!("{list:?}");
    assert_eq!(repr, "<ListNode: 2 elements, lazy, unmaterialized>");
    assert!(!list.is_materialized());
}
