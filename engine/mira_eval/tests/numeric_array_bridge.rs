//! End-to-end runs of the `NumericArray` bridge through the interpreter's
//! fixed-point loop.

use mira_diagnostic::ErrorCode;
use mira_eval::numeric_array::unwrap_atom;
use mira_eval::Interpreter;
use mira_ir::{sym_numeric_array, ListNode, Node};
use mira_tensor::TypeTag;
use pretty_assertions::assert_eq;

fn int_list(values: &[i64]) -> Node {
    Node::list(values.iter().map(|&v| Node::int(v)).collect())
}

fn numeric_array(args: Vec<Node>) -> Node {
    Node::expr(Node::Symbol(sym_numeric_array()), args)
}

#[test]
fn construction_reaches_a_fixed_point() {
    let mut interp = Interpreter::new();
    let input = numeric_array(vec![int_list(&[1, 2, 3])]);
    let result = interp.evaluate(&input);

    assert!(result.is_final());
    assert_eq!(result.head_symbol(), Some(sym_numeric_array()));
    assert_eq!(unwrap_atom(&result).expect("atom").tag(), TypeTag::Int64);

    // Re-evaluating a finished value returns the same instance.
    let again = interp.evaluate(&result);
    assert!(result.same_instance(&again));
    assert!(interp.context().diagnostics().is_empty());
}

#[test]
fn normal_recovers_the_nested_list() {
    let mut interp = Interpreter::new();
    let data = Node::list(vec![int_list(&[1, 2]), int_list(&[3, 4])]);
    let input = Node::expr(
        Node::symbol("Normal"),
        vec![numeric_array(vec![data.clone(), Node::symbol("Automatic")])],
    );
    assert_eq!(interp.evaluate(&input), data);
}

#[test]
fn typed_construction_casts_and_round_trips() {
    let mut interp = Interpreter::new();
    let input = numeric_array(vec![int_list(&[1, 2, 3]), Node::string("UnsignedInteger8")]);
    let result = interp.evaluate(&input);
    assert_eq!(unwrap_atom(&result).expect("atom").tag(), TypeTag::UInt8);

    let back = interp.evaluate(&Node::expr(Node::symbol("Normal"), vec![result]));
    assert_eq!(back, int_list(&[1, 2, 3]));
}

#[test]
fn nested_construction_evaluates_arguments_first() {
    let mut interp = Interpreter::new();
    let inner = numeric_array(vec![int_list(&[1, 2])]);
    let input = numeric_array(vec![inner, Node::string("Real64")]);
    let result = interp.evaluate(&input);
    assert_eq!(unwrap_atom(&result).expect("atom").tag(), TypeTag::Real64);
    assert!(interp.context().diagnostics().is_empty());
}

#[test]
fn bare_atom_data_is_rewrapped_and_cast() {
    let mut interp = Interpreter::new();
    let wrapped = interp.evaluate(&numeric_array(vec![int_list(&[1, 2])]));
    let atom = unwrap_atom(&wrapped).expect("atom").clone();

    let input = numeric_array(vec![Node::array(atom), Node::string("Real32")]);
    let result = interp.evaluate(&input);
    assert_eq!(unwrap_atom(&result).expect("atom").tag(), TypeTag::Real32);
    assert!(result.is_final());
    assert!(interp.context().diagnostics().is_empty());
}

#[test]
fn symbolic_data_fails_instead_of_sitting_unevaluated() {
    let mut interp = Interpreter::new();
    let result = interp.evaluate(&numeric_array(vec![Node::symbol("x")]));
    assert_eq!(result, Node::symbol("$Failed"));
    assert_eq!(
        interp.context_mut().flush_diagnostics()[0].code,
        ErrorCode::E6002
    );
}

#[test]
fn bad_type_spec_fails_with_a_type_report() {
    let mut interp = Interpreter::new();
    let input = numeric_array(vec![int_list(&[1]), Node::string("Octonion")]);
    let result = interp.evaluate(&input);
    assert_eq!(result, Node::symbol("$Failed"));
    let reports = interp.context_mut().flush_diagnostics();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].code, ErrorCode::E6001);
}

#[test]
fn non_numeric_data_fails_with_a_data_report() {
    let mut interp = Interpreter::new();
    let data = Node::list(vec![Node::symbol("x"), Node::int(1)]);
    let result = interp.evaluate(&numeric_array(vec![data]));
    assert_eq!(result, Node::symbol("$Failed"));
    assert_eq!(
        interp.context_mut().flush_diagnostics()[0].code,
        ErrorCode::E6002
    );
}

#[test]
fn list_elements_step_inside_the_loop() {
    let mut interp = Interpreter::new();
    let input = Node::list(vec![numeric_array(vec![int_list(&[1, 2])]), Node::int(9)]);
    let result = interp.evaluate(&input);

    let Node::List(list) = &result else {
        panic!("expected a list, got {result}");
    };
    let elements = list.elements().expect("eager list");
    assert!(unwrap_atom(&elements[0]).is_some());
    assert_eq!(elements[1], Node::int(9));
    assert!(result.is_final());
}

#[test]
fn to_string_renders_the_summary_without_materializing() {
    let mut interp = Interpreter::new();
    let data = Node::list(vec![int_list(&[1, 2, 3]), int_list(&[4, 5, 6])]);
    let constructed = interp.evaluate(&numeric_array(vec![data, Node::string("Integer32")]));

    // A lazy view over the same storage: rendering the summary must not
    // derive any symbolic children.
    let buffer = unwrap_atom(&constructed).expect("atom").buffer().clone();
    let probe = ListNode::lazy_dense(buffer).expect("numeric");

    let rendered = interp.evaluate(&Node::expr(Node::symbol("ToString"), vec![constructed]));
    assert_eq!(rendered, Node::string("NumericArray[<2x3, Integer32>]"));
    assert!(!probe.is_materialized());
}

#[test]
fn unknown_heads_are_left_alone() {
    let mut interp = Interpreter::new();
    let input = Node::expr(Node::symbol("f"), vec![Node::int(1)]);
    let result = interp.evaluate(&input);
    assert!(input.same_instance(&result));
}
