//! The single fixed-point evaluation step protocol.
//!
//! The general multi-pass evaluation loop lives in the host evaluator;
//! this crate only needs the one-step contract it drives list nodes with.

use crate::node::Node;

/// Outcome of one fixed-point step.
///
/// `Unchanged` means the caller's node is already at a fixed point and
/// the *same instance* should be kept. `Changed` carries a brand-new node
/// whose literal cache has been freshly derived.
#[derive(Clone, Debug)]
pub enum Step {
    Unchanged,
    Changed(Node),
}

impl Step {
    pub fn is_changed(&self) -> bool {
        matches!(self, Step::Changed(_))
    }
}

/// The host evaluator, as seen by a list node evaluating its elements.
///
/// `eval_once` performs one evaluation step on a child node, returning
/// `None` when the child is already at a fixed point. A returned node
/// that is the same instance as the input also counts as unchanged.
pub trait Evaluator {
    fn eval_once(&mut self, node: &Node) -> Option<Node>;
}
