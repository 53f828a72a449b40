//! The single-step driver over the symbolic tree.
//!
//! The general multi-pass evaluation machinery (rule dispatch, pattern
//! matching, attribute handling) lives outside this layer; the
//! interpreter here drives exactly the protocol list nodes need — one
//! fixed-point step — and dispatches the `NumericArray`, `Normal`, and
//! `ToString` heads to the bridge.

use tracing::trace;

use mira_ir::{sym_normal, sym_numeric_array, sym_to_string, Evaluator, Node, Step, Symbol};

use crate::context::EvalContext;
use crate::numeric_array;

/// Iteration cap for the bounded fixed-point loop in [`Interpreter::evaluate`].
const REWRITE_LIMIT: usize = 256;

/// The evaluator driver.
#[derive(Debug, Default)]
pub struct Interpreter {
    ctx: EvalContext,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EvalContext {
        &mut self.ctx
    }

    /// Perform one fixed-point step on `node`.
    ///
    /// `Step::Unchanged` means the caller keeps the same instance.
    pub fn step(&mut self, node: &Node) -> Step {
        if node.is_final() {
            return Step::Unchanged;
        }
        match node {
            Node::List(list) => match list.eval_elements_once(self) {
                Ok(step) => step,
                Err(err) => {
                    // Degrade: report and keep the node as it stands.
                    self.ctx.message_invariant(&err);
                    Step::Unchanged
                }
            },
            Node::Expr(expr) => {
                // Arguments step before the head dispatches, so nested
                // constructions reach the builtin already evaluated.
                if let Some(rebuilt) = self.step_args(expr.head(), expr.args()) {
                    return Step::Changed(rebuilt);
                }
                let Some(head) = node.head_symbol() else {
                    return Step::Unchanged;
                };
                self.step_builtin(head, expr.args())
            }
            _ => Step::Unchanged,
        }
    }

    /// Evaluate each argument once; a changed argument rebuilds the
    /// expression (change decided by instance identity).
    fn step_args(&mut self, head: &Node, args: &[Node]) -> Option<Node> {
        let mut updated: Vec<Node> = args.to_vec();
        let mut changed = false;
        for (index, arg) in args.iter().enumerate() {
            if let Some(new) = self.eval_once(arg) {
                if !arg.same_instance(&new) {
                    changed = true;
                    updated[index] = new;
                }
            }
        }
        changed.then(|| Node::expr(head.clone(), updated))
    }

    fn step_builtin(&mut self, head: Symbol, args: &[Node]) -> Step {
        if head == sym_numeric_array() {
            // The construction rules accept any data node: lists, bare
            // atoms, and already-wrapped array expressions all route
            // through the coercion union. The constructed form cannot
            // re-enter here — `construct` emits it with a trusted literal
            // sequence, so it is final before dispatch is reached.
            return match args {
                [data] => {
                    trace!("dispatch NumericArray[data]");
                    Step::Changed(numeric_array::construct_default(data, &mut self.ctx))
                }
                [data, spec] => {
                    trace!("dispatch NumericArray[data, typespec]");
                    Step::Changed(numeric_array::construct(data, spec, &mut self.ctx))
                }
                _ => Step::Unchanged,
            };
        }
        if head == sym_normal() {
            if let [arg] = args {
                if numeric_array::unwrap_atom(arg).is_some() {
                    trace!("dispatch Normal[NumericArray[...]]");
                    return Step::Changed(numeric_array::normal_form(arg, &mut self.ctx));
                }
            }
            return Step::Unchanged;
        }
        if head == sym_to_string() {
            if let [arg] = args {
                if let Some(summary) = numeric_array::display_summary(arg) {
                    return Step::Changed(summary);
                }
            }
        }
        Step::Unchanged
    }

    /// Iterate [`Interpreter::step`] to a fixed point, bounded by
    /// `REWRITE_LIMIT`.
    pub fn evaluate(&mut self, node: &Node) -> Node {
        let mut current = node.clone();
        for _ in 0..REWRITE_LIMIT {
            match self.step(&current) {
                Step::Changed(next) => current = next,
                Step::Unchanged => break,
            }
        }
        current
    }
}

impl Evaluator for Interpreter {
    fn eval_once(&mut self, node: &Node) -> Option<Node> {
        match self.step(node) {
            Step::Changed(next) => Some(next),
            Step::Unchanged => None,
        }
    }
}
