use std::fmt;

use crate::{
    ast::{Attribute, NodeId, NodeKind, Tree},
    error::RuntimeError,
    interpreter::evaluator::core::{EvalResult, evaluate, node_at, require},
};

/// An observable side effect of running a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A variable declaration was executed.
    Declared {
        /// The declared name.
        name:      String,
        /// The declared type keyword.
        type_name: String,
    },
    /// An assignment was evaluated.
    Assigned {
        /// The assigned name.
        target: String,
        /// The computed value.
        value:  i64,
    },
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared { name, type_name } => {
                write!(f, "Creating variable named {name} of type: {type_name}")
            },
            Self::Assigned { target, value } => write!(f, "Assigned value of {value} to {target}"),
        }
    }
}

/// Executes the statements of a finished tree.
///
/// The walk is iterative. Only the root descends, so it visits the root, every
/// statement once and the root again. Each node fires at most once per run;
/// the fired flags live in the run, never in the tree, so running the same
/// tree twice produces the same effects.
///
/// # Example
/// ```
/// use arbor::interpreter::{
///     lexer::tokenize,
///     parser::core::build_tree,
///     runtime::{Effect, Interpreter},
/// };
///
/// let tree = build_tree(&tokenize("number a = 1+2*3;").unwrap()).unwrap();
/// let mut effects = Vec::new();
/// Interpreter::new(&tree).run(|effect| effects.push(effect)).unwrap();
///
/// assert_eq!(effects[1], Effect::Assigned { target: "a".to_string(), value: 7 });
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Interpreter<'t> {
    tree: &'t Tree,
}

impl<'t> Interpreter<'t> {
    /// Creates an interpreter over `tree`.
    #[must_use]
    pub const fn new(tree: &'t Tree) -> Self {
        Self { tree }
    }

    /// Runs every statement in source order, handing effects to `sink` as
    /// they happen.
    ///
    /// # Errors
    /// Stops at the first statement whose expression fails to evaluate.
    /// Effects of earlier statements have already been delivered.
    pub fn run(&self, mut sink: impl FnMut(Effect)) -> EvalResult<()> {
        let tree = self.tree;
        let mut fired = vec![false; tree.id_bound()];
        let mut current = Some(tree.root());

        while let Some(id) = current {
            let mut descend = None;
            if !fired[id.index()] {
                fired[id.index()] = true;
                descend = self.fire(id, &mut sink)?;
            }

            current = descend.or_else(|| {
                                 tree.parent(id).map(|parent| {
                                                    tree.next_sibling(parent, id).unwrap_or(parent)
                                                })
                             });
        }
        Ok(())
    }

    /// Executes one node's effect and returns the node to descend into.
    fn fire(&self, id: NodeId, sink: &mut impl FnMut(Effect)) -> EvalResult<Option<NodeId>> {
        let node = node_at(self.tree, id)?;
        tracing::trace!(node = %id, kind = %node.kind(), "visiting");

        match node.kind() {
            NodeKind::Root => {
                tracing::debug!(statements = node.children().len(), "entered root");
                return Ok(self.tree.child(id, 0));
            },
            NodeKind::VariableDeclaration => {
                let name = require(node, Attribute::Name)?.to_string();
                let type_name = require(node, Attribute::Type)?.to_string();
                let effect = Effect::Declared { name, type_name };
                tracing::debug!(%effect, line = node.line());
                sink(effect);
            },
            NodeKind::VariableAssignment => {
                let target = require(node, Attribute::Target)?.to_string();
                let missing = RuntimeError::MalformedExpression { children: 0,
                                                                  line:     node.line(), };
                let expr = self.tree.child(id, 0).ok_or(missing)?;
                let value = evaluate(self.tree, expr)?;
                let effect = Effect::Assigned { target, value };
                tracing::debug!(%effect, line = node.line());
                sink(effect);
            },
            _ => {},
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::build_tree};

    fn run(source: &str) -> (Vec<Effect>, EvalResult<()>) {
        let tree = build_tree(&tokenize(source).unwrap()).unwrap();
        let mut effects = Vec::new();
        let result = Interpreter::new(&tree).run(|effect| effects.push(effect));
        (effects, result)
    }

    fn declared(name: &str) -> Effect {
        Effect::Declared { name:      name.to_string(),
                           type_name: "number".to_string(), }
    }

    fn assigned(target: &str, value: i64) -> Effect {
        Effect::Assigned { target: target.to_string(),
                           value }
    }

    #[test]
    fn effects_follow_source_order() {
        let (effects, result) = run("number a = 1+2*3; number b; b = (1+2)*3;");
        assert_eq!(result, Ok(()));
        assert_eq!(effects,
                   [declared("a"), assigned("a", 7), declared("b"), assigned("b", 9)]);
    }

    #[test]
    fn empty_program_has_no_effects() {
        let (effects, result) = run("");
        assert_eq!(result, Ok(()));
        assert!(effects.is_empty());
    }

    #[test]
    fn function_calls_have_no_effect() {
        let (effects, result) = run("print(1); number x;");
        assert_eq!(result, Ok(()));
        assert_eq!(effects, [declared("x")]);
    }

    #[test]
    fn division_by_zero_stops_before_the_assignment() {
        let (effects, result) = run("number z = 1; number a = 5/0; number b = 2;");
        assert_eq!(result, Err(RuntimeError::DivisionByZero { line: 1 }));
        assert_eq!(effects, [declared("z"), assigned("z", 1), declared("a")]);
    }

    #[test]
    fn running_twice_is_idempotent() {
        let tree = build_tree(&tokenize("number a = 3*(2+10)*5/1+1; a = a + 1;").unwrap()).unwrap();
        let interpreter = Interpreter::new(&tree);

        let mut first = Vec::new();
        interpreter.run(|effect| first.push(effect)).unwrap();
        let mut second = Vec::new();
        interpreter.run(|effect| second.push(effect)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, [declared("a"), assigned("a", 181), assigned("a", 1)]);
    }

    #[test]
    fn effect_messages() {
        assert_eq!(declared("x").to_string(), "Creating variable named x of type: number");
        assert_eq!(assigned("x", -4).to_string(), "Assigned value of -4 to x");
    }

    #[test]
    fn assignment_without_expression_is_malformed() {
        let mut tree = Tree::new();
        let assignment = tree.create(NodeKind::VariableAssignment, 3);
        tree.set_attribute(assignment, Attribute::Target, "x").unwrap();
        tree.add_child(tree.root(), assignment).unwrap();

        let result = Interpreter::new(&tree).run(|_| {});
        assert_eq!(result,
                   Err(RuntimeError::MalformedExpression { children: 0,
                                                           line:     3, }));
    }
}
