use crate::{
    ast::{Attribute, BinaryOperator, Node, NodeId, NodeKind, Tree},
    error::RuntimeError,
    interpreter::evaluator::binary::scalar::eval_scalar_op,
    util::num::parse_integer_literal,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Evaluates an expression node to an integer.
///
/// An expression with a single child passes that child's value through; this
/// covers parenthesized terms and expressions that never received an
/// operator. An expression with three children is `left op right`, evaluated
/// left operand first. Any other shape is malformed.
///
/// Variable references evaluate to `0`: declarations are not connected to a
/// symbol table.
///
/// # Errors
/// Returns a `RuntimeError` for malformed expressions, unknown operators,
/// invalid literals, division by zero and overflow.
///
/// # Example
/// ```
/// use arbor::interpreter::{
///     evaluator::core::evaluate, lexer::tokenize, parser::core::build_tree,
/// };
///
/// let tree = build_tree(&tokenize("number a = 3*(2+10)*5/1+1;").unwrap()).unwrap();
/// let assignment = tree.child(tree.root(), 1).unwrap();
/// let expr = tree.child(assignment, 0).unwrap();
/// assert_eq!(evaluate(&tree, expr), Ok(181));
/// ```
pub fn evaluate(tree: &Tree, expr: NodeId) -> EvalResult<i64> {
    let node = node_at(tree, expr)?;
    if node.kind() != NodeKind::Expression {
        return Err(RuntimeError::UnexpectedNode { kind: node.kind(),
                                                  line: node.line(), });
    }

    match *node.children() {
        [single] => eval_operand(tree, single),
        [left, op, right] => {
            let op_node = node_at(tree, op)?;
            let op = operator_of(op_node)?;
            let left = eval_operand(tree, left)?;
            let right = eval_operand(tree, right)?;
            eval_scalar_op(op, left, right, op_node.line())
        },
        ref children => Err(RuntimeError::MalformedExpression { children: children.len(),
                                                                line:     node.line(), }),
    }
}

fn eval_operand(tree: &Tree, id: NodeId) -> EvalResult<i64> {
    let node = node_at(tree, id)?;
    match node.kind() {
        NodeKind::Expression => evaluate(tree, id),
        NodeKind::Literal => {
            let text = require(node, Attribute::Value)?;
            parse_integer_literal(text,
                                  RuntimeError::InvalidLiteral { value: text.to_string(),
                                                                 line:  node.line(), })
        },
        NodeKind::VariableReference => {
            tracing::debug!(name = ?node.attribute(Attribute::Target),
                            line = node.line(),
                            "variable reference evaluates to 0");
            Ok(0)
        },
        kind => Err(RuntimeError::UnexpectedNode { kind,
                                                   line: node.line() }),
    }
}

fn operator_of(node: &Node) -> EvalResult<BinaryOperator> {
    if node.kind() != NodeKind::Operation {
        return Err(RuntimeError::UnexpectedNode { kind: node.kind(),
                                                  line: node.line(), });
    }
    let symbol = require(node, Attribute::Type)?;
    BinaryOperator::from_symbol(symbol).ok_or_else(|| {
                                           RuntimeError::InvalidOperator { op:   symbol.to_string(),
                                                                           line: node.line(), }
                                       })
}

/// Looks up a node that the tree structure refers to.
pub(crate) fn node_at(tree: &Tree, id: NodeId) -> EvalResult<&Node> {
    tree.get(id).ok_or(RuntimeError::MissingNode { node: id })
}

/// Looks up an attribute the node's role requires.
pub(crate) fn require(node: &Node, attribute: Attribute) -> EvalResult<&str> {
    node.attribute(attribute)
        .ok_or(RuntimeError::MissingAttribute { kind: node.kind(),
                                                attribute,
                                                line: node.line() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::build_tree};

    fn value_of(source: &str) -> EvalResult<i64> {
        let tree = build_tree(&tokenize(source).unwrap()).unwrap();
        let assignment = tree.child(tree.root(), 1).unwrap();
        let expr = tree.child(assignment, 0).unwrap();
        evaluate(&tree, expr)
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(value_of("number a = 1+2*3;"), Ok(7));
        assert_eq!(value_of("number a = (1+2)*3;"), Ok(9));
        assert_eq!(value_of("number a = 3*(2+10)*5/1+1;"), Ok(181));
        assert_eq!(value_of("number a = 10 - 4 - 3;"), Ok(3));
        assert_eq!(value_of("number a = 100 / 10 / 5;"), Ok(2));
        assert_eq!(value_of("number a = 2 + 3 * 4 - 6 / 2;"), Ok(11));
    }

    #[test]
    fn single_operand_passes_through() {
        assert_eq!(value_of("number a = 42;"), Ok(42));
        assert_eq!(value_of("number a = ((42));"), Ok(42));
    }

    #[test]
    fn references_evaluate_to_zero() {
        assert_eq!(value_of("number a = b + 2;"), Ok(2));
        assert_eq!(value_of("number a = 5 * b;"), Ok(0));
    }

    #[test]
    fn long_mixed_chains() {
        assert_eq!(value_of("number t = 5 * 2 - 1 + 7 / 5 * 1 + 10 / ( 3 + 1 ) / 1;"),
                   Ok(12));
        let nested = "number t = 3*(2+10)*5/1+1+2+(3+(4+(5)))+6*(7+8+(9+10+11+12+(13*14)));";
        assert_eq!(value_of(nested), Ok(1629));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(value_of("number a = 5/0;"), Err(RuntimeError::DivisionByZero { line: 1 }));
        assert_eq!(value_of("number a = 5/(2-2);"),
                   Err(RuntimeError::DivisionByZero { line: 1 }));
    }

    #[test]
    fn incomplete_expressions_are_malformed() {
        assert_eq!(value_of("number a = ;"),
                   Err(RuntimeError::MalformedExpression { children: 0,
                                                           line:     1, }));
        assert_eq!(value_of("number a = 1 +;"),
                   Err(RuntimeError::MalformedExpression { children: 2,
                                                           line:     1, }));
    }

    #[test]
    fn hand_built_trees_are_validated() {
        let mut tree = Tree::new();
        let expr = tree.create(NodeKind::Expression, 7);
        let left = tree.create(NodeKind::Literal, 7);
        tree.set_attribute(left, Attribute::Value, "x1").unwrap();
        tree.add_child(expr, left).unwrap();
        assert_eq!(evaluate(&tree, expr),
                   Err(RuntimeError::InvalidLiteral { value: "x1".to_string(),
                                                      line:  7, }));

        let mut tree = Tree::new();
        let expr = tree.create(NodeKind::Expression, 2);
        for kind in [NodeKind::Literal, NodeKind::Operation, NodeKind::Literal] {
            let child = tree.create(kind, 2);
            tree.add_child(expr, child).unwrap();
        }
        let left = tree.child(expr, 0).unwrap();
        tree.set_attribute(left, Attribute::Value, "1").unwrap();
        let op = tree.child(expr, 1).unwrap();
        tree.set_attribute(op, Attribute::Type, "%").unwrap();
        assert_eq!(evaluate(&tree, expr),
                   Err(RuntimeError::InvalidOperator { op:   "%".to_string(),
                                                       line: 2, }));
    }

    #[test]
    fn released_nodes_are_reported_instead_of_panicking() {
        let mut tree = Tree::new();
        let expr = tree.create(NodeKind::Expression, 1);
        tree.release(expr).unwrap();
        assert_eq!(evaluate(&tree, expr), Err(RuntimeError::MissingNode { node: expr }));
    }
}
