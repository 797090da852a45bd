use thiserror::Error;

use crate::ast::{Attribute, NodeId, NodeKind};

/// Represents all errors that can occur during evaluation and interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Attempted division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arithmetic operation overflowed.
    #[error("Error on line {line}: Integer overflow while trying to compute result.")]
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An expression node has neither one nor three children.
    #[error("Error on line {line}: Malformed expression with {children} children.")]
    MalformedExpression {
        /// The number of children found.
        children: usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A node of this role cannot appear where it was found.
    #[error("Error on line {line}: Unexpected {kind} node.")]
    UnexpectedNode {
        /// The role of the misplaced node.
        kind: NodeKind,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operation node names an unknown operator.
    #[error("Error on line {line}: Unknown operator '{op}'.")]
    InvalidOperator {
        /// The operator text.
        op:   String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A literal node holds text that is not an integer.
    #[error("Error on line {line}: Invalid integer literal '{value}'.")]
    InvalidLiteral {
        /// The literal text.
        value: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A node lacks an attribute its role requires.
    #[error("Error on line {line}: {kind} node is missing its {attribute} field.")]
    MissingAttribute {
        /// The role of the node.
        kind:      NodeKind,
        /// The missing key.
        attribute: Attribute,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// The tree refers to a node that has been released.
    #[error("Node {node} does not exist in the tree.")]
    MissingNode {
        /// The id that could not be resolved.
        node: NodeId,
    },
}
