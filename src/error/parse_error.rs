use thiserror::Error;

use crate::error::TreeError;

/// Represents all errors that can occur during tokenizing or tree building.
///
/// Any of these aborts the statement in progress. By the time the error is
/// returned the builder has already released every node it created for that
/// statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The tokenizer met a character it cannot classify.
    #[error("Error on line {line}: Unexpected character '{token}'.")]
    UnexpectedCharacter {
        /// The offending input.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A `number` declaration started while another statement was open.
    #[error("Error on line {line}: Unexpected variable declaration.")]
    UnexpectedDeclaration {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The token cannot begin or continue any statement form.
    #[error("Error on line {line}: Invalid statement at '{token}'.")]
    InvalidStatement {
        /// The offending token.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An expression token arrived with no expression open.
    #[error("Error on line {line}: Unexpected expression token '{token}'.")]
    UnexpectedExpression {
        /// The offending token.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An operator arrived where no operator can go.
    #[error("Error on line {line}: Invalid placement of operator '{token}'.")]
    InvalidOperatorPlacement {
        /// The offending operator.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An operand arrived where an operator was expected.
    #[error("Error on line {line}: Invalid placement of operand '{token}'.")]
    InvalidOperandPlacement {
        /// The offending operand.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A statement ended while a nested expression was still open.
    #[error("Error on line {line}: Unexpected end of expression.")]
    UnexpectedEndOfExpression {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The input ended before the open statement was terminated by `;`.
    #[error("Error on line {line}: Statement is missing its terminating ';'.")]
    UnterminatedStatement {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An integer literal does not fit into a signed 64-bit integer.
    #[error("Error on line {line}: Literal {token} is too large.")]
    LiteralTooLarge {
        /// The literal text.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A tree mutation was rejected.
    #[error("Internal tree error: {0}")]
    Tree(#[from] TreeError),
}
