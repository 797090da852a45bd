/// The evaluator module reduces expression subtrees to integers.
///
/// The evaluator walks a single expression node recursively, resolving
/// literals and nested groups and applying the four arithmetic operators with
/// checked 64-bit arithmetic.
///
/// # Responsibilities
/// - Evaluates `left op right` triples and single-operand pass-throughs.
/// - Reports runtime errors such as division by zero or overflow.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer splits the raw source text on whitespace and on the single
/// character delimiters `+ - * / ; ( )`. Every other run of characters becomes
/// one word token, classified later by the builder. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens tagged with their line.
/// - Classifies word tokens as keyword, `=`, integer literal or identifier.
pub mod lexer;
/// The parser module builds the document tree from tokens.
///
/// The parser is an incremental tree builder: it consumes one token at a time
/// and restructures the tree in place, regrouping operands as operators of
/// different precedence arrive.
///
/// # Responsibilities
/// - Converts tokens into declaration, assignment and expression nodes.
/// - Rolls back every node of a statement that fails to parse.
pub mod parser;
/// The runtime module executes a finished tree.
///
/// A single iterative pass visits each statement once and reports its effect.
pub mod runtime;
