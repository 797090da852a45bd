/// Integer literal helpers.
///
/// This module decides which words are integer literals and converts them to
/// `i64` without silent truncation. Both the tree builder and the evaluator go
/// through these helpers so that a literal accepted while building can always
/// be evaluated.
pub mod num;
