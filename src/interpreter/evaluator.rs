/// Core evaluation logic.
///
/// Reduces an expression subtree to an integer value and defines the
/// evaluator's result type.
pub mod core;

/// Binary operator evaluation.
///
/// Implements the checked integer arithmetic behind `+ - * /`.
pub mod binary;
