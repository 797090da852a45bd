/// Builder state, the token loop and shared helpers.
///
/// Defines [`core::TreeBuilder`], the state machine that turns the token
/// stream into a tree one token at a time, and the [`core::build_tree`] entry
/// point.
pub mod core;

/// Statement-level transitions.
///
/// Declarations, assignments, function calls and the `;` terminator.
pub mod statement;

/// Operator placement.
///
/// Appends operators to the cursor expression and performs the rotations that
/// keep `*` and `/` binding tighter than `+` and `-`.
pub mod binary;

/// Operands and parenthesized groups.
pub mod operand;
