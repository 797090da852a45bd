/// Parsing errors.
///
/// Defines all faults that can occur while tokenizing source code and while
/// incrementally building the tree. Parse errors carry the offending token and
/// the source line it came from.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all faults that can be raised while evaluating expressions and
/// interpreting the finished tree, such as division by zero or malformed
/// expression nodes.
pub mod runtime_error;
/// Structural errors of the node arena.
///
/// Raised when a tree mutation would break parent/child consistency.
pub mod tree_error;

use thiserror::Error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use tree_error::TreeError;

/// Any fault that can end a run.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be turned into a tree.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The tree could not be interpreted.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// Writing the report failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
