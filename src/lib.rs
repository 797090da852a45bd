//! # arbor
//!
//! arbor is a tiny statement interpreter written in Rust. It builds a document
//! tree incrementally, one token at a time, regrouping arithmetic expressions
//! by operator precedence as it goes, and then walks the finished tree to
//! declare variables and evaluate integer assignments.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::Write;

use crate::{
    error::Error,
    interpreter::{lexer::tokenize, parser::core::build_tree, runtime::Interpreter},
};

/// Defines the document tree.
///
/// This module declares the node arena, node ids, roles and attribute keys
/// that make up a parsed program. The tree is built by the parser and walked
/// by the runtime.
///
/// # Responsibilities
/// - Owns every node and hands out ids that are never reused.
/// - Keeps parent and child links consistent on every mutation.
/// - Supports rolling back all nodes created after a mark.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while tokenizing,
/// building the tree or interpreting it. Every fault carries the source line
/// it was raised on.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, builder, arena,
///   evaluator).
/// - Attaches line numbers and offending tokens for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the phases of code execution.
///
/// This module ties together lexing, tree building, evaluation and the
/// runtime walk.
pub mod interpreter;
/// Renders the token stream and the tree for inspection.
pub mod report;
/// General utilities for integer literals.
pub mod util;

/// Which diagnostic sections [`execute`] writes before the program's effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunOptions {
    /// Print the flattened token sequence.
    pub show_tokens: bool,
    /// Print the tree dump.
    pub show_tree:   bool,
}

/// Runs a program and writes its output to `out`.
///
/// The source is tokenized and built into a tree. The requested diagnostic
/// sections are written first, then one line per declaration and assignment
/// in source order. Output of statements before a runtime fault has already
/// been written when the fault is returned.
///
/// # Errors
/// Returns an error if the source does not parse, if an expression cannot be
/// evaluated, or if writing to `out` fails.
///
/// # Examples
/// ```
/// use arbor::{RunOptions, execute};
///
/// let mut out = Vec::new();
/// execute("number a = 1+2*3;", RunOptions::default(), &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(),
///            "Creating variable named a of type: number\nAssigned value of 7 to a\n");
///
/// // Division by zero stops the run.
/// let mut out = Vec::new();
/// assert!(execute("number a = 5/0;", RunOptions::default(), &mut out).is_err());
/// ```
pub fn execute<W: Write>(source: &str, options: RunOptions, out: &mut W) -> Result<(), Error> {
    let tokens = tokenize(source)?;
    if options.show_tokens {
        report::write_tokens(&tokens, out)?;
    }

    let tree = build_tree(&tokens)?;
    tracing::debug!(nodes = tree.node_count(), "tree built");
    if options.show_tree {
        report::write_tree(&tree, out)?;
    }

    let mut write_error = None;
    let result = Interpreter::new(&tree).run(|effect| {
                                            if write_error.is_none()
                                               && let Err(e) = writeln!(out, "{effect}")
                                            {
                                                write_error = Some(e);
                                            }
                                        });
    if let Some(e) = write_error {
        return Err(e.into());
    }
    result.map_err(Error::from)
}
