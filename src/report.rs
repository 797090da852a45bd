use std::io::{self, Write};

use crate::{ast::Tree, interpreter::lexer::Token};

/// Writes the flattened token sequence on a single line.
///
/// Every token is rendered with its source text and followed by a space. A
/// blank line separates the sequence from whatever follows.
///
/// # Example
/// ```
/// use arbor::{interpreter::lexer::tokenize, report::write_tokens};
///
/// let tokens = tokenize("number x = 5;").unwrap();
/// let mut out = Vec::new();
/// write_tokens(&tokens, &mut out).unwrap();
///
/// assert_eq!(String::from_utf8(out).unwrap(), "number x = 5 ; \n\n");
/// ```
pub fn write_tokens<W: Write>(tokens: &[(Token, usize)], out: &mut W) -> io::Result<()> {
    for (token, _) in tokens {
        write!(out, "{token} ")?;
    }
    write!(out, "\n\n")
}

/// Writes every node reachable from the root, parents before children.
///
/// Each node is printed as one block with its id, role, number of children
/// and attribute pairs in insertion order:
///
/// ```text
/// ==AST NODE==
/// Id: 1
/// Type: VARIABLE_DECLARATION
/// Node Count: 0
/// Field 0: (TYPE, number)
/// Field 1: (NAME, x)
/// ==END AST NODE==
/// ```
pub fn write_tree<W: Write>(tree: &Tree, out: &mut W) -> io::Result<()> {
    for (id, _) in tree.preorder(tree.root()) {
        let node = &tree[id];
        write!(out,
               "\n==AST NODE==\nId: {id}\nType: {}\nNode Count: {}",
               node.kind(),
               node.children().len())?;
        for (i, (key, value)) in node.attributes().iter().enumerate() {
            write!(out, "\nField {i}: ({key}, {value})")?;
        }
        writeln!(out, "\n==END AST NODE==")?;
    }
    Ok(())
}
