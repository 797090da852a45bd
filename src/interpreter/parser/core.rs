use std::iter::Peekable;

use crate::{
    ast::{Attribute, NodeId, NodeKind, Tree},
    error::ParseError,
    interpreter::lexer::{Token, WordKind},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Incrementally builds a [`Tree`] from a token stream.
///
/// The builder never looks further ahead than one token. Operator precedence
/// is established while tokens arrive, by rotating the operand on the right of
/// a looser operator into a new implicit expression when a tighter operator
/// follows it. No separate lowering pass runs afterwards.
///
/// The state is:
/// - `stmt`: the statement being built.
/// - `cursor`: the innermost expression currently receiving children.
/// - `prev_stmt`: the last statement that was opened or completed, used to
///   recognize `= …` after `number <name>`.
/// - `skipped_parens`: open parentheses of a function-call argument list that
///   is consumed without building nodes.
///
/// Each token class maps to one transition method. A failing transition rolls
/// the tree back to the state before the statement began, so that no node of
/// the aborted statement survives.
///
/// # Example
/// ```
/// use arbor::interpreter::{lexer::tokenize, parser::core::TreeBuilder};
///
/// let tokens = tokenize("number a = 1+2*3;").unwrap();
/// let mut builder = TreeBuilder::new();
/// let mut iter = tokens.iter().peekable();
/// while builder.feed(&mut iter).unwrap() {}
///
/// let tree = builder.finish().unwrap();
/// assert_eq!(tree.children(tree.root()).len(), 2);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    pub(super) tree:           Tree,
    pub(super) stmt:           Option<NodeId>,
    pub(super) cursor:         Option<NodeId>,
    pub(super) prev_stmt:      Option<NodeId>,
    pub(super) skipped_parens: usize,
    mark:                      usize,
    line:                      usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Creates a builder holding an empty document.
    #[must_use]
    pub fn new() -> Self {
        let tree = Tree::new();
        let mark = tree.mark();
        Self { tree,
               stmt: None,
               cursor: None,
               prev_stmt: None,
               skipped_parens: 0,
               mark,
               line: 1 }
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The statement currently being built.
    #[must_use]
    pub const fn statement(&self) -> Option<NodeId> {
        self.stmt
    }

    /// The expression currently receiving children.
    #[must_use]
    pub const fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Consumes the next token and applies its transition.
    ///
    /// Declarations, assignments and function calls also consume the token
    /// that follows them (the declared name, `=` or `(`).
    ///
    /// # Returns
    /// `Ok(false)` once the stream is exhausted.
    ///
    /// # Errors
    /// Returns the fault of the failing transition. The statement in progress
    /// is discarded before returning.
    pub fn feed<'a, I>(&mut self, tokens: &mut Peekable<I>) -> ParseResult<bool>
        where I: Iterator<Item = &'a (Token, usize)>
    {
        let Some((token, line)) = tokens.next() else {
            return Ok(false);
        };
        self.line = *line;
        if self.stmt.is_none() {
            self.mark = self.tree.mark();
        }

        tracing::trace!(%token, line, cursor = ?self.cursor, "token");
        if let Err(e) = self.dispatch(token, *line, tokens) {
            self.abort(&e);
            return Err(e);
        }
        Ok(true)
    }

    /// Hands out the finished tree.
    ///
    /// # Errors
    /// Returns [`ParseError::UnterminatedStatement`] if a statement is still
    /// open.
    pub fn finish(mut self) -> ParseResult<Tree> {
        if self.stmt.is_some() {
            let e = ParseError::UnterminatedStatement { line: self.line };
            self.abort(&e);
            return Err(e);
        }
        Ok(self.tree)
    }

    fn dispatch<'a, I>(&mut self,
                       token: &Token,
                       line: usize,
                       tokens: &mut Peekable<I>)
                       -> ParseResult<()>
        where I: Iterator<Item = &'a (Token, usize)>
    {
        if self.skipped_parens > 0 {
            return self.skip_argument(token, line);
        }

        match token {
            Token::Plus | Token::Minus | Token::Star | Token::Slash => self.operator(token, line),
            Token::LParen => self.open_group(token, line),
            Token::RParen => self.close_group(token, line),
            Token::Semicolon => self.terminate(line),
            Token::Word(word) => match token.word_kind() {
                Some(WordKind::Declaration) => self.declaration(line, tokens),
                Some(WordKind::Assign) => self.assign(token, line),
                _ if self.stmt.is_none() => self.statement_start(token, word, line, tokens),
                _ => self.operand(token, line),
            },
            Token::NewLine | Token::Ignored => Ok(()),
        }
    }

    fn abort(&mut self, error: &ParseError) {
        tracing::debug!(%error, mark = self.mark, "discarding statement");
        self.tree.rollback(self.mark);
        self.stmt = None;
        self.cursor = None;
        self.skipped_parens = 0;
        if self.prev_stmt.is_some_and(|id| self.tree.get(id).is_none()) {
            self.prev_stmt = None;
        }
    }

    /// The cursor, or [`ParseError::UnexpectedExpression`] if no expression
    /// is open.
    pub(super) fn open_expression(&self, token: &Token, line: usize) -> ParseResult<NodeId> {
        self.cursor
            .ok_or_else(|| ParseError::UnexpectedExpression { token: token.to_string(),
                                                              line })
    }

    pub(super) fn is_implicit(&self, id: NodeId) -> bool {
        self.tree.attribute(id, Attribute::ImplicitParen).is_some()
    }

    pub(super) fn create_with(&mut self,
                              kind: NodeKind,
                              line: usize,
                              attributes: &[(Attribute, &str)])
                              -> ParseResult<NodeId> {
        let id = self.tree.create(kind, line);
        for (key, value) in attributes {
            self.tree.set_attribute(id, *key, *value)?;
        }
        Ok(id)
    }
}

/// Builds the tree for a whole token stream.
///
/// # Errors
/// Returns the first fault met; the run ends there.
///
/// # Example
/// ```
/// use arbor::{
///     error::ParseError,
///     interpreter::{lexer::tokenize, parser::core::build_tree},
/// };
///
/// let tokens = tokenize("number a = +5;").unwrap();
/// assert!(matches!(build_tree(&tokens),
///                  Err(ParseError::InvalidOperatorPlacement { .. })));
/// ```
pub fn build_tree(tokens: &[(Token, usize)]) -> ParseResult<Tree> {
    let mut builder = TreeBuilder::new();
    let mut iter = tokens.iter().peekable();
    while builder.feed(&mut iter)? {}
    builder.finish()
}
