use std::iter::Peekable;

use crate::{
    ast::{Attribute, NodeKind},
    error::ParseError,
    interpreter::{
        lexer::{DECLARATION_KEYWORD, Token, WordKind},
        parser::core::{ParseResult, TreeBuilder},
    },
};

impl TreeBuilder {
    /// Handles the `number` keyword.
    ///
    /// The next token must be the declared name; it is consumed here. The
    /// declaration is attached to the root right away and remembered as the
    /// previous statement so that a following `=` turns into an assignment.
    ///
    /// # Errors
    /// - `UnexpectedDeclaration` if a statement is already open.
    /// - `InvalidStatement` if no identifier follows.
    pub(super) fn declaration<'a, I>(&mut self,
                                     line: usize,
                                     tokens: &mut Peekable<I>)
                                     -> ParseResult<()>
        where I: Iterator<Item = &'a (Token, usize)>
    {
        if self.stmt.is_some() {
            return Err(ParseError::UnexpectedDeclaration { line });
        }

        let Some((name, _)) = tokens.next_if(|(token, _)| token.as_identifier().is_some()) else {
            let token = tokens.peek().map_or_else(|| DECLARATION_KEYWORD.to_string(),
                                                  |(t, _)| t.to_string());
            return Err(ParseError::InvalidStatement { token, line });
        };
        let name = name.to_string();

        let decl = self.create_with(NodeKind::VariableDeclaration,
                                    line,
                                    &[(Attribute::Type, DECLARATION_KEYWORD),
                                      (Attribute::Name, &name)])?;
        let root = self.tree.root();
        self.tree.add_child(root, decl)?;

        tracing::debug!(%name, line, "declaration opened");
        self.stmt = Some(decl);
        self.prev_stmt = Some(decl);
        Ok(())
    }

    /// Handles `=` directly after `number <name>`.
    ///
    /// # Errors
    /// Returns `InvalidStatement` anywhere else.
    pub(super) fn assign(&mut self, token: &Token, line: usize) -> ParseResult<()> {
        let invalid = || ParseError::InvalidStatement { token: token.to_string(),
                                                        line };

        let decl = match (self.stmt, self.cursor) {
            (Some(stmt), None)
                if self.prev_stmt == Some(stmt)
                   && self.tree[stmt].kind() == NodeKind::VariableDeclaration =>
            {
                stmt
            },
            _ => return Err(invalid()),
        };

        let target = self.tree
                         .attribute(decl, Attribute::Name)
                         .ok_or_else(invalid)?
                         .to_string();
        self.open_assignment(&target, line)
    }

    /// Handles a word that starts a statement.
    ///
    /// `<name> =` opens an assignment and `<name> (` a function call; the
    /// second token is consumed here.
    ///
    /// # Errors
    /// Returns `InvalidStatement` for every other form.
    pub(super) fn statement_start<'a, I>(&mut self,
                                         token: &Token,
                                         word: &str,
                                         line: usize,
                                         tokens: &mut Peekable<I>)
                                         -> ParseResult<()>
        where I: Iterator<Item = &'a (Token, usize)>
    {
        if token.word_kind() == Some(WordKind::Identifier) {
            if tokens.next_if(|(next, _)| next.word_kind() == Some(WordKind::Assign))
                     .is_some()
            {
                return self.open_assignment(word, line);
            }
            if tokens.next_if(|(next, _)| *next == Token::LParen).is_some() {
                return self.function_call(word, line);
            }
        }

        Err(ParseError::InvalidStatement { token: word.to_string(),
                                           line })
    }

    fn open_assignment(&mut self, target: &str, line: usize) -> ParseResult<()> {
        let assignment =
            self.create_with(NodeKind::VariableAssignment, line, &[(Attribute::Target, target)])?;
        let root = self.tree.root();
        self.tree.add_child(root, assignment)?;
        let expr = self.tree.create(NodeKind::Expression, line);

        tracing::debug!(%target, line, "assignment opened");
        self.stmt = Some(assignment);
        self.cursor = Some(expr);
        Ok(())
    }

    fn function_call(&mut self, name: &str, line: usize) -> ParseResult<()> {
        let call = self.create_with(NodeKind::FunctionCall, line, &[(Attribute::Target, name)])?;
        let root = self.tree.root();
        self.tree.add_child(root, call)?;

        tracing::debug!(%name, line, "function call recognized, skipping arguments");
        self.stmt = Some(call);
        self.skipped_parens = 1;
        Ok(())
    }

    /// Consumes one token of a function-call argument list.
    ///
    /// # Errors
    /// Returns `UnexpectedEndOfExpression` if `;` arrives before the list is
    /// closed.
    pub(super) fn skip_argument(&mut self, token: &Token, line: usize) -> ParseResult<()> {
        match token {
            Token::LParen => self.skipped_parens += 1,
            Token::RParen => self.skipped_parens -= 1,
            Token::Semicolon => return Err(ParseError::UnexpectedEndOfExpression { line }),
            _ => {},
        }
        Ok(())
    }

    /// Handles `;`.
    ///
    /// The top-level expression of an assignment is attached to the
    /// assignment only now. A `;` without an open statement is an empty
    /// statement.
    ///
    /// # Errors
    /// Returns `UnexpectedEndOfExpression` if the cursor is still nested
    /// inside a parenthesized or implicit expression.
    pub(super) fn terminate(&mut self, line: usize) -> ParseResult<()> {
        let Some(stmt) = self.stmt else {
            return Ok(());
        };

        if let Some(expr) = self.cursor {
            if self.tree.parent(expr).is_some() {
                return Err(ParseError::UnexpectedEndOfExpression { line });
            }
            self.tree.add_child(stmt, expr)?;
        }

        tracing::debug!(statement = %stmt, line, "statement closed");
        self.prev_stmt = self.stmt.take();
        self.cursor = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{Attribute, NodeKind, Tree},
        error::ParseError,
        interpreter::{
            lexer::tokenize,
            parser::core::{TreeBuilder, build_tree},
        },
    };

    fn parse(source: &str) -> Result<Tree, ParseError> {
        build_tree(&tokenize(source).unwrap())
    }

    fn statement_kinds(tree: &Tree) -> Vec<NodeKind> {
        tree.children(tree.root())
            .iter()
            .map(|id| tree[*id].kind())
            .collect()
    }

    #[test]
    fn bare_declaration() {
        let tree = parse("number x;").unwrap();
        assert_eq!(statement_kinds(&tree), [NodeKind::VariableDeclaration]);
        let decl = tree.child(tree.root(), 0).unwrap();
        assert_eq!(tree.attribute(decl, Attribute::Name), Some("x"));
        assert_eq!(tree.attribute(decl, Attribute::Type), Some("number"));
        assert!(tree.children(decl).is_empty());
    }

    #[test]
    fn declaration_with_initializer_adds_assignment() {
        let tree = parse("number x = 5;").unwrap();
        assert_eq!(statement_kinds(&tree),
                   [NodeKind::VariableDeclaration, NodeKind::VariableAssignment]);
        let assignment = tree.child(tree.root(), 1).unwrap();
        assert_eq!(tree.attribute(assignment, Attribute::Target), Some("x"));
        let expr = tree.child(assignment, 0).unwrap();
        assert_eq!(tree[expr].kind(), NodeKind::Expression);
    }

    #[test]
    fn plain_assignment() {
        let tree = parse("number x; x = 2;").unwrap();
        assert_eq!(statement_kinds(&tree),
                   [NodeKind::VariableDeclaration, NodeKind::VariableAssignment]);
    }

    #[test]
    fn function_call_arguments_are_skipped() {
        let tree = parse("print(a, (b + 1)); number y = 1;").unwrap();
        assert_eq!(statement_kinds(&tree),
                   [NodeKind::FunctionCall,
                    NodeKind::VariableDeclaration,
                    NodeKind::VariableAssignment]);
        let call = tree.child(tree.root(), 0).unwrap();
        assert_eq!(tree.attribute(call, Attribute::Target), Some("print"));
        assert!(tree.children(call).is_empty());
    }

    #[test]
    fn empty_statements_are_ignored() {
        let tree = parse(";; number x;;").unwrap();
        assert_eq!(statement_kinds(&tree), [NodeKind::VariableDeclaration]);
    }

    #[test]
    fn nested_declaration_is_rejected() {
        assert_eq!(parse("number x number y;").unwrap_err(),
                   ParseError::UnexpectedDeclaration { line: 1 });
    }

    #[test]
    fn declaration_needs_a_name() {
        assert!(matches!(parse("number ;"), Err(ParseError::InvalidStatement { .. })));
        assert!(matches!(parse("number 5;"), Err(ParseError::InvalidStatement { .. })));
        assert!(matches!(parse("number"), Err(ParseError::InvalidStatement { .. })));
    }

    #[test]
    fn unknown_statement_forms_are_rejected() {
        assert_eq!(parse("x + 1;").unwrap_err(),
                   ParseError::InvalidStatement { token: "x".to_string(),
                                                  line:  1, });
        assert!(matches!(parse("5 = 1;"), Err(ParseError::InvalidStatement { .. })));
        assert!(matches!(parse("= 1;"), Err(ParseError::InvalidStatement { .. })));
        assert!(matches!(parse("number x = 1 = 2;"), Err(ParseError::InvalidStatement { .. })));
    }

    #[test]
    fn missing_terminator_is_rejected() {
        assert_eq!(parse("number x = 1\n+ 2").unwrap_err(),
                   ParseError::UnterminatedStatement { line: 2 });
        assert!(matches!(parse("f(1;"), Err(ParseError::UnexpectedEndOfExpression { .. })));
    }

    #[test]
    fn open_group_at_terminator_is_rejected() {
        assert_eq!(parse("number x = (1 + 2;").unwrap_err(),
                   ParseError::UnexpectedEndOfExpression { line: 1 });
        assert_eq!(parse("number x = 1 + 2 *;").unwrap_err(),
                   ParseError::UnexpectedEndOfExpression { line: 1 });
    }

    #[test]
    fn failed_statement_is_rolled_back() {
        let tokens = tokenize("number a = 1; number b = (2 * 3 + ;").unwrap();
        let mut builder = TreeBuilder::new();
        let mut iter = tokens.iter().peekable();

        let error = loop {
            match builder.feed(&mut iter) {
                Ok(true) => {},
                Ok(false) => panic!("expected a fault"),
                Err(e) => break e,
            }
        };

        assert_eq!(error, ParseError::UnexpectedEndOfExpression { line: 1 });
        let tree = builder.tree();
        assert_eq!(statement_kinds(tree),
                   [NodeKind::VariableDeclaration, NodeKind::VariableAssignment]);
        assert!(tree.detached_nodes().is_empty());
        assert_eq!(builder.statement(), None);
        assert_eq!(builder.cursor(), None);
    }

    #[test]
    fn unterminated_statement_is_rolled_back_on_finish() {
        let tokens = tokenize("number a = 1; a = 2 * (3").unwrap();
        let mut builder = TreeBuilder::new();
        let mut iter = tokens.iter().peekable();
        while builder.feed(&mut iter).unwrap() {}
        // the pending top-level expression and its children
        assert_eq!(builder.tree().detached_nodes().len(), 5);

        assert_eq!(builder.finish().unwrap_err(),
                   ParseError::UnterminatedStatement { line: 1 });
    }
}
