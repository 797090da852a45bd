use crate::{
    ast::{Attribute, BinaryOperator, NodeId, NodeKind},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, TreeBuilder},
    },
};

/// Maps an operator token to its [`BinaryOperator`].
pub(in crate::interpreter::parser) fn token_to_binary_operator(token: &Token)
                                                               -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        _ => None,
    }
}

impl TreeBuilder {
    /// Places a binary operator.
    ///
    /// With a single left operand in the cursor, the operator becomes its
    /// second child. With a complete `left op right` triple, the tree is
    /// restructured:
    ///
    /// - a tighter operator after a looser one **rotates** the right operand
    ///   into a new implicit expression, which then receives the operator and
    ///   becomes the cursor; the cursor pops back out once that expression's
    ///   right operand arrives;
    /// - otherwise the whole cursor expression is **wrapped** as the left
    ///   operand of a new expression, which keeps equal-tier chains left
    ///   associative.
    ///
    /// ```text
    ///   1 + 2 * …             1 + 2 * 3 - …
    ///
    ///   E                     E'
    ///   ├── 1                 ├── E
    ///   ├── +                 │   ├── 1
    ///   └── E (implicit)      │   ├── +
    ///       ├── 2             │   └── E (implicit) [2 * 3]
    ///       └── *             └── -
    /// ```
    ///
    /// # Errors
    /// - `UnexpectedExpression` if no expression is open.
    /// - `InvalidOperatorPlacement` if the cursor holds neither one nor three
    ///   children.
    pub(super) fn operator(&mut self, token: &Token, line: usize) -> ParseResult<()> {
        let cursor = self.open_expression(token, line)?;
        let misplaced = || ParseError::InvalidOperatorPlacement { token: token.to_string(),
                                                                  line };
        let op = token_to_binary_operator(token).ok_or_else(misplaced)?;

        match self.tree.children(cursor).len() {
            1 => {
                let operation = self.operation(op, line)?;
                self.tree.add_child(cursor, operation)?;
                Ok(())
            },
            3 => {
                let previous = self.tree
                                   .child(cursor, 1)
                                   .and_then(|id| self.tree.attribute(id, Attribute::Type))
                                   .and_then(BinaryOperator::from_symbol)
                                   .ok_or_else(misplaced)?;

                if op.binds_tighter_than(previous) {
                    self.rotate(cursor, op, line)
                } else {
                    self.wrap(cursor, op, line)
                }
            },
            _ => Err(misplaced()),
        }
    }

    fn operation(&mut self, op: BinaryOperator, line: usize) -> ParseResult<NodeId> {
        self.create_with(NodeKind::Operation, line, &[(Attribute::Type, op.symbol())])
    }

    /// Moves the right operand of `cursor` into a new implicit expression.
    fn rotate(&mut self, cursor: NodeId, op: BinaryOperator, line: usize) -> ParseResult<()> {
        let wrapper =
            self.create_with(NodeKind::Expression, line, &[(Attribute::ImplicitParen, "1")])?;
        let right = self.tree
                        .child(cursor, 2)
                        .ok_or(ParseError::InvalidOperatorPlacement { token: op.to_string(),
                                                                      line })?;

        let right = self.tree.replace_child(cursor, right, wrapper)?;
        self.tree.add_child(wrapper, right)?;
        let operation = self.operation(op, line)?;
        self.tree.add_child(wrapper, operation)?;

        tracing::debug!(%op, expression = %cursor, wrapper = %wrapper, "rotated right operand");
        self.cursor = Some(wrapper);
        Ok(())
    }

    /// Makes `cursor` the left operand of a new expression.
    fn wrap(&mut self, cursor: NodeId, op: BinaryOperator, line: usize) -> ParseResult<()> {
        let outer = self.tree.create(NodeKind::Expression, line);
        let left = match self.tree.parent(cursor) {
            Some(parent) => self.tree.replace_child(parent, cursor, outer)?,
            None => cursor,
        };

        self.tree.add_child(outer, left)?;
        let operation = self.operation(op, line)?;
        self.tree.add_child(outer, operation)?;

        tracing::debug!(%op, expression = %cursor, outer = %outer, "wrapped expression");
        self.cursor = Some(outer);
        Ok(())
    }
}
