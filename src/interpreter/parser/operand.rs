use crate::{
    ast::{Attribute, NodeId, NodeKind},
    error::ParseError,
    interpreter::{
        lexer::{Token, WordKind},
        parser::core::{ParseResult, TreeBuilder},
    },
    util::num::parse_integer_literal,
};

impl TreeBuilder {
    /// Appends a literal or variable reference to the cursor.
    ///
    /// If the cursor is an implicit expression, it is complete once its right
    /// operand is in place and the cursor returns to the enclosing expression.
    ///
    /// # Errors
    /// - `UnexpectedExpression` if no expression is open.
    /// - `InvalidOperandPlacement` if the cursor expects an operator.
    /// - `LiteralTooLarge` if an integer literal exceeds 64 bits.
    pub(super) fn operand(&mut self, token: &Token, line: usize) -> ParseResult<()> {
        let cursor = self.open_expression(token, line)?;
        self.check_operand_slot(cursor, token, line)?;

        let text = token.to_string();
        let leaf = if token.word_kind() == Some(WordKind::Integer) {
            parse_integer_literal(&text,
                                  ParseError::LiteralTooLarge { token: text.clone(),
                                                                line })?;
            self.create_with(NodeKind::Literal, line, &[(Attribute::Value, &text)])?
        } else {
            self.create_with(NodeKind::VariableReference, line, &[(Attribute::Target, &text)])?
        };
        self.tree.add_child(cursor, leaf)?;

        if self.is_implicit(cursor) {
            self.cursor = self.tree.parent(cursor).or(Some(cursor));
        }
        Ok(())
    }

    /// Opens an explicit group below the cursor.
    ///
    /// # Errors
    /// - `UnexpectedExpression` if no expression is open.
    /// - `InvalidOperandPlacement` if the cursor expects an operator.
    pub(super) fn open_group(&mut self, token: &Token, line: usize) -> ParseResult<()> {
        let cursor = self.open_expression(token, line)?;
        self.check_operand_slot(cursor, token, line)?;

        let group = self.tree.create(NodeKind::Expression, line);
        self.tree.add_child(cursor, group)?;
        self.cursor = Some(group);
        Ok(())
    }

    /// Closes the innermost group.
    ///
    /// The cursor moves to the group's parent. When that parent is an
    /// implicit expression, the group was its right operand and the cursor
    /// moves one more level up, so an implicit expression never stays the
    /// cursor past an explicit `)`.
    ///
    /// Only a complete expression can be closed. An implicit expression is
    /// the cursor only while it waits for its right operand, so a `)` there
    /// is rejected like a `)` after any other operator.
    ///
    /// # Errors
    /// Returns `UnexpectedExpression` if there is no group to close or the
    /// innermost expression is empty or still waiting for an operand.
    pub(super) fn close_group(&mut self, token: &Token, line: usize) -> ParseResult<()> {
        let unexpected = || ParseError::UnexpectedExpression { token: token.to_string(),
                                                               line };
        let cursor = self.open_expression(token, line)?;
        if !matches!(self.tree.children(cursor).len(), 1 | 3) || self.is_implicit(cursor) {
            return Err(unexpected());
        }
        let parent = self.tree.parent(cursor).ok_or_else(unexpected)?;

        let next = if self.is_implicit(parent) {
            self.tree.parent(parent).ok_or_else(unexpected)?
        } else {
            parent
        };
        self.cursor = Some(next);
        Ok(())
    }

    /// Operands go first or after an operator, never next to another operand.
    fn check_operand_slot(&self, cursor: NodeId, token: &Token, line: usize) -> ParseResult<()> {
        match self.tree.children(cursor).len() {
            0 | 2 => Ok(()),
            _ => Err(ParseError::InvalidOperandPlacement { token: token.to_string(),
                                                           line }),
        }
    }
}
