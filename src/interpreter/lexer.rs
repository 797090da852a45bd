use std::fmt;

use logos::Logos;

use crate::{error::ParseError, interpreter::parser::core::ParseResult, util::num};

/// Represents a lexical token in the source input.
///
/// Whitespace, the operators `+ - * /`, the terminator `;` and both
/// parentheses delimit tokens. Every other run of characters forms a single
/// [`Token::Word`]; whether a word is a keyword, `=`, a literal or a name is
/// decided later by [`Token::word_kind`].
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// Any run of non-delimiter characters, such as `number`, `x`, `=` or
    /// `42`.
    #[regex(r"[^ \t\r\n\f\x0B+\-*/;()]+", |lex| lex.slice().to_string())]
    Word(String),
    /// Line breaks only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f\x0B]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// How the builder reads a [`Token::Word`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WordKind {
    /// The declaration keyword `number`.
    Declaration,
    /// The assignment sign `=`.
    Assign,
    /// An integer literal.
    Integer,
    /// Anything else: a variable or function name.
    Identifier,
}

/// The declaration keyword; also the only type name of the language.
pub const DECLARATION_KEYWORD: &str = "number";

impl Token {
    /// Classifies a word token; `None` for delimiters.
    #[must_use]
    pub fn word_kind(&self) -> Option<WordKind> {
        let Self::Word(word) = self else {
            return None;
        };
        Some(match word.as_str() {
            DECLARATION_KEYWORD => WordKind::Declaration,
            "=" => WordKind::Assign,
            w if num::is_integer_literal(w) => WordKind::Integer,
            _ => WordKind::Identifier,
        })
    }

    /// Returns the word if this token is a plain identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Word(word) if self.word_kind() == Some(WordKind::Identifier) => Some(word),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Semicolon => f.write_str(";"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Word(word) => f.write_str(word),
            Self::NewLine => f.write_str("\n"),
            Self::Ignored => Ok(()),
        }
    }
}

/// Splits source text into tokens paired with their source line.
///
/// A trailing word is emitted even without a delimiter after it.
///
/// # Errors
/// Returns [`ParseError::UnexpectedCharacter`] if the scanner cannot match the
/// input. Every character is either a delimiter or part of a word, so this
/// does not happen for valid UTF-8 text.
///
/// # Example
/// ```
/// use arbor::interpreter::lexer::tokenize;
///
/// let tokens = tokenize("number x = 5;").unwrap();
/// let text: Vec<String> = tokens.iter().map(|(t, _)| t.to_string()).collect();
/// assert_eq!(text, ["number", "x", "=", "5", ";"]);
/// ```
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token, usize)>> {
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        match token {
            Ok(tok) => tokens.push((tok, lexer.extras.line)),
            Err(()) => {
                return Err(ParseError::UnexpectedCharacter { token: lexer.slice().to_string(),
                                                             line:  lexer.extras.line, });
            },
        }
    }

    tracing::trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
