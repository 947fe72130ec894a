/*! Implements the pattern tokenizer.

Tokenization is the first step in the compilation process. The tokenizer takes
a pattern and produces a flat sequence of tokens that is later consumed by the
[code generator][crate::re::Compiler].

Besides the tokens that correspond to some portion of the pattern, the
tokenizer inserts synthetic [`Operator::Concatenate`] tokens between operands
that are written one after the other. For instance, the pattern `ab(c)*d`
produces:

```text
CHAR(a) CONCAT CHAR(b) CONCAT GROUP_BEGIN CHAR(c) GROUP_END STAR CONCAT CHAR(d)
```

The tokenizer fails as soon as it finds a character that is not part of the
syntax, or a `[` without its closing `]`. No tokens are returned in that case.
*/

use logos::Logos;

use crate::CompileError;

mod tokens;

pub(crate) use tokens::CharClass;
pub(crate) use tokens::Operator;
pub(crate) use tokens::Token;
pub(crate) use tokens::TokenKind;


/// Takes a pattern and produces a sequence of tokens.
pub(crate) struct Tokenizer<'src> {
    source: &'src str,
    /// True if the next operand must be preceded by a concatenation.
    needs_concat: bool,
    tokens: Vec<Token<'src>>,
}

impl<'src> Tokenizer<'src> {
    /// Creates a new [`Tokenizer`].
    pub fn new(source: &'src str) -> Self {
        Self { source, needs_concat: false, tokens: Vec::new() }
    }

    /// Consumes the tokenizer and returns all the tokens in the pattern.
    pub fn tokenize(mut self) -> Result<Vec<Token<'src>>, CompileError> {
        let mut lexer = RawToken::lexer(self.source);

        while let Some(raw) = lexer.next() {
            let span = lexer.span();
            let text = lexer.slice();

            let raw = match raw {
                Ok(raw) => raw,
                Err(()) => return Err(self.unexpected(span.start)),
            };

            match raw {
                RawToken::Char => self.push_operand(
                    TokenKind::Character { class: CharClass::Single, text },
                    span.start,
                ),
                RawToken::Dot => self.push_operand(
                    TokenKind::Character { class: CharClass::Any, text },
                    span.start,
                ),
                RawToken::Range => {
                    // Strip the brackets, `text` is at least 2 bytes long.
                    let text = &text[1..text.len() - 1];
                    self.push_operand(
                        TokenKind::CharacterRange { text },
                        span.start,
                    )
                }
                RawToken::LParen => {
                    self.push_operand(TokenKind::GroupBegin, span.start);
                    // An operand is expected after the opening parenthesis.
                    self.needs_concat = false;
                }
                RawToken::RParen => {
                    self.tokens
                        .push(Token::new(TokenKind::GroupEnd, span.start));
                    self.needs_concat = true;
                }
                RawToken::Pipe => {
                    self.push_operator(Operator::Alternate, span.start);
                    self.needs_concat = false;
                }
                // Postfix operators apply to the previous operand and don't
                // change whether the next operand must be concatenated.
                RawToken::Asterisk => {
                    self.push_operator(Operator::ZeroOrMore, span.start)
                }
                RawToken::Plus => {
                    self.push_operator(Operator::OneOrMore, span.start)
                }
                RawToken::Question => {
                    self.push_operator(Operator::ZeroOrOne, span.start)
                }
            }
        }

        Ok(self.tokens)
    }
}

impl<'src> Tokenizer<'src> {
    fn push_operand(&mut self, kind: TokenKind<'src>, offset: usize) {
        if self.needs_concat {
            self.push_operator(Operator::Concatenate, offset);
        }
        let token = Token::new(kind, offset);
        self.needs_concat = token.is_atom();
        self.tokens.push(token);
    }

    fn push_operator(&mut self, op: Operator, offset: usize) {
        self.tokens.push(Token::new(TokenKind::Operator(op), offset));
    }

    /// Builds the error for a portion of the pattern that doesn't match any
    /// token.
    fn unexpected(&self, offset: usize) -> CompileError {
        let rest = &self.source[offset..];
        if rest.starts_with('[') {
            return CompileError::UnterminatedRange { offset };
        }
        // The lexer only stops at character boundaries, so `rest` always
        // starts with a full character.
        match rest.chars().next() {
            Some(character) => {
                CompileError::UnsupportedCharacter { character, offset }
            }
            None => CompileError::UnexpectedEnd,
        }
    }
}

/// Tokens recognized by the underlying [`logos`] lexer.
#[derive(logos::Logos, Debug, PartialEq)]
enum RawToken {
    #[regex("[A-Za-z0-9_]")]
    Char,

    #[token(".")]
    Dot,

    #[regex(r"\[[^\]]*\]")]
    Range,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("|")]
    Pipe,

    #[token("*")]
    Asterisk,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,
}
