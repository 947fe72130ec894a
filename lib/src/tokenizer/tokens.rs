use std::fmt::{Display, Formatter};

/// Character class associated to a [`TokenKind::Character`] token. Ranges
/// have their own token kind, [`TokenKind::CharacterRange`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CharClass {
    /// A single literal character, like `a`.
    Single,
    /// Any character (`.`).
    Any,
}

/// Operators recognized by the tokenizer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Operator {
    /// `|`
    Alternate,
    /// Not present in the source, inserted between two juxtaposed operands.
    Concatenate,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    ZeroOrOne,
}

impl Operator {
    /// Returns the operator as it appears in the pattern.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Alternate => "|",
            Operator::Concatenate => "concatenation",
            Operator::ZeroOrMore => "*",
            Operator::OneOrMore => "+",
            Operator::ZeroOrOne => "?",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TokenKind<'src> {
    /// A literal character or `.`. The text is the character itself.
    Character { class: CharClass, text: &'src str },
    /// A character range. The text is what appears between the brackets,
    /// for `[a-z]` it is `a-z`.
    CharacterRange { text: &'src str },
    Operator(Operator),
    GroupBegin,
    GroupEnd,
}

/// A token produced by the [`super::Tokenizer`].
///
/// Tokens borrow their text from the pattern, `offset` is the position
/// within the pattern where the token starts. Synthetic concatenation tokens
/// have the offset of the operand that follows them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub offset: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind<'src>, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Returns true if the token is an operand that can be followed by an
    /// implicit concatenation.
    #[inline]
    pub fn is_atom(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Character { .. }
                | TokenKind::CharacterRange { .. }
                | TokenKind::GroupEnd
        )
    }

    /// Returns a textual representation of the token suitable for error
    /// messages. This is the token as written in the pattern.
    pub fn source_text(&self) -> String {
        match self.kind {
            TokenKind::Character { text, .. } => text.to_string(),
            TokenKind::CharacterRange { text } => format!("[{}]", text),
            TokenKind::Operator(op) => op.as_str().to_string(),
            TokenKind::GroupBegin => "(".to_string(),
            TokenKind::GroupEnd => ")".to_string(),
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Character { class: CharClass::Any, .. } => {
                write!(f, "ANY")
            }
            TokenKind::Character { text, .. } => write!(f, "CHAR({})", text),
            TokenKind::CharacterRange { text } => {
                write!(f, "RANGE({})", text)
            }
            TokenKind::Operator(Operator::Alternate) => write!(f, "ALT"),
            TokenKind::Operator(Operator::Concatenate) => write!(f, "CONCAT"),
            TokenKind::Operator(Operator::ZeroOrMore) => write!(f, "STAR"),
            TokenKind::Operator(Operator::OneOrMore) => write!(f, "PLUS"),
            TokenKind::Operator(Operator::ZeroOrOne) => write!(f, "QUESTION"),
            TokenKind::GroupBegin => write!(f, "GROUP_BEGIN"),
            TokenKind::GroupEnd => write!(f, "GROUP_END"),
        }
    }
}
