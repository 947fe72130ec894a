use thiserror::Error;

/// Errors returned while compiling a regular expression.
///
/// Every variant that originates in a specific portion of the pattern carries
/// the byte offset within the pattern where the problem was found.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum CompileError {
    /// The pattern contains a character that is not part of the syntax.
    #[error("unsupported character `{character}` at offset {offset}")]
    UnsupportedCharacter { character: char, offset: usize },

    /// A `[` was found, but the closing `]` is missing.
    #[error("unterminated character range starting at offset {offset}")]
    UnterminatedRange { offset: usize },

    /// The body of a character range is not of the form `lo-hi`, or `lo` is
    /// greater than `hi`.
    #[error("invalid character range `[{range}]` at offset {offset}")]
    InvalidRange { range: String, offset: usize },

    /// A token appeared where it is not allowed. This includes operators
    /// found where an operand was expected, and tokens left over after a
    /// complete expression.
    #[error("unexpected `{token}` at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    /// A `)` that doesn't close any group.
    #[error("unmatched `)` at offset {offset}")]
    UnmatchedParen { offset: usize },

    /// A group that was opened but never closed.
    #[error("missing `)` for group opened at offset {offset}")]
    UnclosedGroup { offset: usize },

    /// The pattern ended where an operand was expected.
    #[error("unexpected end of pattern")]
    UnexpectedEnd,

    /// A `*` or `+` was applied to a group that matches the empty string.
    #[error("repeated expression at offset {offset} can match an empty string")]
    EmptyRepetition { offset: usize },

    /// Groups are nested too deeply.
    #[error("groups nested too deeply (max: {max})")]
    TooDeep { max: u32 },

    /// The pattern has more groups than group ids available.
    #[error("too many groups (max: {max})")]
    TooManyGroups { max: u8 },

    /// The regular expression is too large.
    #[error("regexp too large")]
    TooLarge,
}
