use thiserror::Error;

/// A selector string that could not be parsed.
///
/// `offset` is the byte offset of the offending character, or the input
/// length when the problem is running out of input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    /// Byte offset into the selector string.
    pub offset: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) const fn new(offset: usize, kind: ParseErrorKind) -> Self {
        Self { offset, kind }
    }
}

/// The kinds of [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The input is empty or whitespace only.
    #[error("empty selector")]
    EmptyInput,
    /// A compound with no tag, id, class, attribute or pseudo, such as the
    /// gap in `a,,b` or a trailing comma.
    #[error("empty compound selector")]
    EmptyCompound,
    /// A character that cannot appear at this point.
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    /// `#`, `.` or `:` not followed by a name.
    #[error("expected a name after {0:?}")]
    MissingIdentifier(char),
    /// A `[` without its `]`, or a stray `]`.
    #[error("unbalanced bracket")]
    UnbalancedBracket,
    /// A `(` without its `)`, or a stray `)`.
    #[error("unbalanced parenthesis")]
    UnbalancedParen,
    /// A quoted string that runs to the end of the input.
    #[error("unterminated string")]
    UnterminatedString,
    /// `[` followed by something other than an attribute name.
    #[error("expected an attribute name")]
    MissingAttributeName,
    /// An attribute operator other than `=`, `*=`, `^=`, `$=`, `~=` or `|=`.
    #[error("invalid attribute operator")]
    InvalidAttributeOperator,
    /// An attribute operator with nothing after it.
    #[error("expected an attribute value")]
    MissingAttributeValue,
    /// A second `#id` in one compound.
    #[error("compound already has an id")]
    DuplicateId,
    /// A second `[...]` in one compound.
    #[error("compound already has an attribute matcher")]
    DuplicateAttribute,
}
