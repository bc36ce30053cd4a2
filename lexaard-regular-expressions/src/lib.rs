use thiserror::Error;

mod expression;
mod matching;
mod parse;

#[cfg(feature = "emit")]
mod emit;

pub use expression::Expression;
pub use matching::{
    AcceptSemantics, ConcatSemantics, MatchOptions, StarSemantics, DEFAULT_RECURSION_LIMIT,
};
pub use parse::{split_tokens, Token, TokenRules, EMPTY_TOKEN, NO_EDGE, NULL_TOKEN};

/// Why an expression couldn't be parsed. Offsets are byte offsets into the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input was blank.
    #[error("empty expression")]
    Empty,
    /// A token that is neither a symbol, `r.`, `r/` nor a parenthesized operator.
    #[error("unexpected token `{token}` at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },
    /// `(r` with no operator character after it.
    #[error("missing operator at offset {offset}")]
    MissingOperator { offset: usize },
    #[error("unknown operator `{operator}` at offset {offset}, expected `|`, `.` or `*`")]
    UnknownOperator { operator: char, offset: usize },
    #[error("unbalanced parenthesis at offset {offset}")]
    Unbalanced { offset: usize },
    /// `(r| )` and `(r. )`.
    #[error("operator at offset {offset} has no operands")]
    MissingOperands { offset: usize },
    #[error("star at offset {offset} takes exactly one operand, found {found}")]
    StarArity { found: usize, offset: usize },
    #[error("unexpected input after the expression at offset {offset}")]
    TrailingInput { offset: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// The selected [`MatchOptions`] leave this operator unimplemented.
    #[error("matching {0} is not supported by the selected semantics")]
    UnsupportedOperation(&'static str),
    /// An automaton search took more consecutive steps without reading
    /// input than [`MatchOptions::recursion_limit`] allows.
    #[error("search exceeded the recursion limit of {0}")]
    RecursionLimitExceeded(usize),
}

/// parse a string to an expression, failing on the first malformed token
pub fn parse_expression(input: impl AsRef<str>) -> Result<Expression, ParseError> {
    parse::parse_strict(input.as_ref())
}
