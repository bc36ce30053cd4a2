use super::{Gnfa, GnfaError};
use crate::{parse_expression, split_tokens, Expression, ParseError, TokenRules};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;
use winnow::ascii::{space0, space1};
use winnow::combinator::{delimited, separated};
use winnow::prelude::*;
use winnow::seq;
use winnow::stream::AsChar;
use winnow::token::{rest, take_while};

/// Characters with a meaning in expressions, which can't be symbols.
const RESERVED: &[char] = &['(', ')', '.', '/', '*'];

/// Why a GNFA table couldn't be read. Lines are counted from 1.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum GnfaParseError {
    #[error("missing {0} line")]
    MissingHeader(&'static str),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: unknown state `{state}`")]
    UnknownState { line: usize, state: String },
    #[error("line {line}: second row for state `{state}`")]
    DuplicateRow { line: usize, state: String },
    #[error("line {line}: expected {expected} transitions, found {found}")]
    RowArity {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {source}")]
    Expression { line: usize, source: ParseError },
    #[error(transparent)]
    Invalid(#[from] GnfaError),
}

fn parse_state<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(1.., |c: char| c.is_alphanum() || c == '_').parse_next(input)
}

fn parse_states<'s>(input: &mut &'s str) -> PResult<Vec<&'s str>> {
    delimited(space0, separated(1.., parse_state, space1), space0).parse_next(input)
}

fn parse_row<'s>(input: &mut &'s str) -> PResult<(&'s str, &'s str)> {
    seq!(
        _: space0,
        parse_state,
        _: space1,
        rest,
    )
    .parse_next(input)
}

fn parse_alphabet(line: &str) -> Result<BTreeSet<char>, GnfaParseError> {
    let mut alphabet = BTreeSet::new();
    for c in line.chars().filter(|c| !c.is_whitespace()) {
        if RESERVED.contains(&c) {
            return Err(GnfaParseError::Syntax {
                line: 2,
                message: format!("`{c}` is reserved and can't be a symbol"),
            });
        }
        alphabet.insert(c);
    }
    Ok(alphabet)
}

/// A lone symbol of the alphabet is always a character, even if it isn't one
/// the expression syntax allows.
fn parse_cell(
    text: &str,
    alphabet: &BTreeSet<char>,
    line: usize,
) -> Result<Expression, GnfaParseError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if alphabet.contains(&c) => Ok(Expression::Char(c)),
        _ => parse_expression(text).map_err(|source| GnfaParseError::Expression { line, source }),
    }
}

impl FromStr for Gnfa {
    type Err = GnfaParseError;

    /// Reads the table format written by [`Display`](std::fmt::Display):
    /// a name line, an alphabet line, a line of state names (start first,
    /// accept last) and then one row per state with a label for every state
    /// in header order. `..` means there is no edge. States without a row have
    /// no outgoing edges.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().map(str::trim_end).enumerate().map(|(i, l)| (i + 1, l));

        let name = match lines.next() {
            Some((_, name)) if !name.trim().is_empty() => name.trim(),
            _ => return Err(GnfaParseError::MissingHeader("name")),
        };
        let (_, alphabet) = lines
            .next()
            .ok_or(GnfaParseError::MissingHeader("alphabet"))?;
        let alphabet = parse_alphabet(alphabet)?;

        let (states_line, states) = lines
            .next()
            .ok_or(GnfaParseError::MissingHeader("states"))?;
        let states = parse_states.parse(states).map_err(|_| GnfaParseError::Syntax {
            line: states_line,
            message: "expected state names separated by whitespace".to_string(),
        })?;
        if states.len() < 2 {
            return Err(GnfaParseError::Syntax {
                line: states_line,
                message: "a GNFA needs a start and an accept state".to_string(),
            });
        }
        for (i, state) in states.iter().enumerate() {
            if states[..i].contains(state) {
                return Err(GnfaParseError::Syntax {
                    line: states_line,
                    message: format!("state `{state}` is declared twice"),
                });
            }
        }

        let (Some(start), Some(accept)) = (states.first(), states.last()) else {
            return Err(GnfaParseError::MissingHeader("states"));
        };
        let mut builder = Gnfa::builder(name)
            .symbols(alphabet.iter().copied())
            .start(*start);
        for state in &states[1..states.len() - 1] {
            builder = builder.state(*state);
        }
        builder = builder.accept(*accept);

        let rules = TokenRules {
            alphabet: Some(&alphabet),
            allow_no_edge: true,
        };
        let mut seen = BTreeSet::new();

        for (line, text) in lines.filter(|(_, l)| !l.trim().is_empty()) {
            let (from, cells) = parse_row.parse(text).map_err(|_| GnfaParseError::Syntax {
                line,
                message: "expected a state name followed by its transitions".to_string(),
            })?;

            if !states.contains(&from) {
                return Err(GnfaParseError::UnknownState {
                    line,
                    state: from.to_string(),
                });
            }
            if !seen.insert(from) {
                return Err(GnfaParseError::DuplicateRow {
                    line,
                    state: from.to_string(),
                });
            }

            let tokens = split_tokens(cells, rules)
                .map_err(|source| GnfaParseError::Expression { line, source })?;
            if tokens.len() != states.len() {
                return Err(GnfaParseError::RowArity {
                    line,
                    expected: states.len(),
                    found: tokens.len(),
                });
            }

            for (token, to) in tokens.iter().zip(&states) {
                if token.is_no_edge() {
                    continue;
                }
                let label = parse_cell(token.text, &alphabet, line)?;
                builder = builder.transition(from, *to, label);
            }
        }

        Ok(builder.build()?)
    }
}
