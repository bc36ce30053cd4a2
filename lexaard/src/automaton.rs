//! Finite automata that can be converted to expressions.
//!
//! The converter only needs the [`FiniteAutomaton`] view of an automaton.
//! [`Dfa`] implements it for deterministic automata written in the homework
//! table format.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use winnow::ascii::{space0, space1};
use winnow::combinator::{opt, separated};
use winnow::prelude::*;
use winnow::seq;
use winnow::stream::AsChar;
use winnow::token::take_while;

/// What [`crate::convert::lift_automaton`] needs to know about an automaton.
///
/// The transition function must be deterministic. Nondeterministic automata
/// have to be determinized before they are converted.
pub trait FiniteAutomaton {
    /// All states, in declaration order.
    fn states(&self) -> &[String];
    /// The input symbols, in declaration order.
    fn alphabet(&self) -> &[char];
    /// The state the automaton starts in.
    fn starting_state(&self) -> &str;
    /// The states in which the automaton accepts.
    fn accept_states(&self) -> &[String];
    /// The state reached from `state` reading `symbol`, if the transition is defined.
    fn delta(&self, state: &str, symbol: char) -> Option<&str>;
}

/// Why a DFA table couldn't be read. Lines are counted from 1.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DfaParseError {
    #[error("missing {0} line")]
    MissingHeader(&'static str),
    #[error("line {line}: nondeterministic automata must be determinized first")]
    Nondeterministic { line: usize },
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: expected {expected} transitions, found {found}")]
    RowArity {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unknown state `{state}`")]
    UnknownState { line: usize, state: String },
}

/// A deterministic finite automaton.
///
/// The first state is the start state. Every state has a transition for
/// every symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    label: String,
    alphabet: Vec<char>,
    states: Vec<String>,
    accept: Vec<String>,
    /// for each state, the next state per symbol in alphabet order
    delta: HashMap<String, Vec<String>>,
}

impl Dfa {
    /// The first line of the table.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs the automaton on `input`. Symbols outside the alphabet reject.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.starting_state();
        for c in input.chars() {
            match self.delta(current, c) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.accept.iter().any(|s| s == current)
    }
}

impl FiniteAutomaton for Dfa {
    fn states(&self) -> &[String] {
        &self.states
    }

    fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    fn starting_state(&self) -> &str {
        // parsing guarantees at least one state
        self.states.first().map(String::as_str).unwrap_or_default()
    }

    fn accept_states(&self) -> &[String] {
        &self.accept
    }

    fn delta(&self, state: &str, symbol: char) -> Option<&str> {
        let index = self.alphabet.iter().position(|&c| c == symbol)?;
        self.delta.get(state)?.get(index).map(String::as_str)
    }
}

fn parse_state<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(1.., |c: char| c.is_alphanum() || c == '_').parse_next(input)
}

struct Row<'s> {
    accept: bool,
    state: &'s str,
    next: Vec<&'s str>,
}

// [*]state next next ...
fn parse_row<'s>(input: &mut &'s str) -> PResult<Row<'s>> {
    seq! {Row {
        _: space0,
        accept: opt('*').map(|star| star.is_some()),
        state: parse_state,
        _: space1,
        next: separated(1.., parse_state, space1),
        _: space0,
    }}
    .parse_next(input)
}

impl FromStr for Dfa {
    type Err = DfaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate().map(|(i, l)| (i + 1, l));

        let label = match lines.next() {
            Some((_, label)) if !label.trim().is_empty() => label.trim().to_string(),
            _ => return Err(DfaParseError::MissingHeader("label")),
        };

        let (alphabet_line, symbols) = lines
            .next()
            .ok_or(DfaParseError::MissingHeader("alphabet"))?;
        let mut alphabet = Vec::new();
        for symbol in symbols.split_whitespace() {
            if symbol == crate::NO_EDGE {
                return Err(DfaParseError::Nondeterministic {
                    line: alphabet_line,
                });
            }
            // only the first character of each word counts
            let Some(c) = symbol.chars().next() else {
                continue;
            };
            if alphabet.contains(&c) {
                return Err(DfaParseError::Syntax {
                    line: alphabet_line,
                    message: format!("symbol `{c}` is declared twice"),
                });
            }
            alphabet.push(c);
        }

        let mut rows = Vec::new();
        for (line, text) in lines.filter(|(_, l)| !l.trim().is_empty()) {
            if text.contains(',') {
                return Err(DfaParseError::Nondeterministic { line });
            }
            let row = parse_row.parse(text).map_err(|_| DfaParseError::Syntax {
                line,
                message: "expected a state name followed by its transitions".to_string(),
            })?;
            if row.next.len() != alphabet.len() {
                return Err(DfaParseError::RowArity {
                    line,
                    expected: alphabet.len(),
                    found: row.next.len(),
                });
            }
            rows.push((line, row));
        }

        if rows.is_empty() {
            return Err(DfaParseError::MissingHeader("state"));
        }

        let states: Vec<String> = rows.iter().map(|(_, r)| r.state.to_string()).collect();
        let mut delta = HashMap::new();
        let mut accept = Vec::new();

        for (line, row) in &rows {
            if let Some(unknown) = row.next.iter().find(|n| !states.iter().any(|s| s == *n)) {
                return Err(DfaParseError::UnknownState {
                    line: *line,
                    state: unknown.to_string(),
                });
            }
            let next = row.next.iter().map(|n| n.to_string()).collect();
            if delta.insert(row.state.to_string(), next).is_some() {
                return Err(DfaParseError::Syntax {
                    line: *line,
                    message: format!("second row for state `{}`", row.state),
                });
            }
            if row.accept {
                accept.push(row.state.to_string());
            }
        }

        Ok(Dfa {
            label,
            alphabet,
            states,
            accept,
            delta,
        })
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.label)?;

        let mut symbols = " ".repeat(5);
        for c in &self.alphabet {
            symbols.push_str(&format!("{c}   "));
        }
        writeln!(f, "{}", symbols.trim_end())?;

        for state in &self.states {
            let marker = if self.accept.contains(state) { '*' } else { ' ' };
            let mut line = format!("{marker}{state}");
            for c in &self.alphabet {
                line.push_str(&format!(" {:>3}", self.delta(state, *c).unwrap_or_default()));
            }
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}
