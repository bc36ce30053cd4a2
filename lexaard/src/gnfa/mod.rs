//! Generalized nondeterministic finite automata.
//!
//! A [`Gnfa`] is a graph of named states whose edges carry whole
//! [`Expression`]s instead of single symbols. It has exactly one start and one
//! accept state, and it is the intermediate form used when converting an
//! automaton to an expression (see [`crate::convert`]).

use crate::Expression;
use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use thiserror::Error;

mod accept;
mod parse;

pub use parse::GnfaParseError;

/// Index of a state in [`Gnfa::states`].
pub type StateId = usize;

/// Reasons a [`Gnfa`] can't be built, or a state can't be removed from one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum GnfaError {
    #[error("no start state was given")]
    MissingStart,
    #[error("no accept state was given")]
    MissingAccept,
    #[error("state `{0}` can't be both the start and the accept state")]
    StartIsAccept(String),
    /// An edge or a call refers to a state that isn't part of the automaton.
    #[error("state `{0}` was never declared")]
    UnknownState(String),
    #[error("state `{0}` is the start or accept state and can't be ripped")]
    NotRippable(String),
}

/// A generalized nondeterministic finite automaton.
///
/// Instances are immutable. Removing a state with [`Gnfa::rip`] produces a new
/// automaton.
#[derive(Debug, Clone)]
pub struct Gnfa {
    name: String,
    alphabet: BTreeSet<char>,
    states: Vec<String>,
    start: StateId,
    accept: StateId,
    /// a missing entry means there is no edge, like [`Expression::Null`]
    transitions: HashMap<(StateId, StateId), Expression>,
}

impl Gnfa {
    /// Start building a GNFA called `name`.
    pub fn builder(name: impl Into<String>) -> GnfaBuilder {
        GnfaBuilder {
            name: name.into(),
            alphabet: BTreeSet::new(),
            states: Vec::new(),
            start: None,
            accept: None,
            transitions: Vec::new(),
        }
    }

    /// The name of this automaton, the first line of its text form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The symbols this automaton reads.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// All states, in declaration order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Number of states, including start and accept.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The name of the start state.
    pub fn start(&self) -> &str {
        &self.states[self.start]
    }

    /// The name of the accept state.
    pub fn accept(&self) -> &str {
        &self.states[self.accept]
    }

    fn id(&self, state: &str) -> Option<StateId> {
        self.states.iter().position(|s| s == state)
    }

    /// The label of the edge from `from` to `to`, if there is one.
    pub fn transition(&self, from: &str, to: &str) -> Option<&Expression> {
        let from = self.id(from)?;
        let to = self.id(to)?;
        self.transitions.get(&(from, to))
    }

    /// Every edge as `(from, to, label)`, in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str, &Expression)> {
        self.transitions.iter().map(|(&(from, to), label)| {
            (self.states[from].as_str(), self.states[to].as_str(), label)
        })
    }

    /// The label from `from` to `to`, [`Expression::Null`] when there's no edge.
    pub(crate) fn label(&self, from: StateId, to: StateId) -> Expression {
        self.transitions
            .get(&(from, to))
            .cloned()
            .unwrap_or(Expression::Null)
    }

    /// Whether no edge enters the start state and none leaves the accept state.
    ///
    /// Edges labeled [`Expression::Null`] don't count. Removing states from an
    /// automaton that is not well-formed does not preserve its language.
    pub fn is_well_formed(&self) -> bool {
        self.transitions.iter().all(|(&(from, to), label)| {
            *label == Expression::Null || (to != self.start && from != self.accept)
        })
    }

    /// Removes `state`, rerouting every path through it so the language stays
    /// the same.
    pub fn rip(&self, state: &str) -> Result<Gnfa, GnfaError> {
        let id = self
            .id(state)
            .ok_or_else(|| GnfaError::UnknownState(state.to_string()))?;

        if id == self.start || id == self.accept {
            return Err(GnfaError::NotRippable(state.to_string()));
        }

        Ok(self.eliminate(id))
    }

    /// The first declared state that is neither start nor accept.
    pub(crate) fn rippable(&self) -> Option<StateId> {
        (0..self.states.len()).find(|&s| s != self.start && s != self.accept)
    }

    /// For every pair `(i, j)` of remaining states with `i` not the accept
    /// state and `j` not the start state, the new label is
    /// `(i, rip) (rip, rip)* (rip, j) | (i, j)`.
    pub(crate) fn eliminate(&self, rip: StateId) -> Gnfa {
        let remaining: Vec<StateId> = (0..self.states.len()).filter(|&s| s != rip).collect();
        let reindex = |s: StateId| if s > rip { s - 1 } else { s };
        let around = Expression::star(self.label(rip, rip));

        let mut transitions = HashMap::new();
        for &from in &remaining {
            if from == self.accept {
                continue;
            }
            for &to in &remaining {
                if to == self.start {
                    continue;
                }

                let through = Expression::concat([
                    self.label(from, rip),
                    around.clone(),
                    self.label(rip, to),
                ]);
                transitions.insert(
                    (reindex(from), reindex(to)),
                    Expression::union([through, self.label(from, to)]),
                );
            }
        }

        Gnfa {
            name: self.name.clone(),
            alphabet: self.alphabet.clone(),
            states: remaining.iter().map(|&s| self.states[s].clone()).collect(),
            start: reindex(self.start),
            accept: reindex(self.accept),
            transitions,
        }
    }

    /// States in table order: start, then the others alphabetically, then accept.
    fn display_order(&self) -> Vec<StateId> {
        let mut middle: Vec<StateId> = (0..self.states.len())
            .filter(|&s| s != self.start && s != self.accept)
            .collect();
        middle.sort_by(|&a, &b| self.states[a].cmp(&self.states[b]));

        let mut order = Vec::with_capacity(self.states.len());
        order.push(self.start);
        order.extend(middle);
        order.push(self.accept);
        order
    }
}

/// Collects the parts of a [`Gnfa`]. Created by [`Gnfa::builder`].
#[derive(Debug, Clone)]
pub struct GnfaBuilder {
    name: String,
    alphabet: BTreeSet<char>,
    states: Vec<String>,
    start: Option<String>,
    accept: Option<String>,
    transitions: Vec<(String, String, Expression)>,
}

impl GnfaBuilder {
    /// Adds a symbol to the alphabet.
    pub fn symbol(mut self, symbol: char) -> Self {
        self.alphabet.insert(symbol);
        self
    }

    /// Adds several symbols to the alphabet.
    pub fn symbols(mut self, symbols: impl IntoIterator<Item = char>) -> Self {
        self.alphabet.extend(symbols);
        self
    }

    /// Declares a state. Declaring a state twice has no effect.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.declare(state.into());
        self
    }

    /// Declares `state` and makes it the start state.
    pub fn start(mut self, state: impl Into<String>) -> Self {
        let state = state.into();
        self.declare(state.clone());
        self.start = Some(state);
        self
    }

    /// Declares `state` and makes it the accept state.
    pub fn accept(mut self, state: impl Into<String>) -> Self {
        let state = state.into();
        self.declare(state.clone());
        self.accept = Some(state);
        self
    }

    /// Adds an edge. A later edge between the same states replaces an earlier one.
    pub fn transition(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        label: Expression,
    ) -> Self {
        self.transitions.push((from.into(), to.into(), label));
        self
    }

    fn declare(&mut self, state: String) {
        if !self.states.contains(&state) {
            self.states.push(state);
        }
    }

    /// Checks that start and accept are given and distinct, and that every
    /// edge connects declared states.
    pub fn build(self) -> Result<Gnfa, GnfaError> {
        let position = |state: &str| {
            self.states
                .iter()
                .position(|s| s == state)
                .ok_or_else(|| GnfaError::UnknownState(state.to_string()))
        };

        let start = self.start.as_deref().ok_or(GnfaError::MissingStart)?;
        let accept = self.accept.as_deref().ok_or(GnfaError::MissingAccept)?;
        if start == accept {
            return Err(GnfaError::StartIsAccept(start.to_string()));
        }
        let start = position(start)?;
        let accept = position(accept)?;

        let mut transitions = HashMap::new();
        for (from, to, label) in &self.transitions {
            transitions.insert((position(from)?, position(to)?), label.clone());
        }

        Ok(Gnfa {
            name: self.name,
            alphabet: self.alphabet,
            states: self.states,
            start,
            accept,
            transitions,
        })
    }
}

fn write_cells<'a>(
    f: &mut Formatter<'_>,
    label: &str,
    label_width: usize,
    cells: impl Iterator<Item = (&'a str, usize)>,
) -> std::fmt::Result {
    let mut line = format!("{label:<label_width$}");
    for (cell, width) in cells {
        line.push_str(&format!("  {cell:<width$}"));
    }
    writeln!(f, "{}", line.trim_end())
}

impl Display for Gnfa {
    /// The table format read by [`Gnfa::from_str`](std::str::FromStr):
    ///
    /// ```text
    /// name
    /// ab
    ///     s   q0  f
    /// s   ..  a   ..
    /// q0  ..  b   r.
    /// f   ..  ..  ..
    /// ```
    ///
    /// The output parses back to the same edges unless a label contains an
    /// [`Expression::Error`], or nests an alphabet symbol that is not a word
    /// character inside a compound expression, like `(r| + a )`. Only a
    /// lone symbol cell may be such a character.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let order = self.display_order();
        let no_edge = crate::NO_EDGE.to_string();

        let rows: Vec<Vec<String>> = order
            .iter()
            .map(|&from| {
                order
                    .iter()
                    .map(|&to| match self.transitions.get(&(from, to)) {
                        Some(label) => label.to_string(),
                        None => no_edge.clone(),
                    })
                    .collect()
            })
            .collect();

        let label_width = order
            .iter()
            .map(|&s| self.states[s].chars().count())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = order
            .iter()
            .enumerate()
            .map(|(column, &s)| {
                rows.iter()
                    .map(|row| row[column].chars().count())
                    .chain([self.states[s].chars().count()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.alphabet.iter().collect::<String>())?;

        // `{:<width$}` pads by chars, matching the widths above
        write_cells(
            f,
            "",
            label_width,
            order
                .iter()
                .map(|&s| self.states[s].as_str())
                .zip(widths.iter().copied()),
        )?;

        for (&from, row) in order.iter().zip(&rows) {
            write_cells(
                f,
                &self.states[from],
                label_width,
                row.iter().map(String::as_str).zip(widths.iter().copied()),
            )?;
        }

        Ok(())
    }
}
