//! Conversion of automata to expressions by state elimination.

use crate::automaton::FiniteAutomaton;
use crate::gnfa::{Gnfa, GnfaError};
use crate::Expression;
use itertools::Itertools;
use std::collections::HashMap;

/// The name given to GNFAs made by [`lift_automaton`].
pub const LIFTED_NAME: &str = "lifted";

/// Iterator over the GNFAs produced by removing one state at a time.
/// Created by [`eliminations`].
#[derive(Debug, Clone)]
pub struct Eliminations {
    current: Gnfa,
}

impl Iterator for Eliminations {
    type Item = Gnfa;

    fn next(&mut self) -> Option<Self::Item> {
        let rip = self.current.rippable()?;
        log::debug!(
            "ripping {} out of [{}]",
            self.current.states()[rip],
            self.current.states().iter().join(", ")
        );

        let next = self.current.eliminate(rip);
        self.current = next.clone();
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.current.state_count().saturating_sub(2);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Eliminations {}

/// Every intermediate GNFA on the way from `gnfa` to a two-state GNFA.
///
/// Each step removes the first declared state that is neither start nor
/// accept, so there are exactly `gnfa.state_count() - 2` of them and the last
/// one has only the start and accept states left.
pub fn eliminations(gnfa: &Gnfa) -> Eliminations {
    Eliminations {
        current: gnfa.clone(),
    }
}

fn start_to_accept(gnfa: &Gnfa) -> Expression {
    gnfa.transition(gnfa.start(), gnfa.accept())
        .cloned()
        .unwrap_or(Expression::Null)
}

/// An expression for the language of `gnfa`.
///
/// `gnfa` should have no edges into its start state and none out of its
/// accept state (see [`Gnfa::is_well_formed`]). Otherwise the result may
/// describe a different language, and a warning is logged.
pub fn reduce_to_expression(gnfa: &Gnfa) -> Expression {
    if !gnfa.is_well_formed() {
        log::warn!(
            "GNFA {} has edges into its start or out of its accept state",
            gnfa.name()
        );
    }

    match eliminations(gnfa).last() {
        Some(reduced) => start_to_accept(&reduced),
        None => start_to_accept(gnfa),
    }
}

/// Two names `q<n>` not used by `states`, counting up from the number of states.
fn fresh_names(states: &[String]) -> (String, String) {
    let mut n = states.len();
    let mut next = || loop {
        let name = format!("q{n}");
        n += 1;
        if !states.contains(&name) {
            return name;
        }
    };
    (next(), next())
}

/// Turns a deterministic automaton into an equivalent GNFA.
///
/// The GNFA has all the automaton's states plus a fresh start state with an
/// empty-string edge to the old start, and a fresh accept state with an
/// empty-string edge from every old accept state. Symbols leading from the
/// same state to the same next state share one edge labeled with their union.
pub fn lift_automaton<A: FiniteAutomaton + ?Sized>(automaton: &A) -> Result<Gnfa, GnfaError> {
    let (start, accept) = fresh_names(automaton.states());
    log::info!(
        "lifting {} states into a GNFA from {start} to {accept}",
        automaton.states().len()
    );

    let mut builder = Gnfa::builder(LIFTED_NAME)
        .symbols(automaton.alphabet().iter().copied())
        .start(start.clone());
    for state in automaton.states() {
        builder = builder.state(state.as_str());
    }
    builder = builder
        .accept(accept.clone())
        .transition(start, automaton.starting_state(), Expression::Empty);
    for state in automaton.accept_states() {
        builder = builder.transition(state.as_str(), accept.as_str(), Expression::Empty);
    }

    let mut edges: HashMap<(&str, &str), Vec<Expression>> = HashMap::new();
    for state in automaton.states() {
        for &symbol in automaton.alphabet() {
            if let Some(next) = automaton.delta(state, symbol) {
                edges
                    .entry((state.as_str(), next))
                    .or_default()
                    .push(Expression::Char(symbol));
            }
        }
    }
    for ((from, to), mut symbols) in edges {
        let label = match symbols.len() {
            1 => symbols.remove(0),
            _ => Expression::Union(symbols),
        };
        builder = builder.transition(from, to, label);
    }

    builder.build()
}

/// An expression for the language of `automaton`: [`lift_automaton`]
/// followed by [`reduce_to_expression`].
pub fn automaton_to_expression<A: FiniteAutomaton + ?Sized>(
    automaton: &A,
) -> Result<Expression, GnfaError> {
    Ok(reduce_to_expression(&lift_automaton(automaton)?))
}
