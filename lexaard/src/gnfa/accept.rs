use super::{Gnfa, StateId};
use crate::{AcceptSemantics, Expression, MatchError, MatchOptions};

impl Gnfa {
    /// Whether the automaton accepts `input`, using the default [`MatchOptions`].
    pub fn accepts(&self, input: &str) -> Result<bool, MatchError> {
        self.accepts_with(input, &MatchOptions::default())
    }

    /// Searches for a path from start to accept that reads `input`.
    ///
    /// From each state the outgoing edges are tried in declaration order of
    /// their targets, self-loops included. How much an edge reads and when
    /// the accept state accepts is decided by
    /// [`MatchOptions::accept_semantics`].
    ///
    /// The search has no memory of visited states. A loop of edges that
    /// read nothing runs until more than [`MatchOptions::recursion_limit`]
    /// steps in a row have read nothing, which is reported as
    /// [`MatchError::RecursionLimitExceeded`].
    pub fn accepts_with(&self, input: &str, options: &MatchOptions) -> Result<bool, MatchError> {
        self.search(self.start, input, options, 0)
    }

    fn search(
        &self,
        current: StateId,
        input: &str,
        options: &MatchOptions,
        idle: usize,
    ) -> Result<bool, MatchError> {
        if idle > options.recursion_limit() {
            return Err(MatchError::RecursionLimitExceeded(options.recursion_limit()));
        }

        if current == self.accept {
            return Ok(match options.accept_semantics() {
                AcceptSemantics::WholeInput => input.is_empty(),
                AcceptSemantics::AcceptState => true,
            });
        }

        for next in 0..self.states.len() {
            let Some(label) = self.transitions.get(&(current, next)) else {
                continue;
            };

            for rest in read(label, input, options)? {
                log::trace!(
                    "{} -> {} reads {:?}, {:?} left",
                    self.states[current],
                    self.states[next],
                    &input[..input.len() - rest.len()],
                    rest
                );
                let idle = if rest.len() < input.len() { 0 } else { idle + 1 };
                if self.search(next, rest, options, idle)? {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }
}

/// The inputs left after taking an edge labeled `label`.
fn read<'s>(
    label: &Expression,
    input: &'s str,
    options: &MatchOptions,
) -> Result<Vec<&'s str>, MatchError> {
    match options.accept_semantics() {
        AcceptSemantics::WholeInput => label.remainders_with(input, options),
        AcceptSemantics::AcceptState => {
            Ok(label.consume_with(input, options)?.into_iter().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::gnfa::Gnfa;
    use crate::{parse_expression, AcceptSemantics, Expression, MatchError, MatchOptions};

    fn accept_state() -> MatchOptions {
        MatchOptions::default().with_accept_semantics(AcceptSemantics::AcceptState)
    }

    fn a_then_bs() -> Gnfa {
        Gnfa::builder("g")
            .symbols(['a', 'b'])
            .start("s")
            .state("q")
            .accept("f")
            .transition("s", "q", Expression::Char('a'))
            .transition("q", "q", Expression::Char('b'))
            .transition("q", "f", Expression::Char('a'))
            .build()
            .unwrap()
    }

    #[test]
    fn single_edge() {
        let g = Gnfa::builder("g")
            .symbol('a')
            .start("q0")
            .accept("q1")
            .transition("q0", "q1", Expression::Char('a'))
            .build()
            .unwrap();

        assert!(g.accepts("a").unwrap());
        assert!(!g.accepts("b").unwrap());
        assert!(!g.accepts("").unwrap());
        // leftover input at the accept state rejects
        assert!(!g.accepts("aa").unwrap());

        assert!(g.accepts_with("aa", &accept_state()).unwrap());
        assert!(g.accepts_with("a", &accept_state()).unwrap());
        assert!(!g.accepts_with("", &accept_state()).unwrap());
        assert!(!g.accepts_with("ba", &accept_state()).unwrap());
    }

    #[test]
    fn self_loop() {
        let g = a_then_bs();

        assert!(g.accepts("aa").unwrap());
        assert!(g.accepts("abba").unwrap());
        assert!(!g.accepts("ab").unwrap());
        assert!(!g.accepts("abab").unwrap());

        // stops at the first `a` after the loop
        assert!(g.accepts_with("abab", &accept_state()).unwrap());
    }

    #[test]
    fn labels_read_every_prefix_they_match() {
        let g = Gnfa::builder("g")
            .symbol('a')
            .start("s")
            .accept("f")
            .transition("s", "f", parse_expression("(r* a)").unwrap())
            .build()
            .unwrap();

        for input in ["", "a", "aa", "aaa"] {
            assert!(g.accepts(input).unwrap(), "{input}");
        }
        assert!(!g.accepts("ab").unwrap());

        // the star reads nothing and the accept state is reached at once
        assert!(g.accepts_with("ab", &accept_state()).unwrap());
    }

    #[test]
    fn long_input_through_a_loop() {
        let g = a_then_bs();
        let input = format!("a{}a", "b".repeat(600));

        assert!(g.accepts(&input).unwrap());
        assert!(!g.accepts(&input[..input.len() - 1]).unwrap());
        assert!(g.accepts_with(&input, &accept_state()).unwrap());
    }

    #[test]
    fn branches_are_tried_in_order() {
        let g = Gnfa::builder("g")
            .symbols(['a', 'b'])
            .start("s")
            .state("x")
            .state("y")
            .accept("f")
            .transition("s", "x", Expression::Char('a'))
            .transition("s", "y", Expression::Char('a'))
            .transition("x", "f", Expression::Char('a'))
            .transition("y", "f", Expression::Char('b'))
            .build()
            .unwrap();

        assert!(g.accepts("aa").unwrap());
        assert!(g.accepts("ab").unwrap());
        assert!(!g.accepts("ba").unwrap());
    }

    #[test]
    fn empty_loop_hits_recursion_limit() {
        let g = Gnfa::builder("g")
            .start("s")
            .state("q")
            .accept("f")
            .transition("s", "q", Expression::Empty)
            .transition("q", "q", parse_expression("(r* a)").unwrap())
            .transition("q", "f", Expression::Char('b'))
            .build()
            .unwrap();

        let options = MatchOptions::default().with_recursion_limit(16);
        assert_eq!(
            g.accepts_with("b", &options),
            Err(MatchError::RecursionLimitExceeded(16))
        );
        assert_eq!(
            g.accepts_with("b", &options.with_accept_semantics(AcceptSemantics::AcceptState)),
            Err(MatchError::RecursionLimitExceeded(16))
        );
    }

    #[test]
    fn legacy_star_error_propagates() {
        let g = Gnfa::builder("g")
            .start("s")
            .accept("f")
            .transition("s", "f", parse_expression("(r* a)").unwrap())
            .build()
            .unwrap();

        assert_eq!(
            g.accepts_with("a", &MatchOptions::legacy()),
            Err(MatchError::UnsupportedOperation("kleene star"))
        );
        assert!(g.accepts("aaa").is_ok());
    }
}
