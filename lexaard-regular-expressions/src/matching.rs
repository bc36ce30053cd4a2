use crate::{Expression, MatchError};
use std::iter;

pub const DEFAULT_RECURSION_LIMIT: usize = 512;

/// How [`Expression::Star`] is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StarSemantics {
    /// Zero or more repetitions of the inner expression.
    #[default]
    Repetition,
    /// Star is not matched at all. Reaching one reports
    /// [`MatchError::UnsupportedOperation`].
    Unsupported,
}

/// How [`Expression::Concat`] splits its input among its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcatSemantics {
    /// Every child but the last takes the shortest prefix it matches, and
    /// that choice is never revisited. This rejects some strings the
    /// concatenation describes, e.g. `(r. (r* a) a )` against `aa`.
    #[default]
    Reluctant,
    /// Try every split point for every child.
    Backtracking,
}

/// When a search through an automaton accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptSemantics {
    /// The accept state has to be reached with no input left. Every edge
    /// tries every prefix its label matches, shortest first.
    #[default]
    WholeInput,
    /// Reaching the accept state accepts, whatever input is left. Every edge
    /// reads only the shortest prefix its label matches.
    AcceptState,
}

/// Settings shared by expression matching and automaton searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    star: StarSemantics,
    concat: ConcatSemantics,
    accept: AcceptSemantics,
    recursion_limit: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            star: StarSemantics::default(),
            concat: ConcatSemantics::default(),
            accept: AcceptSemantics::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl MatchOptions {
    /// Reluctant concatenation, [`StarSemantics::Unsupported`] and
    /// [`AcceptSemantics::AcceptState`]: the behavior of the first Lexaard
    /// matcher.
    pub fn legacy() -> Self {
        Self::default()
            .with_star_semantics(StarSemantics::Unsupported)
            .with_accept_semantics(AcceptSemantics::AcceptState)
    }

    pub fn with_star_semantics(mut self, star: StarSemantics) -> Self {
        self.star = star;
        self
    }

    pub fn with_concat_semantics(mut self, concat: ConcatSemantics) -> Self {
        self.concat = concat;
        self
    }

    pub fn with_accept_semantics(mut self, accept: AcceptSemantics) -> Self {
        self.accept = accept;
        self
    }

    /// Bounds the number of consecutive steps that read no input in
    /// automaton searches using these options. of automaton searches that use these options.
    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }

    pub fn star_semantics(&self) -> StarSemantics {
        self.star
    }

    pub fn concat_semantics(&self) -> ConcatSemantics {
        self.concat
    }

    pub fn accept_semantics(&self) -> AcceptSemantics {
        self.accept
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }
}

/// Every char boundary of `input`, including 0 and `input.len()`.
fn boundaries(input: &str) -> impl Iterator<Item = usize> + '_ {
    input
        .char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(input.len()))
}

impl Expression {
    /// Matches the whole of `input` using the default [`MatchOptions`].
    pub fn matches(&self, input: &str) -> Result<bool, MatchError> {
        self.matches_with(input, &MatchOptions::default())
    }

    /// Matches the whole of `input`, with the star and concatenation
    /// behavior `options` select.
    pub fn matches_with(&self, input: &str, options: &MatchOptions) -> Result<bool, MatchError> {
        match self {
            Expression::Char(c) => {
                let mut chars = input.chars();
                Ok(chars.next() == Some(*c) && chars.next().is_none())
            }
            Expression::Empty => Ok(input.is_empty()),
            Expression::Null | Expression::Error => Ok(false),
            Expression::Union(children) => {
                for child in children {
                    if child.matches_with(input, options)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expression::Concat(children) => match options.concat {
                ConcatSemantics::Reluctant => concat_reluctant(children, input, options),
                ConcatSemantics::Backtracking => concat_backtracking(children, input, options),
            },
            Expression::Star(inner) => match options.star {
                StarSemantics::Repetition => repeat(inner, input, options),
                StarSemantics::Unsupported => Err(MatchError::UnsupportedOperation("kleene star")),
            },
        }
    }

    /// Matches the shortest prefix of `input` it can and returns what is left.
    ///
    /// `Ok(None)` means no prefix matched, which is different from
    /// `Ok(Some(""))`: the whole input was consumed.
    pub fn consume<'s>(&self, input: &'s str) -> Result<Option<&'s str>, MatchError> {
        self.consume_with(input, &MatchOptions::default())
    }

    /// [`consume`](Expression::consume) with explicit options.
    pub fn consume_with<'s>(
        &self,
        input: &'s str,
        options: &MatchOptions,
    ) -> Result<Option<&'s str>, MatchError> {
        for split in boundaries(input) {
            if self.matches_with(&input[..split], options)? {
                return Ok(Some(&input[split..]));
            }
        }
        Ok(None)
    }

    /// What is left of `input` after each prefix the expression matches,
    /// shortest prefix first.
    pub fn remainders_with<'s>(
        &self,
        input: &'s str,
        options: &MatchOptions,
    ) -> Result<Vec<&'s str>, MatchError> {
        let mut remainders = Vec::new();
        for split in boundaries(input) {
            if self.matches_with(&input[..split], options)? {
                remainders.push(&input[split..]);
            }
        }
        Ok(remainders)
    }
}

fn concat_reluctant(
    children: &[Expression],
    input: &str,
    options: &MatchOptions,
) -> Result<bool, MatchError> {
    let Some((last, init)) = children.split_last() else {
        return Ok(input.is_empty());
    };

    let mut rest = input;
    for child in init {
        match child.consume_with(rest, options)? {
            Some(remainder) => rest = remainder,
            None => return Ok(false),
        }
    }
    last.matches_with(rest, options)
}

fn concat_backtracking(
    children: &[Expression],
    input: &str,
    options: &MatchOptions,
) -> Result<bool, MatchError> {
    match children {
        [] => Ok(input.is_empty()),
        [only] => only.matches_with(input, options),
        [first, rest @ ..] => {
            for split in boundaries(input) {
                if first.matches_with(&input[..split], options)?
                    && concat_backtracking(rest, &input[split..], options)?
                {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

// every repetition consumes at least one char, so this terminates
fn repeat(inner: &Expression, input: &str, options: &MatchOptions) -> Result<bool, MatchError> {
    if input.is_empty() {
        return Ok(true);
    }

    for split in boundaries(input).skip(1) {
        if inner.matches_with(&input[..split], options)?
            && repeat(inner, &input[split..], options)?
        {
            return Ok(true);
        }
    }
    Ok(false)
}
