use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Rendering of [`Expression::Error`].
const INVALID: &str = "Invalid Regular Expression";

#[derive(Hash, Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Exactly the one-character string.
    Char(char),
    /// The empty string.
    Empty,
    /// The empty language. Never matches.
    Null,
    Union(Vec<Expression>),
    Concat(Vec<Expression>),
    Star(Box<Expression>),
    /// Stands in for input that could not be parsed. Never matches.
    Error,
}

impl Expression {
    /// Any one of `children`.
    pub fn union(children: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Union(children.into_iter().collect())
    }

    /// `children` one after the other.
    pub fn concat(children: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Concat(children.into_iter().collect())
    }

    /// Zero or more repetitions of `inner`.
    pub fn star(inner: Expression) -> Self {
        Expression::Star(Box::new(inner))
    }

    /// Whether the expression accepts the empty string.
    pub fn is_nullable(&self) -> bool {
        match self {
            Expression::Char(_) => false,
            Expression::Empty => true,
            Expression::Null => false,
            Expression::Union(children) => children.iter().any(Expression::is_nullable),
            Expression::Concat(children) => children.iter().all(Expression::is_nullable),
            Expression::Star(_) => true,
            Expression::Error => false,
        }
    }

    /// false if an [`Expression::Error`] occurs anywhere in the tree
    pub fn is_well_formed(&self) -> bool {
        match self {
            Expression::Error => false,
            Expression::Union(children) | Expression::Concat(children) => {
                children.iter().all(Expression::is_well_formed)
            }
            Expression::Star(inner) => inner.is_well_formed(),
            _ => true,
        }
    }

    pub fn alphabet(&self) -> BTreeSet<char> {
        let mut alphabet = BTreeSet::new();
        self.search_alphabet(&mut alphabet);
        alphabet
    }

    fn search_alphabet(&self, alphabet: &mut BTreeSet<char>) {
        match self {
            Expression::Char(c) => {
                alphabet.insert(*c);
            }
            Expression::Union(children) | Expression::Concat(children) => {
                for child in children {
                    child.search_alphabet(alphabet);
                }
            }
            Expression::Star(inner) => inner.search_alphabet(alphabet),
            Expression::Empty | Expression::Null | Expression::Error => {}
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Expression::Union(children) | Expression::Concat(children) => {
                1 + children.iter().map(Expression::size).sum::<usize>()
            }
            Expression::Star(inner) => 1 + inner.size(),
            _ => 1,
        }
    }
}

impl From<char> for Expression {
    fn from(value: char) -> Self {
        Expression::Char(value)
    }
}

fn write_operands(f: &mut Formatter<'_>, children: &[Expression]) -> std::fmt::Result {
    for child in children {
        write!(f, " {child}")?;
    }
    Ok(())
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Char(c) => write!(f, "{c}"),
            Expression::Empty => write!(f, "r."),
            Expression::Null => write!(f, "r/"),
            Expression::Union(children) => {
                write!(f, "(r|")?;
                write_operands(f, children)?;
                write!(f, " )")
            }
            Expression::Concat(children) => {
                write!(f, "(r.")?;
                write_operands(f, children)?;
                write!(f, " )")
            }
            Expression::Star(inner) => write!(f, "(r* {inner})"),
            Expression::Error => write!(f, "{INVALID}"),
        }
    }
}
