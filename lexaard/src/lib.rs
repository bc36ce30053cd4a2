#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub use lexaard_regular_expressions::*;

/// Parse an expression at compile time.
///
/// ```rust
/// use lexaard::{expression, Expression};
///
/// let e = expression!("(r| a (r* b) )");
/// assert_eq!(e, Expression::union(['a'.into(), Expression::star('b'.into())]));
/// assert!(e.matches("bb").unwrap());
/// ```
///
/// A literal that doesn't parse is a compile error:
///
/// ```compile_fail
/// let e = lexaard::expression!("(r+ a b )");
/// ```
pub use lexaard_macros::expression;

pub mod automaton;
pub use automaton::{Dfa, DfaParseError, FiniteAutomaton};

pub mod convert;

pub mod gnfa;
pub use gnfa::{Gnfa, GnfaBuilder, GnfaError, GnfaParseError};

#[cfg(feature = "dot")]
mod render;
#[cfg(feature = "dot")]
pub use render::RenderSettings;
