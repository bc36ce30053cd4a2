use crate::{Expression, ParseError};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Token for [`Expression::Empty`].
pub const EMPTY_TOKEN: &str = "r.";
/// Token for [`Expression::Null`].
pub const NULL_TOKEN: &str = "r/";
/// Transition table entry meaning "no transition".
pub const NO_EDGE: &str = "..";

/// A single operand found by [`split_tokens`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// byte offset of the token in the tokenized input
    pub offset: usize,
}

impl Token<'_> {
    pub fn is_no_edge(&self) -> bool {
        self.text == NO_EDGE
    }
}

/// Restricts what [`split_tokens`] accepts outside of parentheses.
///
/// Without an alphabet every token is passed through to be parsed later.
/// With one, a bare token must be a symbol of the alphabet, `r.`, `r/`,
/// or (if `allow_no_edge` is set) `..`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenRules<'a> {
    pub alphabet: Option<&'a BTreeSet<char>>,
    pub allow_no_edge: bool,
}

impl TokenRules<'_> {
    fn check(&self, text: &str, offset: usize) -> Result<(), ParseError> {
        let Some(alphabet) = self.alphabet else {
            return Ok(());
        };

        let known = match text {
            EMPTY_TOKEN | NULL_TOKEN => true,
            NO_EDGE => self.allow_no_edge,
            _ => {
                let mut chars = text.chars();
                matches!((chars.next(), chars.next()), (Some(c), None) if alphabet.contains(&c))
            }
        };

        if known {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                token: text.to_string(),
                offset,
            })
        }
    }
}

/// Splits a list of operands on whitespace at nesting depth 0.
///
/// A token starting with `(` runs to its matching `)`. Any other token is a
/// single character, or two characters when the second one is `.` or `/`
/// (`r.`, `r/`, `..`). Tokens need not be separated when one of them is
/// parenthesized or a single character, so `ab` is two tokens.
pub fn split_tokens<'a>(input: &'a str, rules: TokenRules<'_>) -> Result<Vec<Token<'a>>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((open, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        if c == '(' {
            let mut depth = 1usize;
            let mut close = None;
            for (i, c) in chars.by_ref() {
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            close = Some(i);
                            break;
                        }
                    }
                    _ => {}
                }
            }

            let close = close.ok_or(ParseError::Unbalanced { offset: open })?;
            tokens.push(Token {
                text: &input[open..=close],
                offset: open,
            });
            continue;
        }

        let text = match chars.peek() {
            Some(&(i, second @ ('.' | '/'))) => {
                chars.next();
                &input[open..i + second.len_utf8()]
            }
            _ => &input[open..open + c.len_utf8()],
        };
        rules.check(text, open)?;
        tokens.push(Token { text, offset: open });
    }

    Ok(tokens)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte index of the parenthesis closing the one at index 0.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_simple(text: &str, offset: usize) -> Result<Expression, ParseError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if is_word_char(c) => Ok(Expression::Char(c)),
        _ if text == EMPTY_TOKEN => Ok(Expression::Empty),
        _ if text == NULL_TOKEN => Ok(Expression::Null),
        _ => Err(ParseError::UnexpectedToken {
            token: text.to_string(),
            offset,
        }),
    }
}

#[derive(Clone, Copy)]
struct Parser {
    /// replace malformed operands by [`Expression::Error`] instead of failing
    lenient: bool,
}

impl Parser {
    fn expression(self, raw: &str, offset: usize) -> Result<Expression, ParseError> {
        let text = raw.trim_start();
        let offset = offset + (raw.len() - text.len());
        let text = text.trim_end();

        match text.chars().next() {
            None => Err(ParseError::Empty),
            Some('(') => self.compound(text, offset),
            Some(_) => parse_simple(text, offset),
        }
    }

    fn operand(self, token: Token<'_>, offset: usize) -> Result<Expression, ParseError> {
        match self.expression(token.text, offset + token.offset) {
            Err(_) if self.lenient => Ok(Expression::Error),
            result => result,
        }
    }

    // (r<op> operand operand ... )
    fn compound(self, text: &str, offset: usize) -> Result<Expression, ParseError> {
        let close = matching_paren(text).ok_or(ParseError::Unbalanced { offset })?;
        if close + 1 != text.len() {
            return Err(ParseError::TrailingInput {
                offset: offset + close + 1,
            });
        }

        let body = &text[1..close];
        let header = body.trim_start();
        let header_offset = offset + 1 + (body.len() - header.len());

        let mut chars = header.chars();
        if chars.next() != Some('r') {
            return Err(ParseError::UnexpectedToken {
                token: header.split_whitespace().next().unwrap_or(")").to_string(),
                offset: header_offset,
            });
        }
        let operator = chars.next().ok_or(ParseError::MissingOperator {
            offset: header_offset + 1,
        })?;
        if !matches!(operator, '|' | '.' | '*') {
            return Err(ParseError::UnknownOperator {
                operator,
                offset: header_offset + 1,
            });
        }

        let operands_offset = header_offset + 1 + operator.len_utf8();
        let operands = &header[1 + operator.len_utf8()..];
        let mut children = split_tokens(operands, TokenRules::default())?
            .into_iter()
            .map(|token| self.operand(token, operands_offset))
            .collect::<Result<Vec<_>, _>>()?;

        if children.is_empty() {
            return Err(ParseError::MissingOperands { offset });
        }

        match operator {
            '|' => Ok(Expression::Union(children)),
            '.' => Ok(Expression::Concat(children)),
            _ => match (children.pop(), children.len()) {
                (Some(inner), 0) => Ok(Expression::star(inner)),
                _ => Err(ParseError::StarArity {
                    found: children.len() + 1,
                    offset,
                }),
            },
        }
    }
}

pub(crate) fn parse_strict(input: &str) -> Result<Expression, ParseError> {
    Parser { lenient: false }.expression(input, 0)
}

impl Expression {
    /// Parses like [`parse_expression`](crate::parse_expression), but never fails:
    /// every operand that can't be parsed becomes an [`Expression::Error`] in place,
    /// and if the expression as a whole is malformed the result is just
    /// [`Expression::Error`].
    pub fn parse_lenient(input: impl AsRef<str>) -> Expression {
        Parser { lenient: true }
            .expression(input.as_ref(), 0)
            .unwrap_or(Expression::Error)
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_strict(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_expression;
    use pretty_assertions::assert_eq;

    fn texts<'a>(input: &'a str, rules: TokenRules<'_>) -> Vec<&'a str> {
        split_tokens(input, rules)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn simple() {
        assert_eq!(parse_expression("a").unwrap(), Expression::Char('a'));
        assert_eq!(parse_expression("7").unwrap(), Expression::Char('7'));
        assert_eq!(parse_expression("_").unwrap(), Expression::Char('_'));
        assert_eq!(parse_expression("r").unwrap(), Expression::Char('r'));
        assert_eq!(parse_expression("r.").unwrap(), Expression::Empty);
        assert_eq!(parse_expression("r/").unwrap(), Expression::Null);
        assert_eq!(parse_expression("  a ").unwrap(), Expression::Char('a'));
    }

    #[test]
    fn compound() {
        assert_eq!(
            parse_expression("(r| a b )").unwrap(),
            Expression::Union(vec![Expression::Char('a'), Expression::Char('b')])
        );
        assert_eq!(
            parse_expression("(r. a b )").unwrap(),
            Expression::Concat(vec![Expression::Char('a'), Expression::Char('b')])
        );
        assert_eq!(
            parse_expression("(r* a)").unwrap(),
            Expression::star(Expression::Char('a'))
        );
        assert_eq!(
            parse_expression("( r. (r| a r. ) (r* (r. b c )) r/ )").unwrap(),
            Expression::concat([
                Expression::union(['a'.into(), Expression::Empty]),
                Expression::star(Expression::concat(['b'.into(), 'c'.into()])),
                Expression::Null,
            ])
        );
        // operands need no separating whitespace
        assert_eq!(
            parse_expression("(r.ab(r|cd))").unwrap(),
            Expression::concat([
                'a'.into(),
                'b'.into(),
                Expression::union(['c'.into(), 'd'.into()]),
            ])
        );
    }

    #[test]
    fn errors() {
        assert_eq!(parse_expression(""), Err(ParseError::Empty));
        assert_eq!(parse_expression("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_expression("ab"),
            Err(ParseError::UnexpectedToken {
                token: "ab".into(),
                offset: 0
            })
        );
        assert_eq!(
            parse_expression("(r+ a b )"),
            Err(ParseError::UnknownOperator {
                operator: '+',
                offset: 2
            })
        );
        assert_eq!(
            parse_expression("(r| a b"),
            Err(ParseError::Unbalanced { offset: 0 })
        );
        assert_eq!(
            parse_expression("(r| a (r. b )"),
            Err(ParseError::Unbalanced { offset: 0 })
        );
        assert_eq!(
            parse_expression("(r| a ) b"),
            Err(ParseError::TrailingInput { offset: 7 })
        );
        assert_eq!(
            parse_expression("(r| )"),
            Err(ParseError::MissingOperands { offset: 0 })
        );
        assert_eq!(
            parse_expression("(r* a b)"),
            Err(ParseError::StarArity {
                found: 2,
                offset: 0
            })
        );
        assert_eq!(
            parse_expression("(a b)"),
            Err(ParseError::UnexpectedToken {
                token: "a".into(),
                offset: 1
            })
        );
        assert_eq!(
            parse_expression("(r)"),
            Err(ParseError::MissingOperator { offset: 2 })
        );
        assert_eq!(
            parse_expression("(r| a x. )"),
            Err(ParseError::UnexpectedToken {
                token: "x.".into(),
                offset: 6
            })
        );
        assert!("(r| a + )".parse::<Expression>().is_err());
    }

    #[test]
    fn lenient() {
        assert_eq!(
            Expression::parse_lenient("(r| a b )"),
            parse_expression("(r| a b )").unwrap()
        );
        assert_eq!(Expression::parse_lenient("hello"), Expression::Error);
        assert_eq!(Expression::parse_lenient(""), Expression::Error);
        assert_eq!(
            Expression::parse_lenient("(r| a + (r. b x. ) )"),
            Expression::union([
                'a'.into(),
                Expression::Error,
                Expression::concat(['b'.into(), Expression::Error]),
            ])
        );
        assert_eq!(Expression::parse_lenient("(r+ a )"), Expression::Error);
    }

    #[test]
    fn tokens() {
        assert_eq!(
            texts(" a (r| b (r. c d ) ) r. r/ ", TokenRules::default()),
            vec!["a", "(r| b (r. c d ) )", "r.", "r/"]
        );
        assert_eq!(texts("ab", TokenRules::default()), vec!["a", "b"]);

        let offsets: Vec<_> = split_tokens("a  (r* b)", TokenRules::default())
            .unwrap()
            .into_iter()
            .map(|t| t.offset)
            .collect();
        assert_eq!(offsets, vec![0, 3]);
    }

    #[test]
    fn tokens_with_alphabet() {
        let alphabet: BTreeSet<char> = "ab".chars().collect();
        let rules = TokenRules {
            alphabet: Some(&alphabet),
            allow_no_edge: true,
        };

        let tokens = split_tokens(".. a (r* b) r.", rules).unwrap();
        assert!(tokens[0].is_no_edge());
        assert_eq!(
            tokens.iter().map(|t| t.text).collect::<Vec<_>>(),
            vec!["..", "a", "(r* b)", "r."]
        );

        assert_eq!(
            split_tokens("a c", rules),
            Err(ParseError::UnexpectedToken {
                token: "c".into(),
                offset: 2
            })
        );
        assert!(split_tokens("..", TokenRules {
            alphabet: Some(&alphabet),
            allow_no_edge: false,
        })
        .is_err());
        assert_eq!(
            split_tokens("a (r| b", rules),
            Err(ParseError::Unbalanced { offset: 2 })
        );
    }
}
