//! Recursive-descent parser for rule declarations.
//!
//! ```text
//! declaration  := '<' ['<'] name '>' ['>'] ':' compound
//! compound     := matcher (('&' ['&'] | '|' ['|']) matcher)*
//! matcher      := digits? ('[' card ']' | '<' ref '>' | '(' compound ')' | '@' fn)
//! fn           := name ('(' arg ')')? '(' matcher* ')'
//! ```
//!
//! Functions: `any`, `all`, `xof(N)`, `atleast(N)` and `not`.

use crate::matcher::Matcher;
use crate::parser::cursor::{Cursor, ParseError};
use std::fmt;

const SEPARATORS: &str = "[]<>()";
const WHITE: &str = " \t";
const DIGITS: &str = "0123456789";

/// A named matcher from one declaration line.
///
/// Criteria (`<<name>>`) are the outcomes a simulation reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMatcher {
    pub name: String,
    pub criteria: bool,
    pub matcher: Matcher,
}

impl fmt::Display for DeclaredMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.criteria {
            write!(f, "<<{}>>: {}", self.name, self.matcher)
        } else {
            write!(f, "<{}>: {}", self.name, self.matcher)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

impl Operator {
    fn symbol(self) -> char {
        match self {
            Operator::And => '&',
            Operator::Or => '|',
        }
    }
}

/// Parse one declaration line such as `<<keep>>: 2[forest] & <spell>`
pub fn parse_declaration(line: &str) -> Result<DeclaredMatcher, ParseError> {
    let mut cursor = Cursor::new(line);

    if !cursor.consume('<', WHITE) {
        return Err(cursor.fail("'<' expected to open a matcher name declaration"));
    }
    let criteria = cursor.consume('<', "");
    let name = cursor.read_until(SEPARATORS).trim().to_string();
    if name.is_empty() {
        return Err(cursor.fail("matcher name should not be empty"));
    }
    if !cursor.consume('>', WHITE) {
        return Err(cursor.fail("'>' expected to close a matcher name declaration"));
    }
    if criteria && !cursor.consume('>', WHITE) {
        return Err(cursor.fail("'>>' expected to close a criteria name declaration"));
    }
    if !cursor.consume(':', WHITE) {
        return Err(cursor.fail("':' expected after matcher name declaration"));
    }

    let matcher = parse_compound(&mut cursor)?;
    cursor.skip(WHITE);
    if !cursor.at_end() {
        return Err(cursor.fail("unexpected character after matcher declaration"));
    }

    Ok(DeclaredMatcher {
        name,
        criteria,
        matcher,
    })
}

fn parse_matcher(cursor: &mut Cursor) -> Result<Matcher, ParseError> {
    cursor.skip(WHITE);
    let digits = cursor.read_while(DIGITS);
    let times = if digits.is_empty() {
        1
    } else {
        match digits.parse::<usize>() {
            Ok(times) => times,
            Err(_) => return Err(cursor.fail("repetition count is too large")),
        }
    };

    let matcher = if cursor.consume('[', WHITE) {
        let card = cursor.read_until(SEPARATORS);
        if card.trim().is_empty() {
            return Err(cursor.fail("card name should not be empty"));
        }
        if !cursor.consume(']', WHITE) {
            return Err(cursor.fail("']' expected to close a card matcher"));
        }
        Matcher::card(&card)
    } else if cursor.consume('<', WHITE) {
        let name = cursor.read_until(SEPARATORS);
        if name.trim().is_empty() {
            return Err(cursor.fail("matcher reference should not be empty"));
        }
        if !cursor.consume('>', WHITE) {
            return Err(cursor.fail("'>' expected to close a matcher reference"));
        }
        Matcher::reference(&name)
    } else if cursor.consume('(', WHITE) {
        let compound = parse_compound(cursor)?;
        if !cursor.consume(')', WHITE) {
            return Err(cursor.fail("')' expected to close a compound matcher"));
        }
        compound
    } else if cursor.consume('@', WHITE) {
        parse_fn(cursor)?
    } else {
        return Err(cursor.fail("either '[', '<', '(' or '@' expected to declare a matcher"));
    };
    cursor.skip(WHITE);

    Ok(Matcher::times(times, matcher))
}

fn parse_compound(cursor: &mut Cursor) -> Result<Matcher, ParseError> {
    let mut matchers = Vec::new();
    let mut operator = None;

    while !cursor.at_end() && cursor.current() != Some(')') {
        match (matchers.len(), operator) {
            (0, _) => {}
            (1, _) => {
                if cursor.consume('&', WHITE) {
                    cursor.consume('&', "");
                    operator = Some(Operator::And);
                } else if cursor.consume('|', WHITE) {
                    cursor.consume('|', "");
                    operator = Some(Operator::Or);
                } else {
                    return Err(cursor.fail("either '&' or '|' expected to assemble several matchers"));
                }
            }
            (_, Some(op)) => {
                if !cursor.consume(op.symbol(), WHITE) {
                    return Err(cursor.fail(format!("'{}' expected", op.symbol())));
                }
                cursor.consume(op.symbol(), "");
            }
            (_, None) => unreachable!("operator is chosen after the first matcher"),
        }
        matchers.push(parse_matcher(cursor)?);
    }

    if matchers.is_empty() {
        return Err(cursor.fail("you should declare at least one matcher"));
    }

    Ok(match operator {
        Some(Operator::And) => Matcher::and(matchers),
        Some(Operator::Or) => Matcher::or(matchers),
        None => Matcher::and(matchers),
    })
}

fn parse_fn(cursor: &mut Cursor) -> Result<Matcher, ParseError> {
    let name = cursor.read_until(SEPARATORS).trim().to_string();
    if name.is_empty() {
        return Err(cursor.fail("function name should not be empty"));
    }

    match name.as_str() {
        "any" | "all" => {
            let matchers = parse_matcher_list(cursor)?;
            if matchers.is_empty() {
                return Err(cursor.fail("you shall provide at least one matcher"));
            }
            Ok(if name == "any" {
                Matcher::or(matchers)
            } else {
                Matcher::and(matchers)
            })
        }
        "xof" | "atleast" => {
            let arg = parse_fn_arg(cursor)?;
            let arg = arg.trim();
            if arg.starts_with('-') {
                return Err(cursor.fail("1st arg must be a positive integer"));
            }
            let count: usize = match arg.parse() {
                Ok(count) => count,
                Err(_) => return Err(cursor.fail("1st arg must be a valid integer")),
            };
            let matchers = parse_matcher_list(cursor)?;
            match Matcher::at_least(count, matchers) {
                Some(matcher) => Ok(matcher),
                None => Err(cursor.fail("1st arg cannot exceed matchers size")),
            }
        }
        "not" => {
            let mut matchers = parse_matcher_list(cursor)?;
            if matchers.len() != 1 {
                return Err(cursor.fail("@not expects exactly one matcher"));
            }
            Ok(Matcher::not(matchers.remove(0)))
        }
        _ => Err(cursor.fail(format!("unknown function @{}", name))),
    }
}

fn parse_matcher_list(cursor: &mut Cursor) -> Result<Vec<Matcher>, ParseError> {
    if !cursor.consume('(', WHITE) {
        return Err(cursor.fail("'(' expected (matchers list)"));
    }
    let mut matchers = Vec::new();
    while !cursor.consume(')', WHITE) {
        if cursor.at_end() {
            return Err(cursor.fail("')' expected to close matchers list"));
        }
        matchers.push(parse_matcher(cursor)?);
    }
    Ok(matchers)
}

fn parse_fn_arg(cursor: &mut Cursor) -> Result<String, ParseError> {
    if !cursor.consume('(', WHITE) {
        return Err(cursor.fail("'(' expected (open function arg)"));
    }
    let arg = cursor.read_until(SEPARATORS);
    if !cursor.consume(')', WHITE) {
        return Err(cursor.fail("')' expected (close function arg)"));
    }
    Ok(arg)
}
