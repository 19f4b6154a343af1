use crate::ast::SearchToken;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{eof, map, peek, value},
    sequence::{delimited, preceded, terminated},
    IResult,
};

#[derive(Debug, Clone, PartialEq)]
enum Lexeme<'a> {
    And,
    Or,
    Not,
    Term(&'a str),
}

/// `AND` / `OR` only count as whole words.
fn keyword(i: &str) -> IResult<&str, Lexeme<'_>> {
    terminated(
        alt((
            value(Lexeme::And, tag_no_case("and")),
            value(Lexeme::Or, tag_no_case("or")),
        )),
        peek(alt((multispace1, eof))),
    )(i)
}

fn not_equal(i: &str) -> IResult<&str, Lexeme<'_>> {
    value(Lexeme::Not, tag("!="))(i)
}

pub fn quoted_term(i: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
    ))(i)
}

pub fn bare_term(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(i)
}

fn lexeme(i: &str) -> IResult<&str, Lexeme<'_>> {
    preceded(
        multispace0,
        alt((
            keyword,
            not_equal,
            map(quoted_term, Lexeme::Term),
            map(bare_term, Lexeme::Term),
        )),
    )(i)
}

/// Splits a column's raw search string into tokens.
///
/// # Syntax
///
/// - `*` or `%` alone: match everything
/// - `AND` / `OR` (any case): operator for the following term
/// - `!=`: the following term is excluded
/// - `"..."` or `'...'`: a quoted term, `""` means "empty"
/// - anything else up to whitespace: a term
///
/// Every term is split again on whitespace, so quoting only keeps a word from
/// being read as `AND`, `OR` or `!=`.
///
/// # Examples
///
/// ```
/// use pg_table_browser::{tokenize_search, SearchToken};
///
/// assert_eq!(tokenize_search("*"), vec![SearchToken::All]);
/// assert_eq!(
///     tokenize_search("berlin OR !=munich"),
///     vec![
///         SearchToken::include("berlin"),
///         SearchToken::Or,
///         SearchToken::exclude("munich"),
///     ]
/// );
/// assert!(tokenize_search("   ").is_empty());
/// ```
pub fn tokenize_search(input: &str) -> Vec<SearchToken> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed == "*" || trimmed == "%" {
        return vec![SearchToken::All];
    }

    let mut tokens = Vec::new();
    let mut exclude_next = false;
    let mut rest = trimmed;

    while !rest.is_empty() {
        let (next, lex) = match lexeme(rest) {
            Ok(parsed) => parsed,
            Err(_) => break,
        };
        rest = next;

        match lex {
            Lexeme::And => tokens.push(SearchToken::And),
            Lexeme::Or => tokens.push(SearchToken::Or),
            Lexeme::Not => exclude_next = true,
            Lexeme::Term(term) => {
                push_term(&mut tokens, term, exclude_next);
                exclude_next = false;
            }
        }
    }

    tokens
}

fn push_term(tokens: &mut Vec<SearchToken>, term: &str, exclude: bool) {
    let make = |value: &str| {
        if exclude {
            SearchToken::exclude(value)
        } else {
            SearchToken::include(value)
        }
    };

    let mut parts = term.split_whitespace().peekable();
    if parts.peek().is_none() {
        tokens.push(make(""));
        return;
    }
    for part in parts {
        tokens.push(make(part));
    }
}
