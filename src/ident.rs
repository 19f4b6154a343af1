//! Identifier validation and quoting.
//!
//! Table and column names cannot be bound as parameters, so every name that is
//! interpolated into SQL text goes through [`sanitize_identifier`] or
//! [`quote_identifier`] first. Values never take this path; they are bound.

use crate::error::IdentifierError;
use nom::{
    bytes::complete::take_while,
    character::complete::satisfy,
    combinator::{all_consuming, recognize},
    sequence::pair,
    IResult,
};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn sql_identifier(i: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(is_ident_start), take_while(is_ident_continue)))(i)
}

/// Validates that `name` matches `[A-Za-z_][A-Za-z0-9_]*` and returns it unchanged.
///
/// # Examples
///
/// ```
/// use pg_table_browser::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("customer_id").unwrap(), "customer_id");
/// assert!(sanitize_identifier("1st").is_err());
/// assert!(sanitize_identifier("name; DROP TABLE users").is_err());
/// ```
pub fn sanitize_identifier(name: &str) -> Result<&str, IdentifierError> {
    if name.is_empty() {
        return Err(IdentifierError::Empty);
    }

    match all_consuming(sql_identifier)(name) {
        Ok((_, ident)) => Ok(ident),
        Err(_) => Err(IdentifierError::Invalid(name.to_string())),
    }
}

/// Returns true if `name` would pass [`sanitize_identifier`].
pub fn is_valid_identifier(name: &str) -> bool {
    sanitize_identifier(name).is_ok()
}

/// Validates `name` and wraps it in double quotes.
///
/// ```
/// use pg_table_browser::quote_identifier;
///
/// assert_eq!(quote_identifier("orders").unwrap(), "\"orders\"");
/// ```
pub fn quote_identifier(name: &str) -> Result<String, IdentifierError> {
    let ident = sanitize_identifier(name)?;
    Ok(format!("\"{}\"", ident))
}

/// Validates both parts and renders `"table"."column"`.
pub fn qualify(table: &str, column: &str) -> Result<String, IdentifierError> {
    Ok(format!(
        "{}.{}",
        quote_identifier(table)?,
        quote_identifier(column)?
    ))
}
