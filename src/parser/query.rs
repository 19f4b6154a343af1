use crate::ast::QueryParams;

/// Splits an already URL-decoded `a=1&b=2` string into [`QueryParams`].
///
/// Pairs without `=` are dropped; repeated keys keep every value.
///
/// ```
/// use pg_table_browser::parse_query_string;
///
/// let params = parse_query_string("name=berlin&sort_column=name&name=!=munich");
/// assert_eq!(params.get_all("name").len(), 2);
/// assert_eq!(params.get("sort_column"), Some("name"));
/// ```
pub fn parse_query_string(query_string: &str) -> QueryParams {
    let pairs = query_string.split('&').filter_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(key), Some(value)) if !key.is_empty() => Some((key, value)),
            _ => None,
        }
    });

    QueryParams::from_pairs(pairs)
}
