use crate::ast::SearchToken;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joiner {
    And,
    Or,
}

impl Joiner {
    fn as_sql(self) -> &'static str {
        match self {
            Joiner::And => " AND ",
            Joiner::Or => " OR ",
        }
    }
}

/// SQL fragment for one column plus the values it binds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Boolean expression, empty when the tokens constrain nothing.
    pub sql: String,
    pub params: Vec<serde_json::Value>,
    /// First placeholder number not used by this condition.
    pub next_index: usize,
}

impl Condition {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Turns `*` wildcards into `%` and wraps the term for a substring match.
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", term.replace('*', "%"))
}

/// Builds the WHERE fragment for one column from its search tokens.
///
/// `column_expr` must already be a validated, quoted expression.
/// Placeholders are numbered from `start_index` (1-based).
///
/// An `AND`/`OR` token applies to the next term only; afterwards the
/// joiner falls back to `AND`.
///
/// # Examples
///
/// ```
/// use pg_table_browser::{build_condition, tokenize_search};
///
/// let cond = build_condition("\"name\"", &tokenize_search("k*rhu"), 1);
/// assert_eq!(cond.sql, "\"name\"::text ILIKE $1");
/// assert_eq!(cond.params, vec![serde_json::json!("%k%rhu%")]);
/// assert_eq!(cond.next_index, 2);
/// ```
pub fn build_condition(column_expr: &str, tokens: &[SearchToken], start_index: usize) -> Condition {
    build_column_condition(column_expr, true, tokens, start_index)
}

/// Like [`build_condition`] for a column that may not be text.
///
/// When `is_text` is false the empty-value checks compare `column_expr::text`,
/// so `''` is never compared against an integer, uuid or date.
///
/// ```
/// use pg_table_browser::sql::build_column_condition;
/// use pg_table_browser::tokenize_search;
///
/// let cond = build_column_condition("\"id\"", false, &tokenize_search(r#""""#), 1);
/// assert_eq!(cond.sql, "(\"id\"::text IS NULL OR \"id\"::text = '')");
/// ```
pub fn build_column_condition(
    column_expr: &str,
    is_text: bool,
    tokens: &[SearchToken],
    start_index: usize,
) -> Condition {
    let text_expr = if is_text {
        column_expr.to_string()
    } else {
        format!("{}::text", column_expr)
    };
    let mut terms: Vec<(Joiner, String)> = Vec::new();
    let mut params = Vec::new();
    let mut index = start_index;
    let mut joiner = Joiner::And;

    for token in tokens {
        let term = match token {
            SearchToken::And => {
                joiner = Joiner::And;
                continue;
            }
            SearchToken::Or => {
                joiner = Joiner::Or;
                continue;
            }
            SearchToken::All => "TRUE".to_string(),
            SearchToken::Include(value) if value.is_empty() => {
                format!("({col} IS NULL OR {col} = '')", col = text_expr)
            }
            SearchToken::Exclude(value) if value.is_empty() => {
                format!("({col} IS NOT NULL AND {col} <> '')", col = text_expr)
            }
            SearchToken::Include(value) => {
                params.push(serde_json::Value::String(like_pattern(value)));
                let sql = format!("{}::text ILIKE ${}", column_expr, index);
                index += 1;
                sql
            }
            SearchToken::Exclude(value) => {
                params.push(serde_json::Value::String(like_pattern(value)));
                let sql = format!("{}::text NOT ILIKE ${}", column_expr, index);
                index += 1;
                sql
            }
        };
        terms.push((joiner, term));
        joiner = Joiner::And;
    }

    Condition {
        sql: join_terms(&terms),
        params,
        next_index: index,
    }
}

fn join_terms(terms: &[(Joiner, String)]) -> String {
    match terms {
        [] => String::new(),
        [(_, only)] => only.clone(),
        [(_, first), rest @ ..] => {
            let mut sql = String::from("(");
            sql.push_str(first);
            for (joiner, term) in rest {
                sql.push_str(joiner.as_sql());
                sql.push_str(term);
            }
            sql.push(')');
            sql
        }
    }
}
