//! Runs compiled statements and shapes the rows.

use crate::ast::QueryParams;
use crate::config::BrowserConfig;
use crate::error::Error;
use crate::schema_cache::SchemaCache;
use crate::sql::{ColumnLabel, CompiledQuery, QueryCompiler, VectorSearch};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::{PgPool, Row};

/// Rows of one page plus the metadata needed to render them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub labels: Vec<ColumnLabel>,
    /// Total matching rows, when counted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [Value],
) -> Query<'q, Postgres, PgArguments> {
    for value in params {
        query = match value {
            Value::String(s) => query.bind(s.as_str()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(n.as_f64()),
            },
            Value::Bool(b) => query.bind(*b),
            Value::Null => query.bind(None::<String>),
            other => query.bind(other.to_string()),
        };
    }
    query
}

/// Executes `compiled` and returns its rows as JSON objects keyed by column.
pub async fn fetch_rows(pool: &PgPool, compiled: &CompiledQuery) -> Result<RowSet, Error> {
    let sql = format!(
        "SELECT row_to_json(q)::text AS row FROM ({}) AS q",
        compiled.query
    );
    let rows = bind_params(sqlx::query(&sql), &compiled.params)
        .fetch_all(pool)
        .await?;

    let mut shaped = Vec::with_capacity(rows.len());
    for row in rows {
        let text: String = row.try_get("row")?;
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => shaped.push(map),
            Ok(other) => return Err(Error::Decode(format!("expected object, got {}", other))),
            Err(e) => return Err(Error::Decode(e.to_string())),
        }
    }

    Ok(RowSet {
        columns: compiled.columns.clone(),
        rows: shaped,
        labels: compiled.labels.clone(),
        total: None,
    })
}

/// Counts every row matching the filters of `compiled`, ignoring paging.
pub async fn count_rows(pool: &PgPool, compiled: &CompiledQuery) -> Result<i64, Error> {
    let row = bind_params(sqlx::query(&compiled.count_query), compiled.count_params())
        .fetch_one(pool)
        .await?;
    Ok(row.try_get(0)?)
}

/// Loads `table`'s schema, compiles the request and fetches one page.
pub async fn browse(
    pool: &PgPool,
    config: &BrowserConfig,
    table: &str,
    visible: &[String],
    params: &QueryParams,
    vector: Option<VectorSearch>,
) -> Result<RowSet, Error> {
    let schema = SchemaCache::load_table(pool, config, table).await?;
    let mut compiler = QueryCompiler::new(&schema, config);
    if let Some(vector) = vector {
        compiler = compiler.with_vector_search(vector);
    }
    let compiled = compiler.compile(visible, params)?;
    tracing::debug!(table, sql = %compiled.query, params = compiled.params.len(), "browsing");

    let mut rows = fetch_rows(pool, &compiled).await?;
    rows.total = Some(count_rows(pool, &compiled).await?);
    Ok(rows)
}
