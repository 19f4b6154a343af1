//! # Postgres Table Browser
//!
//! Schema-driven browsing of arbitrary Postgres tables: a small search grammar,
//! a query compiler that resolves foreign keys into human-readable labels, and
//! a synchronizer that keeps two relationship tables in line with the catalog.
//!
//! ## Features
//!
//! - **Search Grammar**: `AND` / `OR`, `!=` exclusion, `*` wildcards, quoted terms, `""` for empty
//! - **Label Resolution**: foreign-key columns get a `{col}_name` label from a `LEFT JOIN`,
//!   or straight from a cached label column when one is curated
//! - **Injection Safety**: every identifier is validated and quoted, every value is bound
//! - **Relationship Sync**: one-to-many records from single-column foreign keys,
//!   many-to-many records from bridging tables detected by named heuristics
//! - **Vector Ordering**: optional pgvector nearest-neighbour `ORDER BY`
//!
//! ## Quick Start
//!
//! ```rust
//! use pg_table_browser::{
//!     compile, parse_query_string, BrowserConfig, ColumnDescriptor, ForeignKeyRef, TableSchema,
//! };
//!
//! let orders = TableSchema::new("orders")
//!     .with_column(ColumnDescriptor::new("id", "integer"))
//!     .with_column(
//!         ColumnDescriptor::new("customer_id", "integer")
//!             .references(ForeignKeyRef::new("customers", "id").with_display_column("name")),
//!     )
//!     .with_primary_key(vec!["id".to_string()]);
//!
//! let params = parse_query_string("customer_name=k*rhu&sort_column=id&sort_order=desc");
//! let result = compile(&orders, &BrowserConfig::default(), &[], &params).unwrap();
//!
//! assert!(result.query.contains("LEFT JOIN \"customers\""));
//! assert!(result.query.contains("ORDER BY \"orders\".\"id\" DESC"));
//! assert_eq!(result.params[0], serde_json::json!("%k%rhu%"));
//! ```
//!
//! ## Search Grammar
//!
//! | Input | Condition on column `c` |
//! | --- | --- |
//! | `*` or `%` | `TRUE` |
//! | `k*rhu` | `c::text ILIKE '%k%rhu%'` |
//! | `!=foo` | `c::text NOT ILIKE '%foo%'` |
//! | `""` | `(c IS NULL OR c = '')` |
//! | `!=""` | `(c IS NOT NULL AND c <> '')` |
//! | `a OR b c` | `(a OR b AND c)`: an operator binds to the next term only |
//!
//! ```rust
//! use pg_table_browser::{build_condition, tokenize_search};
//!
//! let cond = build_condition("c", &tokenize_search(r#"!="""#), 1);
//! assert_eq!(cond.sql, "(c IS NOT NULL AND c <> '')");
//! assert!(cond.params.is_empty());
//! ```
//!
//! ## Relationship Sync
//!
//! With the `postgres` feature, [`sync::RelationSynchronizer`] loads the catalog,
//! plans the difference against `foreign_key_relations_1_m` /
//! `foreign_key_relations_m_m` and applies it. The planners are plain functions:
//!
//! ```rust
//! use pg_table_browser::catalog::{BridgeCandidate, BridgeForeignKey};
//! use pg_table_browser::sync::is_likely_bridging_table;
//! use pg_table_browser::BrowserConfig;
//!
//! let fk = |col: &str, table: &str| BridgeForeignKey {
//!     constraint_name: format!("{}_fkey", col),
//!     column_name: col.to_string(),
//!     foreign_table: table.to_string(),
//!     foreign_column: "id".to_string(),
//! };
//! let table = BridgeCandidate {
//!     table_name: "user_role_relation".to_string(),
//!     foreign_keys: vec![fk("user_id", "users"), fk("role_id", "roles")],
//!     column_count: 3,
//!     primary_key: vec!["user_id".to_string(), "role_id".to_string()],
//! };
//! let key = is_likely_bridging_table(&table, &BrowserConfig::default()).unwrap();
//! assert_eq!((key.table_a.as_str(), key.table_b.as_str()), ("roles", "users"));
//! ```

pub mod ast;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ident;
pub mod parser;
pub mod schema_cache;
pub mod sql;
pub mod sync;

#[cfg(feature = "postgres")]
pub mod exec;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::{
    ColumnDescriptor, ForeignKeyRef, ManyToManyKey, ManyToManyRelation, OneToManyKey,
    OneToManyRelation, QueryParams, SearchToken, TableSchema,
};
pub use config::BrowserConfig;
pub use error::{CompileError, Error, IdentifierError, SyncError};
pub use ident::{is_valid_identifier, qualify, quote_identifier, sanitize_identifier};
pub use parser::{parse_query_string, tokenize_search};
pub use schema_cache::SchemaCache;
pub use sql::{
    build_condition, ColumnLabel, CompiledQuery, Condition, QueryCompiler, VectorSearch,
};
pub use sync::{SkipReason, SyncReport};

/// Compiles one row-listing request.
///
/// # Arguments
///
/// * `schema` - Columns, keys and relationship records of the table
/// * `config` - Paging, reserved keys and display overrides
/// * `visible` - Columns to select; empty selects every column
/// * `params` - Raw request parameters (filters, `sort_column`, `sort_order`, `limit`, `offset`)
///
/// # Examples
///
/// ```
/// use pg_table_browser::{compile, BrowserConfig, ColumnDescriptor, QueryParams, TableSchema};
///
/// let table = TableSchema::new("cities").with_column(ColumnDescriptor::new("name", "text"));
/// let params = QueryParams::new().with("name", "berlin OR !=munich");
///
/// let result = compile(&table, &BrowserConfig::default(), &[], &params).unwrap();
/// assert!(result.query.contains(
///     r#"WHERE ("cities"."name"::text ILIKE $1 OR "cities"."name"::text NOT ILIKE $2)"#
/// ));
/// ```
pub fn compile(
    schema: &TableSchema,
    config: &BrowserConfig,
    visible: &[String],
    params: &QueryParams,
) -> Result<CompiledQuery, Error> {
    QueryCompiler::new(schema, config)
        .compile(visible, params)
        .map_err(Error::Compile)
}

/// Parses a raw query string and compiles it with the default configuration.
///
/// # Examples
///
/// ```
/// use pg_table_browser::{query_string_to_sql, ColumnDescriptor, TableSchema};
///
/// let table = TableSchema::new("cities").with_column(ColumnDescriptor::new("name", "text"));
/// let result = query_string_to_sql(&table, "name=*&limit=10").unwrap();
/// assert!(result.query.contains("WHERE TRUE"));
/// assert_eq!(result.params, vec![serde_json::json!(10), serde_json::json!(0)]);
/// ```
pub fn query_string_to_sql(schema: &TableSchema, query_string: &str) -> Result<CompiledQuery, Error> {
    let params = parse_query_string(query_string);
    compile(schema, &BrowserConfig::default(), &[], &params)
}
