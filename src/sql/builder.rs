use super::condition::build_column_condition;
use crate::ast::{ColumnDescriptor, QueryParams, TableSchema};
use crate::config::BrowserConfig;
use crate::error::CompileError;
use crate::ident::{qualify, quote_identifier, sanitize_identifier};
use crate::parser::tokenize_search;
use serde::Serialize;
use tracing::debug;

/// Output column name and the SQL expression that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLabel {
    pub name: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub query: String,
    pub params: Vec<serde_json::Value>,
    /// Output column names in SELECT order.
    pub columns: Vec<String>,
    pub labels: Vec<ColumnLabel>,
    /// Source table first, then every joined table.
    pub tables: Vec<String>,
    /// Row count for the same FROM/WHERE, without paging.
    pub count_query: String,
    /// Number of leading entries of `params` used by `count_query`.
    pub count_param_count: usize,
}

impl CompiledQuery {
    pub fn count_params(&self) -> &[serde_json::Value] {
        &self.params[..self.count_param_count.min(self.params.len())]
    }

    pub fn has_join(&self) -> bool {
        self.query.contains(" LEFT JOIN ")
    }
}

/// Nearest-neighbour ordering on a pgvector column.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct VectorSearch {
    pub column: String,
    pub embedding: Vec<f32>,
}

impl VectorSearch {
    pub fn new(column: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            column: column.into(),
            embedding,
        }
    }

    /// pgvector text literal, e.g. `[0.1,0.2]`.
    pub fn literal(&self) -> String {
        let values: Vec<String> = self.embedding.iter().map(|v| v.to_string()).collect();
        format!("[{}]", values.join(","))
    }
}

/// Compiles one row-listing request against a [`TableSchema`].
///
/// ```
/// use pg_table_browser::{
///     BrowserConfig, ColumnDescriptor, ForeignKeyRef, QueryCompiler, QueryParams, TableSchema,
/// };
///
/// let orders = TableSchema::new("orders")
///     .with_column(ColumnDescriptor::new("id", "integer"))
///     .with_column(
///         ColumnDescriptor::new("customer_id", "integer")
///             .references(ForeignKeyRef::new("customers", "id").with_display_column("name")),
///     );
/// let config = BrowserConfig::default();
/// let params = QueryParams::new().with("customer_name", "smith");
///
/// let compiled = QueryCompiler::new(&orders, &config).compile(&[], &params).unwrap();
/// assert!(compiled.query.contains(
///     r#"LEFT JOIN "customers" AS "customer_id_alias1" ON "customer_id_alias1"."id" = "orders"."customer_id""#
/// ));
/// assert_eq!(compiled.columns, vec!["id", "customer_id", "customer_name"]);
/// ```
pub struct QueryCompiler<'a> {
    schema: &'a TableSchema,
    config: &'a BrowserConfig,
    vector: Option<VectorSearch>,
    pub params: Vec<serde_json::Value>,
    pub param_index: usize,
    select: Vec<String>,
    joins: Vec<String>,
    columns: Vec<String>,
    labels: Vec<ColumnLabel>,
    /// Label expressions known to produce text.
    text_expressions: Vec<String>,
    tables: Vec<String>,
    alias_count: usize,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(schema: &'a TableSchema, config: &'a BrowserConfig) -> Self {
        Self {
            schema,
            config,
            vector: None,
            params: Vec::new(),
            param_index: 0,
            select: Vec::new(),
            joins: Vec::new(),
            columns: Vec::new(),
            labels: Vec::new(),
            text_expressions: Vec::new(),
            tables: Vec::new(),
            alias_count: 0,
        }
    }

    pub fn with_vector_search(mut self, vector: VectorSearch) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Builds the statement for the given visible columns and raw parameters.
    ///
    /// An empty `visible` list means every column of the table.
    pub fn compile(
        mut self,
        visible: &[String],
        params: &QueryParams,
    ) -> Result<CompiledQuery, CompileError> {
        if self.schema.name.is_empty() {
            return Err(CompileError::EmptyTableName);
        }
        let table_sql = quote_identifier(&self.schema.name)?;
        self.tables.push(self.schema.name.clone());

        self.build_select_list(visible)?;

        let mut from_sql = format!(" FROM {}", table_sql);
        for join in &self.joins {
            from_sql.push(' ');
            from_sql.push_str(join);
        }

        let where_sql = self.build_where_clause(params);
        let count_param_count = self.params.len();

        let order_sql = self.build_order_clause(params)?;
        let limit_sql = self.build_limit_offset(params);

        let count_query = format!("SELECT count(*){}{}", from_sql, where_sql);
        let query = format!(
            "SELECT {}{}{}{}{}",
            self.select.join(", "),
            from_sql,
            where_sql,
            order_sql,
            limit_sql
        );

        Ok(CompiledQuery {
            query,
            params: self.params,
            columns: self.columns,
            labels: self.labels,
            tables: self.tables,
            count_query,
            count_param_count,
        })
    }

    fn build_select_list(&mut self, visible: &[String]) -> Result<(), CompileError> {
        let schema = self.schema;
        let selected: Vec<&ColumnDescriptor> = if visible.is_empty() {
            schema.columns.iter().collect()
        } else {
            let mut selected: Vec<&ColumnDescriptor> = Vec::new();
            for name in visible {
                let name = sanitize_identifier(name)?;
                match schema.column(name) {
                    Some(col) if !selected.iter().any(|c| c.name == col.name) => {
                        selected.push(col)
                    }
                    Some(_) => {}
                    None => debug!(table = %schema.name, column = name, "skipping unknown visible column"),
                }
            }
            selected
        };

        for column in selected {
            self.push_column(column)?;
        }
        Ok(())
    }

    fn push_column(&mut self, column: &ColumnDescriptor) -> Result<(), CompileError> {
        let schema = self.schema;
        let table = &schema.name;
        let raw = qualify(table, &column.name)?;
        self.add_output(column.name.clone(), raw.clone(), raw, column.is_text());

        let fk = match &column.foreign_key {
            Some(fk) => fk,
            None => return Ok(()),
        };
        let label = self.unique_label(column.label_name());
        let label_sql = quote_identifier(&label)?;
        let relation = schema.relation_for(column);

        if let Some(cached) = relation.and_then(|r| r.cached_label()) {
            if let Some(cached_column) = schema.column(cached) {
                let expr = qualify(table, cached)?;
                let select_sql = format!("{} AS {}", expr, label_sql);
                self.add_output(label, select_sql, expr, cached_column.is_text());
                return Ok(());
            }
            debug!(table = %table, column = cached, "cached label column missing, joining instead");
        }

        let display = relation
            .and_then(|r| r.target_label())
            .or(fk.display_column.as_deref());

        let display = match display {
            Some(display) => display,
            None => {
                debug!(table = %fk.target_table, "no display column, label left empty");
                let expr = "''::text".to_string();
                self.add_output(label, format!("{} AS {}", expr, label_sql), expr, true);
                return Ok(());
            }
        };

        self.alias_count += 1;
        let alias = format!("{}_alias{}", column.name, self.alias_count);
        let alias_sql = quote_identifier(&alias)?;
        self.joins.push(format!(
            "LEFT JOIN {} AS {} ON {} = {}",
            quote_identifier(&fk.target_table)?,
            alias_sql,
            qualify(&alias, &fk.target_column)?,
            qualify(table, &column.name)?
        ));
        self.tables.push(fk.target_table.clone());

        // The target column's type is not known here.
        let expr = qualify(&alias, display)?;
        self.add_output(label, format!("{} AS {}", expr, label_sql), expr, false);
        Ok(())
    }

    fn add_output(&mut self, name: String, select_sql: String, expression: String, is_text: bool) {
        self.select.push(select_sql);
        self.columns.push(name.clone());
        if is_text {
            self.text_expressions.push(expression.clone());
        }
        self.labels.push(ColumnLabel { name, expression });
    }

    /// `base`, or `base_2`, `base_3`, ... when a table column or an earlier
    /// output already uses the name.
    fn unique_label(&self, base: String) -> String {
        let taken =
            |name: &str| self.schema.column(name).is_some() || self.columns.iter().any(|c| c == name);
        if !taken(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", base, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Label expressions first, then any column of the table. The flag tells
    /// whether the expression is text.
    fn resolve(&self, name: &str) -> Option<(String, bool)> {
        if let Some(label) = self.labels.iter().find(|l| l.name == name) {
            let is_text = self.text_expressions.contains(&label.expression);
            return Some((label.expression.clone(), is_text));
        }
        let column = self.schema.column(name)?;
        let expr = qualify(&self.schema.name, &column.name).ok()?;
        Some((expr, column.is_text()))
    }

    fn build_where_clause(&mut self, params: &QueryParams) -> String {
        let mut clauses = Vec::new();

        for (key, values) in params.iter() {
            if self.config.is_reserved(key) {
                continue;
            }
            if sanitize_identifier(key).is_err() {
                debug!(param = key, "skipping filter with invalid name");
                continue;
            }
            let (expr, is_text) = match self.resolve(key) {
                Some(resolved) => resolved,
                None => {
                    debug!(param = key, table = %self.schema.name, "skipping unresolvable filter");
                    continue;
                }
            };

            for value in values {
                let tokens = tokenize_search(value);
                let condition =
                    build_column_condition(&expr, is_text, &tokens, self.param_index + 1);
                if condition.is_empty() {
                    continue;
                }
                self.param_index = condition.next_index - 1;
                self.params.extend(condition.params);
                clauses.push(condition.sql);
            }
        }

        if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        }
    }

    fn build_order_clause(&mut self, params: &QueryParams) -> Result<String, CompileError> {
        if let Some(vector) = self.vector.clone() {
            if params.get("sort_column").is_some() {
                debug!("vector search overrides sort_column");
            }
            return self.build_vector_order(&vector);
        }

        if let Some(sort_column) = params.get("sort_column").filter(|s| !s.trim().is_empty()) {
            let sort_column = sanitize_identifier(sort_column.trim())?;
            let (expr, _) = self
                .resolve(sort_column)
                .ok_or_else(|| CompileError::UnknownSortColumn(sort_column.to_string()))?;
            let direction = match params.get("sort_order").map(|s| s.trim().to_lowercase()) {
                Some(ref dir) if dir == "desc" => "DESC",
                _ => "ASC",
            };
            return Ok(format!(" ORDER BY {} {}", expr, direction));
        }

        let mut terms = Vec::new();
        for pk in &self.schema.primary_key {
            terms.push(format!("{} ASC", qualify(&self.schema.name, pk)?));
        }
        if terms.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" ORDER BY {}", terms.join(", ")))
        }
    }

    fn build_vector_order(&mut self, vector: &VectorSearch) -> Result<String, CompileError> {
        if vector.embedding.is_empty() {
            return Err(CompileError::EmptyVector);
        }
        let column = sanitize_identifier(&vector.column)?;
        if self.schema.column(column).is_none() {
            return Err(CompileError::InvalidVectorColumn(column.to_string()));
        }
        let param_ref = self.add_param(serde_json::Value::String(vector.literal()));
        Ok(format!(
            " ORDER BY {} <=> {}::vector",
            qualify(&self.schema.name, column)?,
            param_ref
        ))
    }

    fn build_limit_offset(&mut self, params: &QueryParams) -> String {
        let limit = self.config.clamp_limit(params.get_u64("limit"));
        // OFFSET is a bigint; larger values would bind as float8.
        let offset = params.get_u64("offset").unwrap_or(0).min(i64::MAX as u64);
        let lim_ref = self.add_param(serde_json::Value::Number(limit.into()));
        let off_ref = self.add_param(serde_json::Value::Number(offset.into()));
        format!(" LIMIT {} OFFSET {}", lim_ref, off_ref)
    }

    fn add_param(&mut self, value: serde_json::Value) -> String {
        let idx = self.param_index + 1;
        self.param_index = idx;
        self.params.push(value);
        format!("${}", idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ForeignKeyRef, OneToManyRelation};
    use serde_json::json;

    fn orders() -> TableSchema {
        TableSchema::new("orders")
            .with_column(ColumnDescriptor::new("id", "integer").nullable(false).identity(true))
            .with_column(ColumnDescriptor::new("status", "text"))
            .with_column(
                ColumnDescriptor::new("customer_id", "integer").references(
                    ForeignKeyRef::new("customers", "id").with_display_column("name"),
                ),
            )
            .with_primary_key(vec!["id".to_string()])
    }

    fn compile(schema: &TableSchema, visible: &[&str], params: QueryParams) -> CompiledQuery {
        let config = BrowserConfig::default();
        let visible: Vec<String> = visible.iter().map(|s| s.to_string()).collect();
        QueryCompiler::new(schema, &config)
            .compile(&visible, &params)
            .unwrap()
    }

    #[test]
    fn test_plain_columns_are_table_qualified() {
        let result = compile(&orders(), &["id", "status"], QueryParams::new());
        assert_eq!(
            result.query,
            r#"SELECT "orders"."id", "orders"."status" FROM "orders" ORDER BY "orders"."id" ASC LIMIT $1 OFFSET $2"#
        );
        assert_eq!(result.params, vec![json!(50), json!(0)]);
        assert_eq!(result.columns, vec!["id", "status"]);
    }

    #[test]
    fn test_foreign_key_without_cache_joins_once() {
        let result = compile(&orders(), &["customer_id"], QueryParams::new());
        assert_eq!(result.query.matches("LEFT JOIN").count(), 1);
        assert!(result.query.contains(
            r#"SELECT "orders"."customer_id", "customer_id_alias1"."name" AS "customer_name""#
        ));
        assert!(result.query.contains(
            r#"LEFT JOIN "customers" AS "customer_id_alias1" ON "customer_id_alias1"."id" = "orders"."customer_id""#
        ));
        assert_eq!(result.tables, vec!["orders", "customers"]);
    }

    #[test]
    fn test_cached_label_skips_join() {
        let schema = orders()
            .with_column(ColumnDescriptor::new("customer_label", "text"))
            .with_relations(vec![OneToManyRelation::new(
                "orders",
                "customer_id",
                "customers",
                "id",
            )
            .with_cached_label("customer_label")]);
        let result = compile(&schema, &["customer_id"], QueryParams::new());
        assert!(!result.query.contains("LEFT JOIN"));
        assert!(result.query.contains(
            r#""orders"."customer_id", "orders"."customer_label" AS "customer_name""#
        ));
    }

    #[test]
    fn test_cached_label_missing_column_falls_back_to_join() {
        let schema = orders().with_relations(vec![OneToManyRelation::new(
            "orders",
            "customer_id",
            "customers",
            "id",
        )
        .with_cached_label("gone")]);
        let result = compile(&schema, &["customer_id"], QueryParams::new());
        assert_eq!(result.query.matches("LEFT JOIN").count(), 1);
    }

    #[test]
    fn test_relation_target_label_overrides_display_column() {
        let schema = orders().with_relations(vec![OneToManyRelation::new(
            "orders",
            "customer_id",
            "customers",
            "id",
        )
        .with_target_label("company")]);
        let result = compile(&schema, &["customer_id"], QueryParams::new());
        assert!(result
            .query
            .contains(r#""customer_id_alias1"."company" AS "customer_name""#));
    }

    #[test]
    fn test_missing_display_column_gives_empty_label() {
        let schema = TableSchema::new("orders").with_column(
            ColumnDescriptor::new("customer_id", "integer")
                .references(ForeignKeyRef::new("customers", "id")),
        );
        let result = compile(&schema, &[], QueryParams::new());
        assert!(!result.query.contains("LEFT JOIN"));
        assert!(result.query.contains(r#"''::text AS "customer_name""#));
    }

    #[test]
    fn test_repeated_target_gets_distinct_aliases() {
        let schema = TableSchema::new("transfers")
            .with_column(ColumnDescriptor::new("from_account_id", "integer").references(
                ForeignKeyRef::new("accounts", "id").with_display_column("title"),
            ))
            .with_column(ColumnDescriptor::new("to_account_id", "integer").references(
                ForeignKeyRef::new("accounts", "id").with_display_column("title"),
            ));
        let result = compile(&schema, &[], QueryParams::new());
        assert!(result.query.contains(r#"AS "from_account_id_alias1""#));
        assert!(result.query.contains(r#"AS "to_account_id_alias2""#));
        assert_eq!(result.columns, vec![
            "from_account_id",
            "from_account_name",
            "to_account_id",
            "to_account_name"
        ]);
    }

    #[test]
    fn test_filter_on_label_uses_join_expression() {
        let params = QueryParams::new().with("customer_name", "k*rhu");
        let result = compile(&orders(), &["customer_id"], params);
        assert!(result
            .query
            .contains(r#"WHERE "customer_id_alias1"."name"::text ILIKE $1"#));
        assert_eq!(result.params[0], json!("%k%rhu%"));
    }

    #[test]
    fn test_filter_on_hidden_column_resolves_directly() {
        let params = QueryParams::new().with("status", "open");
        let result = compile(&orders(), &["id"], params);
        assert!(result.query.contains(r#"WHERE "orders"."status"::text ILIKE $1"#));
    }

    #[test]
    fn test_unknown_filter_is_skipped() {
        let params = QueryParams::new()
            .with("nonexistent", "x")
            .with("bad name", "y");
        let result = compile(&orders(), &["id"], params);
        assert!(!result.query.contains("WHERE"));
        assert_eq!(result.params.len(), 2);
    }

    #[test]
    fn test_reserved_keys_are_not_filters() {
        let params = QueryParams::new()
            .with("table", "orders")
            .with("offset", "10")
            .with("sort_order", "desc");
        let result = compile(&orders(), &["id"], params);
        assert!(!result.query.contains("WHERE"));
        assert_eq!(result.params, vec![json!(50), json!(10)]);
    }

    #[test]
    fn test_multiple_filters_are_and_joined_with_sequential_placeholders() {
        let params = QueryParams::new()
            .with("status", "open OR !=closed")
            .with("customer_name", r#"!="""#)
            .with("id", "4*");
        let result = compile(&orders(), &[], params);
        assert!(result.query.contains(
            r#"WHERE ("customer_id_alias1"."name"::text IS NOT NULL AND "customer_id_alias1"."name"::text <> '') AND "orders"."id"::text ILIKE $1 AND ("orders"."status"::text ILIKE $2 OR "orders"."status"::text NOT ILIKE $3)"#
        ));
        assert!(result.query.ends_with("LIMIT $4 OFFSET $5"));
        assert_eq!(
            result.params,
            vec![json!("%4%%"), json!("%open%"), json!("%closed%"), json!(50), json!(0)]
        );
        assert_eq!(result.count_param_count, 3);
    }

    #[test]
    fn test_empty_filter_on_integer_column_compares_text() {
        let params = QueryParams::new().with("id", r#""""#);
        let result = compile(&orders(), &["id"], params);
        assert!(result.query.contains(
            r#"WHERE ("orders"."id"::text IS NULL OR "orders"."id"::text = '')"#
        ));
        assert_eq!(result.count_param_count, 0);
    }

    #[test]
    fn test_empty_filter_on_text_column_is_not_cast() {
        let params = QueryParams::new().with("status", r#"!="""#);
        let result = compile(&orders(), &["id"], params);
        assert!(result.query.contains(
            r#"WHERE ("orders"."status" IS NOT NULL AND "orders"."status" <> '')"#
        ));
    }

    #[test]
    fn test_cached_text_label_is_not_cast() {
        let schema = orders()
            .with_column(ColumnDescriptor::new("customer_label", "text"))
            .with_relations(vec![OneToManyRelation::new(
                "orders",
                "customer_id",
                "customers",
                "id",
            )
            .with_cached_label("customer_label")]);
        let params = QueryParams::new().with("customer_name", r#""""#);
        let result = compile(&schema, &["customer_id"], params);
        assert!(result.query.contains(
            r#"WHERE ("orders"."customer_label" IS NULL OR "orders"."customer_label" = '')"#
        ));
    }

    #[test]
    fn test_label_names_do_not_collide() {
        let schema = TableSchema::new("orders")
            .with_column(ColumnDescriptor::new("customer_id", "integer").references(
                ForeignKeyRef::new("customers", "id").with_display_column("name"),
            ))
            .with_column(ColumnDescriptor::new("customer_uid", "uuid").references(
                ForeignKeyRef::new("accounts", "uid").with_display_column("title"),
            ))
            .with_column(ColumnDescriptor::new("owner_id", "integer").references(
                ForeignKeyRef::new("users", "id").with_display_column("email"),
            ))
            .with_column(ColumnDescriptor::new("owner_name", "text"));
        let result = compile(&schema, &[], QueryParams::new());
        assert_eq!(
            result.columns,
            vec![
                "customer_id",
                "customer_name",
                "customer_uid",
                "customer_name_2",
                "owner_id",
                "owner_name_2",
                "owner_name"
            ]
        );
        assert!(result
            .query
            .contains(r#""customer_uid_alias2"."title" AS "customer_name_2""#));
        assert!(result.query.contains(r#""orders"."owner_name" FROM"#));

        let params = QueryParams::new().with("owner_name", "bob");
        let filtered = compile(&schema, &[], params);
        assert!(filtered.query.contains(r#"WHERE "orders"."owner_name"::text ILIKE $1"#));
    }

    #[test]
    fn test_offset_beyond_bigint_is_clamped() {
        let params = QueryParams::new().with("offset", "18446744073709551615");
        let result = compile(&orders(), &["id"], params);
        assert_eq!(result.params, vec![json!(50), json!(i64::MAX)]);
        assert!(result.params[1].as_i64().is_some());
    }

    #[test]
    fn test_explicit_match_all_filter() {
        let params = QueryParams::new().with("status", "*");
        let result = compile(&orders(), &["id"], params);
        assert!(result.query.contains(" WHERE TRUE "));
    }

    #[test]
    fn test_sort_by_label_desc() {
        let params = QueryParams::new()
            .with("sort_column", "customer_name")
            .with("sort_order", "DESC");
        let result = compile(&orders(), &[], params);
        assert!(result
            .query
            .contains(r#"ORDER BY "customer_id_alias1"."name" DESC"#));
    }

    #[test]
    fn test_invalid_sort_order_defaults_to_asc() {
        let params = QueryParams::new()
            .with("sort_column", "status")
            .with("sort_order", "sideways");
        let result = compile(&orders(), &[], params);
        assert!(result.query.contains(r#"ORDER BY "orders"."status" ASC"#));
    }

    #[test]
    fn test_unknown_sort_column_is_error() {
        let config = BrowserConfig::default();
        let params = QueryParams::new().with("sort_column", "nope");
        let err = QueryCompiler::new(&orders(), &config)
            .compile(&[], &params)
            .unwrap_err();
        assert_eq!(err, CompileError::UnknownSortColumn("nope".to_string()));
    }

    #[test]
    fn test_invalid_visible_identifier_is_error() {
        let config = BrowserConfig::default();
        let err = QueryCompiler::new(&orders(), &config)
            .compile(&["id; drop".to_string()], &QueryParams::new())
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_unknown_visible_column_is_skipped() {
        let result = compile(&orders(), &["id", "ghost", "id"], QueryParams::new());
        assert_eq!(result.columns, vec!["id"]);
    }

    #[test]
    fn test_empty_table_name() {
        let config = BrowserConfig::default();
        let schema = TableSchema::new("");
        let err = QueryCompiler::new(&schema, &config)
            .compile(&[], &QueryParams::new())
            .unwrap_err();
        assert_eq!(err, CompileError::EmptyTableName);
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = QueryParams::new().with("limit", "100000").with("offset", "x");
        let result = compile(&orders(), &["id"], params);
        assert_eq!(result.params, vec![json!(500), json!(0)]);
    }

    #[test]
    fn test_vector_search_overrides_sort() {
        let schema = orders().with_column(ColumnDescriptor::new("embedding", "USER-DEFINED"));
        let config = BrowserConfig::default();
        let params = QueryParams::new()
            .with("status", "open")
            .with("sort_column", "status");
        let result = QueryCompiler::new(&schema, &config)
            .with_vector_search(VectorSearch::new("embedding", vec![0.5, 1.0]))
            .compile(&["id".to_string()], &params)
            .unwrap();
        assert!(result
            .query
            .contains(r#"ORDER BY "orders"."embedding" <=> $2::vector LIMIT $3 OFFSET $4"#));
        assert_eq!(result.params[1], json!("[0.5,1]"));
        assert_eq!(result.count_param_count, 1);
    }

    #[test]
    fn test_vector_search_unknown_column() {
        let config = BrowserConfig::default();
        let err = QueryCompiler::new(&orders(), &config)
            .with_vector_search(VectorSearch::new("embedding", vec![1.0]))
            .compile(&[], &QueryParams::new())
            .unwrap_err();
        assert_eq!(err, CompileError::InvalidVectorColumn("embedding".to_string()));
    }

    #[test]
    fn test_count_query_shares_where_clause() {
        let params = QueryParams::new().with("status", "open");
        let result = compile(&orders(), &[], params);
        assert_eq!(
            result.count_query,
            r#"SELECT count(*) FROM "orders" LEFT JOIN "customers" AS "customer_id_alias1" ON "customer_id_alias1"."id" = "orders"."customer_id" WHERE "orders"."status"::text ILIKE $1"#
        );
        assert_eq!(result.count_params(), &[json!("%open%")]);
    }
}
