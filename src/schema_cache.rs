//! Column, key and relationship metadata for building [`TableSchema`]s.

use crate::ast::{is_text_type, ColumnDescriptor, ForeignKeyRef, OneToManyRelation, TableSchema};
use crate::catalog::{index_by_source, CatalogColumn, ForeignKey, PrimaryKeys};
use crate::config::BrowserConfig;
use crate::error::CompileError;
use std::collections::HashMap;
use tracing::debug;

#[cfg(feature = "postgres")]
use crate::catalog;
#[cfg(feature = "postgres")]
use sqlx::PgPool;

/// Cache of catalog information for one schema.
///
/// Foreign-key targets need their columns cached too: display columns and
/// curated target labels are only used when the target table has them.
#[derive(Debug, Clone, Default)]
pub struct SchemaCache {
    /// Columns in ordinal order, by table
    columns: HashMap<String, Vec<CatalogColumn>>,
    /// Foreign keys by source table
    foreign_keys: HashMap<String, Vec<ForeignKey>>,
    primary_keys: PrimaryKeys,
    /// One-to-many records by source table
    relations: HashMap<String, Vec<OneToManyRelation>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: Vec<CatalogColumn>) -> Self {
        for column in columns {
            self.columns
                .entry(column.table_name.clone())
                .or_default()
                .push(column);
        }
        for cols in self.columns.values_mut() {
            cols.sort_by_key(|c| c.ordinal);
        }
        self
    }

    pub fn with_foreign_keys(mut self, fks: &[ForeignKey]) -> Self {
        self.foreign_keys = index_by_source(fks);
        self
    }

    pub fn with_primary_keys(mut self, primary_keys: PrimaryKeys) -> Self {
        self.primary_keys = primary_keys;
        self
    }

    pub fn with_relations(mut self, relations: Vec<OneToManyRelation>) -> Self {
        self.relations.clear();
        for relation in relations {
            self.relations
                .entry(relation.source_table.clone())
                .or_default()
                .push(relation);
        }
        self
    }

    #[cfg(feature = "postgres")]
    /// Loads what is needed to compile a query against `table`: its own
    /// columns and keys, plus the columns of every table its foreign keys
    /// point at.
    pub async fn load_table(
        pool: &PgPool,
        config: &BrowserConfig,
        table: &str,
    ) -> Result<TableSchema, crate::Error> {
        let fks = catalog::foreign_keys_from_table(pool, &config.schema, table).await?;
        let mut tables = vec![table.to_string()];
        for fk in &fks {
            if !tables.contains(&fk.target_table) {
                tables.push(fk.target_table.clone());
            }
        }
        let columns = catalog::table_columns(pool, &config.schema, &tables).await?;
        let primary_keys = catalog::primary_keys(pool).await?;
        let relations = catalog::one_to_many_relations_from_table(pool, table).await?;

        debug!(
            table,
            targets = tables.len() - 1,
            columns = columns.len(),
            "table metadata loaded"
        );

        let cache = Self::new()
            .with_columns(columns)
            .with_foreign_keys(&fks)
            .with_primary_keys(primary_keys)
            .with_relations(relations);
        Ok(cache.table_schema(table, config)?)
    }

    /// Gets all foreign keys from a table
    pub fn get_foreign_keys(&self, table: &str) -> &[ForeignKey] {
        self.foreign_keys
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.columns
            .get(table)
            .map_or(false, |cols| cols.iter().any(|c| c.column_name == column))
    }

    /// Column shown for rows of `table`: the configured override if the
    /// table has it, else its first text column. `None` when the table's
    /// columns are not cached.
    pub fn display_column(&self, table: &str, config: &BrowserConfig) -> Option<String> {
        let columns = self.columns.get(table)?;
        if let Some(column) = config.display_column_overrides.get(table) {
            if self.has_column(table, column) {
                return Some(column.clone());
            }
            debug!(table, column = %column, "display override not on table, ignoring");
        }
        columns
            .iter()
            .find(|c| is_text_type(&c.data_type))
            .map(|c| c.column_name.clone())
    }

    /// Copy of `relation` without a target label the target table lacks.
    fn checked_relation(&self, relation: &OneToManyRelation) -> OneToManyRelation {
        let mut relation = relation.clone();
        let missing = relation
            .target_label()
            .map_or(false, |label| !self.has_column(&relation.target_table, label));
        if missing {
            debug!(
                table = %relation.target_table,
                column = ?relation.label_column_in_target,
                "curated target label not on table, ignoring"
            );
            relation.label_column_in_target = None;
        }
        relation
    }

    /// Builds the compiler input for `table`.
    pub fn table_schema(
        &self,
        table: &str,
        config: &BrowserConfig,
    ) -> Result<TableSchema, CompileError> {
        if table.is_empty() {
            return Err(CompileError::EmptyTableName);
        }
        let columns = self
            .columns
            .get(table)
            .ok_or_else(|| CompileError::TableNotFound(table.to_string()))?;
        let fks = self.get_foreign_keys(table);

        let descriptors: Vec<ColumnDescriptor> = columns
            .iter()
            .map(|column| {
                let descriptor = column.to_descriptor();
                match fks.iter().find(|fk| fk.source_column == column.column_name) {
                    Some(fk) => {
                        let mut target = ForeignKeyRef::new(&fk.target_table, &fk.target_column);
                        target.display_column = self.display_column(&fk.target_table, config);
                        descriptor.references(target)
                    }
                    None => descriptor,
                }
            })
            .collect();

        let relations = self
            .relations
            .get(table)
            .map(|rs| rs.iter().map(|r| self.checked_relation(r)).collect())
            .unwrap_or_default();

        Ok(TableSchema::new(table)
            .with_columns(descriptors)
            .with_primary_key(self.primary_keys.get(table).cloned().unwrap_or_default())
            .with_relations(relations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(table: &str, name: &str, data_type: &str, ordinal: i32) -> CatalogColumn {
        CatalogColumn {
            table_name: table.to_string(),
            column_name: name.to_string(),
            data_type: data_type.to_string(),
            nullable: true,
            is_identity: false,
            ordinal,
        }
    }

    fn cache() -> SchemaCache {
        SchemaCache::new()
            .with_columns(vec![
                column("orders", "customer_id", "integer", 2),
                column("orders", "id", "integer", 1),
                column("orders", "owner_id", "integer", 3),
                column("customers", "id", "integer", 1),
                column("customers", "name", "text", 2),
                column("users", "id", "integer", 1),
                column("users", "full_name", "character varying", 2),
                column("users", "email", "text", 3),
            ])
            .with_foreign_keys(&[
                ForeignKey::new("o_c", "orders", "customer_id", "customers", "id"),
                ForeignKey::new("o_u", "orders", "owner_id", "users", "id"),
            ])
            .with_primary_keys(
                [("orders".to_string(), vec!["id".to_string()])]
                    .into_iter()
                    .collect(),
            )
    }

    fn display_of(schema: &TableSchema, column: &str) -> Option<String> {
        schema
            .column(column)
            .and_then(|c| c.foreign_key.as_ref())
            .and_then(|fk| fk.display_column.clone())
    }

    #[test]
    fn test_table_schema_orders_columns_and_keys() {
        let config = BrowserConfig::default();
        let schema = cache().table_schema("orders", &config).unwrap();
        let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "customer_id", "owner_id"]);
        assert_eq!(schema.primary_key, vec!["id"]);

        let fk = schema.columns[1].foreign_key.as_ref().unwrap();
        assert_eq!(fk.target_table, "customers");
        assert_eq!(fk.display_column.as_deref(), Some("name"));
    }

    #[test]
    fn test_display_override_wins() {
        let config = BrowserConfig::default();
        let schema = cache().table_schema("orders", &config).unwrap();
        assert_eq!(display_of(&schema, "owner_id").as_deref(), Some("email"));
    }

    #[test]
    fn test_display_override_missing_on_target_falls_back_to_text_column() {
        let config = BrowserConfig::default();
        let cache = SchemaCache::new()
            .with_columns(vec![
                column("posts", "id", "integer", 1),
                column("posts", "author_id", "integer", 2),
                column("users", "id", "integer", 1),
                column("users", "username", "text", 2),
            ])
            .with_foreign_keys(&[ForeignKey::new("p_u", "posts", "author_id", "users", "id")]);
        let schema = cache.table_schema("posts", &config).unwrap();
        assert_eq!(display_of(&schema, "author_id").as_deref(), Some("username"));
    }

    #[test]
    fn test_no_text_column_or_unknown_target_leaves_display_empty() {
        let config = BrowserConfig::default();
        let cache = SchemaCache::new()
            .with_columns(vec![
                column("posts", "author_id", "integer", 1),
                column("posts", "tag_id", "integer", 2),
                column("users", "id", "integer", 1),
            ])
            .with_foreign_keys(&[
                ForeignKey::new("p_u", "posts", "author_id", "users", "id"),
                ForeignKey::new("p_t", "posts", "tag_id", "tags", "id"),
            ]);
        let schema = cache.table_schema("posts", &config).unwrap();
        assert_eq!(display_of(&schema, "author_id"), None);
        assert_eq!(display_of(&schema, "tag_id"), None);
    }

    #[test]
    fn test_curated_target_label_kept_only_when_target_has_it() {
        let config = BrowserConfig::default();
        let cache = cache().with_relations(vec![
            OneToManyRelation::new("orders", "customer_id", "customers", "id")
                .with_id(1)
                .with_target_label("nickname"),
            OneToManyRelation::new("orders", "owner_id", "users", "id")
                .with_id(2)
                .with_target_label("full_name"),
        ]);
        let schema = cache.table_schema("orders", &config).unwrap();
        assert_eq!(schema.relations[0].target_label(), None);
        assert_eq!(schema.relations[1].target_label(), Some("full_name"));
    }

    #[test]
    fn test_unknown_table() {
        let config = BrowserConfig::default();
        assert_eq!(
            cache().table_schema("ghost", &config).unwrap_err(),
            CompileError::TableNotFound("ghost".to_string())
        );
        assert_eq!(
            cache().table_schema("", &config).unwrap_err(),
            CompileError::EmptyTableName
        );
    }

    #[test]
    fn test_relations_attached_to_source() {
        let config = BrowserConfig::default();
        let cache = cache().with_relations(vec![
            OneToManyRelation::new("orders", "customer_id", "customers", "id").with_id(1),
            OneToManyRelation::new("invoices", "order_id", "orders", "id").with_id(2),
        ]);
        let schema = cache.table_schema("orders", &config).unwrap();
        assert_eq!(schema.relations.len(), 1);
        assert_eq!(schema.relations[0].id, Some(1));
    }

    #[test]
    fn test_schema_cache_empty() {
        let cache = SchemaCache::new();
        assert!(cache.get_foreign_keys("users").is_empty());
        assert!(!cache.has_column("users", "id"));
        assert_eq!(cache.display_column("users", &BrowserConfig::default()), None);
    }
}
