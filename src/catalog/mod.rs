//! Read-only views of the system catalog.
//!
//! Row types here are plain data so the synchronizers and the schema cache
//! can be tested without a database; the `postgres` feature adds the
//! functions that fill them.

pub mod queries;
pub use queries::CREATE_RELATION_TABLES;
#[cfg(feature = "postgres")]
mod reader;

#[cfg(feature = "postgres")]
pub use reader::{
    bridge_candidates, foreign_keys, foreign_keys_from_table, many_to_many_relations,
    one_to_many_relations, one_to_many_relations_from_table, primary_keys, table_columns,
};

use crate::ast::ColumnDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single-column foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub constraint_name: String,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

impl ForeignKey {
    pub fn new(
        constraint_name: impl Into<String>,
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
        }
    }
}

/// Primary-key column lists keyed by table name.
pub type PrimaryKeys = HashMap<String, Vec<String>>;

/// One row of `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumn {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub nullable: bool,
    pub is_identity: bool,
    pub ordinal: i32,
}

impl CatalogColumn {
    pub fn to_descriptor(&self) -> ColumnDescriptor {
        ColumnDescriptor::new(&self.column_name, &self.data_type)
            .nullable(self.nullable)
            .identity(self.is_identity)
    }
}

/// One foreign key of a bridging-table candidate, as aggregated by
/// [`queries::BRIDGE_CANDIDATES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeForeignKey {
    pub constraint_name: String,
    pub column_name: String,
    pub foreign_table: String,
    pub foreign_column: String,
}

/// A table holding exactly two foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCandidate {
    pub table_name: String,
    pub foreign_keys: Vec<BridgeForeignKey>,
    pub column_count: i64,
    pub primary_key: Vec<String>,
}

impl BridgeCandidate {
    /// Parses the `foreign_keys` JSON text column of a candidate row.
    pub fn parse_foreign_keys(
        table: &str,
        json: &str,
    ) -> Result<Vec<BridgeForeignKey>, crate::error::SyncError> {
        serde_json::from_str(json).map_err(|e| crate::error::SyncError::MalformedRow {
            table: table.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Groups foreign keys by their source table.
pub fn index_by_source(fks: &[ForeignKey]) -> HashMap<String, Vec<ForeignKey>> {
    let mut index: HashMap<String, Vec<ForeignKey>> = HashMap::new();
    for fk in fks {
        index
            .entry(fk.source_table.clone())
            .or_default()
            .push(fk.clone());
    }
    index
}
