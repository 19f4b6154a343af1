use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation key of a one-to-many record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OneToManyKey {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

impl fmt::Display for OneToManyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}->{}.{}",
            self.source_table, self.source_column, self.target_table, self.target_column
        )
    }
}

/// A row of `foreign_key_relations_1_m`.
///
/// Only the key columns are derived from the catalog. The label and
/// insert-behaviour fields belong to a human curator and are never written
/// by the synchronizer once the row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToManyRelation {
    #[serde(default)]
    pub id: Option<i64>,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    #[serde(default)]
    pub cached_label_column_in_source: Option<String>,
    #[serde(default)]
    pub label_column_in_target: Option<String>,
    #[serde(default)]
    pub insert_new_target_with_source: Option<bool>,
    #[serde(default)]
    pub insert_new_source_with_target: Option<bool>,
}

impl OneToManyRelation {
    pub fn new(
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
            cached_label_column_in_source: None,
            label_column_in_target: None,
            insert_new_target_with_source: None,
            insert_new_source_with_target: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_cached_label(mut self, column: impl Into<String>) -> Self {
        self.cached_label_column_in_source = Some(column.into());
        self
    }

    pub fn with_target_label(mut self, column: impl Into<String>) -> Self {
        self.label_column_in_target = Some(column.into());
        self
    }

    pub fn key(&self) -> OneToManyKey {
        OneToManyKey {
            source_table: self.source_table.clone(),
            source_column: self.source_column.clone(),
            target_table: self.target_table.clone(),
            target_column: self.target_column.clone(),
        }
    }

    /// Value stored in the `reference_direction` column.
    pub fn reference_direction(&self) -> String {
        format!("{}->{}", self.source_table, self.target_table)
    }

    /// The cached label column, if one is set and non-blank.
    pub fn cached_label(&self) -> Option<&str> {
        non_blank(self.cached_label_column_in_source.as_deref())
    }

    /// The curated target label column, if one is set and non-blank.
    pub fn target_label(&self) -> Option<&str> {
        non_blank(self.label_column_in_target.as_deref())
    }
}

impl From<OneToManyKey> for OneToManyRelation {
    fn from(key: OneToManyKey) -> Self {
        Self::new(
            key.source_table,
            key.source_column,
            key.target_table,
            key.target_column,
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Reconciliation key of a many-to-many record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManyToManyKey {
    pub bridging_table: String,
    pub bridging_column_a: String,
    pub table_a: String,
    pub table_a_column: String,
    pub bridging_column_b: String,
    pub table_b: String,
    pub table_b_column: String,
}

impl fmt::Display for ManyToManyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}->{}.{}, {}->{}.{})",
            self.bridging_table,
            self.bridging_column_a,
            self.table_a,
            self.table_a_column,
            self.bridging_column_b,
            self.table_b,
            self.table_b_column
        )
    }
}

/// A row of `foreign_key_relations_m_m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToManyRelation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub key: ManyToManyKey,
}

impl ManyToManyRelation {
    pub fn new(key: ManyToManyKey) -> Self {
        Self { id: None, key }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn key(&self) -> ManyToManyKey {
        self.key.clone()
    }
}
