use super::OneToManyRelation;
use serde::{Deserialize, Serialize};

/// Where a foreign-key column points, and which column of the target to show.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub target_table: String,
    pub target_column: String,
    /// Resolved display column on the target table, if any.
    #[serde(default)]
    pub display_column: Option<String>,
}

impl ForeignKeyRef {
    pub fn new(target_table: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            target_table: target_table.into(),
            target_column: target_column.into(),
            display_column: None,
        }
    }

    pub fn with_display_column(mut self, column: impl Into<String>) -> Self {
        self.display_column = Some(column.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub is_identity: bool,
    #[serde(default)]
    pub foreign_key: Option<ForeignKeyRef>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            is_identity: false,
            foreign_key: None,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn identity(mut self, is_identity: bool) -> Self {
        self.is_identity = is_identity;
        self
    }

    pub fn references(mut self, foreign_key: ForeignKeyRef) -> Self {
        self.foreign_key = Some(foreign_key);
        self
    }

    pub fn is_text(&self) -> bool {
        is_text_type(&self.data_type)
    }

    /// Name under which a foreign key's label is returned: `customer_id` -> `customer_name`.
    pub fn label_name(&self) -> String {
        let base = self
            .name
            .strip_suffix("_uid")
            .or_else(|| self.name.strip_suffix("_id"))
            .filter(|b| !b.is_empty())
            .unwrap_or(&self.name);
        format!("{}_name", base)
    }
}

/// Postgres type names that count as human-readable text.
pub fn is_text_type(data_type: &str) -> bool {
    matches!(
        data_type.to_lowercase().as_str(),
        "text" | "character varying" | "varchar" | "character" | "char" | "bpchar" | "citext"
    )
}

/// Everything the compiler needs to know about one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// One-to-many records whose source is this table.
    #[serde(default)]
    pub relations: Vec<OneToManyRelation>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_primary_key(mut self, primary_key: Vec<String>) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn with_relations(mut self, relations: Vec<OneToManyRelation>) -> Self {
        self.relations = relations;
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The persisted relation for a foreign-key column of this table.
    pub fn relation_for(&self, column: &ColumnDescriptor) -> Option<&OneToManyRelation> {
        let fk = column.foreign_key.as_ref()?;
        self.relations.iter().find(|r| {
            r.source_table == self.name
                && r.source_column == column.name
                && r.target_table == fk.target_table
                && r.target_column == fk.target_column
        })
    }
}
