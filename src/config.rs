//! Runtime settings for the compiler and the relationship synchronizers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

fn default_schema() -> String {
    "public".to_string()
}

fn default_page_size() -> u64 {
    50
}

fn default_max_page_size() -> u64 {
    500
}

fn default_reserved_keys() -> BTreeSet<String> {
    [
        "table",
        "sort_column",
        "sort_order",
        "offset",
        "limit",
        "page",
        "columns",
        "search",
        "format",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_display_overrides() -> BTreeMap<String, String> {
    [("users", "email"), ("files", "name")]
        .iter()
        .map(|(t, c)| (t.to_string(), c.to_string()))
        .collect()
}

fn default_bridging_markers() -> Vec<String> {
    ["_relation", "_join", "_assoc", "_zuordnung"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_bridging_columns() -> usize {
    6
}

/// Settings shared by [`crate::QueryCompiler`] and the synchronizers.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use pg_table_browser::BrowserConfig;
///
/// let config = BrowserConfig::from_json_str(r#"{"page_size": 25}"#).unwrap();
/// assert_eq!(config.page_size, 25);
/// assert_eq!(config.schema, "public");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Namespace used for column and display-column lookups.
    pub schema: String,
    /// Rows per page when the request does not ask for a limit.
    pub page_size: u64,
    /// Upper bound applied to a requested `limit`.
    pub max_page_size: u64,
    /// Query parameter names that are never treated as column filters.
    pub reserved_keys: BTreeSet<String>,
    /// Display column for known system tables, keyed by table name.
    pub display_column_overrides: BTreeMap<String, String>,
    /// Substrings (matched case-insensitively) that mark a bridging table name.
    pub bridging_markers: Vec<String>,
    /// Bridging tables with more columns than this are not considered.
    pub max_bridging_columns: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            reserved_keys: default_reserved_keys(),
            display_column_overrides: default_display_overrides(),
            bridging_markers: default_bridging_markers(),
            max_bridging_columns: default_max_bridging_columns(),
        }
    }
}

impl BrowserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn with_reserved_key(mut self, key: impl Into<String>) -> Self {
        self.reserved_keys.insert(key.into());
        self
    }

    pub fn with_display_override(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.display_column_overrides
            .insert(table.into(), column.into());
        self
    }

    pub fn with_bridging_markers(mut self, markers: Vec<String>) -> Self {
        self.bridging_markers = markers;
        self
    }

    pub fn with_max_bridging_columns(mut self, max: usize) -> Self {
        self.max_bridging_columns = max;
        self
    }

    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved_keys.contains(key)
    }

    /// Effective page size for a requested limit.
    pub fn clamp_limit(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(0) | None => self.page_size.min(self.max_page_size),
            Some(n) => n.min(self.max_page_size),
        }
    }
}
