use serde::{Deserialize, Serialize};

/// One classified unit of a column's search string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchToken {
    /// Joins the next term with AND.
    And,
    /// Joins the next term with OR.
    Or,
    /// Explicit "match everything".
    All,
    /// Substring match; an empty value means "NULL or empty".
    Include(String),
    /// Negated substring match; an empty value means "not NULL and not empty".
    Exclude(String),
}

impl SearchToken {
    pub fn include(value: impl Into<String>) -> Self {
        SearchToken::Include(value.into())
    }

    pub fn exclude(value: impl Into<String>) -> Self {
        SearchToken::Exclude(value.into())
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            SearchToken::Include(v) | SearchToken::Exclude(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_value() {
        assert_eq!(SearchToken::include("abc").value(), Some("abc"));
        assert_eq!(SearchToken::exclude("").value(), Some(""));
        assert_eq!(SearchToken::All.value(), None);
    }

    #[test]
    fn test_token_serialization() {
        let json = serde_json::to_string(&SearchToken::include("k*rhu")).unwrap();
        assert_eq!(json, r#"{"tag":"INCLUDE","value":"k*rhu"}"#);
        let json = serde_json::to_string(&SearchToken::Or).unwrap();
        assert_eq!(json, r#"{"tag":"OR"}"#);
    }
}
