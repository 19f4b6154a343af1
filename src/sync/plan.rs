use std::collections::BTreeSet;

/// Inserts and deletes that bring a relationship table in line with the catalog.
///
/// Records are compared by key only; there are no updates, so curated
/// columns of a surviving record are never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan<K> {
    pub to_insert: Vec<K>,
    /// `(id, key)` of records to remove.
    pub to_delete: Vec<(i64, K)>,
    pub unchanged: usize,
}

impl<K> SyncPlan<K> {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

/// Diffs desired keys against persisted `(id, key)` records.
///
/// A second persisted record with an already-seen key is scheduled for
/// deletion.
pub fn plan<K: Ord + Clone>(desired: &BTreeSet<K>, existing: &[(i64, K)]) -> SyncPlan<K> {
    let mut seen = BTreeSet::new();
    let mut to_delete = Vec::new();
    let mut unchanged = 0;

    for (id, key) in existing {
        if desired.contains(key) && seen.insert(key.clone()) {
            unchanged += 1;
        } else {
            to_delete.push((*id, key.clone()));
        }
    }

    let to_insert = desired
        .iter()
        .filter(|key| !seen.contains(*key))
        .cloned()
        .collect();

    SyncPlan {
        to_insert,
        to_delete,
        unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_plan_inserts_missing_and_deletes_stale() {
        let existing = vec![(1, "a".to_string()), (2, "gone".to_string())];
        let result = plan(&set(&["a", "b"]), &existing);
        assert_eq!(result.to_insert, vec!["b".to_string()]);
        assert_eq!(result.to_delete, vec![(2, "gone".to_string())]);
        assert_eq!(result.unchanged, 1);
    }

    #[test]
    fn test_plan_is_empty_when_in_sync() {
        let existing = vec![(1, "a".to_string()), (2, "b".to_string())];
        let result = plan(&set(&["a", "b"]), &existing);
        assert!(result.is_empty());
        assert_eq!(result.unchanged, 2);
    }

    #[test]
    fn test_plan_deletes_duplicate_records() {
        let existing = vec![(1, "a".to_string()), (5, "a".to_string())];
        let result = plan(&set(&["a"]), &existing);
        assert!(result.to_insert.is_empty());
        assert_eq!(result.to_delete, vec![(5, "a".to_string())]);
    }

    #[test]
    fn test_plan_empty_catalog_deletes_everything() {
        let existing = vec![(3, "a".to_string())];
        let result = plan(&BTreeSet::new(), &existing);
        assert_eq!(result.to_delete.len(), 1);
        assert!(result.to_insert.is_empty());
    }
}
