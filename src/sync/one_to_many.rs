use super::plan::{plan, SyncPlan};
use super::SkipReason;
use crate::ast::{OneToManyKey, OneToManyRelation};
use crate::catalog::{ForeignKey, PrimaryKeys};
use std::collections::BTreeSet;
use tracing::debug;

pub const SINGLE_COLUMN_PRIMARY_KEY: &str = "single_column_primary_key";

/// Foreign keys whose source table has exactly one primary-key column.
///
/// The lookup is by table name only, so a table name shared by two schemas
/// sees the union of their key columns.
pub fn candidates(
    fks: &[ForeignKey],
    primary_keys: &PrimaryKeys,
) -> (BTreeSet<OneToManyKey>, Vec<SkipReason>) {
    let mut keys = BTreeSet::new();
    let mut skipped = Vec::new();

    for fk in fks {
        let pk_len = primary_keys.get(&fk.source_table).map_or(0, Vec::len);
        if pk_len != 1 {
            let reason = SkipReason::new(
                &fk.source_table,
                SINGLE_COLUMN_PRIMARY_KEY,
                format!(
                    "{} has {} primary-key columns, {} not synced",
                    fk.source_table, pk_len, fk.constraint_name
                ),
            );
            debug!(table = %reason.table, reason = %reason.reason, "skipping foreign key");
            skipped.push(reason);
            continue;
        }
        keys.insert(OneToManyKey {
            source_table: fk.source_table.clone(),
            source_column: fk.source_column.clone(),
            target_table: fk.target_table.clone(),
            target_column: fk.target_column.clone(),
        });
    }

    (keys, skipped)
}

/// Plans the 1-to-many pass from catalog facts and the persisted records.
pub fn plan_one_to_many(
    fks: &[ForeignKey],
    primary_keys: &PrimaryKeys,
    existing: &[OneToManyRelation],
) -> (SyncPlan<OneToManyKey>, Vec<SkipReason>) {
    let (desired, skipped) = candidates(fks, primary_keys);
    let existing: Vec<(i64, OneToManyKey)> = existing
        .iter()
        .filter_map(|r| r.id.map(|id| (id, r.key())))
        .collect();
    (plan(&desired, &existing), skipped)
}
