use super::plan::{plan, SyncPlan};
use super::SkipReason;
use crate::ast::{ManyToManyKey, ManyToManyRelation};
use crate::catalog::{BridgeCandidate, BridgeForeignKey};
use crate::config::BrowserConfig;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

type Check = fn(&BridgeCandidate, &BrowserConfig) -> Result<(), String>;

/// Bridging predicates, evaluated in order; the first failure is reported.
const CHECKS: &[(&str, Check)] = &[
    ("foreign_key_count", check_foreign_key_count),
    ("naming_marker", check_naming_marker),
    ("column_count", check_column_count),
    ("primary_key", check_primary_key),
];

fn check_foreign_key_count(candidate: &BridgeCandidate, _: &BrowserConfig) -> Result<(), String> {
    match candidate.foreign_keys.len() {
        2 => Ok(()),
        n => Err(format!("has {} foreign keys, expected 2", n)),
    }
}

fn check_naming_marker(candidate: &BridgeCandidate, config: &BrowserConfig) -> Result<(), String> {
    let name = candidate.table_name.to_lowercase();
    if config
        .bridging_markers
        .iter()
        .any(|marker| name.contains(&marker.to_lowercase()))
    {
        Ok(())
    } else {
        Err(format!(
            "name contains none of {}",
            config.bridging_markers.join(", ")
        ))
    }
}

fn check_column_count(candidate: &BridgeCandidate, config: &BrowserConfig) -> Result<(), String> {
    if candidate.column_count <= config.max_bridging_columns as i64 {
        Ok(())
    } else {
        Err(format!(
            "has {} columns, at most {} allowed",
            candidate.column_count, config.max_bridging_columns
        ))
    }
}

fn check_primary_key(candidate: &BridgeCandidate, _: &BrowserConfig) -> Result<(), String> {
    if candidate.primary_key.len() != 2 {
        return Err(format!(
            "primary key has {} columns, expected 2",
            candidate.primary_key.len()
        ));
    }
    let pk: HashSet<&str> = candidate.primary_key.iter().map(String::as_str).collect();
    let fk_columns: HashSet<&str> = candidate
        .foreign_keys
        .iter()
        .map(|fk| fk.column_name.as_str())
        .collect();
    if pk == fk_columns {
        Ok(())
    } else {
        Err(format!(
            "primary key ({}) is not the foreign-key columns",
            candidate.primary_key.join(", ")
        ))
    }
}

/// Classifies a table with two foreign keys as a bridge, or says why not.
///
/// Both keys may reference the same table.
pub fn is_likely_bridging_table(
    candidate: &BridgeCandidate,
    config: &BrowserConfig,
) -> Result<ManyToManyKey, SkipReason> {
    for (name, check) in CHECKS {
        check(candidate, config)
            .map_err(|reason| SkipReason::new(&candidate.table_name, *name, reason))?;
    }

    let mut fks: Vec<&BridgeForeignKey> = candidate.foreign_keys.iter().collect();
    fks.sort_by(|x, y| x.column_name.cmp(&y.column_name));
    let (a, b) = (fks[0], fks[1]);

    Ok(ManyToManyKey {
        bridging_table: candidate.table_name.clone(),
        bridging_column_a: a.column_name.clone(),
        table_a: a.foreign_table.clone(),
        table_a_column: a.foreign_column.clone(),
        bridging_column_b: b.column_name.clone(),
        table_b: b.foreign_table.clone(),
        table_b_column: b.foreign_column.clone(),
    })
}

pub fn candidates(
    tables: &[BridgeCandidate],
    config: &BrowserConfig,
) -> (BTreeSet<ManyToManyKey>, Vec<SkipReason>) {
    let mut keys = BTreeSet::new();
    let mut skipped = Vec::new();
    for table in tables {
        match is_likely_bridging_table(table, config) {
            Ok(key) => {
                keys.insert(key);
            }
            Err(reason) => {
                debug!(
                    table = %reason.table,
                    check = %reason.check,
                    reason = %reason.reason,
                    "not a bridging table"
                );
                skipped.push(reason);
            }
        }
    }
    (keys, skipped)
}

pub fn plan_many_to_many(
    tables: &[BridgeCandidate],
    config: &BrowserConfig,
    existing: &[ManyToManyRelation],
) -> (SyncPlan<ManyToManyKey>, Vec<SkipReason>) {
    let (desired, skipped) = candidates(tables, config);
    let existing: Vec<(i64, ManyToManyKey)> = existing
        .iter()
        .filter_map(|r| r.id.map(|id| (id, r.key())))
        .collect();
    (plan(&desired, &existing), skipped)
}
