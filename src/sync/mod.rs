//! Reconciles catalog foreign keys into the relationship tables.
//!
//! Planning is pure: catalog rows and persisted records in, a [`SyncPlan`]
//! out. [`RelationSynchronizer`] (feature `postgres`) loads the inputs and
//! applies the plan one statement at a time.

pub mod many_to_many;
pub mod one_to_many;
pub mod plan;
#[cfg(feature = "postgres")]
mod runner;

pub use many_to_many::{is_likely_bridging_table, plan_many_to_many};
pub use one_to_many::plan_one_to_many;
pub use plan::SyncPlan;
#[cfg(feature = "postgres")]
pub use runner::RelationSynchronizer;

use serde::Serialize;
use std::fmt;

/// Why a catalog object was not turned into a relationship record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipReason {
    pub table: String,
    /// Name of the failed check.
    pub check: String,
    pub reason: String,
}

impl SkipReason {
    pub fn new(
        table: impl Into<String>,
        check: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            check: check.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.table, self.check, self.reason)
    }
}

/// Outcome of one or more sync passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub inserted: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub skipped: Vec<SkipReason>,
}

impl SyncReport {
    pub fn from_plan<K>(plan: &SyncPlan<K>, skipped: Vec<SkipReason>) -> Self {
        Self {
            inserted: plan.to_insert.len(),
            deleted: plan.to_delete.len(),
            unchanged: plan.unchanged,
            skipped,
        }
    }

    /// True when the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }

    pub fn merge(mut self, other: SyncReport) -> Self {
        self.inserted += other.inserted;
        self.deleted += other.deleted;
        self.unchanged += other.unchanged;
        self.skipped.extend(other.skipped);
        self
    }
}
