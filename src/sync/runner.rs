use super::{plan_many_to_many, plan_one_to_many, SyncReport};
use crate::ast::{ManyToManyKey, OneToManyKey, OneToManyRelation};
use crate::catalog::{self, queries};
use crate::config::BrowserConfig;
use crate::error::{Error, SyncError};
use sqlx::PgPool;
use tracing::{info, warn};

/// Applies sync plans against a live database.
///
/// Passes must not run concurrently with each other; nothing here locks.
#[derive(Debug, Clone)]
pub struct RelationSynchronizer {
    pool: PgPool,
    config: BrowserConfig,
}

impl RelationSynchronizer {
    pub fn new(pool: PgPool, config: BrowserConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Creates both relationship tables if they are missing.
    pub async fn ensure_tables(&self) -> Result<(), Error> {
        for ddl in catalog::CREATE_RELATION_TABLES {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn sync_one_to_many(&self) -> Result<SyncReport, Error> {
        let fks = catalog::foreign_keys(&self.pool).await?;
        let primary_keys = catalog::primary_keys(&self.pool).await?;
        let existing = catalog::one_to_many_relations(&self.pool).await?;

        let (plan, skipped) = plan_one_to_many(&fks, &primary_keys, &existing);
        let report = SyncReport::from_plan(&plan, skipped);

        for key in &plan.to_insert {
            self.insert_one_to_many(key).await.map_err(|e| {
                warn!(key = %key, error = %e, "one-to-many sync aborted");
                e
            })?;
        }
        for (id, key) in &plan.to_delete {
            self.delete(queries::DELETE_ONE_TO_MANY, *id).await.map_err(|e| {
                warn!(id = *id, key = %key, error = %e, "one-to-many sync aborted");
                e
            })?;
        }

        info!(
            inserted = report.inserted,
            deleted = report.deleted,
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            "one-to-many relations synced"
        );
        Ok(report)
    }

    pub async fn sync_many_to_many(&self) -> Result<SyncReport, Error> {
        let tables = catalog::bridge_candidates(&self.pool).await?;
        let existing = catalog::many_to_many_relations(&self.pool).await?;

        let (plan, skipped) = plan_many_to_many(&tables, &self.config, &existing);
        let report = SyncReport::from_plan(&plan, skipped);

        for key in &plan.to_insert {
            self.insert_many_to_many(key).await.map_err(|e| {
                warn!(key = %key, error = %e, "many-to-many sync aborted");
                e
            })?;
        }
        for (id, key) in &plan.to_delete {
            self.delete(queries::DELETE_MANY_TO_MANY, *id).await.map_err(|e| {
                warn!(id = *id, key = %key, error = %e, "many-to-many sync aborted");
                e
            })?;
        }

        info!(
            inserted = report.inserted,
            deleted = report.deleted,
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            "many-to-many relations synced"
        );
        Ok(report)
    }

    /// One-to-many pass, then many-to-many.
    pub async fn sync_all(&self) -> Result<SyncReport, Error> {
        let one_to_many = self.sync_one_to_many().await?;
        let many_to_many = self.sync_many_to_many().await?;
        Ok(one_to_many.merge(many_to_many))
    }

    async fn insert_one_to_many(&self, key: &OneToManyKey) -> Result<(), SyncError> {
        let direction = OneToManyRelation::from(key.clone()).reference_direction();
        sqlx::query(queries::INSERT_ONE_TO_MANY)
            .bind(direction)
            .bind(&key.source_table)
            .bind(&key.source_column)
            .bind(&key.target_table)
            .bind(&key.target_column)
            .execute(&self.pool)
            .await
            .map_err(|e| SyncError::Insert {
                key: key.to_string(),
                source: Box::new(e),
            })?;
        Ok(())
    }

    async fn insert_many_to_many(&self, key: &ManyToManyKey) -> Result<(), SyncError> {
        sqlx::query(queries::INSERT_MANY_TO_MANY)
            .bind(&key.bridging_table)
            .bind(&key.bridging_column_a)
            .bind(&key.table_a)
            .bind(&key.table_a_column)
            .bind(&key.bridging_column_b)
            .bind(&key.table_b)
            .bind(&key.table_b_column)
            .execute(&self.pool)
            .await
            .map_err(|e| SyncError::Insert {
                key: key.to_string(),
                source: Box::new(e),
            })?;
        Ok(())
    }

    async fn delete(&self, statement: &str, id: i64) -> Result<(), SyncError> {
        sqlx::query(statement)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| SyncError::Delete {
                id,
                source: Box::new(e),
            })?;
        Ok(())
    }
}
