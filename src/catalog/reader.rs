use super::{queries, BridgeCandidate, CatalogColumn, ForeignKey, PrimaryKeys};
use crate::ast::{ManyToManyKey, ManyToManyRelation, OneToManyRelation};
use crate::error::Error;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;

fn foreign_key_from_row(row: &PgRow) -> Result<ForeignKey, sqlx::Error> {
    Ok(ForeignKey {
        constraint_name: row.try_get("constraint_name")?,
        source_table: row.try_get("source_table")?,
        source_column: row.try_get("source_column")?,
        target_table: row.try_get("target_table")?,
        target_column: row.try_get("target_column")?,
    })
}

fn column_from_row(row: &PgRow) -> Result<CatalogColumn, sqlx::Error> {
    Ok(CatalogColumn {
        table_name: row.try_get("table_name")?,
        column_name: row.try_get("column_name")?,
        data_type: row.try_get("data_type")?,
        nullable: row.try_get("nullable")?,
        is_identity: row.try_get("is_identity")?,
        ordinal: row.try_get("ordinal")?,
    })
}

fn one_to_many_from_row(row: &PgRow) -> Result<OneToManyRelation, sqlx::Error> {
    Ok(OneToManyRelation {
        id: Some(row.try_get("id")?),
        source_table: row.try_get("source_table")?,
        source_column: row.try_get("source_column")?,
        target_table: row.try_get("target_table")?,
        target_column: row.try_get("target_column")?,
        cached_label_column_in_source: row.try_get("cached_label_column_in_source")?,
        label_column_in_target: row.try_get("label_column_in_target")?,
        insert_new_target_with_source: row.try_get("insert_new_target_with_source")?,
        insert_new_source_with_target: row.try_get("insert_new_source_with_target")?,
    })
}

/// All single-column foreign keys outside the system schemas.
pub async fn foreign_keys(pool: &PgPool) -> Result<Vec<ForeignKey>, Error> {
    let rows = sqlx::query(queries::FOREIGN_KEYS).fetch_all(pool).await?;
    let fks = rows
        .iter()
        .map(foreign_key_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fks)
}

pub async fn foreign_keys_from_table(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<ForeignKey>, Error> {
    let rows = sqlx::query(queries::FOREIGN_KEYS_FROM_TABLE)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await?;
    let fks = rows
        .iter()
        .map(foreign_key_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fks)
}

pub async fn primary_keys(pool: &PgPool) -> Result<PrimaryKeys, Error> {
    let rows = sqlx::query(queries::PRIMARY_KEYS).fetch_all(pool).await?;
    let mut keys = HashMap::with_capacity(rows.len());
    for row in rows {
        let table: String = row.try_get("table_name")?;
        let columns: Vec<String> = row.try_get("columns")?;
        keys.insert(table, columns);
    }
    Ok(keys)
}

/// Columns of `tables` in ordinal order; tables that do not exist are absent.
pub async fn table_columns(
    pool: &PgPool,
    schema: &str,
    tables: &[String],
) -> Result<Vec<CatalogColumn>, Error> {
    let rows = sqlx::query(queries::TABLE_COLUMNS)
        .bind(schema)
        .bind(tables)
        .fetch_all(pool)
        .await?;
    let columns = rows
        .iter()
        .map(column_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

pub async fn bridge_candidates(pool: &PgPool) -> Result<Vec<BridgeCandidate>, Error> {
    let rows = sqlx::query(queries::BRIDGE_CANDIDATES)
        .fetch_all(pool)
        .await?;
    let mut candidates = Vec::with_capacity(rows.len());
    for row in rows {
        let table_name: String = row.try_get("table_name")?;
        let fk_json: String = row.try_get("foreign_keys")?;
        let foreign_keys = BridgeCandidate::parse_foreign_keys(&table_name, &fk_json)?;
        candidates.push(BridgeCandidate {
            table_name,
            foreign_keys,
            column_count: row.try_get("column_count")?,
            primary_key: row.try_get("primary_key")?,
        });
    }
    Ok(candidates)
}

pub async fn one_to_many_relations(pool: &PgPool) -> Result<Vec<OneToManyRelation>, Error> {
    let rows = sqlx::query(queries::SELECT_ONE_TO_MANY)
        .fetch_all(pool)
        .await?;
    let relations = rows
        .iter()
        .map(one_to_many_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(relations)
}

pub async fn one_to_many_relations_from_table(
    pool: &PgPool,
    table: &str,
) -> Result<Vec<OneToManyRelation>, Error> {
    let rows = sqlx::query(queries::SELECT_ONE_TO_MANY_FROM_TABLE)
        .bind(table)
        .fetch_all(pool)
        .await?;
    let relations = rows
        .iter()
        .map(one_to_many_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(relations)
}

pub async fn many_to_many_relations(pool: &PgPool) -> Result<Vec<ManyToManyRelation>, Error> {
    let rows = sqlx::query(queries::SELECT_MANY_TO_MANY)
        .fetch_all(pool)
        .await?;
    let mut relations = Vec::with_capacity(rows.len());
    for row in rows {
        let key = ManyToManyKey {
            bridging_table: row.try_get("bridging_table")?,
            bridging_column_a: row.try_get("bridging_column_a")?,
            table_a: row.try_get("table_a")?,
            table_a_column: row.try_get("table_a_column")?,
            bridging_column_b: row.try_get("bridging_column_b")?,
            table_b: row.try_get("table_b")?,
            table_b_column: row.try_get("table_b_column")?,
        };
        relations.push(ManyToManyRelation::new(key).with_id(row.try_get("id")?));
    }
    Ok(relations)
}
