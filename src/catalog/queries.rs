//! Catalog and relationship-table SQL.
//!
//! Kept free of any driver types so the WASM bindings can hand the same text
//! to a JavaScript query executor.

/// Every single-column foreign key outside the system schemas.
pub const FOREIGN_KEYS: &str = r#"
SELECT
    con.conname::text AS constraint_name,
    sc.relname::text AS source_table,
    sa.attname::text AS source_column,
    tc.relname::text AS target_table,
    ta.attname::text AS target_column
FROM pg_constraint con
JOIN pg_class sc ON sc.oid = con.conrelid
JOIN pg_namespace sn ON sn.oid = sc.relnamespace
JOIN pg_class tc ON tc.oid = con.confrelid
JOIN pg_attribute sa ON sa.attrelid = sc.oid AND sa.attnum = con.conkey[1]
JOIN pg_attribute ta ON ta.attrelid = tc.oid AND ta.attnum = con.confkey[1]
WHERE con.contype = 'f'
  AND sn.nspname NOT IN ('pg_catalog', 'information_schema')
  AND array_length(con.conkey, 1) = 1
ORDER BY sc.relname, con.conname
"#;

/// Foreign keys whose source is one table (`$1`).
pub const FOREIGN_KEYS_FROM_TABLE: &str = r#"
SELECT
    con.conname::text AS constraint_name,
    sc.relname::text AS source_table,
    sa.attname::text AS source_column,
    tc.relname::text AS target_table,
    ta.attname::text AS target_column
FROM pg_constraint con
JOIN pg_class sc ON sc.oid = con.conrelid
JOIN pg_namespace sn ON sn.oid = sc.relnamespace
JOIN pg_class tc ON tc.oid = con.confrelid
JOIN pg_attribute sa ON sa.attrelid = sc.oid AND sa.attnum = con.conkey[1]
JOIN pg_attribute ta ON ta.attrelid = tc.oid AND ta.attnum = con.confkey[1]
WHERE con.contype = 'f'
  AND sn.nspname = $1
  AND sc.relname = $2
  AND array_length(con.conkey, 1) = 1
ORDER BY con.conname
"#;

/// Primary-key columns grouped by table name (schema deliberately ignored).
pub const PRIMARY_KEYS: &str = r#"
SELECT
    c.relname::text AS table_name,
    array_agg(a.attname::text ORDER BY a.attnum) AS columns
FROM pg_index i
JOIN pg_class c ON c.oid = i.indrelid
JOIN pg_namespace n ON n.oid = c.relnamespace
JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = ANY(i.indkey)
WHERE i.indisprimary
  AND n.nspname NOT IN ('pg_catalog', 'information_schema')
GROUP BY c.relname
"#;

/// Columns of the tables named in `$2` (a `text[]`) of schema `$1`, in
/// ordinal order.
pub const TABLE_COLUMNS: &str = r#"
SELECT
    c.table_name::text AS table_name,
    c.column_name::text AS column_name,
    c.data_type::text AS data_type,
    (c.is_nullable = 'YES') AS nullable,
    (c.is_identity = 'YES') AS is_identity,
    c.ordinal_position::int4 AS ordinal
FROM information_schema.columns c
WHERE c.table_schema = $1
  AND c.table_name = ANY($2)
ORDER BY c.table_name, c.ordinal_position
"#;

/// Tables with exactly two foreign keys, their keys as JSON, column count and primary key.
pub const BRIDGE_CANDIDATES: &str = r#"
SELECT
    c.relname::text AS table_name,
    json_agg(
        json_build_object(
            'constraint_name', con.conname::text,
            'column_name', sa.attname::text,
            'foreign_table', tc.relname::text,
            'foreign_column', ta.attname::text
        )
        ORDER BY sa.attname
    )::text AS foreign_keys,
    (
        SELECT count(*)
        FROM pg_attribute x
        WHERE x.attrelid = c.oid AND x.attnum > 0 AND NOT x.attisdropped
    ) AS column_count,
    COALESCE(
        (
            SELECT array_agg(pa.attname::text ORDER BY pa.attname)
            FROM pg_index pi
            JOIN pg_attribute pa ON pa.attrelid = pi.indrelid AND pa.attnum = ANY(pi.indkey)
            WHERE pi.indrelid = c.oid AND pi.indisprimary
        ),
        ARRAY[]::text[]
    ) AS primary_key
FROM pg_constraint con
JOIN pg_class c ON c.oid = con.conrelid
JOIN pg_namespace n ON n.oid = c.relnamespace
JOIN pg_class tc ON tc.oid = con.confrelid
JOIN pg_attribute sa ON sa.attrelid = c.oid AND sa.attnum = con.conkey[1]
JOIN pg_attribute ta ON ta.attrelid = tc.oid AND ta.attnum = con.confkey[1]
WHERE con.contype = 'f'
  AND n.nspname NOT IN ('pg_catalog', 'information_schema')
  AND array_length(con.conkey, 1) = 1
GROUP BY c.oid, c.relname
HAVING count(*) = 2
   AND (SELECT count(*) FROM pg_constraint k WHERE k.conrelid = c.oid AND k.contype = 'f') = 2
ORDER BY c.relname
"#;

pub const CREATE_ONE_TO_MANY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS foreign_key_relations_1_m (
    id BIGSERIAL PRIMARY KEY,
    reference_direction TEXT NOT NULL,
    source_table TEXT NOT NULL,
    source_column TEXT NOT NULL,
    target_table TEXT NOT NULL,
    target_column TEXT NOT NULL,
    cached_label_column_in_source TEXT,
    label_column_in_target TEXT,
    insert_new_target_with_source BOOLEAN,
    insert_new_source_with_target BOOLEAN,
    UNIQUE (source_table, source_column, target_table, target_column)
)
"#;

pub const CREATE_MANY_TO_MANY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS foreign_key_relations_m_m (
    id BIGSERIAL PRIMARY KEY,
    bridging_table TEXT NOT NULL,
    bridging_column_a TEXT NOT NULL,
    table_a TEXT NOT NULL,
    table_a_column TEXT NOT NULL,
    bridging_column_b TEXT NOT NULL,
    table_b TEXT NOT NULL,
    table_b_column TEXT NOT NULL,
    UNIQUE (
        bridging_table, bridging_column_a, table_a, table_a_column,
        bridging_column_b, table_b, table_b_column
    )
)
"#;

/// Bootstrap DDL for both relationship tables, one statement each.
pub const CREATE_RELATION_TABLES: [&str; 2] = [CREATE_ONE_TO_MANY_TABLE, CREATE_MANY_TO_MANY_TABLE];

pub const SELECT_ONE_TO_MANY: &str = r#"
SELECT id, source_table, source_column, target_table, target_column,
       cached_label_column_in_source, label_column_in_target,
       insert_new_target_with_source, insert_new_source_with_target
FROM foreign_key_relations_1_m
ORDER BY id
"#;

pub const SELECT_ONE_TO_MANY_FROM_TABLE: &str = r#"
SELECT id, source_table, source_column, target_table, target_column,
       cached_label_column_in_source, label_column_in_target,
       insert_new_target_with_source, insert_new_source_with_target
FROM foreign_key_relations_1_m
WHERE source_table = $1
ORDER BY id
"#;

pub const INSERT_ONE_TO_MANY: &str = r#"
INSERT INTO foreign_key_relations_1_m
    (reference_direction, source_table, source_column, target_table, target_column)
VALUES ($1, $2, $3, $4, $5)
"#;

pub const DELETE_ONE_TO_MANY: &str = "DELETE FROM foreign_key_relations_1_m WHERE id = $1";

pub const SELECT_MANY_TO_MANY: &str = r#"
SELECT id, bridging_table, bridging_column_a, table_a, table_a_column,
       bridging_column_b, table_b, table_b_column
FROM foreign_key_relations_m_m
ORDER BY id
"#;

pub const INSERT_MANY_TO_MANY: &str = r#"
INSERT INTO foreign_key_relations_m_m
    (bridging_table, bridging_column_a, table_a, table_a_column,
     bridging_column_b, table_b, table_b_column)
VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

pub const DELETE_MANY_TO_MANY: &str = "DELETE FROM foreign_key_relations_m_m WHERE id = $1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_match_binds() {
        assert!(INSERT_ONE_TO_MANY.contains("$5") && !INSERT_ONE_TO_MANY.contains("$6"));
        assert!(INSERT_MANY_TO_MANY.contains("$7") && !INSERT_MANY_TO_MANY.contains("$8"));
        assert!(TABLE_COLUMNS.contains("ANY($2)"));
    }

    #[test]
    fn test_bridge_query_requires_two_keys() {
        assert!(BRIDGE_CANDIDATES.contains("HAVING count(*) = 2"));
    }
}
