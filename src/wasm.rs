//! WASM bindings for TypeScript/JavaScript usage.
//!
//! ## Usage from TypeScript
//!
//! ```typescript
//! import init, { compileQuery, tokenizeSearch } from './pkg/pg_table_browser.js';
//!
//! await init();
//!
//! const schema = {
//!   name: "orders",
//!   columns: [
//!     { name: "id", data_type: "integer" },
//!     { name: "customer_id", data_type: "integer",
//!       foreign_key: { target_table: "customers", target_column: "id", display_column: "name" } },
//!   ],
//!   primary_key: ["id"],
//! };
//!
//! const result = compileQuery(schema, [], "customer_name=k*rhu&sort_column=id&sort_order=desc");
//! console.log('SQL:', result.query);
//! console.log('Params:', result.params);
//! console.log('Columns:', result.columns);
//! ```

use crate::ast::{OneToManyRelation, QueryParams, TableSchema};
use crate::catalog::{queries, ForeignKey, PrimaryKeys};
use crate::config::BrowserConfig;
use crate::sync::{plan_one_to_many, SkipReason};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Initialize WASM module (call this first from JavaScript)
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// A compiled row-listing statement, designed for TypeScript consumption.
#[wasm_bindgen]
#[derive(Serialize, Deserialize)]
pub struct WasmQueryResult {
    query: String,
    /// Bound values for $1, $2, ...
    params: Vec<serde_json::Value>,
    columns: Vec<String>,
    tables: Vec<String>,
    count_query: String,
}

#[wasm_bindgen]
impl WasmQueryResult {
    #[wasm_bindgen(getter)]
    pub fn query(&self) -> String {
        self.query.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn params(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.params).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(getter)]
    pub fn columns(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.columns).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(getter)]
    pub fn tables(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.tables).unwrap_or(JsValue::NULL)
    }

    /// Row count statement sharing the leading params
    #[wasm_bindgen(getter, js_name = countQuery)]
    pub fn count_query(&self) -> String {
        self.count_query.clone()
    }

    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self).unwrap_or(JsValue::NULL)
    }
}

/// Split a search string into tokens.
///
/// ```typescript
/// tokenizeSearch("berlin OR !=munich");
/// // [{tag: "INCLUDE", value: "berlin"}, {tag: "OR"}, {tag: "EXCLUDE", value: "munich"}]
/// ```
#[wasm_bindgen(js_name = tokenizeSearch)]
pub fn tokenize_search_wasm(input: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&crate::tokenize_search(input))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Build the WHERE fragment for one column from a raw search string.
///
/// Returns `{ sql, params, nextIndex }`.
#[wasm_bindgen(js_name = buildCondition)]
pub fn build_condition_wasm(column: &str, input: &str, start_index: usize) -> Result<JsValue, JsValue> {
    let column_sql = crate::quote_identifier(column)
        .map_err(|e| JsValue::from_str(&format!("Invalid column: {}", e)))?;
    let condition = crate::build_condition(&column_sql, &crate::tokenize_search(input), start_index.max(1));
    serde_wasm_bindgen::to_value(&condition)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Compile a row-listing query for a table described as JSON.
///
/// # Arguments
///
/// * `schema` - `TableSchema` object (name, columns, primary_key, relations)
/// * `visible` - Array of column names; empty for all columns
/// * `query_string` - Raw request query string (filters, sort_column, sort_order, limit, offset)
#[wasm_bindgen(js_name = compileQuery)]
pub fn compile_query_wasm(
    schema: JsValue,
    visible: JsValue,
    query_string: &str,
) -> Result<WasmQueryResult, JsValue> {
    let schema: TableSchema = serde_wasm_bindgen::from_value(schema)
        .map_err(|e| JsValue::from_str(&format!("Invalid schema: {}", e)))?;
    let visible: Vec<String> = if visible.is_undefined() || visible.is_null() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value(visible)
            .map_err(|e| JsValue::from_str(&format!("Invalid visible columns: {}", e)))?
    };
    let params: QueryParams = crate::parse_query_string(query_string);

    let compiled = crate::compile(&schema, &BrowserConfig::default(), &visible, &params)
        .map_err(|e| JsValue::from_str(&format!("Compile error: {}", e)))?;

    Ok(WasmQueryResult {
        query: compiled.query,
        params: compiled.params,
        columns: compiled.columns,
        tables: compiled.tables,
        count_query: compiled.count_query,
    })
}

#[derive(Deserialize)]
struct PrimaryKeyRow {
    table_name: String,
    columns: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OneToManyPlanView {
    to_insert: Vec<OneToManyInsert>,
    to_delete: Vec<i64>,
    unchanged: usize,
    skipped: Vec<SkipReason>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OneToManyInsert {
    reference_direction: String,
    source_table: String,
    source_column: String,
    target_table: String,
    target_column: String,
}

async fn run_query(query_executor: &js_sys::Function, sql: &str) -> Result<JsValue, JsValue> {
    let this = JsValue::null();
    let promise = query_executor
        .call1(&this, &JsValue::from_str(sql))
        .map_err(|e| JsValue::from_str(&format!("Query executor call failed: {:?}", e)))?;

    let result = wasm_bindgen_futures::JsFuture::from(js_sys::Promise::from(promise))
        .await
        .map_err(|e| JsValue::from_str(&format!("Query execution failed: {:?}", e)))?;

    // Expect { rows: [...] }
    let result_obj = js_sys::Object::from(result);
    js_sys::Reflect::get(&result_obj, &JsValue::from_str("rows"))
        .map_err(|e| JsValue::from_str(&format!("Result missing 'rows' property: {:?}", e)))
}

/// Plan the one-to-many sync through a JavaScript query executor.
///
/// The executor is an async function `(sql: string) => { rows: any[] }`.
/// Nothing is written; the returned plan lists the rows to insert and the
/// ids to delete.
///
/// ```typescript
/// const db = new PGlite();
/// const plan = await planOneToManyFromDb(async (sql) => ({ rows: (await db.query(sql)).rows }));
/// ```
#[wasm_bindgen(js_name = planOneToManyFromDb)]
pub async fn plan_one_to_many_from_db(query_executor: js_sys::Function) -> Result<JsValue, JsValue> {
    let fks: Vec<ForeignKey> = serde_wasm_bindgen::from_value(
        run_query(&query_executor, queries::FOREIGN_KEYS).await?,
    )
    .map_err(|e| JsValue::from_str(&format!("Failed to parse foreign keys: {}", e)))?;

    let pk_rows: Vec<PrimaryKeyRow> = serde_wasm_bindgen::from_value(
        run_query(&query_executor, queries::PRIMARY_KEYS).await?,
    )
    .map_err(|e| JsValue::from_str(&format!("Failed to parse primary keys: {}", e)))?;
    let primary_keys: PrimaryKeys = pk_rows
        .into_iter()
        .map(|row| (row.table_name, row.columns))
        .collect();

    let existing: Vec<OneToManyRelation> = serde_wasm_bindgen::from_value(
        run_query(&query_executor, queries::SELECT_ONE_TO_MANY).await?,
    )
    .map_err(|e| JsValue::from_str(&format!("Failed to parse relations: {}", e)))?;

    let (plan, skipped) = plan_one_to_many(&fks, &primary_keys, &existing);

    web_sys::console::log_1(&JsValue::from_str(&format!(
        "One-to-many plan: {} to insert, {} to delete",
        plan.to_insert.len(),
        plan.to_delete.len()
    )));

    let view = OneToManyPlanView {
        to_insert: plan
            .to_insert
            .into_iter()
            .map(|key| OneToManyInsert {
                reference_direction: OneToManyRelation::from(key.clone()).reference_direction(),
                source_table: key.source_table,
                source_column: key.source_column,
                target_table: key.target_table,
                target_column: key.target_column,
            })
            .collect(),
        to_delete: plan.to_delete.into_iter().map(|(id, _)| id).collect(),
        unchanged: plan.unchanged,
        skipped,
    };
    serde_wasm_bindgen::to_value(&view)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
