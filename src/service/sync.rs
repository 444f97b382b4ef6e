//! Bulk read and full-table replace of the portal dataset.

use crate::config::WriteMode;
use crate::error::AppError;
use crate::model::{ColumnType, Dataset, Entity, Record};
use crate::sql::{delete_all, insert, select_all, QueryBuf};
use crate::store::ensure_schema;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Connection, PgConnection, Row};

/// Statements that replace one table: a DELETE followed by one INSERT per record.
#[derive(Debug)]
pub struct TableReplace {
    pub entity: Entity,
    pub inserts: Vec<QueryBuf>,
}

/// Validated POST body. Built completely before any statement runs.
#[derive(Debug, Default)]
pub struct WritePlan {
    pub tables: Vec<TableReplace>,
    /// Body keys that are not portal tables.
    pub ignored: Vec<String>,
}

impl WritePlan {
    /// Build the plan from `{ "<entity>": [ {col: val, ...}, ... ], ... }`, keeping body key order.
    /// Unknown keys are ignored; falsy values leave their table untouched; falsy records are skipped.
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::Validation("body must be a JSON object".into()))?;
        let mut plan = WritePlan::default();
        for (key, records) in obj {
            let Some(entity) = Entity::from_name(key) else {
                plan.ignored.push(key.clone());
                continue;
            };
            if is_falsy(records) {
                continue;
            }
            let items = records
                .as_array()
                .ok_or_else(|| AppError::Validation(format!("{} must be an array of records", key)))?;
            let mut inserts = Vec::with_capacity(items.len());
            for item in items {
                if is_falsy(item) {
                    continue;
                }
                let record = item
                    .as_object()
                    .ok_or_else(|| AppError::Validation(format!("{} records must be objects", key)))?;
                inserts.push(insert(entity, record)?);
            }
            plan.tables.push(TableReplace { entity, inserts });
        }
        Ok(plan)
    }
}

/// JSON values that count as "nothing supplied".
fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Rows written per table by one save.
pub type SaveSummary = Vec<(Entity, u64)>;

pub struct SyncService;

impl SyncService {
    /// Ensure schema, then read every table. A table that cannot be read comes back empty.
    pub async fn read_all(conn: &mut PgConnection) -> Result<Dataset, AppError> {
        ensure_schema(conn).await?;
        let mut dataset = Dataset::default();
        for entity in Entity::ALL {
            match Self::read_table(conn, entity).await {
                Ok(rows) => *dataset.table_mut(entity) = rows,
                Err(e) => {
                    tracing::warn!(table = %entity, error = %e, "table read failed, returning empty");
                }
            }
        }
        Ok(dataset)
    }

    async fn read_table(conn: &mut PgConnection, entity: Entity) -> Result<Vec<Record>, AppError> {
        let q = select_all(entity);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query(&q.sql).fetch_all(&mut *conn).await?;
        let records = rows
            .iter()
            .map(|r| row_to_record(entity, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Ensure schema, then replace each planned table in plan order.
    pub async fn replace_tables(
        conn: &mut PgConnection,
        plan: &WritePlan,
        mode: WriteMode,
    ) -> Result<SaveSummary, AppError> {
        match mode {
            WriteMode::Atomic => {
                let mut tx = conn.begin().await?;
                let summary = Self::apply(&mut tx, plan).await?;
                tx.commit().await?;
                Ok(summary)
            }
            WriteMode::PerStatement => Self::apply(conn, plan).await,
        }
    }

    async fn apply(conn: &mut PgConnection, plan: &WritePlan) -> Result<SaveSummary, AppError> {
        ensure_schema(conn).await?;
        let mut summary = Vec::with_capacity(plan.tables.len());
        for table in &plan.tables {
            let removed = Self::execute(conn, &delete_all(table.entity)).await?;
            let mut written = 0u64;
            for q in &table.inserts {
                written += Self::execute(conn, q).await?;
            }
            tracing::debug!(table = %table.entity, removed, written, "table replaced");
            summary.push((table.entity, written));
        }
        Ok(summary)
    }

    async fn execute(conn: &mut PgConnection, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let done = query.execute(&mut *conn).await?;
        Ok(done.rows_affected())
    }
}

fn row_to_record(entity: Entity, row: &PgRow) -> Result<Record, sqlx::Error> {
    let mut map = Record::new();
    for col in entity.columns() {
        let value = match col.ty {
            ColumnType::Integer => row
                .try_get::<Option<i32>, _>(col.name)?
                .map(Value::from)
                .unwrap_or(Value::Null),
            ColumnType::Varchar(_) | ColumnType::Text => row
                .try_get::<Option<String>, _>(col.name)?
                .map(Value::String)
                .unwrap_or(Value::Null),
        };
        map.insert(col.name.to_string(), value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_keeps_body_order_and_skips_unknown_keys() {
        let plan = WritePlan::from_body(&json!({
            "users": [{"id": "u1", "name": "Ann", "role": "admin"}],
            "not_a_table": [{"x": 1}],
            "schools": [{"id": "s1", "name": "Lyceum 1"}, {"id": "s2", "name": "Lyceum 2"}],
        }))
        .unwrap();
        let tables: Vec<(Entity, usize)> = plan.tables.iter().map(|t| (t.entity, t.inserts.len())).collect();
        assert_eq!(tables, vec![(Entity::Users, 1), (Entity::Schools, 2)]);
        assert_eq!(plan.ignored, vec!["not_a_table".to_string()]);
    }

    #[test]
    fn falsy_tables_are_left_untouched() {
        let plan = WritePlan::from_body(&json!({
            "schools": [],
            "users": null,
            "teachers": false,
            "classes": 0,
            "grades": "",
        }))
        .unwrap();
        assert!(plan.tables.is_empty());
    }

    #[test]
    fn falsy_records_are_skipped_but_table_is_still_replaced() {
        let plan = WritePlan::from_body(&json!({"posts": [null, {}]})).unwrap();
        assert_eq!(plan.tables.len(), 1);
        assert_eq!(plan.tables[0].entity, Entity::Posts);
        assert!(plan.tables[0].inserts.is_empty());
    }

    #[test]
    fn heterogeneous_records_get_their_own_columns() {
        let plan = WritePlan::from_body(&json!({"schools": [
            {"id": "s1", "name": "A"},
            {"id": "s2", "name": "B", "address": "Main St"},
        ]}))
        .unwrap();
        let inserts = &plan.tables[0].inserts;
        assert_eq!(inserts[0].params.len(), 2);
        assert_eq!(inserts[1].params.len(), 3);
        assert!(inserts[1].sql.contains("\"address\""));
    }

    #[test]
    fn malformed_bodies_are_rejected_before_any_write() {
        assert!(matches!(WritePlan::from_body(&json!([1, 2])), Err(AppError::Validation(_))));
        assert!(matches!(
            WritePlan::from_body(&json!({"schools": {"id": "s1"}})),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            WritePlan::from_body(&json!({"schools": ["s1"]})),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            WritePlan::from_body(&json!({"schools": [{"id": "s1", "bogus": 1}]})),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn falsiness_matches_json_truthiness() {
        assert!(is_falsy(&json!(0.0)));
        assert!(is_falsy(&json!({})));
        assert!(!is_falsy(&json!(1)));
        assert!(!is_falsy(&json!("x")));
        assert!(!is_falsy(&json!([null])));
    }
}
