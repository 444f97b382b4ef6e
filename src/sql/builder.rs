//! Builds DDL, full-table SELECT and DELETE, and per-record INSERT for catalog entities.

use crate::error::AppError;
use crate::model::{Entity, Record, PRIMARY_KEY};
use crate::sql::params::PgBindValue;

/// Quote identifier for PostgreSQL (safe: only from the catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// CREATE TABLE IF NOT EXISTS from the catalog columns.
pub fn create_table(entity: Entity) -> String {
    let col_defs: Vec<String> = entity
        .columns()
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", quoted(c.name), c.ty.ddl());
            if c.name == PRIMARY_KEY {
                def.push_str(" PRIMARY KEY");
            } else if !c.nullable {
                def.push_str(" NOT NULL");
            }
            def
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quoted(entity.name()),
        col_defs.join(",\n  ")
    )
}

/// SELECT every column in declaration order, ordered by primary key.
pub fn select_all(entity: Entity) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols: Vec<String> = entity.columns().iter().map(|c| quoted(c.name)).collect();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        cols.join(", "),
        quoted(entity.name()),
        quoted(PRIMARY_KEY)
    );
    q
}

pub fn delete_all(entity: Entity) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {}", quoted(entity.name()));
    q
}

/// INSERT using exactly the columns present in `record`, in record order.
/// Every column must belong to the entity; values are converted to the column type and bound.
pub fn insert(entity: Entity, record: &Record) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(record.len());
    let mut placeholders = Vec::with_capacity(record.len());
    for (name, value) in record {
        let column = entity.column(name).ok_or_else(|| {
            AppError::Validation(format!("unknown column '{}' for {}", name, entity))
        })?;
        let bind = PgBindValue::for_column(value, column.ty).map_err(|e| match e {
            AppError::Validation(msg) => {
                AppError::Validation(format!("{}.{}: {}", entity, name, msg))
            }
            other => other,
        })?;
        let param_num = q.push_param(bind);
        cols.push(quoted(column.name));
        placeholders.push(format!("${}::{}", param_num, column.ty.cast()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(entity.name()),
        cols.join(", "),
        placeholders.join(", ")
    );
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: serde_json::Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn create_table_follows_catalog() {
        let sql = create_table(Entity::Schools);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"schools\""));
        assert!(sql.contains("\"id\" VARCHAR(50) PRIMARY KEY"));
        assert!(sql.contains("\"name\" VARCHAR(255) NOT NULL"));
        assert!(sql.contains("\"address\" VARCHAR(500)\n"));
        let grades = create_table(Entity::Grades);
        assert!(grades.contains("\"grade\" INTEGER NOT NULL"));
        assert!(create_table(Entity::Posts).contains("\"content\" TEXT NOT NULL"));
    }

    #[test]
    fn select_lists_columns_in_order() {
        let q = select_all(Entity::Classes);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"grade\", \"school_id\", \"teacher_id\" FROM \"classes\" ORDER BY \"id\""
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn delete_clears_whole_table() {
        assert_eq!(delete_all(Entity::Homework).sql, "DELETE FROM \"homework\"");
    }

    #[test]
    fn insert_uses_only_present_columns() {
        let q = insert(
            Entity::Classes,
            &record(json!({"id": "c1", "grade": 7, "name": "7A", "school_id": "s1"})),
        )
        .unwrap();
        assert_eq!(
            q.sql,
            "INSERT INTO \"classes\" (\"id\", \"grade\", \"name\", \"school_id\") VALUES ($1::varchar, $2::integer, $3::varchar, $4::varchar)"
        );
        assert_eq!(
            q.params,
            vec![
                PgBindValue::Text(Some("c1".into())),
                PgBindValue::Integer(Some(7)),
                PgBindValue::Text(Some("7A".into())),
                PgBindValue::Text(Some("s1".into())),
            ]
        );
    }

    #[test]
    fn insert_keeps_explicit_nulls() {
        let q = insert(
            Entity::Schools,
            &record(json!({"id": "s1", "name": "Lyceum 1", "address": null})),
        )
        .unwrap();
        assert_eq!(q.params[2], PgBindValue::Text(None));
    }

    #[test]
    fn insert_rejects_unknown_columns() {
        let err = insert(
            Entity::Schools,
            &record(json!({"id": "s1", "name) VALUES ('x'); --": "x"})),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("unknown column")));
    }

    #[test]
    fn insert_rejects_non_integer_grade() {
        let err = insert(Entity::Grades, &record(json!({"id": "g1", "grade": "A+"}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("grades.grade")));
    }

    #[test]
    fn insert_rejects_nested_values() {
        let err = insert(Entity::Schools, &record(json!({"id": "s1", "name": ["a"]}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("schools.name")));
    }
}
