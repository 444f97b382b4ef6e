//! Convert serde_json::Value to types that sqlx can bind.

use crate::error::AppError;
use crate::model::ColumnType;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A cell value bound to a PostgreSQL query, already converted to its column's type.
/// The wire type depends only on the column, so one INSERT text always carries the same parameter types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PgBindValue {
    Text(Option<String>),
    Integer(Option<i64>),
}

impl PgBindValue {
    /// Convert a scalar for a column of type `ty`. Arrays and objects are rejected, as are
    /// non-numeric values for integer columns.
    pub fn for_column(v: &Value, ty: ColumnType) -> Result<Self, AppError> {
        if matches!(v, Value::Array(_) | Value::Object(_)) {
            return Err(AppError::Validation("values must be scalars".into()));
        }
        Ok(match ty {
            ColumnType::Integer => PgBindValue::Integer(integer_from_json(v)?),
            ColumnType::Varchar(_) | ColumnType::Text => PgBindValue::Text(text_from_json(v)),
        })
    }
}

/// Fractional numbers round half away from zero, the way PostgreSQL assigns a numeric to an integer column.
fn integer_from_json(v: &Value) -> Result<Option<i64>, AppError> {
    let invalid = || AppError::Validation(format!("expected an integer, got {}", v));
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Some(i)),
            (None, Some(f)) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(Some(f.round() as i64)),
            _ => Err(invalid()),
        },
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn text_from_json(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Text(s) => <Option<String> as Encode<Postgres>>::encode_by_ref(s, buf)?,
            PgBindValue::Integer(n) => <Option<i64> as Encode<Postgres>>::encode_by_ref(n, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Text(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Integer(_) => <i64 as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}
