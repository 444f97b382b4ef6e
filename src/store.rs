//! Portal table DDL and connection setup.

use crate::config::Settings;
use crate::error::AppError;
use crate::model::Entity;
use crate::sql::create_table;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};

/// Create every portal table if it does not exist. Safe to run on every request.
pub async fn ensure_schema(conn: &mut PgConnection) -> Result<(), AppError> {
    for entity in Entity::ALL {
        let ddl = create_table(entity);
        sqlx::query(&ddl).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Build the pool from settings. Returns `None` when no database is configured (offline mode).
/// The pool connects lazily, so an unreachable database fails the request rather than startup.
pub fn connect(settings: &Settings) -> Result<Option<PgPool>, AppError> {
    let Some(url) = settings.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; serving empty dataset (offline mode)");
        return Ok(None);
    };
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_lazy(url)?;
    Ok(Some(pool))
}
