//! Portal sync: a single HTTP endpoint that reads and bulk-replaces the educational portal dataset
//! (schools, users, teachers, classes, students, grades, posts, homework) in PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Settings, WriteMode};
pub use error::{AppError, ConfigError};
pub use model::{Dataset, Entity, Record};
pub use routes::{app, common_routes, sync_routes};
pub use service::{SyncService, WritePlan};
pub use state::AppState;
pub use store::{connect, ensure_schema};
