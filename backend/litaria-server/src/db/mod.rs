/// Database access layer
///
/// Flat async repository functions per entity, all plain SQL over sqlx.
/// Handlers never touch SQL directly; services compose these functions and
/// own transaction boundaries.
pub mod category_repo;
pub mod post_repo;
pub mod subcategory_repo;
pub mod user_repo;

use crate::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create the Postgres connection pool.
pub async fn create_pool(cfg: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect(&cfg.url)
        .await
}

/// Run pending SQL migrations from the crate's migrations/ directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
