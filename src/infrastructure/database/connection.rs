use diesel::{
    PgConnection,
    r2d2::{self, ConnectionManager},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::domain::repositories::RepositoryError;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Debug)]
pub enum DatabaseError {
    PoolError(String),
    MigrationError(String),
}

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::PoolError(msg) => write!(f, "Pool error: {}", msg),
            DatabaseError::MigrationError(msg) => write!(f, "Migration error: {}", msg),
        }
    }
}

impl std::error::Error for DatabaseError {}

pub fn create_connection_pool(database_url: &str) -> Result<DbPool, DatabaseError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    r2d2::Pool::builder()
        .max_size(10)
        .min_idle(Some(1))
        .build(manager)
        .map_err(|e| DatabaseError::PoolError(e.to_string()))
}

pub fn get_connection_from_pool(pool: &DbPool) -> Result<DbConnection, DatabaseError> {
    pool.get()
        .map_err(|e| DatabaseError::PoolError(e.to_string()))
}

pub fn run_migrations(pool: &DbPool) -> Result<usize, DatabaseError> {
    let mut conn = get_connection_from_pool(pool)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    Ok(applied.len())
}

/// Runs a blocking diesel closure on the blocking pool with a pooled
/// connection.
pub async fn with_connection<F, T>(pool: &DbPool, f: F) -> Result<T, RepositoryError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, RepositoryError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = get_connection_from_pool(&pool)
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        f(&mut conn)
    })
    .await
    .map_err(|e| RepositoryError::DatabaseError(format!("Blocking task failed: {}", e)))?
}
