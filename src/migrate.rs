//! Schema migration runner with suite-driven driver selection.
//!
//! Runs only when the `Migration` feature is active. The SQL driver is
//! picked by feature test in a fixed priority order — `MySQL`, then
//! `PostgreSQL`/`Postgres`, then `Sqlite3` — with MySQL as the default
//! when nothing matches. The chosen driver determines both the sqlx
//! pool and which embedded script directory is applied; the scripts
//! themselves are dialect-specific copies of the same baseline schema.

use crate::config::features::Suite;
use crate::config::Settings;
use crate::error::PatchbayError;
use crate::select::BackendSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDriver {
    MySql,
    Postgres,
    Sqlite,
}

impl SqlDriver {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Postgres => "Postgres",
            Self::Sqlite => "Sqlite3",
        }
    }
}

/// Resolve which SQL driver this suite selects. Deterministic: first
/// match in declaration order, MySQL when no database feature is
/// active.
pub fn select_driver(suite: &Suite) -> Result<SqlDriver, PatchbayError> {
    BackendSelector::new("sql driver")
        .when("MySQL", || Ok(SqlDriver::MySql))
        .when("PostgreSQL", || Ok(SqlDriver::Postgres))
        .when("Postgres", || Ok(SqlDriver::Postgres))
        .when("Sqlite3", || Ok(SqlDriver::Sqlite))
        .or_default("MySQL", || Ok(SqlDriver::MySql))
        .select(suite)
}

/// Apply pending migrations through the selected driver.
pub async fn run(settings: &Settings, suite: &Suite) -> Result<(), PatchbayError> {
    if !suite.cfg_if("Migration") {
        tracing::info!("skipping schema migration; Migration feature is not in the suite");
        return Ok(());
    }

    let driver = select_driver(suite)?;
    tracing::info!(driver = driver.name(), "running schema migration");

    match driver {
        SqlDriver::MySql => run_mysql(settings).await,
        SqlDriver::Postgres => run_postgres(settings).await,
        SqlDriver::Sqlite => run_sqlite(settings).await,
    }
}

#[cfg(any(feature = "mysql", feature = "postgres", feature = "sqlite"))]
fn db_err<E>(backend: &'static str) -> impl FnOnce(E) -> PatchbayError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| PatchbayError::Database {
        backend,
        source: Box::new(e),
    }
}

#[cfg(feature = "mysql")]
async fn run_mysql(settings: &Settings) -> Result<(), PatchbayError> {
    let pool = sqlx::MySqlPool::connect(&settings.mysql.dsn())
        .await
        .map_err(db_err("mysql"))?;
    sqlx::migrate!("migrations/mysql")
        .run(&pool)
        .await
        .map_err(db_err("mysql"))?;
    tracing::info!(driver = "mysql", "schema migration complete");
    Ok(())
}

#[cfg(not(feature = "mysql"))]
async fn run_mysql(_settings: &Settings) -> Result<(), PatchbayError> {
    Err(PatchbayError::BackendUnavailable {
        backend: "MySQL",
        hint: "rebuild with --features mysql",
    })
}

#[cfg(feature = "postgres")]
async fn run_postgres(settings: &Settings) -> Result<(), PatchbayError> {
    let pool = sqlx::PgPool::connect(&settings.postgres.dsn())
        .await
        .map_err(db_err("postgres"))?;
    sqlx::migrate!("migrations/postgres")
        .run(&pool)
        .await
        .map_err(db_err("postgres"))?;
    tracing::info!(driver = "postgres", "schema migration complete");
    Ok(())
}

#[cfg(not(feature = "postgres"))]
async fn run_postgres(_settings: &Settings) -> Result<(), PatchbayError> {
    Err(PatchbayError::BackendUnavailable {
        backend: "Postgres",
        hint: "rebuild with --features postgres",
    })
}

#[cfg(feature = "sqlite")]
async fn run_sqlite(settings: &Settings) -> Result<(), PatchbayError> {
    let pool = sqlx::SqlitePool::connect(&settings.sqlite3.dsn())
        .await
        .map_err(db_err("sqlite3"))?;
    sqlx::migrate!("migrations/sqlite3")
        .run(&pool)
        .await
        .map_err(db_err("sqlite3"))?;
    tracing::info!(driver = "sqlite3", "schema migration complete");
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
async fn run_sqlite(_settings: &Settings) -> Result<(), PatchbayError> {
    Err(PatchbayError::BackendUnavailable {
        backend: "Sqlite3",
        hint: "rebuild with --features sqlite",
    })
}
