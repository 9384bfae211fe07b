use std::path::Path;

use anyhow::Result;
use sqlx::{AnyPool, Sqlite, migrate::MigrateDatabase};

/// Creates a scratch SQLite database holding an empty `Library` table and
/// returns a pool connected to it through the `Any` driver, the way the
/// binaries connect.
pub async fn prepare_database(database_path: &Path) -> Result<AnyPool> {
    let connection_uri = format!("sqlite://{}", database_path.display());

    sqlx::any::install_default_drivers();
    Sqlite::create_database(&connection_uri).await?;

    let pool = AnyPool::connect(&connection_uri).await?;

    sqlx::query(
        "CREATE TABLE Library (id TEXT, type TEXT, addressNumber TEXT, addressStreet TEXT, \
         addressPostalCode TEXT, addressCity TEXT, directorSurname TEXT, directorName TEXT)",
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

/// Inserts one library row, fields in export order.
pub async fn insert_library(pool: &AnyPool, fields: [&str; 8]) -> Result<()> {
    let mut query = sqlx::query("INSERT INTO Library VALUES (?, ?, ?, ?, ?, ?, ?, ?)");
    for field in fields {
        query = query.bind(field);
    }
    query.execute(pool).await?;

    Ok(())
}
