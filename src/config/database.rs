//! Database configuration module.
//!
//! This module opens the bounded SeaORM connection pool and creates the `bills` table.
//! The table definition is generated from the entity with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust model without hand-written SQL.

use super::settings::DatabaseConfig;
use crate::entities::Bill;
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::{info, instrument};

/// Opens the connection pool described by `config`.
///
/// The pool never holds more than `max_connections` connections; a request that cannot
/// get one within `acquire_timeout_secs` fails with a database error.
#[instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn create_connection(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connection pool opened");
    Ok(db)
}

/// Creates the `bills` table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut bill_table = schema.create_table_from_entity(Bill);
    bill_table.if_not_exists();

    db.execute(builder.build(&bill_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entities::bill::Model as BillModel, errors::Error};
    use sea_orm::{EntityTrait, QuerySelect, TransactionTrait};

    #[tokio::test]
    async fn test_create_connection_and_tables() -> Result<()> {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        };
        let db = create_connection(&config).await?;
        create_tables(&db).await?;

        let _: Vec<BillModel> = Bill::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<BillModel> = Bill::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_exhausted_pool_times_out_with_database_error() -> Result<()> {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        };
        let db = create_connection(&config).await?;
        create_tables(&db).await?;

        // Hold the only connection
        let txn = db.begin().await?;
        let result = Bill::find().all(&db).await;
        assert!(matches!(result.map_err(Error::from), Err(Error::Database(_))));

        txn.rollback().await?;
        let _: Vec<BillModel> = Bill::find().all(&db).await?;
        Ok(())
    }
}
