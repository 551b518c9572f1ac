//! Database configuration module for `PlanBuddy`.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! The `plans` table is generated from the entity definition with
//! `Schema::create_table_from_entity`, so the self-referencing foreign key and its
//! `ON DELETE CASCADE` rule come straight from the `Relation` declared on the entity.

use crate::entities::Plan;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/plan_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    connect(&get_database_url()).await
}

/// Connects to an explicit database URL.
#[instrument]
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the `plans` table if it does not exist yet.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut plan_table = schema.create_table_from_entity(Plan);
    plan_table.if_not_exists();

    db.execute(builder.build(&plan_table)).await?;
    info!("Database tables ensured");

    Ok(())
}
