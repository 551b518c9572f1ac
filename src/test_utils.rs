//! Shared test utilities for `PlanBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test plans with sensible defaults.

use crate::{
    core::{
        plan::PlanService,
        requests::{CreatePlanRequest, NewPlan, parse_timestamp},
        store::PlanStore,
    },
    entities,
    errors::Result,
};
use chrono::{TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A [`PlanStore`] over a fresh in-memory database.
pub async fn setup_test_store() -> Result<PlanStore> {
    Ok(PlanStore::new(setup_test_db().await?))
}

/// A [`PlanService`] over a fresh in-memory database.
pub async fn setup_test_service() -> Result<PlanService> {
    Ok(PlanService::new(setup_test_store().await?))
}

/// Validated plan fields starting and ending on `start_date`.
///
/// # Panics
/// Panics if `start_date` is not a valid timestamp.
#[allow(clippy::unwrap_used)]
pub fn new_plan(title: &str, start_date: &str, parent_plan_id: Option<i64>) -> NewPlan {
    let start = parse_timestamp(start_date).unwrap();
    NewPlan {
        title: title.to_string(),
        text: None,
        start_date: start,
        end_date: start,
        done: false,
        color: "#000000".to_string(),
        parent_plan_id,
    }
}

/// A create request whose end date equals its start date.
pub fn create_request(
    title: &str,
    start_date: &str,
    color: &str,
    parent_plan: Option<i64>,
) -> CreatePlanRequest {
    CreatePlanRequest {
        title: title.to_string(),
        text: None,
        start_date: start_date.to_string(),
        end_date: start_date.to_string(),
        done: None,
        color: color.to_string(),
        parent_plan,
    }
}

/// Creates a top-level plan spanning 2024-01-01 to 2024-01-10.
pub async fn create_test_parent(
    service: &PlanService,
    title: &str,
    color: &str,
) -> Result<entities::plan::Model> {
    service
        .create_plan(CreatePlanRequest {
            end_date: "2024-01-10".to_string(),
            ..create_request(title, "2024-01-01", color, None)
        })
        .await
}

/// Creates a child plan on 2024-01-05 under `parent_id`.
///
/// # Defaults
/// * `color`: `"#000000"` (not the parent's color)
/// * `done`: false
pub async fn create_test_child(
    service: &PlanService,
    title: &str,
    parent_id: i64,
) -> Result<entities::plan::Model> {
    service
        .create_plan(create_request(title, "2024-01-05", "#000000", Some(parent_id)))
        .await
}

/// An in-memory plan row that never touches the database.
///
/// # Panics
/// Never in practice; the fixed timestamp is valid.
#[allow(clippy::unwrap_used)]
pub fn plan_model(
    id: i64,
    title: &str,
    parent_plan_id: Option<i64>,
    done: bool,
) -> entities::plan::Model {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    entities::plan::Model {
        id,
        title: title.to_string(),
        text: None,
        start_date: at,
        end_date: at,
        created_at: at,
        done,
        color: "#000000".to_string(),
        parent_plan_id,
    }
}
