//! Seed plan configuration loaded from config.toml
//!
//! The `[[plans]]` tables describe top-level plans; each may carry
//! `[[plans.children]]`. Seeding only runs against an empty database so that
//! restarting the binary never duplicates rows.

use crate::core::{CreatePlanRequest, PlanService};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Top-level plans to seed
    #[serde(default)]
    pub plans: Vec<PlanSeed>,
}

/// A top-level plan and its children
#[derive(Debug, Deserialize, Clone)]
pub struct PlanSeed {
    /// Plan title
    pub title: String,
    /// Optional body text
    #[serde(default)]
    pub text: Option<String>,
    /// Start date, e.g. `2024-01-01`
    pub start_date: String,
    /// End date, e.g. `2024-01-07`
    pub end_date: String,
    /// Display color
    pub color: String,
    /// Child plans created under this one
    #[serde(default)]
    pub children: Vec<ChildPlanSeed>,
}

/// A child plan seeded under its enclosing [`PlanSeed`]
#[derive(Debug, Deserialize, Clone)]
pub struct ChildPlanSeed {
    /// Plan title
    pub title: String,
    /// Optional body text
    #[serde(default)]
    pub text: Option<String>,
    /// Start date
    pub start_date: String,
    /// End date
    pub end_date: String,
    /// Display color; the parent's color when omitted
    #[serde(default)]
    pub color: Option<String>,
    /// Whether the child starts out completed
    #[serde(default)]
    pub done: bool,
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses seed configuration from TOML text
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads seed configuration from `CONFIG_PATH`, or `./config.toml` when unset
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}

/// Creates the configured plans when the database holds none yet.
///
/// Returns the number of plans created.
#[instrument(skip_all)]
pub async fn seed_initial_plans(service: &PlanService, config: &Config) -> Result<usize> {
    if service.store().count().await? > 0 {
        info!("Plans already present, skipping seed");
        return Ok(0);
    }

    let mut created = 0;
    for seed in &config.plans {
        let parent = service
            .create_plan(CreatePlanRequest {
                title: seed.title.clone(),
                text: seed.text.clone(),
                start_date: seed.start_date.clone(),
                end_date: seed.end_date.clone(),
                done: None,
                color: seed.color.clone(),
                parent_plan: None,
            })
            .await?;
        created += 1;

        for child in &seed.children {
            service
                .create_plan(CreatePlanRequest {
                    title: child.title.clone(),
                    text: child.text.clone(),
                    start_date: child.start_date.clone(),
                    end_date: child.end_date.clone(),
                    done: Some(child.done),
                    color: child.color.clone().unwrap_or_else(|| parent.color.clone()),
                    parent_plan: Some(parent.id),
                })
                .await?;
            created += 1;
        }
    }

    info!(created, "Seeded initial plans");
    Ok(created)
}
