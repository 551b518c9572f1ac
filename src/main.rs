use chrono::{Datelike, Months, NaiveDate, Utc};
use dotenvy::dotenv;
use plan_buddy::{
    config::{database, plans},
    core::{DateRangeQuery, PlanService, PlanStore},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    let service = PlanService::new(PlanStore::new(db));

    // 4. Seed plans from config.toml, if there is one
    match plans::load_default_config() {
        Ok(config) => {
            plans::seed_initial_plans(&service, &config)
                .await
                .inspect_err(|e| error!("Failed to seed initial plans: {}", e))?;
        }
        Err(e) => warn!("No seed plans loaded: {}", e),
    }

    // 5. Report the parent plans of the configured range
    let query = report_range();
    let parents = service.find_parent_plans_with_stats(&query).await?;
    info!(
        start = ?query.start_date,
        end = ?query.end_date,
        parents = parents.len(),
        "Parent plans in range"
    );
    for parent in parents {
        info!(
            id = parent.plan.id,
            title = %parent.plan.title,
            done = parent.plan.done,
            "{}/{} children completed",
            parent.completed_children,
            parent.total_children
        );
    }

    Ok(())
}

/// `PLAN_RANGE_START`/`PLAN_RANGE_END`, defaulting to the current calendar month.
fn report_range() -> DateRangeQuery {
    let today = Utc::now().date_naive();
    let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(today);

    DateRangeQuery::new(
        std::env::var("PLAN_RANGE_START").unwrap_or_else(|_| first.to_string()),
        std::env::var("PLAN_RANGE_END").unwrap_or_else(|_| last.to_string()),
    )
}
