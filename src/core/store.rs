//! Plan storage - Row-level access to the `plans` table.
//!
//! Every method is a single statement (or, for [`PlanStore::remove`], a single
//! database transaction), so each call is atomic on its own. Multi-step domain
//! sequences are composed one level up in [`crate::core::plan`].

use crate::{
    core::requests::{DateRange, NewPlan},
    entities::{ParentLink, Plan, plan},
    errors::Result,
};
use sea_orm::{
    ActiveValue::NotSet, PaginatorTrait, QueryOrder, Set, TransactionTrait, TryIntoModel,
    prelude::*,
    sea_query::{Alias, Expr, Query},
};
use tracing::{debug, instrument};

/// A plan paired with its parent, when it has one.
pub type PlanAndParent = (plan::Model, Option<plan::Model>);

/// Repository over the `plans` relation.
#[derive(Debug)]
pub struct PlanStore {
    db: DatabaseConnection,
}

impl PlanStore {
    /// Wraps an open database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a plan by its primary key.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<plan::Model>> {
        Plan::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Finds a plan by its primary key together with its parent row.
    pub async fn find_by_id_with_parent(&self, id: i64) -> Result<Option<PlanAndParent>> {
        Plan::find_by_id(id)
            .find_also_linked(ParentLink)
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Every plan with its parent loaded, oldest start date first.
    pub async fn find_all_with_parent(&self) -> Result<Vec<PlanAndParent>> {
        Plan::find()
            .find_also_linked(ParentLink)
            .order_by_asc(plan::Column::StartDate)
            .order_by_asc(plan::Column::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Top-level plans whose start date falls inside `range` (inclusive).
    #[instrument(skip(self))]
    pub async fn find_by_date_range_and_parent_null(
        &self,
        range: DateRange,
    ) -> Result<Vec<plan::Model>> {
        let plans = Plan::find()
            .filter(plan::Column::StartDate.between(range.start, range.end))
            .filter(plan::Column::ParentPlanId.is_null())
            .order_by_asc(plan::Column::StartDate)
            .order_by_asc(plan::Column::Id)
            .all(&self.db)
            .await?;
        debug!(count = plans.len(), "Loaded top-level plans in range");
        Ok(plans)
    }

    /// Child plans whose start date falls inside `range` (inclusive), parents loaded.
    #[instrument(skip(self))]
    pub async fn find_by_date_range_and_parent_not_null(
        &self,
        range: DateRange,
    ) -> Result<Vec<PlanAndParent>> {
        let plans = Plan::find()
            .filter(plan::Column::StartDate.between(range.start, range.end))
            .filter(plan::Column::ParentPlanId.is_not_null())
            .find_also_linked(ParentLink)
            .order_by_asc(plan::Column::StartDate)
            .order_by_asc(plan::Column::Id)
            .all(&self.db)
            .await?;
        debug!(count = plans.len(), "Loaded child plans in range");
        Ok(plans)
    }

    /// All plans whose parent is `parent_id`, regardless of dates.
    pub async fn find_by_parent_id(&self, parent_id: i64) -> Result<Vec<plan::Model>> {
        Plan::find()
            .filter(plan::Column::ParentPlanId.eq(parent_id))
            .order_by_asc(plan::Column::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Number of stored plans.
    pub async fn count(&self) -> Result<u64> {
        Plan::find().count(&self.db).await.map_err(Into::into)
    }

    /// Builds an unsaved row for `new_plan`; `created_at` is stamped here.
    #[must_use]
    pub fn create(&self, new_plan: NewPlan) -> plan::ActiveModel {
        plan::ActiveModel {
            id: NotSet,
            title: Set(new_plan.title),
            text: Set(new_plan.text),
            start_date: Set(new_plan.start_date),
            end_date: Set(new_plan.end_date),
            created_at: Set(chrono::Utc::now()),
            done: Set(new_plan.done),
            color: Set(new_plan.color),
            parent_plan_id: Set(new_plan.parent_plan_id),
        }
    }

    /// Inserts the row when its id is unset, updates it otherwise.
    pub async fn save(&self, row: plan::ActiveModel) -> Result<plan::Model> {
        let saved = row.save(&self.db).await?;
        saved.try_into_model().map_err(Into::into)
    }

    /// Sets the parent's `done` to "no child is still open" in one `UPDATE`.
    ///
    /// The child set is read inside the same statement that writes the flag, so the
    /// last refresh to run always sees every toggle committed before it. A parent
    /// without children ends up done. Returns `false` when `parent_id` matches no row.
    #[instrument(skip(self))]
    pub async fn refresh_parent_done(&self, parent_id: i64) -> Result<bool> {
        let child = Alias::new("child");
        let open_child = Query::select()
            .expr(Expr::val(1))
            .from_as(Plan, child.clone())
            .and_where(Expr::col((child.clone(), plan::Column::ParentPlanId)).eq(parent_id))
            .and_where(Expr::col((child, plan::Column::Done)).eq(false))
            .to_owned();

        let result = Plan::update_many()
            .col_expr(plan::Column::Done, Expr::exists(open_child).not())
            .filter(plan::Column::Id.eq(parent_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Deletes `target` and every plan that references it as parent.
    ///
    /// The foreign key already cascades; the explicit child delete keeps the
    /// guarantee on connections where `SQLite` foreign key enforcement is off.
    #[instrument(skip(self, target), fields(plan_id = target.id))]
    pub async fn remove(&self, target: plan::Model) -> Result<()> {
        let txn = self.db.begin().await?;

        let children = Plan::delete_many()
            .filter(plan::Column::ParentPlanId.eq(target.id))
            .exec(&txn)
            .await?;
        target.delete(&txn).await?;

        txn.commit().await?;
        debug!(
            children_removed = children.rows_affected,
            "Removed plan and its children"
        );
        Ok(())
    }
}
