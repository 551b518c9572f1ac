//! Plan business logic - Keeps parent and child plans consistent with each other.
//!
//! Every operation reads through [`PlanStore`], applies the plan rules and writes back
//! through the same store. The rules are deliberately per-operation:
//!
//! - updating a plan's color pushes that color onto all of its children;
//! - re-parenting a plan copies the new parent's color onto it;
//! - toggling a child recomputes its parent's `done` flag from all siblings;
//! - creating and deleting plans never touch any other plan's fields.
//!
//! Sequences such as "toggle, then recompute the parent" are separate store calls
//! rather than one database transaction. The recomputation reads the child set and
//! writes the parent in a single statement, so concurrent sibling toggles converge:
//! whichever recomputation runs last sees every toggle committed before it.

use crate::{
    core::{
        requests::{
            CreatePlanRequest, DateRangeQuery, UpdateChildPlanRequest, UpdateParentPlanRequest,
        },
        store::PlanStore,
        summary::{ChildPlanWithParent, ParentPlanWithStats, PlanWithParent},
    },
    entities::plan,
    errors::{Error, Result},
};
use sea_orm::Set;
use tracing::{debug, info, instrument, warn};

/// Domain operations over plans.
#[derive(Debug)]
pub struct PlanService {
    store: PlanStore,
}

impl PlanService {
    /// Creates a service on top of `store`.
    #[must_use]
    pub const fn new(store: PlanStore) -> Self {
        Self { store }
    }

    /// The store this service writes through.
    #[must_use]
    pub const fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Creates a plan, optionally under an existing parent.
    ///
    /// The requested color is stored as given, even when it differs from the
    /// parent's color.
    ///
    /// # Errors
    /// - `BadRequest` if title, color or either date is missing or unparseable
    /// - `ParentPlanNotFound` if `parent_plan` names a plan that does not exist
    #[instrument(
        skip(self, request),
        fields(title = %request.title, parent = ?request.parent_plan)
    )]
    pub async fn create_plan(&self, request: CreatePlanRequest) -> Result<plan::Model> {
        let new_plan = request.validate()?;

        if let Some(parent_id) = new_plan.parent_plan_id {
            self.store
                .find_by_id(parent_id)
                .await?
                .ok_or(Error::ParentPlanNotFound { id: parent_id })?;
        }

        let created = self.store.save(self.store.create(new_plan)).await?;
        info!(plan_id = created.id, "Created plan");
        Ok(created)
    }

    /// Overwrites a plan's color and title (and text, when given), then copies the
    /// new color onto every plan that has it as parent.
    ///
    /// The target is not required to be top-level; a child simply has no children
    /// to cascade to.
    ///
    /// # Errors
    /// Returns `PlanNotFound` if `request.id` does not exist.
    #[instrument(skip(self, request), fields(plan_id = request.id))]
    pub async fn update_parent_plan(
        &self,
        request: UpdateParentPlanRequest,
    ) -> Result<plan::Model> {
        let existing = self
            .store
            .find_by_id(request.id)
            .await?
            .ok_or(Error::PlanNotFound { id: request.id })?;

        let mut active: plan::ActiveModel = existing.into();
        active.color = Set(request.color);
        active.title = Set(request.title);
        if let Some(text) = request.text {
            active.text = Set(Some(text));
        }
        let updated = self.store.save(active).await?;

        let children = self.store.find_by_parent_id(updated.id).await?;
        let cascaded = children.len();
        for child in children {
            let mut child: plan::ActiveModel = child.into();
            child.color = Set(updated.color.clone());
            self.store.save(child).await?;
        }

        info!(cascaded, color = %updated.color, "Updated plan and cascaded color");
        Ok(updated)
    }

    /// Attaches a plan to `request.parent`, adopting the parent's color, and
    /// overwrites its title (and text, when given).
    ///
    /// Neither the previous nor the new parent has its `done` flag recomputed.
    ///
    /// # Errors
    /// - `PlanNotFound` if `request.id` does not exist
    /// - `ParentPlanNotFound` if `request.parent` does not exist
    #[instrument(skip(self, request), fields(plan_id = request.id, parent = request.parent))]
    pub async fn update_child_plan(&self, request: UpdateChildPlanRequest) -> Result<()> {
        let child = self
            .store
            .find_by_id(request.id)
            .await?
            .ok_or(Error::PlanNotFound { id: request.id })?;
        let parent = self
            .store
            .find_by_id(request.parent)
            .await?
            .ok_or(Error::ParentPlanNotFound { id: request.parent })?;

        let previous_parent = child.parent_plan_id;
        let mut active: plan::ActiveModel = child.into();
        active.parent_plan_id = Set(Some(parent.id));
        active.color = Set(parent.color);
        active.title = Set(request.title);
        if let Some(text) = request.text {
            active.text = Set(Some(text));
        }
        self.store.save(active).await?;

        info!(?previous_parent, "Re-parented plan");
        Ok(())
    }

    /// Every plan with its parent loaded, ordered by start date.
    pub async fn find_all_plans(&self) -> Result<Vec<PlanWithParent>> {
        let plans = self.store.find_all_with_parent().await?;
        Ok(plans
            .into_iter()
            .map(|(plan, parent_plan)| PlanWithParent { plan, parent_plan })
            .collect())
    }

    /// Looks up a single plan.
    ///
    /// # Errors
    /// Returns `PlanNotFound` if `id` does not exist.
    pub async fn find_plan(&self, id: i64) -> Result<plan::Model> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(Error::PlanNotFound { id })
    }

    /// Top-level plans starting inside the range, each with counters over all of
    /// its children. Children are counted whether or not they fall in the range.
    ///
    /// # Errors
    /// Returns `BadRequest` if either bound is missing or unparseable.
    #[instrument(skip(self))]
    pub async fn find_parent_plans_with_stats(
        &self,
        query: &DateRangeQuery,
    ) -> Result<Vec<ParentPlanWithStats>> {
        let range = query.parse()?;
        let parents = self.store.find_by_date_range_and_parent_null(range).await?;

        let mut results = Vec::with_capacity(parents.len());
        for parent in parents {
            let children = self.store.find_by_parent_id(parent.id).await?;
            results.push(ParentPlanWithStats::new(parent, &children));
        }
        Ok(results)
    }

    /// Child plans starting inside the range, each with a summary of its parent.
    ///
    /// # Errors
    /// Returns `BadRequest` if either bound is missing or unparseable.
    #[instrument(skip(self))]
    pub async fn find_child_plans_with_parent(
        &self,
        query: &DateRangeQuery,
    ) -> Result<Vec<ChildPlanWithParent>> {
        let range = query.parse()?;
        let children = self
            .store
            .find_by_date_range_and_parent_not_null(range)
            .await?;

        Ok(children
            .into_iter()
            .filter_map(|(child, parent)| match parent {
                Some(parent) => Some(ChildPlanWithParent::new(child, &parent)),
                None => {
                    warn!(plan_id = child.id, "Child plan references a missing parent");
                    None
                }
            })
            .collect())
    }

    /// Flips a child plan's `done` flag and recomputes its parent.
    ///
    /// # Errors
    /// - `PlanNotFound` if `id` does not exist
    /// - `BadRequest` if the plan is top-level; no row is modified
    /// - `ParentPlanNotFound` if the parent vanished before recomputation
    #[instrument(skip(self))]
    pub async fn toggle_done(&self, id: i64) -> Result<()> {
        let target = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(Error::PlanNotFound { id })?;

        let Some(parent_id) = target.parent_plan_id else {
            warn!("Rejected toggle of a top-level plan");
            return Err(Error::bad_request(
                "Top-level plans cannot be toggled directly",
            ));
        };

        let done = !target.done;
        let mut active: plan::ActiveModel = target.into();
        active.done = Set(done);
        self.store.save(active).await?;
        info!(done, parent_id, "Toggled plan");

        self.update_parent_done_status(parent_id).await
    }

    /// Sets a parent's `done` to whether every child is done (true when it has none).
    async fn update_parent_done_status(&self, parent_id: i64) -> Result<()> {
        if !self.store.refresh_parent_done(parent_id).await? {
            return Err(Error::ParentPlanNotFound { id: parent_id });
        }
        debug!(parent_id, "Recomputed parent");
        Ok(())
    }

    /// Deletes a plan together with all of its children.
    ///
    /// No other plan is re-aggregated afterwards.
    ///
    /// # Errors
    /// Returns `PlanNotFound` if `id` does not exist (including a second delete).
    #[instrument(skip(self))]
    pub async fn delete_plan(&self, id: i64) -> Result<()> {
        let target = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(Error::PlanNotFound { id })?;

        self.store.remove(target).await?;
        info!("Deleted plan");
        Ok(())
    }
}
