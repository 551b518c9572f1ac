//! Read-side projections returned by the plan queries.
//!
//! These are plain data carriers: the parent statistics count every child of a
//! parent, while the child view carries only a trimmed summary of its parent.

use crate::entities::plan;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A plan together with its parent, as returned by the full listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWithParent {
    /// The plan itself
    #[serde(flatten)]
    pub plan: plan::Model,
    /// Its parent row, `None` for top-level plans
    pub parent_plan: Option<plan::Model>,
}

/// A top-level plan with counters over all of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentPlanWithStats {
    /// The parent plan
    #[serde(flatten)]
    pub plan: plan::Model,
    /// Number of children, independent of any date filter
    pub total_children: usize,
    /// Number of children with `done = true`
    pub completed_children: usize,
}

/// The fields of a parent plan that a child view exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentSummary {
    /// Parent id
    pub id: i64,
    /// Parent title
    pub title: String,
    /// Parent color
    pub color: String,
}

/// A child plan with a summary of its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildPlanWithParent {
    /// Child id
    pub id: i64,
    /// Child title
    pub title: String,
    /// Child text
    pub text: Option<String>,
    /// Child start date
    pub start_date: DateTime<Utc>,
    /// Child end date
    pub end_date: DateTime<Utc>,
    /// Child completion flag
    pub done: bool,
    /// Child color
    pub color: String,
    /// Summary of the parent
    pub parent_plan: ParentSummary,
}

impl ParentPlanWithStats {
    /// Counts `children` for `plan`.
    #[must_use]
    pub fn new(plan: plan::Model, children: &[plan::Model]) -> Self {
        Self {
            plan,
            total_children: children.len(),
            completed_children: children.iter().filter(|child| child.done).count(),
        }
    }
}

impl From<&plan::Model> for ParentSummary {
    fn from(parent: &plan::Model) -> Self {
        Self {
            id: parent.id,
            title: parent.title.clone(),
            color: parent.color.clone(),
        }
    }
}

impl ChildPlanWithParent {
    /// Combines a child row with its loaded parent.
    #[must_use]
    pub fn new(child: plan::Model, parent: &plan::Model) -> Self {
        Self {
            id: child.id,
            title: child.title,
            text: child.text,
            start_date: child.start_date,
            end_date: child.end_date,
            done: child.done,
            color: child.color,
            parent_plan: ParentSummary::from(parent),
        }
    }
}
