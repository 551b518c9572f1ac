//! Core business logic - framework-agnostic plan storage and consistency rules.

/// Parent/child consistency operations
pub mod plan;
/// Operation inputs and date parsing
pub mod requests;
/// Row-level access to the `plans` table
pub mod store;
/// Read-side projections
pub mod summary;

pub use plan::PlanService;
pub use requests::{
    CreatePlanRequest, DateRange, DateRangeQuery, NewPlan, UpdateChildPlanRequest,
    UpdateParentPlanRequest,
};
pub use store::PlanStore;
pub use summary::{ChildPlanWithParent, ParentPlanWithStats, ParentSummary, PlanWithParent};
