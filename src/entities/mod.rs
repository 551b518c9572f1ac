//! Entity module - Contains the SeaORM entity definitions for the database.
//! The `plans` table is the only relation; parent/child structure is a nullable
//! self-reference on it.

pub mod plan;

pub use plan::{
    ActiveModel as PlanActiveModel, Column as PlanColumn, Entity as Plan, Model as PlanModel,
    ParentLink,
};
