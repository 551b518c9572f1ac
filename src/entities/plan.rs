//! Plan entity - The single record type of the system.
//!
//! A plan with no `parent_plan_id` is a top-level (parent) plan; a plan with one is a
//! child. The parent is held as a plain id and only resolved at read time through
//! [`ParentLink`], so plans never own each other.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plan database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    /// Unique identifier for the plan
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short title shown in listings
    pub title: String,
    /// Optional free-form body
    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,
    /// Start of the planned period; range queries filter on this column
    pub start_date: DateTimeUtc,
    /// End of the planned period
    pub end_date: DateTimeUtc,
    /// When the plan was created
    pub created_at: DateTimeUtc,
    /// Completion flag. Derived for parents, toggled for children.
    pub done: bool,
    /// Display color, e.g. `"#FF5733"`
    pub color: String,
    /// Id of the parent plan, `None` for top-level plans
    #[sea_orm(nullable)]
    pub parent_plan_id: Option<i64>,
}

impl Model {
    /// Top-level plans carry no parent reference.
    #[must_use]
    pub const fn is_parent(&self) -> bool {
        self.parent_plan_id.is_none()
    }

    /// Child plans reference their parent by id.
    #[must_use]
    pub const fn is_child(&self) -> bool {
        self.parent_plan_id.is_some()
    }
}

/// Self-referencing relationship between a child plan and its parent
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each child plan belongs to one parent plan; removing the parent removes its children
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentPlanId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    ParentPlan,
}

/// Walks from a plan to its parent, for `find_also_linked` joins.
#[derive(Debug)]
pub struct ParentLink;

impl Linked for ParentLink {
    type FromEntity = Entity;
    type ToEntity = Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::ParentPlan.def()]
    }
}

impl ActiveModelBehavior for ActiveModel {}
