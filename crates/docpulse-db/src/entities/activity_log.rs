//! ActivityLog entity: append-only audit records

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    /// Entry UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Acting member, when the actor was an individual
    pub member_id: Option<Uuid>,

    /// Acting organization, when the actor was an organization account
    pub organization_id: Option<Uuid>,

    /// Group the action happened in, if any
    pub group_id: Option<Uuid>,

    /// Document the action concerns, if any
    pub document_id: Option<Uuid>,

    /// Human-readable description of the action
    pub action: String,

    /// When the action happened
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
