//! Group entity: a document-sharing circle owned by an organization

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether the group is open for activity or archived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    /// Group UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Six-character join code (globally unique, immutable)
    #[sea_orm(unique)]
    pub code: String,

    /// Owning organization
    pub organization_id: Uuid,

    /// Active or archived
    pub status: GroupStatus,

    /// When the group was created
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Group belongs to an organization
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Organization,

    /// Group has memberships
    #[sea_orm(has_many = "super::group_member::Entity")]
    Memberships,

    /// Group has documents
    #[sea_orm(has_many = "super::document::Entity")]
    Documents,

    /// AI questions asked in this group
    #[sea_orm(has_many = "super::ai_question::Entity")]
    AiQuestions,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::group_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::ai_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
