//! GroupMember entity: the membership row binding a member to a group

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a group member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    /// Group admin with elevated permissions
    #[sea_orm(string_value = "admin")]
    Admin,

    /// Regular group member
    #[sea_orm(string_value = "member")]
    Member,
}

/// Approval state of a membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// Join request awaiting admin approval
    #[sea_orm(string_value = "pending")]
    Pending,

    /// Approved membership
    #[sea_orm(string_value = "active")]
    Active,

    /// Suspended by a group admin
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_members")]
pub struct Model {
    /// Group UUID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: Uuid,

    /// Member UUID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: Uuid,

    /// Role of the member in this group
    pub role: GroupRole,

    /// Approval state of the membership
    pub status: MembershipStatus,

    /// When the join request was made
    pub joined_at: ChronoDateTimeUtc,

    /// Last time the member was seen active in this group
    pub last_active: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Membership belongs to a group
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Group,

    /// Membership belongs to a member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
