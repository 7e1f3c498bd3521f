//! Member entity: an individual user account

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Approval state of a member account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Awaiting approval by the organization
    #[sea_orm(string_value = "pending")]
    Pending,

    /// Approved and active
    #[sea_orm(string_value = "active")]
    Active,

    /// Suspended by the organization
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Member UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Member email (unique)
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Full name
    pub full_name: String,

    /// Date of birth (optional)
    pub dob: Option<ChronoDate>,

    /// Gender (free text, optional)
    pub gender: Option<String>,

    /// Name of the organization the member belongs to
    pub organization: String,

    /// Department within the organization
    pub department: Option<String>,

    /// Employee ID within the organization
    pub employee_id: Option<String>,

    /// Job title
    pub designation: Option<String>,

    /// Phone number
    pub phone_number: String,

    /// Postal address
    pub address: Option<String>,

    /// Account approval state
    pub status: MemberStatus,

    /// When the account was created
    pub created_at: ChronoDateTimeUtc,

    /// When the profile was last updated
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Member belongs to groups
    #[sea_orm(has_many = "super::group_member::Entity")]
    GroupMemberships,

    /// Member has per-document read statuses
    #[sea_orm(has_many = "super::read_status::Entity")]
    ReadStatuses,

    /// Member receives notifications
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,

    /// Member asks AI questions
    #[sea_orm(has_many = "super::ai_question::Entity")]
    AiQuestions,
}

impl Related<super::group_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupMemberships.def()
    }
}

impl Related<super::read_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReadStatuses.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl Related<super::ai_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
