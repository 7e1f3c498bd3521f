//! Organization entity: a tenant account that owns groups

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    /// Organization UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Login email (unique)
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Name of the administrator account holder
    pub admin_name: String,

    /// Administrator's job title
    pub designation: Option<String>,

    /// Contact phone number
    pub phone_number: String,

    /// Display name of the organization; members reference it in their
    /// profile to be counted as employees
    pub organization_name: String,

    /// Industry sector
    pub industry: Option<String>,

    /// Approximate head count
    pub organization_size: i32,

    /// External registration/company ID (immutable after signup)
    pub registration_id: String,

    /// When the account was created
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Organization owns groups
    #[sea_orm(has_many = "super::group::Entity")]
    Groups,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
