//! ReadStatus entity: per (document, member) reading progress

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document_read_statuses")]
pub struct Model {
    /// Document UUID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub document_id: Uuid,

    /// Member UUID (composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: Uuid,

    /// Sticky completion flag; once true it never reverts
    pub is_completed: bool,

    /// Accumulated read time in seconds, monotonically non-decreasing
    pub read_time_seconds: i64,

    /// Last time the member touched the document
    pub last_read_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Status belongs to a document
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Document,

    /// Status belongs to a member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
