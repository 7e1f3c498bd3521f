//! Document entity: an uploaded file shared with a group

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    /// Document UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Group the document belongs to
    pub group_id: Uuid,

    /// Title shown to readers
    pub title: String,

    /// Short summary
    pub summary: String,

    /// Path of the stored file, relative to the upload root
    pub file_path: String,

    /// Stored file size in bytes
    pub file_size: i64,

    /// Uploading organization (null if the account was removed)
    pub uploaded_by: Option<Uuid>,

    /// When the document was uploaded
    pub uploaded_at: ChronoDateTimeUtc,

    /// Extracted text cache for AI consumption; populated lazily on the
    /// first question and reused afterwards
    pub content: Option<String>,

    /// Total view events (every view call counts, not unique viewers)
    pub views: i32,

    /// Count of readers with positive accumulated read time; recomputed
    /// from read statuses on every progress event
    pub readers: i32,

    /// Count of AI questions that ended in a failed state
    pub unanswered_questions: i32,

    /// Document version label
    pub version: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Document belongs to a group
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Group,

    /// Per-member read progress rows
    #[sea_orm(has_many = "super::read_status::Entity")]
    ReadStatuses,

    /// AI questions asked about this document
    #[sea_orm(has_many = "super::ai_question::Entity")]
    AiQuestions,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::read_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReadStatuses.def()
    }
}

impl Related<super::ai_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
