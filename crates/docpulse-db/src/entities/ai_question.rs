//! AiQuestion entity: one member question and its LLM answer

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of the last LLM call for this question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    #[sea_orm(string_value = "answered")]
    Answered,

    #[sea_orm(string_value = "failed")]
    Failed,

    #[sea_orm(string_value = "regenerated")]
    Regenerated,
}

/// Who can see the question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum QuestionVisibility {
    /// Visible to the whole group
    #[sea_orm(string_value = "group")]
    Group,

    /// Visible only to the asking member
    #[sea_orm(string_value = "private")]
    Private,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ai_questions")]
pub struct Model {
    /// Question UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Asking member (null if the account was removed)
    pub member_id: Option<Uuid>,

    /// Group context the question was asked in
    pub group_id: Uuid,

    /// Document the question is about
    pub document_id: Uuid,

    /// Question text
    pub question: String,

    /// Answer text (empty until answered)
    pub answer: String,

    /// Short topic label extracted from the answer
    pub topic: Option<String>,

    /// Model identifier used for the call
    pub ai_model: String,

    /// Wall-clock latency of the LLM call in milliseconds
    pub response_time_ms: Option<i32>,

    /// Outcome of the call; immutable once answered or failed
    pub status: QuestionStatus,

    /// Visibility of the question
    pub visibility: QuestionVisibility,

    /// When the question was asked
    pub asked_at: ChronoDateTimeUtc,

    /// When the answer arrived
    pub answered_at: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Question was asked by a member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Member,

    /// Question belongs to a group
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Group,

    /// Question is about a document
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Document,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
