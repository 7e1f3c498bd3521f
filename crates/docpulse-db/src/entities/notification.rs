//! Notification entity: in-app messages delivered to members

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of event the notification reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Member was added to a group
    #[sea_orm(string_value = "added")]
    Added,

    /// Membership status changed
    #[sea_orm(string_value = "status_changed")]
    StatusChanged,

    /// Group was activated or archived
    #[sea_orm(string_value = "group_status_changed")]
    GroupStatusChanged,

    /// A new document was uploaded
    #[sea_orm(string_value = "document_uploaded")]
    DocumentUploaded,

    /// Group was deleted
    #[sea_orm(string_value = "group_deleted")]
    GroupDeleted,
}

impl NotificationKind {
    /// Human-readable title shown in the notification list
    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::Added => "Added to Group",
            NotificationKind::StatusChanged => "Status Changed",
            NotificationKind::GroupStatusChanged => "Group Status Changed",
            NotificationKind::DocumentUploaded => "Document Uploaded",
            NotificationKind::GroupDeleted => "Group Deleted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Notification UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Recipient member
    pub member_id: Uuid,

    /// Group the event happened in, if any
    pub group_id: Option<Uuid>,

    /// Document the event concerns, if any
    pub document_id: Option<Uuid>,

    /// Event kind
    pub kind: NotificationKind,

    /// Message body
    pub message: String,

    /// Whether the recipient has read it
    pub read: bool,

    /// When the notification was created
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Notification belongs to a member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
