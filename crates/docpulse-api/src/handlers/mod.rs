pub mod ai;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod engagement;
pub mod groups;
pub mod members;
pub mod notifications;
pub mod profile;
pub mod read_status;

pub use ai::*;
pub use auth::*;
pub use dashboard::*;
pub use documents::*;
pub use engagement::*;
pub use groups::*;
pub use members::*;
pub use notifications::*;
pub use profile::*;
pub use read_status::*;

use docpulse_db::entities::{document, group, group_member, prelude::*, read_status as rs};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthPrincipal;
use crate::models::DocumentInfo;

/// Load a group or 404.
pub(crate) async fn load_group(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<group::Model, ApiError> {
    Group::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Group '{}' not found", id)))
}

/// Load a document or 404.
pub(crate) async fn load_document(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<document::Model, ApiError> {
    Document::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Document '{}' not found", id)))
}

/// Check that the caller may see this group: organizations must own it,
/// members must have a membership row in it.
pub(crate) async fn ensure_group_access(
    db: &DatabaseConnection,
    principal: &AuthPrincipal,
    group: &group::Model,
) -> Result<(), ApiError> {
    match principal {
        AuthPrincipal::Organization(org) => {
            if group.organization_id != org.id {
                return Err(ApiError::Authorization(
                    "Group belongs to a different organization".to_string(),
                ));
            }
        }
        AuthPrincipal::Member(m) => {
            let membership = GroupMember::find_by_id((group.id, m.id)).one(db).await?;
            if membership.is_none() {
                return Err(ApiError::Authorization(
                    "You are not a member of this group".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Count active members of a group.
pub(crate) async fn active_member_count(
    db: &DatabaseConnection,
    group_id: Uuid,
) -> Result<u64, ApiError> {
    Ok(GroupMember::find()
        .filter(group_member::Column::GroupId.eq(group_id))
        .filter(group_member::Column::Status.eq(group_member::MembershipStatus::Active))
        .count(db)
        .await?)
}

/// Count members who completed a document.
pub(crate) async fn completed_count(
    db: &DatabaseConnection,
    document_id: Uuid,
) -> Result<u64, ApiError> {
    Ok(ReadStatus::find()
        .filter(rs::Column::DocumentId.eq(document_id))
        .filter(rs::Column::IsCompleted.eq(true))
        .count(db)
        .await?)
}

/// Arithmetic mean of accumulated read time over every tracked row,
/// zero-time rows included. Zero only when no rows exist.
pub(crate) async fn avg_read_time_seconds(
    db: &DatabaseConnection,
    document_id: Uuid,
) -> Result<f64, ApiError> {
    let rows = ReadStatus::find()
        .filter(rs::Column::DocumentId.eq(document_id))
        .all(db)
        .await?;

    if rows.is_empty() {
        return Ok(0.0);
    }

    let total: i64 = rows.iter().map(|r| r.read_time_seconds).sum();
    Ok(total as f64 / rows.len() as f64)
}

/// Map a document row to its wire shape.
pub(crate) fn document_info(doc: &document::Model, public_base_url: &str) -> DocumentInfo {
    DocumentInfo {
        id: doc.id,
        group_id: doc.group_id,
        title: doc.title.clone(),
        summary: doc.summary.clone(),
        version: doc.version.clone(),
        file_size: doc.file_size,
        file_url: format!(
            "{}/files/{}",
            public_base_url.trim_end_matches('/'),
            doc.file_path
        ),
        uploaded_at: doc.uploaded_at,
        views: doc.views,
        readers: doc.readers,
        unanswered_questions: doc.unanswered_questions,
    }
}
