//! Document upload, listing, detail, and activity

use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use chrono::Utc;
use docpulse_db::entities::{
    activity_log, document, group_member, notification::NotificationKind, prelude::*,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::{log_activity, notify};
use crate::handlers::{
    active_member_count, completed_count, document_info, ensure_group_access, load_document,
    load_group,
};
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::stats::completion_percent;
use crate::AppState;

/// List a group's documents, newest first
#[utoipa::path(
    get,
    path = "/api/groups/{gid}/documents",
    params(("gid" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Documents", body = DocumentList),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(gid): Path<Uuid>,
) -> Result<Json<DocumentList>, ApiError> {
    let g = load_group(&state.db, gid).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let documents: Vec<DocumentInfo> = Document::find()
        .filter(document::Column::GroupId.eq(gid))
        .order_by_desc(document::Column::UploadedAt)
        .all(&state.db)
        .await?
        .iter()
        .map(|d| document_info(d, &state.public_base_url))
        .collect();

    let total = documents.len();
    Ok(Json(DocumentList { documents, total }))
}

/// Upload a document to a group (organization only)
///
/// Multipart fields: `title`, `summary`, `version`, and `file`. The file is
/// stored under the configured storage root; every active member of the
/// group is notified.
#[utoipa::path(
    post,
    path = "/api/groups/{gid}/documents",
    params(("gid" = Uuid, Path, description = "Group ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Uploaded document", body = DocumentInfo),
        (status = 400, description = "Missing file or title", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(gid): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DocumentInfo>, ApiError> {
    let org = principal.organization()?;
    let g = load_group(&state.db, gid).await?;
    if g.organization_id != org.id {
        return Err(ApiError::Authorization(
            "Group belongs to a different organization".to_string(),
        ));
    }

    let mut title = None;
    let mut summary = String::new();
    let mut version = "1.0".to_string();
    let mut file_name = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("title") => {
                title = Some(field.text().await.map_err(|e| {
                    ApiError::Validation(format!("Unreadable 'title' field: {}", e))
                })?)
            }
            Some("summary") => {
                summary = field.text().await.map_err(|e| {
                    ApiError::Validation(format!("Unreadable 'summary' field: {}", e))
                })?
            }
            Some("version") => {
                version = field.text().await.map_err(|e| {
                    ApiError::Validation(format!("Unreadable 'version' field: {}", e))
                })?
            }
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            ApiError::Validation(format!("Unreadable 'file' field: {}", e))
                        })?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Document title is required".to_string()))?;
    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::Validation("Document file is required".to_string()))?;
    let file_name = file_name.unwrap_or_else(|| "document.pdf".to_string());

    let doc_id = Uuid::new_v4();
    let relative_path = format!("group_documents/{}_{}", doc_id, file_name);
    let absolute_path = state.storage_dir.join(&relative_path);

    if let Some(parent) = absolute_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to prepare storage: {}", e)))?;
    }
    tokio::fs::write(&absolute_path, &file_bytes)
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to store file: {}", e)))?;

    let row = document::ActiveModel {
        id: Set(doc_id),
        group_id: Set(gid),
        title: Set(title.clone()),
        summary: Set(summary),
        file_path: Set(relative_path),
        file_size: Set(file_bytes.len() as i64),
        uploaded_by: Set(Some(org.id)),
        uploaded_at: Set(Utc::now()),
        content: Set(None),
        views: Set(0),
        readers: Set(0),
        unanswered_questions: Set(0),
        version: Set(version),
    }
    .insert(&state.db)
    .await?;

    info!(document_id = %row.id, group_id = %gid, "document uploaded");

    log_activity(
        &state.db,
        None,
        Some(org.id),
        Some(gid),
        Some(row.id),
        format!("Uploaded document \"{}\"", title),
    )
    .await;

    // Fan out to active members only
    let memberships = GroupMember::find()
        .filter(group_member::Column::GroupId.eq(gid))
        .filter(group_member::Column::Status.eq(group_member::MembershipStatus::Active))
        .all(&state.db)
        .await?;
    for gm in &memberships {
        notify(
            &state.db,
            gm.member_id,
            Some(gid),
            Some(row.id),
            NotificationKind::DocumentUploaded,
            format!("New document \"{}\" in \"{}\"", title, g.name),
        )
        .await;
    }

    Ok(Json(document_info(&row, &state.public_base_url)))
}

/// Delete a document (organization only)
#[utoipa::path(
    delete,
    path = "/api/groups/{gid}/documents/{did}",
    params(
        ("gid" = Uuid, Path, description = "Group ID"),
        ("did" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path((gid, did)): Path<(Uuid, Uuid)>,
) -> Result<axum::http::StatusCode, ApiError> {
    let org = principal.organization()?;
    let g = load_group(&state.db, gid).await?;
    if g.organization_id != org.id {
        return Err(ApiError::Authorization(
            "Group belongs to a different organization".to_string(),
        ));
    }

    let doc = load_document(&state.db, did).await?;
    if doc.group_id != gid {
        return Err(ApiError::NotFound(format!(
            "Document '{}' not found in this group",
            did
        )));
    }

    let file_path = state.storage_dir.join(&doc.file_path);
    if let Err(e) = tokio::fs::remove_file(&file_path).await {
        warn!(path = %file_path.display(), error = %e, "failed to remove stored file");
    }

    doc.delete(&state.db).await?;
    info!(document_id = %did, "document deleted");

    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Get a document with completion stats
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document detail", body = DocumentDetail),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn document_detail(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentDetail>, ApiError> {
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let active_members = active_member_count(&state.db, g.id).await?;
    let completed = completed_count(&state.db, doc.id).await?;
    let not_completed = active_members.saturating_sub(completed);

    debug!(document_id = %id, completed, active_members, "document detail");

    Ok(Json(DocumentDetail {
        document: document_info(&doc, &state.public_base_url),
        completed_count: completed,
        not_completed_count: not_completed,
        completion_percent: completion_percent(completed, active_members),
    }))
}

/// Activity log for a document, newest first
#[utoipa::path(
    get,
    path = "/api/documents/{id}/activity",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Activity entries", body = ActivityList),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn document_activity(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActivityList>, ApiError> {
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let entries: Vec<ActivityEntry> = ActivityLog::find()
        .filter(activity_log::Column::DocumentId.eq(id))
        .order_by_desc(activity_log::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|e| ActivityEntry {
            action: e.action,
            member_id: e.member_id,
            created_at: e.created_at,
        })
        .collect();

    let total = entries.len();
    Ok(Json(ActivityList { entries, total }))
}
