//! Per-member read tracking
//!
//! GET is the view event (counts a view, creates the tracking row on first
//! open); POST is the periodic progress report from the reader UI.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use docpulse_db::entities::{document, prelude::*, read_status as rs};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::log_activity;
use crate::handlers::{avg_read_time_seconds, completed_count, ensure_group_access, load_document, load_group};
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::AppState;

/// Create the tracking row on first open; later calls return the existing row.
async fn ensure_read_status(
    state: &AppState,
    document_id: Uuid,
    member_id: Uuid,
) -> Result<rs::Model, ApiError> {
    if let Some(existing) = ReadStatus::find_by_id((document_id, member_id))
        .one(&state.db)
        .await?
    {
        return Ok(existing);
    }

    let row = rs::ActiveModel {
        document_id: Set(document_id),
        member_id: Set(member_id),
        is_completed: Set(false),
        read_time_seconds: Set(0),
        last_read_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    Ok(row)
}

/// Record a view and return the caller's read status (member only)
///
/// Every call increments the document's view counter with an atomic SQL
/// update; concurrent viewers never lose a count.
#[utoipa::path(
    get,
    path = "/api/documents/{id}/read-status",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Read status", body = ReadStatusResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "read-tracking"
)]
pub async fn view_document(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReadStatusResponse>, ApiError> {
    let m = principal.member()?;
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let status = ensure_read_status(&state, id, m.id).await?;

    Document::update_many()
        .col_expr(
            document::Column::Views,
            Expr::col(document::Column::Views).add(1),
        )
        .filter(document::Column::Id.eq(id))
        .exec(&state.db)
        .await?;

    log_activity(
        &state.db,
        Some(m.id),
        None,
        Some(g.id),
        Some(id),
        format!("Viewed document \"{}\"", doc.title),
    )
    .await;

    let doc = load_document(&state.db, id).await?;
    let completed = completed_count(&state.db, id).await?;
    let avg = avg_read_time_seconds(&state.db, id).await?;

    debug!(document_id = %id, member_id = %m.id, views = doc.views, "view recorded");

    Ok(Json(ReadStatusResponse {
        document_id: id,
        read_time_seconds: status.read_time_seconds,
        is_completed: status.is_completed,
        views: doc.views,
        completed_count: completed,
        avg_read_time_seconds: avg,
    }))
}

/// Report reading progress (member only)
///
/// `read_time_seconds` is a delta added server-side with an atomic SQL
/// update, so overlapping reports from two sessions both land. The
/// completion flag is sticky: once set it never reverts.
#[utoipa::path(
    post,
    path = "/api/documents/{id}/read-status",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = UpdateReadStatusRequest,
    responses(
        (status = 200, description = "Updated read status", body = UpdateReadStatusResponse),
        (status = 400, description = "Negative time delta", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "read-tracking"
)]
pub async fn update_read_status(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReadStatusRequest>,
) -> Result<Json<UpdateReadStatusResponse>, ApiError> {
    let m = principal.member()?;
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    if req.read_time_seconds < 0 {
        return Err(ApiError::Validation(
            "read_time_seconds must be non-negative".to_string(),
        ));
    }

    ensure_read_status(&state, id, m.id).await?;

    let mut update = ReadStatus::update_many()
        .col_expr(
            rs::Column::ReadTimeSeconds,
            Expr::col(rs::Column::ReadTimeSeconds).add(req.read_time_seconds),
        )
        .col_expr(rs::Column::LastReadAt, Expr::value(Utc::now()));

    // Sticky: only ever set to true, never back
    if req.is_completed {
        update = update.col_expr(rs::Column::IsCompleted, Expr::value(true));
    }

    update
        .filter(rs::Column::DocumentId.eq(id))
        .filter(rs::Column::MemberId.eq(m.id))
        .exec(&state.db)
        .await?;

    // Readers is defined as members with any recorded read time
    let readers = ReadStatus::find()
        .filter(rs::Column::DocumentId.eq(id))
        .filter(rs::Column::ReadTimeSeconds.gt(0))
        .count(&state.db)
        .await? as i32;

    Document::update_many()
        .col_expr(document::Column::Readers, Expr::value(readers))
        .filter(document::Column::Id.eq(id))
        .exec(&state.db)
        .await?;

    let status = ReadStatus::find_by_id((id, m.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Read status not found".to_string()))?;
    let avg = avg_read_time_seconds(&state.db, id).await?;

    debug!(
        document_id = %id,
        member_id = %m.id,
        total = status.read_time_seconds,
        "progress recorded"
    );

    Ok(Json(UpdateReadStatusResponse {
        document_id: id,
        read_time_seconds: status.read_time_seconds,
        is_completed: status.is_completed,
        readers,
        avg_read_time_seconds: avg,
    }))
}
