//! Per-member engagement report for a document
//!
//! Read-only projection over memberships and read statuses; nothing here
//! mutates counters.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use docpulse_db::entities::{group_member, prelude::*, read_status as rs};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{ensure_group_access, load_document, load_group};
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::stats::{completion_percent, engagement_state, format_duration_mins};
use crate::AppState;

/// Engagement rows for a document
///
/// One row per currently-active group member: Completed, In Progress, or
/// Pending, with the read time rendered in minutes ("2.0 mins") or "NA" for
/// members who never opened the document.
#[utoipa::path(
    get,
    path = "/api/documents/{id}/engagement",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Engagement report", body = EngagementReport),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "engagement"
)]
pub async fn get_engagement(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<EngagementReport>, ApiError> {
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let active_members = GroupMember::find()
        .filter(group_member::Column::GroupId.eq(g.id))
        .filter(group_member::Column::Status.eq(group_member::MembershipStatus::Active))
        .find_also_related(Member)
        .all(&state.db)
        .await?;

    let statuses: HashMap<Uuid, rs::Model> = ReadStatus::find()
        .filter(rs::Column::DocumentId.eq(id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|r| (r.member_id, r))
        .collect();

    let mut rows = Vec::with_capacity(active_members.len());
    let mut completed = 0u64;

    for (gm, m) in &active_members {
        let Some(m) = m else { continue };
        let (is_completed, read_time) = statuses
            .get(&gm.member_id)
            .map(|r| (r.is_completed, r.read_time_seconds))
            .unwrap_or((false, 0));

        if is_completed {
            completed += 1;
        }

        rows.push(EngagementRow {
            member_id: m.id,
            full_name: m.full_name.clone(),
            state: engagement_state(is_completed, read_time).to_string(),
            duration: format_duration_mins(read_time),
        });
    }

    let total_active = active_members.len() as u64;

    debug!(document_id = %id, members = total_active, completed, "engagement report");

    Ok(Json(EngagementReport {
        document_id: id,
        rows,
        completion_percent: completion_percent(completed, total_active),
    }))
}
