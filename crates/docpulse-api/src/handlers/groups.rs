//! Group lifecycle and the join-by-code flow

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use docpulse_db::entities::{
    group, group_member, notification::NotificationKind, prelude::*,
};
use rand::Rng;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::notify;
use crate::handlers::{active_member_count, ensure_group_access, load_group};
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::AppState;

const JOIN_CODE_LEN: usize = 6;
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const JOIN_CODE_ATTEMPTS: usize = 10;

async fn group_info(
    state: &AppState,
    g: &group::Model,
) -> Result<GroupInfo, ApiError> {
    Ok(GroupInfo {
        id: g.id,
        name: g.name.clone(),
        description: g.description.clone(),
        code: g.code.clone(),
        status: g.status.to_value(),
        created_at: g.created_at,
        member_count: active_member_count(&state.db, g.id).await?,
    })
}

/// Generate a join code that is not already taken.
async fn generate_join_code(state: &AppState) -> Result<String, ApiError> {
    for _ in 0..JOIN_CODE_ATTEMPTS {
        let code: String = {
            let mut rng = rand::thread_rng();
            (0..JOIN_CODE_LEN)
                .map(|_| {
                    let idx = rng.gen_range(0..JOIN_CODE_ALPHABET.len());
                    JOIN_CODE_ALPHABET[idx] as char
                })
                .collect()
        };

        let taken = Group::find()
            .filter(group::Column::Code.eq(&code))
            .one(&state.db)
            .await?;
        if taken.is_none() {
            return Ok(code);
        }
    }

    Err(ApiError::Validation(
        "Could not allocate a unique join code".to_string(),
    ))
}

/// List groups visible to the caller
///
/// Organizations see the groups they own; members see the groups they
/// belong to.
#[utoipa::path(
    get,
    path = "/api/groups",
    responses(
        (status = 200, description = "Groups", body = GroupList)
    ),
    tag = "groups"
)]
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<GroupList>, ApiError> {
    debug!("listing groups");

    let rows = match &principal {
        AuthPrincipal::Organization(org) => {
            Group::find()
                .filter(group::Column::OrganizationId.eq(org.id))
                .order_by_desc(group::Column::CreatedAt)
                .all(&state.db)
                .await?
        }
        AuthPrincipal::Member(m) => {
            let group_ids: Vec<Uuid> = GroupMember::find()
                .filter(group_member::Column::MemberId.eq(m.id))
                .all(&state.db)
                .await?
                .into_iter()
                .map(|gm| gm.group_id)
                .collect();

            if group_ids.is_empty() {
                Vec::new()
            } else {
                Group::find()
                    .filter(group::Column::Id.is_in(group_ids))
                    .order_by_desc(group::Column::CreatedAt)
                    .all(&state.db)
                    .await?
            }
        }
    };

    let mut groups = Vec::with_capacity(rows.len());
    for g in &rows {
        groups.push(group_info(&state, g).await?);
    }

    let total = groups.len();
    Ok(Json(GroupList { groups, total }))
}

/// Create a group (organization only)
#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 200, description = "Created group", body = GroupInfo),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Not an organization account", body = ErrorResponse)
    ),
    tag = "groups"
)]
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<GroupInfo>, ApiError> {
    let org = principal.organization()?;

    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Group name is required".to_string()));
    }

    let code = generate_join_code(&state).await?;

    let row = group::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(req.name),
        description: Set(req.description),
        code: Set(code),
        organization_id: Set(org.id),
        status: Set(group::GroupStatus::Active),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!(group_id = %row.id, code = %row.code, "group created");

    Ok(Json(group_info(&state, &row).await?))
}

/// Get a group
#[utoipa::path(
    get,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group", body = GroupInfo),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "groups"
)]
pub async fn get_group(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupInfo>, ApiError> {
    let g = load_group(&state.db, id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;
    Ok(Json(group_info(&state, &g).await?))
}

/// Update a group's name or description (organization only)
#[utoipa::path(
    patch,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Updated group", body = GroupInfo),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "groups"
)]
pub async fn update_group(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<Json<GroupInfo>, ApiError> {
    let org = principal.organization()?;
    let g = load_group(&state.db, id).await?;
    if g.organization_id != org.id {
        return Err(ApiError::Authorization(
            "Group belongs to a different organization".to_string(),
        ));
    }

    let mut active = g.into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(description) = req.description {
        active.description = Set(description);
    }

    let updated = active.update(&state.db).await?;
    info!(group_id = %updated.id, "group updated");

    Ok(Json(group_info(&state, &updated).await?))
}

/// Delete a group (organization only)
///
/// Every member is notified before the cascade removes memberships,
/// documents, and their dependent rows.
#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "groups"
)]
pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, ApiError> {
    let org = principal.organization()?;
    let g = load_group(&state.db, id).await?;
    if g.organization_id != org.id {
        return Err(ApiError::Authorization(
            "Group belongs to a different organization".to_string(),
        ));
    }

    let memberships = GroupMember::find()
        .filter(group_member::Column::GroupId.eq(g.id))
        .all(&state.db)
        .await?;

    for gm in &memberships {
        notify(
            &state.db,
            gm.member_id,
            None,
            None,
            NotificationKind::GroupDeleted,
            format!("The group \"{}\" has been deleted", g.name),
        )
        .await;
    }

    info!(group_id = %g.id, "deleting group");
    g.delete(&state.db).await?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Toggle a group between active and inactive (organization only)
#[utoipa::path(
    patch,
    path = "/api/groups/{id}/archive",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group with toggled status", body = GroupInfo),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "groups"
)]
pub async fn archive_group(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupInfo>, ApiError> {
    let org = principal.organization()?;
    let g = load_group(&state.db, id).await?;
    if g.organization_id != org.id {
        return Err(ApiError::Authorization(
            "Group belongs to a different organization".to_string(),
        ));
    }

    let new_status = match g.status {
        group::GroupStatus::Active => group::GroupStatus::Inactive,
        group::GroupStatus::Inactive => group::GroupStatus::Active,
    };

    let group_id = g.id;
    let group_name = g.name.clone();

    let mut active = g.into_active_model();
    active.status = Set(new_status.clone());
    let updated = active.update(&state.db).await?;

    info!(group_id = %group_id, status = %new_status.to_value(), "group status toggled");

    let memberships = GroupMember::find()
        .filter(group_member::Column::GroupId.eq(group_id))
        .all(&state.db)
        .await?;
    for gm in &memberships {
        notify(
            &state.db,
            gm.member_id,
            Some(group_id),
            None,
            NotificationKind::GroupStatusChanged,
            format!(
                "The group \"{}\" is now {}",
                group_name,
                new_status.to_value()
            ),
        )
        .await;
    }

    Ok(Json(group_info(&state, &updated).await?))
}

/// Join a group by code (member only)
///
/// Joining is idempotent: a second attempt with the same code reports the
/// existing membership instead of creating another row.
#[utoipa::path(
    post,
    path = "/api/groups/join",
    request_body = JoinGroupRequest,
    responses(
        (status = 200, description = "Join result", body = JoinGroupResponse),
        (status = 400, description = "Unknown join code", body = ErrorResponse),
        (status = 403, description = "Not a member account", body = ErrorResponse)
    ),
    tag = "groups"
)]
pub async fn join_group(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(req): Json<JoinGroupRequest>,
) -> Result<Json<JoinGroupResponse>, ApiError> {
    let m = principal.member()?;

    let code = req.code.trim().to_uppercase();
    let g = Group::find()
        .filter(group::Column::Code.eq(&code))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Unknown group code '{}'", code)))?;

    if let Some(existing) = GroupMember::find_by_id((g.id, m.id)).one(&state.db).await? {
        debug!(group_id = %g.id, member_id = %m.id, "join is a no-op, membership exists");
        return Ok(Json(JoinGroupResponse {
            status: "exists".to_string(),
            membership_status: existing.status.to_value(),
            group_id: g.id,
            group_name: g.name,
        }));
    }

    group_member::ActiveModel {
        group_id: Set(g.id),
        member_id: Set(m.id),
        role: Set(group_member::GroupRole::Member),
        status: Set(group_member::MembershipStatus::Pending),
        joined_at: Set(Utc::now()),
        last_active: Set(None),
    }
    .insert(&state.db)
    .await?;

    info!(group_id = %g.id, member_id = %m.id, "membership requested");

    Ok(Json(JoinGroupResponse {
        status: "pending".to_string(),
        membership_status: group_member::MembershipStatus::Pending.to_value(),
        group_id: g.id,
        group_name: g.name,
    }))
}

/// List the caller's groups with their membership status (member only)
#[utoipa::path(
    get,
    path = "/api/my-groups",
    responses(
        (status = 200, description = "Groups with membership info", body = MyGroupList),
        (status = 403, description = "Not a member account", body = ErrorResponse)
    ),
    tag = "groups"
)]
pub async fn my_groups(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<MyGroupList>, ApiError> {
    let m = principal.member()?;

    let rows = GroupMember::find()
        .filter(group_member::Column::MemberId.eq(m.id))
        .find_also_related(Group)
        .all(&state.db)
        .await?;

    let mut groups = Vec::with_capacity(rows.len());
    for (gm, g) in rows {
        let Some(g) = g else { continue };
        groups.push(MyGroupInfo {
            group: group_info(&state, &g).await?,
            membership_status: gm.status.to_value(),
            role: gm.role.to_value(),
            joined_at: gm.joined_at,
        });
    }

    let total = groups.len();
    Ok(Json(MyGroupList { groups, total }))
}
