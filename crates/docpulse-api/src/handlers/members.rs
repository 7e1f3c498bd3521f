//! Membership administration, group- and organization-scoped

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use docpulse_db::entities::{
    group, group_member, member, notification::NotificationKind, prelude::*,
};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::notify;
use crate::handlers::{ensure_group_access, load_group};
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::AppState;

fn parse_membership_status(value: &str) -> Result<group_member::MembershipStatus, ApiError> {
    match value {
        "active" => Ok(group_member::MembershipStatus::Active),
        "pending" => Ok(group_member::MembershipStatus::Pending),
        "suspended" => Ok(group_member::MembershipStatus::Suspended),
        other => Err(ApiError::Validation(format!(
            "Invalid status '{}'. Expected one of: active, pending, suspended",
            other
        ))),
    }
}

fn parse_member_status(value: &str) -> Result<member::MemberStatus, ApiError> {
    match value {
        "active" => Ok(member::MemberStatus::Active),
        "pending" => Ok(member::MemberStatus::Pending),
        "suspended" => Ok(member::MemberStatus::Suspended),
        other => Err(ApiError::Validation(format!(
            "Invalid status '{}'. Expected one of: active, pending, suspended",
            other
        ))),
    }
}

/// List the members of a group
#[utoipa::path(
    get,
    path = "/api/groups/{gid}/members",
    params(("gid" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group members", body = GroupMemberList),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    tag = "members"
)]
pub async fn list_group_members(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(gid): Path<Uuid>,
) -> Result<Json<GroupMemberList>, ApiError> {
    let g = load_group(&state.db, gid).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let rows = GroupMember::find()
        .filter(group_member::Column::GroupId.eq(gid))
        .find_also_related(Member)
        .all(&state.db)
        .await?;

    let members: Vec<GroupMemberInfo> = rows
        .into_iter()
        .filter_map(|(gm, m)| {
            m.map(|m| GroupMemberInfo {
                member_id: m.id,
                full_name: m.full_name,
                email: m.email,
                role: gm.role.to_value(),
                status: gm.status.to_value(),
                joined_at: gm.joined_at,
                last_active: gm.last_active,
            })
        })
        .collect();

    let total = members.len();
    Ok(Json(GroupMemberList { members, total }))
}

/// Change a membership status (organization only)
///
/// The status must be one of the known values; anything else is rejected
/// with the row left unchanged. A real change notifies the member.
#[utoipa::path(
    patch,
    path = "/api/groups/{gid}/members/{mid}/status",
    params(
        ("gid" = Uuid, Path, description = "Group ID"),
        ("mid" = Uuid, Path, description = "Member ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated membership", body = GroupMemberInfo),
        (status = 400, description = "Invalid status value", body = ErrorResponse),
        (status = 404, description = "Membership not found", body = ErrorResponse)
    ),
    tag = "members"
)]
pub async fn update_membership_status(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path((gid, mid)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<GroupMemberInfo>, ApiError> {
    let org = principal.organization()?;
    let g = load_group(&state.db, gid).await?;
    if g.organization_id != org.id {
        return Err(ApiError::Authorization(
            "Group belongs to a different organization".to_string(),
        ));
    }

    // Validate before touching the row
    let new_status = parse_membership_status(&req.status)?;

    let gm = GroupMember::find_by_id((gid, mid))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))?;

    let m = Member::find_by_id(mid)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    let changed = gm.status != new_status;
    let updated = if changed {
        let mut active = gm.into_active_model();
        active.status = Set(new_status.clone());
        let updated = active.update(&state.db).await?;

        info!(group_id = %gid, member_id = %mid, status = %new_status.to_value(), "membership status changed");

        notify(
            &state.db,
            mid,
            Some(gid),
            None,
            NotificationKind::StatusChanged,
            format!(
                "Your status in \"{}\" is now {}",
                g.name,
                new_status.to_value()
            ),
        )
        .await;

        updated
    } else {
        debug!(group_id = %gid, member_id = %mid, "membership status unchanged");
        gm
    };

    Ok(Json(GroupMemberInfo {
        member_id: m.id,
        full_name: m.full_name,
        email: m.email,
        role: updated.role.to_value(),
        status: updated.status.to_value(),
        joined_at: updated.joined_at,
        last_active: updated.last_active,
    }))
}

/// Remove a member from a group (organization only)
#[utoipa::path(
    delete,
    path = "/api/groups/{gid}/members/{mid}",
    params(
        ("gid" = Uuid, Path, description = "Group ID"),
        ("mid" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 404, description = "Membership not found", body = ErrorResponse)
    ),
    tag = "members"
)]
pub async fn remove_group_member(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path((gid, mid)): Path<(Uuid, Uuid)>,
) -> Result<axum::http::StatusCode, ApiError> {
    let org = principal.organization()?;
    let g = load_group(&state.db, gid).await?;
    if g.organization_id != org.id {
        return Err(ApiError::Authorization(
            "Group belongs to a different organization".to_string(),
        ));
    }

    let gm = GroupMember::find_by_id((gid, mid))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))?;

    // Capture the name before the delete so the notification can reference it
    let group_name = g.name.clone();
    gm.delete(&state.db).await?;

    info!(group_id = %gid, member_id = %mid, "member removed from group");

    notify(
        &state.db,
        mid,
        None,
        None,
        NotificationKind::StatusChanged,
        format!("You have been removed from \"{}\"", group_name),
    )
    .await;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// List the organization's members with their group memberships
///
/// Membership in the organization is by profile organization name match.
#[utoipa::path(
    get,
    path = "/api/org/members",
    responses(
        (status = 200, description = "Organization members", body = OrgMemberList),
        (status = 403, description = "Not an organization account", body = ErrorResponse)
    ),
    tag = "members"
)]
pub async fn list_org_members(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<OrgMemberList>, ApiError> {
    let org = principal.organization()?;

    let member_rows = Member::find()
        .filter(member::Column::Organization.eq(&org.organization_name))
        .all(&state.db)
        .await?;

    let org_groups = Group::find()
        .filter(group::Column::OrganizationId.eq(org.id))
        .all(&state.db)
        .await?;
    let org_group_ids: Vec<Uuid> = org_groups.iter().map(|g| g.id).collect();

    let mut members = Vec::with_capacity(member_rows.len());
    for m in member_rows {
        let memberships = if org_group_ids.is_empty() {
            Vec::new()
        } else {
            GroupMember::find()
                .filter(group_member::Column::MemberId.eq(m.id))
                .filter(group_member::Column::GroupId.is_in(org_group_ids.clone()))
                .all(&state.db)
                .await?
        };

        let memberships = memberships
            .into_iter()
            .map(|gm| {
                let group_name = org_groups
                    .iter()
                    .find(|g| g.id == gm.group_id)
                    .map(|g| g.name.clone())
                    .unwrap_or_default();
                MembershipBrief {
                    group_id: gm.group_id,
                    group_name,
                    status: gm.status.to_value(),
                    role: gm.role.to_value(),
                }
            })
            .collect();

        members.push(OrgMemberInfo {
            member_id: m.id,
            full_name: m.full_name,
            email: m.email,
            department: m.department,
            designation: m.designation,
            status: m.status.to_value(),
            memberships,
        });
    }

    let total = members.len();
    Ok(Json(OrgMemberList { members, total }))
}

/// Change a member's account status (organization only)
#[utoipa::path(
    patch,
    path = "/api/org/members/{mid}/status",
    params(("mid" = Uuid, Path, description = "Member ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated member profile", body = MemberProfile),
        (status = 400, description = "Invalid status value", body = ErrorResponse),
        (status = 404, description = "Member not found", body = ErrorResponse)
    ),
    tag = "members"
)]
pub async fn update_org_member_status(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(mid): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<MemberProfile>, ApiError> {
    let org = principal.organization()?;

    let new_status = parse_member_status(&req.status)?;

    let m = Member::find_by_id(mid)
        .one(&state.db)
        .await?
        .filter(|m| m.organization == org.organization_name)
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    let mut active = m.into_active_model();
    active.status = Set(new_status.clone());
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&state.db).await?;

    info!(member_id = %mid, status = %new_status.to_value(), "member account status changed");

    Ok(Json(MemberProfile {
        id: updated.id,
        email: updated.email,
        full_name: updated.full_name,
        dob: updated.dob,
        gender: updated.gender,
        organization: updated.organization,
        department: updated.department,
        employee_id: updated.employee_id,
        designation: updated.designation,
        phone_number: updated.phone_number,
        address: updated.address,
        status: updated.status.to_value(),
        created_at: updated.created_at,
    }))
}

/// Remove a member from the organization (organization only)
///
/// Deletes the member's memberships in this organization's groups, then the
/// member account itself.
#[utoipa::path(
    delete,
    path = "/api/org/members/{mid}",
    params(("mid" = Uuid, Path, description = "Member ID")),
    responses(
        (status = 204, description = "Member removed"),
        (status = 404, description = "Member not found", body = ErrorResponse)
    ),
    tag = "members"
)]
pub async fn remove_org_member(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(mid): Path<Uuid>,
) -> Result<axum::http::StatusCode, ApiError> {
    let org = principal.organization()?;

    let m = Member::find_by_id(mid)
        .one(&state.db)
        .await?
        .filter(|m| m.organization == org.organization_name)
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    GroupMember::delete_many()
        .filter(group_member::Column::MemberId.eq(mid))
        .exec(&state.db)
        .await?;

    m.delete(&state.db).await?;

    info!(member_id = %mid, "member removed from organization");

    Ok(axum::http::StatusCode::NO_CONTENT)
}
