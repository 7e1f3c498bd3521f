//! Member and organization profiles, member dashboard

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use docpulse_db::entities::{document, group, group_member, member, organization, prelude::*, read_status as rs};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::document_info;
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::stats::completion_percent;
use crate::AppState;

fn member_profile(m: &member::Model) -> MemberProfile {
    MemberProfile {
        id: m.id,
        email: m.email.clone(),
        full_name: m.full_name.clone(),
        dob: m.dob,
        gender: m.gender.clone(),
        organization: m.organization.clone(),
        department: m.department.clone(),
        employee_id: m.employee_id.clone(),
        designation: m.designation.clone(),
        phone_number: m.phone_number.clone(),
        address: m.address.clone(),
        status: m.status.to_value(),
        created_at: m.created_at,
    }
}

/// Get the caller's member profile
#[utoipa::path(
    get,
    path = "/api/me/profile",
    responses(
        (status = 200, description = "Member profile", body = MemberProfile),
        (status = 403, description = "Not a member account", body = ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn get_member_profile(
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<MemberProfile>, ApiError> {
    let m = principal.member()?;
    Ok(Json(member_profile(m)))
}

/// Update the caller's member profile
#[utoipa::path(
    put,
    path = "/api/me/profile",
    request_body = UpdateMemberProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = MemberProfile),
        (status = 403, description = "Not a member account", body = ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn update_member_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(req): Json<UpdateMemberProfileRequest>,
) -> Result<Json<MemberProfile>, ApiError> {
    let m = principal.member()?.clone();

    let mut active = m.into_active_model();
    if let Some(full_name) = req.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(dob) = req.dob {
        active.dob = Set(Some(dob));
    }
    if let Some(gender) = req.gender {
        active.gender = Set(Some(gender));
    }
    if let Some(department) = req.department {
        active.department = Set(Some(department));
    }
    if let Some(designation) = req.designation {
        active.designation = Set(Some(designation));
    }
    if let Some(phone_number) = req.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(address) = req.address {
        active.address = Set(Some(address));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;
    info!(member_id = %updated.id, "member profile updated");

    Ok(Json(member_profile(&updated)))
}

/// Member reading dashboard
#[utoipa::path(
    get,
    path = "/api/me/dashboard",
    responses(
        (status = 200, description = "Member dashboard", body = MemberDashboard),
        (status = 403, description = "Not a member account", body = ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn member_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<MemberDashboard>, ApiError> {
    let m = principal.member()?;
    debug!(member_id = %m.id, "building member dashboard");

    let memberships = GroupMember::find()
        .filter(group_member::Column::MemberId.eq(m.id))
        .all(&state.db)
        .await?;

    let group_ids: Vec<Uuid> = memberships.iter().map(|gm| gm.group_id).collect();

    let groups = if group_ids.is_empty() {
        Vec::new()
    } else {
        Group::find()
            .filter(group::Column::Id.is_in(group_ids.clone()))
            .all(&state.db)
            .await?
    };
    let group_names: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();

    let documents = if group_ids.is_empty() {
        Vec::new()
    } else {
        Document::find()
            .filter(document::Column::GroupId.is_in(group_ids))
            .all(&state.db)
            .await?
    };

    let statuses: HashMap<Uuid, rs::Model> = ReadStatus::find()
        .filter(rs::Column::MemberId.eq(m.id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|r| (r.document_id, r))
        .collect();

    let total_documents = documents.len() as u64;
    let mut completed = 0u64;
    let mut in_progress = 0u64;
    let mut in_progress_documents = Vec::new();

    for doc in &documents {
        match statuses.get(&doc.id) {
            Some(status) if status.is_completed => completed += 1,
            Some(status) if status.read_time_seconds > 0 => {
                in_progress += 1;
                in_progress_documents.push(document_info(doc, &state.public_base_url));
            }
            _ => {}
        }
    }
    let not_started = total_documents - completed - in_progress;

    Ok(Json(MemberDashboard {
        full_name: m.full_name.clone(),
        group_count: memberships.len(),
        group_names,
        total_documents,
        completed,
        in_progress,
        not_started,
        completion_percent: completion_percent(completed, total_documents),
        in_progress_documents,
    }))
}

fn org_profile(o: &organization::Model) -> OrganizationProfile {
    OrganizationProfile {
        id: o.id,
        email: o.email.clone(),
        admin_name: o.admin_name.clone(),
        designation: o.designation.clone(),
        phone_number: o.phone_number.clone(),
        organization_name: o.organization_name.clone(),
        industry: o.industry.clone(),
        organization_size: o.organization_size,
        registration_id: o.registration_id.clone(),
        created_at: o.created_at,
    }
}

/// Get the caller's organization profile
#[utoipa::path(
    get,
    path = "/api/org/profile",
    responses(
        (status = 200, description = "Organization profile", body = OrganizationProfile),
        (status = 403, description = "Not an organization account", body = ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn get_org_profile(
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<OrganizationProfile>, ApiError> {
    let o = principal.organization()?;
    Ok(Json(org_profile(o)))
}

/// Update the caller's organization profile
///
/// Email and registration_id are immutable.
#[utoipa::path(
    put,
    path = "/api/org/profile",
    request_body = UpdateOrganizationProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = OrganizationProfile),
        (status = 403, description = "Not an organization account", body = ErrorResponse)
    ),
    tag = "profiles"
)]
pub async fn update_org_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(req): Json<UpdateOrganizationProfileRequest>,
) -> Result<Json<OrganizationProfile>, ApiError> {
    let o = principal.organization()?.clone();

    let mut active = o.into_active_model();
    if let Some(admin_name) = req.admin_name {
        active.admin_name = Set(admin_name);
    }
    if let Some(designation) = req.designation {
        active.designation = Set(Some(designation));
    }
    if let Some(phone_number) = req.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(industry) = req.industry {
        active.industry = Set(Some(industry));
    }
    if let Some(size) = req.organization_size {
        active.organization_size = Set(size);
    }

    let updated = active.update(&state.db).await?;
    info!(organization_id = %updated.id, "organization profile updated");

    Ok(Json(org_profile(&updated)))
}
