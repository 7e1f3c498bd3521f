//! Registration, login, and public lookups

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use docpulse_auth::{hash_password, verify_password, JwtClaims, PrincipalKind, SESSION_TOKEN_TYPE};
use docpulse_db::entities::{member, organization, prelude::*};
use sea_orm::{ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::*;
use crate::{AppState, JWT_AUDIENCE, JWT_ISSUER};

const ACCESS_TOKEN_TTL_HOURS: i64 = 24;
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Register a member account
#[utoipa::path(
    post,
    path = "/api/auth/register/member",
    request_body = RegisterMemberRequest,
    responses(
        (status = 200, description = "Member registered", body = RegisterResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterMemberRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    validate_credentials(&req.email, &req.password)?;

    let existing = Member::find()
        .filter(member::Column::Email.eq(&req.email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Validation("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Validation(format!("Unusable password: {}", e)))?;

    let now = Utc::now();
    let row = member::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(req.email.clone()),
        password_hash: Set(password_hash),
        full_name: Set(req.full_name),
        dob: Set(req.dob),
        gender: Set(req.gender),
        organization: Set(req.organization),
        department: Set(req.department),
        employee_id: Set(req.employee_id),
        designation: Set(req.designation),
        phone_number: Set(req.phone_number),
        address: Set(req.address),
        status: Set(member::MemberStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(member_id = %row.id, "member registered");

    Ok(Json(RegisterResponse {
        id: row.id,
        email: row.email,
    }))
}

/// Register an organization account
#[utoipa::path(
    post,
    path = "/api/auth/register/organization",
    request_body = RegisterOrganizationRequest,
    responses(
        (status = 200, description = "Organization registered", body = RegisterResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_organization(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterOrganizationRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    validate_credentials(&req.email, &req.password)?;

    let existing = Organization::find()
        .filter(organization::Column::Email.eq(&req.email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Validation("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Validation(format!("Unusable password: {}", e)))?;

    let row = organization::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(req.email.clone()),
        password_hash: Set(password_hash),
        admin_name: Set(req.admin_name),
        designation: Set(req.designation),
        phone_number: Set(req.phone_number),
        organization_name: Set(req.organization_name),
        industry: Set(req.industry),
        organization_size: Set(req.organization_size),
        registration_id: Set(req.registration_id),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!(organization_id = %row.id, "organization registered");

    Ok(Json(RegisterResponse {
        id: row.id,
        email: row.email,
    }))
}

/// Log in with email and password
///
/// Tries the member table first, then organizations; the two account
/// namespaces share one login endpoint.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if let Some(m) = Member::find()
        .filter(member::Column::Email.eq(&req.email))
        .one(&state.db)
        .await?
    {
        check_password(&req.password, &m.password_hash)?;
        let (access, refresh) = issue_tokens(&state, m.id, PrincipalKind::User)?;

        info!(member_id = %m.id, "member logged in");

        return Ok(Json(LoginResponse {
            role: PrincipalKind::User.as_str().to_string(),
            status: m.status.to_value(),
            access,
            refresh,
        }));
    }

    if let Some(org) = Organization::find()
        .filter(organization::Column::Email.eq(&req.email))
        .one(&state.db)
        .await?
    {
        check_password(&req.password, &org.password_hash)?;
        let (access, refresh) = issue_tokens(&state, org.id, PrincipalKind::Organization)?;

        info!(organization_id = %org.id, "organization logged in");

        return Ok(Json(LoginResponse {
            role: PrincipalKind::Organization.as_str().to_string(),
            status: "active".to_string(),
            access,
            refresh,
        }));
    }

    Err(ApiError::Authentication(
        "Invalid email or password".to_string(),
    ))
}

/// List registered organizations (for the member registration form)
#[utoipa::path(
    get,
    path = "/api/organizations",
    responses(
        (status = 200, description = "Registered organizations", body = OrganizationBriefList)
    ),
    tag = "auth"
)]
pub async fn list_organizations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OrganizationBriefList>, ApiError> {
    let organizations: Vec<OrganizationBrief> = Organization::find()
        .order_by_asc(organization::Column::OrganizationName)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|o| OrganizationBrief {
            id: o.id,
            organization_name: o.organization_name,
        })
        .collect();

    let total = organizations.len();
    Ok(Json(OrganizationBriefList {
        organizations,
        total,
    }))
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if !email.contains('@') {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

fn check_password(password: &str, hash: &str) -> Result<(), ApiError> {
    let ok = verify_password(password, hash)
        .map_err(|e| ApiError::Authentication(format!("Credential check failed: {}", e)))?;
    if !ok {
        return Err(ApiError::Authentication(
            "Invalid email or password".to_string(),
        ));
    }
    Ok(())
}

fn issue_tokens(
    state: &AppState,
    account_id: Uuid,
    kind: PrincipalKind,
) -> Result<(String, String), ApiError> {
    let access = JwtClaims::new(
        account_id,
        JWT_ISSUER.to_string(),
        JWT_AUDIENCE.to_string(),
        Duration::hours(ACCESS_TOKEN_TTL_HOURS),
    )
    .with_principal_kind(kind)
    .with_token_type(SESSION_TOKEN_TYPE);

    let refresh = JwtClaims::new(
        account_id,
        JWT_ISSUER.to_string(),
        JWT_AUDIENCE.to_string(),
        Duration::days(REFRESH_TOKEN_TTL_DAYS),
    )
    .with_principal_kind(kind)
    .with_token_type(SESSION_TOKEN_TYPE);

    let access = state
        .jwt
        .sign(&access)
        .map_err(|e| ApiError::Authentication(format!("Failed to issue token: {}", e)))?;
    let refresh = state
        .jwt
        .sign(&refresh)
        .map_err(|e| ApiError::Authentication(format!("Failed to issue token: {}", e)))?;

    Ok((access, refresh))
}
