//! Session authentication middleware
//!
//! Extracts the session JWT from an HTTP-only cookie or the Authorization
//! header, validates it, resolves the principal against the matching account
//! table, and injects [`AuthPrincipal`] into request extensions.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use docpulse_db::entities::{member, organization, prelude::*};
use docpulse_auth::PrincipalKind;
use sea_orm::EntityTrait;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// The authenticated account behind a request
#[derive(Debug, Clone)]
pub enum AuthPrincipal {
    Member(member::Model),
    Organization(organization::Model),
}

impl AuthPrincipal {
    /// Require an individual member account; organizations get 403.
    pub fn member(&self) -> Result<&member::Model, ApiError> {
        match self {
            AuthPrincipal::Member(m) => Ok(m),
            AuthPrincipal::Organization(_) => Err(ApiError::Authorization(
                "This endpoint is for member accounts".to_string(),
            )),
        }
    }

    /// Require an organization account; members get 403.
    pub fn organization(&self) -> Result<&organization::Model, ApiError> {
        match self {
            AuthPrincipal::Organization(o) => Ok(o),
            AuthPrincipal::Member(_) => Err(ApiError::Authorization(
                "This endpoint is for organization accounts".to_string(),
            )),
        }
    }
}

/// Authentication middleware that validates session tokens
///
/// The token is taken from a `session_token` cookie first (web clients),
/// then from `Authorization: Bearer <token>` (API clients).
///
/// Returns 401 if the token is missing, malformed, expired, not a session
/// token, or its subject no longer exists in the claimed account table.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Cookie first, preferred for web apps
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(|c| c.trim())
                .find_map(|c| c.strip_prefix("session_token="))
        })
        .map(str::to_string);

    // Fall back to the Authorization header
    let token = match token {
        Some(t) => t,
        None => request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                ApiError::Authentication(
                    "Missing authentication token (cookie or Authorization header)".to_string(),
                )
            })?
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                ApiError::Authentication(
                    "Invalid Authorization header format. Expected 'Bearer <token>'".to_string(),
                )
            })?
            .to_string(),
    };

    let claims = state
        .jwt
        .validate(&token)
        .map_err(|e| ApiError::Authentication(format!("Invalid or expired token: {}", e)))?;

    if !claims.is_session() {
        return Err(ApiError::Authentication(
            "Expected a session token".to_string(),
        ));
    }

    let account_id = claims
        .account_id()
        .map_err(|_| ApiError::Authentication("Token subject is not a valid UUID".to_string()))?;

    let kind = claims.principal_kind.ok_or_else(|| {
        ApiError::Authentication("Token missing 'principal_kind' claim".to_string())
    })?;

    // Resolve the subject against the claimed account table; a deleted
    // account invalidates its outstanding tokens.
    let principal = match kind {
        PrincipalKind::User => Member::find_by_id(account_id)
            .one(&state.db)
            .await?
            .map(AuthPrincipal::Member),
        PrincipalKind::Organization => Organization::find_by_id(account_id)
            .one(&state.db)
            .await?
            .map(AuthPrincipal::Organization),
    }
    .ok_or_else(|| ApiError::Authentication("Account no longer exists".to_string()))?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
