pub mod error;
pub mod events;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod stats;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use docpulse_ai::QaClient;
use docpulse_auth::JwtValidator;
use sea_orm::DatabaseConnection;

pub use error::ApiError;

/// Issuer claim on session tokens
pub const JWT_ISSUER: &str = "docpulse";
/// Audience claim on session tokens
pub const JWT_AUDIENCE: &str = "docpulse-api";

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: Arc<JwtValidator>,
    pub qa: Arc<dyn QaClient>,
    /// Root directory uploaded files are stored under
    pub storage_dir: PathBuf,
    /// Base URL file links are derived from
    pub public_base_url: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DocPulse API",
        version = "0.1.0",
        description = "REST API for document sharing and engagement tracking",
        contact(
            name = "DocPulse Team",
            email = "team@docpulse.dev"
        )
    ),
    paths(
        handlers::health_check,
        handlers::register_member,
        handlers::register_organization,
        handlers::login,
        handlers::list_organizations,
        handlers::get_member_profile,
        handlers::update_member_profile,
        handlers::member_dashboard,
        handlers::get_org_profile,
        handlers::update_org_profile,
        handlers::admin_dashboard,
        handlers::list_groups,
        handlers::create_group,
        handlers::get_group,
        handlers::update_group,
        handlers::delete_group,
        handlers::archive_group,
        handlers::join_group,
        handlers::my_groups,
        handlers::list_group_members,
        handlers::update_membership_status,
        handlers::remove_group_member,
        handlers::list_org_members,
        handlers::update_org_member_status,
        handlers::remove_org_member,
        handlers::list_documents,
        handlers::upload_document,
        handlers::delete_document,
        handlers::document_detail,
        handlers::document_activity,
        handlers::view_document,
        handlers::update_read_status,
        handlers::get_engagement,
        handlers::ask_question,
        handlers::question_history,
        handlers::list_questions,
        handlers::list_topics,
        handlers::get_note,
        handlers::save_note,
        handlers::list_notifications,
        handlers::mark_notification_read,
    ),
    components(
        schemas(
            models::ErrorResponse,
            models::HealthResponse,
            models::RegisterMemberRequest,
            models::RegisterOrganizationRequest,
            models::RegisterResponse,
            models::LoginRequest,
            models::LoginResponse,
            models::OrganizationBrief,
            models::OrganizationBriefList,
            models::MemberProfile,
            models::UpdateMemberProfileRequest,
            models::OrganizationProfile,
            models::UpdateOrganizationProfileRequest,
            models::MemberDashboard,
            models::GroupInfo,
            models::GroupList,
            models::CreateGroupRequest,
            models::UpdateGroupRequest,
            models::JoinGroupRequest,
            models::JoinGroupResponse,
            models::MyGroupInfo,
            models::MyGroupList,
            models::GroupMemberInfo,
            models::GroupMemberList,
            models::UpdateStatusRequest,
            models::MembershipBrief,
            models::OrgMemberInfo,
            models::OrgMemberList,
            models::DocumentInfo,
            models::DocumentList,
            models::DocumentDetail,
            models::ActivityEntry,
            models::ActivityList,
            models::ReadStatusResponse,
            models::UpdateReadStatusRequest,
            models::UpdateReadStatusResponse,
            models::EngagementRow,
            models::EngagementReport,
            models::AskRequest,
            models::AskResponse,
            models::QuestionInfo,
            models::QuestionList,
            models::TopicCount,
            models::TopicList,
            models::NoteResponse,
            models::SaveNoteRequest,
            models::NotificationInfo,
            models::NotificationList,
            models::DayCount,
            models::ViewedDocument,
            models::ConfusingDocument,
            models::AdminDashboard,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "profiles", description = "Member and organization profiles"),
        (name = "groups", description = "Group management and joining"),
        (name = "members", description = "Membership administration"),
        (name = "documents", description = "Document upload and inspection"),
        (name = "read-tracking", description = "Per-member reading progress"),
        (name = "engagement", description = "Engagement reporting"),
        (name = "ai", description = "AI Q&A and notes"),
        (name = "notifications", description = "In-app notifications"),
        (name = "dashboard", description = "Organization analytics"),
        (name = "system", description = "System health endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS (for development)
    pub enable_cors: bool,
    /// Secret used to sign and verify session tokens
    pub jwt_secret: String,
    /// Root directory uploaded files are stored under
    pub storage_dir: PathBuf,
    /// Base URL file links are derived from
    pub public_base_url: String,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            enable_cors: true,
            jwt_secret: "change-me-in-production".to_string(),
            storage_dir: PathBuf::from("./storage"),
            public_base_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, db: DatabaseConnection, qa: Arc<dyn QaClient>) -> Self {
        let jwt = Arc::new(
            JwtValidator::new(config.jwt_secret.as_bytes())
                .with_issuer(JWT_ISSUER.to_string())
                .with_audience(JWT_AUDIENCE.to_string()),
        );

        let state = Arc::new(AppState {
            db,
            jwt,
            qa,
            storage_dir: config.storage_dir.clone(),
            public_base_url: config.public_base_url.clone(),
        });

        Self { config, state }
    }

    /// Shared application state (used by the binary for static file serving)
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();

        // PUBLIC routes (no authentication required)
        let public_router = Router::new()
            .route("/api/health", get(handlers::health_check))
            .route("/api/auth/register/member", post(handlers::register_member))
            .route(
                "/api/auth/register/organization",
                post(handlers::register_organization),
            )
            .route("/api/auth/login", post(handlers::login))
            .route("/api/organizations", get(handlers::list_organizations))
            .with_state(self.state.clone());

        // PROTECTED routes (require a session token)
        let protected_router = Router::new()
            .route(
                "/api/me/profile",
                get(handlers::get_member_profile).put(handlers::update_member_profile),
            )
            .route("/api/me/dashboard", get(handlers::member_dashboard))
            .route(
                "/api/org/profile",
                get(handlers::get_org_profile).put(handlers::update_org_profile),
            )
            .route("/api/admin/dashboard", get(handlers::admin_dashboard))
            .route(
                "/api/groups",
                get(handlers::list_groups).post(handlers::create_group),
            )
            .route("/api/groups/join", post(handlers::join_group))
            .route("/api/my-groups", get(handlers::my_groups))
            .route(
                "/api/groups/{id}",
                get(handlers::get_group)
                    .patch(handlers::update_group)
                    .delete(handlers::delete_group),
            )
            .route("/api/groups/{id}/archive", patch(handlers::archive_group))
            .route(
                "/api/groups/{gid}/members",
                get(handlers::list_group_members),
            )
            .route(
                "/api/groups/{gid}/members/{mid}",
                axum::routing::delete(handlers::remove_group_member),
            )
            .route(
                "/api/groups/{gid}/members/{mid}/status",
                patch(handlers::update_membership_status),
            )
            .route("/api/org/members", get(handlers::list_org_members))
            .route(
                "/api/org/members/{mid}",
                axum::routing::delete(handlers::remove_org_member),
            )
            .route(
                "/api/org/members/{mid}/status",
                patch(handlers::update_org_member_status),
            )
            .route(
                "/api/groups/{gid}/documents",
                get(handlers::list_documents).post(handlers::upload_document),
            )
            .route(
                "/api/groups/{gid}/documents/{did}",
                axum::routing::delete(handlers::delete_document),
            )
            .route("/api/documents/{id}", get(handlers::document_detail))
            .route(
                "/api/documents/{id}/activity",
                get(handlers::document_activity),
            )
            .route(
                "/api/documents/{id}/read-status",
                get(handlers::view_document).post(handlers::update_read_status),
            )
            .route(
                "/api/documents/{id}/engagement",
                get(handlers::get_engagement),
            )
            .route("/api/documents/{id}/ask", post(handlers::ask_question))
            .route("/api/documents/{id}/history", get(handlers::question_history))
            .route("/api/documents/{id}/qa", get(handlers::list_questions))
            .route("/api/documents/{id}/topics", get(handlers::list_topics))
            .route(
                "/api/documents/{id}/note",
                get(handlers::get_note).post(handlers::save_note),
            )
            .route("/api/notifications", get(handlers::list_notifications))
            .route(
                "/api/notifications/{id}/read",
                post(handlers::mark_notification_read),
            )
            .with_state(self.state.clone())
            .layer(axum_middleware::from_fn_with_state(
                self.state.clone(),
                middleware::require_auth,
            ));

        let api_router = public_router.merge(protected_router);

        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router);

        // For cookie-based auth we must allow credentials, which rules out a
        // wildcard origin; development origins are matched by predicate.
        let cors = if self.config.enable_cors {
            use tower_http::cors::AllowOrigin;

            Some(
                CorsLayer::new()
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::PATCH,
                    ])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
                    .allow_credentials(true)
                    .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
                        let origin_str = origin.to_str().unwrap_or("");
                        origin_str.starts_with("http://localhost:")
                            || origin_str.starts_with("http://127.0.0.1:")
                            || origin_str.starts_with("https://localhost:")
                            || origin_str.starts_with("https://127.0.0.1:")
                    })),
            )
        } else {
            None
        };

        let mut router = router.layer(TraceLayer::new_for_http());

        if let Some(cors) = cors {
            router = router.layer(cors);
        }

        router
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );
        info!("Swagger UI: http://{}/swagger-ui", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        // Ensure OpenAPI spec can be generated without panics
        let _api_doc = ApiDoc::openapi();
    }
}
