//! Router-level integration tests
//!
//! Exercise the HTTP API end to end against an in-memory SQLite database
//! and a stubbed AI connector.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use docpulse_ai::{QaClient, QaError, QaResponse};
use docpulse_api::{ApiServer, ApiServerConfig, JWT_AUDIENCE, JWT_ISSUER};
use docpulse_auth::{JwtClaims, JwtValidator, PrincipalKind, SESSION_TOKEN_TYPE};
use docpulse_db::entities::{
    ai_question, document, group, group_member, member, organization, prelude::*, read_status,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret";

/// Stub connector with a fixed reply
struct StubQa {
    fail: bool,
}

#[async_trait]
impl QaClient for StubQa {
    fn model(&self) -> &str {
        "stub-model"
    }

    async fn ask(&self, _document_text: &str, _question: &str) -> Result<QaResponse, QaError> {
        if self.fail {
            return Err(QaError::RequestFailed("stub failure".to_string()));
        }
        Ok(QaResponse {
            answer: "Twenty days per year.".to_string(),
            topic: "Leave Policy".to_string(),
            latency_ms: 12,
        })
    }
}

struct TestApp {
    router: Router,
    db: DatabaseConnection,
    // Keeps the storage directory alive for the test's duration
    _storage: TempDir,
}

async fn setup() -> TestApp {
    setup_with_qa(StubQa { fail: false }).await
}

async fn setup_with_qa(qa: StubQa) -> TestApp {
    let db = docpulse_db::connect("sqlite::memory:")
        .await
        .expect("connect");
    docpulse_db::migrate(&db).await.expect("migrate");

    let storage = TempDir::new().expect("storage dir");

    let config = ApiServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        enable_cors: false,
        jwt_secret: TEST_SECRET.to_string(),
        storage_dir: storage.path().to_path_buf(),
        public_base_url: "http://test.local".to_string(),
    };

    let server = ApiServer::new(config, db.clone(), Arc::new(qa));
    TestApp {
        router: server.build_router(),
        db,
        _storage: storage,
    }
}

fn token_for(account_id: Uuid, kind: PrincipalKind) -> String {
    let claims = JwtClaims::new(
        account_id,
        JWT_ISSUER.to_string(),
        JWT_AUDIENCE.to_string(),
        Duration::hours(1),
    )
    .with_principal_kind(kind)
    .with_token_type(SESSION_TOKEN_TYPE);

    JwtValidator::encode(TEST_SECRET.as_bytes(), &claims).expect("sign token")
}

async fn seed_organization(db: &DatabaseConnection, name: &str) -> organization::Model {
    organization::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(format!("admin-{}@{}.test", Uuid::new_v4(), name)),
        password_hash: Set(docpulse_auth::hash_password("OrgPassword1!").unwrap()),
        admin_name: Set("Ada Admin".to_string()),
        designation: Set(None),
        phone_number: Set("+1-555-0100".to_string()),
        organization_name: Set(name.to_string()),
        industry: Set(None),
        organization_size: Set(100),
        registration_id: Set("REG-1".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed organization")
}

async fn seed_member(db: &DatabaseConnection, org_name: &str, name: &str) -> member::Model {
    member::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}-{}@example.com", name, Uuid::new_v4())),
        password_hash: Set(docpulse_auth::hash_password("MemberPassword1!").unwrap()),
        full_name: Set(name.to_string()),
        dob: Set(None),
        gender: Set(None),
        organization: Set(org_name.to_string()),
        department: Set(None),
        employee_id: Set(None),
        designation: Set(None),
        phone_number: Set("+1-555-0101".to_string()),
        address: Set(None),
        status: Set(member::MemberStatus::Active),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed member")
}

async fn seed_group(db: &DatabaseConnection, org: &organization::Model, code: &str) -> group::Model {
    group::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Onboarding".to_string()),
        description: Set(String::new()),
        code: Set(code.to_string()),
        organization_id: Set(org.id),
        status: Set(group::GroupStatus::Active),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed group")
}

async fn seed_membership(
    db: &DatabaseConnection,
    g: &group::Model,
    m: &member::Model,
    status: group_member::MembershipStatus,
) -> group_member::Model {
    group_member::ActiveModel {
        group_id: Set(g.id),
        member_id: Set(m.id),
        role: Set(group_member::GroupRole::Member),
        status: Set(status),
        joined_at: Set(Utc::now()),
        last_active: Set(None),
    }
    .insert(db)
    .await
    .expect("seed membership")
}

async fn seed_document(
    db: &DatabaseConnection,
    g: &group::Model,
    content: Option<&str>,
) -> document::Model {
    document::ActiveModel {
        id: Set(Uuid::new_v4()),
        group_id: Set(g.id),
        title: Set("Handbook".to_string()),
        summary: Set(String::new()),
        file_path: Set("group_documents/handbook.pdf".to_string()),
        file_size: Set(1024),
        uploaded_by: Set(Some(g.organization_id)),
        uploaded_at: Set(Utc::now()),
        content: Set(content.map(str::to_string)),
        views: Set(0),
        readers: Set(0),
        unanswered_questions: Set(0),
        version: Set("1.0".to_string()),
    }
    .insert(db)
    .await
    .expect("seed document")
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup().await;

    let response = app
        .router
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = setup().await;

    let response = app
        .router
        .oneshot(Request::builder().uri("/api/groups").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_and_login_member() {
    let app = setup().await;

    let register = Request::builder()
        .method("POST")
        .uri("/api/auth/register/member")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "new@example.com",
                "password": "LongEnough1!",
                "full_name": "New Member",
                "organization": "Acme Corp",
                "phone_number": "+1-555-0199"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(register).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let login = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "new@example.com", "password": "LongEnough1!"}).to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["role"], "user");
    assert_eq!(body["status"], "active");
    assert!(body["access"].as_str().unwrap().len() > 20);

    // The issued token works on protected routes
    let token = body["access"].as_str().unwrap().to_string();
    let response = app
        .router
        .oneshot(get("/api/me/profile", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_member_cannot_use_org_endpoints() {
    let app = setup().await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    let token = token_for(m.id, PrincipalKind::User);

    let response = app
        .router
        .oneshot(get("/api/admin/dashboard", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_membership_status_rejected_row_unchanged() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "STAT01").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Pending).await;

    let token = token_for(org.id, PrincipalKind::Organization);
    let uri = format!("/api/groups/{}/members/{}/status", g.id, m.id);

    let response = app
        .router
        .clone()
        .oneshot(send_json("PATCH", &uri, &token, json!({"status": "banned"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let row = GroupMember::find_by_id((g.id, m.id))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, group_member::MembershipStatus::Pending);
}

#[tokio::test]
async fn test_membership_status_change_notifies_member() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "STAT02").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Pending).await;

    let token = token_for(org.id, PrincipalKind::Organization);
    let uri = format!("/api/groups/{}/members/{}/status", g.id, m.id);

    let response = app
        .router
        .clone()
        .oneshot(send_json("PATCH", &uri, &token, json!({"status": "active"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let member_token = token_for(m.id, PrincipalKind::User);
    let response = app
        .router
        .oneshot(get("/api/notifications", &member_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["unread_count"], 1);
    assert_eq!(body["notifications"][0]["kind"], "status_changed");
}

#[tokio::test]
async fn test_join_is_idempotent() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "JOIN42").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    let token = token_for(m.id, PrincipalKind::User);

    // Lowercase code still matches
    let response = app
        .router
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/groups/join",
            &token,
            json!({"code": "join42"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");

    let response = app
        .router
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/groups/join",
            &token,
            json!({"code": "JOIN42"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "exists");
    assert_eq!(body["membership_status"], "pending");

    let count = GroupMember::find()
        .filter(group_member::Column::GroupId.eq(g.id))
        .filter(group_member::Column::MemberId.eq(m.id))
        .all(&app.db)
        .await
        .unwrap()
        .len();
    assert_eq!(count, 1, "Second join must not create another row");
}

#[tokio::test]
async fn test_unknown_join_code_is_client_error() {
    let app = setup().await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    let token = token_for(m.id, PrincipalKind::User);

    let response = app
        .router
        .oneshot(send_json(
            "POST",
            "/api/groups/join",
            &token,
            json!({"code": "NOSUCH"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_completion_percent_zero_without_active_members() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "EMPTY1").await;
    let doc = seed_document(&app.db, &g, None).await;

    let token = token_for(org.id, PrincipalKind::Organization);
    let response = app
        .router
        .oneshot(get(&format!("/api/documents/{}", doc.id), &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["completion_percent"], 0);
}

#[tokio::test]
async fn test_views_increase_on_every_view() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "VIEWS1").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;
    let doc = seed_document(&app.db, &g, None).await;

    let token = token_for(m.id, PrincipalKind::User);
    let uri = format!("/api/documents/{}/read-status", doc.id);

    let response = app.router.clone().oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["views"], 1);

    let response = app.router.clone().oneshot(get(&uri, &token)).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["views"], 2);
}

#[tokio::test]
async fn test_completion_is_sticky() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "STICK1").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;
    let doc = seed_document(&app.db, &g, None).await;

    let token = token_for(m.id, PrincipalKind::User);
    let uri = format!("/api/documents/{}/read-status", doc.id);

    let response = app
        .router
        .clone()
        .oneshot(send_json(
            "POST",
            &uri,
            &token,
            json!({"read_time_seconds": 60, "is_completed": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["is_completed"], true);
    assert_eq!(body["read_time_seconds"], 60);

    // A later report without the flag must not un-complete
    let response = app
        .router
        .clone()
        .oneshot(send_json(
            "POST",
            &uri,
            &token,
            json!({"read_time_seconds": 30, "is_completed": false}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["is_completed"], true);
    assert_eq!(body["read_time_seconds"], 90, "Time deltas accumulate");
    assert_eq!(body["readers"], 1);
}

#[tokio::test]
async fn test_negative_time_delta_rejected() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "NEG001").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;
    let doc = seed_document(&app.db, &g, None).await;

    let token = token_for(m.id, PrincipalKind::User);
    let response = app
        .router
        .oneshot(send_json(
            "POST",
            &format!("/api/documents/{}/read-status", doc.id),
            &token,
            json!({"read_time_seconds": -10}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_engagement_report_states_and_durations() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "ENGAG1").await;
    let a = seed_member(&app.db, "Acme Corp", "Member A").await;
    let b = seed_member(&app.db, "Acme Corp", "Member B").await;
    seed_membership(&app.db, &g, &a, group_member::MembershipStatus::Active).await;
    seed_membership(&app.db, &g, &b, group_member::MembershipStatus::Active).await;
    let doc = seed_document(&app.db, &g, None).await;

    // A read for 120 seconds and completed; B never opened the document
    read_status::ActiveModel {
        document_id: Set(doc.id),
        member_id: Set(a.id),
        is_completed: Set(true),
        read_time_seconds: Set(120),
        last_read_at: Set(Utc::now()),
    }
    .insert(&app.db)
    .await
    .unwrap();

    let token = token_for(org.id, PrincipalKind::Organization);
    let response = app
        .router
        .oneshot(get(&format!("/api/documents/{}/engagement", doc.id), &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["completion_percent"], 50);

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let row_a = rows.iter().find(|r| r["member_id"] == a.id.to_string()).unwrap();
    assert_eq!(row_a["state"], "Completed");
    assert_eq!(row_a["duration"], "2.0 mins");

    let row_b = rows.iter().find(|r| r["member_id"] == b.id.to_string()).unwrap();
    assert_eq!(row_b["state"], "Pending");
    assert_eq!(row_b["duration"], "NA");
}

#[tokio::test]
async fn test_admin_dashboard_series_zero_filled() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    seed_group(&app.db, &org, "DASH01").await;

    let token = token_for(org.id, PrincipalKind::Organization);
    let response = app
        .router
        .oneshot(get("/api/admin/dashboard", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let series = body["question_series"].as_array().unwrap();
    assert_eq!(series.len(), 7, "Exactly 7 calendar-day entries");
    for entry in series {
        assert_eq!(entry["count"], 0);
    }
    assert_eq!(body["questions_today"], 0);
}

#[tokio::test]
async fn test_ask_with_no_extractable_text_fails_question() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "ASKNO1").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;
    // file_path points at nothing, so extraction yields empty text
    let doc = seed_document(&app.db, &g, None).await;

    let token = token_for(m.id, PrincipalKind::User);
    let response = app
        .router
        .oneshot(send_json(
            "POST",
            &format!("/api/documents/{}/ask", doc.id),
            &token,
            json!({"group_id": g.id, "question": "What does it say?"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let rows = AiQuestion::find()
        .filter(ai_question::Column::DocumentId.eq(doc.id))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1, "The failed question is still persisted");
    assert_eq!(rows[0].status, ai_question::QuestionStatus::Failed);

    let doc = Document::find_by_id(doc.id).one(&app.db).await.unwrap().unwrap();
    assert_eq!(doc.unanswered_questions, 1);
}

#[tokio::test]
async fn test_ask_happy_path_records_answer() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "ASKOK1").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;
    let doc = seed_document(&app.db, &g, Some("Leave policy: 20 days per year.")).await;

    let token = token_for(m.id, PrincipalKind::User);
    let response = app
        .router
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/api/documents/{}/ask", doc.id),
            &token,
            json!({"group_id": g.id, "question": "How many leave days?"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["answer"], "Twenty days per year.");
    assert_eq!(body["topic"], "Leave Policy");
    assert_eq!(body["status"], "answered");

    // History shows the caller's question
    let response = app
        .router
        .oneshot(get(&format!("/api/documents/{}/history", doc.id), &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["questions"][0]["status"], "answered");
}

#[tokio::test]
async fn test_ask_connector_failure_marks_question_failed() {
    let app = setup_with_qa(StubQa { fail: true }).await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "ASKER1").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;
    let doc = seed_document(&app.db, &g, Some("Some document text.")).await;

    let token = token_for(m.id, PrincipalKind::User);
    let response = app
        .router
        .oneshot(send_json(
            "POST",
            &format!("/api/documents/{}/ask", doc.id),
            &token,
            json!({"group_id": g.id, "question": "Anything?"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let rows = AiQuestion::find()
        .filter(ai_question::Column::DocumentId.eq(doc.id))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(rows[0].status, ai_question::QuestionStatus::Failed);
}

#[tokio::test]
async fn test_group_delete_notifies_members() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "DELGRP").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;

    let token = token_for(org.id, PrincipalKind::Organization);
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/groups/{}", g.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(Group::find_by_id(g.id).one(&app.db).await.unwrap().is_none());

    let member_token = token_for(m.id, PrincipalKind::User);
    let response = app
        .router
        .oneshot(get("/api/notifications", &member_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["notifications"][0]["kind"], "group_deleted");
}

#[tokio::test]
async fn test_notification_of_other_member_is_hidden() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "NOTIF1").await;
    let a = seed_member(&app.db, "Acme Corp", "Member A").await;
    let b = seed_member(&app.db, "Acme Corp", "Member B").await;
    seed_membership(&app.db, &g, &a, group_member::MembershipStatus::Pending).await;

    // Trigger a notification for A
    let org_token = token_for(org.id, PrincipalKind::Organization);
    app.router
        .clone()
        .oneshot(send_json(
            "PATCH",
            &format!("/api/groups/{}/members/{}/status", g.id, a.id),
            &org_token,
            json!({"status": "active"}),
        ))
        .await
        .unwrap();

    let a_token = token_for(a.id, PrincipalKind::User);
    let response = app
        .router
        .clone()
        .oneshot(get("/api/notifications", &a_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    let notification_id = body["notifications"][0]["id"].as_str().unwrap().to_string();

    // B cannot mark A's notification as read
    let b_token = token_for(b.id, PrincipalKind::User);
    let response = app
        .router
        .oneshot(send_json(
            "POST",
            &format!("/api/notifications/{}/read", notification_id),
            &b_token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_member_dashboard_counts() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "MDASH1").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;

    let completed_doc = seed_document(&app.db, &g, None).await;
    let started_doc = seed_document(&app.db, &g, None).await;
    seed_document(&app.db, &g, None).await; // never opened

    read_status::ActiveModel {
        document_id: Set(completed_doc.id),
        member_id: Set(m.id),
        is_completed: Set(true),
        read_time_seconds: Set(300),
        last_read_at: Set(Utc::now()),
    }
    .insert(&app.db)
    .await
    .unwrap();
    read_status::ActiveModel {
        document_id: Set(started_doc.id),
        member_id: Set(m.id),
        is_completed: Set(false),
        read_time_seconds: Set(45),
        last_read_at: Set(Utc::now()),
    }
    .insert(&app.db)
    .await
    .unwrap();

    let token = token_for(m.id, PrincipalKind::User);
    let response = app
        .router
        .oneshot(get("/api/me/dashboard", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_documents"], 3);
    assert_eq!(body["completed"], 1);
    assert_eq!(body["in_progress"], 1);
    assert_eq!(body["not_started"], 1);
    assert_eq!(body["completion_percent"], 33);
    assert_eq!(body["in_progress_documents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_with_required_fields_only() {
    let app = setup().await;

    // Member: no dob/gender/department/employee_id/designation/address
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register/member")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "email": "minimal@example.com",
                        "password": "LongEnough1!",
                        "full_name": "Minimal Member",
                        "organization": "Acme Corp",
                        "phone_number": "+1-555-0150"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let row = Member::find()
        .filter(member::Column::Email.eq("minimal@example.com"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.designation, None);
    assert_eq!(row.department, None);

    // Organization: no designation/industry
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register/organization")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "email": "minimal-org@example.com",
                        "password": "LongEnough1!",
                        "admin_name": "Ada Admin",
                        "phone_number": "+1-555-0151",
                        "organization_name": "Minimal Corp",
                        "organization_size": 10,
                        "registration_id": "REG-9"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let row = Organization::find()
        .filter(organization::Column::Email.eq("minimal-org@example.com"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.designation, None);
    assert_eq!(row.industry, None);
}

#[tokio::test]
async fn test_upload_then_ask_persists_through_real_inserts() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "UPLOD1").await;
    let m = seed_member(&app.db, "Acme Corp", "Mara").await;
    seed_membership(&app.db, &g, &m, group_member::MembershipStatus::Active).await;

    let boundary = "docpulse-test-boundary";
    let multipart_body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nHandbook\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"summary\"\r\n\r\nCompany handbook\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"handbook.txt\"\r\n\
         Content-Type: text/plain\r\n\r\nplain text, not a PDF\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let org_token = token_for(org.id, PrincipalKind::Organization);
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/groups/{}/documents", g.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", org_token))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(multipart_body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let doc_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["title"], "Handbook");

    let row = Document::find_by_id(Uuid::parse_str(&doc_id).unwrap())
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.content, None, "Text is extracted lazily, not at upload");

    // The upload fans out to the active member
    let member_token = token_for(m.id, PrincipalKind::User);
    let response = app
        .router
        .clone()
        .oneshot(get("/api/notifications", &member_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["notifications"][0]["kind"], "document_uploaded");

    // Asking against a non-PDF file persists a failed question row
    let response = app
        .router
        .oneshot(send_json(
            "POST",
            &format!("/api/documents/{}/ask", doc_id),
            &member_token,
            json!({"group_id": g.id, "question": "What does it say?"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let rows = AiQuestion::find()
        .filter(ai_question::Column::DocumentId.eq(Uuid::parse_str(&doc_id).unwrap()))
        .all(&app.db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, ai_question::QuestionStatus::Failed);
    assert_eq!(rows[0].topic, None);
    assert_eq!(rows[0].answered_at, None);
}

#[tokio::test]
async fn test_avg_read_time_counts_unopened_rows() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let g = seed_group(&app.db, &org, "AVGRT1").await;
    let a = seed_member(&app.db, "Acme Corp", "Member A").await;
    let b = seed_member(&app.db, "Acme Corp", "Member B").await;
    seed_membership(&app.db, &g, &a, group_member::MembershipStatus::Active).await;
    seed_membership(&app.db, &g, &b, group_member::MembershipStatus::Active).await;
    let doc = seed_document(&app.db, &g, None).await;

    let a_token = token_for(a.id, PrincipalKind::User);
    let uri = format!("/api/documents/{}/read-status", doc.id);

    let response = app
        .router
        .clone()
        .oneshot(send_json(
            "POST",
            &uri,
            &a_token,
            json!({"read_time_seconds": 120, "is_completed": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["avg_read_time_seconds"], 120.0);

    // B opens the document but records no time; the mean covers B's row too
    let b_token = token_for(b.id, PrincipalKind::User);
    let response = app
        .router
        .clone()
        .oneshot(get(&uri, &b_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["avg_read_time_seconds"], 60.0);
}

#[tokio::test]
async fn test_group_create_generates_join_code() {
    let app = setup().await;
    let org = seed_organization(&app.db, "Acme Corp").await;
    let token = token_for(org.id, PrincipalKind::Organization);

    let response = app
        .router
        .oneshot(send_json(
            "POST",
            "/api/groups",
            &token,
            json!({"name": "Compliance", "description": "Required reading"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}
