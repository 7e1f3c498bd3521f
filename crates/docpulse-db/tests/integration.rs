//! Integration tests for docpulse-db
//!
//! Tests schema and entity operations with a real SQLite in-memory database

use chrono::Utc;
use docpulse_db::entities::{
    document, group, group_member, member, organization, prelude::*, read_status,
};
use docpulse_db::{connect, migrate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

/// Helper to create a test database
async fn setup_test_db() -> sea_orm::DatabaseConnection {
    let db = connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    migrate(&db).await.expect("Failed to run migrations");

    db
}

async fn insert_organization(db: &sea_orm::DatabaseConnection) -> organization::Model {
    organization::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(format!("org-{}@example.com", Uuid::new_v4())),
        password_hash: Set("$argon2id$stub".to_string()),
        admin_name: Set("Ada Admin".to_string()),
        designation: Set(Some("CTO".to_string())),
        phone_number: Set("+1-555-0100".to_string()),
        organization_name: Set("Acme Corp".to_string()),
        industry: Set(Some("Software".to_string())),
        organization_size: Set(250),
        registration_id: Set("REG-42".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert organization")
}

async fn insert_member(db: &sea_orm::DatabaseConnection, email: &str) -> member::Model {
    member::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("$argon2id$stub".to_string()),
        full_name: Set("Mara Member".to_string()),
        dob: Set(None),
        gender: Set(None),
        organization: Set("Acme Corp".to_string()),
        department: Set(Some("Engineering".to_string())),
        employee_id: Set(Some("E-100".to_string())),
        designation: Set(Some("Engineer".to_string())),
        phone_number: Set("+1-555-0101".to_string()),
        address: Set(None),
        status: Set(member::MemberStatus::Active),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert member")
}

async fn insert_group(
    db: &sea_orm::DatabaseConnection,
    org: &organization::Model,
    code: &str,
) -> group::Model {
    group::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Onboarding".to_string()),
        description: Set("Onboarding material".to_string()),
        code: Set(code.to_string()),
        organization_id: Set(org.id),
        status: Set(group::GroupStatus::Active),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert group")
}

#[tokio::test]
async fn test_database_connection() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let backend = db.get_database_backend();
    assert!(matches!(backend, sea_orm::DatabaseBackend::Sqlite));
}

#[tokio::test]
async fn test_migrations_run_successfully() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let result = migrate(&db).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_member_email_unique() {
    let db = setup_test_db().await;

    insert_member(&db, "dup@example.com").await;

    let second = member::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set("dup@example.com".to_string()),
        password_hash: Set("$argon2id$stub".to_string()),
        full_name: Set("Other".to_string()),
        dob: Set(None),
        gender: Set(None),
        organization: Set("Acme Corp".to_string()),
        department: Set(None),
        employee_id: Set(None),
        designation: Set(None),
        phone_number: Set("+1-555-0102".to_string()),
        address: Set(None),
        status: Set(member::MemberStatus::Pending),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await;

    assert!(second.is_err(), "Duplicate email should violate uniqueness");
}

#[tokio::test]
async fn test_group_join_code_unique() {
    let db = setup_test_db().await;
    let org = insert_organization(&db).await;

    insert_group(&db, &org, "AB12CD").await;

    let duplicate = group::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Other".to_string()),
        description: Set(String::new()),
        code: Set("AB12CD".to_string()),
        organization_id: Set(org.id),
        status: Set(group::GroupStatus::Active),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await;

    assert!(duplicate.is_err(), "Duplicate join code should be rejected");
}

#[tokio::test]
async fn test_membership_composite_key_prevents_duplicates() {
    let db = setup_test_db().await;
    let org = insert_organization(&db).await;
    let group = insert_group(&db, &org, "JOIN01").await;
    let member = insert_member(&db, "joiner@example.com").await;

    let membership = group_member::ActiveModel {
        group_id: Set(group.id),
        member_id: Set(member.id),
        role: Set(group_member::GroupRole::Member),
        status: Set(group_member::MembershipStatus::Pending),
        joined_at: Set(Utc::now()),
        last_active: Set(None),
    };

    membership.clone().insert(&db).await.expect("First insert");

    let second = membership.insert(&db).await;
    assert!(
        second.is_err(),
        "Second membership row for the same (group, member) pair must be rejected"
    );
}

#[tokio::test]
async fn test_group_delete_cascades_memberships_and_documents() {
    let db = setup_test_db().await;
    let org = insert_organization(&db).await;
    let group = insert_group(&db, &org, "CASCDE").await;
    let member = insert_member(&db, "cascade@example.com").await;

    group_member::ActiveModel {
        group_id: Set(group.id),
        member_id: Set(member.id),
        role: Set(group_member::GroupRole::Member),
        status: Set(group_member::MembershipStatus::Active),
        joined_at: Set(Utc::now()),
        last_active: Set(None),
    }
    .insert(&db)
    .await
    .expect("Failed to insert membership");

    document::ActiveModel {
        id: Set(Uuid::new_v4()),
        group_id: Set(group.id),
        title: Set("Handbook".to_string()),
        summary: Set(String::new()),
        file_path: Set("group_documents/handbook.pdf".to_string()),
        file_size: Set(1024),
        uploaded_by: Set(Some(org.id)),
        uploaded_at: Set(Utc::now()),
        content: Set(None),
        views: Set(0),
        readers: Set(0),
        unanswered_questions: Set(0),
        version: Set("1.0".to_string()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert document");

    Group::delete_by_id(group.id)
        .exec(&db)
        .await
        .expect("Failed to delete group");

    let memberships = GroupMember::find()
        .filter(group_member::Column::GroupId.eq(group.id))
        .count(&db)
        .await
        .expect("count memberships");
    let documents = Document::find()
        .filter(document::Column::GroupId.eq(group.id))
        .count(&db)
        .await
        .expect("count documents");

    assert_eq!(memberships, 0, "Memberships must cascade on group delete");
    assert_eq!(documents, 0, "Documents must cascade on group delete");
}

#[tokio::test]
async fn test_read_status_roundtrip() {
    let db = setup_test_db().await;
    let org = insert_organization(&db).await;
    let group = insert_group(&db, &org, "READ01").await;
    let member = insert_member(&db, "reader@example.com").await;

    let doc = document::ActiveModel {
        id: Set(Uuid::new_v4()),
        group_id: Set(group.id),
        title: Set("Policy Guide".to_string()),
        summary: Set(String::new()),
        file_path: Set("group_documents/policy-guide.pdf".to_string()),
        file_size: Set(2048),
        uploaded_by: Set(Some(org.id)),
        uploaded_at: Set(Utc::now()),
        content: Set(None),
        views: Set(0),
        readers: Set(0),
        unanswered_questions: Set(0),
        version: Set("1.0".to_string()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert document");

    read_status::ActiveModel {
        document_id: Set(doc.id),
        member_id: Set(member.id),
        is_completed: Set(false),
        read_time_seconds: Set(120),
        last_read_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert read status");

    let found = ReadStatus::find_by_id((doc.id, member.id))
        .one(&db)
        .await
        .expect("query")
        .expect("read status not found");

    assert_eq!(found.read_time_seconds, 120);
    assert!(!found.is_completed);
}
