//! Consolidated initial schema migration

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. Create members table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(uuid(Member::Id).primary_key())
                    .col(string_len(Member::Email, 255).not_null().unique_key())
                    .col(string_len(Member::PasswordHash, 255).not_null())
                    .col(string_len(Member::FullName, 255).not_null())
                    .col(date_null(Member::Dob))
                    .col(string_len_null(Member::Gender, 32))
                    .col(string_len(Member::Organization, 255).not_null())
                    .col(string_len_null(Member::Department, 255))
                    .col(string_len_null(Member::EmployeeId, 64))
                    .col(string_len_null(Member::Designation, 255))
                    .col(string_len(Member::PhoneNumber, 32).not_null())
                    .col(text_null(Member::Address))
                    .col(string_len(Member::Status, 32).not_null().default("pending"))
                    .col(
                        timestamp_with_time_zone(Member::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Member::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_members_email")
                    .table(Member::Table)
                    .col(Member::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_members_organization")
                    .table(Member::Table)
                    .col(Member::Organization)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. Create organizations table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(uuid(Organization::Id).primary_key())
                    .col(
                        string_len(Organization::Email, 255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(string_len(Organization::PasswordHash, 255).not_null())
                    .col(string_len(Organization::AdminName, 255).not_null())
                    .col(string_len_null(Organization::Designation, 255))
                    .col(string_len(Organization::PhoneNumber, 32).not_null())
                    .col(string_len(Organization::OrganizationName, 255).not_null())
                    .col(string_len_null(Organization::Industry, 255))
                    .col(integer(Organization::OrganizationSize).not_null().default(0))
                    .col(string_len(Organization::RegistrationId, 128).not_null())
                    .col(
                        timestamp_with_time_zone(Organization::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_organizations_email")
                    .table(Organization::Table)
                    .col(Organization::Email)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. Create groups table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Group::Table)
                    .if_not_exists()
                    .col(uuid(Group::Id).primary_key())
                    .col(string_len(Group::Name, 255).not_null())
                    .col(text(Group::Description).not_null())
                    .col(string_len(Group::Code, 10).not_null().unique_key())
                    .col(uuid(Group::OrganizationId).not_null())
                    .col(string_len(Group::Status, 32).not_null().default("active"))
                    .col(
                        timestamp_with_time_zone(Group::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_groups_organization_id")
                            .from(Group::Table, Group::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_groups_code")
                    .table(Group::Table)
                    .col(Group::Code)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_groups_organization_id")
                    .table(Group::Table)
                    .col(Group::OrganizationId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 4. Create group_members junction table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(GroupMember::Table)
                    .if_not_exists()
                    .col(uuid(GroupMember::GroupId).not_null())
                    .col(uuid(GroupMember::MemberId).not_null())
                    .col(string_len(GroupMember::Role, 32).not_null().default("member"))
                    .col(
                        string_len(GroupMember::Status, 32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        timestamp_with_time_zone(GroupMember::JoinedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(GroupMember::LastActive))
                    .primary_key(
                        Index::create()
                            .col(GroupMember::GroupId)
                            .col(GroupMember::MemberId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_members_group_id")
                            .from(GroupMember::Table, GroupMember::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_members_member_id")
                            .from(GroupMember::Table, GroupMember::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_group_members_member_id")
                    .table(GroupMember::Table)
                    .col(GroupMember::MemberId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 5. Create documents table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(uuid(Document::Id).primary_key())
                    .col(uuid(Document::GroupId).not_null())
                    .col(string_len(Document::Title, 255).not_null())
                    .col(text(Document::Summary).not_null())
                    .col(string_len(Document::FilePath, 512).not_null())
                    .col(big_integer(Document::FileSize).not_null().default(0))
                    .col(uuid_null(Document::UploadedBy))
                    .col(
                        timestamp_with_time_zone(Document::UploadedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(text_null(Document::Content))
                    .col(integer(Document::Views).not_null().default(0))
                    .col(integer(Document::Readers).not_null().default(0))
                    .col(
                        integer(Document::UnansweredQuestions)
                            .not_null()
                            .default(0),
                    )
                    .col(string_len(Document::Version, 20).not_null().default("1.0"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_group_id")
                            .from(Document::Table, Document::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_uploaded_by")
                            .from(Document::Table, Document::UploadedBy)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_documents_group_id")
                    .table(Document::Table)
                    .col(Document::GroupId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 6. Create document_read_statuses table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(ReadStatus::Table)
                    .if_not_exists()
                    .col(uuid(ReadStatus::DocumentId).not_null())
                    .col(uuid(ReadStatus::MemberId).not_null())
                    .col(boolean(ReadStatus::IsCompleted).not_null().default(false))
                    .col(
                        big_integer(ReadStatus::ReadTimeSeconds)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        timestamp_with_time_zone(ReadStatus::LastReadAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ReadStatus::DocumentId)
                            .col(ReadStatus::MemberId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_read_statuses_document_id")
                            .from(ReadStatus::Table, ReadStatus::DocumentId)
                            .to(Document::Table, Document::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_read_statuses_member_id")
                            .from(ReadStatus::Table, ReadStatus::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_read_statuses_member_id")
                    .table(ReadStatus::Table)
                    .col(ReadStatus::MemberId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 7. Create ai_questions table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(AiQuestion::Table)
                    .if_not_exists()
                    .col(uuid(AiQuestion::Id).primary_key())
                    .col(uuid_null(AiQuestion::MemberId))
                    .col(uuid(AiQuestion::GroupId).not_null())
                    .col(uuid(AiQuestion::DocumentId).not_null())
                    .col(text(AiQuestion::Question).not_null())
                    .col(text(AiQuestion::Answer).not_null())
                    .col(string_len_null(AiQuestion::Topic, 100))
                    .col(
                        string_len(AiQuestion::AiModel, 100)
                            .not_null()
                            .default("gemini-2.5-flash"),
                    )
                    .col(integer_null(AiQuestion::ResponseTimeMs))
                    .col(
                        string_len(AiQuestion::Status, 32)
                            .not_null()
                            .default("answered"),
                    )
                    .col(
                        string_len(AiQuestion::Visibility, 32)
                            .not_null()
                            .default("group"),
                    )
                    .col(
                        timestamp_with_time_zone(AiQuestion::AskedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(AiQuestion::AnsweredAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_questions_member_id")
                            .from(AiQuestion::Table, AiQuestion::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_questions_group_id")
                            .from(AiQuestion::Table, AiQuestion::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_questions_document_id")
                            .from(AiQuestion::Table, AiQuestion::DocumentId)
                            .to(Document::Table, Document::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ai_questions_document_id")
                    .table(AiQuestion::Table)
                    .col(AiQuestion::DocumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ai_questions_asked_at")
                    .table(AiQuestion::Table)
                    .col(AiQuestion::AskedAt)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 8. Create document_notes table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(DocumentNote::Table)
                    .if_not_exists()
                    .col(uuid(DocumentNote::MemberId).not_null())
                    .col(uuid(DocumentNote::DocumentId).not_null())
                    .col(text(DocumentNote::Content).not_null())
                    .col(
                        timestamp_with_time_zone(DocumentNote::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(DocumentNote::MemberId)
                            .col(DocumentNote::DocumentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_notes_member_id")
                            .from(DocumentNote::Table, DocumentNote::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_notes_document_id")
                            .from(DocumentNote::Table, DocumentNote::DocumentId)
                            .to(Document::Table, Document::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 9. Create notifications table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(uuid(Notification::Id).primary_key())
                    .col(uuid(Notification::MemberId).not_null())
                    .col(uuid_null(Notification::GroupId))
                    .col(uuid_null(Notification::DocumentId))
                    .col(string_len(Notification::Kind, 32).not_null())
                    .col(text(Notification::Message).not_null())
                    .col(boolean(Notification::Read).not_null().default(false))
                    .col(
                        timestamp_with_time_zone(Notification::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_member_id")
                            .from(Notification::Table, Notification::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_member_id")
                    .table(Notification::Table)
                    .col(Notification::MemberId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 10. Create activity_logs table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(ActivityLog::Table)
                    .if_not_exists()
                    .col(uuid(ActivityLog::Id).primary_key())
                    .col(uuid_null(ActivityLog::MemberId))
                    .col(uuid_null(ActivityLog::OrganizationId))
                    .col(uuid_null(ActivityLog::GroupId))
                    .col(uuid_null(ActivityLog::DocumentId))
                    .col(string_len(ActivityLog::Action, 255).not_null())
                    .col(
                        timestamp_with_time_zone(ActivityLog::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activity_logs_document_id")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::DocumentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order (respecting foreign keys)
        manager
            .drop_table(Table::drop().table(ActivityLog::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DocumentNote::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AiQuestion::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ReadStatus::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Document::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GroupMember::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Group::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Organization::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await?;

        Ok(())
    }
}

// ============================================================
// Table identifiers
// ============================================================

#[derive(DeriveIden)]
enum Member {
    #[sea_orm(iden = "members")]
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Dob,
    Gender,
    Organization,
    Department,
    EmployeeId,
    Designation,
    PhoneNumber,
    Address,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organization {
    #[sea_orm(iden = "organizations")]
    Table,
    Id,
    Email,
    PasswordHash,
    AdminName,
    Designation,
    PhoneNumber,
    OrganizationName,
    Industry,
    OrganizationSize,
    RegistrationId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Group {
    #[sea_orm(iden = "groups")]
    Table,
    Id,
    Name,
    Description,
    Code,
    OrganizationId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupMember {
    #[sea_orm(iden = "group_members")]
    Table,
    GroupId,
    MemberId,
    Role,
    Status,
    JoinedAt,
    LastActive,
}

#[derive(DeriveIden)]
enum Document {
    #[sea_orm(iden = "documents")]
    Table,
    Id,
    GroupId,
    Title,
    Summary,
    FilePath,
    FileSize,
    UploadedBy,
    UploadedAt,
    Content,
    Views,
    Readers,
    UnansweredQuestions,
    Version,
}

#[derive(DeriveIden)]
enum ReadStatus {
    #[sea_orm(iden = "document_read_statuses")]
    Table,
    DocumentId,
    MemberId,
    IsCompleted,
    ReadTimeSeconds,
    LastReadAt,
}

#[derive(DeriveIden)]
enum AiQuestion {
    #[sea_orm(iden = "ai_questions")]
    Table,
    Id,
    MemberId,
    GroupId,
    DocumentId,
    Question,
    Answer,
    Topic,
    AiModel,
    ResponseTimeMs,
    Status,
    Visibility,
    AskedAt,
    AnsweredAt,
}

#[derive(DeriveIden)]
enum DocumentNote {
    #[sea_orm(iden = "document_notes")]
    Table,
    MemberId,
    DocumentId,
    Content,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notification {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    MemberId,
    GroupId,
    DocumentId,
    Kind,
    Message,
    Read,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ActivityLog {
    #[sea_orm(iden = "activity_logs")]
    Table,
    Id,
    MemberId,
    OrganizationId,
    GroupId,
    DocumentId,
    Action,
    CreatedAt,
}
