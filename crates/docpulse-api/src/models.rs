use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request to register a member account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterMemberRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Organization name the member belongs to (free text, matched against
    /// registered organization names for the admin dashboard)
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Request to register an organization account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterOrganizationRequest {
    pub email: String,
    pub password: String,
    pub admin_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub phone_number: String,
    pub organization_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub organization_size: i32,
    pub registration_id: String,
}

/// Response after successful registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    /// Created account ID
    pub id: Uuid,
    /// Registered email
    pub email: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response with session tokens
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Account role: "user" or "organization"
    pub role: String,
    /// Account status (member approval status; "active" for organizations)
    pub status: String,
    /// Short-lived access token
    pub access: String,
    /// Longer-lived refresh token
    pub refresh: String,
}

/// Organization name entry for the registration dropdown
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationBrief {
    pub id: Uuid,
    pub organization_name: String,
}

/// List of registered organizations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationBriefList {
    pub organizations: Vec<OrganizationBrief>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Profiles and dashboards
// ---------------------------------------------------------------------------

/// Member profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Approval status: pending, active, or suspended
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Updatable member profile fields (email and status are immutable here)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Organization profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationProfile {
    pub id: Uuid,
    pub email: String,
    pub admin_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub phone_number: String,
    pub organization_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub organization_size: i32,
    pub registration_id: String,
    pub created_at: DateTime<Utc>,
}

/// Updatable organization profile fields (email and registration_id are immutable)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrganizationProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_size: Option<i32>,
}

/// Member reading dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberDashboard {
    pub full_name: String,
    /// Number of groups the member belongs to
    pub group_count: usize,
    pub group_names: Vec<String>,
    /// Documents across all joined groups
    pub total_documents: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub not_started: u64,
    /// floor(100 * completed / total), 0 when there are no documents
    pub completion_percent: u32,
    /// Documents started but not yet completed
    pub in_progress_documents: Vec<DocumentInfo>,
}

// ---------------------------------------------------------------------------
// Groups and memberships
// ---------------------------------------------------------------------------

/// Group information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupInfo {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// 6-character join code (immutable)
    pub code: String,
    /// active or inactive
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// Number of active members
    pub member_count: u64,
}

/// List of groups
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupList {
    pub groups: Vec<GroupInfo>,
    pub total: usize,
}

/// Request to create a group
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request to update a group (name/description only; the code never changes)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to join a group by code
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinGroupRequest {
    /// Join code (case-insensitive)
    pub code: String,
}

/// Result of a join attempt
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinGroupResponse {
    /// "pending" for a new request, "exists" when already a member
    pub status: String,
    /// Current membership status
    pub membership_status: String,
    pub group_id: Uuid,
    pub group_name: String,
}

/// A group together with the caller's membership in it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MyGroupInfo {
    pub group: GroupInfo,
    /// Caller's membership status in this group
    pub membership_status: String,
    /// Caller's role in this group
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// List of the caller's groups
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MyGroupList {
    pub groups: Vec<MyGroupInfo>,
    pub total: usize,
}

/// A member of a group, as seen by the group admin
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupMemberInfo {
    pub member_id: Uuid,
    pub full_name: String,
    pub email: String,
    /// admin or member
    pub role: String,
    /// pending, active, or suspended
    pub status: String,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
}

/// List of group members
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupMemberList {
    pub members: Vec<GroupMemberInfo>,
    pub total: usize,
}

/// Request to change a membership (or member) status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Must be one of: active, pending, suspended
    pub status: String,
}

/// Brief membership entry shown on the organization member list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MembershipBrief {
    pub group_id: Uuid,
    pub group_name: String,
    pub status: String,
    pub role: String,
}

/// A member of the organization with their group memberships
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrgMemberInfo {
    pub member_id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub status: String,
    pub memberships: Vec<MembershipBrief>,
}

/// List of organization members
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrgMemberList {
    pub members: Vec<OrgMemberInfo>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Document information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentInfo {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub summary: String,
    pub version: String,
    pub file_size: i64,
    /// Absolute URL the file is served from
    pub file_url: String,
    pub uploaded_at: DateTime<Utc>,
    pub views: i32,
    /// Members with any recorded read time
    pub readers: i32,
    /// Questions the AI failed to answer
    pub unanswered_questions: i32,
}

/// List of documents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentList {
    pub documents: Vec<DocumentInfo>,
    pub total: usize,
}

/// Document detail with completion stats
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentDetail {
    pub document: DocumentInfo,
    /// Active group members who completed the document
    pub completed_count: u64,
    /// Active group members who have not completed it
    pub not_completed_count: u64,
    /// floor(100 * completed / active members), 0 when the group is empty
    pub completion_percent: u32,
}

/// One activity log entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityEntry {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Activity log for a document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityList {
    pub entries: Vec<ActivityEntry>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Read tracking and engagement
// ---------------------------------------------------------------------------

/// Read status returned by a view event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadStatusResponse {
    pub document_id: Uuid,
    /// Caller's accumulated read time
    pub read_time_seconds: i64,
    pub is_completed: bool,
    /// Total document views (all members)
    pub views: i32,
    /// Active members who completed the document
    pub completed_count: u64,
    /// Mean read time over all tracked members, zero-time rows included
    pub avg_read_time_seconds: f64,
}

/// Progress report sent by the reader
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReadStatusRequest {
    /// Additional seconds read since the last report (delta, not total)
    #[serde(default)]
    pub read_time_seconds: i64,
    /// Completion flag; once true it never reverts
    #[serde(default)]
    pub is_completed: bool,
}

/// Result of a progress report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReadStatusResponse {
    pub document_id: Uuid,
    /// Caller's accumulated read time after this report
    pub read_time_seconds: i64,
    pub is_completed: bool,
    /// Members with any recorded read time
    pub readers: i32,
    pub avg_read_time_seconds: f64,
}

/// One engagement row (per active group member)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EngagementRow {
    pub member_id: Uuid,
    pub full_name: String,
    /// Completed, In Progress, or Pending
    pub state: String,
    /// Read time rendered in minutes ("2.0 mins"), "NA" when never opened
    pub duration: String,
}

/// Engagement report for a document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EngagementReport {
    pub document_id: Uuid,
    pub rows: Vec<EngagementRow>,
    /// floor(100 * completed / active members), 0 when the group is empty
    pub completion_percent: u32,
}

// ---------------------------------------------------------------------------
// AI Q&A
// ---------------------------------------------------------------------------

/// Question about a document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    pub group_id: Uuid,
    pub question: String,
}

/// Answer to a question
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub id: Uuid,
    pub answer: String,
    pub topic: String,
    /// answered, failed, or regenerated
    pub status: String,
    pub response_time_ms: i32,
}

/// A stored Q&A entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionInfo {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub status: String,
    pub visibility: String,
    pub asked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

/// List of Q&A entries
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionList {
    pub questions: Vec<QuestionInfo>,
    pub total: usize,
}

/// Question count for one topic
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicCount {
    pub topic: String,
    pub count: u64,
}

/// Topic aggregation for a document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicList {
    pub topics: Vec<TopicCount>,
    pub total: usize,
}

/// Per-member note on a document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    pub document_id: Uuid,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// Request to save a note
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveNoteRequest {
    pub content: String,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// One notification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationInfo {
    pub id: Uuid,
    /// Human-readable title derived from the kind
    pub title: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    /// Humanized relative time ("5 minutes ago")
    pub time_ago: String,
    pub created_at: DateTime<Utc>,
}

/// Notification list with unread count
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationList {
    pub notifications: Vec<NotificationInfo>,
    pub unread_count: u64,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Admin dashboard
// ---------------------------------------------------------------------------

/// Question count for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Most-viewed document entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViewedDocument {
    pub id: Uuid,
    pub title: String,
    pub views: i32,
}

/// Most-confusing document entry (by AI question volume)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfusingDocument {
    pub id: Uuid,
    pub title: String,
    pub question_count: u64,
}

/// Organization admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminDashboard {
    /// Active members whose profile names this organization
    pub active_employees: u64,
    pub total_groups: u64,
    pub total_documents: u64,
    pub total_questions: u64,
    pub questions_today: u64,
    /// Trailing 7 calendar days (oldest first), zero-filled
    pub question_series: Vec<DayCount>,
    /// Top 3 by views
    pub most_viewed: Vec<ViewedDocument>,
    /// Top 3 by AI question count
    pub most_confusing: Vec<ConfusingDocument>,
}
