//! Best-effort side effects: notifications and activity logging
//!
//! These run after the primary mutation has committed. A failure here is
//! logged and swallowed; it never rolls back or fails the request.

use chrono::{DateTime, Utc};
use docpulse_db::entities::{activity_log, notification, notification::NotificationKind};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::warn;
use uuid::Uuid;

/// Deliver an in-app notification to one member.
pub async fn notify(
    db: &DatabaseConnection,
    member_id: Uuid,
    group_id: Option<Uuid>,
    document_id: Option<Uuid>,
    kind: NotificationKind,
    message: String,
) {
    let row = notification::ActiveModel {
        id: Set(Uuid::new_v4()),
        member_id: Set(member_id),
        group_id: Set(group_id),
        document_id: Set(document_id),
        kind: Set(kind),
        message: Set(message),
        read: Set(false),
        created_at: Set(Utc::now()),
    };

    if let Err(e) = row.insert(db).await {
        warn!(%member_id, error = %e, "failed to deliver notification");
    }
}

/// Append an activity log entry.
pub async fn log_activity(
    db: &DatabaseConnection,
    member_id: Option<Uuid>,
    organization_id: Option<Uuid>,
    group_id: Option<Uuid>,
    document_id: Option<Uuid>,
    action: impl Into<String>,
) {
    let row = activity_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        member_id: Set(member_id),
        organization_id: Set(organization_id),
        group_id: Set(group_id),
        document_id: Set(document_id),
        action: Set(action.into()),
        created_at: Set(Utc::now()),
    };

    if let Err(e) = row.insert(db).await {
        warn!(error = %e, "failed to append activity log entry");
    }
}

/// Humanize a timestamp relative to now ("5 minutes ago").
pub fn time_ago(at: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(at);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        let mins = seconds / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if seconds < 86_400 {
        let hours = seconds / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = seconds / 86_400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(1)), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(5)), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(3)), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(2)), "2 days ago");
    }
}
