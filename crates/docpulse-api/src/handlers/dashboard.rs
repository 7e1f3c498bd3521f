//! Organization admin dashboard

use axum::{extract::State, Extension, Json};
use chrono::{Duration, Utc};
use docpulse_db::entities::{ai_question, document, group, member, prelude::*};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::AppState;

const TOP_DOCUMENTS: usize = 3;
const SERIES_DAYS: i64 = 7;

/// Organization analytics dashboard (organization only)
///
/// Employee counting is by profile organization name match; the question
/// time series always has exactly 7 calendar-day entries, zero-filled.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Admin dashboard", body = AdminDashboard),
        (status = 403, description = "Not an organization account", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<AdminDashboard>, ApiError> {
    let org = principal.organization()?;
    debug!(organization_id = %org.id, "building admin dashboard");

    let active_employees = Member::find()
        .filter(member::Column::Organization.eq(&org.organization_name))
        .filter(member::Column::Status.eq(member::MemberStatus::Active))
        .count(&state.db)
        .await?;

    let group_ids: Vec<Uuid> = Group::find()
        .filter(group::Column::OrganizationId.eq(org.id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    let total_groups = group_ids.len() as u64;

    if group_ids.is_empty() {
        return Ok(Json(AdminDashboard {
            active_employees,
            total_groups,
            total_documents: 0,
            total_questions: 0,
            questions_today: 0,
            question_series: zero_filled_series(&HashMap::new()),
            most_viewed: Vec::new(),
            most_confusing: Vec::new(),
        }));
    }

    let total_documents = Document::find()
        .filter(document::Column::GroupId.is_in(group_ids.clone()))
        .count(&state.db)
        .await?;

    let total_questions = AiQuestion::find()
        .filter(ai_question::Column::GroupId.is_in(group_ids.clone()))
        .count(&state.db)
        .await?;

    let today_start = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();
    let questions_today = AiQuestion::find()
        .filter(ai_question::Column::GroupId.is_in(group_ids.clone()))
        .filter(ai_question::Column::AskedAt.gte(today_start))
        .count(&state.db)
        .await?;

    // Bucket the trailing week's questions by calendar day
    let window_start = today_start - Duration::days(SERIES_DAYS - 1);
    let recent = AiQuestion::find()
        .filter(ai_question::Column::GroupId.is_in(group_ids.clone()))
        .filter(ai_question::Column::AskedAt.gte(window_start))
        .all(&state.db)
        .await?;

    let mut buckets: HashMap<chrono::NaiveDate, u64> = HashMap::new();
    for q in &recent {
        *buckets.entry(q.asked_at.date_naive()).or_insert(0) += 1;
    }
    let question_series = zero_filled_series(&buckets);

    // Top 3 by views; id ascending breaks ties deterministically
    let most_viewed: Vec<ViewedDocument> = Document::find()
        .filter(document::Column::GroupId.is_in(group_ids.clone()))
        .order_by_desc(document::Column::Views)
        .order_by_asc(document::Column::Id)
        .limit(TOP_DOCUMENTS as u64)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|d| ViewedDocument {
            id: d.id,
            title: d.title,
            views: d.views,
        })
        .collect();

    // Top 3 by AI question volume
    let questions = AiQuestion::find()
        .filter(ai_question::Column::GroupId.is_in(group_ids))
        .all(&state.db)
        .await?;
    let mut per_document: HashMap<Uuid, u64> = HashMap::new();
    for q in &questions {
        *per_document.entry(q.document_id).or_insert(0) += 1;
    }
    let mut ranked: Vec<(Uuid, u64)> = per_document.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(TOP_DOCUMENTS);

    let mut most_confusing = Vec::with_capacity(ranked.len());
    for (doc_id, question_count) in ranked {
        if let Some(d) = Document::find_by_id(doc_id).one(&state.db).await? {
            most_confusing.push(ConfusingDocument {
                id: d.id,
                title: d.title,
                question_count,
            });
        }
    }

    Ok(Json(AdminDashboard {
        active_employees,
        total_groups,
        total_documents,
        total_questions,
        questions_today,
        question_series,
        most_viewed,
        most_confusing,
    }))
}

/// Exactly 7 entries, oldest first, zero where no questions were asked.
fn zero_filled_series(buckets: &HashMap<chrono::NaiveDate, u64>) -> Vec<DayCount> {
    let today = Utc::now().date_naive();
    (0..SERIES_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DayCount {
                date,
                count: buckets.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_is_zero_filled_and_ordered() {
        let series = zero_filled_series(&HashMap::new());
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|d| d.count == 0));
        assert_eq!(series[6].date, Utc::now().date_naive());
        for pair in series.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_series_picks_up_buckets() {
        let today = Utc::now().date_naive();
        let mut buckets = HashMap::new();
        buckets.insert(today, 4u64);
        buckets.insert(today - Duration::days(2), 1u64);

        let series = zero_filled_series(&buckets);
        assert_eq!(series[6].count, 4);
        assert_eq!(series[4].count, 1);
        assert_eq!(series[5].count, 0);
    }
}
