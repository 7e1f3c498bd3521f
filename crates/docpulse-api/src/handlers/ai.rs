//! AI Q&A over documents, plus per-member notes

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use docpulse_ai::extract_text;
use docpulse_db::entities::{ai_question, document, document_note, prelude::*};
use sea_orm::{
    sea_query::Expr, ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{ensure_group_access, load_document, load_group};
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::AppState;

/// Return the document's extracted text, extracting and caching it on first use.
async fn document_text(state: &AppState, doc: &document::Model) -> Result<String, ApiError> {
    if let Some(content) = &doc.content {
        if !content.trim().is_empty() {
            return Ok(content.clone());
        }
    }

    let path = state.storage_dir.join(&doc.file_path);
    let text = tokio::task::spawn_blocking(move || extract_text(&path))
        .await
        .map_err(|e| ApiError::Upstream(format!("Text extraction task failed: {}", e)))?;

    if !text.trim().is_empty() {
        // Cache so later questions skip extraction
        let mut active = doc.clone().into_active_model();
        active.content = Set(Some(text.clone()));
        active.update(&state.db).await?;
    }

    Ok(text)
}

/// Recount failed questions for the document's unanswered counter.
async fn refresh_unanswered(state: &AppState, document_id: Uuid) {
    let count = AiQuestion::find()
        .filter(ai_question::Column::DocumentId.eq(document_id))
        .filter(ai_question::Column::Status.eq(ai_question::QuestionStatus::Failed))
        .count(&state.db)
        .await;

    match count {
        Ok(count) => {
            let result = Document::update_many()
                .col_expr(
                    document::Column::UnansweredQuestions,
                    Expr::value(count as i32),
                )
                .filter(document::Column::Id.eq(document_id))
                .exec(&state.db)
                .await;
            if let Err(e) = result {
                warn!(document_id = %document_id, error = %e, "failed to update unanswered counter");
            }
        }
        Err(e) => {
            warn!(document_id = %document_id, error = %e, "failed to count failed questions");
        }
    }
}

/// Ask the AI a question about a document (member only)
///
/// The question row is persisted as `failed` first and promoted to
/// `answered` only on success, so any error leaves a failed record behind.
#[utoipa::path(
    post,
    path = "/api/documents/{id}/ask",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer", body = AskResponse),
        (status = 400, description = "No extractable text", body = ErrorResponse),
        (status = 500, description = "AI connector failed", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let m = principal.member()?;
    let doc = load_document(&state.db, id).await?;
    if doc.group_id != req.group_id {
        return Err(ApiError::Validation(
            "group_id does not match the document's group".to_string(),
        ));
    }
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    if req.question.trim().is_empty() {
        return Err(ApiError::Validation("Question is required".to_string()));
    }

    let row = ai_question::ActiveModel {
        id: Set(Uuid::new_v4()),
        member_id: Set(Some(m.id)),
        group_id: Set(g.id),
        document_id: Set(doc.id),
        question: Set(req.question.clone()),
        answer: Set(String::new()),
        topic: Set(None),
        ai_model: Set(state.qa.model().to_string()),
        response_time_ms: Set(None),
        status: Set(ai_question::QuestionStatus::Failed),
        visibility: Set(ai_question::QuestionVisibility::Group),
        asked_at: Set(Utc::now()),
        answered_at: Set(None),
    }
    .insert(&state.db)
    .await?;

    let text = document_text(&state, &doc).await?;
    if text.trim().is_empty() {
        refresh_unanswered(&state, doc.id).await;
        return Err(ApiError::Validation(
            "Document has no extractable text".to_string(),
        ));
    }

    let reply = match state.qa.ask(&text, &req.question).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(question_id = %row.id, error = %e, "AI connector failed");
            refresh_unanswered(&state, doc.id).await;
            return Err(ApiError::Upstream(e.to_string()));
        }
    };

    let mut active = row.into_active_model();
    active.answer = Set(reply.answer.clone());
    active.topic = Set(Some(reply.topic.clone()));
    active.response_time_ms = Set(Some(reply.latency_ms));
    active.status = Set(ai_question::QuestionStatus::Answered);
    active.answered_at = Set(Some(Utc::now()));
    let updated = active.update(&state.db).await?;

    refresh_unanswered(&state, doc.id).await;

    info!(
        question_id = %updated.id,
        document_id = %doc.id,
        latency_ms = reply.latency_ms,
        "question answered"
    );

    Ok(Json(AskResponse {
        id: updated.id,
        answer: reply.answer,
        topic: reply.topic,
        status: updated.status.to_value(),
        response_time_ms: reply.latency_ms,
    }))
}

fn question_info(q: ai_question::Model) -> QuestionInfo {
    QuestionInfo {
        id: q.id,
        member_id: q.member_id,
        question: q.question,
        answer: q.answer,
        topic: q.topic,
        status: q.status.to_value(),
        visibility: q.visibility.to_value(),
        asked_at: q.asked_at,
        answered_at: q.answered_at,
    }
}

/// The caller's own Q&A history for a document (member only)
#[utoipa::path(
    get,
    path = "/api/documents/{id}/history",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Own questions", body = QuestionList),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn question_history(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionList>, ApiError> {
    let m = principal.member()?;
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let questions: Vec<QuestionInfo> = AiQuestion::find()
        .filter(ai_question::Column::DocumentId.eq(id))
        .filter(ai_question::Column::MemberId.eq(m.id))
        .order_by_desc(ai_question::Column::AskedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(question_info)
        .collect();

    let total = questions.len();
    Ok(Json(QuestionList { questions, total }))
}

/// All questions asked about a document
#[utoipa::path(
    get,
    path = "/api/documents/{id}/qa",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "All questions", body = QuestionList),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionList>, ApiError> {
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let questions: Vec<QuestionInfo> = AiQuestion::find()
        .filter(ai_question::Column::DocumentId.eq(id))
        .order_by_desc(ai_question::Column::AskedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(question_info)
        .collect();

    let total = questions.len();
    Ok(Json(QuestionList { questions, total }))
}

/// Question counts per topic, descending
#[utoipa::path(
    get,
    path = "/api/documents/{id}/topics",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Topic aggregation", body = TopicList),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn list_topics(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<TopicList>, ApiError> {
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let rows = AiQuestion::find()
        .filter(ai_question::Column::DocumentId.eq(id))
        .all(&state.db)
        .await?;

    let mut counts: HashMap<String, u64> = HashMap::new();
    for q in rows {
        if let Some(topic) = q.topic {
            *counts.entry(topic).or_insert(0) += 1;
        }
    }

    let mut topics: Vec<TopicCount> = counts
        .into_iter()
        .map(|(topic, count)| TopicCount { topic, count })
        .collect();
    topics.sort_by(|a, b| b.count.cmp(&a.count).then(a.topic.cmp(&b.topic)));

    debug!(document_id = %id, topics = topics.len(), "topic aggregation");

    let total = topics.len();
    Ok(Json(TopicList { topics, total }))
}

/// Get the caller's note on a document, creating an empty one on first access (member only)
#[utoipa::path(
    get,
    path = "/api/documents/{id}/note",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Note", body = NoteResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteResponse>, ApiError> {
    let m = principal.member()?;
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let note = match DocumentNote::find_by_id((m.id, id)).one(&state.db).await? {
        Some(note) => note,
        None => {
            document_note::ActiveModel {
                member_id: Set(m.id),
                document_id: Set(id),
                content: Set(String::new()),
                updated_at: Set(Utc::now()),
            }
            .insert(&state.db)
            .await?
        }
    };

    Ok(Json(NoteResponse {
        document_id: id,
        content: note.content,
        updated_at: note.updated_at,
    }))
}

/// Save the caller's note on a document (member only)
#[utoipa::path(
    post,
    path = "/api/documents/{id}/note",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = SaveNoteRequest,
    responses(
        (status = 200, description = "Saved note", body = NoteResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn save_note(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let m = principal.member()?;
    let doc = load_document(&state.db, id).await?;
    let g = load_group(&state.db, doc.group_id).await?;
    ensure_group_access(&state.db, &principal, &g).await?;

    let now = Utc::now();
    let note = match DocumentNote::find_by_id((m.id, id)).one(&state.db).await? {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.content = Set(req.content);
            active.updated_at = Set(now);
            active.update(&state.db).await?
        }
        None => {
            document_note::ActiveModel {
                member_id: Set(m.id),
                document_id: Set(id),
                content: Set(req.content),
                updated_at: Set(now),
            }
            .insert(&state.db)
            .await?
        }
    };

    Ok(Json(NoteResponse {
        document_id: id,
        content: note.content,
        updated_at: note.updated_at,
    }))
}
