//! services/api/src/web/records.rs
//!
//! Handlers for the signed-in account's saved summaries and notes. Every route
//! here sits behind `require_auth`, which provides the caller's user id.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use reskick_core::domain::{
    AccountStats, InputMode, NewNote, NewSummary, Note, Summary, SummaryInput, SummaryStyle,
    PANEL_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::{
    rest::{failure, json_body, port_failure, ApiFailure, ErrorBody},
    state::AppState,
};

//=========================================================================================
// API Payload Structs
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryPayload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub input_text: Option<String>,
    pub input_url: Option<String>,
    /// `text` or `url`.
    pub input_mode: String,
    pub style: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl From<Summary> for SummaryPayload {
    fn from(summary: Summary) -> Self {
        Self {
            id: summary.id,
            user_id: summary.account_id,
            input_text: summary.input.text().map(str::to_string),
            input_url: summary.input.url().map(str::to_string),
            input_mode: summary.input.mode().key().to_string(),
            style: summary.style.key().to_string(),
            summary: summary.summary,
            created_at: summary.created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSummaryRequest {
    pub input_mode: String,
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub input_url: Option<String>,
    pub style: String,
    pub summary: String,
}

impl CreateSummaryRequest {
    fn into_domain(self) -> Option<NewSummary> {
        let mode = InputMode::from_key(&self.input_mode)?;
        Some(NewSummary {
            input: SummaryInput::from_columns(mode, self.input_text, self.input_url)?,
            style: SummaryStyle::from_key(&self.style),
            summary: self.summary,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotePayload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub summary_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NotePayload {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            user_id: note.account_id,
            summary_id: note.summary_id,
            content: note.content,
            created_at: note.created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub summary_id: Option<Uuid>,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsPayload {
    pub summaries: u64,
    pub notes: u64,
}

impl From<AccountStats> for StatsPayload {
    fn from(stats: AccountStats) -> Self {
        Self {
            summaries: stats.summaries,
            notes: stats.notes,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// At most 50; defaults to 50.
    pub limit: Option<usize>,
}

impl ListParams {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(PANEL_PAGE_SIZE).clamp(1, PANEL_PAGE_SIZE)
    }
}

//=========================================================================================
// Summary Handlers
//=========================================================================================

/// GET /summaries - The caller's saved summaries, newest first
#[utoipa::path(
    get,
    path = "/summaries",
    params(ListParams),
    responses(
        (status = 200, description = "Saved summaries", body = [SummaryPayload]),
        (status = 401, description = "Not signed in", body = ErrorBody)
    )
)]
pub async fn list_summaries_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SummaryPayload>>, ApiFailure> {
    let summaries = state
        .db
        .list_summaries(user_id, params.limit())
        .await
        .map_err(port_failure)?;
    Ok(Json(summaries.into_iter().map(SummaryPayload::from).collect()))
}

/// POST /summaries - Save a summary for the caller
#[utoipa::path(
    post,
    path = "/summaries",
    request_body = CreateSummaryRequest,
    responses(
        (status = 201, description = "Summary saved", body = SummaryPayload),
        (status = 400, description = "Input does not match the input mode", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody)
    )
)]
pub async fn create_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    payload: Result<Json<CreateSummaryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SummaryPayload>), ApiFailure> {
    let summary = json_body(payload)?.into_domain().ok_or_else(|| {
        failure(
            StatusCode::BAD_REQUEST,
            "Exactly one of input_text or input_url must be set, matching input_mode",
        )
    })?;

    let saved = state
        .db
        .insert_summary(user_id, summary)
        .await
        .map_err(port_failure)?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// DELETE /summaries/{id} - Delete one of the caller's summaries
#[utoipa::path(
    delete,
    path = "/summaries/{id}",
    params(("id" = Uuid, Path, description = "Summary id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such summary for this account", body = ErrorBody)
    )
)]
pub async fn delete_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiFailure> {
    state
        .db
        .delete_summary(user_id, id)
        .await
        .map_err(port_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Note Handlers
//=========================================================================================

/// GET /notes - The caller's notes, newest first
#[utoipa::path(
    get,
    path = "/notes",
    params(ListParams),
    responses(
        (status = 200, description = "Notes", body = [NotePayload]),
        (status = 401, description = "Not signed in", body = ErrorBody)
    )
)]
pub async fn list_notes_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<NotePayload>>, ApiFailure> {
    let notes = state
        .db
        .list_notes(user_id, params.limit())
        .await
        .map_err(port_failure)?;
    Ok(Json(notes.into_iter().map(NotePayload::from).collect()))
}

/// POST /notes - Save a note, optionally attached to one of the caller's summaries
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note saved", body = NotePayload),
        (status = 400, description = "Empty note", body = ErrorBody),
        (status = 404, description = "Referenced summary not found", body = ErrorBody)
    )
)]
pub async fn create_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NotePayload>), ApiFailure> {
    let req = json_body(payload)?;
    if req.content.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "content is required"));
    }

    let note = state
        .db
        .insert_note(
            user_id,
            NewNote {
                summary_id: req.summary_id,
                content: req.content,
            },
        )
        .await
        .map_err(port_failure)?;
    Ok((StatusCode::CREATED, Json(note.into())))
}

/// DELETE /notes/{id} - Delete one of the caller's notes
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such note for this account", body = ErrorBody)
    )
)]
pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiFailure> {
    state
        .db
        .delete_note(user_id, id)
        .await
        .map_err(port_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Stats
//=========================================================================================

/// GET /stats - Counters shown in the sidebar
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Per-account counters", body = StatsPayload),
        (status = 401, description = "Not signed in", body = ErrorBody)
    )
)]
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<StatsPayload>, ApiFailure> {
    let stats = state
        .db
        .count_records(user_id)
        .await
        .map_err(port_failure)?;
    Ok(Json(stats.into()))
}
