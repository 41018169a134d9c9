//! Note handlers. All routes sit behind the JWT middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Note;
use crate::errors::{AppError, AppResult, OptionExt};

/// Note creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Partial note update; omitted or blank fields are left alone
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNoteRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Create note routes
pub fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/:id", get(get_note).put(update_note).delete(delete_note))
}

/// List the caller's notes
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Note>>> {
    let notes = state.services().notes().list(user.id).await?;
    Ok(Json(notes))
}

/// Get one of the caller's notes
pub async fn get_note(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Note>> {
    let note = state
        .services()
        .notes()
        .get(user.id, id)
        .await?
        .ok_or_not_found()?;

    Ok(Json(note))
}

/// Create a note owned by the caller
pub async fn create_note(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateNoteRequest>,
) -> AppResult<(StatusCode, Json<Note>)> {
    let note = state
        .services()
        .notes()
        .create(user.id, payload.title, payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Update one of the caller's notes
pub async fn update_note(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateNoteRequest>,
) -> AppResult<Json<Note>> {
    let note = state
        .services()
        .notes()
        .update(user.id, id, payload.title, payload.content)
        .await?
        .ok_or_not_found()?;

    Ok(Json(note))
}

/// Delete one of the caller's notes
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.services().notes().delete(user.id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
