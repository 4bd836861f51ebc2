//! Reflection Routes
//!
//! JSON API over the entry store.
//!
//! Routes:
//! - GET /api/reflections - List every entry in file order
//! - POST /api/reflections - Create an entry from `{title?, content?}`
//! - DELETE /api/reflections/:id - Delete every entry with this id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use reflect_core::{Entry, EntryDraft, EntryId, SERVER_SOURCE};
use serde::Serialize;
use tracing::info;

use crate::{AppState, Error, Result};

/// Body returned by a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted: bool,
    pub id: EntryId,
}

/// Build reflection routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reflections).post(create_reflection))
        .route("/:id", delete(delete_reflection))
}

/// List all reflections.
///
/// A missing or unreadable entries file lists as an empty array.
async fn list_reflections(State(state): State<AppState>) -> Result<Json<Vec<Entry>>> {
    let entries = state.with_store_blocking(|store| store.list()).await?;
    Ok(Json(entries))
}

/// Create a reflection.
///
/// Missing `title` gets the default placeholder; missing `content` is empty.
async fn create_reflection(
    State(state): State<AppState>,
    Json(draft): Json<EntryDraft>,
) -> Result<(StatusCode, Json<Entry>)> {
    let placement = state.placement;

    let _guard = state.lock_writes().await;
    let entry = state
        .with_store_blocking(move |store| store.create(draft, SERVER_SOURCE, placement))
        .await??;

    info!(id = %entry.id, "Reflection created");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Delete a reflection by id.
async fn delete_reflection(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id: EntryId = raw_id
        .parse()
        .map_err(|e: reflect_core::ParseEntryIdError| Error::InvalidInput(e.to_string()))?;

    let _guard = state.lock_writes().await;
    let deleted = state
        .with_store_blocking(move |store| store.delete(id))
        .await??;

    if !deleted {
        return Err(Error::NotFound(format!("Reflection ID {} not found.", id)));
    }

    info!(%id, "Reflection deleted");
    Ok(Json(DeleteResponse {
        message: format!("Reflection ID {} deleted.", id),
        deleted: true,
        id,
    }))
}
