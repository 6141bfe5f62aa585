/// Playtree document routes
use crate::{
    api::CurrentUser,
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use playtree_core::types::{Access, Summary};
use playtree_core::PlaytreeDoc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

/// GET /playtrees - list stored playtree summaries
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Summary>>> {
    Ok(Json(state.store.list().await?))
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

/// POST /playtrees - validate and store a new document
///
/// A blank summary id is assigned a short random one. The stored id is
/// echoed back.
pub async fn create(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<Created>)> {
    let mut doc = PlaytreeDoc::from_str(&body)?;
    if doc.summary.id.is_empty() {
        doc.summary.id = generate_id();
    }
    playtree_core::validate(doc.clone())?;
    state.store.create(&doc).await?;
    Ok((StatusCode::CREATED, Json(Created { id: doc.summary.id })))
}

/// GET /playtrees/:id - fetch one document
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<PlaytreeDoc>> {
    let doc = state.store.get(&id).await?;
    ensure_visible(&doc.summary, &user)?;
    Ok(Json(doc))
}

/// PUT /playtrees/:id - replace one document
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    body: String,
) -> Result<StatusCode> {
    let existing = state.store.get(&id).await?;
    ensure_visible(&existing.summary, &user)?;

    let doc = PlaytreeDoc::from_str(&body)?;
    playtree_core::validate(doc.clone())?;
    state.store.update(&id, &doc).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /playtrees/:id - remove one document
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let existing = state.store.get(&id).await?;
    ensure_visible(&existing.summary, &user)?;

    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Non-public resources are reachable by their owner only
fn ensure_visible(summary: &Summary, user: &str) -> Result<()> {
    if summary.access == Access::Private && summary.created_by != user {
        return Err(ServerError::Forbidden(format!(
            "playtree \"{}\" is private",
            summary.id
        )));
    }
    Ok(())
}

fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..8).map(|_| rng.sample(Alphanumeric) as char).collect()
}
