/// Currently-playing routes
use crate::{
    api::CurrentUser,
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use playtree_core::types::Access;
use playtree_playback::{EngineConfig, PlayerSession};
use serde::Deserialize;
use std::sync::Arc;

/// GET /me/player - the requester's current playtree document, or null
pub async fn current(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    let players = state.players.lock().await;
    let Some(id) = players
        .get(&user)
        .and_then(|session| session.current())
        .map(str::to_string)
    else {
        return Ok(Json(serde_json::Value::Null).into_response());
    };
    drop(players);

    let doc = state.store.get(&id).await?;
    Ok(Json(doc).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SetPlayerRequest {
    pub playtree: String,
}

/// PUT /me/player - load a playtree into the requester's player session
///
/// The session facade is the only thing that touches the player table:
/// loading stops whatever engine was running for this user and spawns a
/// fresh one.
pub async fn set(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(request): Form<SetPlayerRequest>,
) -> Result<StatusCode> {
    let doc = state.store.get(&request.playtree).await?;
    if doc.summary.access == Access::Private && doc.summary.created_by != user {
        return Err(ServerError::Forbidden(format!(
            "playtree \"{}\" is private",
            request.playtree
        )));
    }
    let tree = playtree_core::validate(doc)?;

    let mut players = state.players.lock().await;
    let session = players
        .entry(user)
        .or_insert_with(|| PlayerSession::new(Arc::clone(&state.backend), EngineConfig::default()));
    // server mode has no event consumer; transitions are logged instead
    let _events = session.load(tree).await;

    Ok(StatusCode::CREATED)
}
