/// HTTP API surface
pub mod player;
pub mod playtrees;

use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Requester identity
///
/// Resolved upstream by the identity collaborator and forwarded in a
/// header; an absent header means anonymous.
pub struct CurrentUser(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get("x-playtree-user")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("anonymous");
        Ok(CurrentUser(user.to_string()))
    }
}

/// Assemble the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/playtrees",
            get(playtrees::list).post(playtrees::create),
        )
        .route(
            "/playtrees/:id",
            get(playtrees::get)
                .put(playtrees::update)
                .delete(playtrees::delete),
        )
        .route("/me/player", get(player::current).put(player::set))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
