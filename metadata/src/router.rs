//! HTTP router.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::resolver::{Resolver, TokenMetadata};

/// Create the application router.
///
/// `GET /api/{token_id}` always answers `200` with the token metadata.
pub fn create(resolver: Resolver) -> Router {
    Router::new()
        .route("/api/{token_id}", get(token_metadata))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(resolver))
}

async fn token_metadata(
    State(resolver): State<Arc<Resolver>>,
    Path(token_id): Path<String>,
) -> Json<TokenMetadata> {
    debug!(%token_id, "resolving token metadata");
    Json(resolver.resolve(&token_id))
}
