//! Peer API Handlers
//!
//! HTTP endpoints that let remote peers read from this node's groups. These
//! handlers translate an inbound `GET <base><group>/<key>` into the normal
//! group read path, so a peer-served value goes through the same cache,
//! coalescing, and loader fallback as a local one.

use axum::{
    Router,
    extract::{Extension, Path},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;

use super::pool::HttpPool;
use crate::group::registry;

/// Builds the router serving this node's share of the cache.
///
/// Peer routes live under the pool's base path. Requests under the base path
/// that do not parse as `<group>/<key>` are answered with `400`; anything
/// outside the base path means the router was mounted on traffic it was never
/// meant to serve and is refused outright.
pub fn router(pool: Arc<HttpPool>) -> Router {
    let base = pool.base_path().trim_end_matches('/');
    let route_path = format!("{}/:group/:key", base);

    Router::new()
        .route(&route_path, get(handle_peer_get))
        .fallback(handle_unmatched_path)
        .layer(Extension(pool))
}

/// Serves one key from one group to a remote peer.
///
/// The group is resolved through the process-wide registry; its `get` runs the
/// full read path, so this node may answer from cache, loader, or (on a stale
/// topology) another peer.
pub async fn handle_peer_get(
    Extension(pool): Extension<Arc<HttpPool>>,
    Path((group_name, key)): Path<(String, String)>,
) -> Response {
    tracing::info!("[{}] GET {}/{}", pool.self_addr(), group_name, key);

    let Some(group) = registry::get_group(&group_name) else {
        return (
            StatusCode::NOT_FOUND,
            format!("no such group: {}", group_name),
        )
            .into_response();
    };

    match group.get(&key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Load of {}/{} failed: {:#}", group_name, key, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response()
        }
    }
}

/// Fallback for everything the peer route does not match.
async fn handle_unmatched_path(
    Extension(pool): Extension<Arc<HttpPool>>,
    uri: Uri,
) -> (StatusCode, String) {
    if uri.path().starts_with(pool.base_path()) {
        tracing::warn!("Malformed peer request path: {}", uri.path());
        return (StatusCode::BAD_REQUEST, "bad request".to_string());
    }

    panic!("peer router serving unexpected path: {}", uri.path());
}
