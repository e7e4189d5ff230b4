//! HTTP surface of the daemon
//!
//! Every request, whatever its method or path, is an update request. The
//! router only copies the query string and headers into
//! [`UpdateHandler::handle`] and the result back out.

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use ddns_core::UpdateHandler;
use std::sync::Arc;

/// Build the router serving update requests on every path
pub fn router(handler: Arc<UpdateHandler>) -> Router {
    Router::new().fallback(update).with_state(handler)
}

async fn update(
    State(handler): State<Arc<UpdateHandler>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let response = handler.handle(uri.query(), &headers).await;
    (response.status, response.body).into_response()
}
