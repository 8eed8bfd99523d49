//! Share endpoint.

use crate::api::error::ApiResult;
use crate::share::{ShareRequest, ShareResponse, ShareService};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use std::sync::Arc;

pub fn router(service: Arc<ShareService>) -> Router {
    Router::new()
        .route("/api/share", post(share))
        .with_state(service)
}

/// POST /api/share - Hand a summary to the configured delivery backend.
async fn share(
    State(service): State<Arc<ShareService>>,
    body: Result<Json<ShareRequest>, JsonRejection>,
) -> ApiResult<Json<ShareResponse>> {
    let Json(request) = body?;
    let response = service.share(request).await?;
    Ok(Json(response))
}
