//! Summarization endpoint.
//!
//! Provides:
//! - Summarizing a transcript (POST /api/summarize)

use crate::api::error::ApiResult;
use crate::summarize::{SummarizeRequest, SummarizeResponse, Summarizer};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use std::sync::Arc;

pub fn router(summarizer: Arc<Summarizer>) -> Router {
    Router::new()
        .route("/api/summarize", post(summarize))
        .with_state(summarizer)
}

/// Summarizes a transcript following the caller's instruction.
///
/// # Request Body
/// - `transcript`: string - required, must not be blank
/// - `custom_instruction`: string - optional
///
/// # Response
/// `{"summary": ..., "success": true}`, or the error envelope with 400/500.
async fn summarize(
    State(summarizer): State<Arc<Summarizer>>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> ApiResult<Json<SummarizeResponse>> {
    let Json(request) = body?;
    let summary = summarizer.summarize(&request).await?;

    Ok(Json(SummarizeResponse {
        summary,
        success: true,
    }))
}
