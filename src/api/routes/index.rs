//! Landing page and health endpoints.

use crate::summarize::Summarizer;
use axum::{
    extract::State,
    response::{Html, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

pub fn router(summarizer: Arc<Summarizer>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .with_state(summarizer)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(summarizer): State<Arc<Summarizer>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "meetbrief",
        "version": env!("CARGO_PKG_VERSION"),
        "summarization_available": summarizer.is_available(),
    }))
}
