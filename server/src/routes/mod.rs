//! Route table.
//!
//! - `GET /` - liveness
//! - `POST /generate-outline` - outline with web search
//! - `POST /optimize-content` - fit content to a platform's character limit
//! - `POST /rewrite-content` - restyle content
//! - `POST /generate-reply` - reply to a comment in a given tone

mod content;
mod root;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::status))
        .route("/generate-outline", post(content::generate_outline))
        .route("/optimize-content", post(content::optimize_content))
        .route("/rewrite-content", post(content::rewrite_content))
        .route("/generate-reply", post(content::generate_reply))
        .with_state(state)
}
