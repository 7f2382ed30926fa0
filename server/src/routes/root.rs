use axum::Json;

use crate::models::StatusMessage;

pub const STATUS_MESSAGE: &str = "Quill relay is running.";

pub async fn status() -> Json<StatusMessage> {
    tracing::debug!(target: "api", "liveness check");
    Json(StatusMessage {
        message: STATUS_MESSAGE.to_string(),
    })
}
