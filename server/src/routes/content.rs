// Writer endpoints: build the task request, dispatch it, wrap the text

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use quill_core::GenerationRequest;
use tracing::info;

use crate::error::ApiError;
use crate::models::{
    OptimizeRequest, OptimizeResponse, OutlineRequest, OutlineResponse, ReplyRequest,
    ReplyResponse, RewriteRequest, RewriteResponse,
};
use crate::AppState;

pub async fn generate_outline(
    State(state): State<AppState>,
    payload: Result<Json<OutlineRequest>, JsonRejection>,
) -> Result<Json<OutlineResponse>, ApiError> {
    let Json(req) = payload?;
    info!(
        target: "api",
        content_type = req.content_type.as_deref().unwrap_or("unspecified"),
        description_len = req.content_description.len(),
        instruction_len = req.base_system_instruction.len(),
        "generate-outline called"
    );
    let request =
        GenerationRequest::outline(&req.content_description, &req.base_system_instruction);
    let outline = state.dispatcher.dispatch_request(&request).await?;
    info!(target: "api", len = outline.len(), "returning outline");
    Ok(Json(OutlineResponse { outline }))
}

pub async fn optimize_content(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let Json(req) = payload?;
    let limits = &state.dispatcher.config().platform_limits;
    info!(
        target: "api",
        platform = %req.platform,
        character_limit = limits.limit_for(&req.platform),
        content_type = req.content_type.as_deref().unwrap_or("unspecified"),
        content_len = req.content.len(),
        "optimize-content called"
    );
    let request = GenerationRequest::optimize(
        &req.content,
        &req.platform,
        limits,
        &req.base_system_instruction,
    );
    let optimized_content = state.dispatcher.dispatch_request(&request).await?;
    info!(target: "api", len = optimized_content.len(), "returning optimized content");
    Ok(Json(OptimizeResponse { optimized_content }))
}

pub async fn rewrite_content(
    State(state): State<AppState>,
    payload: Result<Json<RewriteRequest>, JsonRejection>,
) -> Result<Json<RewriteResponse>, ApiError> {
    let Json(req) = payload?;
    info!(
        target: "api",
        style = %req.style,
        content_len = req.content.len(),
        "rewrite-content called"
    );
    let request = GenerationRequest::rewrite(&req.content, &req.style, &req.base_system_instruction);
    let rewritten_content = state.dispatcher.dispatch_request(&request).await?;
    info!(target: "api", len = rewritten_content.len(), "returning rewritten content");
    Ok(Json(RewriteResponse { rewritten_content }))
}

pub async fn generate_reply(
    State(state): State<AppState>,
    payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let Json(req) = payload?;
    info!(
        target: "api",
        tone = %req.tone,
        comment_len = req.comment.len(),
        custom_instruction = req.base_system_instruction.is_some(),
        "generate-reply called"
    );
    let request = GenerationRequest::reply(
        &req.comment,
        &req.tone,
        req.base_system_instruction.as_deref(),
    );
    let reply = state.dispatcher.dispatch_request(&request).await?;
    info!(target: "api", len = reply.len(), "returning reply");
    Ok(Json(ReplyResponse { reply }))
}
