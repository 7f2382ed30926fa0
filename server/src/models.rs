//! Request and response bodies for the writer endpoints.
//!
//! Field names follow the front-end's JSON (camelCase for content fields,
//! `base_system_instruction` as-is).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct OutlineRequest {
    #[serde(rename = "contentDescription")]
    pub content_description: String,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
    pub base_system_instruction: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeRequest {
    pub content: String,
    pub platform: String,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
    pub base_system_instruction: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
    pub content: String,
    /// e.g. professional, casual
    pub style: String,
    pub base_system_instruction: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyRequest {
    pub comment: String,
    /// e.g. helpful, appreciative
    pub tone: String,
    #[serde(default)]
    pub base_system_instruction: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlineResponse {
    pub outline: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    #[serde(rename = "optimizedContent")]
    pub optimized_content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewriteResponse {
    #[serde(rename = "rewrittenContent")]
    pub rewritten_content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyResponse {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusMessage {
    pub message: String,
}
