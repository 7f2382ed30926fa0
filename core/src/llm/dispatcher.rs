use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::normalize::{extract_primary, shape_summary};
use super::payload::{build_payload, endpoint_for};
use super::transport::{HttpTransport, UpstreamTransport};
use crate::config::UpstreamConfig;
use crate::task::{GenerationRequest, Task};
use crate::{QuillError, Result};

/// Upstream bodies are cut to this many characters in logs and error details
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sends one generation request upstream and returns the normalized text.
///
/// Stateless apart from the shared config and transport, so one instance serves
/// all concurrent callers. Every failure is terminal; nothing is retried.
#[derive(Clone)]
pub struct Dispatcher {
    cfg: Arc<UpstreamConfig>,
    transport: Arc<dyn UpstreamTransport>,
}

impl Dispatcher {
    pub fn new(cfg: Arc<UpstreamConfig>, transport: Arc<dyn UpstreamTransport>) -> Self {
        Self { cfg, transport }
    }

    /// Dispatcher over a reqwest transport using the configured timeout
    pub fn from_config(cfg: UpstreamConfig) -> Result<Self> {
        let transport = HttpTransport::new(cfg.request_timeout_ms)?;
        Ok(Self::new(Arc::new(cfg), Arc::new(transport)))
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.cfg
    }

    pub async fn dispatch(
        &self,
        task: Task,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String> {
        self.dispatch_request(&GenerationRequest::new(task, system_instruction, user_prompt))
            .await
    }

    /// Contract:
    /// - Input: task, verbatim system instruction, templated user prompt
    /// - Output: non-empty extracted text
    /// - Error: Configuration before any network call; Transport, Upstream,
    ///   Extraction or Internal afterwards
    pub async fn dispatch_request(&self, req: &GenerationRequest) -> Result<String> {
        let api_key = self.cfg.usable_api_key().ok_or_else(|| {
            error!(target: "dispatcher", task = %req.task, "Upstream API key not configured");
            QuillError::ConfigurationError("upstream API key is missing or a placeholder".into())
        })?;

        let shape = req.task.payload_shape();
        let model = self.cfg.models.model_for(req.task);
        let url = endpoint_for(&self.cfg, shape);
        let body = build_payload(&self.cfg, req);
        info!(
            target: "dispatcher",
            task = %req.task,
            model = %model,
            ?shape,
            prompt_len = req.user_prompt.len(),
            instruction_len = req.system_instruction.len(),
            "Requesting completion"
        );

        let reply = self
            .transport
            .post_json(&url, api_key, &body)
            .await
            .map_err(|e| {
                error!(target: "dispatcher", task = %req.task, error = %e, "Upstream request failed");
                QuillError::TransportError(e.0)
            })?;

        if !reply.is_success() {
            let message = upstream_error_message(reply.status, &reply.body);
            error!(
                target: "dispatcher",
                task = %req.task,
                status = reply.status,
                body = %truncate(&reply.body, MAX_ERROR_BODY_CHARS),
                "Upstream API error"
            );
            return Err(QuillError::UpstreamError {
                status: reply.status,
                message,
            });
        }

        let data: Value = serde_json::from_str(&reply.body).inspect_err(|e| {
            error!(target: "dispatcher", task = %req.task, error = %e, "Upstream body is not JSON");
        })?;

        match extract_primary(&data) {
            Some(text) => {
                debug!(target: "dispatcher", task = %req.task, len = text.len(), "Extracted text");
                Ok(text)
            }
            None => {
                let summary = shape_summary(&data);
                error!(
                    target: "dispatcher",
                    task = %req.task,
                    structure = %summary,
                    "Failed to extract text from upstream response"
                );
                Err(QuillError::ExtractionError(format!(
                    "no text in upstream response: {summary}"
                )))
            }
        }
    }
}

/// Best-effort message from a non-2xx body: `error.message`, else the raw
/// text, else a generic line with the status
pub fn upstream_error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    });
    if let Some(message) = from_json {
        return message;
    }
    let raw = body.trim();
    if !raw.is_empty() {
        return truncate(raw, MAX_ERROR_BODY_CHARS);
    }
    format!("Upstream API error: {status}")
}

// Character-based so multi-byte text never splits
fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
