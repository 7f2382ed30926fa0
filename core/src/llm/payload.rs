use serde_json::{json, Value};

use crate::config::UpstreamConfig;
use crate::task::{GenerationRequest, PayloadShape};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const RESPONSES_PATH: &str = "responses";

/// Endpoint for a payload shape, relative to the configured base URL
pub fn endpoint_for(cfg: &UpstreamConfig, shape: PayloadShape) -> String {
    match shape {
        PayloadShape::ChatCompletions => cfg.endpoint(CHAT_COMPLETIONS_PATH),
        PayloadShape::Responses => cfg.endpoint(RESPONSES_PATH),
    }
}

/// Build the upstream body for a request.
///
/// Search-enabled requests (Responses shape) carry the `web_search` tool and no
/// sampling parameters, which those models reject.
pub fn build_payload(cfg: &UpstreamConfig, req: &GenerationRequest) -> Value {
    let model = cfg.models.model_for(req.task);
    match req.task.payload_shape() {
        PayloadShape::ChatCompletions => json!({
            "model": model,
            "messages": [
                {"role": "system", "content": req.system_instruction},
                {"role": "user", "content": req.user_prompt},
            ],
            "max_tokens": cfg.max_tokens,
            "temperature": 1.0,
            "top_p": 1.0,
        }),
        PayloadShape::Responses => json!({
            "model": model,
            "input": [
                {
                    "role": "system",
                    "content": [{"type": "input_text", "text": req.system_instruction}],
                },
                {
                    "role": "user",
                    "content": [{"type": "input_text", "text": req.user_prompt}],
                },
            ],
            "tools": [{"type": "web_search"}],
            // The Responses API uses max_output_tokens
            "max_output_tokens": cfg.max_tokens,
            "store": false,
        }),
    }
}
