//! Response normalization: one text string out of whatever the upstream sent back.
//!
//! The upstream body is classified into [`UpstreamPayload`], a borrowed view with
//! one variant per recognized shape. Each variant projects to text without
//! failing; anything unrecognized projects to `None`.
//!
//! Resolution order for [`extract`]:
//! 1. a bare string is returned unchanged;
//! 2. a list is scanned item by item: the first `web_search_call` carrying
//!    result texts wins (joined with a blank line), otherwise the first
//!    `message` that yields text; if no item yields text, the first item's own
//!    `text` is used;
//! 3. an object yields its `text`, then `message.content`, then `message.text`,
//!    then a string `content`;
//! 4. everything else yields nothing.
//!
//! [`extract_primary`] is the profile used on the dispatch path: it reads
//! `choices[0].message.content` directly and only falls back to [`extract`]
//! when that is missing or empty.

use serde_json::{Map, Value};
use tracing::{debug, trace};

const SEARCH_RESULT_SEPARATOR: &str = "\n\n";

/// Borrowed, classified view of an upstream body
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload<'a> {
    Text(&'a str),
    Items(Vec<OutputItem<'a>>),
    Object(ObjectFields<'a>),
    Unrecognized,
}

/// One entry of a list-shaped body
#[derive(Debug, Clone, PartialEq)]
pub enum OutputItem<'a> {
    NotAnObject,
    /// `type == "web_search_call"`; `results` holds the non-empty result texts in order
    WebSearchCall {
        results: Vec<&'a str>,
        text: Option<&'a str>,
    },
    /// `type == "message"`
    Message {
        content: MessageContent<'a>,
        text: Option<&'a str>,
    },
    Other {
        text: Option<&'a str>,
    },
}

/// The `content` field of a message item
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent<'a> {
    /// Non-empty list of content parts
    Parts(Vec<ContentPart<'a>>),
    Text(&'a str),
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentPart<'a> {
    pub output_text: bool,
    pub text: Option<&'a str>,
}

/// Fields probed on an object-shaped body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectFields<'a> {
    pub text: Option<&'a str>,
    pub message: Option<MessageFields<'a>>,
    /// `content` when it is a string (possibly empty)
    pub content: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageFields<'a> {
    /// `content` when it is a string (possibly empty)
    pub content: Option<&'a str>,
    pub text: Option<&'a str>,
}

/// String value of `key` when it is a non-empty string
fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn type_tag<'a>(map: &'a Map<String, Value>) -> Option<&'a str> {
    map.get("type").and_then(Value::as_str)
}

impl<'a> UpstreamPayload<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) => UpstreamPayload::Text(s),
            Value::Array(items) => {
                UpstreamPayload::Items(items.iter().map(OutputItem::classify).collect())
            }
            Value::Object(map) => UpstreamPayload::Object(ObjectFields::classify(map)),
            Value::Null | Value::Bool(_) | Value::Number(_) => UpstreamPayload::Unrecognized,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamPayload::Text(_) => "text",
            UpstreamPayload::Items(_) => "items",
            UpstreamPayload::Object(_) => "object",
            UpstreamPayload::Unrecognized => "unrecognized",
        }
    }

    pub fn text(&self) -> Option<String> {
        match self {
            UpstreamPayload::Text(s) => Some((*s).to_string()),
            UpstreamPayload::Items(items) => items_text(items),
            UpstreamPayload::Object(fields) => fields.text().map(str::to_string),
            UpstreamPayload::Unrecognized => None,
        }
    }
}

fn items_text(items: &[OutputItem<'_>]) -> Option<String> {
    for item in items {
        if let Some(text) = item.resolved_text() {
            return Some(text);
        }
    }
    items
        .first()
        .and_then(OutputItem::own_text)
        .map(str::to_string)
}

impl<'a> OutputItem<'a> {
    pub fn classify(value: &'a Value) -> Self {
        let Some(map) = value.as_object() else {
            return OutputItem::NotAnObject;
        };
        let text = non_empty_str(map, "text");
        match type_tag(map) {
            Some("web_search_call") => {
                let results = map
                    .get("web_search_results")
                    .and_then(Value::as_array)
                    .map(|results| {
                        results
                            .iter()
                            .filter_map(Value::as_object)
                            .filter_map(|r| non_empty_str(r, "text"))
                            .collect()
                    })
                    .unwrap_or_default();
                OutputItem::WebSearchCall { results, text }
            }
            Some("message") => OutputItem::Message {
                content: MessageContent::classify(map.get("content")),
                text,
            },
            _ => OutputItem::Other { text },
        }
    }

    /// Text produced by the type-specific rules, if any
    pub fn resolved_text(&self) -> Option<String> {
        match self {
            OutputItem::WebSearchCall { results, .. } if !results.is_empty() => {
                Some(results.join(SEARCH_RESULT_SEPARATOR))
            }
            OutputItem::Message { content, text } => {
                if let Some(t) = content.part_text() {
                    return Some(t.to_string());
                }
                if let Some(t) = text {
                    return Some((*t).to_string());
                }
                match content {
                    MessageContent::Text(s) => Some((*s).to_string()),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// The item's direct `text` field
    pub fn own_text(&self) -> Option<&'a str> {
        match self {
            OutputItem::NotAnObject => None,
            OutputItem::WebSearchCall { text, .. }
            | OutputItem::Message { text, .. }
            | OutputItem::Other { text } => *text,
        }
    }
}

impl<'a> MessageContent<'a> {
    fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Array(parts)) if !parts.is_empty() => {
                MessageContent::Parts(parts.iter().map(ContentPart::classify).collect())
            }
            Some(Value::String(s)) => MessageContent::Text(s),
            _ => MessageContent::Absent,
        }
    }

    /// First `output_text` part with text, else the first part's text
    fn part_text(&self) -> Option<&'a str> {
        let MessageContent::Parts(parts) = self else {
            return None;
        };
        parts
            .iter()
            .find(|p| p.output_text && p.text.is_some())
            .or_else(|| parts.first())
            .and_then(|p| p.text)
    }
}

impl<'a> ContentPart<'a> {
    fn classify(value: &'a Value) -> Self {
        match value.as_object() {
            Some(map) => ContentPart {
                output_text: type_tag(map) == Some("output_text"),
                text: non_empty_str(map, "text"),
            },
            None => ContentPart {
                output_text: false,
                text: None,
            },
        }
    }
}

impl<'a> ObjectFields<'a> {
    fn classify(map: &'a Map<String, Value>) -> Self {
        let message = map
            .get("message")
            .and_then(Value::as_object)
            .map(|m| MessageFields {
                content: m.get("content").and_then(Value::as_str),
                text: non_empty_str(m, "text"),
            });
        ObjectFields {
            text: non_empty_str(map, "text"),
            message,
            content: map.get("content").and_then(Value::as_str),
        }
    }

    pub fn text(&self) -> Option<&'a str> {
        self.text
            .or_else(|| {
                self.message
                    .as_ref()
                    .and_then(|m| m.content.or(m.text))
            })
            .or(self.content)
    }
}

/// Extract text from any JSON value. Never panics; `None` means no text was found.
pub fn extract(payload: &Value) -> Option<String> {
    let classified = UpstreamPayload::classify(payload);
    trace!(target: "normalize", kind = classified.kind(), "classified upstream payload");
    classified.text()
}

/// Dispatch-path profile: `choices[0].message.content` first, then the full
/// resolution order on the whole body, on `choices[0]`, and on the Responses
/// API `output_text` / `output` fields. Empty strings do not count.
pub fn extract_primary(payload: &Value) -> Option<String> {
    let first_choice = payload
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first());

    if let Some(content) = first_choice
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        debug!(target: "normalize", len = content.len(), "extracted text via choices");
        return Some(content.to_string());
    }

    debug!(target: "normalize", "choices path empty; using fallback extraction");
    let non_empty = |s: &String| !s.is_empty();
    extract(payload)
        .filter(non_empty)
        .or_else(|| first_choice.and_then(extract).filter(non_empty))
        .or_else(|| {
            payload
                .get("output_text")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .or_else(|| payload.get("output").and_then(extract).filter(non_empty))
}

/// JSON type of each top-level key, for logging bodies we could not read
pub fn shape_summary(payload: &Value) -> String {
    fn type_name(v: &Value) -> &'static str {
        match v {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
    match payload {
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k}: {}", type_name(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        Value::Array(items) => format!("array[{}]", items.len()),
        other => type_name(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_is_returned_unchanged() {
        for s in ["", "hello", "  padded \n", "ünïcödé"] {
            assert_eq!(extract(&json!(s)).as_deref(), Some(s));
        }
    }

    #[test]
    fn object_text_wins() {
        let v = json!({"text": "t", "message": {"content": "m"}, "content": "c"});
        assert_eq!(extract(&v).as_deref(), Some("t"));
    }

    #[test]
    fn empty_shapes_yield_nothing() {
        assert_eq!(extract(&json!({})), None);
        assert_eq!(extract(&json!([])), None);
        assert_eq!(extract(&Value::Null), None);
        assert_eq!(extract(&json!(42)), None);
        assert_eq!(extract(&json!(true)), None);
    }

    #[test]
    fn search_results_take_priority_over_later_message() {
        let v = json!([
            {"type": "web_search_call", "web_search_results": [{"text": "a"}, {"text": "b"}]},
            {"type": "message", "text": "c"}
        ]);
        assert_eq!(extract(&v).as_deref(), Some("a\n\nb"));
    }

    #[test]
    fn earlier_message_wins_over_later_search_call() {
        let v = json!([
            {"type": "message", "content": [{"type": "output_text", "text": "answer"}]},
            {"type": "web_search_call", "web_search_results": [{"text": "a"}, {"text": "b"}]}
        ]);
        assert_eq!(extract(&v).as_deref(), Some("answer"));
    }

    #[test]
    fn first_search_call_wins() {
        let v = json!([
            {"type": "web_search_call", "web_search_results": [{"text": "first"}]},
            {"type": "web_search_call", "web_search_results": [{"text": "second"}, {"text": "more"}]}
        ]);
        assert_eq!(extract(&v).as_deref(), Some("first"));
    }

    #[test]
    fn search_results_skip_entries_without_text() {
        let v = json!([
            {"type": "web_search_call", "web_search_results": [
                "loose string", {"url": "x"}, {"text": ""}, {"text": "kept"}, {"text": 7}
            ]}
        ]);
        assert_eq!(extract(&v).as_deref(), Some("kept"));
    }

    #[test]
    fn empty_search_call_falls_through_to_message() {
        let v = json!([
            {"type": "web_search_call", "status": "completed"},
            {"type": "message", "content": [{"type": "output_text", "text": "answer"}]}
        ]);
        assert_eq!(extract(&v).as_deref(), Some("answer"));
    }

    #[test]
    fn message_prefers_output_text_part() {
        let v = json!([
            {"type": "message", "content": [
                {"type": "refusal", "text": "nope"},
                {"type": "output_text", "text": ""},
                {"type": "output_text", "text": "real"}
            ]}
        ]);
        assert_eq!(extract(&v).as_deref(), Some("real"));
    }

    #[test]
    fn message_falls_back_to_first_part_text() {
        let v = json!([
            {"type": "message", "content": [{"type": "summary", "text": "first"}, {"type": "x", "text": "second"}]}
        ]);
        assert_eq!(extract(&v).as_deref(), Some("first"));
    }

    #[test]
    fn message_direct_text_then_string_content() {
        let v = json!([{"type": "message", "content": [], "text": "direct"}]);
        assert_eq!(extract(&v).as_deref(), Some("direct"));

        let v = json!([{"type": "message", "content": "as string"}]);
        assert_eq!(extract(&v).as_deref(), Some("as string"));

        let v = json!([{"type": "message", "content": [{"type": "image"}], "text": "direct"}]);
        assert_eq!(extract(&v).as_deref(), Some("direct"));
    }

    #[test]
    fn list_skips_non_objects_and_unknown_types() {
        let v = json!([
            1, "loose", null,
            {"type": "reasoning", "summary": []},
            {"type": "message", "content": [{"type": "output_text", "text": "found"}]}
        ]);
        assert_eq!(extract(&v).as_deref(), Some("found"));
    }

    #[test]
    fn list_falls_back_to_first_item_text() {
        let v = json!([{"type": "reasoning", "text": "thinking"}, {"type": "other"}]);
        assert_eq!(extract(&v).as_deref(), Some("thinking"));

        // only the first item is consulted by the fallback
        let v = json!([{"type": "other"}, {"type": "reasoning", "text": "late"}]);
        assert_eq!(extract(&v), None);

        let v = json!(["not an object", {"text": "x"}]);
        assert_eq!(extract(&v), None);
    }

    #[test]
    fn object_message_and_content_rules() {
        assert_eq!(
            extract(&json!({"message": {"content": "from content"}})).as_deref(),
            Some("from content")
        );
        assert_eq!(
            extract(&json!({"message": {"content": ["x"], "text": "from text"}})).as_deref(),
            Some("from text")
        );
        assert_eq!(extract(&json!({"content": "bare"})).as_deref(), Some("bare"));
        assert_eq!(extract(&json!({"content": ["not", "text"]})), None);
        assert_eq!(extract(&json!({"text": "", "message": "not an object"})), None);
    }

    #[test]
    fn non_string_text_fields_are_ignored() {
        let v = json!({"text": {"format": {"type": "text"}}, "content": "ok"});
        assert_eq!(extract(&v).as_deref(), Some("ok"));
    }

    #[test]
    fn primary_fast_path_reads_choices() {
        let v = json!({"choices": [{"message": {"content": "hi"}}]});
        assert_eq!(extract_primary(&v).as_deref(), Some("hi"));

        // full resolution on this body would pick the top-level text
        let v = json!({"text": "other", "choices": [{"message": {"content": "hi"}}]});
        assert_eq!(extract(&v).as_deref(), Some("other"));
        assert_eq!(extract_primary(&v).as_deref(), Some("hi"));
    }

    #[test]
    fn primary_falls_back_to_whole_body_then_first_choice() {
        let v = json!({"choices": [{"message": {"content": ""}}], "content": "body"});
        assert_eq!(extract_primary(&v).as_deref(), Some("body"));

        let v = json!({"choices": [{"text": "legacy completion"}]});
        assert_eq!(extract_primary(&v).as_deref(), Some("legacy completion"));

        let v = json!({"choices": [{"message": {"content": null, "text": "msg text"}}]});
        assert_eq!(extract_primary(&v).as_deref(), Some("msg text"));
    }

    #[test]
    fn primary_reads_responses_output() {
        let v = json!({
            "id": "resp_1",
            "object": "response",
            "text": {"format": {"type": "text"}},
            "output": [
                {"type": "web_search_call", "id": "ws_1", "status": "completed"},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "Outline:\n1. Intro", "annotations": []}
                ]}
            ]
        });
        assert_eq!(extract_primary(&v).as_deref(), Some("Outline:\n1. Intro"));

        let v = json!({"output_text": "sdk convenience", "output": []});
        assert_eq!(extract_primary(&v).as_deref(), Some("sdk convenience"));
    }

    #[test]
    fn primary_treats_empty_as_missing() {
        assert_eq!(extract_primary(&json!("")), None);
        assert_eq!(extract_primary(&json!({"content": ""})), None);
        assert_eq!(extract_primary(&json!({"choices": []})), None);
        assert_eq!(extract_primary(&json!({"choices": "oops"})), None);
        assert_eq!(extract_primary(&Value::Null), None);
    }

    #[test]
    fn shape_summary_lists_key_types() {
        let v = json!({"id": "x", "choices": [], "usage": {"total": 1}});
        assert_eq!(shape_summary(&v), "{choices: array, id: string, usage: object}");
        assert_eq!(shape_summary(&json!([1, 2])), "array[2]");
        assert_eq!(shape_summary(&Value::Null), "null");
    }

    #[test]
    fn classify_exposes_variants() {
        let v = json!([{"type": "web_search_call", "web_search_results": [{"text": "r"}]}, 3]);
        match UpstreamPayload::classify(&v) {
            UpstreamPayload::Items(items) => {
                assert_eq!(
                    items[0],
                    OutputItem::WebSearchCall {
                        results: vec!["r"],
                        text: None
                    }
                );
                assert_eq!(items[1], OutputItem::NotAnObject);
            }
            other => panic!("unexpected classification: {other:?}"),
        }
        assert_eq!(UpstreamPayload::classify(&json!(1.5)), UpstreamPayload::Unrecognized);
    }
}
