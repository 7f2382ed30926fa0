//! LLM module: upstream dispatch and response normalization
//!
//! This module provides:
//! - `Dispatcher` for sending one writer task to the upstream API
//! - `UpstreamTransport` / `HttpTransport`, the network seam and its reqwest implementation
//! - `build_payload` for the chat-completions and responses request shapes
//! - `extract` / `extract_primary` for turning variant-shaped replies into text

mod dispatcher;
pub mod normalize;
mod payload;
mod transport;

pub use dispatcher::{upstream_error_message, Dispatcher};
pub use normalize::{extract, extract_primary, shape_summary, UpstreamPayload};
pub use payload::{build_payload, endpoint_for};
pub use transport::{HttpTransport, TransportFailure, UpstreamReply, UpstreamTransport};
