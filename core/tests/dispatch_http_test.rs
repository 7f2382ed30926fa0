/// Dispatcher tests over real sockets against a fake upstream
use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use quill_core::{Dispatcher, QuillError, Task, UpstreamConfig};
use serde_json::{json, Value};
use std::time::Duration;

async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn config(base_url: &str, timeout_ms: u64) -> UpstreamConfig {
    let mut cfg = UpstreamConfig::default();
    cfg.base_url = base_url.to_string();
    cfg.api_key = Some("sk-integration".to_string());
    cfg.request_timeout_ms = timeout_ms;
    cfg
}

#[tokio::test]
async fn sends_bearer_and_reads_choices() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let user = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
            Json(json!({
                "choices": [{"message": {"role": "assistant", "content": format!("{auth}|{user}")}}]
            }))
        }),
    );
    let base = spawn_upstream(app).await;
    let dispatcher = Dispatcher::from_config(config(&base, 5_000)).unwrap();

    let text = dispatcher
        .dispatch(Task::Reply, "You reply.", "Generate a friendly reply")
        .await
        .unwrap();
    assert_eq!(text, "Bearer sk-integration|Generate a friendly reply");
}

#[tokio::test]
async fn outline_goes_to_responses_endpoint() {
    let app = Router::new().route(
        "/v1/responses",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["tools"][0]["type"], "web_search");
            Json(json!({
                "output": [
                    {"type": "web_search_call", "web_search_results": [{"text": "source one"}, {"text": "source two"}]},
                    {"type": "message", "content": [{"type": "output_text", "text": "final"}]}
                ]
            }))
        }),
    );
    let base = spawn_upstream(app).await;
    let dispatcher = Dispatcher::from_config(config(&base, 5_000)).unwrap();

    let text = dispatcher.dispatch(Task::Outline, "sys", "desc").await.unwrap();
    assert_eq!(text, "source one\n\nsource two");
}

#[tokio::test]
async fn rate_limit_is_upstream_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": {"message": "rate limited"}})),
            )
        }),
    );
    let base = spawn_upstream(app).await;
    let dispatcher = Dispatcher::from_config(config(&base, 5_000)).unwrap();

    match dispatcher.dispatch(Task::Optimize, "i", "p").await {
        Err(QuillError::UpstreamError { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dispatcher = Dispatcher::from_config(config(&format!("http://{addr}/v1"), 5_000)).unwrap();
    let err = dispatcher.dispatch(Task::Rewrite, "i", "p").await.unwrap_err();
    assert!(matches!(err, QuillError::TransportError(_)));
    assert_eq!(err.status_code(), 503);
    assert!(!err.detail().contains("sk-integration"));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"choices": [{"message": {"content": "too late"}}]}))
        }),
    );
    let base = spawn_upstream(app).await;
    let dispatcher = Dispatcher::from_config(config(&base, 200)).unwrap();

    let err = dispatcher.dispatch(Task::Optimize, "i", "p").await.unwrap_err();
    assert!(matches!(err, QuillError::TransportError(_)));
}
