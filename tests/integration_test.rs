//! Integration tests for errlens
//!
//! These tests verify the integration between crates:
//! - errlens-llm: OpenAI-compatible provider against a local HTTP stub
//! - errlens-core: pipeline with the real remote client
//! - errlens-session: controller delivering outcomes to a surface

use axum::{http::StatusCode, routing::post, Json, Router};
use errlens_core::{
    classify, AnalysisMode, Diagnosis, DiagnosisPipeline, NoopObserver, RemoteDiagnosisClient,
    RemoteSettings,
};
use errlens_llm::{CompletionRequest, LlmProvider, Message, OpenAiConfig, OpenAiProvider};
use errlens_session::{
    AnalysisOutcome, ChannelSurface, ClientMessage, SessionController, Surface,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Stub completion service
// ============================================================================

type Captured = Arc<Mutex<Vec<Value>>>;

/// Serve `POST /chat/completions` with a fixed status and body
async fn spawn_stub(status: StatusCode, body: Value) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let app = Router::new().route(
        "/chat/completions",
        post(move |Json(request): Json<Value>| {
            let sink = sink.clone();
            let body = body.clone();
            async move {
                sink.lock().unwrap().push(request);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), captured)
}

fn completion(content: &str) -> Value {
    json!({
        "model": "gpt-3.5-turbo",
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
    })
}

fn settings(base_url: &str) -> RemoteSettings {
    RemoteSettings {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        ..RemoteSettings::default()
    }
}

// ============================================================================
// Provider Integration Tests
// ============================================================================

#[tokio::test]
async fn test_openai_provider_against_stub() {
    let (base_url, captured) = spawn_stub(StatusCode::OK, completion("hello")).await;
    let provider =
        OpenAiProvider::new(OpenAiConfig::new("sk-test").with_base_url(&base_url)).unwrap();

    let response = provider
        .complete(
            CompletionRequest::new("gpt-3.5-turbo")
                .with_message(Message::system("be brief"))
                .with_message(Message::user("hi"))
                .with_temperature(0.3)
                .with_max_tokens(1000),
        )
        .await
        .unwrap();

    assert_eq!(response.content, "hello");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(46));

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["model"], "gpt-3.5-turbo");
    assert_eq!(requests[0]["max_tokens"], 1000);
    assert_eq!(requests[0]["messages"][0]["role"], "system");
    assert_eq!(requests[0]["messages"][1]["content"], "hi");
}

#[tokio::test]
async fn test_openai_provider_non_success_status() {
    let (base_url, _) = spawn_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "boom"}}),
    )
    .await;
    let provider =
        OpenAiProvider::new(OpenAiConfig::new("sk-test").with_base_url(&base_url)).unwrap();

    let result = provider
        .complete(CompletionRequest::new("gpt-3.5-turbo").with_message(Message::user("hi")))
        .await;

    assert!(matches!(result, Err(errlens_llm::Error::Api(_))));
}

#[tokio::test]
async fn test_openai_provider_rate_limit() {
    let (base_url, _) = spawn_stub(StatusCode::TOO_MANY_REQUESTS, json!({})).await;
    let provider =
        OpenAiProvider::new(OpenAiConfig::new("sk-test").with_base_url(&base_url)).unwrap();

    let result = provider
        .complete(CompletionRequest::new("gpt-3.5-turbo").with_message(Message::user("hi")))
        .await;

    assert!(matches!(result, Err(errlens_llm::Error::RateLimit)));
}

// ============================================================================
// Pipeline Integration Tests
// ============================================================================

#[tokio::test]
async fn test_pipeline_uses_remote_diagnosis() {
    let reply = r#"{"type":"Type Error","cause":"a is undefined","solution":"guard it","prevention":"use optional chaining"}"#;
    let (base_url, captured) = spawn_stub(StatusCode::OK, completion(reply)).await;

    let client = RemoteDiagnosisClient::new(settings(&base_url));
    let pipeline = DiagnosisPipeline::new(Arc::new(client)).with_observer(Arc::new(NoopObserver));

    let diagnosis = pipeline
        .analyze(
            "undefined is not an object (evaluating 'a.b')",
            &AnalysisMode::ai("sk-test"),
        )
        .await;

    assert_eq!(
        diagnosis,
        Diagnosis::new(
            "Type Error",
            "a is undefined",
            "guard it",
            "use optional chaining"
        )
    );

    let requests = captured.lock().unwrap();
    let user = requests[0]["messages"][1]["content"].as_str().unwrap();
    assert!(user.ends_with("Error: undefined is not an object (evaluating 'a.b')"));
}

#[tokio::test]
async fn test_pipeline_falls_back_on_http_error() {
    let (base_url, _) = spawn_stub(StatusCode::UNAUTHORIZED, json!({"error": "bad key"})).await;

    let client = RemoteDiagnosisClient::new(settings(&base_url));
    let pipeline = DiagnosisPipeline::new(Arc::new(client)).with_observer(Arc::new(NoopObserver));

    let input = "TypeError: Cannot read property 'map' of undefined";
    let diagnosis = pipeline.analyze(input, &AnalysisMode::ai("sk-bad")).await;

    assert_eq!(diagnosis, classify(input));
    assert_eq!(diagnosis.kind, "Property Access Error");
}

#[tokio::test]
async fn test_pipeline_degrades_prose_reply() {
    let (base_url, _) = spawn_stub(StatusCode::OK, completion("Check your imports.")).await;

    let client = RemoteDiagnosisClient::new(settings(&base_url));
    let pipeline = DiagnosisPipeline::new(Arc::new(client)).with_observer(Arc::new(NoopObserver));

    let diagnosis = pipeline
        .analyze("Unable to resolve module foo", &AnalysisMode::ai("sk-test"))
        .await;

    assert_eq!(diagnosis.kind, "AI Analysis");
    assert_eq!(diagnosis.cause, "Raw AI Response");
    assert_eq!(diagnosis.solution, "Check your imports.");
    assert_eq!(diagnosis.prevention, "AI response format error");
}

// ============================================================================
// Session Integration Tests
// ============================================================================

#[tokio::test]
async fn test_session_round_trip_through_stub() {
    let reply = r#"```json
{"type":"Module Resolution Error","cause":"missing package","solution":"npm install foo","prevention":"pin deps"}
```"#;
    let (base_url, _) = spawn_stub(StatusCode::OK, completion(reply)).await;

    let client = RemoteDiagnosisClient::new(settings(&base_url));
    let pipeline = DiagnosisPipeline::new(Arc::new(client)).with_observer(Arc::new(NoopObserver));
    let controller = Arc::new(SessionController::new(pipeline, AnalysisMode::ai("sk-test")));

    let mut rx_slot = None;
    let opened = controller.open(|id| {
        let (surface, rx) = ChannelSurface::new(id);
        rx_slot = Some(rx);
        Arc::new(surface) as Arc<dyn Surface>
    });
    let mut rx = rx_slot.unwrap();

    let handle = controller
        .handle_message(
            opened.surface_id(),
            ClientMessage::Analyze {
                error: "  Unable to resolve module foo  ".to_string(),
                request_id: Some("req-1".to_string()),
            },
        )
        .unwrap();
    handle.await.unwrap();

    let message = rx.recv().await.unwrap();
    let wire = serde_json::to_value(&message).unwrap();
    assert_eq!(wire["type"], "analysis");
    assert_eq!(wire["requestId"], "req-1");
    assert_eq!(wire["result"]["type"], "Module Resolution Error");

    match message.outcome() {
        Some(AnalysisOutcome::Success { result }) => {
            assert_eq!(result.solution, "npm install foo");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_session_heuristic_only_mode() {
    let client = RemoteDiagnosisClient::new(settings("http://127.0.0.1:9"));
    let pipeline = DiagnosisPipeline::new(Arc::new(client)).with_observer(Arc::new(NoopObserver));
    let controller = Arc::new(SessionController::new(
        pipeline,
        AnalysisMode::heuristic_only(),
    ));

    let mut rx_slot = None;
    let opened = controller.open(|id| {
        let (surface, rx) = ChannelSurface::new(id);
        rx_slot = Some(rx);
        Arc::new(surface) as Arc<dyn Surface>
    });
    let mut rx = rx_slot.unwrap();

    controller
        .handle_message(
            opened.surface_id(),
            ClientMessage::analyze("Maximum update depth exceeded"),
        )
        .unwrap()
        .await
        .unwrap();

    let message = rx.recv().await.unwrap();
    assert_eq!(
        message.outcome(),
        Some(&AnalysisOutcome::Success {
            result: classify("Maximum update depth exceeded"),
        })
    );
}
