use chat_widget::agent::ChatAgent;
use chat_widget::conversation::ConversationLog;
use chat_widget::llm::{ CompletionConfig, CompletionError };
use chat_widget::models::chat::{ Message, Role };
use httpmock::prelude::*;
use serde_json::json;

const APOLOGY: &str = "Sorry, try again later.";

fn seeded_log() -> ConversationLog {
    let mut log = ConversationLog::new("You are a beauty assistant.");
    log.append(Message::user("Any serum for fine lines?"));
    log
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": text }, "finish_reason": "stop" }
        ]
    })
}

#[tokio::test]
async fn direct_mode_pins_model_and_token_limit() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test")
            .header("content-type", "application/json")
            .json_body(json!({
                "model": "gpt-4o",
                "messages": [
                    { "role": "system", "content": "You are a beauty assistant." },
                    { "role": "user", "content": "Any serum for fine lines?" }
                ],
                "max_completion_tokens": 300
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(reply_body("Try our Revitalift serum"));
    });

    let config = CompletionConfig::direct(server.base_url(), "sk-test");
    let agent = ChatAgent::from_config(&config, APOLOGY).unwrap();
    let mut log = seeded_log();

    let reply = agent.complete(&mut log).await;

    mock.assert();
    assert_eq!(reply, "Try our Revitalift serum");
    assert_eq!(log.len(), 3);
    assert_eq!(log.last(), Some(&Message::assistant("Try our Revitalift serum")));
}

#[tokio::test]
async fn proxy_mode_sends_only_messages() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat")
            .header("content-type", "application/json")
            .json_body(json!({
                "messages": [
                    { "role": "system", "content": "You are a beauty assistant." },
                    { "role": "user", "content": "Any serum for fine lines?" }
                ]
            }));
        then.status(200).json_body(reply_body("Hello from the worker"));
    });

    let config = CompletionConfig::proxy(server.url("/chat"));
    let agent = ChatAgent::from_config(&config, APOLOGY).unwrap();
    let mut log = seeded_log();

    assert_eq!(agent.complete(&mut log).await, "Hello from the worker");
    mock.assert();
    assert_eq!(log.count_role(Role::Assistant), 1);
}

#[tokio::test]
async fn server_error_returns_apology_and_keeps_user_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let config = CompletionConfig::direct(server.base_url(), "sk-test");
    let agent = ChatAgent::from_config(&config, APOLOGY).unwrap();
    let mut log = seeded_log();

    assert_eq!(agent.complete(&mut log).await, APOLOGY);
    mock.assert();
    assert_eq!(log.len(), 2);
    assert_eq!(log.last(), Some(&Message::user("Any serum for fine lines?")));
    assert_eq!(log.count_role(Role::Assistant), 0);
}

#[tokio::test]
async fn failures_are_classified() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/status");
        then.status(429);
    });
    server.mock(|when, then| {
        when.method(POST).path("/garbage");
        then.status(200).body("<html>not json</html>");
    });
    server.mock(|when, then| {
        when.method(POST).path("/empty");
        then.status(200).json_body(json!({ "choices": [] }));
    });

    let kind_for = |path: &str| {
        let config = CompletionConfig::proxy(server.url(path));
        async move {
            let agent = ChatAgent::from_config(&config, APOLOGY).unwrap();
            let mut log = seeded_log();
            let err = agent.respond(&mut log).await.unwrap_err();
            assert_eq!(log.len(), 2);
            err
        }
    };

    let status = kind_for("/status").await;
    assert!(matches!(status, CompletionError::Status(code) if code.as_u16() == 429));
    assert_eq!(status.kind(), "http-status");
    assert_eq!(kind_for("/garbage").await.kind(), "parse");
    assert!(matches!(kind_for("/empty").await, CompletionError::MissingContent));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = CompletionConfig::proxy(format!("http://{}/chat", addr));
    let agent = ChatAgent::from_config(&config, APOLOGY).unwrap();
    let mut log = seeded_log();

    let err = agent.respond(&mut log).await.unwrap_err();
    assert_eq!(err.kind(), "network");
    assert_eq!(agent.complete(&mut log).await, APOLOGY);
}

#[tokio::test]
async fn every_request_starts_with_system_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat")
            .body_contains(r#""messages":[{"role":"system","content":"You are a beauty assistant."}"#);
        then.status(200).json_body(reply_body("noted"));
    });

    let config = CompletionConfig::proxy(server.url("/chat"));
    let agent = ChatAgent::from_config(&config, APOLOGY).unwrap();
    let mut log = ConversationLog::new("You are a beauty assistant.");
    for i in 0..4 {
        log.append(Message::user(format!("question {}", i)));
        assert_eq!(agent.complete(&mut log).await, "noted");
    }

    mock.assert_hits(4);
    assert_eq!(log.len(), 1 + 2 * 4);
}
