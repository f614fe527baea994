//! Integration tests for the chat client using wiremock.

use std::time::{Duration, Instant};

use crux_ai::{
    AiClient, AiError, ChatClient, ChatClientConfig, Conversation, Message, StreamEnd, StreamEvent,
    APOLOGY_MESSAGE,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse(deltas: &[&str]) -> String {
    let mut body = String::from(": keep-alive\n\n");
    for delta in deltas {
        let chunk = serde_json::json!({"choices": [{"index": 0, "delta": {"content": delta}}]});
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn client_for(server: &MockServer) -> ChatClient {
    let config = ChatClientConfig::new(format!("{}/functions/v1/chat", server.uri()), "chat-key")
        .with_completion(format!("{}/v1/chat/completions", server.uri()), "gateway-key")
        .with_model("google/gemini-2.5-flash");
    ChatClient::new(config).unwrap()
}

/// Run a stream and record events as strings; `Opened` becomes `<open>`.
async fn collect(client: &ChatClient, messages: &[Message]) -> (Result<StreamEnd, AiError>, Vec<String>) {
    let mut events = Vec::new();
    let result = client
        .stream_chat(messages, &CancellationToken::new(), &mut |event: StreamEvent<'_>| match event {
            StreamEvent::Opened => events.push("<open>".to_string()),
            StreamEvent::Delta(text) => events.push(text.to_string()),
        })
        .await;
    (result, events)
}

#[tokio::test]
async fn stream_delivers_open_then_deltas_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/chat"))
        .and(header("authorization", "Bearer chat-key"))
        .and(header("accept", "text/event-stream"))
        .and(body_json(serde_json::json!({
            "messages": [{"role": "user", "content": "Is this true?"}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse(&["Checking", " sources", "…done"]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (result, events) = collect(&client, &[Message::user("Is this true?")]).await;

    assert_eq!(result.unwrap(), StreamEnd::Terminated);
    assert_eq!(events, vec!["<open>", "Checking", " sources", "…done"]);
}

#[tokio::test]
async fn stream_without_terminator_is_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n",
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (result, events) = collect(&client, &[Message::user("hi")]).await;

    assert_eq!(result.unwrap(), StreamEnd::Exhausted);
    assert_eq!(events, vec!["<open>", "partial"]);
}

#[tokio::test]
async fn stream_rejoins_payload_split_across_lines() {
    let server = MockServer::start().await;

    let body = "data: {\"choices\":[{\"delta\":\n{\"content\":\"joined\"}}]}\n\ndata: [DONE]\n\n";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (result, events) = collect(&client, &[Message::user("hi")]).await;

    assert_eq!(result.unwrap(), StreamEnd::Terminated);
    assert_eq!(events, vec!["<open>", "joined"]);
}

#[tokio::test]
async fn stream_maps_rate_limit_before_open() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (result, events) = collect(&client, &[Message::user("hi")]).await;

    assert!(matches!(result, Err(AiError::RateLimited)));
    assert!(events.is_empty());
}

#[tokio::test]
async fn stream_maps_payment_required() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (result, _) = collect(&client, &[Message::user("hi")]).await;

    assert!(matches!(result, Err(AiError::PaymentRequired)));
}

#[tokio::test]
async fn stream_maps_server_error_with_body_excerpt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(500)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (result, _) = collect(&client, &[Message::user("hi")]).await;

    match result {
        Err(AiError::ApiError(msg)) => {
            assert!(msg.starts_with("HTTP 500"), "got: {msg}");
            assert!(msg.ends_with(&"x".repeat(200)));
            assert!(!msg.contains(&"x".repeat(201)));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn stream_with_no_content_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (result, events) = collect(&client, &[Message::user("hi")]).await;

    assert!(matches!(result, Err(AiError::ApiError(_))));
    assert!(events.is_empty());
}

#[tokio::test]
async fn stream_cancelled_up_front_never_opens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse(&["never"]), "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut opened = false;
    let end = client
        .stream_chat(&[Message::user("hi")], &cancel, &mut |event: StreamEvent<'_>| {
            if event == StreamEvent::Opened {
                opened = true;
            }
        })
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Cancelled);
    assert!(!opened);
}

#[tokio::test]
async fn stream_times_out_waiting_for_response_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse(&["late"]), "text/event-stream")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ChatClientConfig::new(format!("{}/functions/v1/chat", server.uri()), "chat-key")
        .with_idle_timeout(Some(Duration::from_millis(200)));
    let client = ChatClient::new(config).unwrap();

    let started = Instant::now();
    let (result, events) = collect(&client, &[Message::user("hi")]).await;

    assert!(matches!(result, Err(AiError::Timeout)));
    assert!(events.is_empty());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn complete_parses_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer gateway-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"verdict\": \"MIXED\"}"},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .complete(&[Message::system("be terse"), Message::user("check")])
        .await
        .unwrap();

    assert_eq!(reply, "{\"verdict\": \"MIXED\"}");
}

#[tokio::test]
async fn complete_maps_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.complete(&[Message::user("check")]).await.unwrap_err();

    assert!(matches!(err, AiError::RateLimited));
}

#[tokio::test]
async fn conversation_over_http_appends_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse(&["Mostly", " false."]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut convo = Conversation::new().with_greeting("Hi!");

    let outcome = convo
        .send(&client, "Vaccines cause autism?", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.reply, "Mostly false.");
    assert_eq!(
        convo.messages().last(),
        Some(&Message::assistant("Mostly false."))
    );
}

#[tokio::test]
async fn conversation_over_http_apologizes_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut convo = Conversation::new();

    let err = convo
        .send(&client, "anything", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AiError::ApiError(_)));
    assert_eq!(
        convo.messages(),
        &[Message::user("anything"), Message::assistant(APOLOGY_MESSAGE)]
    );
}
