//! Wire-level tests for the completion client.
//!
//! A one-shot HTTP stub on a local `TcpListener` captures the request and
//! answers with a canned response, so the real reqwest path is exercised.

use std::sync::Arc;

use rolechat::controller::{Controller, ControllerState};
use rolechat::llm::{CompletionClient, LlmConfig, ProviderError};
use rolechat::message::{Message, Role};
use rolechat::persona::PromptCatalog;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A request as seen by the stub server.
#[derive(Debug)]
struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Value,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream.read(&mut chunk).await.map_err(|e| e.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.ok_or("missing header end")?;
    let header_text = std::str::from_utf8(&buffer[..header_end]).map_err(|e| e.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines.next().ok_or("Missing HTTP request line")?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse().map_err(|_| "bad content-length")?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream.read(&mut chunk).await.map_err(|e| e.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }

    let body = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

/// Serve exactly one request with `status` and `body`; returns the base URL
/// and a handle yielding the captured request.
async fn serve_once(
    status: &'static str,
    body: String,
) -> (String, JoinHandle<Result<CapturedRequest, String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.map_err(|e| e.to_string())?;
        let request = read_http_request(&mut stream).await?;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(|e| e.to_string())?;
        stream.shutdown().await.map_err(|e| e.to_string())?;
        Ok(request)
    });

    (format!("http://{}/openai/v1", addr), handle)
}

fn client_for(api_base: String) -> CompletionClient {
    let config = LlmConfig {
        api_base,
        api_key: "gsk_test_key".to_string(),
        ..LlmConfig::default()
    };
    CompletionClient::new(config, Arc::new(PromptCatalog::builtin()))
}

fn ok_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_sends_system_history_then_user_in_order() {
    let (base, server) = serve_once("200 OK", ok_body("hello")).await;
    let client = client_for(base);
    let catalog = PromptCatalog::builtin();

    let history = vec![
        Message::user("I want to eat better."),
        Message::assistant("Start with breakfast.", "Nutritionist"),
    ];
    let reply = client
        .complete("Nutritionist", &history, "hi")
        .await
        .expect("completion should succeed");
    assert_eq!(reply, "hello");

    let request = server.await.unwrap().expect("stub should capture request");
    assert_eq!(request.request_line, "POST /openai/v1/chat/completions HTTP/1.1");
    assert_eq!(request.header("authorization"), Some("Bearer gsk_test_key"));
    assert!(request
        .header("content-type")
        .is_some_and(|v| v.starts_with("application/json")));

    assert_eq!(
        request.body["messages"],
        json!([
            {"role": "system", "content": catalog.prompt_for("Nutritionist")},
            {"role": "user", "content": "I want to eat better."},
            {"role": "assistant", "content": "Start with breakfast."},
            {"role": "user", "content": "hi"}
        ])
    );
    assert_eq!(request.body["model"], "llama3-70b-8192");
    assert_eq!(request.body["max_tokens"], 1024);
    let temperature = request.body["temperature"].as_f64().unwrap();
    assert!((temperature - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn test_unknown_persona_uses_default_prompt() {
    let (base, server) = serve_once("200 OK", ok_body("ok")).await;
    let client = client_for(base);

    client.complete("Astronaut", &[], "hi").await.unwrap();

    let request = server.await.unwrap().unwrap();
    assert_eq!(
        request.body["messages"][0]["content"],
        PromptCatalog::builtin().prompt_for("General Assistant")
    );
}

#[tokio::test]
async fn test_missing_choices_is_malformed() {
    let (base, server) = serve_once("200 OK", json!({"id": "x"}).to_string()).await;
    let client = client_for(base);

    let err = client.complete("General Assistant", &[], "hi").await.unwrap_err();
    assert_eq!(err, ProviderError::MalformedResponse);
    assert_eq!(err.reason(), "malformed response");
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_error_status_keeps_provider_payload() {
    let body = json!({"error": {"message": "Invalid API Key", "type": "invalid_request_error"}});
    let (base, server) = serve_once("401 Unauthorized", body.to_string()).await;
    let client = client_for(base);

    let err = client.complete("General Assistant", &[], "hi").await.unwrap_err();
    assert_eq!(
        err,
        ProviderError::Api {
            status: 401,
            message: "Invalid API Key".to_string(),
            body: body.to_string(),
        }
    );
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_connection_refused_has_reason() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{}/openai/v1", addr));
    let err = client.complete("General Assistant", &[], "hi").await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport(_)));
    assert!(!err.reason().is_empty());
}

#[tokio::test]
async fn test_end_to_end_general_assistant_turn() {
    let (base, server) = serve_once("200 OK", ok_body("2 + 2 = 4")).await;
    let mut controller = Controller::new(client_for(base));
    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(controller.persona(), "General Assistant");

    assert!(controller.submit("What is 2+2?"));
    assert_eq!(controller.transcript().len(), 1);
    assert!(controller.is_busy());

    assert!(controller.wait_reply().await);

    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, Role::User);
    assert_eq!(transcript[0].content, "What is 2+2?");
    assert_eq!(transcript[1].role, Role::Assistant);
    assert_eq!(transcript[1].content, "2 + 2 = 4");
    assert_eq!(
        transcript[1].persona_label.as_deref(),
        Some("General Assistant")
    );
    assert_eq!(controller.state(), ControllerState::Idle);

    // The just-typed text is sent once, as the trailing user message
    let request = server.await.unwrap().unwrap();
    let messages = request.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], json!({"role": "user", "content": "What is 2+2?"}));
}

#[tokio::test]
async fn test_failed_turn_is_recorded_and_controller_recovers() {
    let (base, server) = serve_once("500 Internal Server Error", String::new()).await;
    let mut controller = Controller::new(client_for(base));

    controller.submit("hello");
    controller.wait_reply().await;
    server.await.unwrap().unwrap();

    let last = controller.store().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(
        last.content,
        "Sorry, there was an error processing your request: API error (500): no response body"
    );
    assert!(!controller.is_busy());
    assert!(controller.set_persona("Software Engineer"));
}
