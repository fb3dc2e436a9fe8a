use bottrainer_interaction::{HttpIntentBackend, IntentBackend, TransportClient};
use serde_json::Value;

// Port 1 is reserved and never listening, so the connect fails immediately.
const UNREACHABLE: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn test_unreachable_backend_surfaces_error_without_status() {
    let client = TransportClient::new(UNREACHABLE);
    let err = client.get::<Value>("/config").await.unwrap_err();

    assert_eq!(err.status, None);
    assert!(
        err.message.contains("http://127.0.0.1:1/config"),
        "message should name the url: {}",
        err.message
    );
}

#[tokio::test]
async fn test_backend_propagates_transport_failure() {
    let backend = HttpIntentBackend::new(TransportClient::new(UNREACHABLE));
    assert!(backend.history().await.is_err());
    assert!(backend.clear_history().await.is_err());
}

/// Serves exactly one response on an ephemeral port and hands back the raw request.
async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind to ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let read = stream.read(&mut buf).await.expect("read request");
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..read]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        stream.write_all(response.as_bytes()).await.expect("write response");
        stream.flush().await.expect("flush");
        String::from_utf8_lossy(&raw).into_owned()
    });

    (format!("http://{addr}"), handle)
}

fn has_json_content_type(request: &str) -> bool {
    request.lines().any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.eq_ignore_ascii_case("content-type") && value.trim() == "application/json"
        })
    })
}

#[tokio::test]
async fn test_error_status_carries_detail_message() {
    let (base_url, server) =
        serve_once("400 Bad Request", r#"{"detail":"Invalid Gemini API Key"}"#).await;
    let client = TransportClient::new(base_url);

    let err = client
        .post::<_, Value>("/analyze", &serde_json::json!({ "message": "hi" }))
        .await
        .unwrap_err();

    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, "Invalid Gemini API Key");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /analyze "), "request line: {request}");
    assert!(has_json_content_type(&request), "missing json content type: {request}");
}

#[tokio::test]
async fn test_get_sends_json_content_type_and_decodes_body() {
    let (base_url, server) = serve_once("200 OK", r#"{"default_model":"qwen"}"#).await;
    let client = TransportClient::new(format!("{base_url}/"));

    let body: Value = client.get("/config").await.unwrap();
    assert_eq!(body["default_model"], "qwen");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /config "), "request line: {request}");
    assert!(has_json_content_type(&request), "missing json content type: {request}");
}

#[tokio::test]
async fn test_delete_with_empty_body_succeeds() {
    let (base_url, server) = serve_once("200 OK", "").await;
    let client = TransportClient::new(base_url);

    assert_eq!(client.delete("/history").await, Ok(()));

    let request = server.await.unwrap();
    assert!(request.starts_with("DELETE /history "), "request line: {request}");
    assert!(has_json_content_type(&request), "missing json content type: {request}");
}
