// ABOUTME: Integration tests for the HTTP responder against a one-shot local HTTP server.
// ABOUTME: Checks the request shape (POST + encoded query) and success/error/transport handling.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use askcode::config::ResponderConfig;
use askcode::responder::{HttpResponder, Responder, ResponderError};

/// Serve exactly one request with the given status line and body.
/// Resolves to the raw request head the client sent.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{addr}/OpenAi/CheckCode"), server)
}

fn responder(base_url: &str) -> HttpResponder {
    HttpResponder::new(&ResponderConfig {
        base_url: base_url.to_string(),
        ..Default::default()
    })
    .unwrap()
}

/// A 200 reply body comes back verbatim, and the question travels as an encoded query param on a POST.
#[tokio::test]
async fn success_returns_body_and_posts_encoded_text() {
    let (url, server) = serve_once("200 OK", "It prints hello.").await;

    let answer = responder(&url)
        .ask("What does this do? a&b=c")
        .await
        .unwrap();
    assert_eq!(answer, "It prints hello.");

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(
        request_line.starts_with("POST /OpenAi/CheckCode?text="),
        "unexpected request line: {request_line}"
    );
    assert!(
        request_line.contains("?text=What%20does%20this%20do%3F%20a%26b%3Dc "),
        "text must be percent-encoded: {request_line}"
    );
}

/// A non-2xx reply surfaces both the status and the error body.
#[tokio::test]
async fn error_status_carries_status_and_body() {
    let (url, server) = serve_once("500 Internal Server Error", "model overloaded").await;

    let err = responder(&url).ask("hi").await.unwrap_err();
    match &err {
        ResponderError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "model overloaded");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("model overloaded"));
    server.await.unwrap();
}

/// Nothing listening on the port is a transport error, not a panic.
#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = responder(&format!("http://{addr}/ask"))
        .ask("hi")
        .await
        .unwrap_err();
    assert!(matches!(err, ResponderError::Transport(_)), "got {err:?}");
}
