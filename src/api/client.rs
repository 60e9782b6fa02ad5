use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{ChatRequest, ChatResponse, HealthStatus};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("could not reach the chat service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("chat service returned an unreadable reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The remote chat service as seen by the session runtime.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;

    /// Never fails; transport problems are reported as
    /// [`HealthStatus::Unreachable`].
    async fn check_health(&self) -> HealthStatus;
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use chatguard::api::endpoint_url;
///
/// assert_eq!(
///     endpoint_url("http://localhost:5001/api/", "/chat"),
///     "http://localhost:5001/api/chat"
/// );
/// ```
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let url = endpoint_url(&self.base_url, "chat");
        debug!(%url, mode = %request.mode, "sending chat request");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let body = response.text().await?;
        let reply: ChatResponse = serde_json::from_str(&body)?;
        debug!(classification = %reply.classification, "chat reply received");
        Ok(reply)
    }

    async fn check_health(&self) -> HealthStatus {
        let url = endpoint_url(&self.base_url, "health");
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => HealthStatus::Connected,
            Ok(response) => {
                warn!(status = %response.status(), "health check returned an error status");
                HealthStatus::Degraded(response.status().as_u16())
            }
            Err(err) => {
                warn!("chat service offline: {err}");
                HealthStatus::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Classification;
    use crate::core::mode::Mode;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    type Captured = Arc<Mutex<Vec<(String, String)>>>;

    async fn read_request(stream: &mut tokio::net::TcpStream) -> (String, String) {
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 1024];
        let header_end = loop {
            let read = stream.read(&mut chunk).await.expect("read");
            assert!(read > 0, "client closed before sending headers");
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let request_line = head.lines().next().unwrap_or_default().to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buffer[header_end..].to_vec();
        while body.len() < content_length {
            let read = stream.read(&mut chunk).await.expect("read body");
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read]);
        }
        (request_line, String::from_utf8_lossy(&body).to_string())
    }

    /// Serves one canned response per accepted connection.
    async fn serve(responses: Vec<String>) -> (String, Captured) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let captured_for_server = Arc::clone(&captured);

        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = listener.accept().await.expect("accept");
                let request = read_request(&mut stream).await;
                captured_for_server.lock().await.push(request);
                stream
                    .write_all(response.as_bytes())
                    .await
                    .expect("write");
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{addr}/api"), captured)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    }

    fn client_for(base_url: &str) -> HttpChatApi {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client");
        HttpChatApi::with_client(client, base_url)
    }

    #[test]
    fn endpoint_url_normalizes_slashes() {
        assert_eq!(
            endpoint_url("http://localhost:5001/api", "chat"),
            "http://localhost:5001/api/chat"
        );
        assert_eq!(
            endpoint_url("http://localhost:5001/api///", "///health"),
            "http://localhost:5001/api/health"
        );
    }

    #[tokio::test]
    async fn send_chat_posts_message_and_mode() {
        let (base_url, captured) = serve(vec![http_response(
            "200 OK",
            r#"{"reply":"Hi there","classification":"safe","confidence":0.99,"mode":"formal"}"#,
        )])
        .await;

        let api = client_for(&base_url);
        let reply = api
            .send_chat(&ChatRequest {
                message: "Hello".into(),
                mode: Mode::Formal,
            })
            .await
            .expect("reply");

        assert_eq!(reply.reply, "Hi there");
        assert_eq!(reply.classification, Classification::Safe);

        let requests = captured.lock().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].0.starts_with("POST /api/chat "));
        let body: serde_json::Value = serde_json::from_str(&requests[0].1).expect("json body");
        assert_eq!(body, serde_json::json!({"message": "Hello", "mode": "formal"}));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base_url, _captured) = serve(vec![http_response(
            "500 Internal Server Error",
            r#"{"error":"Internal server error"}"#,
        )])
        .await;

        let err = client_for(&base_url)
            .send_chat(&ChatRequest {
                message: "test".into(),
                mode: Mode::Funny,
            })
            .await
            .expect_err("should fail");
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn unreadable_body_is_a_decode_error() {
        let (base_url, _captured) = serve(vec![http_response("200 OK", "not json")]).await;

        let err = client_for(&base_url)
            .send_chat(&ChatRequest {
                message: "test".into(),
                mode: Mode::Formal,
            })
            .await
            .expect_err("should fail");
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn health_reports_connected_and_degraded() {
        let (base_url, captured) = serve(vec![
            http_response("200 OK", r#"{"status":"ok"}"#),
            http_response("503 Service Unavailable", "{}"),
        ])
        .await;

        let api = client_for(&base_url);
        assert_eq!(api.check_health().await, HealthStatus::Connected);
        assert_eq!(api.check_health().await, HealthStatus::Degraded(503));
        assert!(captured.lock().await[0].0.starts_with("GET /api/health "));
    }

    #[tokio::test]
    async fn health_reports_unreachable_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let api = client_for(&format!("http://{addr}/api"));
        assert_eq!(api.check_health().await, HealthStatus::Unreachable);
    }
}
