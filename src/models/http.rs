use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::AssistantService;
use super::types::{ChatMessage, ChatRequest, ChatResponse, FinancialTip, HealthStatus};
use crate::constants::{CHAT_ENDPOINT, HEALTH_CHECK_TIMEOUT_MS, HEALTH_ENDPOINT, TIPS_ENDPOINT};
use crate::utils::AppError;

/// Assistant Service reached over HTTP
pub struct HttpAssistant {
    client: Client,
    base_url: String,
}

impl HttpAssistant {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:5000`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query the service health endpoint with a short timeout
    pub async fn health(&self) -> Result<HealthStatus, AppError> {
        let response = self
            .client
            .get(self.url(HEALTH_ENDPOINT))
            .timeout(Duration::from_millis(HEALTH_CHECK_TIMEOUT_MS))
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch a random financial tip
    pub async fn financial_tip(&self) -> Result<FinancialTip, AppError> {
        let response = self.client.get(self.url(TIPS_ENDPOINT)).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl AssistantService for HttpAssistant {
    async fn reply(&self, message: &str, history: &[ChatMessage]) -> Result<String, AppError> {
        let url = self.url(CHAT_ENDPOINT);
        debug!(url = %url, history = history.len(), "sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message, history })
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "chat request failed");
                AppError::from(e)
            })?;

        let body: ChatResponse = decode(response).await?;
        debug!(chars = body.response.len(), "chat reply received");
        Ok(body.response)
    }
}

/// Reject non-2xx statuses, then decode the JSON body
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        warn!(%status, body = %text, "assistant service returned an error");
        return Err(AppError::AssistantUnreachable(format!("HTTP {}: {}", status, text)));
    }
    Ok(response.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response and hand back the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            raw
        });

        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn body_of(raw: &str) -> serde_json::Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn assistant(url: &str) -> HttpAssistant {
        HttpAssistant::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_reply_success() {
        let (url, server) = serve_once("200 OK", r#"{"response":"Here is a plan"}"#).await;
        let history = vec![ChatMessage::assistant("Hello!")];

        let reply = assistant(&url).reply("budget help", &history).await.unwrap();
        assert_eq!(reply, "Here is a plan");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/chat HTTP/1.1"));
        let body = body_of(&raw);
        assert_eq!(body["message"], "budget help");
        assert_eq!(
            body["history"],
            serde_json::json!([{"role": "assistant", "content": "Hello!"}])
        );
    }

    #[tokio::test]
    async fn test_reply_server_error() {
        let (url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"error":"An error occurred processing your request"}"#,
        )
        .await;

        let err = assistant(&url).reply("budget help", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::AssistantUnreachable(ref detail) if detail.contains("500")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_reply_bad_body() {
        let (url, server) = serve_once("200 OK", r#"{"unexpected":true}"#).await;

        let err = assistant(&url).reply("hi", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::AssistantUnreachable(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_reply_connection_refused() {
        // Grab a free port, then close it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = assistant(&format!("http://{}", addr))
            .reply("hi", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AssistantUnreachable(_)));
    }

    #[tokio::test]
    async fn test_health_and_trailing_slash() {
        let (url, server) = serve_once("200 OK", r#"{"status":"healthy","timestamp":"now"}"#).await;

        let client = assistant(&format!("{}/", url));
        assert_eq!(client.base_url(), url);

        let health = client.health().await.unwrap();
        assert!(health.is_healthy());

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/health HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_financial_tip() {
        let (url, server) =
            serve_once("200 OK", r#"{"tip":"Start a SIP even with ₹500/month"}"#).await;

        let tip = assistant(&url).financial_tip().await.unwrap();
        assert!(tip.tip.starts_with("Start a SIP"));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/financial-tips HTTP/1.1"));
    }
}
