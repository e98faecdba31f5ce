//! Discord REST Channel
//!
//! Creates public threads, posts messages and uploads files through the
//! Discord bot REST API.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use super::MessageChannel;
use crate::services::notify::types::*;

/// Discord thread type for a public thread.
const PUBLIC_THREAD: u8 = 11;

/// Discord bot API integration.
///
/// API endpoints:
/// - `POST {base}/channels/{parent}/threads`
/// - `POST {base}/channels/{thread}/messages`
pub struct DiscordChannel {
    client: reqwest::Client,
    api_base_url: String,
    parent_channel_id: String,
    bot_token: String,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

impl DiscordChannel {
    pub fn new(config: &ChannelConfig) -> Result<Self, ChannelError> {
        let bot_token = config
            .bot_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ChannelError::InvalidConfig("Discord bot token not configured".to_string()))?;

        let client = bench_verdict_llm::build_http_client(config.proxy.as_ref())
            .map_err(|e| ChannelError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            parent_channel_id: config.parent_channel_id.clone(),
            bot_token,
        })
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.api_base_url, channel_id)
    }

    /// Accept 200/201 and pull the `id` field out of the response.
    async fn read_id(response: reqwest::Response) -> Result<String, ChannelError> {
        let status = response.status().as_u16();
        if status != 200 && status != 201 {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::HttpError { status, body });
        }
        let parsed: IdResponse = response.json().await?;
        Ok(parsed.id)
    }

    /// JSON body for the thread creation call.
    fn thread_body(request: &ThreadRequest) -> serde_json::Value {
        serde_json::json!({
            "name": request.name,
            "auto_archive_duration": request.auto_archive_minutes,
            "type": PUBLIC_THREAD,
            "message": { "content": request.initial_message }
        })
    }
}

#[async_trait]
impl MessageChannel for DiscordChannel {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn create_thread(&self, request: &ThreadRequest) -> Result<ThreadId, ChannelError> {
        let url = format!(
            "{}/channels/{}/threads",
            self.api_base_url, self.parent_channel_id
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&Self::thread_body(request))
            .send()
            .await?;

        Ok(ThreadId(Self::read_id(response).await?))
    }

    async fn post_message(
        &self,
        thread: &ThreadId,
        content: &str,
    ) -> Result<MessageId, ChannelError> {
        let response = self
            .client
            .post(self.messages_url(&thread.0))
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;

        Ok(MessageId(Self::read_id(response).await?))
    }

    async fn upload_file(
        &self,
        thread: &ThreadId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<MessageId, ChannelError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report.pdf".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let mut form = multipart::Form::new();
        if let Some(caption) = caption {
            form = form.text("content", caption.to_string());
        }
        form = form.part("file", part);

        let response = self
            .client
            .post(self.messages_url(&thread.0))
            .header("Authorization", self.auth_header())
            .multipart(form)
            .send()
            .await?;

        Ok(MessageId(Self::read_id(response).await?))
    }

    async fn test(&self) -> Result<ChannelTestResult, ChannelError> {
        let start = std::time::Instant::now();
        let result = self
            .client
            .get(format!("{}/users/@me", self.api_base_url))
            .header("Authorization", self.auth_header())
            .send()
            .await;

        let latency_ms = Some(start.elapsed().as_millis() as u32);
        match result {
            Ok(response) if response.status().is_success() => Ok(ChannelTestResult {
                success: true,
                latency_ms,
                error: None,
            }),
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                Ok(ChannelTestResult {
                    success: false,
                    latency_ms,
                    error: Some(format!("Discord returned HTTP {}: {}", status, body)),
                })
            }
            Err(e) => Ok(ChannelTestResult {
                success: false,
                latency_ms,
                error: Some(e.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answer one request on a local port with `status` and `body`; the
    /// handle yields the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api/v9", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (base_url, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request_complete(&buf) {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let body = &buf[header_end + 4..];
        if headers.contains("transfer-encoding: chunked") {
            return body.ends_with(b"0\r\n\r\n");
        }
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    fn channel_at(base_url: &str) -> DiscordChannel {
        DiscordChannel::new(&ChannelConfig {
            api_base_url: base_url.to_string(),
            ..config()
        })
        .unwrap()
    }

    fn thread_request() -> ThreadRequest {
        ThreadRequest {
            name: "Análisis SRV-1".to_string(),
            auto_archive_minutes: 1440,
            initial_message: "hola".to_string(),
        }
    }

    fn config() -> ChannelConfig {
        ChannelConfig {
            bot_token: Some("token".to_string()),
            parent_channel_id: "42".to_string(),
            api_base_url: "https://discord.example/api/v9/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_bot_token() {
        let mut cfg = config();
        cfg.bot_token = None;
        assert!(matches!(
            DiscordChannel::new(&cfg),
            Err(ChannelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_urls_and_auth_header() {
        let channel = DiscordChannel::new(&config()).unwrap();
        assert_eq!(channel.auth_header(), "Bot token");
        assert_eq!(
            channel.messages_url("7"),
            "https://discord.example/api/v9/channels/7/messages"
        );
    }

    #[test]
    fn test_thread_body_shape() {
        let body = DiscordChannel::thread_body(&ThreadRequest {
            name: "Análisis SRV-1".to_string(),
            auto_archive_minutes: 1440,
            initial_message: "hola".to_string(),
        });
        assert_eq!(body["name"], "Análisis SRV-1");
        assert_eq!(body["auto_archive_duration"], 1440);
        assert_eq!(body["type"], 11);
        assert_eq!(body["message"]["content"], "hola");
    }

    #[tokio::test]
    async fn test_create_thread_accepts_201() {
        let (base_url, server) = serve_once("201 Created", r#"{"id":"900","type":11}"#).await;
        let thread = channel_at(&base_url)
            .create_thread(&thread_request())
            .await
            .unwrap();
        assert_eq!(thread, ThreadId("900".to_string()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/v9/channels/42/threads "));
        assert!(request.to_ascii_lowercase().contains("authorization: bot token"));
        assert!(request.contains(r#""type":11"#));
        assert!(request.contains(r#""auto_archive_duration":1440"#));
    }

    #[tokio::test]
    async fn test_post_message_accepts_200() {
        let (base_url, server) = serve_once("200 OK", r#"{"id":"m-1"}"#).await;
        let id = channel_at(&base_url)
            .post_message(&ThreadId("900".to_string()), "**FIO:**\nbien")
            .await
            .unwrap();
        assert_eq!(id, MessageId("m-1".to_string()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/v9/channels/900/messages "));
        assert!(request.contains(r#"{"content":"**FIO:**\nbien"}"#));
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let (base_url, _server) =
            serve_once("403 Forbidden", r#"{"message":"Missing Access","code":50001}"#).await;
        let err = channel_at(&base_url)
            .create_thread(&thread_request())
            .await
            .unwrap_err();
        match err {
            ChannelError::HttpError { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("Missing Access"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_success_codes_are_errors() {
        let (base_url, _server) = serve_once("204 No Content", "").await;
        let err = channel_at(&base_url)
            .post_message(&ThreadId("900".to_string()), "hola")
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::HttpError { status: 204, .. }));
    }

    #[tokio::test]
    async fn test_success_without_id_is_an_error() {
        let (base_url, _server) = serve_once("200 OK", r#"{"ok":true}"#).await;
        let result = channel_at(&base_url)
            .post_message(&ThreadId("900".to_string()), "hola")
            .await;
        assert!(matches!(result, Err(ChannelError::Transport(_))));
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SRV-1_informe.pdf");
        std::fs::write(&path, "%PDF-1.5 informe").unwrap();

        let (base_url, server) = serve_once("200 OK", r#"{"id":"f-1"}"#).await;
        let id = channel_at(&base_url)
            .upload_file(&ThreadId("900".to_string()), &path, Some("Adjunto informe"))
            .await
            .unwrap();
        assert_eq!(id, MessageId("f-1".to_string()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/v9/channels/900/messages "));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains(r#"name="content""#));
        assert!(request.contains("Adjunto informe"));
        assert!(request.contains(r#"name="file"; filename="SRV-1_informe.pdf""#));
        assert!(request.contains("application/pdf"));
        assert!(request.contains("%PDF-1.5 informe"));
    }

    #[tokio::test]
    async fn test_upload_rejection_carries_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SRV-1_informe.pdf");
        std::fs::write(&path, "%PDF-1.5").unwrap();

        let (base_url, _server) =
            serve_once("413 Payload Too Large", r#"{"message":"Request entity too large"}"#).await;
        let err = channel_at(&base_url)
            .upload_file(&ThreadId("900".to_string()), &path, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::HttpError { status: 413, .. }));
    }
}
