//! Chat backend HTTP client

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::language::Language;

use super::types::*;

/// Operations the conversation layer needs from the chat backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Liveness probe. `Ok` means the backend answered with a 2xx status.
    async fn health(&self) -> Result<()>;

    /// Send one user message and get the bot reply
    async fn chat(&self, message: &str, language: Language) -> Result<ChatReply>;

    /// Ask the backend to forget the current conversation
    async fn clear_conversation(&self) -> Result<()>;
}

/// reqwest-based client for the chat backend
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.api.timeout())
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create with custom base URL (for testing or custom endpoints)
    pub fn with_base_url(config: &Config, base_url: impl Into<String>) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(client)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ChatBackend for BackendClient {
    async fn health(&self) -> Result<()> {
        let url = self.url("/health");
        let response = self.client.get(&url).send().await.map_err(Error::Http)?;

        let status = response.status();
        if !status.is_success() {
            debug!("Health check failed: {}", status);
            return Err(Error::RequestFailed(format!("health check returned {}", status)));
        }

        Ok(())
    }

    async fn chat(&self, message: &str, language: Language) -> Result<ChatReply> {
        let url = self.url("/chat");

        debug!("Sending chat request to backend: {}", url);

        let request = ChatRequest {
            message: message.to_string(),
            language: language.code().to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Backend error: {} - {}", status, body);
            return Err(Error::RequestFailed(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            Error::RequestFailed(format!("Failed to parse response: {} - {}", e, body))
        })?;

        let reply = ChatReply::from(parsed);
        info!(
            "Backend response: {} chars, context={}",
            reply.text.len(),
            reply.context.as_ref().map(|c| c.len()).unwrap_or(0)
        );

        Ok(reply)
    }

    async fn clear_conversation(&self) -> Result<()> {
        let url = self.url("/conversation/clear");
        let response = self.client.post(&url).send().await.map_err(Error::Http)?;

        debug!("Conversation clear returned {}", response.status());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::with_base_url(&Config::default(), server.uri()).unwrap()
    }

    #[test]
    fn test_default_base_url() {
        let client = BackendClient::new(&Config::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }

    #[tokio::test]
    async fn test_health_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        assert!(client_for(&server).await.health().await.is_ok());
    }

    #[tokio::test]
    async fn test_health_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server).await.health().await;
        assert!(matches!(result, Err(Error::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_chat_sends_message_and_language() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "Kütüphane nerede?", "language": "tr"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Merkez kampüste.",
                "memory": {"context": {"campus": "central"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .await
            .chat("Kütüphane nerede?", Language::Tr)
            .await
            .unwrap();

        assert_eq!(reply.text, "Merkez kampüste.");
        assert_eq!(reply.context.unwrap()["campus"], "central");
    }

    #[tokio::test]
    async fn test_chat_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.chat("hi", Language::En).await;
        assert!(matches!(result, Err(Error::RequestFailed(msg)) if msg.contains("boom")));
    }

    #[tokio::test]
    async fn test_chat_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.chat("hi", Language::En).await;
        assert!(matches!(result, Err(Error::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_clear_conversation_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/conversation/clear"))
            .respond_with(ResponseTemplate::new(200).set_body_string("whatever"))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client_for(&server).await.clear_conversation().await.is_ok());
    }
}
