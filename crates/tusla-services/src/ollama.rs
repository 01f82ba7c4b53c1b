//! Ollama text-generation client
//!
//! Thin wrapper around the Ollama HTTP API. Only the non-streaming generate
//! endpoint is used.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for a local or remote Ollama instance
#[derive(Clone)]
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    system_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, system_prompt: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for Ollama")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            system_prompt,
        })
    }

    /// Check that the Ollama instance is reachable.
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    /// Run a single non-streaming completion and return the trimmed output.
    #[tracing::instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            system: self.system_prompt.as_deref(),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Ollama request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama returned status {}", response.status());
        }

        let body: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(body.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client =
            OllamaClient::new("http://localhost:11434/".to_string(), "llama3".to_string(), None)
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            model: "llama3",
            prompt: "hello",
            system: None,
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["stream"], false);
        assert!(json.get("system").is_none());
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "  Хүнс, хувцас  "}"#)
            .create_async()
            .await;

        let client = OllamaClient::new(server.url(), "llama3".to_string(), None).unwrap();
        let answer = client.generate("which category fits?").await.unwrap();

        assert_eq!(answer, "Хүнс, хувцас");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_fails_on_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(500)
            .create_async()
            .await;

        let client = OllamaClient::new(server.url(), "llama3".to_string(), None).unwrap();
        assert!(client.generate("prompt").await.is_err());
    }

    #[tokio::test]
    async fn test_health_check_reports_reachability() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models": []}"#)
            .create_async()
            .await;

        let client = OllamaClient::new(server.url(), "llama3".to_string(), None).unwrap();
        assert!(client.health_check().await.unwrap());
    }
}
