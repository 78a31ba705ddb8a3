use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompts;
use super::{RewriteError, Rewriter};
use crate::domain::types::Style;

/// HTTP リライター設定
#[derive(Debug, Clone)]
pub struct HttpRewriterConfig {
    /// OpenAI 互換エンドポイントのベース URL
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for HttpRewriterConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// OpenAI 互換 API を使用したリライター
pub struct HttpRewriter {
    client: reqwest::Client,
    config: HttpRewriterConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl HttpRewriter {
    pub fn new(config: HttpRewriterConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn endpoint(&self) -> String {
        if self.config.base_url.contains("/chat/completions") {
            self.config.base_url.clone()
        } else {
            format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            )
        }
    }
}

#[async_trait]
impl Rewriter for HttpRewriter {
    async fn rewrite(&self, text: &str, style: Style) -> Result<String, RewriteError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompts::system_prompt_for_style(style).to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompts::build_prompt(text),
                },
            ],
        };

        let mut req = self.client.post(self.endpoint()).json(&request);
        if let Some(ref key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                RewriteError::Timeout
            } else {
                RewriteError::Failed(format!("HTTP request failed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RewriteError::Failed(format!(
                "Backend error: {status} - {body}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| RewriteError::Failed(format!("Response parse error: {e}")))?;

        let text = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(RewriteError::Failed(
                "Empty response from backend".to_string(),
            ));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "http"
    }
}
