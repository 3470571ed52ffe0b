use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Longest article body, in bytes, sent for summarization.
const MAX_CONTENT_BYTES: usize = 10_000;

const SUMMARY_PROMPT: &str = r#"You summarize articles for a daily reading digest.
Reply with two or three plain sentences covering the key facts and conclusions.
Do not use headings, lists or markdown."#;

/// Anything that can turn an article into a short summary.
#[allow(async_fn_in_trait)]
pub trait Summarize {
    async fn summarize(&self, title: &str, content: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    system: Option<String>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

pub struct Summarizer {
    client: Client,
    api_key: String,
    model: String,
}

impl Summarizer {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Sends one system + user exchange and returns the joined text blocks.
    pub async fn complete(&self, system: &str, user_message: String) -> Result<String> {
        let request = MessageRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            messages: vec![Message {
                role: "user".to_string(),
                content: user_message,
            }],
            system: Some(system.to_string()),
        };

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::ClaudeApi(format!("API error: {}", error_text)));
        }

        let message_response: MessageResponse = response.json().await?;

        let text = message_response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text.trim().to_string())
    }
}

impl Summarize for Summarizer {
    async fn summarize(&self, title: &str, content: &str) -> Result<String> {
        let user_message = format!(
            "Please summarize the following article:\n\nTitle: {}\n\nContent:\n{}",
            title,
            truncate(content, MAX_CONTENT_BYTES)
        );
        self.complete(SUMMARY_PROMPT, user_message).await
    }
}

/// Cuts `text` to at most `max` bytes without splitting a character.
pub(crate) fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
