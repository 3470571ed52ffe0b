use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};

/// Anything that can announce new items from a source.
#[allow(async_fn_in_trait)]
pub trait Notify {
    async fn notify(&self, source: &str, new_items: usize) -> Result<()>;
}

/// Pushes "new items" messages to an ntfy-style endpoint: the message is the
/// request body and the title travels in a `Title` header.
pub struct Notifier {
    client: Client,
    url: String,
}

impl Notifier {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client, url })
    }
}

impl Notify for Notifier {
    async fn notify(&self, source: &str, new_items: usize) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header("Title", source)
            .body(message(source, new_items))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Notify(format!("HTTP {}: {}", status, error_text)));
        }

        tracing::info!("Sent notification for {}", source);
        Ok(())
    }
}

fn message(source: &str, new_items: usize) -> String {
    match new_items {
        1 => format!("1 new item from {source}"),
        n => format!("{n} new items from {source}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_pluralizes() {
        assert_eq!(message("Tech Blog", 1), "1 new item from Tech Blog");
        assert_eq!(message("Tech Blog", 3), "3 new items from Tech Blog");
    }
}
