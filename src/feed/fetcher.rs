use std::time::Duration;

use feed_rs::model::Entry;
use feed_rs::parser;
use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::config::FeedConfig;
use crate::error::Result;
use crate::models::{FeedItem, FetchedFeed};

/// Max feeds fetched at once.
const FETCH_CONCURRENCY: usize = 5;

pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("daily-digest/1.0")
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<FetchedFeed> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Failed to fetch feed: HTTP {}", response.status()).into());
        }

        let bytes = response.bytes().await?;
        parse_feed(&bytes[..])
    }

    /// Fetches every configured feed concurrently. Results come back in
    /// configuration order so the digest layout does not depend on network
    /// timing.
    pub async fn fetch_all<'a>(
        &self,
        feeds: &'a [FeedConfig],
    ) -> Vec<(&'a FeedConfig, Result<FetchedFeed>)> {
        stream::iter(feeds)
            .map(|feed| async move {
                let result = self.fetch_feed(&feed.url).await;
                match &result {
                    Ok(fetched) => {
                        tracing::debug!("Fetched {} items from {}", fetched.items.len(), feed.url)
                    }
                    Err(e) => tracing::debug!("Failed to fetch {}: {}", feed.url, e),
                }
                (feed, result)
            })
            .buffered(FETCH_CONCURRENCY)
            .collect()
            .await
    }
}

pub fn parse_feed(bytes: &[u8]) -> Result<FetchedFeed> {
    let feed = parser::parse(bytes)?;

    let title = feed
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled Feed".to_string());
    let site_url = feed.links.first().map(|l| l.href.clone());

    let items = feed.entries.into_iter().filter_map(item_from_entry).collect();

    Ok(FetchedFeed {
        title,
        site_url,
        items,
    })
}

fn item_from_entry(entry: Entry) -> Option<FeedItem> {
    // Entries without a link cannot be deduplicated.
    let url = entry.links.first().map(|l| l.href.clone())?;

    // Try content first, then fall back to summary
    let content_html = entry
        .content
        .as_ref()
        .and_then(|c| c.body.as_ref())
        .or_else(|| entry.summary.as_ref().map(|s| &s.content));

    let content = content_html
        .and_then(|html| html2text::from_read(html.as_bytes(), 80).ok())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    Some(FeedItem {
        url,
        title: entry
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "Untitled".to_string()),
        content,
    })
}
