//! Today's ingestion pass for a single feed.

use crate::ai::Summarize;
use crate::db::Store;
use crate::models::{FeedItem, FetchedFeed, NewSeenItem};
use crate::output::DigestSink;

use super::render_item;

#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    pub summarize: bool,
    pub instapaper: bool,
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedReport {
    /// Items recorded for the first time by this run.
    pub new_items: usize,
    /// Items already recorded earlier today, rendered again.
    pub repeated_today: usize,
    /// Items recorded on a previous day.
    pub skipped: usize,
    pub failed: usize,
}

/// Deduplicates `feed` against the store, records new items and renders
/// everything that belongs in today's digest under `source`.
///
/// Per-item failures are logged and counted; they never stop the pass.
pub async fn ingest_feed<S, W>(
    store: &Store,
    summarizer: Option<&S>,
    sink: &mut W,
    source: &str,
    feed: &FetchedFeed,
    options: IngestOptions,
) -> FeedReport
where
    S: Summarize,
    W: DigestSink + ?Sized,
{
    let mut report = FeedReport::default();
    let mut header_written = false;
    let limit = options.max_items.unwrap_or(usize::MAX);

    for item in feed.items.iter().take(limit) {
        let status = match store.is_seen(&item.url).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Lookup failed for {}: {}", item.url, e);
                report.failed += 1;
                continue;
            }
        };

        if status.seen_before {
            report.skipped += 1;
            continue;
        }

        let summary = if status.seen_today {
            report.repeated_today += 1;
            Some(status.prior_summary).filter(|s| !s.is_empty())
        } else {
            let summary = match summarizer.filter(|_| options.summarize) {
                Some(summarizer) => summarize_item(summarizer, item).await,
                None => None,
            };

            let record = NewSeenItem {
                url: item.url.clone(),
                summary: summary.clone(),
                title: Some(item.title.clone()),
                feed_title: Some(source.to_string()),
            };
            match store.mark_seen(record).await {
                Ok(()) => report.new_items += 1,
                Err(e) => {
                    tracing::warn!("Failed to record {}: {}", item.url, e);
                    report.failed += 1;
                }
            }
            summary
        };

        if !header_written {
            let header = sink.header_for(source, feed.icon_address());
            if let Err(e) = sink.append(&header) {
                tracing::warn!("Failed to write header for {}: {}", source, e);
            }
            header_written = true;
        }

        let rendered = render_item(
            sink,
            &item.title,
            &item.url,
            summary.as_deref(),
            options.instapaper,
        );
        if let Err(e) = rendered {
            tracing::warn!("Failed to render {}: {}", item.url, e);
        }
    }

    tracing::info!(
        "{}: {} new, {} repeated, {} skipped, {} failed",
        source,
        report.new_items,
        report.repeated_today,
        report.skipped,
        report.failed
    );
    report
}

async fn summarize_item<S: Summarize>(summarizer: &S, item: &FeedItem) -> Option<String> {
    let content = item.content.as_deref().unwrap_or(&item.title);
    match summarizer.summarize(&item.title, content).await {
        Ok(summary) => Some(summary).filter(|s| !s.trim().is_empty()),
        Err(e) => {
            tracing::warn!("Summary failed for {}: {}", item.url, e);
            None
        }
    }
}
