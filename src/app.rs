use crate::ai::{analyst, Summarizer};
use crate::config::{Config, FeedConfig};
use crate::db::Store;
use crate::digest::archive::{self, RegenerationReport};
use crate::digest::live::{self, FeedReport, IngestOptions};
use crate::error::Result;
use crate::feed::FeedFetcher;
use crate::models::FetchedFeed;
use crate::output::{DigestSink, MarkdownWriter};
use crate::services::{Notifier, Notify};

/// One run of the digest against an open store.
pub struct App<'a, N = Notifier> {
    config: &'a Config,
    store: &'a Store,
    fetcher: FeedFetcher,
    summarizer: Option<Summarizer>,
    notifier: Option<N>,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, store: &'a Store) -> Result<Self> {
        let notifier = config
            .notify_url
            .as_ref()
            .map(|url| Notifier::new(url.clone()))
            .transpose()?;

        Self::with_notifier(config, store, notifier)
    }
}

impl<'a, N: Notify> App<'a, N> {
    pub fn with_notifier(
        config: &'a Config,
        store: &'a Store,
        notifier: Option<N>,
    ) -> Result<Self> {
        let summarizer = config
            .claude_api_key
            .as_ref()
            .map(|key| Summarizer::new(key.clone(), config.claude_model.clone()))
            .transpose()?;

        Ok(Self {
            config,
            store,
            fetcher: FeedFetcher::new()?,
            summarizer,
            notifier,
        })
    }

    /// Fetches every configured feed and writes today's digest to `sink`.
    pub async fn run_live<W: DigestSink + ?Sized>(&self, sink: &mut W) -> Result<()> {
        if self.config.analyst.enabled {
            match &self.summarizer {
                Some(summarizer) => {
                    if let Err(e) =
                        analyst::run(self.store, summarizer, &self.config.analyst, sink).await
                    {
                        tracing::warn!("Analyst section failed: {}", e);
                    }
                }
                None => tracing::warn!("Analyst enabled but no claude_api_key configured"),
            }
        }

        let fetched = self.fetcher.fetch_all(&self.config.feeds).await;
        self.ingest_fetched(fetched, sink).await;
        Ok(())
    }

    /// Ingests each fetched feed in order. A feed that failed to fetch is
    /// logged and skipped.
    async fn ingest_fetched<W: DigestSink + ?Sized>(
        &self,
        fetched: Vec<(&FeedConfig, Result<FetchedFeed>)>,
        sink: &mut W,
    ) {
        for (feed_config, result) in fetched {
            let feed = match result {
                Ok(feed) => feed,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", feed_config.url, e);
                    continue;
                }
            };

            let source = feed_config.title.clone().unwrap_or_else(|| feed.title.clone());
            let options = IngestOptions {
                summarize: feed_config.summarize,
                instapaper: self.config.instapaper,
                max_items: feed_config.max_items,
            };

            let report = live::ingest_feed(
                self.store,
                self.summarizer.as_ref(),
                sink,
                &source,
                &feed,
                options,
            )
            .await;

            self.notify_if_needed(feed_config, &source, report).await;
        }
    }

    async fn notify_if_needed(&self, feed_config: &FeedConfig, source: &str, report: FeedReport) {
        if !feed_config.notify || report.new_items == 0 {
            return;
        }
        let Some(notifier) = &self.notifier else {
            tracing::debug!("{} wants notifications but no notify_url is configured", source);
            return;
        };
        if self.store.was_notified_today(source).await {
            tracing::debug!("{} already notified today", source);
            return;
        }

        // Only record the notification once it went out, so a later run retries.
        match notifier.notify(source, report.new_items).await {
            Ok(()) => {
                if let Err(e) = self.store.mark_notified(source).await {
                    tracing::warn!("Failed to record notification for {}: {}", source, e);
                }
            }
            Err(e) => tracing::warn!("Notification for {} failed: {}", source, e),
        }
    }

    /// Rewrites the markdown digest of every archived day.
    pub async fn run_generate_all(&self) -> Result<RegenerationReport> {
        let config = self.config;
        archive::regenerate_all(self.store, config.instapaper, |date| {
            MarkdownWriter::create(
                &config.markdown_dir,
                &config.markdown_file_prefix,
                &config.markdown_file_suffix,
                date,
            )
        })
        .await
    }

    /// Fresh markdown target for today.
    pub fn today_writer(&self) -> Result<MarkdownWriter> {
        MarkdownWriter::create(
            &self.config.markdown_dir,
            &self.config.markdown_file_prefix,
            &self.config.markdown_file_suffix,
            &self.store.today_key(),
        )
    }
}
