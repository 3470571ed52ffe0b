//! Trend overview built from the last few days of the archive.

use std::fmt::Write as _;

use crate::config::AnalystConfig;
use crate::db::Store;
use crate::error::Result;
use crate::models::{SeenArticle, UNKNOWN_DATE};
use crate::output::DigestSink;

use super::Summarizer;

pub const SECTION_TITLE: &str = "Analyst";

const DEFAULT_PROMPT: &str = r#"You are a news analyst reading a personal reading log.
Given the links and summaries from the last few days, describe the recurring themes,
notable developments and anything that changed direction. Keep it under 200 words."#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHistory {
    pub date: String,
    pub articles: Vec<SeenArticle>,
}

/// The `days` most recent recorded days strictly before today, oldest first.
pub async fn recent_history(store: &Store, days: usize) -> Result<Vec<DayHistory>> {
    let today = store.today_key();
    let mut dates: Vec<String> = store
        .get_all_days()
        .await?
        .into_iter()
        .filter(|d| d != UNKNOWN_DATE && d.as_str() < today.as_str())
        .collect();
    let first = dates.len().saturating_sub(days);
    let dates = dates.split_off(first);

    let mut history = Vec::with_capacity(dates.len());
    for date in dates {
        let articles = store.get_articles_for_day(&date).await?;
        history.push(DayHistory { date, articles });
    }
    Ok(history)
}

pub fn build_prompt(history: &[DayHistory]) -> String {
    let mut prompt = String::from("Reading log:\n");
    for day in history {
        let _ = writeln!(prompt, "\n## {}", day.date);
        for article in &day.articles {
            let summary = article.summary.as_deref().unwrap_or("(no summary)");
            let _ = writeln!(prompt, "- {}: {}", article.url, summary);
        }
    }
    prompt
}

/// Appends the analyst section to `sink`. Does nothing when the archive has
/// no earlier days.
pub async fn run<W: DigestSink + ?Sized>(
    store: &Store,
    summarizer: &Summarizer,
    config: &AnalystConfig,
    sink: &mut W,
) -> Result<()> {
    let history = recent_history(store, config.days).await?;
    if history.is_empty() {
        tracing::debug!("No history for the analyst yet");
        return Ok(());
    }

    let system = config.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
    let overview = summarizer.complete(system, build_prompt(&history)).await?;
    if overview.is_empty() {
        return Ok(());
    }

    let header = sink.header_for(SECTION_TITLE, "");
    sink.append(&header)?;
    let block = sink.summary_block(&overview);
    sink.append(&block)?;
    Ok(())
}
