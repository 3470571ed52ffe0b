//! Rebuilds per-day digests from the full archive.

use std::collections::BTreeMap;

use crate::db::Store;
use crate::error::Result;
use crate::models::{ArchivedDay, ArchivedItem, UNKNOWN_DATE};
use crate::output::DigestSink;

use super::render_item;

/// Items of one source within a day.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceSection<'a> {
    pub name: &'a str,
    pub items: Vec<&'a ArchivedItem>,
}

impl SourceSection<'_> {
    /// Address the section icon is derived from.
    pub fn icon_address(&self) -> &str {
        self.items.first().map(|item| item.url.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Default)]
pub struct RegenerationReport {
    pub rendered: Vec<String>,
    pub failed: Vec<String>,
}

/// Splits a day's items into source sections ordered by source name.
/// Items keep their archive order inside a section.
pub fn group_by_source(items: &[ArchivedItem]) -> Vec<SourceSection<'_>> {
    let mut sections: BTreeMap<&str, Vec<&ArchivedItem>> = BTreeMap::new();
    for item in items {
        sections.entry(item.feed_title.as_str()).or_default().push(item);
    }

    sections
        .into_iter()
        .map(|(name, items)| SourceSection { name, items })
        .collect()
}

pub fn render_day<W: DigestSink + ?Sized>(
    sink: &mut W,
    items: &[ArchivedItem],
    instapaper: bool,
) -> Result<()> {
    for section in group_by_source(items) {
        let header = sink.header_for(section.name, section.icon_address());
        sink.append(&header)?;

        for item in &section.items {
            render_item(sink, &item.title, &item.url, item.summary.as_deref(), instapaper)?;
        }
    }
    Ok(())
}

/// Renders every archived day, oldest first, into the sink `open_sink`
/// returns for that date. Undated items (`UNKNOWN_DATE`) are rendered last.
/// A day that fails is logged and skipped.
pub async fn regenerate_all<W, F>(
    store: &Store,
    instapaper: bool,
    open_sink: F,
) -> Result<RegenerationReport>
where
    W: DigestSink,
    F: FnMut(&str) -> Result<W>,
{
    let days = store.get_all_articles().await?;
    Ok(render_days(days, instapaper, open_sink))
}

fn render_days<W, F>(
    mut days: Vec<ArchivedDay>,
    instapaper: bool,
    mut open_sink: F,
) -> RegenerationReport
where
    W: DigestSink,
    F: FnMut(&str) -> Result<W>,
{
    days.sort_by_key(|day| (day.date == UNKNOWN_DATE, day.date.clone()));

    let mut report = RegenerationReport::default();
    for day in days {
        tracing::info!("Processing {} ({} articles)", day.date, day.items.len());

        let result = open_sink(&day.date)
            .and_then(|mut sink| render_day(&mut sink, &day.items, instapaper));
        match result {
            Ok(()) => report.rendered.push(day.date),
            Err(e) => {
                tracing::warn!("Failed to regenerate digest for {}: {}", day.date, e);
                report.failed.push(day.date);
            }
        }
    }
    report
}
