pub const UNKNOWN_FEED: &str = "Unknown Feed";
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Result of looking an identifier up in the `seen` table.
///
/// `seen_before` means "recorded on a prior day"; a row dated today only sets
/// `seen_today`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenStatus {
    pub seen_before: bool,
    pub seen_today: bool,
    pub prior_summary: String,
}

impl SeenStatus {
    /// Builds the status from the most recent `(date, summary)` row, if any.
    pub fn from_lookup(row: Option<(Option<String>, Option<String>)>, today: &str) -> Self {
        match row {
            None => Self::default(),
            Some((date, summary)) => {
                let seen_today = date.as_deref() == Some(today);
                Self {
                    seen_before: !seen_today,
                    seen_today,
                    prior_summary: summary.unwrap_or_default(),
                }
            }
        }
    }
}

/// Write payload for a freshly ingested item.
#[derive(Debug, Clone, Default)]
pub struct NewSeenItem {
    pub url: String,
    pub summary: Option<String>,
    pub title: Option<String>,
    pub feed_title: Option<String>,
}

/// `(url, summary)` pair returned for a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenArticle {
    pub url: String,
    pub summary: Option<String>,
}

/// A `seen` row exactly as stored; every column but `url` may be unset on
/// rows written before the column existed.
#[derive(Debug, Clone, Default)]
pub struct SeenRow {
    pub url: String,
    pub date: Option<String>,
    pub summary: Option<String>,
    pub title: Option<String>,
    pub feed_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedItem {
    pub url: String,
    pub date: String,
    pub summary: Option<String>,
    pub title: String,
    pub feed_title: String,
}

impl From<SeenRow> for ArchivedItem {
    fn from(row: SeenRow) -> Self {
        let title = non_empty(row.title).unwrap_or_else(|| row.url.clone());
        Self {
            date: date_or_unknown(row.date),
            summary: non_empty(row.summary),
            feed_title: non_empty(row.feed_title).unwrap_or_else(|| UNKNOWN_FEED.to_string()),
            title,
            url: row.url,
        }
    }
}

/// All archived items recorded on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedDay {
    pub date: String,
    pub items: Vec<ArchivedItem>,
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn date_or_unknown(date: Option<String>) -> String {
    non_empty(date).unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_row_is_new() {
        let status = SeenStatus::from_lookup(None, "2024-01-02");
        assert_eq!(status, SeenStatus::default());
    }

    #[test]
    fn row_from_today_is_only_seen_today() {
        let row = Some((Some("2024-01-02".to_string()), Some("short".to_string())));
        let status = SeenStatus::from_lookup(row, "2024-01-02");
        assert!(!status.seen_before);
        assert!(status.seen_today);
        assert_eq!(status.prior_summary, "short");
    }

    #[test]
    fn row_from_prior_day_is_seen_before() {
        let row = Some((Some("2024-01-01".to_string()), None));
        let status = SeenStatus::from_lookup(row, "2024-01-02");
        assert!(status.seen_before);
        assert!(!status.seen_today);
        assert_eq!(status.prior_summary, "");
    }

    #[test]
    fn legacy_row_gets_fallbacks() {
        let item = ArchivedItem::from(SeenRow {
            url: "https://example.com/a".to_string(),
            date: None,
            summary: Some(String::new()),
            title: None,
            feed_title: Some(String::new()),
        });

        assert_eq!(item.title, "https://example.com/a");
        assert_eq!(item.feed_title, UNKNOWN_FEED);
        assert_eq!(item.date, UNKNOWN_DATE);
        assert_eq!(item.summary, None);
    }

    #[test]
    fn populated_row_is_kept() {
        let item = ArchivedItem::from(SeenRow {
            url: "u".to_string(),
            date: Some("2024-01-01".to_string()),
            summary: Some("s".to_string()),
            title: Some("T".to_string()),
            feed_title: Some("F".to_string()),
        });

        assert_eq!(item.title, "T");
        assert_eq!(item.feed_title, "F");
        assert_eq!(item.date, "2024-01-01");
        assert_eq!(item.summary.as_deref(), Some("s"));
    }
}
