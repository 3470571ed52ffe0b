use std::collections::HashMap;

use rusqlite::{params, OptionalExtension, Row};

use crate::error::Result;
use crate::models::{
    ArchivedDay, ArchivedItem, NewSeenItem, SeenArticle, SeenRow, SeenStatus, UNKNOWN_DATE,
};

use super::Store;

impl Store {
    /// Looks `url` up against the most recent row recorded for it.
    ///
    /// A missing row is the normal "new item" answer, not an error.
    pub async fn is_seen(&self, url: &str) -> Result<SeenStatus> {
        let url = url.to_string();
        let row = self
            .conn
            .call(move |conn| {
                let row: Option<(Option<String>, Option<String>)> = conn
                    .query_row(
                        "SELECT date, summary FROM seen WHERE url = ?1 ORDER BY rowid DESC LIMIT 1",
                        params![url],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?;
                Ok(row)
            })
            .await?;

        Ok(SeenStatus::from_lookup(row, &self.today_key()))
    }

    /// Records `item` as seen today.
    ///
    /// Same-day duplicates are not rejected here; callers check `is_seen`
    /// first.
    pub async fn mark_seen(&self, item: NewSeenItem) -> Result<()> {
        let today = self.today_key();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO seen (url, date, summary, title, feed_title)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    params![
                        item.url,
                        today,
                        blank_to_null(item.summary),
                        blank_to_null(item.title),
                        blank_to_null(item.feed_title),
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn get_articles_for_day(&self, date: &str) -> Result<Vec<SeenArticle>> {
        let date = date.to_string();
        let articles = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT url, summary FROM seen WHERE date = ?1 ORDER BY rowid")?;
                let articles = stmt
                    .query_map(params![date], |row| {
                        Ok(SeenArticle {
                            url: row.get(0)?,
                            summary: row.get(1)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    /// Distinct recorded days, oldest first. Rows without a usable date are
    /// reported once as `UNKNOWN_DATE`, after every real date.
    pub async fn get_all_days(&self) -> Result<Vec<String>> {
        let days = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT DISTINCT date FROM seen ORDER BY date ASC")?;
                let days = stmt
                    .query_map([], |row| row.get::<_, Option<String>>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(days)
            })
            .await?;

        // NULL and '' sort first in SQL; both collapse into one trailing
        // placeholder.
        let mut result: Vec<String> = Vec::with_capacity(days.len());
        let mut undated = false;
        for day in days {
            match crate::models::non_empty(day) {
                Some(day) => result.push(day),
                None => undated = true,
            }
        }
        if undated {
            result.push(UNKNOWN_DATE.to_string());
        }
        Ok(result)
    }

    /// Every recorded item grouped by day, newest day first and ordered by
    /// source name inside a day.
    pub async fn get_all_articles(&self) -> Result<Vec<ArchivedDay>> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT url, date, summary, title, feed_title
                       FROM seen
                       ORDER BY date DESC, feed_title ASC, rowid ASC"#,
                )?;
                let rows = stmt
                    .query_map([], seen_row_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        Ok(group_by_day(rows.into_iter().map(ArchivedItem::from)))
    }
}

/// Groups items by day, keeping the order in which each day first appears.
fn group_by_day(items: impl IntoIterator<Item = ArchivedItem>) -> Vec<ArchivedDay> {
    let mut days: Vec<ArchivedDay> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let slot = *index.entry(item.date.clone()).or_insert_with(|| {
            days.push(ArchivedDay {
                date: item.date.clone(),
                items: Vec::new(),
            });
            days.len() - 1
        });
        days[slot].items.push(item);
    }
    days
}

fn seen_row_from_row(row: &Row) -> rusqlite::Result<SeenRow> {
    Ok(SeenRow {
        url: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        date: row.get(1)?,
        summary: row.get(2)?,
        title: row.get(3)?,
        feed_title: row.get(4)?,
    })
}

fn blank_to_null(value: Option<String>) -> Option<String> {
    crate::models::non_empty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::day;
    use crate::models::UNKNOWN_FEED;

    fn item(url: &str, summary: &str, title: Option<&str>, feed: Option<&str>) -> NewSeenItem {
        NewSeenItem {
            url: url.to_string(),
            summary: Some(summary.to_string()),
            title: title.map(str::to_string),
            feed_title: feed.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn unknown_url_is_not_seen() {
        let store = Store::open_in_memory(day("2024-01-01")).await.unwrap();
        let status = store.is_seen("https://example.com/nope").await.unwrap();
        assert!(!status.seen_before);
        assert!(!status.seen_today);
        assert_eq!(status.prior_summary, "");
    }

    #[tokio::test]
    async fn marked_item_is_seen_today_then_seen_before() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.db");

        let store = Store::open(&path, day("2024-01-01")).await.unwrap();
        store
            .mark_seen(item("https://example.com/a", "An article", Some("A"), Some("Tech Blog")))
            .await
            .unwrap();

        let status = store.is_seen("https://example.com/a").await.unwrap();
        assert!(!status.seen_before);
        assert!(status.seen_today);
        assert_eq!(status.prior_summary, "An article");
        store.close().await.unwrap();

        let store = Store::open(&path, day("2024-01-02")).await.unwrap();
        let status = store.is_seen("https://example.com/a").await.unwrap();
        assert!(status.seen_before);
        assert!(!status.seen_today);
        assert_eq!(status.prior_summary, "An article");
    }

    #[tokio::test]
    async fn lookup_uses_most_recent_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.db");

        let store = Store::open(&path, day("2024-01-01")).await.unwrap();
        store.mark_seen(item("u", "old", None, None)).await.unwrap();
        store.close().await.unwrap();

        let store = Store::open(&path, day("2024-01-05")).await.unwrap();
        store.mark_seen(item("u", "new", None, None)).await.unwrap();

        let status = store.is_seen("u").await.unwrap();
        assert!(status.seen_today);
        assert!(!status.seen_before);
        assert_eq!(status.prior_summary, "new");
    }

    #[tokio::test]
    async fn mark_seen_does_not_deduplicate() {
        let store = Store::open_in_memory(day("2024-01-01")).await.unwrap();
        store.mark_seen(item("u", "", None, None)).await.unwrap();
        store.mark_seen(item("u", "", None, None)).await.unwrap();

        let articles = store.get_articles_for_day("2024-01-01").await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].summary, None);
    }

    #[tokio::test]
    async fn articles_for_day_match_exact_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.db");

        let store = Store::open(&path, day("2024-01-01")).await.unwrap();
        store.mark_seen(item("a", "sa", None, None)).await.unwrap();
        store.mark_seen(item("b", "sb", None, None)).await.unwrap();
        store.close().await.unwrap();

        let store = Store::open(&path, day("2024-01-02")).await.unwrap();
        store.mark_seen(item("c", "sc", None, None)).await.unwrap();

        let first = store.get_articles_for_day("2024-01-01").await.unwrap();
        assert_eq!(
            first,
            vec![
                SeenArticle {
                    url: "a".into(),
                    summary: Some("sa".into()),
                },
                SeenArticle {
                    url: "b".into(),
                    summary: Some("sb".into()),
                },
            ]
        );
        assert!(store.get_articles_for_day("2023-12-31").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn all_days_on_empty_store_is_empty() {
        let store = Store::open_in_memory(day("2024-01-01")).await.unwrap();
        assert!(store.get_all_days().await.unwrap().is_empty());
        assert!(store.get_all_articles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn all_days_are_distinct_and_ascending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.db");

        for date in ["2024-03-02", "2024-01-15", "2024-03-02", "2024-02-01"] {
            let store = Store::open(&path, day(date)).await.unwrap();
            store.mark_seen(item(date, "", None, None)).await.unwrap();
            store.close().await.unwrap();
        }

        let store = Store::open(&path, day("2024-04-01")).await.unwrap();
        assert_eq!(
            store.get_all_days().await.unwrap(),
            vec!["2024-01-15", "2024-02-01", "2024-03-02"]
        );
    }

    #[tokio::test]
    async fn all_articles_groups_by_day_with_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.db");

        let store = Store::open(&path, day("2024-01-01")).await.unwrap();
        store.mark_seen(item("a", "", None, None)).await.unwrap();
        store.mark_seen(item("b", "", None, None)).await.unwrap();
        store.close().await.unwrap();

        let store = Store::open(&path, day("2024-01-02")).await.unwrap();
        store
            .mark_seen(item("c", "about c", Some("Post C"), Some("Tech Blog")))
            .await
            .unwrap();

        let days = store.get_all_articles().await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-02");
        assert_eq!(days[1].date, "2024-01-01");

        assert_eq!(days[0].items.len(), 1);
        assert_eq!(days[0].items[0].title, "Post C");
        assert_eq!(days[0].items[0].feed_title, "Tech Blog");
        assert_eq!(days[0].items[0].summary.as_deref(), Some("about c"));

        let titles: Vec<_> = days[1].items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert!(days[1].items.iter().all(|i| i.feed_title == UNKNOWN_FEED));
        assert!(days[1].items.iter().all(|i| i.summary.is_none()));
    }

    #[tokio::test]
    async fn three_days_for_one_source_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.db");
        let dates = ["2024-05-01", "2024-05-02", "2024-05-03"];

        for date in dates {
            let store = Store::open(&path, day(date)).await.unwrap();
            for n in 0..2 {
                let url = format!("https://blog.example/{date}/{n}");
                store
                    .mark_seen(item(&url, "", Some(&format!("{date} #{n}")), Some("Blog")))
                    .await
                    .unwrap();
            }
            store.close().await.unwrap();
        }

        let store = Store::open(&path, day("2024-05-04")).await.unwrap();
        let days = store.get_all_articles().await.unwrap();
        let keys: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(keys, vec!["2024-05-03", "2024-05-02", "2024-05-01"]);

        for archived in &days {
            let titles: Vec<_> = archived.items.iter().map(|i| i.title.clone()).collect();
            assert_eq!(
                titles,
                vec![format!("{} #0", archived.date), format!("{} #1", archived.date)]
            );
            assert!(archived.items.iter().all(|i| i.date == archived.date));
        }
    }

    #[tokio::test]
    async fn items_inside_a_day_are_ordered_by_source() {
        let store = Store::open_in_memory(day("2024-01-01")).await.unwrap();
        store.mark_seen(item("z1", "", None, Some("Zeta"))).await.unwrap();
        store.mark_seen(item("a1", "", None, Some("Alpha"))).await.unwrap();
        store.mark_seen(item("z2", "", None, Some("Zeta"))).await.unwrap();

        let days = store.get_all_articles().await.unwrap();
        let urls: Vec<_> = days[0].items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["a1", "z1", "z2"]);
    }

    #[tokio::test]
    async fn legacy_rows_without_date_get_placeholder() {
        let store = Store::open_in_memory(day("2024-01-01")).await.unwrap();
        store
            .conn
            .call(|conn| {
                conn.execute("INSERT INTO seen (url) VALUES ('https://legacy.example')", [])?;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(store.get_all_days().await.unwrap(), vec![UNKNOWN_DATE]);

        let days = store.get_all_articles().await.unwrap();
        assert_eq!(days[0].date, UNKNOWN_DATE);
        assert_eq!(days[0].items[0].title, "https://legacy.example");

        let status = store.is_seen("https://legacy.example").await.unwrap();
        assert!(status.seen_before);
        assert!(!status.seen_today);
    }

    #[tokio::test]
    async fn undated_rows_come_after_real_dates() {
        let store = Store::open_in_memory(day("2024-01-01")).await.unwrap();
        store.mark_seen(item("dated", "", None, None)).await.unwrap();
        store
            .conn
            .call(|conn| {
                conn.execute_batch(
                    "INSERT INTO seen (url) VALUES ('null-date');
                     INSERT INTO seen (url, date) VALUES ('blank-date', '');",
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(
            store.get_all_days().await.unwrap(),
            vec!["2024-01-01".to_string(), UNKNOWN_DATE.to_string()]
        );

        let days = store.get_all_articles().await.unwrap();
        let keys: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(keys, vec!["2024-01-01", UNKNOWN_DATE]);
        assert_eq!(days[1].items.len(), 2);
    }
}
