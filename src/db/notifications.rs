use rusqlite::{params, OptionalExtension};

use crate::error::Result;

use super::Store;

impl Store {
    /// Records that `feed` was announced today. Repeated calls are no-ops.
    pub async fn mark_notified(&self, feed: &str) -> Result<()> {
        let feed = feed.to_string();
        let today = self.today_key();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO notifications (feed, date, notified) VALUES (?1, ?2, 1)
                       ON CONFLICT(feed, date) DO UPDATE SET notified = 1"#,
                    params![feed, today],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// False when no row exists and when the lookup itself fails.
    pub async fn was_notified_today(&self, feed: &str) -> bool {
        let key = feed.to_string();
        let today = self.today_key();
        let notified = self
            .conn
            .call(move |conn| {
                let notified: Option<i64> = conn
                    .query_row(
                        r#"SELECT IFNULL(notified, 0) FROM notifications
                           WHERE feed = ?1 AND date = ?2"#,
                        params![key, today],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(notified)
            })
            .await;

        match notified {
            Ok(value) => value == Some(1),
            Err(e) => {
                tracing::debug!("Notification lookup for {} failed: {}", feed, e);
                false
            }
        }
    }
}
