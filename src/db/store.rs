use std::path::Path;

use chrono::NaiveDate;
use tokio_rusqlite::Connection;

use crate::error::Result;

use super::schema::ensure_schema;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Handle to the digest archive.
///
/// Every operation that needs "today" reads the date the handle was opened
/// with, so one run sees a single calendar day no matter how long it takes.
pub struct Store {
    pub(crate) conn: Connection,
    today: NaiveDate,
}

impl Store {
    pub async fn open(db_path: impl AsRef<Path>, today: NaiveDate) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn, today).await
    }

    #[cfg(test)]
    pub async fn open_in_memory(today: NaiveDate) -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn, today).await
    }

    async fn init(conn: Connection, today: NaiveDate) -> Result<Self> {
        conn.call(|conn| {
            ensure_schema(conn)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, today })
    }

    /// Today's date as stored in the `date` columns.
    pub fn today_key(&self) -> String {
        self.today.format(DATE_FORMAT).to_string()
    }

    /// Closes the underlying connection, surfacing any error SQLite reports
    /// while doing so.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}
