use rusqlite::{Connection, Result};

// Deployed stores may predate every column after `date`, so this statement
// must stay in its original shape; later columns are added below.
const SEEN_TABLE: &str = "CREATE TABLE IF NOT EXISTS seen (url TEXT, date TEXT, summary TEXT)";

/// Columns added to `seen` after its first release, in order.
const SEEN_COLUMNS: &[&str] = &["summary", "title", "feed_title"];

const NOTIFICATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS notifications (
    feed TEXT,
    date TEXT,
    notified INTEGER DEFAULT 0,
    PRIMARY KEY (feed, date)
);
"#;

// Lookup indexes only. Same-day uniqueness is left to callers: legacy stores
// may already hold duplicates a UNIQUE index would reject.
const SEEN_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_seen_url ON seen(url);
CREATE INDEX IF NOT EXISTS idx_seen_date ON seen(date);
"#;

/// Brings the store up to the current schema. Safe to run any number of
/// times; never drops or rewrites existing rows.
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(SEEN_TABLE)?;

    for column in SEEN_COLUMNS {
        if add_text_column_if_missing(conn, "seen", column)? {
            tracing::info!("Added column seen.{}", column);
        }
    }

    conn.execute_batch(NOTIFICATIONS_TABLE)?;
    conn.execute_batch(SEEN_INDEXES)?;
    Ok(())
}

/// Returns true when the column had to be added.
fn add_text_column_if_missing(conn: &mut Connection, table: &str, column: &str) -> Result<bool> {
    let tx = conn.transaction()?;
    let missing = !column_exists(&tx, table, column)?;
    if missing {
        tx.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} TEXT"))?;
    }
    tx.commit()?;
    Ok(missing)
}

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
