//! Snapshot cache storage.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::{debug, warn};

use super::model::{CachedBody, CachedSnapshot};
use crate::Result;
use crate::newsletter::{NewsletterId, NewsletterRecord};

/// `SQLite` store for the last snapshot and fetched bodies.
pub struct SnapshotCache {
    pool: SqlitePool,
}

impl SnapshotCache {
    /// Opens the cache at the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let cache = Self { pool };
        cache.initialize().await?;
        Ok(cache)
    }

    /// Creates an in-memory cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let cache = Self { pool };
        cache.initialize().await?;
        Ok(cache)
    }

    async fn initialize(&self) -> Result<()> {
        // position keeps delivery order; id may be absent
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS cached_newsletters (
                position INTEGER PRIMARY KEY,
                id TEXT,
                sender TEXT NOT NULL,
                subject TEXT NOT NULL,
                newsletter_date TEXT NOT NULL,
                content TEXT,
                is_read INTEGER,
                cached_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_newsletters_id
            ON cached_newsletters(id)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS cached_bodies (
                id TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                cached_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replaces the cached snapshot with `records`.
    ///
    /// Runs in one transaction, so readers see either the old or the new
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn replace_snapshot(&self, records: &[NewsletterRecord]) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query(r"DELETE FROM cached_newsletters")
            .execute(&mut *tx)
            .await?;

        for (position, record) in (0_i64..).zip(records) {
            sqlx::query(
                r"
                INSERT INTO cached_newsletters
                    (position, id, sender, subject, newsletter_date, content, is_read, cached_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(position)
            .bind(record.id.as_ref().map(NewsletterId::as_str))
            .bind(&record.sender)
            .bind(&record.subject)
            .bind(record.newsletter_date.to_rfc3339())
            .bind(&record.content)
            .bind(record.is_read)
            .bind(&cached_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("Cached snapshot of {} records", records.len());
        Ok(())
    }

    /// Loads the cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_snapshot(&self) -> Result<CachedSnapshot> {
        let rows = sqlx::query(
            r"
            SELECT id, sender, subject, newsletter_date, content, is_read, cached_at
            FROM cached_newsletters
            ORDER BY position
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let cached_at = rows
            .first()
            .and_then(|row| parse_timestamp(&row.get::<String, _>("cached_at")));
        let records = rows.iter().filter_map(record_from_row).collect();

        Ok(CachedSnapshot { records, cached_at })
    }

    /// Mirrors a successful read-state write.
    ///
    /// Returns true if a cached record was updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update_is_read(&self, id: &NewsletterId, is_read: bool) -> Result<bool> {
        let result = sqlx::query(r"UPDATE cached_newsletters SET is_read = ? WHERE id = ?")
            .bind(is_read)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Caches a fetched body.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn cache_body(&self, id: &NewsletterId, body: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO cached_bodies (id, body, cached_at)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                body = excluded.body,
                cached_at = excluded.cached_at
            ",
        )
        .bind(id.as_str())
        .bind(body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a cached body.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_body(&self, id: &NewsletterId) -> Result<Option<CachedBody>> {
        let row = sqlx::query(r"SELECT id, body, cached_at FROM cached_bodies WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|row| {
            let cached_at = parse_timestamp(&row.get::<String, _>("cached_at"))?;
            Some(CachedBody {
                id: NewsletterId::new(row.get::<String, _>("id")),
                body: row.get("body"),
                cached_at,
            })
        }))
    }

    /// Removes everything from the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query(r"DELETE FROM cached_newsletters")
            .execute(&self.pool)
            .await?;
        sqlx::query(r"DELETE FROM cached_bodies")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn record_from_row(row: &SqliteRow) -> Option<NewsletterRecord> {
    let date: String = row.get("newsletter_date");
    let Some(newsletter_date) = parse_timestamp(&date) else {
        warn!("Skipping cached record with bad date {date}");
        return None;
    };

    Some(NewsletterRecord {
        id: row.get::<Option<String>, _>("id").map(NewsletterId::new),
        sender: row.get("sender"),
        subject: row.get("subject"),
        newsletter_date,
        content: row.get("content"),
        is_read: row.get("is_read"),
    })
}
