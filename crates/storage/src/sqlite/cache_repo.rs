use assess_core::cache::{CacheName, CachedResponse};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{CacheStorage, StorageError};

use super::SqliteRepository;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn map_response(row: &SqliteRow) -> Result<CachedResponse, StorageError> {
    let status: i64 = row.try_get("status").map_err(ser)?;
    let status = u16::try_from(status).map_err(|_| ser(format!("status {status} out of range")))?;
    Ok(CachedResponse {
        status,
        content_type: row.try_get("content_type").map_err(ser)?,
        body: row.try_get("body").map_err(ser)?,
    })
}

impl SqliteRepository {
    async fn bucket_id(&self, name: &str) -> Result<Option<i64>, StorageError> {
        let row = sqlx::query("SELECT id FROM cache_buckets WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        row.map(|row| row.try_get::<i64, _>("id").map_err(ser))
            .transpose()
    }
}

#[async_trait]
impl CacheStorage for SqliteRepository {
    async fn open(&self, name: &CacheName) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO cache_buckets (name, created_at)
            VALUES (?1, ?2)
            ON CONFLICT(name) DO NOTHING
            ",
        )
        .bind(name.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn bucket_names(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT name FROM cache_buckets ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(ser))
            .collect()
    }

    async fn delete_bucket(&self, name: &str) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM cache_buckets WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(res.rows_affected() > 0)
    }

    async fn put(
        &self,
        bucket: &CacheName,
        key: &str,
        response: &CachedResponse,
    ) -> Result<(), StorageError> {
        let bucket_id = self
            .bucket_id(bucket.as_str())
            .await?
            .ok_or(StorageError::NotFound)?;

        sqlx::query(
            r"
            INSERT INTO cache_entries (bucket_id, request_key, status, content_type, body, stored_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(bucket_id, request_key) DO UPDATE SET
                status = excluded.status,
                content_type = excluded.content_type,
                body = excluded.body,
                stored_at = excluded.stored_at
            ",
        )
        .bind(bucket_id)
        .bind(key)
        .bind(i64::from(response.status))
        .bind(response.content_type.as_deref())
        .bind(response.body.as_slice())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn lookup(
        &self,
        bucket: &CacheName,
        key: &str,
    ) -> Result<Option<CachedResponse>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT e.status, e.content_type, e.body
            FROM cache_entries e
            JOIN cache_buckets b ON b.id = e.bucket_id
            WHERE b.name = ?1 AND e.request_key = ?2
            ",
        )
        .bind(bucket.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_response).transpose()
    }

    async fn match_any(&self, key: &str) -> Result<Option<CachedResponse>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT e.status, e.content_type, e.body
            FROM cache_entries e
            JOIN cache_buckets b ON b.id = e.bucket_id
            WHERE e.request_key = ?1
            ORDER BY b.id
            LIMIT 1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_response).transpose()
    }

    async fn keys(&self, bucket: &CacheName) -> Result<Vec<String>, StorageError> {
        let bucket_id = self
            .bucket_id(bucket.as_str())
            .await?
            .ok_or(StorageError::NotFound)?;
        let rows = sqlx::query(
            "SELECT request_key FROM cache_entries WHERE bucket_id = ?1 ORDER BY request_key",
        )
        .bind(bucket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("request_key").map_err(ser))
            .collect()
    }
}
