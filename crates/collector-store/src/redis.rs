//! Redis-compatible key-value backend.
//!
//! Each collector is one JSON value under `collector:{id}` with a 30-day
//! TTL, so records for abandoned collectors age out on their own. A
//! separate index set `collectors:index` enumerates live IDs for bulk
//! load; an index member whose record key has expired is pruned when
//! encountered.

use fred::prelude::*;
use uuid::Uuid;

use collector_types::Collector;

use crate::error::StorageError;
use crate::record::CollectorRecord;

/// Record TTL in seconds (30 days).
const RECORD_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Set holding the IDs of all stored collectors.
const INDEX_KEY: &str = "collectors:index";

fn record_key(id: Uuid) -> String {
    format!("collector:{id}")
}

/// Redis-backed collector store.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Connect to the store at the given URL.
    ///
    /// The URL follows the Redis URL scheme: `redis://host:port` or
    /// `redis://host:port/db`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectFailed`] if the URL cannot be
    /// parsed or the connection fails.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let config = Config::from_url(url)
            .map_err(|e| StorageError::ConnectFailed(format!("invalid Redis URL: {e}")))?;

        let client = Builder::from_config(config)
            .build()
            .map_err(StorageError::connect)?;
        client.init().await.map_err(StorageError::connect)?;

        tracing::info!("Connected to Redis");
        Ok(Self { client })
    }

    /// Upsert one collector record and refresh its TTL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WriteFailed`] if serialization or the
    /// write fails.
    pub async fn save_one(&self, collector: &Collector) -> Result<(), StorageError> {
        let record = CollectorRecord::from_collector(collector);
        let json = serde_json::to_string(&record).map_err(StorageError::write)?;
        let key = record_key(record.id);

        let _: () = self
            .client
            .set(
                key.as_str(),
                json.as_str(),
                Some(Expiration::EX(RECORD_TTL_SECS)),
                None,
                false,
            )
            .await
            .map_err(StorageError::write)?;
        let _: () = self
            .client
            .sadd(INDEX_KEY, record.id.to_string())
            .await
            .map_err(StorageError::write)?;

        tracing::debug!(id = %record.id, "Saved collector record");
        Ok(())
    }

    /// Replace all stored records with the given collectors.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the index cannot be read or a write
    /// fails.
    pub async fn save_all(&self, collectors: &[Collector]) -> Result<(), StorageError> {
        // Drop records no longer present before rewriting the index.
        let existing: Vec<String> = self
            .client
            .smembers(INDEX_KEY)
            .await
            .map_err(StorageError::read)?;
        for id in existing {
            let _: u32 = self
                .client
                .del(format!("collector:{id}").as_str())
                .await
                .map_err(StorageError::write)?;
        }
        let _: u32 = self
            .client
            .del(INDEX_KEY)
            .await
            .map_err(StorageError::write)?;

        for collector in collectors {
            self.save_one(collector).await?;
        }
        tracing::debug!(count = collectors.len(), "Saved all collector records");
        Ok(())
    }

    /// Load all collectors, pruning expired index members and skipping
    /// records that fail to decode.
    ///
    /// The stored pending map is intentionally not restored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadFailed`] if the index or a record read
    /// fails at the transport level.
    pub async fn load_all(&self) -> Result<Vec<Collector>, StorageError> {
        let ids: Vec<String> = self
            .client
            .smembers(INDEX_KEY)
            .await
            .map_err(StorageError::read)?;

        let mut collectors = Vec::with_capacity(ids.len());
        for id in ids {
            let key = format!("collector:{id}");
            let value: Option<String> = self
                .client
                .get(key.as_str())
                .await
                .map_err(StorageError::read)?;

            let Some(json) = value else {
                // Record expired; drop the stale index member.
                tracing::debug!(id, "Pruning expired collector from index");
                let _: u32 = self
                    .client
                    .srem(INDEX_KEY, id.as_str())
                    .await
                    .map_err(StorageError::write)?;
                continue;
            };

            match serde_json::from_str::<CollectorRecord>(&json) {
                Ok(record) => collectors.push(record.into_collector()),
                Err(err) => {
                    tracing::warn!(id, error = %err, "Skipping corrupt collector record");
                }
            }
        }
        Ok(collectors)
    }

    /// Delete one record. Returns whether a record key was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WriteFailed`] if a delete fails.
    pub async fn delete_one(&self, id: Uuid) -> Result<bool, StorageError> {
        let removed: u32 = self
            .client
            .del(record_key(id).as_str())
            .await
            .map_err(StorageError::write)?;
        let _: u32 = self
            .client
            .srem(INDEX_KEY, id.to_string())
            .await
            .map_err(StorageError::write)?;
        Ok(removed > 0)
    }

    /// Whether the client connection is up.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Close the connection. Idempotent; a failed quit is logged, not
    /// surfaced.
    pub async fn shutdown(&self) {
        if let Err(err) = self.client.quit().await {
            tracing::warn!(error = %err, "Redis quit failed");
        } else {
            tracing::info!("Redis connection closed");
        }
    }
}
