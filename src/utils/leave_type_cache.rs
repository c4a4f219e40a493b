use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use sqlx::MySqlPool;
use std::time::Duration;

/// leave_code => leave_description
#[derive(Clone)]
pub struct LeaveTypeCache {
    inner: Cache<String, String>,
}

impl LeaveTypeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(10_000) // leave catalogs are small
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, leave_code: &str) -> Option<String> {
        self.inner.get(leave_code).await
    }

    pub async fn insert(&self, leave_code: &str, description: &str) {
        self.inner
            .insert(leave_code.to_string(), description.to_string())
            .await;
    }

    /// Codes can be renamed by an update, so any catalog edit drops everything.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Batch insert descriptions
    async fn batch_insert(&self, entries: &[(String, String)]) {
        let futures: Vec<_> = entries
            .iter()
            .map(|(code, description)| self.inner.insert(code.clone(), description.clone()))
            .collect();

        futures::future::join_all(futures).await;
    }

    /// Stream `leave_table` into the cache in batches
    pub async fn warmup(&self, pool: &MySqlPool, batch_size: usize) -> Result<usize> {
        let mut stream = sqlx::query_as::<_, (String, String)>(
            "SELECT leave_code, leave_description FROM leave_table ORDER BY id",
        )
        .fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0usize;

        while let Some(row) = stream.next().await {
            batch.push(row?);
            total += 1;

            if batch.len() >= batch_size {
                self.batch_insert(&batch).await;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.batch_insert(&batch).await;
        }

        tracing::info!(total, "Leave type cache warmup complete");

        Ok(total)
    }
}
