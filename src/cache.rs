//! In-memory caching using moka
//!
//! Saved quotes are read far more often than they are edited (the print view
//! and the quote list both reload them), so they are kept in a bounded cache
//! and dropped whenever a quote is updated.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::quotation::models::QuoteRecord;

/// Application cache holding saved quotes
#[derive(Clone)]
pub struct QuoteCache {
    /// Saved quotes (id -> QuoteRecord)
    pub quotes: Cache<Uuid, Arc<QuoteRecord>>,
}

impl QuoteCache {
    /// Create a new cache instance with the given capacity and TTL
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            quotes: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .time_to_idle(ttl / 3)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            quotes_size: self.quotes.entry_count(),
        }
    }

    pub async fn get_quote(&self, id: &Uuid) -> Option<Arc<QuoteRecord>> {
        self.quotes.get(id).await
    }

    pub async fn store_quote(&self, record: QuoteRecord) -> Arc<QuoteRecord> {
        let record = Arc::new(record);
        self.quotes.insert(record.id, record.clone()).await;
        record
    }

    /// Invalidate a specific quote by id
    pub async fn invalidate_quote(&self, id: &Uuid) {
        self.quotes.invalidate(id).await;
        info!("Cache invalidated for quote: {}", id);
    }
}

impl Default for QuoteCache {
    /// 500 quotes, 30 min TTL
    fn default() -> Self {
        Self::new(500, Duration::from_secs(30 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub quotes_size: u64,
}
