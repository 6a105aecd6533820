//! In-process log store.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::storage::{DatabaseInfo, NewOcrLog, OcrLog, Persistence, StorageError};

/// Rows kept before the oldest are evicted.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Bounded ring of recent OCR log rows.
pub struct MemoryPersistence {
    rows: RwLock<VecDeque<OcrLog>>,
    capacity: usize,
    closed: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for MemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn initialize(&self) -> Result<(), StorageError> {
        if self.is_closed() {
            return Err(StorageError::Closed);
        }
        tracing::info!(capacity = self.capacity, "Using in-memory OCR log store");
        Ok(())
    }

    fn info(&self) -> DatabaseInfo {
        DatabaseInfo {
            kind: "memory".to_string(),
            connected: !self.is_closed(),
            host: None,
            database: None,
            pool_size: None,
            idle_connections: None,
            max_connections: None,
        }
    }

    async fn record(&self, entry: NewOcrLog) -> Result<OcrLog, StorageError> {
        if self.is_closed() {
            return Err(StorageError::Closed);
        }

        let row = OcrLog::from_new(entry);
        let mut rows = self.rows.write().await;
        if rows.len() == self.capacity {
            rows.pop_front();
        }
        rows.push_back(row.clone());
        Ok(row)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<OcrLog>, StorageError> {
        if self.is_closed() {
            return Err(StorageError::Closed);
        }

        let rows = self.rows.read().await;
        Ok(rows.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
