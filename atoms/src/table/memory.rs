//! In-memory markers table for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{marker_key, Item, PutCondition, ScanPage, TableBackend, MARKER_ID_KEY};
use crate::error::{MarkerError, Result};

/// Scans return rows in `markerId` order, `page_size` rows at a time, so
/// continuation handling can be exercised without DynamoDB.
#[derive(Debug, Clone)]
pub struct InMemoryTable {
    rows: Arc<RwLock<BTreeMap<String, Item>>>,
    page_size: usize,
    scan_calls: Arc<AtomicUsize>,
}

impl Default for InMemoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self::with_page_size(usize::MAX)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: page_size.max(1),
            scan_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Raw stored row, bypassing the data service.
    pub async fn raw_item(&self, marker_id: &str) -> Option<Item> {
        self.rows.read().await.get(marker_id).cloned()
    }

    /// Store a row as-is, e.g. one written by an older deployment.
    pub async fn insert_raw(&self, item: Item) -> Result<()> {
        let marker_id = row_id(&item)?;
        self.rows.write().await.insert(marker_id, item);
        Ok(())
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }
}

fn row_id(item: &Item) -> Result<String> {
    item.get(MARKER_ID_KEY)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| MarkerError::Store("item is missing its markerId key".to_string()))
}

#[async_trait]
impl TableBackend for InMemoryTable {
    async fn scan_page(&self, exclusive_start_key: Option<Item>) -> Result<ScanPage> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.read().await;

        let after = match exclusive_start_key {
            Some(key) => Some(row_id(&key)?),
            None => None,
        };
        let mut remaining = rows
            .iter()
            .filter(|(id, _)| after.as_ref().map_or(true, |start| *id > start))
            .peekable();

        let mut items = Vec::new();
        let mut last_id = None;
        while items.len() < self.page_size {
            match remaining.next() {
                Some((id, item)) => {
                    items.push(item.clone());
                    last_id = Some(id.clone());
                }
                None => break,
            }
        }

        let last_evaluated_key = match (remaining.peek(), last_id) {
            (Some(_), Some(id)) => Some(marker_key(&id)),
            _ => None,
        };

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }

    async fn get_item(&self, marker_id: &str) -> Result<Option<Item>> {
        Ok(self.rows.read().await.get(marker_id).cloned())
    }

    async fn put_item(&self, item: Item, condition: PutCondition) -> Result<()> {
        let marker_id = row_id(&item)?;
        let mut rows = self.rows.write().await;
        if condition == PutCondition::MustExist && !rows.contains_key(&marker_id) {
            return Err(MarkerError::NotFound(marker_id));
        }
        rows.insert(marker_id, item);
        Ok(())
    }

    async fn delete_item(&self, marker_id: &str) -> Result<()> {
        self.rows.write().await.remove(marker_id);
        Ok(())
    }
}
