//! Storage seam for the markers table.
//!
//! [`TableBackend`] has one method per DynamoDB call the data service makes,
//! keyed by `markerId`. Id generation and timestamp preservation live in
//! [`crate::markers::DataService`].

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::Result;

pub mod conversions;
pub mod dynamo;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use dynamo::DynamoTable;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryTable;

/// Partition key of the markers table.
pub const MARKER_ID_KEY: &str = "markerId";

/// One stored row.
pub type Item = HashMap<String, AttributeValue>;

/// A single page of a table scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Present when more rows remain; pass it back to continue the scan.
    pub last_evaluated_key: Option<Item>,
}

/// Precondition applied to a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutCondition {
    /// Unconditional write (create or overwrite).
    Always,
    /// Only replace a row that already exists; otherwise `NotFound`.
    MustExist,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableBackend: Send + Sync {
    async fn scan_page(&self, exclusive_start_key: Option<Item>) -> Result<ScanPage>;

    async fn get_item(&self, marker_id: &str) -> Result<Option<Item>>;

    async fn put_item(&self, item: Item, condition: PutCondition) -> Result<()>;

    /// Deleting a missing row succeeds.
    async fn delete_item(&self, marker_id: &str) -> Result<()>;
}

/// Key map addressing a single marker row.
pub fn marker_key(marker_id: &str) -> Item {
    HashMap::from([(
        MARKER_ID_KEY.to_string(),
        AttributeValue::S(marker_id.to_string()),
    )])
}
