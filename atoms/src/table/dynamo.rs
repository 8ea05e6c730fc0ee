use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::{Item, PutCondition, ScanPage, TableBackend, MARKER_ID_KEY};
use crate::error::{MarkerError, Result};

/// Markers table backed by DynamoDB.
///
/// The client is built once per cold start and reused for every invocation.
#[derive(Debug, Clone)]
pub struct DynamoTable {
    client: DynamoClient,
    table_name: String,
}

impl DynamoTable {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl TableBackend for DynamoTable {
    async fn scan_page(&self, exclusive_start_key: Option<Item>) -> Result<ScanPage> {
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(map_scan_error)?;

        Ok(ScanPage {
            items: result.items.unwrap_or_default(),
            last_evaluated_key: result.last_evaluated_key,
        })
    }

    async fn get_item(&self, marker_id: &str) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(MARKER_ID_KEY, AttributeValue::S(marker_id.to_string()))
            .send()
            .await
            .map_err(map_get_item_error)?;

        Ok(result.item)
    }

    async fn put_item(&self, item: Item, condition: PutCondition) -> Result<()> {
        let marker_id = item
            .get(MARKER_ID_KEY)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .unwrap_or_default();

        let mut builder = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item));

        if condition == PutCondition::MustExist {
            builder = builder.condition_expression(format!("attribute_exists({MARKER_ID_KEY})"));
        }

        builder
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &marker_id))?;

        Ok(())
    }

    async fn delete_item(&self, marker_id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(MARKER_ID_KEY, AttributeValue::S(marker_id.to_string()))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }
}

/// Timeouts and dispatch failures never reach the service error enums.
fn transport_failure<E, R>(err: &SdkError<E, R>, operation: &str) -> Option<MarkerError> {
    match err {
        SdkError::TimeoutError(_) => Some(MarkerError::Store(format!("{operation} timed out"))),
        SdkError::DispatchFailure(_) => Some(MarkerError::Store(format!(
            "{operation} could not reach DynamoDB"
        ))),
        _ => None,
    }
}

fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> MarkerError {
    if let Some(failure) = transport_failure(&err, "Scan") {
        return failure;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => {
            MarkerError::Store("Table not found".to_string())
        }
        ScanError::ProvisionedThroughputExceededException(_) => {
            MarkerError::Store("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            MarkerError::Store("Request limit exceeded, please retry".to_string())
        }
        err => MarkerError::Store(format!("Scan failed: {:?}", err)),
    }
}

fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> MarkerError {
    if let Some(failure) = transport_failure(&err, "GetItem") {
        return failure;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            MarkerError::Store("Table not found".to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            MarkerError::Store("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            MarkerError::Store("Request limit exceeded, please retry".to_string())
        }
        err => MarkerError::Store(format!("GetItem failed: {:?}", err)),
    }
}

fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    marker_id: &str,
) -> MarkerError {
    if let Some(failure) = transport_failure(&err, "PutItem") {
        return failure;
    }
    match err.into_service_error() {
        // Only conditional puts fail this way: the row vanished before the replace
        PutItemError::ConditionalCheckFailedException(_) => {
            MarkerError::NotFound(marker_id.to_string())
        }
        PutItemError::ResourceNotFoundException(_) => {
            MarkerError::Store("Table not found".to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            MarkerError::Store("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            MarkerError::Store("Request limit exceeded, please retry".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            MarkerError::Store("Transaction conflict, please retry".to_string())
        }
        err => MarkerError::Store(format!("PutItem failed: {:?}", err)),
    }
}

fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> MarkerError {
    if let Some(failure) = transport_failure(&err, "DeleteItem") {
        return failure;
    }
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => {
            MarkerError::Store("Table not found".to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            MarkerError::Store("Throughput exceeded, please retry".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            MarkerError::Store("Request limit exceeded, please retry".to_string())
        }
        err => MarkerError::Store(format!("DeleteItem failed: {:?}", err)),
    }
}
