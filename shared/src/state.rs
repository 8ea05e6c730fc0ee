use aws_sdk_dynamodb::Client as DynamoClient;
use change_observer_atoms::table::{DynamoTable, TableBackend};
use change_observer_atoms::{DataService, ErrorStatusMode, MarkerError};

use crate::config::{Config, ConfigError};

/// Per-cold-start state handed to every invocation.
///
/// A missing table name does not abort start-up: each request answers 500
/// instead, before any store call is made.
pub struct AppState<B> {
    service: Result<DataService<B>, ConfigError>,
    error_status_mode: ErrorStatusMode,
}

impl AppState<DynamoTable> {
    /// Load AWS config and environment, reusing one DynamoDB client for all invocations.
    pub async fn from_env() -> Self {
        let config = Config::from_env();
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = DynamoClient::new(&aws_config);
        Self::from_config(&config, |table_name| DynamoTable::new(client, table_name))
    }
}

impl<B: TableBackend> AppState<B> {
    pub fn from_config(config: &Config, build_backend: impl FnOnce(&str) -> B) -> Self {
        let service = match config.table_name() {
            Ok(table_name) => {
                tracing::info!(
                    table_name,
                    mode = ?config.error_status_mode,
                    "marker service configured"
                );
                Ok(DataService::new(build_backend(table_name)))
            }
            Err(e) => {
                tracing::error!(error = %e, "marker service is not configured");
                Err(e)
            }
        };

        Self {
            service,
            error_status_mode: config.error_status_mode,
        }
    }

    pub fn service(&self) -> Result<&DataService<B>, MarkerError> {
        self.service
            .as_ref()
            .map_err(|e| MarkerError::Config(e.to_string()))
    }

    pub fn error_status_mode(&self) -> ErrorStatusMode {
        self.error_status_mode
    }
}
