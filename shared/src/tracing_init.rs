//! JSON logging for the marker Lambdas.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Marker crates at `info`; the AWS SDK and its HTTP stack only above `warn`.
const DEFAULT_DIRECTIVES: &str =
    "info,aws_config=warn,aws_smithy_runtime=warn,aws_sdk_dynamodb=warn,hyper=warn";

/// Filter from a `RUST_LOG` value, or the marker defaults when it is unset or invalid.
fn marker_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the JSON subscriber. Call once per cold start, before `lambda_http::run`.
pub fn init_tracing() {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = marker_filter(rust_log.as_deref());

    // Lambda already stamps each line with time and request id
    let fmt_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(false)
        .without_time()
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!(
        function = std::env::var("AWS_LAMBDA_FUNCTION_NAME").as_deref().unwrap_or("local"),
        "cold start"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quiets_sdk() {
        let filter = marker_filter(None).to_string();
        assert!(filter.contains("aws_smithy_runtime=warn"));
        assert!(filter.contains("info"));
    }

    #[test]
    fn test_rust_log_overrides_default() {
        let filter = marker_filter(Some("debug")).to_string();
        assert!(filter.contains("debug"));
        assert!(!filter.contains("aws_config"));
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        let filter = marker_filter(Some("change_observer=loud")).to_string();
        assert!(filter.contains("aws_config=warn"));
    }
}
