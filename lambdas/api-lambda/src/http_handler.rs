use std::sync::Arc;

use change_observer_atoms::markers::{json_response, preflight_response};
use change_observer_atoms::table::TableBackend;
use change_observer_atoms::Operation;
use change_observer_shared::{handlers, AppState};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};

/// Why a request matched no operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RouteMiss {
    NotFound,
    MethodNotAllowed,
}

/// Resolve method and path to a marker operation.
///
/// `/marker/{id}` and `/markers/{id}` are interchangeable for the id-scoped
/// verbs; the web client uses both spellings.
pub(crate) fn route(method: &Method, path: &str) -> Result<Operation, RouteMiss> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["markers"] => match *method {
            Method::GET => Ok(Operation::ListMarkers),
            Method::POST => Ok(Operation::AddMarker),
            _ => Err(RouteMiss::MethodNotAllowed),
        },
        ["marker"] => match *method {
            Method::GET => Ok(Operation::GetMarker),
            Method::POST => Ok(Operation::AddMarker),
            Method::PUT => Ok(Operation::UpdateMarker),
            Method::DELETE => Ok(Operation::DeleteMarker),
            _ => Err(RouteMiss::MethodNotAllowed),
        },
        ["marker" | "markers", _] => match *method {
            Method::GET => Ok(Operation::GetMarker),
            Method::PUT => Ok(Operation::UpdateMarker),
            Method::DELETE => Ok(Operation::DeleteMarker),
            _ => Err(RouteMiss::MethodNotAllowed),
        },
        ["historical-images"] => match *method {
            Method::POST => Ok(Operation::HistoricalImages),
            _ => Err(RouteMiss::MethodNotAllowed),
        },
        _ => Err(RouteMiss::NotFound),
    }
}

/// Main Lambda handler - routes every marker endpoint
pub(crate) async fn function_handler<B: TableBackend>(
    event: Request,
    state: Arc<AppState<B>>,
) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    tracing::info!(%method, path = %path, "API Lambda invoked");

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return preflight_response();
    }

    let operation = match route(&method, &path) {
        Ok(operation) => operation,
        Err(RouteMiss::NotFound) => {
            tracing::warn!(%method, path = %path, "no route");
            return not_found();
        }
        Err(RouteMiss::MethodNotAllowed) => {
            tracing::warn!(%method, path = %path, "method not allowed");
            return method_not_allowed();
        }
    };

    match operation {
        Operation::ListMarkers => handlers::list_markers(event, &state).await,
        Operation::GetMarker => handlers::get_marker(event, &state).await,
        Operation::AddMarker => handlers::add_marker(event, &state).await,
        Operation::UpdateMarker => handlers::update_marker(event, &state).await,
        Operation::DeleteMarker => handlers::delete_marker(event, &state).await,
        Operation::HistoricalImages => handlers::historical_images(event, &state).await,
    }
}

fn not_found() -> Result<Response<Body>, Error> {
    json_response(StatusCode::NOT_FOUND, &serde_json::json!({"error": "Not found"}))
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &serde_json::json!({"error": "Method not allowed"}),
    )
}
