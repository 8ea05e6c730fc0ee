//! Lambda entry points: one per marker endpoint.
//!
//! Each answers CORS preflight, refuses to run without configuration and
//! then hands the extracted inputs to the matching atoms handler.

use change_observer_atoms::markers::{
    add_marker_handler, delete_marker_handler, error_response, get_marker_handler,
    historical_images_handler, list_markers_handler, preflight_response, update_marker_handler,
};
use change_observer_atoms::table::TableBackend;
use change_observer_atoms::{DataService, Operation};
use lambda_http::{http::Method, Body, Error, Request, Response};

use crate::request::{body_bytes, marker_id, path_marker_id};
use crate::state::AppState;

/// Preflight or configuration failure short-circuits the request.
fn prepare<'a, B: TableBackend>(
    event: &Request,
    state: &'a AppState<B>,
    operation: Operation,
) -> Result<&'a DataService<B>, Result<Response<Body>, Error>> {
    tracing::info!(
        operation = operation.name(),
        method = %event.method(),
        path = event.uri().path(),
        "marker request"
    );
    if *event.method() == Method::OPTIONS {
        return Err(preflight_response());
    }
    state
        .service()
        .map_err(|e| error_response(operation, &e, state.error_status_mode()))
}

pub async fn list_markers<B: TableBackend>(
    event: Request,
    state: &AppState<B>,
) -> Result<Response<Body>, Error> {
    let service = match prepare(&event, state, Operation::ListMarkers) {
        Ok(service) => service,
        Err(resp) => return resp,
    };
    list_markers_handler(service, state.error_status_mode()).await
}

pub async fn get_marker<B: TableBackend>(
    event: Request,
    state: &AppState<B>,
) -> Result<Response<Body>, Error> {
    let service = match prepare(&event, state, Operation::GetMarker) {
        Ok(service) => service,
        Err(resp) => return resp,
    };
    let marker_id = marker_id(&event);
    get_marker_handler(service, marker_id.as_deref(), state.error_status_mode()).await
}

pub async fn add_marker<B: TableBackend>(
    event: Request,
    state: &AppState<B>,
) -> Result<Response<Body>, Error> {
    let service = match prepare(&event, state, Operation::AddMarker) {
        Ok(service) => service,
        Err(resp) => return resp,
    };
    add_marker_handler(service, body_bytes(event.body()), state.error_status_mode()).await
}

pub async fn update_marker<B: TableBackend>(
    event: Request,
    state: &AppState<B>,
) -> Result<Response<Body>, Error> {
    let service = match prepare(&event, state, Operation::UpdateMarker) {
        Ok(service) => service,
        Err(resp) => return resp,
    };
    let path_id = path_marker_id(event.uri().path());
    update_marker_handler(
        service,
        body_bytes(event.body()),
        path_id.as_deref(),
        state.error_status_mode(),
    )
    .await
}

pub async fn delete_marker<B: TableBackend>(
    event: Request,
    state: &AppState<B>,
) -> Result<Response<Body>, Error> {
    let service = match prepare(&event, state, Operation::DeleteMarker) {
        Ok(service) => service,
        Err(resp) => return resp,
    };
    let marker_id = marker_id(&event);
    delete_marker_handler(service, marker_id.as_deref(), state.error_status_mode()).await
}

pub async fn historical_images<B: TableBackend>(
    event: Request,
    state: &AppState<B>,
) -> Result<Response<Body>, Error> {
    let service = match prepare(&event, state, Operation::HistoricalImages) {
        Ok(service) => service,
        Err(resp) => return resp,
    };
    historical_images_handler(service, body_bytes(event.body()), state.error_status_mode()).await
}
