//! Pulling marker inputs out of API Gateway requests.

use lambda_http::{Body, Request, RequestExt};

pub const MARKER_ID_PARAM: &str = "markerId";

const EMPTY_OBJECT: &[u8] = b"{}";

/// `markerId` from the query string, a `{markerId}` path parameter, or a
/// trailing `/marker/{id}` / `/markers/{id}` path segment, in that order.
pub fn marker_id(event: &Request) -> Option<String> {
    let from_query = event
        .query_string_parameters_ref()
        .and_then(|params| params.first(MARKER_ID_PARAM))
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    from_query
        .or_else(|| {
            event
                .path_parameters_ref()
                .and_then(|params| params.first(MARKER_ID_PARAM))
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        })
        .or_else(|| path_marker_id(event.uri().path()))
}

/// Id carried as the segment after `marker` or `markers`.
pub fn path_marker_id(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., "marker" | "markers", id] => Some((*id).to_string()),
        _ => None,
    }
}

/// Request body bytes; an absent body reads as an empty JSON object.
pub fn body_bytes(body: &Body) -> &[u8] {
    match body {
        Body::Empty => EMPTY_OBJECT,
        Body::Text(text) if text.trim().is_empty() => EMPTY_OBJECT,
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) if bytes.is_empty() => EMPTY_OBJECT,
        Body::Binary(bytes) => bytes,
    }
}
