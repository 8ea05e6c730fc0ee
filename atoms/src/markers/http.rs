use std::str::FromStr;

use lambda_http::http::header::{HeaderValue, CONTENT_TYPE};
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;
use serde_json::json;

use super::model::{HistoricalImagesPayload, LocationMarker};
use super::service::DataService;
use crate::error::MarkerError;
use crate::table::TableBackend;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

/// How failures are turned into status codes.
///
/// `Legacy` keeps the codes deployed clients already see: get, update and
/// delete answer 500 for a missing id or an unknown marker. `Strict` answers
/// 400 / 404 / 500 uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatusMode {
    #[default]
    Legacy,
    Strict,
}

impl FromStr for ErrorStatusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(ErrorStatusMode::Legacy),
            "strict" => Ok(ErrorStatusMode::Strict),
            other => Err(format!("unknown error status mode: {other}")),
        }
    }
}

/// The six marker endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListMarkers,
    GetMarker,
    AddMarker,
    UpdateMarker,
    DeleteMarker,
    HistoricalImages,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::ListMarkers => "list_markers",
            Operation::GetMarker => "get_marker",
            Operation::AddMarker => "add_marker",
            Operation::UpdateMarker => "update_marker",
            Operation::DeleteMarker => "delete_marker",
            Operation::HistoricalImages => "historical_images",
        }
    }

    /// Client-facing message; the detailed cause only goes to the log.
    fn failure_message(self, err: &MarkerError) -> &'static str {
        match (self, err) {
            (_, MarkerError::Config(_)) => "Server configuration error.",
            (_, MarkerError::Decode(_)) => "Invalid request body.",
            (Operation::GetMarker | Operation::DeleteMarker, MarkerError::Validation(_)) => {
                "Failed to retrieve markerId."
            }
            (Operation::HistoricalImages, MarkerError::Validation(_)) => "markerId is required.",
            (Operation::HistoricalImages, MarkerError::NotFound(_)) => "Location marker not found.",
            (Operation::ListMarkers, _) => "Failed to retrieve markers.",
            (Operation::GetMarker, _) => "Failed to retrieve marker.",
            (Operation::AddMarker, _) => "Failed to add marker to DynamoDB.",
            (Operation::UpdateMarker, _) => "Failed to update marker and upload to DynamoDB.",
            (Operation::DeleteMarker, _) => "Failed to delete marker.",
            (Operation::HistoricalImages, _) => "Failed to retrieve historical images.",
        }
    }
}

/// Status code for a failed operation under the given mode
pub fn status_for(operation: Operation, err: &MarkerError, mode: ErrorStatusMode) -> StatusCode {
    let strict = match err {
        MarkerError::Decode(_) | MarkerError::Validation(_) => StatusCode::BAD_REQUEST,
        MarkerError::NotFound(_) => StatusCode::NOT_FOUND,
        MarkerError::Store(_) | MarkerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    match (mode, operation, err) {
        (ErrorStatusMode::Strict, _, _) => strict,
        (
            ErrorStatusMode::Legacy,
            Operation::GetMarker | Operation::UpdateMarker | Operation::DeleteMarker,
            MarkerError::Validation(_) | MarkerError::NotFound(_),
        ) => StatusCode::INTERNAL_SERVER_ERROR,
        (ErrorStatusMode::Legacy, _, _) => strict,
    }
}

pub fn with_cors_headers(mut resp: Response<Body>) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    resp
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    let resp = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(serde_json::to_string(body)?.into())
        .map_err(Box::new)?;
    Ok(with_cors_headers(resp))
}

/// Answer to a CORS preflight request
pub fn preflight_response() -> Result<Response<Body>, Error> {
    let resp = Response::builder()
        .status(StatusCode::OK)
        .body(Body::Empty)
        .map_err(Box::new)?;
    Ok(with_cors_headers(resp))
}

/// Log the failure in full and answer with a generic `{"error": ...}` body
pub fn error_response(
    operation: Operation,
    err: &MarkerError,
    mode: ErrorStatusMode,
) -> Result<Response<Body>, Error> {
    let status = status_for(operation, err, mode);
    if status.is_server_error() {
        tracing::error!(
            operation = operation.name(),
            status = status.as_u16(),
            error = %err,
            "request failed"
        );
    } else {
        tracing::warn!(
            operation = operation.name(),
            status = status.as_u16(),
            error = %err,
            "request rejected"
        );
    }
    json_response(status, &json!({"error": operation.failure_message(err)}))
}

fn required_id(marker_id: Option<&str>) -> Result<&str, MarkerError> {
    marker_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| MarkerError::Validation("markerId is missing".to_string()))
}

/// HTTP Handler: GET /markers
pub async fn list_markers_handler<B: TableBackend>(
    service: &DataService<B>,
    mode: ErrorStatusMode,
) -> Result<Response<Body>, Error> {
    match service.list_markers().await {
        Ok(markers) => {
            tracing::info!(count = markers.len(), "markers listed");
            json_response(StatusCode::OK, &json!({ "markers": markers }))
        }
        Err(e) => error_response(Operation::ListMarkers, &e, mode),
    }
}

/// HTTP Handler: GET /marker?markerId={id}
pub async fn get_marker_handler<B: TableBackend>(
    service: &DataService<B>,
    marker_id: Option<&str>,
    mode: ErrorStatusMode,
) -> Result<Response<Body>, Error> {
    let marker_id = match required_id(marker_id) {
        Ok(id) => id,
        Err(e) => return error_response(Operation::GetMarker, &e, mode),
    };

    match service.get_marker(marker_id).await {
        Ok(marker) => json_response(StatusCode::OK, &marker),
        Err(e) => error_response(Operation::GetMarker, &e, mode),
    }
}

/// HTTP Handler: POST /markers
pub async fn add_marker_handler<B: TableBackend>(
    service: &DataService<B>,
    body: &[u8],
    mode: ErrorStatusMode,
) -> Result<Response<Body>, Error> {
    let marker = match LocationMarker::from_slice(body) {
        Ok(marker) => marker,
        Err(e) => return error_response(Operation::AddMarker, &e, mode),
    };

    match service.add_marker(marker).await {
        Ok(saved) => json_response(
            StatusCode::CREATED,
            &json!({"message": "Marker added successfully", "marker": saved}),
        ),
        Err(e) => error_response(Operation::AddMarker, &e, mode),
    }
}

/// HTTP Handler: PUT /marker
///
/// An id in the path fills in for a body that omits `markerId`.
pub async fn update_marker_handler<B: TableBackend>(
    service: &DataService<B>,
    body: &[u8],
    path_marker_id: Option<&str>,
    mode: ErrorStatusMode,
) -> Result<Response<Body>, Error> {
    let mut marker = match LocationMarker::from_slice(body) {
        Ok(marker) => marker,
        Err(e) => return error_response(Operation::UpdateMarker, &e, mode),
    };
    if marker.marker_id().map_or(true, str::is_empty) {
        if let Some(id) = path_marker_id.filter(|id| !id.is_empty()) {
            marker.set_marker_id(id);
        }
    }

    match service.update_marker(marker).await {
        Ok(_) => json_response(
            StatusCode::CREATED,
            &json!({"message": "Marker updated successfully"}),
        ),
        Err(e) => error_response(Operation::UpdateMarker, &e, mode),
    }
}

/// HTTP Handler: DELETE /marker?markerId={id}
pub async fn delete_marker_handler<B: TableBackend>(
    service: &DataService<B>,
    marker_id: Option<&str>,
    mode: ErrorStatusMode,
) -> Result<Response<Body>, Error> {
    let marker_id = match required_id(marker_id) {
        Ok(id) => id,
        Err(e) => return error_response(Operation::DeleteMarker, &e, mode),
    };

    match service.delete_marker(marker_id).await {
        Ok(()) => json_response(
            StatusCode::CREATED,
            &json!({"message": "Marker deleted successfully"}),
        ),
        Err(e) => error_response(Operation::DeleteMarker, &e, mode),
    }
}

/// HTTP Handler: POST /historical-images
pub async fn historical_images_handler<B: TableBackend>(
    service: &DataService<B>,
    body: &[u8],
    mode: ErrorStatusMode,
) -> Result<Response<Body>, Error> {
    let payload: HistoricalImagesPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(Operation::HistoricalImages, &MarkerError::from(e), mode),
    };
    let marker_id = match required_id(payload.marker_id.as_deref()) {
        Ok(id) => id,
        Err(e) => return error_response(Operation::HistoricalImages, &e, mode),
    };

    match service.historical_images(marker_id).await {
        Ok(history) if history.historical_images.is_empty() => {
            tracing::info!(marker_id, "No historical images found");
            json_response(
                StatusCode::NOT_FOUND,
                &json!({"error": "Historical images unavailable."}),
            )
        }
        Ok(history) => json_response(StatusCode::OK, &history),
        Err(e) => error_response(Operation::HistoricalImages, &e, mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::media::Image;
    use crate::table::{InMemoryTable, MockTableBackend};
    use serde_json::Value;

    const LEGACY: ErrorStatusMode = ErrorStatusMode::Legacy;
    const STRICT: ErrorStatusMode = ErrorStatusMode::Strict;

    fn body_json(resp: &Response<Body>) -> Value {
        serde_json::from_slice(resp.body().as_ref()).unwrap()
    }

    fn failing_service() -> DataService<MockTableBackend> {
        let mut backend = MockTableBackend::new();
        backend
            .expect_scan_page()
            .returning(|_| Err(MarkerError::Store("Scan timed out".into())));
        backend
            .expect_get_item()
            .returning(|_| Err(MarkerError::Store("GetItem timed out".into())));
        backend
            .expect_put_item()
            .returning(|_, _| Err(MarkerError::Store("PutItem timed out".into())));
        backend
            .expect_delete_item()
            .returning(|_| Err(MarkerError::Store("DeleteItem timed out".into())));
        DataService::new(backend)
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("strict".parse::<ErrorStatusMode>(), Ok(STRICT));
        assert_eq!(" Legacy ".parse::<ErrorStatusMode>(), Ok(LEGACY));
        assert!("lenient".parse::<ErrorStatusMode>().is_err());
    }

    #[test]
    fn test_legacy_conflates_client_errors_for_get_update_delete() {
        let not_found = MarkerError::NotFound("x".into());
        let missing = MarkerError::Validation("markerId is missing".into());
        for op in [Operation::GetMarker, Operation::UpdateMarker, Operation::DeleteMarker] {
            assert_eq!(status_for(op, &not_found, LEGACY), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(status_for(op, &missing, LEGACY), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(status_for(op, &not_found, STRICT), StatusCode::NOT_FOUND);
            assert_eq!(status_for(op, &missing, STRICT), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_decode_is_always_bad_request() {
        let err = MarkerError::Decode("eof".into());
        for mode in [LEGACY, STRICT] {
            assert_eq!(status_for(Operation::AddMarker, &err, mode), StatusCode::BAD_REQUEST);
            assert_eq!(status_for(Operation::UpdateMarker, &err, mode), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_historical_images_distinguishes_codes_in_legacy() {
        let op = Operation::HistoricalImages;
        assert_eq!(
            status_for(op, &MarkerError::Validation("x".into()), LEGACY),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(op, &MarkerError::NotFound("x".into()), LEGACY),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(op, &MarkerError::Store("x".into()), LEGACY),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_hides_detail() {
        let err = MarkerError::Store("arn:aws:dynamodb:secret-table throttled".into());
        let resp = error_response(Operation::ListMarkers, &err, LEGACY).unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&resp), json!({"error": "Failed to retrieve markers."}));
    }

    #[test]
    fn test_preflight_has_cors() {
        let resp = preflight_response().unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(resp.headers()["Access-Control-Allow-Methods"], CORS_ALLOW_METHODS);
        assert_eq!(resp.headers()["Access-Control-Allow-Headers"], "Content-Type");
    }

    #[tokio::test]
    async fn test_add_bench_scenario() {
        let service = DataService::new(InMemoryTable::new());
        let body = br#"{"name":"Bench","coordinate":{"latitude":"1.0","longitude":"2.0"}}"#;

        let resp = add_marker_handler(&service, body, LEGACY).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        let json = body_json(&resp);
        assert_eq!(json["message"], "Marker added successfully");
        assert_eq!(json["marker"]["markerId"].as_str().unwrap().len(), 36);
        assert_eq!(json["marker"]["status"], "created");
        assert_eq!(json["marker"]["name"], "Bench");
    }

    #[tokio::test]
    async fn test_add_rejects_malformed_body() {
        let service = DataService::new(InMemoryTable::new());
        let resp = add_marker_handler(&service, b"{\"coordinate\": 7}", LEGACY)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&resp), json!({"error": "Invalid request body."}));
        assert!(service.backend().is_empty().await);
    }

    #[tokio::test]
    async fn test_list_wraps_markers() {
        let service = DataService::new(InMemoryTable::new());
        service
            .add_marker(LocationMarker::new(Coordinate::new("2.0", "1.0")))
            .await
            .unwrap();

        let resp = list_markers_handler(&service, LEGACY).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(&resp)["markers"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_id_codes() {
        let service = DataService::new(InMemoryTable::new());
        let legacy = get_marker_handler(&service, None, LEGACY).await.unwrap();
        assert_eq!(legacy.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&legacy), json!({"error": "Failed to retrieve markerId."}));

        let strict = get_marker_handler(&service, Some(""), STRICT).await.unwrap();
        assert_eq!(strict.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_unknown_codes() {
        let service = DataService::new(InMemoryTable::new());
        let legacy = get_marker_handler(&service, Some("nope"), LEGACY).await.unwrap();
        assert_eq!(legacy.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let strict = get_marker_handler(&service, Some("nope"), STRICT).await.unwrap();
        assert_eq!(strict.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_unknown_marker() {
        let service = DataService::new(InMemoryTable::new());
        let body = br#"{"markerId":"ghost","name":"Bench"}"#;

        let resp = update_marker_handler(&service, body, None, LEGACY).await.unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&resp),
            json!({"error": "Failed to update marker and upload to DynamoDB."})
        );
        assert!(service.backend().is_empty().await);
    }

    #[tokio::test]
    async fn test_update_takes_id_from_path() {
        let service = DataService::new(InMemoryTable::new());
        let created = service
            .add_marker(LocationMarker::new(Coordinate::default()))
            .await
            .unwrap();
        let id = created.marker_id().unwrap().to_string();

        let resp = update_marker_handler(&service, br#"{"status":"resolved"}"#, Some(&id), LEGACY)
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(&resp), json!({"message": "Marker updated successfully"}));
        assert_eq!(service.get_marker(&id).await.unwrap().status, "resolved");
    }

    #[tokio::test]
    async fn test_delete_twice_succeeds() {
        let service = DataService::new(InMemoryTable::new());
        for _ in 0..2 {
            let resp = delete_marker_handler(&service, Some("whatever"), LEGACY)
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
            assert_eq!(body_json(&resp), json!({"message": "Marker deleted successfully"}));
        }
    }

    #[tokio::test]
    async fn test_historical_images_flow() {
        let service = DataService::new(InMemoryTable::new());
        let mut marker = LocationMarker::new(Coordinate::default());
        marker.add_image_to_history(Image::new("2024-01-01", "u1", "k1", "b"));
        let with_history = service.add_marker(marker).await.unwrap();
        let without = service
            .add_marker(LocationMarker::new(Coordinate::default()))
            .await
            .unwrap();

        let ok_body = json!({"markerId": with_history.marker_id()}).to_string();
        let resp = historical_images_handler(&service, ok_body.as_bytes(), LEGACY)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(&resp);
        assert_eq!(json["markerId"], with_history.marker_id().unwrap());
        assert_eq!(json["historicalImages"][0]["imageURL"], "u1");

        let empty_body = json!({"markerId": without.marker_id()}).to_string();
        let resp = historical_images_handler(&service, empty_body.as_bytes(), LEGACY)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(&resp), json!({"error": "Historical images unavailable."}));

        let resp = historical_images_handler(&service, br#"{"markerId":"nope"}"#, LEGACY)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = historical_images_handler(&service, b"{}", LEGACY).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&resp), json!({"error": "markerId is required."}));
    }

    #[tokio::test]
    async fn test_store_failures_are_500_everywhere() {
        let service = failing_service();
        for mode in [LEGACY, STRICT] {
            let resps = vec![
                list_markers_handler(&service, mode).await.unwrap(),
                get_marker_handler(&service, Some("m"), mode).await.unwrap(),
                add_marker_handler(&service, b"{}", mode).await.unwrap(),
                update_marker_handler(&service, br#"{"markerId":"m"}"#, None, mode)
                    .await
                    .unwrap(),
                delete_marker_handler(&service, Some("m"), mode).await.unwrap(),
                historical_images_handler(&service, br#"{"markerId":"m"}"#, mode)
                    .await
                    .unwrap(),
            ];
            for resp in resps {
                assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
            }
        }
    }
}
