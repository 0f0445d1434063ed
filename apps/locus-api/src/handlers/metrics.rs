//! Telemetry 指标快照。
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use locus_telemetry::metrics;

use crate::AppState;
use crate::middleware::require_operator;

pub async fn get_metrics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_operator(&state, &headers) {
        return response;
    }

    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            devices_stored: snapshot.devices_stored,
            locations_stored: snapshot.locations_stored,
            ingest_rejected: snapshot.ingest_rejected,
            store_failures: snapshot.store_failures,
            device_lists_served: snapshot.device_lists_served,
        })),
    )
        .into_response()
}
