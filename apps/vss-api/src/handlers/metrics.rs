//! 库存计数指标快照。
//!
//! - GET /metrics（仅 admin）

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::access::ADMIN_ONLY;
use vss_telemetry::metrics;

use crate::{AppState, middleware::require_access};

pub async fn get_metrics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_access(&state, &headers, ADMIN_ONLY) {
        return response;
    }

    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            cameras_created: snapshot.cameras_created,
            reassignments: snapshot.reassignments,
            reassignments_rejected: snapshot.reassignments_rejected,
            change_log_entries: snapshot.change_log_entries,
            import_rows_imported: snapshot.import_rows_imported,
            import_rows_skipped: snapshot.import_rows_skipped,
            compensations: snapshot.compensations,
            compensation_failures: snapshot.compensation_failures,
        })),
    )
        .into_response()
}
