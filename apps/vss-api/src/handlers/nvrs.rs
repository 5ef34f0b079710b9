//! NVR handlers
//!
//! - GET /nvrs、GET /nvrs/{id}：任意已认证角色
//! - POST /nvrs、PUT /nvrs/{id}、DELETE /nvrs/{id}：仅 admin
//!
//! 仍挂有摄像头的 NVR 不能删除。

use crate::AppState;
use crate::middleware::require_access;
use crate::utils::response::inventory_error;
use crate::utils::{nvr_to_dto, parse_id};
use api_contract::{ApiResponse, CreateNvrRequest, NvrDto, UpdateNvrRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::access::{ADMIN_ONLY, ANY_ROLE};
use vss_inventory::{NewNvr, NvrChanges, NvrView};
use vss_storage::NvrRecord;

fn project_ref(value: Option<String>) -> Result<Option<String>, Response> {
    match value {
        Some(value) if !value.trim().is_empty() => parse_id(&value, "project").map(Some),
        other => Ok(other),
    }
}

async fn nvr_response(state: &AppState, status: StatusCode, nvr: NvrRecord) -> Response {
    match state.inventory.nvr_view(nvr).await {
        Ok(view) => view_response(status, view),
        Err(err) => inventory_error(err),
    }
}

fn view_response(status: StatusCode, view: NvrView) -> Response {
    (status, Json(ApiResponse::success(nvr_to_dto(view)))).into_response()
}

pub async fn list_nvrs(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_access(&state, &headers, ANY_ROLE) {
        return response;
    }
    match state.inventory.list_nvrs().await {
        Ok(views) => {
            let data: Vec<NvrDto> = views.into_iter().map(nvr_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn create_nvr(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateNvrRequest>,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let project = match project_ref(req.project) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let input = NewNvr {
        name: req.name,
        ip_address: req.ip_address,
        mac_address: req.mac_address,
        ip_address_secondary: req.ip_address_secondary,
        mac_address_secondary: req.mac_address_secondary,
        model: req.model,
        max_channels: req.max_channels,
        capacity: req.capacity,
        location: req.location,
        branch: req.branch,
        platform: req.platform,
        username: req.username,
        password: req.password,
        project,
    };
    match state.inventory.create_nvr(input, &ctx).await {
        Ok(nvr) => nvr_response(&state, StatusCode::CREATED, nvr).await,
        Err(err) => inventory_error(err),
    }
}

pub async fn get_nvr(
    State(state): State<AppState>,
    Path(nvr_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_access(&state, &headers, ANY_ROLE) {
        return response;
    }
    let nvr_id = match parse_id(&nvr_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.inventory.get_nvr(&nvr_id).await {
        Ok(view) => view_response(StatusCode::OK, view),
        Err(err) => inventory_error(err),
    }
}

/// 更新 NVR；`project` 为 null 表示移出项目
pub async fn update_nvr(
    State(state): State<AppState>,
    Path(nvr_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateNvrRequest>,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let nvr_id = match parse_id(&nvr_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let project = match req.project.map(project_ref).transpose() {
        Ok(value) => value,
        Err(response) => return response,
    };
    let changes = NvrChanges {
        name: req.name,
        ip_address: req.ip_address,
        mac_address: req.mac_address,
        ip_address_secondary: req.ip_address_secondary,
        mac_address_secondary: req.mac_address_secondary,
        model: req.model,
        max_channels: req.max_channels,
        capacity: req.capacity,
        location: req.location,
        branch: req.branch,
        platform: req.platform,
        username: req.username,
        password: req.password,
        project,
    };
    match state.inventory.update_nvr(&nvr_id, changes, &ctx).await {
        Ok(nvr) => nvr_response(&state, StatusCode::OK, nvr).await,
        Err(err) => inventory_error(err),
    }
}

pub async fn delete_nvr(
    State(state): State<AppState>,
    Path(nvr_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let nvr_id = match parse_id(&nvr_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.inventory.delete_nvr(&nvr_id, &ctx).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => inventory_error(err),
    }
}
