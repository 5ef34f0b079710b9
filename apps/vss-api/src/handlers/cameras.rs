//! 摄像头 handlers
//!
//! - POST /cameras、PATCH /cameras/{id}、PUT /cameras/{id}/assign/{nvrId}：admin/junior
//! - GET /cameras、/cameras/{id}、/cameras/{id}/history、/cameras/{id}/changes：所有角色
//! - DELETE /cameras/{id}、POST /cameras/import：仅 admin
//!
//! 关联一致性、容量校验与变更审计都在 `InventoryService` 中完成，这里只做
//! 认证、参数转换与错误映射。

use crate::AppState;
use crate::middleware::require_access;
use crate::utils::response::{bad_request_error, inventory_error};
use crate::utils::{camera_to_dto, change_to_dto, history_to_dto, import_to_dto, parse_id};
use api_contract::{
    ApiResponse, CameraDto, ChangeLogEntryDto, CreateCameraRequest, UpdateCameraRequest,
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::access::{ADMIN_ONLY, READERS, WRITERS};
use vss_inventory::{CameraChanges, CameraView, InventoryError, NewCamera};

/// 导入文件所在的表单字段名
const IMPORT_FIELD: &str = "file";

fn camera_response(status: StatusCode, view: CameraView) -> Response {
    (status, Json(ApiResponse::success(camera_to_dto(view)))).into_response()
}

/// 可选的关联 ID 必须为 UUID；空串保留给服务层按"解除关联"处理
fn optional_ref(value: Option<String>, field: &str) -> Result<Option<String>, Response> {
    match value {
        Some(value) if !value.trim().is_empty() => parse_id(&value, field).map(Some),
        other => Ok(other),
    }
}

fn nullable_ref(
    value: Option<Option<String>>,
    field: &str,
) -> Result<Option<Option<String>>, Response> {
    value.map(|inner| optional_ref(inner, field)).transpose()
}

pub async fn list_cameras(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_access(&state, &headers, READERS) {
        return response;
    }
    match state.inventory.list_cameras().await {
        Ok(views) => {
            let data: Vec<CameraDto> = views.into_iter().map(camera_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

/// 创建摄像头；给定 `nvr` 时按容量规则挂载
pub async fn create_camera(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateCameraRequest>,
) -> Response {
    let ctx = match require_access(&state, &headers, WRITERS) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let nvr = match optional_ref(req.nvr, "nvr") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let project = match optional_ref(req.project, "project") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let input = NewCamera {
        name: req.name,
        model: req.model,
        ip_address: req.ip_address,
        location: req.location,
        mac_address: req.mac_address,
        serial_number: req.serial_number,
        username: req.username,
        password: req.password,
        firmware: req.firmware,
        resolution: req.resolution,
        fps: req.fps,
        nvr,
        project,
    };
    let created = match state.inventory.create_camera(input, &ctx).await {
        Ok(camera) => camera,
        Err(err) => return inventory_error(err),
    };
    match state.inventory.camera_view(created).await {
        Ok(view) => camera_response(StatusCode::CREATED, view),
        Err(err) => inventory_error(err),
    }
}

pub async fn get_camera(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_access(&state, &headers, READERS) {
        return response;
    }
    let camera_id = match parse_id(&camera_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.inventory.get_camera(&camera_id).await {
        Ok(view) => camera_response(StatusCode::OK, view),
        Err(err) => inventory_error(err),
    }
}

/// 部分更新摄像头；`nvr`/`project` 为 null 表示解除关联
pub async fn update_camera(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateCameraRequest>,
) -> Response {
    let ctx = match require_access(&state, &headers, WRITERS) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let camera_id = match parse_id(&camera_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let nvr = match nullable_ref(req.nvr, "nvr") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let project = match nullable_ref(req.project, "project") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let changes = CameraChanges {
        name: req.name,
        model: req.model,
        ip_address: req.ip_address,
        location: req.location,
        mac_address: req.mac_address,
        serial_number: req.serial_number,
        username: req.username,
        password: req.password,
        firmware: req.firmware,
        resolution: req.resolution,
        fps: req.fps,
        nvr,
        project,
    };
    let updated = match state
        .inventory
        .update_camera(&camera_id, changes, &ctx)
        .await
    {
        Ok(camera) => camera,
        Err(err) => return inventory_error(err),
    };
    match state.inventory.camera_view(updated).await {
        Ok(view) => camera_response(StatusCode::OK, view),
        Err(err) => inventory_error(err),
    }
}

/// 删除摄像头，同时从所在 NVR 与项目中移除
pub async fn delete_camera(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let camera_id = match parse_id(&camera_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.inventory.delete_camera(&camera_id, &ctx).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn get_camera_history(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_access(&state, &headers, READERS) {
        return response;
    }
    let camera_id = match parse_id(&camera_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.inventory.camera_history(&camera_id).await {
        Ok(view) => {
            (StatusCode::OK, Json(ApiResponse::success(history_to_dto(view)))).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn get_camera_changes(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_access(&state, &headers, READERS) {
        return response;
    }
    let camera_id = match parse_id(&camera_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.inventory.camera_changes(&camera_id).await {
        Ok(entries) => {
            let data: Vec<ChangeLogEntryDto> = entries.into_iter().map(change_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

/// 将摄像头重分配到指定 NVR
pub async fn assign_camera(
    State(state): State<AppState>,
    Path((camera_id, nvr_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_access(&state, &headers, WRITERS) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let camera_id = match parse_id(&camera_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let nvr_id = match parse_id(&nvr_id, "nvrId") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let camera = match state
        .inventory
        .assign_camera_to_nvr(&camera_id, &nvr_id, &ctx)
        .await
    {
        Ok(camera) => camera,
        Err(err) => return inventory_error(err),
    };
    match state.inventory.camera_view(camera).await {
        Ok(view) => camera_response(StatusCode::OK, view),
        Err(err) => inventory_error(err),
    }
}

/// 从 multipart 表单中读取导入文件内容
async fn read_import_file(multipart: &mut Multipart) -> Result<Vec<u8>, Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| bad_request_error(format!("invalid multipart payload: {err}")))?
    {
        if field.name() != Some(IMPORT_FIELD) {
            continue;
        }
        if let Some(file_name) = field.file_name() {
            if !file_name.to_ascii_lowercase().ends_with(".csv") {
                return Err(inventory_error(InventoryError::InvalidFormat(
                    "only csv files are supported".to_string(),
                )));
            }
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|err| bad_request_error(format!("invalid file field: {err}")))?;
        return Ok(bytes.to_vec());
    }
    Err(bad_request_error("file required"))
}

/// 批量导入摄像头（CSV，表单字段 `file`）
pub async fn import_cameras(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let data = match read_import_file(&mut multipart).await {
        Ok(data) => data,
        Err(response) => return response,
    };
    let report = match state.inventory.import_cameras(&data, &ctx).await {
        Ok(report) => report,
        Err(err) => return inventory_error(err),
    };
    let mut views = Vec::with_capacity(report.cameras.len());
    for camera in report.cameras.iter().cloned() {
        match state.inventory.camera_view(camera).await {
            Ok(view) => views.push(view),
            Err(err) => return inventory_error(err),
        }
    }
    (
        StatusCode::OK,
        Json(ApiResponse::success(import_to_dto(&report, views))),
    )
        .into_response()
}
