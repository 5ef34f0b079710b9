//! 项目 handlers
//!
//! 提供项目资源的增删改查与成员维护接口：
//! - GET /projects、GET /projects/{id}：任意已认证角色
//! - POST /projects、PUT /projects/{id}、DELETE /projects/{id}：仅 admin
//! - POST /projects/add-camera、POST /projects/add-nvr：admin/junior
//!
//! 删除项目时其下摄像头与 NVR 解除关联，实体本身保留。

use crate::AppState;
use crate::middleware::require_access;
use crate::utils::response::inventory_error;
use crate::utils::{parse_id, project_to_dto};
use api_contract::{
    AddCameraToProjectRequest, AddNvrToProjectRequest, ApiResponse, CreateProjectRequest,
    ProjectDto, UpdateProjectRequest,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::access::{ADMIN_ONLY, ANY_ROLE, WRITERS};
use vss_inventory::{NewProject, ProjectChanges};
use vss_storage::ProjectRecord;

async fn project_response(
    state: &AppState,
    status: StatusCode,
    project: ProjectRecord,
) -> Response {
    match state.inventory.project_view(project).await {
        Ok(view) => {
            (status, Json(ApiResponse::success(project_to_dto(view)))).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

/// 列出项目
pub async fn list_projects(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_access(&state, &headers, ANY_ROLE) {
        return response;
    }
    match state.inventory.list_projects().await {
        Ok(views) => {
            let data: Vec<ProjectDto> = views.into_iter().map(project_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

/// 创建项目
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let input = NewProject {
        name: req.name,
        description: req.description,
    };
    match state.inventory.create_project(input, &ctx).await {
        Ok(project) => project_response(&state, StatusCode::CREATED, project).await,
        Err(err) => inventory_error(err),
    }
}

/// 获取项目详情，摄像头与 NVR 展开为摘要
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_access(&state, &headers, ANY_ROLE) {
        return response;
    }
    let project_id = match parse_id(&project_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.inventory.get_project(&project_id).await {
        Ok(view) => {
            (StatusCode::OK, Json(ApiResponse::success(project_to_dto(view)))).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

/// 更新项目
pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateProjectRequest>,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let project_id = match parse_id(&project_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let changes = ProjectChanges {
        name: req.name,
        description: req.description,
    };
    match state
        .inventory
        .update_project(&project_id, changes, &ctx)
        .await
    {
        Ok(project) => project_response(&state, StatusCode::OK, project).await,
        Err(err) => inventory_error(err),
    }
}

/// 删除项目
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let project_id = match parse_id(&project_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.inventory.delete_project(&project_id, &ctx).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => inventory_error(err),
    }
}

/// 将摄像头加入项目
pub async fn add_camera_to_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddCameraToProjectRequest>,
) -> Response {
    let ctx = match require_access(&state, &headers, WRITERS) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let project_id = match parse_id(&req.project_id, "projectId") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let camera_id = match parse_id(&req.camera_id, "cameraId") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state
        .inventory
        .add_camera_to_project(&project_id, &camera_id, &ctx)
        .await
    {
        Ok(project) => project_response(&state, StatusCode::OK, project).await,
        Err(err) => inventory_error(err),
    }
}

/// 将 NVR 加入项目
pub async fn add_nvr_to_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddNvrToProjectRequest>,
) -> Response {
    if let Err(response) = require_access(&state, &headers, WRITERS) {
        return response;
    }
    let project_id = match parse_id(&req.project_id, "projectId") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let nvr_id = match parse_id(&req.nvr_id, "nvrId") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state
        .inventory
        .add_nvr_to_project(&project_id, &nvr_id)
        .await
    {
        Ok(project) => project_response(&state, StatusCode::OK, project).await,
        Err(err) => inventory_error(err),
    }
}
