//! 用户管理 handlers（仅 admin）
//!
//! - GET /users
//! - GET /users/{id}
//! - DELETE /users/{id}（不能删除自己）

use crate::AppState;
use crate::middleware::require_access;
use crate::utils::response::{forbidden_error, not_found_error, storage_error};
use crate::utils::{parse_id, user_to_dto};
use api_contract::{ApiResponse, UserDto};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::access::ADMIN_ONLY;
use tracing::{info, warn};

pub async fn list_users(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_access(&state, &headers, ADMIN_ONLY) {
        return response;
    }
    match state.users.list_users().await {
        Ok(users) => {
            let data: Vec<UserDto> = users.into_iter().map(user_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_access(&state, &headers, ADMIN_ONLY) {
        return response;
    }
    let user_id = match parse_id(&user_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.users.find_user(&user_id).await {
        Ok(Some(user)) => {
            (StatusCode::OK, Json(ApiResponse::success(user_to_dto(user)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 删除用户；调用方删除自己返回 403
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let user_id = match parse_id(&user_id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    if user_id == ctx.user_id {
        warn!(target: "vss.auth", user_id = %ctx.user_id, "self_delete_rejected");
        return forbidden_error();
    }
    match state.users.delete_user(&user_id).await {
        Ok(true) => {
            info!(target: "vss.auth", user_id = %user_id, deleted_by = %ctx.user_id, "user_deleted");
            (StatusCode::OK, Json(ApiResponse::success(()))).into_response()
        }
        Ok(false) => not_found_error(),
        Err(err) => storage_error(err),
    }
}
