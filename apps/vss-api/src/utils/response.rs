//! HTTP 错误响应辅助函数
//!
//! 所有错误返回统一的 ApiResponse 格式，HTTP 状态码与错误码一一对应：
//! - 认证：AUTH.UNAUTHORIZED / AUTH.FORBIDDEN / AUTH.INVALID_CREDENTIALS
//! - 请求：INVALID.REQUEST / RESOURCE.DUPLICATE / RESOURCE.CONFLICT
//! - 库存：NVR.CAPACITY_EXCEEDED / IMPORT.INVALID_FORMAT / IMPORT.EMPTY
//! - 内部：INTERNAL.ERROR

use api_contract::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use vss_auth::AuthError;
use vss_inventory::InventoryError;
use vss_storage::StorageError;

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(code, message))).into_response()
}

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    error_response(status, "AUTH.UNAUTHORIZED", "unauthorized")
}

/// 禁止访问错误响应
pub fn forbidden_error() -> Response {
    error_response(StatusCode::FORBIDDEN, "AUTH.FORBIDDEN", "forbidden")
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "INVALID.REQUEST", message)
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    error_response(StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND", "not found")
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    error!(error = %err, "auth_internal_error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL.ERROR",
        err.to_string(),
    )
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    error!(error = %err, "storage_error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL.ERROR",
        err.to_string(),
    )
}

/// 登录/注册错误映射
pub fn auth_failure(err: AuthError) -> Response {
    match err {
        AuthError::InvalidCredentials => error_response(
            StatusCode::BAD_REQUEST,
            "AUTH.INVALID_CREDENTIALS",
            "invalid credentials",
        ),
        AuthError::TokenInvalid | AuthError::TokenExpired => auth_error(StatusCode::UNAUTHORIZED),
        AuthError::InvalidInput(message) => bad_request_error(message),
        AuthError::EmailTaken => error_response(
            StatusCode::BAD_REQUEST,
            "RESOURCE.DUPLICATE",
            "email already registered",
        ),
        err @ AuthError::Internal(_) => internal_auth_error(err),
    }
}

/// 库存业务错误映射
pub fn inventory_error(err: InventoryError) -> Response {
    let message = err.to_string();
    match err {
        InventoryError::Validation(message) => bad_request_error(message),
        InventoryError::DuplicateKey(_) => {
            error_response(StatusCode::BAD_REQUEST, "RESOURCE.DUPLICATE", message)
        }
        InventoryError::NotFound(_) => {
            error_response(StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND", message)
        }
        InventoryError::Conflict(_) => {
            error_response(StatusCode::BAD_REQUEST, "RESOURCE.CONFLICT", message)
        }
        InventoryError::CapacityExceeded(_) => {
            error_response(StatusCode::BAD_REQUEST, "NVR.CAPACITY_EXCEEDED", message)
        }
        InventoryError::InvalidFormat(_) => {
            error_response(StatusCode::BAD_REQUEST, "IMPORT.INVALID_FORMAT", message)
        }
        InventoryError::EmptyImport => {
            error_response(StatusCode::BAD_REQUEST, "IMPORT.EMPTY", message)
        }
        InventoryError::Storage(_) => {
            error!(error = %message, "inventory_storage_error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL.ERROR", message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_errors_map_to_stable_statuses() {
        let cases = [
            (
                InventoryError::Validation("name required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (InventoryError::NotFound("camera"), StatusCode::NOT_FOUND),
            (
                InventoryError::CapacityExceeded("NVR 1".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                InventoryError::Storage("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(inventory_error(err).status(), status);
        }
    }

    #[test]
    fn invalid_credentials_is_a_bad_request() {
        let response = auth_failure(AuthError::InvalidCredentials);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
