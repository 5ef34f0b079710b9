//! 健康检查与认证 handlers
//!
//! ## 公开端点（无需认证）
//! - `GET /health`、`GET /livez` - 存活探针，返回 `{"ok": true}`
//! - `GET /readyz` - 就绪探针，配置了 Postgres 时检查连接
//! - `POST /users/login` - 邮箱口令登录，返回 token 与用户信息
//!
//! ## 管理端点（仅 admin）
//! - `POST /users/register` - 创建用户并为其签发 token
//!
//! token 的 `expires` 为 Unix 毫秒时间戳。

use crate::AppState;
use crate::middleware::require_access;
use crate::utils::response::auth_failure;
use crate::utils::{parse_role, user_to_dto};
use api_contract::{ApiResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::access::ADMIN_ONLY;
use tracing::info;
use vss_auth::NewUser;

/// 健康检查端点
pub async fn health() -> impl IntoResponse {
    livez().await
}

/// Liveness 探针：只反映进程存活，不做外部依赖检查。
pub async fn livez() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Readiness 探针：内存存储直接就绪，Postgres 存储执行一次探测查询。
pub async fn readyz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.db_pool.as_ref() else {
        return (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response();
    };

    match sqlx::query_scalar::<_, i32>("select 1").fetch_one(pool).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readyz check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "ok": false })),
            )
                .into_response()
        }
    }
}

/// 登录接口
///
/// 邮箱与口令匹配时返回 token、过期时间和用户资料。
///
/// # Errors
///
/// - `400 AUTH.INVALID_CREDENTIALS`: 邮箱不存在或口令错误
/// - `500 INTERNAL.ERROR`: 认证服务内部错误
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth.login(&req.email, &req.password).await {
        Ok((user, token)) => {
            let response = LoginResponse {
                token: token.token,
                // 秒级转毫秒级
                expires: token.expires_at.saturating_mul(1000),
                user: user_to_dto(user),
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(err) => auth_failure(err),
    }
}

/// 注册接口（仅 admin）
///
/// 角色缺省为 junior；返回新用户的 token。
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let ctx = match require_access(&state, &headers, ADMIN_ONLY) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let role = match parse_role(req.role.as_deref()) {
        Ok(role) => role,
        Err(response) => return response,
    };
    let input = NewUser {
        name: req.name,
        email: req.email,
        password: req.password,
        role,
    };
    match state.auth.register(input).await {
        Ok((user, token)) => {
            info!(
                target: "vss.auth",
                user_id = %user.user_id,
                registered_by = %ctx.user_id,
                "user_created_by_admin"
            );
            let response = RegisterResponse {
                token: token.token,
                expires: token.expires_at.saturating_mul(1000),
            };
            (StatusCode::CREATED, Json(ApiResponse::success(response))).into_response()
        }
        Err(err) => auth_failure(err),
    }
}
