//! 认证和授权中间件
//!
//! 提供以下中间件和辅助函数：
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_user_context：验证 token 并提取调用方上下文
//! - require_roles：按操作的角色允许列表放行
//!
//! 处理流程：
//! 1. request_context：在所有请求前注入追踪 ID
//! 2. require_user_context：验证 JWT 签名与有效期，得到 UserContext
//! 3. require_roles：角色不在允许列表内返回 403

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::Response,
};
use domain::{Role, UserContext, authorize};
use tracing::{Instrument, info_span, warn};
use vss_auth::AuthError;
use vss_telemetry::new_request_ids;

use crate::AppState;
use crate::utils::response::{auth_error, forbidden_error, internal_auth_error};

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 验证 access token 并提取调用方上下文
pub fn require_user_context(state: &AppState, headers: &HeaderMap) -> Result<UserContext, Response> {
    let Some(token) = bearer_token(headers) else {
        return Err(auth_error(StatusCode::UNAUTHORIZED));
    };
    match state.auth.verify_access_token(token) {
        Ok(ctx) => Ok(ctx),
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => {
            Err(auth_error(StatusCode::UNAUTHORIZED))
        }
        Err(err) => Err(internal_auth_error(err)),
    }
}

/// 校验角色允许列表（空列表表示任意已认证角色）
pub fn require_roles(ctx: &UserContext, allowed: &[Role]) -> Result<(), Response> {
    authorize(ctx, allowed).map_err(|err| {
        warn!(target: "vss.auth", user_id = %ctx.user_id, error = %err, "access_denied");
        forbidden_error()
    })
}

/// 认证并校验角色，返回调用方上下文
pub fn require_access(
    state: &AppState,
    headers: &HeaderMap,
    allowed: &[Role],
) -> Result<UserContext, Response> {
    let ctx = require_user_context(state, headers)?;
    require_roles(&ctx, allowed)?;
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::access::{ADMIN_ONLY, ANY_ROLE};

    #[test]
    fn bearer_token_extracts() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-1"),
        );
        assert_eq!(bearer_token(&headers), Some("token-1"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn roles_outside_allow_list_are_forbidden() {
        let ctx = UserContext::new("user-1", "viewer", Role::Readonly);
        assert!(require_roles(&ctx, ANY_ROLE).is_ok());
        let response = require_roles(&ctx, ADMIN_ONLY).expect_err("forbidden");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
