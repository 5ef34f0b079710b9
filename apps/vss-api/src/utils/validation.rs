//! 路径与查询参数校验
//!
//! - parse_id：实体 ID 必须为 UUID，否则直接返回 400
//! - parse_role：角色名解析，未知角色返回 400

use crate::utils::response::bad_request_error;
use axum::response::Response;
use domain::Role;
use uuid::Uuid;

/// 校验实体 ID 为 UUID 格式，返回规范化（小写）形式
pub fn parse_id(value: &str, field: &str) -> Result<String, Response> {
    Uuid::parse_str(value.trim())
        .map(|id| id.to_string())
        .map_err(|_| bad_request_error(format!("{field} is not a valid id")))
}

/// 解析可选角色；缺省交由认证服务取默认值
pub fn parse_role(value: Option<&str>) -> Result<Option<Role>, Response> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse::<Role>()
            .map(Some)
            .map_err(|err| bad_request_error(err.to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn non_uuid_ids_are_rejected() {
        let response = parse_id("abc", "id").expect_err("invalid");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let id = parse_id("  6F9619FF-8B86-D011-B42D-00C04FC964FF ", "id").expect("valid");
        assert_eq!(id, "6f9619ff-8b86-d011-b42d-00c04fc964ff");
    }

    #[test]
    fn roles_parse_or_default() {
        assert_eq!(parse_role(None).ok(), Some(None));
        assert_eq!(parse_role(Some("admin")).ok(), Some(Some(Role::Admin)));
        assert!(parse_role(Some("root")).is_err());
    }
}
