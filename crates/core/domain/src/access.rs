//! 角色与访问控制。
//!
//! 三种角色：
//! - admin：全部操作
//! - junior：读 + 摄像头写入/重分配
//! - readonly：只读
//!
//! `authorize` 在每个受保护操作的入口调用；允许列表为空表示任意已认证角色。

use std::fmt;
use std::str::FromStr;

/// 用户角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    Junior,
    Readonly,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Junior => "junior",
            Role::Readonly => "readonly",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "junior" => Ok(Role::Junior),
            "readonly" => Ok(Role::Readonly),
            other => Err(AccessError::UnknownRole(other.to_string())),
        }
    }
}

/// 任意已认证角色。
pub const ANY_ROLE: &[Role] = &[];
/// 仅管理员。
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
/// 可写角色（摄像头维护、重分配、项目成员调整）。
pub const WRITERS: &[Role] = &[Role::Admin, Role::Junior];
/// 全部角色显式列出（读接口）。
pub const READERS: &[Role] = &[Role::Admin, Role::Junior, Role::Readonly];

/// 访问控制错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("role {0} is not allowed")]
    Forbidden(Role),
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// 调用方上下文：由 access token 解析得到。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role,
        }
    }
}

/// 校验角色是否在允许列表内。
pub fn authorize(ctx: &UserContext, allowed: &[Role]) -> Result<(), AccessError> {
    if allowed.is_empty() || allowed.contains(&ctx.role) {
        return Ok(());
    }
    Err(AccessError::Forbidden(ctx.role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allow_list_admits_every_role() {
        for role in [Role::Admin, Role::Junior, Role::Readonly] {
            let ctx = UserContext::new("user-1", "someone", role);
            assert!(authorize(&ctx, ANY_ROLE).is_ok());
        }
    }

    #[test]
    fn readonly_cannot_write() {
        let ctx = UserContext::new("user-1", "viewer", Role::Readonly);
        assert_eq!(
            authorize(&ctx, WRITERS),
            Err(AccessError::Forbidden(Role::Readonly))
        );
    }

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("junior".parse::<Role>(), Ok(Role::Junior));
        assert_eq!(Role::Readonly.to_string(), "readonly");
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Junior);
    }
}
