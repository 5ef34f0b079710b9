//! 认证能力：登录、注册、JWT 生成与校验。

mod jwt;
mod password;

use domain::{Role, UserContext, is_valid_email};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use vss_storage::{UserRecord, UserStore};

pub use jwt::JwtManager;
pub use password::{
    MIN_PASSWORD_LEN, PasswordCheck, check_password_policy, hash_password,
    verify_password_and_maybe_upgrade,
};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("{0}")]
    InvalidInput(String),
    #[error("email already registered")]
    EmailTaken,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 签发的 access token。
pub struct AccessToken {
    pub token: String,
    /// 过期时间（秒级时间戳）。
    pub expires_at: u64,
}

/// 注册输入。
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// 认证服务实现（基于 UserStore + JWT）。
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt: JwtManager,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(user_store: Arc<dyn UserStore>, jwt: JwtManager) -> Self {
        Self { user_store, jwt }
    }

    /// 登录校验并签发 token；存量明文口令在此升级为 argon2 哈希。
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AccessToken), AuthError> {
        let user = self
            .user_store
            .find_by_email(email.trim())
            .await
            .map_err(|err| AuthError::Internal(err.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;
        let check = verify_password_and_maybe_upgrade(&user.password, password)?;
        if !check.verified {
            warn!(target: "vss.auth", user_id = %user.user_id, "login_rejected");
            return Err(AuthError::InvalidCredentials);
        }
        if let Some(password_hash) = check.upgrade_hash {
            let updated = self
                .user_store
                .update_password_hash(&user.user_id, &password_hash)
                .await
                .map_err(|err| AuthError::Internal(err.to_string()))?;
            if !updated {
                return Err(AuthError::Internal(
                    "password migration update failed".to_string(),
                ));
            }
            info!(target: "vss.auth", user_id = %user.user_id, "password_hash_upgraded");
        }
        let token = self.jwt.issue(&user.to_user_context())?;
        Ok((user, token))
    }

    /// 注册新用户并为其签发 token。
    pub async fn register(&self, input: NewUser) -> Result<(UserRecord, AccessToken), AuthError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("name required".to_string()));
        }
        let email = input.email.trim().to_ascii_lowercase();
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidInput("invalid email".to_string()));
        }
        check_password_policy(&input.password)?;

        let record = UserRecord {
            user_id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            password: hash_password(&input.password)?,
            role: input.role.unwrap_or_default(),
            created_at_ms: now_epoch_ms(),
        };
        let user = self
            .user_store
            .create_user(record)
            .await
            .map_err(|err| match err.duplicate_field() {
                Some(_) => AuthError::EmailTaken,
                None => AuthError::Internal(err.to_string()),
            })?;
        info!(
            target: "vss.auth",
            user_id = %user.user_id,
            role = %user.role,
            "user_registered"
        );
        let token = self.jwt.issue(&user.to_user_context())?;
        Ok((user, token))
    }

    /// 校验 access token 并提取 UserContext。
    pub fn verify_access_token(&self, token: &str) -> Result<UserContext, AuthError> {
        self.jwt.decode(token)
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
