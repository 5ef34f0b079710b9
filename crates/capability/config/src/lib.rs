//! 应用运行配置加载。
//!
//! 全部配置在启动时一次性读取为 `AppConfig`，之后通过应用状态注入，运行期不再读取环境变量。

use std::env;

/// 导入文件大小上限默认值（5 MiB）。
pub const DEFAULT_IMPORT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 初始管理员账户（仅内存存储使用）。
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 未设置时使用内存存储。
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: u64,
    pub import_max_bytes: usize,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub seed_demo: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("VSS_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("VSS_JWT_SECRET".to_string()))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid(
                "VSS_JWT_SECRET".to_string(),
                "empty".to_string(),
            ));
        }
        let http_addr = env::var("VSS_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let database_url = read_optional("VSS_DATABASE_URL");
        let jwt_ttl_seconds = read_u64_with_default("VSS_JWT_TTL_SECONDS", 3600)?;
        if jwt_ttl_seconds == 0 {
            return Err(ConfigError::Invalid(
                "VSS_JWT_TTL_SECONDS".to_string(),
                "0".to_string(),
            ));
        }
        let import_max_bytes = read_u64_with_default(
            "VSS_IMPORT_MAX_BYTES",
            DEFAULT_IMPORT_MAX_BYTES as u64,
        )?;
        let import_max_bytes = usize::try_from(import_max_bytes).map_err(|_| {
            ConfigError::Invalid(
                "VSS_IMPORT_MAX_BYTES".to_string(),
                import_max_bytes.to_string(),
            )
        })?;
        let bootstrap_admin = match (
            read_optional("VSS_BOOTSTRAP_ADMIN_EMAIL"),
            read_optional("VSS_BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Missing(
                    "VSS_BOOTSTRAP_ADMIN_PASSWORD".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(ConfigError::Missing("VSS_BOOTSTRAP_ADMIN_EMAIL".to_string()));
            }
        };
        let seed_demo = read_bool_with_default("VSS_SEED_DEMO", false);

        Ok(Self {
            http_addr,
            database_url,
            jwt_secret,
            jwt_ttl_seconds,
            import_max_bytes,
            bootstrap_admin,
            seed_demo,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
